use actix_web::{web, Scope};

pub mod client;
pub mod handlers;
pub mod parse;
pub mod report;

pub fn ai_service() -> Scope {
    web::scope("/ai")
        .service(handlers::parse)
        .service(handlers::report)
}
