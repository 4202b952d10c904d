use actix_web::{web, Scope};

pub mod handlers;

pub fn transaction_service() -> Scope {
    // export must be registered before the `{transaction_id}` matchers
    web::scope("/transactions")
        .service(handlers::export_transactions)
        .service(handlers::import_transactions)
        .service(handlers::get_all_transactions)
        .service(handlers::create_new_transaction)
        .service(handlers::get_transaction)
        .service(handlers::update_transaction)
        .service(handlers::delete_transaction)
}
