#[macro_use]
extern crate tracing;

use std::error::Error;
use std::path::PathBuf;

use actix_web::error::JsonPayloadError;
use actix_web::web::Data;
use actix_web::{web, App};
use actix_web::{HttpResponse, HttpServer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use bookkeeper_lib::ai;
use bookkeeper_lib::ai::client::ChatClient;
use bookkeeper_lib::auth;
use bookkeeper_lib::auth::github::GithubClient;
use bookkeeper_lib::auth::SessionAuth;
use bookkeeper_lib::config::Config;
use bookkeeper_lib::transaction;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    tracing::subscriber::set_global_default(subscriber).expect("set up subscriber");
    info!("tracing initialized");

    let config = match get_config_file() {
        Ok(config_path) => Config::from_file(config_path)?,
        Err(_) => Config::from_env()?,
    };

    let (user_repo, session_repo, transaction_repo) =
        bookkeeper_repo::sqlx_repo::create_repos(&config.database_url, 10).await?;

    let github_client = GithubClient::new(config.github.clone());
    let chat_client = ChatClient::new(config.ai.clone());

    let server = HttpServer::new(move || {
        let session_auth = SessionAuth {
            session_repo: session_repo.clone(),
            user_repo: user_repo.clone(),
        };

        App::new()
            .app_data(Data::new(user_repo.clone()))
            .app_data(Data::new(session_repo.clone()))
            .app_data(Data::new(transaction_repo.clone()))
            .app_data(Data::new(github_client.clone()))
            .app_data(Data::new(chat_client.clone()))
            .wrap(bookkeeper_lib::tracing::create_middleware())
            .service(
                web::scope("/api")
                    .service(auth::auth_service())
                    .service(transaction::transaction_service().wrap(session_auth))
                    .service(ai::ai_service().wrap(SessionAuth {
                        session_repo: session_repo.clone(),
                        user_repo: user_repo.clone(),
                    })),
            )
            .app_data(web::JsonConfig::default().error_handler(|err, req| {
                error!(req_path = req.path(), %err);
                match err {
                    JsonPayloadError::Deserialize(deserialize_err) => {
                        let error_body = serde_json::json!({
                            "error": "Unable to parse JSON payload",
                            "detail": format!("{}", deserialize_err),
                        });
                        actix_web::error::InternalError::from_response(
                            deserialize_err,
                            HttpResponse::BadRequest()
                                .content_type("application/json")
                                .body(error_body.to_string()),
                        )
                        .into()
                    }
                    _ => err.into(),
                }
            }))
    });
    server.bind("0.0.0.0:8000")?.run().await?;

    Ok(())
}

fn get_config_file() -> Result<PathBuf, &'static str> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Ok(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    Err("Config file not found")
}
