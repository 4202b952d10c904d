use actix_web::body::BoxBody;
use actix_web::{HttpResponse, ResponseError};
use bookkeeper_repo::session_repo::SessionRepoError;
use bookkeeper_repo::transaction_repo::TransactionRepoError;
use bookkeeper_repo::user_repo::UserRepoError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::ai::client::AiError;
use crate::auth::github::GithubError;
use crate::excel::ExcelError;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Transaction(#[from] TransactionRepoError),
    #[error(transparent)]
    User(#[from] UserRepoError),
    #[error(transparent)]
    Session(#[from] SessionRepoError),
    #[error(transparent)]
    Github(#[from] GithubError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Excel(#[from] ExcelError),
    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for HandlerError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            HandlerError::Transaction(TransactionRepoError::TransactionNotFound(_)) => {
                HttpResponse::NotFound().json(json!({ "error": "Transaction not found" }))
            }
            HandlerError::Github(GithubError::Exchange(err)) => {
                HttpResponse::BadRequest().json(json!({ "error": err }))
            }
            HandlerError::Ai(err) => {
                error!(%err, "AI request failed");
                HttpResponse::InternalServerError().json(json!({ "error": "AI Service Error" }))
            }
            HandlerError::Excel(err) => {
                HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
            }
            HandlerError::BadRequest(message) => {
                HttpResponse::BadRequest().json(json!({ "error": message }))
            }
            err => {
                error!(%err, "Unhandled error");
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}
