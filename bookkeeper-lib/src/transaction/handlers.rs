use actix_web::http::header;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use bookkeeper_repo::transaction_repo::{
    Filter, NewTransaction, PageOptions, TransactionRepo, TransactionType,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::auth::UserId;
use crate::error::HandlerError;
use crate::excel;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl TransactionQuery {
    fn into_parts(self) -> (Filter, Option<PageOptions>) {
        let filter = Filter {
            from: self.from,
            until: self.until,
            category: self.category,
            transaction_type: self.transaction_type,
        };
        let page_options = self.limit.map(|limit| PageOptions {
            offset: self.offset.unwrap_or(0),
            limit,
        });
        (filter, page_options)
    }
}

fn validate_amount(new_transaction: &NewTransaction) -> Result<(), HandlerError> {
    if new_transaction.amount.is_sign_negative() {
        return Err(HandlerError::BadRequest(
            "Amount must be non-negative".to_owned(),
        ));
    }
    Ok(())
}

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let (filter, page_options) = query.into_inner().into_parts();
    let transactions = transaction_repo
        .get_all_transactions(&user_id.into_inner(), filter, page_options)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .get_transaction(&user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    new_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = new_transaction.into_inner();
    validate_amount(&new_transaction)?;
    let transaction = transaction_repo
        .create_new_transaction(&user_id.into_inner(), new_transaction)
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
    updated_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let updated_transaction = updated_transaction.into_inner();
    validate_amount(&updated_transaction)?;
    let transaction = transaction_repo
        .update_transaction(
            &user_id.into_inner(),
            transaction_id.into_inner(),
            updated_transaction,
        )
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    transaction_repo
        .delete_transaction(&user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[get("/export")]
pub async fn export_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transactions = transaction_repo
        .get_all_transactions(&user_id.into_inner(), Filter::default(), None)
        .await?;
    let workbook = excel::write_workbook(&transactions)?;

    let filename = format!("bookkeeper_{}.xlsx", Utc::now().date_naive());
    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(workbook))
}

#[post("/import")]
pub async fn import_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    body: web::Bytes,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let new_transactions = excel::read_workbook(&body)?;
    let imported = if new_transactions.is_empty() {
        0
    } else {
        transaction_repo
            .create_transactions(&user_id, new_transactions)
            .await?
            .len()
    };
    info!(%user_id, imported, "Imported transactions from spreadsheet");
    Ok(HttpResponse::Ok().json(json!({ "imported": imported })))
}
