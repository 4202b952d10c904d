use actix_web::{post, web, HttpResponse, Responder};
use bookkeeper_repo::transaction_repo::{Filter, TransactionRepo};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::ai::client::{strip_code_fences, ChatClient, ChatContent, ChatMessage};
use crate::ai::parse::{build_messages, parse_reply, ParseRequest};
use crate::ai::report::{
    build_prompt, date_range, summarize, ReportRequest, EMPTY_PERIOD_REPORT, SYSTEM_PROMPT,
};
use crate::auth::UserId;
use crate::error::HandlerError;

#[post("/parse")]
pub async fn parse(
    chat_client: web::Data<ChatClient>,
    _user_id: web::ReqData<UserId>,
    request: web::Json<ParseRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    if request.is_empty() {
        return Err(HandlerError::BadRequest("No input provided".to_owned()));
    }

    let model = if request.wants_vision() {
        &chat_client.vision_model
    } else {
        &chat_client.text_model
    };
    let messages = build_messages(&request, Utc::now().date_naive());

    let content = chat_client.complete(model, &messages, 0.1).await?;
    let parsed = parse_reply(&content)?;
    info!(candidates = parsed.len(), "Parsed transactions from AI reply");
    Ok(HttpResponse::Ok().json(parsed))
}

#[post("/report")]
pub async fn report(
    chat_client: web::Data<ChatClient>,
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    request: web::Json<ReportRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    let (start, end) = date_range(request.period, request.date);

    let filter = Filter {
        from: Some(start),
        until: Some(end),
        ..Filter::default()
    };
    let transactions = transaction_repo
        .get_all_transactions(&user_id.into_inner(), filter, None)
        .await?;
    if transactions.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "report": EMPTY_PERIOD_REPORT })));
    }

    let summary = summarize(&transactions);
    let prompt = build_prompt(request.period, start, end, &summary);
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(ChatContent::Text(prompt)),
    ];

    let content = chat_client
        .complete(&chat_client.text_model, &messages, 0.7)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "report": strip_code_fences(&content) })))
}
