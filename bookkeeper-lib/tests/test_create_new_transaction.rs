extern crate serde_json;

use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::web::Data;
use actix_web::App;
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::utils::mock::MockAuthentication;
use bookkeeper_repo::session_repo::SessionRepo;
use bookkeeper_repo::transaction_repo::{
    NewTransaction, Transaction, TransactionRepo, TransactionType,
};
use bookkeeper_repo::user_repo::UserRepo;
use utils::repos;
use utils::tracing_setup;
use utils::TestUser;

#[macro_use]
mod utils;

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_create_api_response(
    _tracing_setup: &(),
    repos: (
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn TransactionRepo>,
    ),
) {
    let (user_repo, _session_repo, transaction_repo) = repos;
    let test_user = TestUser::new(user_repo).await;
    let app = build_app!(transaction_repo, test_user.user_id.clone());
    let service = test::init_service(app).await;

    let new_transaction = NewTransaction::new(
        TransactionType::Expense,
        "餐饮".to_string(),
        "午饭".to_string(),
        NaiveDate::from_str("2024-05-01").unwrap(),
        Decimal::from_str("45.50").unwrap(),
    );
    let response_transaction: Transaction = create_transaction!(&service, new_transaction);
    assert_eq!(
        new_transaction.transaction_type,
        response_transaction.transaction_type
    );
    assert_eq!(new_transaction.category, response_transaction.category);
    assert_eq!(
        new_transaction.description,
        response_transaction.description
    );
    assert_eq!(new_transaction.date, response_transaction.date);
    assert_eq!(new_transaction.amount, response_transaction.amount);

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_created_transaction_is_stored(
    _tracing_setup: &(),
    repos: (
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn TransactionRepo>,
    ),
) {
    let (user_repo, _session_repo, transaction_repo) = repos;
    let test_user = TestUser::new(user_repo).await;
    let repo_handle = transaction_repo.clone();
    let app = build_app!(transaction_repo, test_user.user_id.clone());
    let service = test::init_service(app).await;

    let new_transaction = NewTransaction::new(
        TransactionType::Income,
        "工资".to_string(),
        "五月工资".to_string(),
        NaiveDate::from_str("2024-05-10").unwrap(),
        Decimal::from(8000),
    );
    let response_transaction: Transaction = create_transaction!(&service, new_transaction);

    let stored_transaction = repo_handle
        .get_transaction(&test_user.user_id, response_transaction.id)
        .await
        .unwrap();
    assert_eq!(stored_transaction, response_transaction);

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_create_negative_amount_rejected(
    _tracing_setup: &(),
    repos: (
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn TransactionRepo>,
    ),
) {
    let (user_repo, _session_repo, transaction_repo) = repos;
    let test_user = TestUser::new(user_repo).await;
    let app = build_app!(transaction_repo, test_user.user_id.clone());
    let service = test::init_service(app).await;

    let new_transaction = NewTransaction::new(
        TransactionType::Expense,
        "餐饮".to_string(),
        "".to_string(),
        NaiveDate::from_str("2024-05-01").unwrap(),
        Decimal::from(-10),
    );
    let request = TestRequest::post()
        .uri("/transactions")
        .set_json(&new_transaction)
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    test_user.delete().await
}
