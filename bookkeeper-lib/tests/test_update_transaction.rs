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
async fn test_update_transaction(
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
        NaiveDate::from_str("2024-06-09").unwrap(),
        Decimal::from(30),
    );
    let transaction: Transaction = create_transaction!(&service, new_transaction);

    let update = NewTransaction::new(
        TransactionType::Expense,
        "交通".to_string(),
        "地铁".to_string(),
        NaiveDate::from_str("2024-06-10").unwrap(),
        Decimal::from_str("6.50").unwrap(),
    );
    let request = TestRequest::put()
        .uri(format!("/transactions/{}", transaction.id).as_str())
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let updated_transaction: Transaction = test::read_body_json(response).await;
    assert_eq!(updated_transaction.id, transaction.id);
    assert_eq!(updated_transaction.category, update.category);
    assert_eq!(updated_transaction.description, update.description);
    assert_eq!(updated_transaction.date, update.date);
    assert_eq!(updated_transaction.amount, update.amount);
    assert_eq!(updated_transaction.created_at, transaction.created_at);

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_invalid_transaction(
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

    let update = NewTransaction::new(
        TransactionType::Expense,
        "餐饮".to_string(),
        String::new(),
        NaiveDate::from_str("2024-06-09").unwrap(),
        Decimal::from(30),
    );
    let request = TestRequest::put()
        .uri(format!("/transactions/{}", 0).as_str()) // non-existent transaction ID
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_other_users_transaction(
    _tracing_setup: &(),
    repos: (
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn TransactionRepo>,
    ),
) {
    let (user_repo, _session_repo, transaction_repo) = repos;
    let test_user = TestUser::new(user_repo.clone()).await;
    let other_user = TestUser::new(user_repo).await;

    let other_transaction = NewTransaction::new(
        TransactionType::Expense,
        "购物".to_string(),
        String::new(),
        NaiveDate::from_str("2024-06-01").unwrap(),
        Decimal::from(50),
    );
    let stored = transaction_repo
        .create_new_transaction(&other_user.user_id, other_transaction)
        .await
        .unwrap();

    let app = build_app!(transaction_repo, test_user.user_id.clone());
    let service = test::init_service(app).await;

    let update = NewTransaction::new(
        TransactionType::Expense,
        "餐饮".to_string(),
        String::new(),
        NaiveDate::from_str("2024-06-09").unwrap(),
        Decimal::from(30),
    );
    let request = TestRequest::put()
        .uri(format!("/transactions/{}", stored.id).as_str())
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    test_user.delete().await;
    other_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_negative_amount_rejected(
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
        String::new(),
        NaiveDate::from_str("2024-06-09").unwrap(),
        Decimal::from(30),
    );
    let transaction: Transaction = create_transaction!(&service, new_transaction);

    let update = NewTransaction::new(
        TransactionType::Expense,
        "餐饮".to_string(),
        String::new(),
        NaiveDate::from_str("2024-06-09").unwrap(),
        Decimal::from(-30),
    );
    let request = TestRequest::put()
        .uri(format!("/transactions/{}", transaction.id).as_str())
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    test_user.delete().await
}
