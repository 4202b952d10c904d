use bookkeeper_repo::transaction_repo::{NewTransaction, TransactionType};
use bookkeeper_repo::user_repo::{User, UserRepo};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct TestUser {
    pub id: String,
    repo: Arc<dyn UserRepo>,
}

impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let github_id = Uuid::new_v4().to_string();
        let user = User::new(
            github_id,
            "test-user".to_owned(),
            Some("Test User".to_owned()),
            None,
        );
        let user_id = user.id.clone();
        user_repo.create_user(user).await.unwrap();
        info!(%user_id, "Created user");
        TestUser {
            id: user_id,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(&self.id).await.unwrap()
    }
}

pub fn new_expense(category: &str, date: &str, amount: i64) -> NewTransaction {
    NewTransaction::new(
        TransactionType::Expense,
        category.to_owned(),
        "test expense".to_owned(),
        NaiveDate::from_str(date).unwrap(),
        Decimal::from(amount),
    )
}

pub fn new_income(category: &str, date: &str, amount: i64) -> NewTransaction {
    NewTransaction::new(
        TransactionType::Income,
        category.to_owned(),
        "test income".to_owned(),
        NaiveDate::from_str(date).unwrap(),
        Decimal::from(amount),
    )
}
