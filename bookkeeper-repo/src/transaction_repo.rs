use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(anyhow::anyhow!("Unknown transaction type: {}", other)),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Filter {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Transactions are returned ordered by date descending, then id descending.
    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Bulk insert used by spreadsheet import. All rows are inserted or none.
    async fn create_transactions(
        &self,
        user: &str,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: i32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub const fn new(
        id: i32,
        transaction_type: TransactionType,
        category: String,
        description: String,
        date: NaiveDate,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            transaction_type,
            category,
            description,
            date,
            amount,
            created_at,
        }
    }
}

impl Eq for Transaction {}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        let date_ordering = self.date.cmp(&other.date);
        if let Equal = date_ordering {
            self.id.cmp(&other.id)
        } else {
            date_ordering
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl NewTransaction {
    pub const fn new(
        transaction_type: TransactionType,
        category: String,
        description: String,
        date: NaiveDate,
        amount: Decimal,
    ) -> NewTransaction {
        NewTransaction {
            transaction_type,
            category,
            description,
            date,
            amount,
        }
    }

    pub fn to_transaction(&self, id: i32, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            category: self.category.clone(),
            description: self.description.clone(),
            date: self.date,
            amount: self.amount,
            created_at,
        }
    }
}
