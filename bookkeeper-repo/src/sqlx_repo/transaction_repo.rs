use crate::sqlx_repo::SQLxRepo;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, NewTransaction, PageOptions, Transaction, TransactionRepo, TransactionRepoError,
    TransactionType,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};
use std::str::FromStr;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i32,
    #[sqlx(rename = "type")]
    transaction_type: String,
    category: String,
    description: String,
    date: NaiveDate,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        Ok(Transaction::new(
            value.id,
            TransactionType::from_str(&value.transaction_type)?,
            value.category,
            value.description,
            value.date,
            value.amount,
            value.created_at,
        ))
    }
}

const ENTRY_COLUMNS: &str = "id, type, category, description, date, amount, created_at";

impl SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction_entry(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Option<TransactionEntry>, TransactionRepoError> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE id = $1 AND user_id = $2",
            ENTRY_COLUMNS
        );
        let transaction_entry = sqlx::query_as::<_, TransactionEntry>(&sql)
            .bind(transaction_id)
            .bind(user)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        Ok(transaction_entry)
    }

    #[instrument(skip(db_executor))]
    async fn insert_transaction_entry<'e, E>(
        db_executor: E,
        user: &str,
        new_transaction: &NewTransaction,
    ) -> Result<(i32, DateTime<Utc>), TransactionRepoError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (id, created_at) = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            "INSERT INTO transactions(user_id, type, category, description, date, amount) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
        )
        .bind(user)
        .bind(new_transaction.transaction_type.as_str())
        .bind(&new_transaction.category)
        .bind(&new_transaction.description)
        .bind(new_transaction.date)
        .bind(new_transaction.amount)
        .fetch_one(db_executor)
        .await
        .context("Unable to insert transaction")?;
        Ok((id, created_at))
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        self.get_transaction_entry(user, transaction_id)
            .await?
            .ok_or(TransactionNotFound(transaction_id))?
            .try_into()
            .map_err(TransactionRepoError::Other)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new(format!(
            "SELECT {} FROM transactions WHERE user_id = ",
            ENTRY_COLUMNS
        ));
        query_builder.push_bind(user);
        if let Some(from) = filter.from {
            query_builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(until) = filter.until {
            query_builder.push(" AND date <= ").push_bind(until);
        }
        if let Some(category) = filter.category {
            query_builder.push(" AND category = ").push_bind(category);
        }
        if let Some(transaction_type) = filter.transaction_type {
            query_builder
                .push(" AND type = ")
                .push_bind(transaction_type.as_str());
        }
        query_builder.push(" ORDER BY date DESC, id DESC");
        if let Some(po) = page_options {
            query_builder
                .push(" OFFSET ")
                .push_bind(po.offset)
                .push(" LIMIT ")
                .push_bind(po.limit);
        }

        let query = query_builder.build_query_as::<TransactionEntry>();
        let transaction_entries: Vec<TransactionEntry> = query
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get transactions for user {}", user))?;

        transaction_entries
            .into_iter()
            .map(|entry| entry.try_into())
            .collect::<Result<Vec<Transaction>, anyhow::Error>>()
            .map_err(TransactionRepoError::Other)
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let (id, created_at) =
            Self::insert_transaction_entry(&self.pool, user, &new_transaction).await?;
        Ok(new_transaction.to_transaction(id, created_at))
    }

    #[instrument(skip(self, new_transactions))]
    async fn create_transactions(
        &self,
        user: &str,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut db_transaction = self
            .pool
            .begin()
            .await
            .context("Unable to start database transaction")?;

        let mut transactions = Vec::with_capacity(new_transactions.len());
        for new_transaction in new_transactions {
            let (id, created_at) =
                Self::insert_transaction_entry(&mut *db_transaction, user, &new_transaction)
                    .await?;
            transactions.push(new_transaction.to_transaction(id, created_at));
        }

        db_transaction
            .commit()
            .await
            .context("Unable to commit database transaction")?;
        Ok(transactions)
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let result = sqlx::query(
            "UPDATE transactions SET type = $1, category = $2, description = $3, date = $4, \
             amount = $5 WHERE user_id = $6 AND id = $7",
        )
        .bind(updated_transaction.transaction_type.as_str())
        .bind(&updated_transaction.category)
        .bind(&updated_transaction.description)
        .bind(updated_transaction.date)
        .bind(updated_transaction.amount)
        .bind(user)
        .bind(transaction_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;
        if result.rows_affected() == 0 {
            return Err(TransactionNotFound(transaction_id));
        }

        self.get_transaction(user, transaction_id).await
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let sql = format!(
            "DELETE FROM transactions WHERE user_id = $1 AND id = $2 RETURNING {}",
            ENTRY_COLUMNS
        );
        let transaction_entry = sqlx::query_as::<_, TransactionEntry>(&sql)
            .bind(user)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to delete transaction {}", transaction_id))?
            .ok_or(TransactionNotFound(transaction_id))?;
        transaction_entry
            .try_into()
            .map_err(TransactionRepoError::Other)
    }
}
