use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, NewTransaction, PageOptions, Transaction, TransactionRepo, TransactionRepoError,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    transactions: HashMap<i32, Transaction>,
    user_transactions: HashMap<String, HashSet<i32>>,
    next_id: i32,
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            user_transactions: HashMap::new(),
            next_id: 0,
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemTransactionRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_locked(
    write_guard: &mut RwLockWriteGuard<State>,
    user: &str,
    new_transaction: NewTransaction,
) -> Transaction {
    let id = write_guard.next_id;
    write_guard.next_id += 1;

    let transaction = new_transaction.to_transaction(id, Utc::now());

    write_guard.transactions.insert(id, transaction.clone());
    write_guard
        .user_transactions
        .entry(user.to_owned())
        .or_default()
        .insert(id);

    transaction
}

#[async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as user_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(user) else {
            return Ok(Vec::new());
        };

        let mut transactions: Vec<Transaction> = transaction_ids
            .iter()
            .map(|id| {
                read_guard
                    .transactions
                    .get(id)
                    .expect("transactions should have all the ids from user_transactions")
            })
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.cmp(a));

        let mut transactions: Box<dyn Iterator<Item = Transaction>> =
            Box::new(transactions.into_iter());
        if let Some(from) = filter.from {
            transactions = Box::new(transactions.filter(move |t| t.date >= from));
        }
        if let Some(until) = filter.until {
            transactions = Box::new(transactions.filter(move |t| t.date <= until));
        }
        if let Some(category) = filter.category {
            transactions = Box::new(transactions.filter(move |t| t.category == category));
        }
        if let Some(transaction_type) = filter.transaction_type {
            transactions =
                Box::new(transactions.filter(move |t| t.transaction_type == transaction_type));
        }

        if let Some(page_options) = page_options {
            transactions = Box::new(
                transactions
                    .skip(page_options.offset as usize)
                    .take(page_options.limit as usize),
            );
        }

        Ok(transactions.collect())
    }

    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;
        Ok(insert_locked(&mut write_guard, user, new_transaction))
    }

    async fn create_transactions(
        &self,
        user: &str,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;
        let transactions = new_transactions
            .into_iter()
            .map(|t| insert_locked(&mut write_guard, user, t))
            .collect();
        Ok(transactions)
    }

    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get(user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        };

        let entry = write_guard.transactions.entry(transaction_id);
        if let Entry::Occupied(mut e) = entry {
            let created_at = e.get().created_at;
            let transaction = updated_transaction.to_transaction(transaction_id, created_at);
            e.insert(transaction.clone());
            Ok(transaction)
        } else {
            Err(TransactionNotFound(transaction_id))
        }
    }

    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get_mut(user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.remove(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = write_guard
            .transactions
            .remove(&transaction_id)
            .expect("transactions should contain same ids as user_transactions");
        Ok(transaction)
    }
}
