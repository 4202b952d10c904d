mod session_repo;
mod transaction_repo;
mod user_repo;

use crate::session_repo::SessionRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct SQLxRepo {
    pool: Pool<Postgres>,
}

pub async fn create_repos(
    database_url: &str,
    max_pool_size: u32,
) -> Result<
    (
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn TransactionRepo>,
    ),
    anyhow::Error,
> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    let repo = SQLxRepo { pool };
    Ok((
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo),
    ))
}
