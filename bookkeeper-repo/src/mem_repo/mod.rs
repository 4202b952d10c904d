mod session_repo;
mod transaction_repo;
mod user_repo;

use crate::session_repo::SessionRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use std::sync::Arc;

pub use session_repo::MemSessionRepo;
pub use transaction_repo::MemTransactionRepo;
pub use user_repo::MemUserRepo;

pub fn create_repos() -> (
    Arc<dyn UserRepo>,
    Arc<dyn SessionRepo>,
    Arc<dyn TransactionRepo>,
) {
    (
        Arc::new(MemUserRepo::new()),
        Arc::new(MemSessionRepo::new()),
        Arc::new(MemTransactionRepo::new()),
    )
}
