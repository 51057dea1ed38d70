mod transaction_repository;

pub use transaction_repository::{MySqlTransactionRepository, Settle, TransactionRepository};
