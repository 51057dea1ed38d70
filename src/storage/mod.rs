//! Storage backends behind the repository traits

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::invoices::repositories::{InvoiceRepository, MySqlInvoiceRepository};
use crate::modules::properties::repositories::{MySqlPropertyRepository, PropertyRepository};
use crate::modules::transactions::repositories::{
    MySqlTransactionRepository, TransactionRepository,
};

pub mod memory;

pub use memory::MemoryStore;

/// Which store backs the repositories, chosen with `STORAGE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::MySql => write!(f, "mysql"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// The three repositories of one backend, shared across workers
#[derive(Clone)]
pub struct Storage {
    pub properties: Arc<dyn PropertyRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pool: Option<MySqlPool>,
}

impl Storage {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            properties: Arc::new(MySqlPropertyRepository::new(pool.clone())),
            invoices: Arc::new(MySqlInvoiceRepository::new(pool.clone())),
            transactions: Arc::new(MySqlTransactionRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// A fresh, empty in-process store
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Share an existing in-process store, e.g. one a test has seeded
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            properties: store.clone(),
            invoices: store.clone(),
            transactions: store,
            pool: None,
        }
    }

    pub fn backend(&self) -> StorageBackend {
        if self.pool.is_some() {
            StorageBackend::MySql
        } else {
            StorageBackend::Memory
        }
    }

    /// Check the backing store can serve queries
    pub async fn ping(&self) -> Result<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
