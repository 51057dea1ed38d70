//! Rentroll rent invoicing and payment reconciliation library
//!
//! Issues monthly rent invoices for rental units, records tenant payments
//! against them with a late-fee policy, and runs the daily invoicing job.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod storage;

// Re-export commonly used types
pub use app::AppServices;
pub use modules::invoices;
pub use modules::properties;
pub use modules::transactions;
pub use storage::{MemoryStore, Storage, StorageBackend};
