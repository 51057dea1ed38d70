// Payment transactions and the ledger that posts them

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InvoiceStatement, PaymentTransaction, RecordPayment, LATE_FEE_METHOD};
pub use repositories::{MySqlTransactionRepository, TransactionRepository};
pub use services::PaymentLedger;
