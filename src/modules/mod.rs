pub mod health;
pub mod invoices;
pub mod properties;
pub mod transactions;
