// Rent invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InvoiceStatus, NewRentInvoice, RentInvoice};
pub use repositories::{InvoiceRepository, MySqlInvoiceRepository};
pub use services::{GenerationReport, InvoiceGenerator, InvoiceScheduler, SchedulerHandle};
