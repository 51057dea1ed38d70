pub mod invoice_generator;
pub mod invoice_scheduler;

pub use invoice_generator::{GenerationReport, InvoiceGenerator, DEFAULT_LOOKAHEAD_DAYS};
pub use invoice_scheduler::{InvoiceScheduler, SchedulerHandle};
