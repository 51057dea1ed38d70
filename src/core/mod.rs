pub mod billing;
pub mod error;
pub mod money;

pub use billing::BillingPeriod;
pub use error::{AppError, Result};
pub use money::{validate_amount, MAX_AMOUNT};
