pub mod late_fee;
pub mod payment_ledger;

pub use late_fee::late_fee;
pub use payment_ledger::{derive_status, settle, PaymentLedger};
