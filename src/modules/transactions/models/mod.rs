mod payment_transaction;
mod statement;

pub use payment_transaction::{
    NewPaymentTransaction, PaymentTransaction, RecordPayment, LATE_FEE_METHOD,
};
pub use statement::{total_paid, InvoiceStatement, InvoiceStatementResponse, Settlement};
