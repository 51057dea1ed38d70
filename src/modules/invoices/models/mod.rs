mod rent_invoice;

pub use rent_invoice::{InvoiceStatus, NewRentInvoice, RentInvoice};
