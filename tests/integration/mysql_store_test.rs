// MySQL repositories against a real database
//
// Run with TEST_DATABASE_URL set: cargo test --test mysql_store_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rentroll::app::AppServices;
use rentroll::core::{AppError, BillingPeriod};
use rentroll::invoices::{InvoiceStatus, NewRentInvoice};
use rentroll::properties::NewProperty;
use rentroll::storage::Storage;
use rentroll::transactions::RecordPayment;
use rust_decimal_macros::dec;
use uuid::Uuid;

async fn seeded_storage() -> (Storage, AppServices, i64) {
    let storage = Storage::mysql(create_test_pool().await);
    let services = AppServices::new(storage.clone(), 5);

    let llc = storage
        .properties
        .create_llc(&format!("Test LLC {}", Uuid::new_v4().simple()))
        .await
        .unwrap();
    let property = storage
        .properties
        .create_property(&NewProperty {
            llc_id: llc.id,
            name: "Test Property".to_string(),
            address: "1 Test St".to_string(),
        })
        .await
        .unwrap();

    (storage, services, property.id)
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_unique_key_skips_duplicate_invoices() {
    let (storage, _, property_id) = seeded_storage().await;
    let unit = storage
        .properties
        .create_unit(property_id, &unit_fields("M1", dec!(1000), 31))
        .await
        .unwrap();

    let invoice = NewRentInvoice::new(unit.id, date(2024, 4, 30), dec!(1000)).unwrap();
    let first = storage.invoices.insert_missing(&[invoice.clone()]).await.unwrap();
    let second = storage
        .invoices
        .insert_missing(&[invoice.clone(), invoice])
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let found = storage
        .invoices
        .find_for_period(unit.id, BillingPeriod::new(2024, 4).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first[0].id);
    assert_eq!(found.status, InvoiceStatus::Unpaid);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_insert_for_missing_unit_is_not_found() {
    let (storage, _, _) = seeded_storage().await;
    let invoice = NewRentInvoice::new(i64::MAX, date(2024, 4, 30), dec!(1000)).unwrap();

    let result = storage.invoices.insert_missing(&[invoice]).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_payment_is_posted_atomically() {
    let (storage, services, property_id) = seeded_storage().await;
    let unit = storage
        .properties
        .create_unit(property_id, &unit_fields("M2", dec!(1000), 10))
        .await
        .unwrap();
    let invoice = storage
        .invoices
        .insert_missing(&[NewRentInvoice::new(unit.id, date(2024, 1, 10), dec!(1000)).unwrap()])
        .await
        .unwrap()
        .remove(0);

    let statement = services
        .ledger
        .record_payment(RecordPayment {
            rent_invoice_id: invoice.id,
            amount: dec!(1000),
            payment_date: date(2024, 1, 20),
            payment_method: "Check".to_string(),
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(statement.invoice.status, InvoiceStatus::Late);
    assert_eq!(statement.transactions.len(), 2);

    let reloaded = services.ledger.statement(invoice.id).await.unwrap();
    assert_eq!(reloaded, statement);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_delete_unit_cascades_in_mysql() {
    let (storage, services, property_id) = seeded_storage().await;
    let unit = storage
        .properties
        .create_unit(property_id, &unit_fields("M3", dec!(1000), 10))
        .await
        .unwrap();
    let invoice = storage
        .invoices
        .insert_missing(&[NewRentInvoice::new(unit.id, date(2024, 1, 10), dec!(1000)).unwrap()])
        .await
        .unwrap()
        .remove(0);
    services
        .ledger
        .record_payment(RecordPayment {
            rent_invoice_id: invoice.id,
            amount: dec!(400),
            payment_date: date(2024, 1, 5),
            payment_method: "Cash".to_string(),
            notes: Some("deposit".to_string()),
        })
        .await
        .unwrap();

    storage.properties.delete_unit(unit.id).await.unwrap();

    assert!(storage.properties.find_unit(unit.id).await.unwrap().is_none());
    assert!(storage.invoices.find_by_id(invoice.id).await.unwrap().is_none());
    assert!(storage
        .transactions
        .list_for_invoice(invoice.id)
        .await
        .unwrap()
        .is_empty());
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_ping_reaches_database() {
    let (storage, _, _) = seeded_storage().await;
    assert!(storage.ping().await.is_ok());
}
