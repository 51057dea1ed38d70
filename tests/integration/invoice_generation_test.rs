// Invoice generation: idempotence, look-ahead window, current period

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rentroll::core::{AppError, BillingPeriod};
use rentroll::invoices::InvoiceStatus;
use rust_decimal_macros::dec;

#[actix_web::test]
async fn test_generate_is_idempotent_per_period() {
    let fixture = TestFixture::new().await;
    let unit = fixture.add_unit("1A", dec!(1200), 1).await;
    let period = BillingPeriod::new(2024, 3).unwrap();

    let first = fixture.services.generator.generate(&unit, period).await.unwrap();
    let second = fixture.services.generator.generate(&unit, period).await.unwrap();

    let invoice = first.expect("First run should create an invoice");
    assert!(second.is_none());
    assert_eq!(invoice.due_date, date(2024, 3, 1));
    assert_eq!(invoice.amount, dec!(1200));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);

    let invoices = fixture.storage.invoices.list_for_unit(unit.id).await.unwrap();
    assert_eq!(invoices.len(), 1);
}

#[actix_web::test]
async fn test_generate_uses_current_rent() {
    let fixture = TestFixture::new().await;
    let unit = fixture.add_unit("1A", dec!(1200), 15).await;

    let updated = fixture
        .storage
        .properties
        .update_unit(unit.id, &unit_fields("1A", dec!(1275.50), 15))
        .await
        .unwrap();

    let invoice = fixture
        .services
        .generator
        .generate(&updated, BillingPeriod::new(2024, 6).unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(invoice.amount, dec!(1275.50));
    assert_eq!(invoice.due_date, date(2024, 6, 15));
}

#[actix_web::test]
async fn test_lookahead_generates_due_today_plus_five() {
    let fixture = TestFixture::new().await;
    // Next due date is 2024-02-01, exactly five days after today
    let unit = fixture.add_unit("2B", dec!(950), 1).await;
    let today = date(2024, 1, 27);

    let report = fixture.services.generator.generate_upcoming(today).await.unwrap();

    assert_eq!(report.period, "2024-02");
    assert_eq!(report.created_count(), 1);
    assert_eq!(report.created[0].unit_id, unit.id);
    assert_eq!(report.created[0].due_date, date(2024, 2, 1));
}

#[actix_web::test]
async fn test_lookahead_skips_due_today_plus_six() {
    let fixture = TestFixture::new().await;
    let unit = fixture.add_unit("2B", dec!(950), 1).await;
    let today = date(2024, 1, 26);

    let report = fixture.services.generator.generate_upcoming(today).await.unwrap();

    assert_eq!(report.created_count(), 0);
    assert_eq!(report.not_yet_due, 1);

    let period = BillingPeriod::new(2024, 2).unwrap();
    let existing = fixture
        .storage
        .invoices
        .find_for_period(unit.id, period)
        .await
        .unwrap();
    assert!(existing.is_none());
}

#[actix_web::test]
async fn test_lookahead_runs_exactly_once_across_days() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("3C", dec!(1000), 1).await;

    let mut created = 0;
    for day in 20..=31 {
        let report = fixture
            .services
            .generator
            .generate_upcoming(date(2024, 1, day))
            .await
            .unwrap();
        created += report.created_count();
    }

    assert_eq!(created, 1);
    assert_eq!(fixture.store.counts().await.1, 1);
}

#[actix_web::test]
async fn test_lookahead_covers_every_property() {
    let fixture = TestFixture::new().await;
    let other = fixture.add_property("Cedar Court").await;
    fixture.add_unit("1", dec!(800), 1).await;
    fixture.add_unit_to(other.id, "A", dec!(900), 2).await;
    fixture.add_unit_to(other.id, "B", dec!(900), 20).await;

    let report = fixture
        .services
        .generator
        .generate_upcoming(date(2024, 1, 28))
        .await
        .unwrap();

    assert_eq!(report.units_considered, 3);
    assert_eq!(report.created_count(), 2);
    assert_eq!(report.not_yet_due, 1);
}

#[actix_web::test]
async fn test_lookahead_rolls_into_january() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("4D", dec!(1000), 3).await;

    let report = fixture
        .services
        .generator
        .generate_upcoming(date(2024, 12, 29))
        .await
        .unwrap();

    assert_eq!(report.period, "2025-01");
    assert_eq!(report.created[0].due_date, date(2025, 1, 3));
}

#[actix_web::test]
async fn test_current_period_generation_for_property() {
    let fixture = TestFixture::new().await;
    let other = fixture.add_property("Cedar Court").await;
    let a = fixture.add_unit("1", dec!(800), 1).await;
    let b = fixture.add_unit("2", dec!(850), 31).await;
    fixture.add_unit_to(other.id, "X", dec!(700), 1).await;

    let report = fixture
        .services
        .generator
        .generate_current_period(fixture.property.id, date(2024, 4, 12))
        .await
        .unwrap();

    assert_eq!(report.period, "2024-04");
    assert_eq!(report.units_considered, 2);
    assert_eq!(report.created_count(), 2);

    let b_invoice = report.created.iter().find(|i| i.unit_id == b.id).unwrap();
    assert_eq!(b_invoice.due_date, date(2024, 4, 30));
    assert!(report.created.iter().any(|i| i.unit_id == a.id));

    // Units of other properties are untouched
    assert_eq!(fixture.store.counts().await.1, 2);

    let rerun = fixture
        .services
        .generator
        .generate_current_period(fixture.property.id, date(2024, 4, 20))
        .await
        .unwrap();
    assert_eq!(rerun.created_count(), 0);
    assert_eq!(rerun.already_invoiced, 2);
}

#[actix_web::test]
async fn test_current_period_unknown_property_is_not_found() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("1", dec!(800), 1).await;

    let result = fixture
        .services
        .generator
        .generate_current_period(9999, date(2024, 4, 12))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(fixture.store.counts().await.1, 0);
}

#[actix_web::test]
async fn test_current_period_with_no_units_creates_nothing() {
    let fixture = TestFixture::new().await;

    let report = fixture
        .services
        .generator
        .generate_current_period(fixture.property.id, date(2024, 4, 12))
        .await
        .unwrap();

    assert_eq!(report.units_considered, 0);
    assert_eq!(report.created_count(), 0);
}
