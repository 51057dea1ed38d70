// Daily invoicing job: run_once entry point and background lifecycle

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveTime, Timelike, Utc};
use helpers::*;
use rentroll::config::SchedulerConfig;
use rentroll::invoices::{InvoiceGenerator, InvoiceScheduler};
use rust_decimal_macros::dec;

// Wide enough that every unit's next due date is in range whatever today is
const WHOLE_MONTH_LOOKAHEAD: u32 = 62;

fn generator(fixture: &TestFixture) -> Arc<InvoiceGenerator> {
    Arc::new(InvoiceGenerator::new(
        fixture.storage.properties.clone(),
        fixture.storage.invoices.clone(),
        WHOLE_MONTH_LOOKAHEAD,
    ))
}

/// A run time over an hour away, so only the startup run fires during a test
fn config(run_on_startup: bool) -> SchedulerConfig {
    let later = (Utc::now().time().hour() + 2) % 24;
    SchedulerConfig {
        enabled: true,
        run_at: NaiveTime::from_hms_opt(later, 0, 0).unwrap(),
        run_on_startup,
        lookahead_days: WHOLE_MONTH_LOOKAHEAD,
    }
}

#[tokio::test]
async fn test_run_once_is_idempotent() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("1A", dec!(1000), 1).await;
    fixture.add_unit("1B", dec!(1000), 31).await;

    let scheduler = InvoiceScheduler::new(generator(&fixture), &config(false));

    let first = scheduler.run_once().await.unwrap();
    let second = scheduler.run_once().await.unwrap();

    assert_eq!(first.created_count(), 2);
    assert_eq!(second.created_count(), 0);
    assert_eq!(second.already_invoiced, 2);
    assert_eq!(fixture.store.counts().await.1, 2);
}

#[tokio::test]
async fn test_run_once_targets_next_month() {
    let fixture = TestFixture::new().await;
    let unit = fixture.add_unit("1A", dec!(1000), 15).await;

    let scheduler = InvoiceScheduler::new(generator(&fixture), &config(false));
    let report = scheduler.run_once().await.unwrap();

    let next = rentroll::core::BillingPeriod::containing(Utc::now().date_naive()).next();
    assert_eq!(report.period, next.to_string());
    assert_eq!(report.created[0].unit_id, unit.id);
    assert_eq!(report.created[0].due_date, next.due_date(15).unwrap());
}

#[tokio::test]
async fn test_spawned_scheduler_runs_on_startup_and_stops() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("1A", dec!(1000), 5).await;
    fixture.add_unit("1B", dec!(1000), 20).await;

    let handle = InvoiceScheduler::new(generator(&fixture), &config(true)).spawn();

    let mut invoiced = 0;
    for _ in 0..200 {
        invoiced = fixture.store.counts().await.1;
        if invoiced == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(invoiced, 2);
    assert!(!handle.is_finished());

    tokio::time::timeout(Duration::from_secs(5), handle.stop())
        .await
        .expect("Scheduler did not stop");
}

#[tokio::test]
async fn test_spawned_scheduler_without_startup_run_is_idle() {
    let fixture = TestFixture::new().await;
    fixture.add_unit("1A", dec!(1000), 5).await;

    let handle = InvoiceScheduler::new(generator(&fixture), &config(false)).spawn();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(fixture.store.counts().await.1, 0);
    handle.stop().await;
}
