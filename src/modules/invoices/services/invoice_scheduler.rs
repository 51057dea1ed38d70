use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDateTime, NaiveTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::invoice_generator::{GenerationReport, InvoiceGenerator};
use crate::config::SchedulerConfig;
use crate::core::Result;

/// Background job issuing next month's rent invoices once a day.
///
/// Runs are idempotent, so a missed day is caught up by the next run as
/// long as the due date is still inside the look-ahead window. A failed
/// run is logged and the job waits for its next slot; nothing is retried.
pub struct InvoiceScheduler {
    generator: Arc<InvoiceGenerator>,
    run_at: NaiveTime,
    run_on_startup: bool,
}

impl InvoiceScheduler {
    pub fn new(generator: Arc<InvoiceGenerator>, config: &SchedulerConfig) -> Self {
        Self {
            generator,
            run_at: config.run_at,
            run_on_startup: config.run_on_startup,
        }
    }

    /// Generate upcoming invoices for today's UTC date
    pub async fn run_once(&self) -> Result<GenerationReport> {
        let today = Utc::now().date_naive();
        self.generator.generate_upcoming(today).await
    }

    /// Start the job on the tokio runtime. The returned handle stops it.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));

        SchedulerHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            run_at = %self.run_at,
            lookahead_days = self.generator.lookahead_days(),
            "Starting rent invoice scheduler"
        );

        if self.run_on_startup {
            self.tick().await;
        }

        loop {
            let wait = until_next_run(Utc::now().naive_utc(), self.run_at);

            tokio::select! {
                _ = tokio::time::sleep(wait) => self.tick().await,
                changed = shutdown.changed() => {
                    // A dropped sender also means shut down
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Rent invoice scheduler stopped");
    }

    async fn tick(&self) {
        match self.run_once().await {
            Ok(report) => {
                if report.created_count() > 0 {
                    info!(
                        period = %report.period,
                        created = report.created_count(),
                        "Scheduled invoice run complete"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Scheduled invoice run failed");
            }
        }
    }
}

/// Handle to a running [`InvoiceScheduler`]
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the job to stop and wait for it. A run already in progress
    /// finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Rent invoice scheduler task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Time from `now` until the next occurrence of `run_at` (UTC). A run time
/// equal to `now` is scheduled for the following day.
pub fn until_next_run(now: NaiveDateTime, run_at: NaiveTime) -> Duration {
    let today_run = now.date().and_time(run_at);
    let next = if today_run > now {
        today_run
    } else {
        now.date()
            .checked_add_days(Days::new(1))
            .map(|tomorrow| tomorrow.and_time(run_at))
            .unwrap_or(today_run)
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}
