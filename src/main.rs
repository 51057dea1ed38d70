use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentroll::app::AppServices;
use rentroll::config::{Config, LogFormat};
use rentroll::invoices::InvoiceScheduler;
use rentroll::middleware::{ErrorHandler, RequestIdHeader};
use rentroll::storage::{Storage, StorageBackend};

fn init_tracing(level: &str, format: LogFormat) {
    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("rentroll={},actix_web=info", level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app.log_level, config.app.log_format);
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        env = %config.app.env,
        storage = %config.storage,
        "Starting Rentroll rent invoicing service"
    );

    let storage = match (config.storage, &config.database) {
        (StorageBackend::MySql, Some(database)) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;

            tracing::info!(
                "Database pool initialized ({} connections)",
                database.pool_size
            );

            if database.run_migrations {
                database
                    .migrate(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations applied");
            }

            Storage::mysql(pool)
        }
        (StorageBackend::MySql, None) => {
            anyhow::bail!("MySQL storage selected without database configuration")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Storage::memory()
        }
    };

    let services = AppServices::new(storage, config.scheduler.lookahead_days);

    let scheduler = if config.scheduler.enabled {
        Some(InvoiceScheduler::new(services.generator.clone(), &config.scheduler).spawn())
    } else {
        tracing::info!("Rent invoice scheduler disabled");
        None
    };

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let app_services = services.clone();
    let server = HttpServer::new(move || {
        let services = app_services.clone();
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestIdHeader)
            .wrap(TracingLogger::default())
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    let result = server.await;

    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    result.context("HTTP server error")
}
