//! Barrel + Verse API server.
//!
//! Serves the booking backend: session-cookie auth, the course and
//! experience catalogues, and purchase recording.
//!
//! # Storage selection
//!
//! Exactly one backend is active per process, chosen here at startup:
//!
//! - `BV_DATABASE_URL` (or `DATABASE_URL`) set - `PostgreSQL` storage and
//!   `PostgreSQL`-backed sessions.
//! - unset - volatile in-memory storage and sessions. Development only;
//!   production refuses to start without a database (enforced in config).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barrel_verse_api::config::{Config, Environment};
use barrel_verse_api::middleware::session_layer;
use barrel_verse_api::routes;
use barrel_verse_api::state::AppState;
use barrel_verse_api::storage::{self, MemoryStorage, PgStorage};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let environment = match config.environment {
        Environment::Development => "development",
        Environment::Production => "production",
    };

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Borrowed(environment)),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Build the router over whichever storage the configuration selects.
async fn build_app(config: Config) -> Router {
    match config.database_url.clone() {
        Some(database_url) => {
            let pool = storage::create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Application migrations are NOT run automatically on
            // startup. Run them explicitly via:
            //   cargo run -p barrel-verse-cli -- migrate

            // The session table is the store's own concern; it manages its
            // schema itself.
            let session_store = PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .expect("Failed to prepare session table");

            let state = AppState::new(config.clone(), Arc::new(PgStorage::new(pool)));
            routes::app(state, session_layer(session_store, &config))
        }
        None => {
            tracing::warn!(
                "No database URL configured; using the volatile in-memory store \
                 (all data is lost on restart)"
            );

            let state = AppState::new(config.clone(), Arc::new(MemoryStorage::new()));
            routes::app(state, session_layer(MemoryStore::default(), &config))
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "barrel_verse_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let addr = config.socket_addr();

    let app = build_app(config)
        .await
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
