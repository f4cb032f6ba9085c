//! Club bracket server.
//!
//! Serves the participant registry and tournament brackets over HTTP,
//! backed by PostgreSQL or, with `--in-memory`, by process memory.

use std::net::SocketAddr;

use anyhow::{Context, Error};
use club_bracket::{Database, MemoryStore, Repositories};
use club_server::{
    api,
    config::{DEFAULT_BIND, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use tokio::sync::watch;
use tracing::info;

const HELP: &str = "\
Run the club bracket server

USAGE:
  club_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/club_bracket]

FLAGS:
  --in-memory              Keep all data in process memory (lost on exit)
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size (and DB_MIN_CONNECTIONS, DB_CONNECTION_TIMEOUT,
                           DB_IDLE_TIMEOUT, DB_MAX_LIFETIME)
  CLUB_EDIT_CODE           Code required in x-edit-code for participant and
                           tournament edits (at least 4 characters)
  WIN_CREDIT_POLICY        legacy | reconciled  [default: reconciled]
  METRICS_BIND             Prometheus listener address (e.g., 127.0.0.1:9090)
  RUST_LOG                 Log filter
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    in_memory: bool,
}

fn parse_args() -> Result<Args, Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs
            .opt_value_from_str("--bind")
            .with_context(|| format!("--bind expects IP:PORT, e.g. {DEFAULT_BIND}"))?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        in_memory: pargs.contains("--in-memory"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}", remaining);
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args = parse_args()?;

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.in_memory)?;
    config.validate()?;

    // Ctrl-C and SIGTERM start a graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    })?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics listening on http://{}/metrics", addr);
    }

    let (repos, db) = if config.in_memory {
        info!("Using in-memory store; data is lost on exit");
        (Repositories::from_store(MemoryStore::new()), None)
    } else {
        info!("Connecting to database");
        let db = Database::new(&config.database)
            .await
            .context("Failed to connect to database")?;
        db.apply_schema()
            .await
            .context("Failed to apply database schema")?;
        info!("Database connected successfully");
        (Repositories::postgres(db.pool().clone()), Some(db))
    };

    if config.edit_code.is_none() {
        tracing::warn!("CLUB_EDIT_CODE is not set; participant and tournament edits are open");
    }
    info!("Win credit policy: {}", config.win_credit_policy);

    let state = api::AppState::new(&repos, config.win_credit_policy, config.edit_code.clone());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = db {
        db.close().await;
    }

    Ok(())
}

/// Resolves once the signal handler has fired
async fn shutdown_signal(mut rx: watch::Receiver<bool>) {
    // A closed channel means the handler is gone; shut down as well
    let _ = rx.wait_for(|stop| *stop).await;
}
