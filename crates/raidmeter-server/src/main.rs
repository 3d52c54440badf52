use anyhow::Context;
use clap::Parser;
use raidmeter_core::{config::ServiceAccount, obs::StoreCounters, store::AdminStore};
use raidmeter_server::{AppState, config::ServerConfig, router};
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// HTTP API for recording and ranking damage samples.
#[derive(Debug, Parser)]
#[command(name = "raidmeter-server", version, about)]
struct Args {
    /// Path to raidmeter.toml (discovered from the working directory if omitted)
    #[arg(long, env = "RAIDMETER_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = ServerConfig::resolve(args.config.as_deref())?;
    let account = ServiceAccount::from_env().context("loading admin store credentials")?;

    let counters = Arc::new(StoreCounters::new());
    let store = AdminStore::open_documents(&account, &config.data_dir)?.with_sink(counters.clone());
    let state = AppState::new(Arc::new(store), counters.clone(), config.request_timeout());

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, data_dir = %config.data_dir.display(), "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let report = counters.snapshot();
    info!(?report, "store counters at shutdown");

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "cannot listen for ctrl-c; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
