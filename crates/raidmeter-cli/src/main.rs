mod render;
mod shell;

use anyhow::{Context, anyhow};
use clap::Parser;
use raidmeter_core::{
    config::{PublicConfig, ServiceAccount},
    store::{AccessRules, AdminStore, ClientStore, DocumentCollection, EntryStore},
};
use raidmeter_server::config::ServerConfig;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Record nine-round damage samples and see where they rank.
#[derive(Debug, Parser)]
#[command(name = "raidmeter", version, about)]
struct Args {
    /// Directory holding the entry collection (overrides raidmeter.toml)
    #[arg(long, env = "RAIDMETER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to raidmeter.toml (discovered from the working directory if omitted)
    #[arg(long, env = "RAIDMETER_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds to wait on each store call
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = ServerConfig::resolve(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let timeout = args
        .timeout_secs
        .map_or_else(|| config.request_timeout(), Duration::from_secs);

    let store = open_store(&config.data_dir)?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    shell::Shell::new(runtime, store, timeout)?.run()
}

/// Elevated store when admin credentials exist, else the audience-scoped one.
fn open_store(data_dir: &Path) -> anyhow::Result<Arc<dyn EntryStore>> {
    match ServiceAccount::from_env() {
        Ok(account) => {
            let store = AdminStore::open_documents(&account, data_dir)?;
            info!(project = store.project_id(), "using admin store");

            Ok(Arc::new(store))
        }
        Err(admin_err) => {
            let public = PublicConfig::from_env()
                .map_err(|public_err| anyhow!("no store credentials: {admin_err}; {public_err}"))?;
            let collection = DocumentCollection::open(data_dir, &public.project_id)?;
            let store =
                ClientStore::connect(&public, AccessRules::default(), Arc::new(collection))?;
            info!(project = %public.project_id, "using client store");

            Ok(Arc::new(store))
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
