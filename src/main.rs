use anyhow::Context;
use clap::Parser;
use config::Config;
use shell::Shell;
use store::Store;
use tracing_subscriber::EnvFilter;

mod compute;
mod config;
mod data;
mod read;
mod shell;
mod store;
mod write;

fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    init_tracing();
    let store = Store::new(&config.store);
    let stdin = std::io::stdin();
    Shell::new(store, &config.currency, stdin.lock(), std::io::stdout())
        .run()
        .with_context(|| format!("expense store {}", config.store.display()))?;
    Ok(())
}

/// Diagnostics go to stderr so they never mix with the menu. `RUST_LOG`
/// overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
