mod api;
mod auth;
mod config;
mod db;
mod engine;
mod error;
mod models;
mod run;
mod transfer;
mod util;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    let mut db = db::Database::open(&config.db_path)?;

    match args.get(1).map(String::as_str) {
        None | Some("serve") => run::as_server(&config, db),
        Some(_) => run::as_cli(&args, &mut db),
    }
}

/// Logs go to stderr so CLI output on stdout stays clean. `RUST_LOG`
/// overrides the default `info` level.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
