use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) bind_addr: String,
    /// Required to serve; CLI commands run without it.
    pub(crate) jwt_secret: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup("BUDGETWEB_DB").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        let bind_addr = lookup("BUDGETWEB_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let jwt_secret = lookup("JWT_SECRET").filter(|v| !v.is_empty());
        Ok(Self {
            db_path,
            bind_addr,
            jwt_secret,
        })
    }

    pub(crate) fn require_jwt_secret(&self) -> Result<&str> {
        self.jwt_secret
            .as_deref()
            .context("JWT_SECRET must be set to run the server")
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetweb", "BudgetWeb")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budgetweb.db"))
}
