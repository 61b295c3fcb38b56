use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "hub.db";

#[derive(Parser, Debug, Default)]
#[command(name = "writers-hub", about = "A small content-publishing hub for writers")]
pub struct Cli {
    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Where the database and config live (defaults to ~/.writers-hub)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub session_hours: u64,
    /// Upper bound on the per-request session lookup before a view
    /// is answered with the wait page.
    pub resolve_timeout_ms: u64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "hub_session".to_string(),
            session_hours: 24 * 30,
            resolve_timeout_ms: 2000,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("auth.cookie_name {:?} is not a valid cookie name", self.cookie_name);
        }
        if self.session_hours == 0 {
            bail!("auth.session_hours must be at least 1");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("auth.bcrypt_cost must be between 4 and 31");
        }
        Ok(())
    }
}

impl Config {
    /// Layer the config file (if any) under the command-line flags.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli)?;
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        config
            .database
            .path
            .get_or_insert_with(|| data_dir.join(DB_FILE));

        config.auth.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
        if let Some(ref dir) = cli.data_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".writers-hub"))
            .context("Could not determine home directory")
    }

    /// Falls back to the working directory for configs built without `load`.
    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DB_FILE))
    }
}
