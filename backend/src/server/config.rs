//! Server settings loaded via OrthoConfig and their validated form.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use longbox::domain::{DEFAULT_PANEL_TIMEOUT, DEFAULT_RANK_LIMIT_MAX};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Raw settings from CLI flags, `LONGBOX_*` environment variables, and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LONGBOX")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the in-memory catalogue is used.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Load the demo user, reference data, and sample catalogue.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
    /// File holding the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Session token lifetime. Required.
    pub token_ttl_seconds: Option<i64>,
    /// Upper bound applied to ranked-list limits.
    pub rank_limit_max: Option<u32>,
    /// Per-panel timeout for the dashboard.
    pub dashboard_panel_timeout_ms: Option<u64>,
}

/// Settings that cannot be turned into a runnable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("token_ttl_seconds must be configured")]
    MissingTokenTtl,
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("rank_limit_max must be positive")]
    RankLimitMax,
    #[error("dashboard_panel_timeout_ms must be positive")]
    PanelTimeout,
}

/// Validated configuration consumed by [`super::create_server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) run_migrations: bool,
    pub(crate) seed_demo_data: bool,
    pub(crate) token_secret_file: Option<PathBuf>,
    pub(crate) token_ttl_seconds: i64,
    pub(crate) rank_limit_max: u32,
    pub(crate) panel_timeout: Duration,
}

impl TryFrom<ServerSettings> for ServerConfig {
    type Error = ConfigError;

    fn try_from(settings: ServerSettings) -> Result<Self, Self::Error> {
        let raw_addr = settings
            .bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: raw_addr.clone(),
                source,
            })?;
        let token_ttl_seconds = settings
            .token_ttl_seconds
            .ok_or(ConfigError::MissingTokenTtl)?;
        let rank_limit_max = settings.rank_limit_max.unwrap_or(DEFAULT_RANK_LIMIT_MAX);
        if rank_limit_max == 0 {
            return Err(ConfigError::RankLimitMax);
        }
        let panel_timeout = match settings.dashboard_panel_timeout_ms {
            None => DEFAULT_PANEL_TIMEOUT,
            Some(0) => return Err(ConfigError::PanelTimeout),
            Some(ms) => Duration::from_millis(ms),
        };

        Ok(Self {
            bind_addr,
            database_url: settings.database_url.filter(|url| !url.trim().is_empty()),
            run_migrations: settings.run_migrations,
            seed_demo_data: settings.seed_demo_data,
            token_secret_file: settings.token_secret_file,
            token_ttl_seconds,
            rank_limit_max,
            panel_timeout,
        })
    }
}
