use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "NeuroReport";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_EXPORT_CONCURRENCY: usize = 2;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
/// How often idle sessions are swept.
pub const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

const BIND_ENV: &str = "NEUROREPORT_BIND";
const EXPORT_DIR_ENV: &str = "NEUROREPORT_EXPORT_DIR";
const EXPORT_CONCURRENCY_ENV: &str = "NEUROREPORT_EXPORT_CONCURRENCY";
const SESSION_IDLE_ENV: &str = "NEUROREPORT_SESSION_IDLE_SECS";

/// Get the application data directory
/// ~/NeuroReport/ on all platforms, falling back to the working directory
/// when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the default exports directory
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "neuroreport=info,neuroreport_lib=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub exports_dir: PathBuf,
    pub export_concurrency: usize,
    /// Sessions untouched this long are dropped.
    pub session_idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            exports_dir: exports_dir(),
            export_concurrency: DEFAULT_EXPORT_CONCURRENCY,
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(bind) = get(BIND_ENV) {
            config.bind = bind.trim().parse().map_err(|_| ConfigError::Invalid {
                var: BIND_ENV,
                value: bind.clone(),
            })?;
        }
        if let Some(dir) = get(EXPORT_DIR_ENV) {
            config.exports_dir = PathBuf::from(dir);
        }
        if let Some(n) = get(EXPORT_CONCURRENCY_ENV) {
            let parsed = n.trim().parse::<usize>().ok().filter(|&n| n > 0);
            config.export_concurrency = parsed.ok_or(ConfigError::Invalid {
                var: EXPORT_CONCURRENCY_ENV,
                value: n,
            })?;
        }
        if let Some(secs) = get(SESSION_IDLE_ENV) {
            let parsed = secs.trim().parse::<u64>().ok().filter(|&s| s > 0);
            config.session_idle_timeout =
                Duration::from_secs(parsed.ok_or(ConfigError::Invalid {
                    var: SESSION_IDLE_ENV,
                    value: secs,
                })?);
        }
        Ok(config)
    }
}
