//! `typebind.toml` configuration and logging setup.

use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};

use parking_lot::ReentrantMutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypebindConfig {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where type tables come from and how strictly they are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// TOML type tables, loaded in order. Relative paths are resolved against the directory of
    /// the config file when it is loaded from disk.
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Pre-register `java.lang.Object`, `String`, `Integer`, `List`, ... before loading tables.
    #[serde(default = "TableConfig::default_minimal_jdk")]
    pub minimal_jdk: bool,

    /// Intern classes referenced by signatures but never declared, instead of failing the load.
    #[serde(default)]
    pub allow_unknown: bool,
}

impl TableConfig {
    fn default_minimal_jdk() -> bool {
        true
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            minimal_jdk: Self::default_minimal_jdk(),
            allow_unknown: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level, with `RUST_LOG` merged in when set.
    ///
    /// Invalid directives fall back to `RUST_LOG` alone, then to the configured level, then to
    /// `info`.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message without the source snippet `Display` would add.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl TypebindConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file; relative table paths are made relative to the file's directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::load_from_str(&text)?;
        if let Some(base) = path.parent() {
            config.table.rebase(base);
        }
        Ok(config)
    }
}

impl TableConfig {
    fn rebase(&mut self, base: &Path) {
        for path in &mut self.paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

pub const TYPEBIND_CONFIG_ENV_VAR: &str = "TYPEBIND_CONFIG";

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Run `f` while holding the config environment lock.
///
/// Tests that set [`TYPEBIND_CONFIG_ENV_VAR`] wrap the mutation and the discovery that observes it
/// in this helper so concurrent discovery in other tests does not see the override.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Discover the configuration file for `root`.
///
/// Search order:
/// 1) `TYPEBIND_CONFIG` (absolute or relative to `root`)
/// 2) `typebind.toml` in `root`
/// 3) `.typebind.toml` in `root`
/// 4) `.typebind/config.toml` in `root`
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(TYPEBIND_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["typebind.toml", ".typebind.toml", ".typebind/config.toml"]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Load the configuration for `root`.
///
/// If no config is present, returns [`TypebindConfig::default`] and `None`.
pub fn load_for_root(root: &Path) -> Result<(TypebindConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((TypebindConfig::default(), None));
    };

    let config = TypebindConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber, writing to stderr.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let layer: Box<dyn Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        if tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .is_err()
        {
            // Another subscriber was installed first (e.g. by a test harness).
            return;
        }
        tracing::debug!(target: "typebind.config", level = %config.level, "tracing initialized");
    });
}
