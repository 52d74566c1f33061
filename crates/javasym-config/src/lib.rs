//! Session configuration for the symbol solver.
//!
//! A [`SolverConfig`] names the archives and source roots of a session and
//! whether the built-in runtime classes take part. [`SolverConfig::build_solver`]
//! turns it into a solver tree; [`init_tracing`] installs the process-wide
//! log subscriber described by its [`LoggingConfig`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once, OnceLock};

use javasym_resolve::{JarError, JarTypeSolver, JavaParserTypeSolver, ReflectionTypeSolver, SourceError};
use javasym_types::{CombinedTypeSolver, ResolveError, TypeSolver};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

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
    #[error(transparent)]
    Jar(#[from] JarError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` quotes the offending input; keep the message
        // and the byte offset only.
        let message = redact_quoted(err.message().trim());
        match err.span() {
            Some(span) => ConfigError::Toml(format!("{message} (at byte {})", span.start)),
            None => ConfigError::Toml(message),
        }
    }
}

/// Replaces quoted scalars in a decoder message with `<redacted>`.
fn redact_quoted(message: &str) -> String {
    static QUOTED: OnceLock<Option<Regex>> = OnceLock::new();
    let quoted = QUOTED.get_or_init(|| Regex::new(r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#).ok());
    match quoted {
        Some(re) => re.replace_all(message, "\"<redacted>\"").into_owned(),
        None => "invalid config value".to_owned(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Class-file archives, consulted in the listed order.
    #[serde(default)]
    pub jars: Vec<PathBuf>,

    /// Roots of package-structured source trees, consulted after the archives.
    #[serde(default)]
    pub source_roots: Vec<PathBuf>,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Resolve core library classes from the built-in catalogue.
    #[serde(default = "RuntimeConfig::default_enabled")]
    pub enabled: bool,

    /// Qualified-name prefixes the runtime solver may answer; empty means
    /// every name.
    #[serde(default)]
    pub allowed_prefixes: Vec<String>,
}

impl RuntimeConfig {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_prefixes: Vec::new(),
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
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default().add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: a non-empty, valid `RUST_LOG` replaces the
    /// configured level.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        match env_directives {
            Some(directives) => {
                tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| self.config_env_filter())
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

impl SolverConfig {
    /// Loads a TOML config file. Relative paths in it are taken relative to
    /// the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Makes every relative archive and source path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in self.jars.iter_mut().chain(self.source_roots.iter_mut()) {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Builds the session's solver tree: the runtime solver (when enabled),
    /// then one solver per archive, then one per source root.
    pub fn build_solver(&self) -> Result<Arc<CombinedTypeSolver>, ConfigError> {
        let mut children: Vec<Arc<dyn TypeSolver>> = Vec::new();
        if self.runtime.enabled {
            children.push(ReflectionTypeSolver::with_allowed_prefixes(
                self.runtime.allowed_prefixes.clone(),
            ));
        }
        for jar in &self.jars {
            children.push(JarTypeSolver::new(jar)?);
        }
        for root in &self.source_roots {
            children.push(JavaParserTypeSolver::new(root)?);
        }
        tracing::debug!(
            target: "javasym.config",
            runtime = self.runtime.enabled,
            jars = self.jars.len(),
            source_roots = self.source_roots.len(),
            "built solver tree"
        );
        Ok(CombinedTypeSolver::new(children)?)
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber, writing to stderr. Only the first call
/// in a process has an effect.
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
        let installed = tracing_subscriber::registry().with(filter).with(layer).try_init();
        if installed.is_err() {
            // Another subscriber was installed first; leave it in place.
            return;
        }
        tracing::debug!(target: "javasym.config", level = %config.level, json = config.json, "tracing initialised");
    });
}
