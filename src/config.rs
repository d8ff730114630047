//! Application configuration management.
//!
//! Settings are layered with figment, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `config.toml` in the platform config dir)
//! 3. Environment variables prefixed with `NAMEDUPE_`
//! 4. Command-line flags ([`Config::apply_cli`])
//!
//! ```toml
//! must_confirm_delete = true
//! remove_duplicates = true
//! delete_mode = "trash"
//! workers = 8
//! on_error = "continue"
//! ignore_patterns = ["*.tmp", "node_modules"]
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::DeleteMode;
use crate::cli::ScanArgs;
use crate::duplicates::FinderConfig;
use crate::scanner::{ErrorPolicy, ScanOptions, WalkerConfig};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "NAMEDUPE_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A source could not be parsed or had the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ask before removing each duplicate.
    pub must_confirm_delete: bool,
    /// Remove duplicates (confirmed ones only when `must_confirm_delete` is set).
    pub remove_duplicates: bool,
    /// How removals are carried out.
    pub delete_mode: DeleteMode,
    /// Traversal threads; `None` uses available parallelism.
    pub workers: Option<usize>,
    /// Reaction to unreadable directories.
    pub on_error: ErrorPolicy,
    /// Follow symbolic links to directories.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Gitignore-style patterns to exclude.
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            must_confirm_delete: false,
            remove_duplicates: false,
            delete_mode: DeleteMode::Simulate,
            workers: None,
            on_error: ErrorPolicy::Abort,
            follow_symlinks: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and `NAMEDUPE_` environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any source
    /// fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        if let Some(file) = &file {
            log::debug!("Loading configuration from {}", file.display());
        }
        Self::figment(file.as_deref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Build the provider stack without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "namedupe", "namedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay flags given on the command line.
    ///
    /// Boolean flags can only switch a setting on.
    pub fn apply_cli(&mut self, args: &ScanArgs) {
        self.must_confirm_delete |= args.confirm;
        self.remove_duplicates |= args.remove;
        self.follow_symlinks |= args.follow_symlinks;
        self.skip_hidden |= args.skip_hidden;
        if let Some(mode) = args.delete_mode {
            self.delete_mode = mode.into();
        }
        if let Some(workers) = args.workers {
            self.workers = Some(workers);
        }
        if let Some(policy) = args.on_error {
            self.on_error = policy.into();
        }
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
    }

    /// Scan options derived from this configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.must_confirm_delete, self.remove_duplicates)
    }

    /// Finder configuration derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        let mut walker = WalkerConfig::default()
            .with_error_policy(self.on_error)
            .with_follow_symlinks(self.follow_symlinks)
            .with_skip_hidden(self.skip_hidden)
            .with_ignore_patterns(self.ignore_patterns.clone());
        if let Some(workers) = self.workers {
            walker = walker.with_workers(workers);
        }

        FinderConfig::default()
            .with_options(self.scan_options())
            .with_walker_config(walker)
            .with_delete_mode(self.delete_mode)
    }
}
