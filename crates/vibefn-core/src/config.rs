//! # Vibefn Configuration
//!
//! Engine configuration, fixed at decoration time. Passed explicitly to the
//! engine constructor — there is no ambient, process-wide cache directory.

use crate::Mode;
use std::env;
use std::path::PathBuf;

/// Configuration for a synthesis engine.
///
/// # Example
/// ```rust
/// use vibefn_core::{Mode, VibeConfig};
///
/// // Load from environment
/// let config = VibeConfig::from_env();
///
/// // Or customize
/// let config = VibeConfig::default()
///     .with_mode(Mode::Chaotic)
///     .with_save_money(false);
/// ```
#[derive(Debug, Clone)]
pub struct VibeConfig {
    /// Model identifier passed opaquely to the generation backend.
    /// Default: "gpt-4.1-mini", Env: VIBEFN_MODEL
    pub model: String,

    /// Generation style selector.
    /// Default: serious, Env: VIBEFN_MODE=chaotic
    pub mode: Mode,

    /// Cache generated bodies on disk to avoid repeated backend calls.
    /// When disabled, every call regenerates and nothing is persisted.
    /// Default: true, Env: VIBEFN_SAVE_MONEY=false
    pub save_money: bool,

    /// Surface the raw generated body before execution, for inspection.
    /// Default: false, Env: VIBEFN_DEBUG=true
    pub debug: bool,

    /// Backend endpoint override.
    /// Default: none, Env: VIBEFN_ENDPOINT
    pub endpoint: Option<String>,

    /// Root directory for cached bodies.
    /// Default: ".vibefn_cache", Env: VIBEFN_CACHE_DIR
    pub cache_dir: PathBuf,

    /// File extension for cached bodies.
    pub cache_ext: String,

    /// Serialize concurrent calls with the same fingerprint through a
    /// per-fingerprint mutex. Off by default; the baseline contract is
    /// lock-free with last-write-wins artifacts.
    /// Default: false, Env: VIBEFN_EXCLUSIVE=true
    pub exclusive: bool,
}

impl Default for VibeConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            mode: Mode::Serious,
            save_money: true,
            debug: false,
            endpoint: None,
            cache_dir: PathBuf::from(".vibefn_cache"),
            cache_ext: "rhai".to_string(),
            exclusive: false,
        }
    }
}

impl VibeConfig {
    /// Create a new config from environment variables.
    /// Falls back to defaults for missing variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("VIBEFN_MODEL") {
            config.model = v;
        }
        if let Ok(v) = env::var("VIBEFN_MODE") {
            if let Ok(mode) = v.parse() {
                config.mode = mode;
            }
        }
        if let Ok(v) = env::var("VIBEFN_SAVE_MONEY") {
            config.save_money = v.to_lowercase() != "false" && v != "0";
        }
        if let Ok(v) = env::var("VIBEFN_DEBUG") {
            config.debug = v.to_lowercase() == "true" || v == "1";
        }
        if let Ok(v) = env::var("VIBEFN_ENDPOINT") {
            config.endpoint = Some(v);
        }
        if let Ok(v) = env::var("VIBEFN_CACHE_DIR") {
            config.cache_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("VIBEFN_EXCLUSIVE") {
            config.exclusive = v.to_lowercase() == "true" || v == "1";
        }

        config
    }

    /// Builder: set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: set the generation mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: enable or disable the body cache.
    pub fn with_save_money(mut self, enabled: bool) -> Self {
        self.save_money = enabled;
        self
    }

    /// Builder: enable or disable body echoing.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Builder: set the backend endpoint override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Builder: set the cache root directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Builder: serialize same-fingerprint calls.
    pub fn with_exclusive(mut self, enabled: bool) -> Self {
        self.exclusive = enabled;
        self
    }
}
