//! Synthesis Engine - orchestrates generation, compilation, and invocation.
//!
//! This module provides the high-level API behind every synthesized call:
//! cache lookup, generation on miss, compile-and-invoke, and failure-driven
//! cache rollback.

use crate::{
    cache::{BodyCache, LockArena},
    executor::ScriptRuntime,
    prompt,
    provider::GenerationRequest,
    BodyProvider, Fingerprint, FnInterface, Result, VibeConfig, VibeError,
};
use rhai::Dynamic;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The main engine for synthesized function calls.
///
/// The provider client is constructed once, at decoration time, and reused
/// across calls. Each call is synchronous from the caller's perspective:
/// one optional backend round-trip plus local filesystem reads/writes.
///
/// # Example
///
/// ```rust,ignore
/// use vibefn_core::{FnInterface, VibeConfig, VibeEngine};
/// use vibefn_ai::OpenAiProvider;
///
/// let provider = OpenAiProvider::from_env()?;
/// let engine = VibeEngine::new(provider)?;
///
/// let interface = FnInterface::new("sort")
///     .with_typed_param("a", "list")
///     .with_doc("Sort the list in ascending order and print the sorted list.");
///
/// let result = engine.invoke(&interface, args).await?;
/// ```
pub struct VibeEngine<P: BodyProvider> {
    /// The generation backend.
    provider: Arc<P>,

    /// Embedded script runtime, shared across calls.
    runtime: ScriptRuntime,

    /// Body cache; present iff `save_money` is enabled.
    cache: Option<BodyCache>,

    /// Per-fingerprint locks, engaged only when `exclusive` is set.
    locks: LockArena,

    /// Configuration fixed at construction.
    config: VibeConfig,
}

impl<P: BodyProvider + 'static> VibeEngine<P> {
    /// Create a new engine with the given provider and default configuration.
    pub fn new(provider: P) -> Result<Self> {
        Self::with_config(provider, VibeConfig::default())
    }

    /// Create an engine with an explicit configuration.
    ///
    /// When `save_money` is enabled the cache directory is created here,
    /// once per configuration, not per call.
    pub fn with_config(provider: P, config: VibeConfig) -> Result<Self> {
        Self::with_config_arc(Arc::new(provider), config)
    }

    /// Create an engine from a shared provider.
    pub fn with_config_arc(provider: Arc<P>, config: VibeConfig) -> Result<Self> {
        let cache = if config.save_money {
            Some(BodyCache::new(&config.cache_dir, &config.cache_ext)?)
        } else {
            None
        };

        Ok(Self {
            provider,
            runtime: ScriptRuntime::new(),
            cache,
            locks: LockArena::new(),
            config,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &VibeConfig {
        &self.config
    }

    /// Invoke the synthesized implementation of `interface` with the
    /// caller's actual arguments.
    ///
    /// Per call: on a cache hit the stored body is used and no generation
    /// request is issued; on a miss (or with caching disabled) a body is
    /// generated with deterministic sampling. The body is compiled under the
    /// declared signature and invoked. A successful invocation commits the
    /// body to the cache; a failed one purges the fingerprint's artifact and
    /// propagates the original error unchanged.
    #[instrument(skip(self, args), fields(function = %interface.name))]
    pub async fn invoke(&self, interface: &FnInterface, args: Vec<Dynamic>) -> Result<Dynamic> {
        let fingerprint = Fingerprint::of(interface);

        let _guard = if self.config.exclusive {
            Some(self.locks.acquire(&fingerprint).await)
        } else {
            None
        };

        let cached = match &self.cache {
            Some(cache) => cache.lookup(&fingerprint)?,
            None => None,
        };

        let body = match cached {
            Some(text) => {
                debug!("cache hit for {}", fingerprint);
                text
            }
            None => self.generate(interface).await?,
        };

        if self.config.debug {
            info!(target: "vibefn::body", "body for `{}`:\n{}", interface.name, body);
        }

        match self.compile_and_invoke(interface, &body, args) {
            Ok(value) => {
                if let Some(cache) = &self.cache {
                    cache.store(&fingerprint, &body)?;
                }
                Ok(value)
            }
            Err(err) => {
                if let Some(cache) = &self.cache {
                    // A failed purge must not mask the original failure.
                    if let Err(purge) = cache.invalidate(&fingerprint) {
                        warn!("failed to purge cached body {}: {}", fingerprint, purge);
                    }
                }
                Err(err)
            }
        }
    }

    /// Blocking wrapper around [`invoke`](Self::invoke).
    ///
    /// Spins up a transient current-thread runtime; must not be called from
    /// inside an async context.
    pub fn invoke_blocking(&self, interface: &FnInterface, args: Vec<Dynamic>) -> Result<Dynamic> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| VibeError::Config(format!("failed to start blocking runtime: {}", e)))?;
        runtime.block_on(self.invoke(interface, args))
    }

    /// Request a fresh body from the generation backend.
    async fn generate(&self, interface: &FnInterface) -> Result<String> {
        debug!("generating body for `{}` with {}", interface.name, self.provider.name());

        let request = GenerationRequest {
            model: self.config.model.clone(),
            instructions: prompt::build_instructions(interface, self.config.mode),
            temperature: 0.0,
        };

        let response = self.provider.generate(request).await?;
        let body = response.body.trim().to_string();

        if body.is_empty() {
            return Err(VibeError::Generation(
                "backend returned an empty completion".to_string(),
            ));
        }

        Ok(body)
    }

    fn compile_and_invoke(
        &self,
        interface: &FnInterface,
        body: &str,
        args: Vec<Dynamic>,
    ) -> Result<Dynamic> {
        let unit = self.runtime.compile(interface, body)?;
        self.runtime.invoke(&unit, args)
    }
}
