//! # Vibefn Core
//!
//! Core library for AI-synthesized function bodies.
//!
//! Declare a function's name, parameters, and docstring; the implementation
//! is fetched from a code-generation backend on demand, cached on disk by a
//! fingerprint of the declared interface, and executed through an embedded
//! Rhai runtime in place of a real body.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vibefn_core::{FnInterface, VibeEngine, VibeConfig};
//!
//! let interface = FnInterface::new("sort")
//!     .with_typed_param("a", "list")
//!     .with_doc("Sort the list in ascending order and print the sorted list.");
//!
//! let engine = VibeEngine::with_config(provider, VibeConfig::default())?;
//! let sorted = engine.invoke(&interface, args).await?;
//! ```

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod executor;
pub mod fingerprint;
pub mod prompt;
pub mod provider;

pub use cache::{BodyCache, LockArena};
pub use config::VibeConfig;
pub use descriptor::{FnInterface, Param};
pub use engine::VibeEngine;
pub use error::{Result, VibeError};
pub use executor::{ExecutionUnit, ScriptRuntime};
pub use fingerprint::Fingerprint;
pub use prompt::Mode;
pub use provider::{BodyProvider, GenerationRequest, GenerationResponse, ProviderConfig};

/// Re-export the embedded script runtime for callers and generated wrappers.
pub use rhai;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        BodyCache, BodyProvider, Fingerprint, FnInterface, GenerationRequest,
        GenerationResponse, Mode, ProviderConfig, Result, VibeConfig, VibeEngine, VibeError,
    };
}
