//! Generation-mode instruction templates.
//!
//! The mode determines only the content of the instructions handed to the
//! generation backend, never the control flow of a call.

use crate::{FnInterface, VibeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generation style selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Correct, runnable implementation matching the docstring contract.
    #[default]
    Serious,

    /// Deliberately whimsical but still runnable implementation.
    Chaotic,
}

impl FromStr for Mode {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "serious" => Ok(Mode::Serious),
            "chaotic" => Ok(Mode::Chaotic),
            other => Err(VibeError::Config(format!("unknown mode '{}'", other))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Serious => f.write_str("serious"),
            Mode::Chaotic => f.write_str("chaotic"),
        }
    }
}

/// Build the instruction string for one generation request.
///
/// Embeds the function name, full parameter signature, annotation mapping,
/// and docstring under a mode-specific preamble. The backend is asked for
/// the body only — no `fn` header, no markdown fences — so the text can be
/// embedded verbatim under the synthetic definition.
pub fn build_instructions(interface: &FnInterface, mode: Mode) -> String {
    let preamble = match mode {
        Mode::Serious => {
            "You are a Rhai scripting expert. Write ONLY the function body \
             (no fn header, no markdown fences) in Rhai script for:"
        }
        Mode::Chaotic => {
            "You are a humorous and creative Rhai scripter. Write ONLY the \
             function body (no fn header, no markdown fences) in Rhai script for:"
        }
    };

    let closing = match mode {
        Mode::Serious => {
            "Make sure the code runs correctly in Rhai and that the final \
             expression evaluates to the result."
        }
        Mode::Chaotic => {
            "Make it funny and unexpected, but still runnable Rhai script \
             whose final expression evaluates to the result."
        }
    };

    format!(
        "{preamble}\nFunction name: {name}\nSignature: {name}{signature}\n\
         Annotations: {annotations}\nDocstring: {doc}\n{closing}",
        name = interface.name,
        signature = interface.signature(),
        annotations = interface.annotations(),
        doc = interface.doc,
    )
}
