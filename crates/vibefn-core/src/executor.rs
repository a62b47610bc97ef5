//! Runtime compilation and invocation of generated bodies.
//!
//! An execution unit is built per call by embedding the body text as the
//! statements of a synthetic Rhai function whose parameter list is exactly
//! the declared signature. Only the source text is ever cached; the unit
//! itself is transient.

use crate::{FnInterface, Result, VibeError};
use rhai::{Dynamic, Engine, Scope, AST};
use tracing::debug;

/// Name of the synthetic entry function each body is wrapped in.
const ENTRY_FN: &str = "__vibefn_impl";

/// A compiled, callable rendition of one generated body.
#[derive(Debug)]
pub struct ExecutionUnit {
    source: String,
    ast: AST,
}

impl ExecutionUnit {
    /// The synthetic source the unit was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Embedded script runtime shared across calls.
///
/// Construction is cheap but not free; the engine owns one runtime and
/// reuses it for every compile-and-invoke step.
pub struct ScriptRuntime {
    engine: Engine,
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRuntime {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }

    /// Wrap `body` under a synthetic definition matching the declared
    /// parameter list and compile it.
    ///
    /// Every body line is indented under the definition header so the text
    /// forms one function body block, whatever its own indentation.
    pub fn compile(&self, interface: &FnInterface, body: &str) -> Result<ExecutionUnit> {
        let mut source = format!("fn {}({}) {{\n", ENTRY_FN, interface.param_names().join(", "));
        for line in body.lines() {
            source.push_str("    ");
            source.push_str(line);
            source.push('\n');
        }
        source.push('}');

        debug!("compiling synthetic source for `{}`", interface.name);

        let ast = self
            .engine
            .compile(&source)
            .map_err(|e| VibeError::Compile(e.to_string()))?;

        Ok(ExecutionUnit { source, ast })
    }

    /// Invoke a compiled unit with the caller's actual arguments, bound
    /// positionally to the declared parameters.
    pub fn invoke(&self, unit: &ExecutionUnit, args: Vec<Dynamic>) -> Result<Dynamic> {
        let mut scope = Scope::new();
        self.engine
            .call_fn::<Dynamic>(&mut scope, &unit.ast, ENTRY_FN, args)
            .map_err(|e| VibeError::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> ScriptRuntime {
        ScriptRuntime::new()
    }

    fn interface(params: &[&str]) -> FnInterface {
        params
            .iter()
            .fold(FnInterface::new("f"), |acc, p| acc.with_param(*p))
    }

    #[test]
    fn test_compile_and_invoke() {
        let rt = runtime();
        let unit = rt.compile(&interface(&["a", "b"]), "a + b").unwrap();
        assert!(unit.source().starts_with("fn __vibefn_impl(a, b) {"));

        let result = rt
            .invoke(&unit, vec![Dynamic::from(40_i64), Dynamic::from(2_i64)])
            .unwrap();
        assert_eq!(result.as_int().unwrap(), 42);
    }

    #[test]
    fn test_multiline_body_is_indented_into_one_block() {
        let rt = runtime();
        let unit = rt
            .compile(&interface(&["a"]), "let x = a * 2;\nx + 1")
            .unwrap();
        let result = rt.invoke(&unit, vec![Dynamic::from(3_i64)]).unwrap();
        assert_eq!(result.as_int().unwrap(), 7);
    }

    #[test]
    fn test_syntax_error_is_a_compile_failure() {
        let rt = runtime();
        let err = rt.compile(&interface(&["a"]), "let = ;").unwrap_err();
        assert!(matches!(err, VibeError::Compile(_)));
    }

    #[test]
    fn test_runtime_throw_is_an_execution_failure() {
        let rt = runtime();
        let unit = rt.compile(&interface(&["a"]), "throw \"boom\";").unwrap();
        let err = rt.invoke(&unit, vec![Dynamic::from(1_i64)]).unwrap_err();
        assert!(matches!(err, VibeError::Execution(_)));
    }

    #[test]
    fn test_arity_mismatch_is_an_execution_failure() {
        let rt = runtime();
        let unit = rt.compile(&interface(&["a", "b"]), "a + b").unwrap();
        let err = rt.invoke(&unit, vec![Dynamic::from(1_i64)]).unwrap_err();
        assert!(matches!(err, VibeError::Execution(_)));
    }
}
