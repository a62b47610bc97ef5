//! Function interface descriptors.
//!
//! A descriptor captures the declared shape of a synthesized function — name,
//! ordered parameters, annotations, and docstring. It is built once at
//! decoration time and never mutated; every cache key and every generation
//! prompt derives from it.

use serde::{Deserialize, Serialize};

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,

    /// Optional type annotation, stored as written.
    pub annotation: Option<String>,
}

/// The immutable declared shape of a synthesized function.
///
/// # Example
///
/// ```
/// use vibefn_core::FnInterface;
///
/// let interface = FnInterface::new("sort")
///     .with_typed_param("a", "list")
///     .with_doc("Sort the list in ascending order and print the sorted list.");
/// assert_eq!(interface.signature(), "(a: list)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FnInterface {
    /// Function name.
    pub name: String,

    /// Ordered parameter list.
    pub params: Vec<Param>,

    /// Declared return annotation, if any.
    pub ret: Option<String>,

    /// Free-text docstring describing the contract.
    pub doc: String,
}

impl FnInterface {
    /// Create a descriptor for the given function name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
            doc: String::new(),
        }
    }

    /// Append an unannotated parameter.
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            annotation: None,
        });
        self
    }

    /// Append a parameter with a type annotation.
    pub fn with_typed_param(
        mut self,
        name: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        self.params.push(Param {
            name: name.into(),
            annotation: Some(annotation.into()),
        });
        self
    }

    /// Set the declared return annotation.
    pub fn with_return(mut self, ret: impl Into<String>) -> Self {
        self.ret = Some(ret.into());
        self
    }

    /// Set the docstring.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Names of the declared parameters, in order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Canonical rendering of the parameter signature.
    ///
    /// Pure function of the field values: `(a: list, b) -> list`. Stable
    /// across processes — no addresses, no unordered iteration.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| match &p.annotation {
                Some(ann) => format!("{}: {}", p.name, ann),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        match &self.ret {
            Some(ret) => format!("({}) -> {}", params, ret),
            None => format!("({})", params),
        }
    }

    /// Canonical rendering of the annotation mapping, in declaration order,
    /// with the return annotation last: `{a: list, return: list}`.
    pub fn annotations(&self) -> String {
        let mut entries: Vec<String> = self
            .params
            .iter()
            .filter_map(|p| {
                p.annotation
                    .as_ref()
                    .map(|ann| format!("{}: {}", p.name, ann))
            })
            .collect();

        if let Some(ret) = &self.ret {
            entries.push(format!("return: {}", ret));
        }

        format!("{{{}}}", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_rendering() {
        let interface = FnInterface::new("sort").with_typed_param("a", "list");
        assert_eq!(interface.signature(), "(a: list)");

        let interface = FnInterface::new("merge")
            .with_typed_param("a", "list")
            .with_param("b")
            .with_return("list");
        assert_eq!(interface.signature(), "(a: list, b) -> list");

        let interface = FnInterface::new("noop");
        assert_eq!(interface.signature(), "()");
    }

    #[test]
    fn test_annotation_rendering() {
        let interface = FnInterface::new("merge")
            .with_typed_param("a", "list")
            .with_param("b")
            .with_return("list");
        assert_eq!(interface.annotations(), "{a: list, return: list}");

        let interface = FnInterface::new("noop").with_param("x");
        assert_eq!(interface.annotations(), "{}");
    }

    #[test]
    fn test_param_names_in_order() {
        let interface = FnInterface::new("f")
            .with_param("first")
            .with_typed_param("second", "int");
        assert_eq!(interface.param_names(), vec!["first", "second"]);
    }
}
