//! Deterministic cache keys for function interfaces.

use crate::FnInterface;
use sha2::{Digest, Sha256};
use std::fmt;

/// A fixed-width hex digest of a function's declared interface.
///
/// Equal descriptors always produce equal fingerprints across process
/// restarts; a change to any field produces a different digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a descriptor.
    ///
    /// Digest input is name, canonical signature, docstring, and the
    /// canonical annotation mapping. Fields are separated by a unit
    /// separator so free-text docstrings cannot bleed into the adjacent
    /// renderings.
    pub fn of(interface: &FnInterface) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(interface.name.as_bytes());
        hasher.update([0x1f]);
        hasher.update(interface.signature().as_bytes());
        hasher.update([0x1f]);
        hasher.update(interface.doc.as_bytes());
        hasher.update([0x1f]);
        hasher.update(interface.annotations().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// The digest as lowercase hex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FnInterface {
        FnInterface::new("sort")
            .with_typed_param("a", "list")
            .with_doc("Sort the list in ascending order and print the sorted list.")
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(Fingerprint::of(&base()), Fingerprint::of(&base()));
        assert_eq!(Fingerprint::of(&base()).as_str().len(), 64);
    }

    #[test]
    fn test_every_field_changes_the_digest() {
        let reference = Fingerprint::of(&base());

        let renamed = FnInterface { name: "sorted".into(), ..base() };
        assert_ne!(Fingerprint::of(&renamed), reference);

        let other_param = FnInterface::new("sort")
            .with_typed_param("items", "list")
            .with_doc(base().doc);
        assert_ne!(Fingerprint::of(&other_param), reference);

        let other_annotation = FnInterface::new("sort")
            .with_typed_param("a", "Vec<i64>")
            .with_doc(base().doc);
        assert_ne!(Fingerprint::of(&other_annotation), reference);

        let other_doc = base().with_doc("Sort the list in descending order.");
        assert_ne!(Fingerprint::of(&other_doc), reference);

        let with_return = base().with_return("list");
        assert_ne!(Fingerprint::of(&with_return), reference);
    }

    #[test]
    fn test_unannotated_param_still_keyed_by_name() {
        let a = FnInterface::new("f").with_param("a");
        let b = FnInterface::new("f").with_param("b");
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
    }
}
