//! The JVM's non-generic type system, plus a small parser for the generic
//! signature grammar used to enrich it.

pub mod field_type;
pub mod method_descriptor;
pub mod signature;

pub use field_type::{FieldType, PrimitiveType};
pub use method_descriptor::{InvalidDescriptor, MethodDescriptor, ReturnType};

/// A class's binary name (slash-separated, e.g. `java/util/List`).
///
/// Distinct from a path: it never carries a `.class` suffix or a
/// filesystem separator quirk, and it is the key every class record in the
/// graph is looked up by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct ClassName(pub String);

impl ClassName {
    /// Wraps a binary name.
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self(binary_name.into())
    }

    /// Returns the binary name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the package portion (everything before the last `/`), or
    /// the empty string for the default package.
    #[must_use]
    pub fn package(&self) -> &str {
        self.0.rfind('/').map_or("", |i| &self.0[..i])
    }
}

impl From<&str> for ClassName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClassName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::borrow::Borrow<str> for ClassName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
