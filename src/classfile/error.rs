//! The classfile parser's error type.

use crate::classfile::constant_pool::BadConstantPoolIndex;
use crate::types::method_descriptor::InvalidDescriptor;

/// A classfile could not be parsed.
///
/// A failure here is scoped to a single classfile: the caller logs it as a
/// diagnostic and moves on to the next entry, it never aborts the whole scan.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed reading from the underlying byte source.
    #[error("failed to read classfile bytes: {0}")]
    ReadFail(#[from] std::io::Error),
    /// The buffer did not start with the `CAFEBABE` magic number.
    #[error("not a class file: bad magic number")]
    NotAClassFile,
    /// The major/minor version is not one this parser recognizes.
    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version.
        major: u16,
        /// Minor version.
        minor: u16,
    },
    /// The classfile violated a structural invariant beyond a bad version
    /// or magic number.
    #[error("malformed class file: {0}")]
    MalformedClassFile(&'static str),
    /// A constant pool index did not point at an entry of the expected kind.
    #[error("expected {expected} constant pool entry, found {found}")]
    MismatchedConstantPoolEntryType {
        /// The kind of entry that was expected.
        expected: &'static str,
        /// The kind of entry that was actually found.
        found: &'static str,
    },
    /// A constant pool index was out of range or pointed at a padding slot.
    #[error(transparent)]
    BadConstantPoolIndex(#[from] BadConstantPoolIndex),
    /// A descriptor string (field or method) did not parse.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] InvalidDescriptor),
    /// A string that should have been modified UTF-8 / CESU-8 was not.
    #[error("invalid modified UTF-8 string")]
    BrokenUtf8,
    /// The element-value tag of an annotation parameter was not recognized.
    #[error("invalid annotation element tag {0:#x}")]
    InvalidElementValueTag(u8),
    /// There was trailing data after a structure that should have been
    /// fully consumed.
    #[error("unexpected trailing data")]
    UnexpectedData,
    /// A constant pool entry's tag byte was not one of the known tags.
    #[error("unexpected constant pool tag {0}")]
    UnexpectedConstantPoolTag(u8),
}
