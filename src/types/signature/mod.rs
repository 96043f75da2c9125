//! The generic signature grammar (`Signature` attribute) and its parser.
//!
//! This is a small recursive-descent reader over the signature
//! mini-grammar, enough to record type references for queries. It is not a
//! pretty-printer and it does not reconstruct source-level generics syntax.

mod parser;

use crate::types::ClassName;

pub use parser::{parse_class_signature, parse_method_signature, parse_type_signature, SignatureError};

/// A type signature: a primitive, an array, a class reference (with
/// optional type arguments and inner-class continuation), or a type
/// variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// A primitive base type (`B`, `C`, `D`, `F`, `I`, `J`, `S`, `Z`).
    Base(char),
    /// An array of the given element signature.
    Array(Box<TypeSignature>),
    /// A possibly-parameterized class type, e.g. `List<String>` or
    /// `Outer<T>.Inner<U>`.
    Class(ClassTypeSignature),
    /// A reference to a type variable, e.g. `T`.
    TypeVariable(String),
}

/// A class type signature: the class name, its type arguments, and any
/// inner-class continuation (`Outer<T>.Inner<U>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// The binary name of the class.
    pub class_name: ClassName,
    /// The type arguments bound at this level, if any were written.
    pub type_arguments: Vec<TypeArgument>,
    /// A nested inner-class qualifier, e.g. the `.Inner<U>` in `Outer<T>.Inner<U>`.
    pub inner: Option<Box<ClassTypeSignature>>,
}

/// One type argument: a concrete type, a wildcard, or an unbounded `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// An exact type argument.
    Exact(TypeSignature),
    /// `? extends T`.
    Extends(TypeSignature),
    /// `? super T`.
    Super(TypeSignature),
    /// The unbounded wildcard `?`.
    Unbounded,
}

/// A formal type parameter declaration, e.g. `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    /// The type variable's name.
    pub name: String,
    /// The class bound, if any (the part before the first `:` pair with a
    /// class, or the implicit `Object` bound).
    pub class_bound: Option<TypeSignature>,
    /// Additional interface bounds.
    pub interface_bounds: Vec<TypeSignature>,
}

/// A fully parsed class signature (the `Signature` attribute on a class).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    /// Formal type parameters declared by the class itself.
    pub type_parameters: Vec<TypeParameter>,
    /// The superclass signature.
    pub superclass: ClassTypeSignature,
    /// The implemented interface signatures.
    pub superinterfaces: Vec<ClassTypeSignature>,
}

/// A fully parsed method signature (the `Signature` attribute on a method).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Formal type parameters declared by the method itself.
    pub type_parameters: Vec<TypeParameter>,
    /// Parameter type signatures, in order.
    pub parameters: Vec<TypeSignature>,
    /// The return type signature, or `None` for `void`.
    pub return_type: Option<TypeSignature>,
    /// Declared checked exception signatures.
    pub throws: Vec<TypeSignature>,
}
