//! Field, method, and annotation records shared by unlinked and linked
//! class data.

use bitflags::bitflags;

use crate::model::constant::ConstantValue;
use crate::types::signature::TypeSignature;
use crate::types::{ClassName, FieldType, MethodDescriptor};

bitflags! {
    /// Class, field, or method access/modifier bits (`access_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// `ACC_PUBLIC`
        const PUBLIC = 0x0001;
        /// `ACC_PRIVATE`
        const PRIVATE = 0x0002;
        /// `ACC_PROTECTED`
        const PROTECTED = 0x0004;
        /// `ACC_STATIC`
        const STATIC = 0x0008;
        /// `ACC_FINAL`
        const FINAL = 0x0010;
        /// `ACC_SUPER` / `ACC_SYNCHRONIZED`
        const SUPER_OR_SYNCHRONIZED = 0x0020;
        /// `ACC_VOLATILE` / `ACC_BRIDGE`
        const VOLATILE_OR_BRIDGE = 0x0040;
        /// `ACC_TRANSIENT` / `ACC_VARARGS`
        const TRANSIENT_OR_VARARGS = 0x0080;
        /// `ACC_NATIVE`
        const NATIVE = 0x0100;
        /// `ACC_INTERFACE`
        const INTERFACE = 0x0200;
        /// `ACC_ABSTRACT`
        const ABSTRACT = 0x0400;
        /// `ACC_STRICT`
        const STRICT = 0x0800;
        /// `ACC_SYNTHETIC`
        const SYNTHETIC = 0x1000;
        /// `ACC_ANNOTATION`
        const ANNOTATION = 0x2000;
        /// `ACC_ENUM`
        const ENUM = 0x4000;
        /// `ACC_MODULE`
        const MODULE = 0x8000;
    }
}

impl Modifiers {
    /// `true` if the `ACC_PUBLIC` bit is set.
    #[must_use]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }
}

/// One resolved `(name, value)` pair of an [`AnnotationRecord`], plus the
/// annotation record itself: `{annotation-class-name, ordered params}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    /// The annotation interface's binary name.
    pub annotation_class: ClassName,
    /// Parameter name/value pairs, kept sorted by name for determinism.
    pub params: Vec<(String, AnnotationValue)>,
}

impl AnnotationRecord {
    /// Builds a record from an unordered pair list, sorting params by name.
    #[must_use]
    pub fn new(annotation_class: ClassName, mut params: Vec<(String, AnnotationValue)>) -> Self {
        params.sort_by(|a, b| a.0.cmp(&b.0));
        Self { annotation_class, params }
    }
}

/// The tagged-union value of one annotation parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// A pool-expressible primitive or string constant.
    Const(ConstantValue),
    /// A `boolean`, distinguished from [`ConstantValue::Integer`] at the
    /// JVM level but surfaced distinctly for convenience.
    Bool(bool),
    /// A `.class` literal, stored as the referenced type's descriptor.
    Class(FieldType),
    /// An enum constant reference.
    EnumConstant {
        /// The enum type's binary name.
        enum_type: ClassName,
        /// The constant's name.
        const_name: String,
    },
    /// A nested annotation.
    Annotation(Box<AnnotationRecord>),
    /// An array of element values (itself recursively tagged).
    Array(Vec<AnnotationValue>),
}

/// A parsed field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    /// Access/modifier bits.
    pub modifiers: Modifiers,
    /// The field's simple name.
    pub name: String,
    /// The field's non-generic type.
    pub field_type: FieldType,
    /// The raw `Signature` attribute string, if present.
    pub signature: Option<String>,
    /// The resolved generic signature, parsed lazily from `signature`.
    pub parsed_signature: Option<TypeSignature>,
    /// The resolved `static final` initializer, if the scan spec requested
    /// constant indexing and the constant pool could express it.
    pub constant_value: Option<ConstantValue>,
    /// Annotations directly on this field.
    pub annotations: Vec<AnnotationRecord>,
}

/// A parsed method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRecord {
    /// Access/modifier bits.
    pub modifiers: Modifiers,
    /// The method's simple name (`<init>`/`<clinit>` included).
    pub name: String,
    /// The method's non-generic descriptor.
    pub descriptor: MethodDescriptor,
    /// The raw `Signature` attribute string, if present.
    pub signature: Option<String>,
    /// Names of the formal parameters, if a `MethodParameters` attribute
    /// was present.
    pub parameter_names: Vec<Option<String>>,
    /// Annotations on the method itself.
    pub annotations: Vec<AnnotationRecord>,
    /// Annotations on each parameter, indexed the same as
    /// `descriptor.parameter_types`.
    pub parameter_annotations: Vec<Vec<AnnotationRecord>>,
    /// Declared checked exception types.
    pub exceptions: Vec<ClassName>,
}

impl MethodRecord {
    /// The binary name the JVM uses for instance constructors.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The binary name the JVM uses for static initializer blocks.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";
}
