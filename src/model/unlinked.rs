//! The record a single worker produces from one classfile, before
//! cross-linking.

use crate::classpath::ClassPathElement;
use crate::model::record::{AnnotationRecord, AnnotationValue, FieldRecord, Modifiers, MethodRecord};
use crate::types::ClassName;

/// A pairing of an inner class with its outer class, as recorded by the
/// `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassEntry {
    /// The inner (nested) class.
    pub inner: ClassName,
    /// The outer class, if the inner class is a member of one (`None` for
    /// anonymous/local classes with no enclosing *class* — see
    /// `enclosing_method` instead).
    pub outer: Option<ClassName>,
}

/// One classfile's worth of parsed, not-yet-linked data.
///
/// Produced by [`crate::classfile::parse_class`], owned by the worker until
/// the cross-linker merges it into the frozen graph.
#[derive(Debug, Clone)]
pub struct UnlinkedClassRecord {
    /// The class's own binary name.
    pub name: ClassName,
    /// Class-level access/modifier bits.
    pub modifiers: Modifiers,
    /// `true` if `ACC_INTERFACE` is set.
    pub is_interface: bool,
    /// `true` if `ACC_ANNOTATION` is set.
    pub is_annotation: bool,
    /// The superclass, absent only for `java/lang/Object`.
    pub superclass: Option<ClassName>,
    /// Directly implemented/extended interfaces.
    pub interfaces: Vec<ClassName>,
    /// The raw `Signature` attribute string, if present.
    pub signature: Option<String>,
    /// The enclosing method, for anonymous/local classes (`EnclosingMethod`
    /// attribute).
    pub enclosing_method: Option<(ClassName, Option<String>)>,
    /// Inner-class containment pairs this class's `InnerClasses` table
    /// declares (including itself, if it is the inner one).
    pub inner_classes: Vec<InnerClassEntry>,
    /// Annotations on the class itself.
    pub annotations: Vec<AnnotationRecord>,
    /// Field records, present iff `index_fields` was requested.
    pub fields: Vec<FieldRecord>,
    /// Method records, present iff `index_methods` (or method-annotation
    /// indexing) was requested.
    pub methods: Vec<MethodRecord>,
    /// Default values for annotation-type members, keyed by member name.
    /// Only populated when the class itself is an annotation type.
    pub annotation_defaults: Vec<(String, AnnotationValue)>,
    /// The classpath element this class was discovered under.
    pub origin: ClassPathElement,
    /// Whether the class has the `@Inherited` meta-annotation on itself
    /// (meaningful only when this class is itself an annotation type).
    pub is_inherited_annotation: bool,
}
