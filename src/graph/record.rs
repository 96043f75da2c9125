//! The linked, frozen per-class record that makes up the nodes of a
//! [`super::ClassGraph`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use crate::classpath::ClassPathElement;
use crate::model::constant::ConstantValue;
use crate::model::record::{AnnotationRecord, AnnotationValue, FieldRecord, Modifiers, MethodRecord};
use crate::model::relation::RelationKind;
use crate::types::signature::{parse_class_signature, ClassSignature, SignatureError};
use crate::types::ClassName;

/// A class, interface, or annotation type in the frozen [`super::ClassGraph`].
///
/// Cheaply cloned (an `Arc` underneath), the same way [`ClassPathElement`] is
/// — query results hand out owned `ClassRecord`s rather than references tied
/// to the graph's lifetime.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub(super) inner: Arc<Inner>,
}

#[derive(Debug)]
pub(super) struct Inner {
    pub(super) name: ClassName,
    pub(super) modifiers: Modifiers,
    pub(super) is_interface: bool,
    pub(super) is_annotation: bool,
    pub(super) is_inherited_meta: bool,
    pub(super) is_external: bool,
    pub(super) signature: Option<String>,
    pub(super) parsed_signature: OnceLock<Result<ClassSignature, SignatureError>>,
    pub(super) enclosing_method: Option<(ClassName, Option<String>)>,
    pub(super) origin: Option<ClassPathElement>,
    pub(super) classloader_providers: Vec<String>,
    pub(super) fields: Option<Vec<FieldRecord>>,
    pub(super) methods: Option<Vec<MethodRecord>>,
    pub(super) annotations: Option<Vec<AnnotationRecord>>,
    pub(super) annotation_defaults: Vec<(String, AnnotationValue)>,
    pub(super) constant_values: BTreeMap<String, ConstantValue>,
    pub(super) relations: BTreeMap<RelationKind, BTreeSet<ClassName>>,
}

impl ClassRecord {
    /// The class's binary name.
    #[must_use]
    pub fn name(&self) -> &ClassName {
        &self.inner.name
    }

    /// Class-level access/modifier bits, OR-merged across every occurrence
    /// seen during cross-linking.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.inner.modifiers
    }

    /// `true` if this is an interface (and not also an annotation type).
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.inner.is_interface
    }

    /// `true` if this is an annotation type.
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.inner.is_annotation
    }

    /// `true` for a "standard class": neither an interface nor an
    /// annotation type.
    #[must_use]
    pub fn is_standard_class(&self) -> bool {
        !self.inner.is_interface && !self.inner.is_annotation
    }

    /// `true` if this annotation type itself carries the meta-annotation
    /// `java.lang.annotation.Inherited`. Meaningless for non-annotation
    /// classes.
    #[must_use]
    pub fn is_inherited_annotation(&self) -> bool {
        self.inner.is_inherited_meta
    }

    /// `true` iff this class was only ever *referenced* (as a superclass,
    /// interface, annotation, etc.) and never itself parsed from a
    /// classfile during the scan.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.inner.is_external
    }

    /// The raw `Signature` attribute string, if the classfile carried one.
    #[must_use]
    pub fn raw_signature(&self) -> Option<&str> {
        self.inner.signature.as_deref()
    }

    /// The parsed generic class signature, computed and cached on first
    /// access.
    ///
    /// Returns `Ok(None)` if the class carries no `Signature` attribute at
    /// all, and `Err` if the raw string failed to parse (the raw string
    /// remains available from [`ClassRecord::raw_signature`] either way).
    pub fn signature(&self) -> Result<Option<&ClassSignature>, &SignatureError> {
        let Some(raw) = &self.inner.signature else {
            return Ok(None);
        };
        self.inner
            .parsed_signature
            .get_or_init(|| parse_class_signature(raw))
            .as_ref()
            .map(Some)
    }

    /// The enclosing method of an anonymous/local class, if any
    /// (`EnclosingMethod` attribute).
    #[must_use]
    pub fn enclosing_method(&self) -> Option<(&ClassName, Option<&str>)> {
        self.inner
            .enclosing_method
            .as_ref()
            .map(|(class, method)| (class, method.as_deref()))
    }

    /// The classpath element this class was first discovered under, absent
    /// for external (never-scanned) classes.
    #[must_use]
    pub fn origin(&self) -> Option<&ClassPathElement> {
        self.inner.origin.as_ref()
    }

    /// Classloader providers that contributed this class's origin, merged
    /// in first-seen order across every classpath element it was
    /// encountered under.
    #[must_use]
    pub fn classloader_providers(&self) -> &[String] {
        &self.inner.classloader_providers
    }

    /// Field records, present iff `index_fields` was requested and this
    /// class was directly scanned.
    #[must_use]
    pub fn fields(&self) -> Option<&[FieldRecord]> {
        self.inner.fields.as_deref()
    }

    /// Method records, present iff `index_methods` (or method-annotation
    /// indexing) was requested and this class was directly scanned.
    #[must_use]
    pub fn methods(&self) -> Option<&[MethodRecord]> {
        self.inner.methods.as_deref()
    }

    /// Annotations directly on the class itself.
    #[must_use]
    pub fn annotations(&self) -> Option<&[AnnotationRecord]> {
        self.inner.annotations.as_deref()
    }

    /// Default values declared by this annotation type's members, keyed by
    /// member name. Empty unless this class is itself an annotation type.
    #[must_use]
    pub fn annotation_defaults(&self) -> &[(String, AnnotationValue)] {
        &self.inner.annotation_defaults
    }

    /// The resolved `static final` constant initializer for `field_name`,
    /// if constant indexing was requested and the constant pool could
    /// express it.
    #[must_use]
    pub fn constant_value(&self, field_name: &str) -> Option<&ConstantValue> {
        self.inner.constant_values.get(field_name)
    }

    /// Every field name this class has a recorded constant initializer for.
    #[must_use]
    pub fn constant_values(&self) -> &BTreeMap<String, ConstantValue> {
        &self.inner.constant_values
    }

    /// The direct neighbors of this class under `relation`, sorted by name.
    #[must_use]
    pub fn related(&self, relation: RelationKind) -> &BTreeSet<ClassName> {
        static EMPTY: BTreeSet<ClassName> = BTreeSet::new();
        self.inner.relations.get(&relation).unwrap_or(&EMPTY)
    }
}

impl PartialEq for ClassRecord {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for ClassRecord {}

impl PartialOrd for ClassRecord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassRecord {
    /// Class records compare (and therefore sort) by name alone.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.name.cmp(&other.inner.name)
    }
}
