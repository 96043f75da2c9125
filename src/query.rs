//! Reachability and filter queries over a frozen [`ClassGraph`].
//!
//! Every primitive here is a plain read over the graph's relation sets; none
//! of it mutates anything, so these methods are safe to call from any
//! number of threads at once.

use std::collections::BTreeSet;

use crate::graph::{ClassGraph, ClassRecord};
use crate::model::record::AnnotationRecord;
use crate::model::relation::RelationKind;
use crate::types::ClassName;

/// A class-kind filter for [`ClassGraph::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassTypePredicate {
    /// Every class record, regardless of kind.
    All,
    /// Neither an interface nor an annotation type.
    StandardClass,
    /// An interface (including annotation types, which are interfaces at
    /// the bytecode level) — use [`ClassTypePredicate::InterfaceOrAnnotation`]
    /// when annotation types should also pass; plain `Interface` excludes them.
    Interface,
    /// An annotation type.
    Annotation,
    /// Either an interface or an annotation type.
    InterfaceOrAnnotation,
}

impl ClassGraph {
    /// The direct (one-hop) neighbors of `start` under `relation`.
    #[must_use]
    pub fn direct_related(&self, start: &ClassName, relation: RelationKind) -> BTreeSet<ClassName> {
        self.get(start)
            .map(|r| r.related(relation).clone())
            .unwrap_or_default()
    }

    /// The transitive closure of `relation` from `start`, excluding `start`
    /// itself. Cycles are broken by a visited set.
    #[must_use]
    pub fn reachable(&self, start: &ClassName, relation: RelationKind) -> BTreeSet<ClassName> {
        let mut visited = BTreeSet::new();
        let mut frontier: Vec<ClassName> = vec![start.clone()];
        while let Some(current) = frontier.pop() {
            for next in self.direct_related(&current, relation) {
                if visited.insert(next.clone()) {
                    frontier.push(next);
                }
            }
        }
        visited
    }

    /// Both halves of a reachability query: the transitive closure
    /// (excluding `start`) and the direct one-hop neighbors.
    #[must_use]
    pub fn reachable_and_direct(
        &self,
        start: &ClassName,
        relation: RelationKind,
    ) -> (BTreeSet<ClassName>, BTreeSet<ClassName>) {
        (self.reachable(start, relation), self.direct_related(start, relation))
    }

    /// Keeps only the names whose class record matches `predicate`, sorted
    /// by name. Names with no record in the graph are dropped.
    #[must_use]
    pub fn filter<'a, I: IntoIterator<Item = &'a ClassName>>(
        &self,
        names: I,
        predicate: ClassTypePredicate,
    ) -> Vec<ClassName> {
        let mut out: Vec<ClassName> = names
            .into_iter()
            .filter(|name| {
                self.get(name).is_some_and(|record| match predicate {
                    ClassTypePredicate::All => true,
                    ClassTypePredicate::StandardClass => record.is_standard_class(),
                    ClassTypePredicate::Interface => record.is_interface() && !record.is_annotation(),
                    ClassTypePredicate::Annotation => record.is_annotation(),
                    ClassTypePredicate::InterfaceOrAnnotation => {
                        record.is_interface() || record.is_annotation()
                    }
                })
            })
            .cloned()
            .collect();
        out.sort();
        out
    }

    /// Drops blacklisted classes and, unless `enable_external_classes` (and
    /// not `strict_whitelist`) was requested, drops external classes too.
    #[must_use]
    pub fn blacklist_filter<'a, I: IntoIterator<Item = &'a ClassName>>(&self, names: I) -> Vec<ClassName> {
        let keep_external = self.spec.enable_external_classes && !self.spec.strict_whitelist;
        let mut out: Vec<ClassName> = names
            .into_iter()
            .filter(|name| self.spec.accepts_class(name.as_str()))
            .filter(|name| {
                keep_external || !self.get(name).is_some_and(ClassRecord::is_external)
            })
            .cloned()
            .collect();
        out.sort();
        out
    }

    /// Every class directly or (via `@Inherited`) transitively annotated
    /// with `annotation`.
    ///
    /// If `annotation` carries `@Inherited`, every subclass of a directly
    /// annotated standard class is included too — interfaces never extend
    /// `@Inherited` to their implementors.
    #[must_use]
    pub fn classes_with_class_annotation(&self, annotation: &ClassName) -> Vec<ClassName> {
        let direct = self.direct_related(annotation, RelationKind::ClassesWithClassAnnotation);
        let mut out: BTreeSet<ClassName> = direct.clone();

        let inherited = self.get(annotation).is_some_and(ClassRecord::is_inherited_annotation);
        if inherited {
            for class in &direct {
                if self.get(class).is_some_and(ClassRecord::is_standard_class) {
                    out.extend(self.reachable(class, RelationKind::Subclasses));
                }
            }
        }
        out.into_iter().collect()
    }

    /// Every class with at least one method carrying `annotation`, directly
    /// or through a meta-annotation chain (an annotation applied to the
    /// annotation-type declaration itself morphs into an additional
    /// effective method annotation).
    #[must_use]
    pub fn classes_with_method_annotation(&self, annotation: &ClassName) -> Vec<ClassName> {
        self.classes_with_meta_annotated(annotation, RelationKind::ClassesWithMethodAnnotation)
    }

    /// Every class with at least one field carrying `annotation`, directly
    /// or through a meta-annotation chain.
    #[must_use]
    pub fn classes_with_field_annotation(&self, annotation: &ClassName) -> Vec<ClassName> {
        self.classes_with_meta_annotated(annotation, RelationKind::ClassesWithFieldAnnotation)
    }

    fn classes_with_meta_annotated(&self, annotation: &ClassName, relation: RelationKind) -> Vec<ClassName> {
        let mut out = BTreeSet::new();
        for annotation_type in self.meta_annotation_closure(annotation) {
            out.extend(self.direct_related(&annotation_type, relation));
        }
        out.into_iter().collect()
    }

    /// `{annotation}` plus every annotation type that carries `annotation`
    /// as a meta-annotation, directly or transitively (i.e. the reverse
    /// closure of [`RelationKind::ClassAnnotations`] restricted to
    /// annotation-type nodes).
    fn meta_annotation_closure(&self, annotation: &ClassName) -> BTreeSet<ClassName> {
        let mut closure = BTreeSet::new();
        closure.insert(annotation.clone());
        let mut frontier = vec![annotation.clone()];
        while let Some(current) = frontier.pop() {
            for user in self.direct_related(&current, RelationKind::ClassesWithClassAnnotation) {
                if self.get(&user).is_some_and(ClassRecord::is_annotation) && closure.insert(user.clone()) {
                    frontier.push(user);
                }
            }
        }
        closure
    }

    /// Annotations on `class` itself, plus any `@Inherited` annotation
    /// carried by an ancestor (walking the `Superclasses` chain).
    #[must_use]
    pub fn annotations_on(&self, class: &ClassName) -> Vec<ClassName> {
        let mut out: BTreeSet<ClassName> = self.direct_related(class, RelationKind::ClassAnnotations);

        let mut visited: BTreeSet<ClassName> = BTreeSet::new();
        visited.insert(class.clone());
        let mut current = class.clone();
        while let Some(superclass) = self.direct_related(&current, RelationKind::Superclasses).iter().next().cloned()
        {
            if !visited.insert(superclass.clone()) {
                break;
            }
            for ann in self.direct_related(&superclass, RelationKind::ClassAnnotations) {
                if self.get(&ann).is_some_and(ClassRecord::is_inherited_annotation) {
                    out.insert(ann);
                }
            }
            current = superclass;
        }
        out.into_iter().collect()
    }

    /// The full [`AnnotationRecord`] values on `class`, for callers that
    /// want parameter data rather than just the annotation type names
    /// returned by [`ClassGraph::annotations_on`].
    #[must_use]
    pub fn annotation_records_on<'a>(&'a self, class: &ClassName) -> &'a [AnnotationRecord] {
        self.get(class).and_then(ClassRecord::annotations).unwrap_or(&[])
    }
}
