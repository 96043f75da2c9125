//! Merges the per-worker unlinked class records into a frozen [`ClassGraph`].
//! Runs single-threaded, after the worker pool joins.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

use crate::classpath::ClassPathElement;
use crate::error::ScanError;
use crate::log::Diagnostics;
use crate::model::constant::ConstantValue;
use crate::model::record::{AnnotationRecord, AnnotationValue, FieldRecord, Modifiers, MethodRecord};
use crate::model::relation::RelationKind;
use crate::model::unlinked::UnlinkedClassRecord;
use crate::spec::ScanSpec;
use crate::types::ClassName;

use super::record::{ClassRecord, Inner};
use super::ClassGraph;

/// Mutable staging state for one class record, while the merge is underway.
struct Building {
    modifiers: Modifiers,
    is_interface: bool,
    is_annotation: bool,
    is_inherited_meta: bool,
    is_external: bool,
    signature: Option<String>,
    enclosing_method: Option<(ClassName, Option<String>)>,
    origin: Option<ClassPathElement>,
    classloader_providers: Vec<String>,
    fields: Vec<FieldRecord>,
    methods: Vec<MethodRecord>,
    annotations: Vec<AnnotationRecord>,
    annotation_defaults: Vec<(String, AnnotationValue)>,
    constant_values: BTreeMap<String, ConstantValue>,
    relations: BTreeMap<RelationKind, BTreeSet<ClassName>>,
}

impl Building {
    /// A class record known only because something else referenced it.
    fn external() -> Self {
        Self {
            modifiers: Modifiers::empty(),
            is_interface: false,
            is_annotation: false,
            is_inherited_meta: false,
            is_external: true,
            signature: None,
            enclosing_method: None,
            origin: None,
            classloader_providers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            annotation_defaults: Vec::new(),
            constant_values: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }
}

/// Merges `unlinked` records (in arrival order) into a frozen [`ClassGraph`].
///
/// `providers_by_root` maps each classpath element to the classloader
/// providers that surfaced it, so classloader-provider order can be
/// recovered per class without threading it through every classfile.
///
/// # Errors
///
/// [`ScanError::GraphInconsistency`] if two classfiles for the same binary
/// name disagree on their recorded `Signature` attribute.
pub(crate) fn cross_link(
    spec: &Arc<ScanSpec>,
    unlinked: Vec<UnlinkedClassRecord>,
    providers_by_root: &HashMap<ClassPathElement, Vec<String>>,
    diagnostics: &Diagnostics,
) -> Result<ClassGraph, ScanError> {
    let mut graph: BTreeMap<ClassName, Building> = BTreeMap::new();

    for record in unlinked {
        link_one(&mut graph, record, providers_by_root, diagnostics)?;
    }

    let classes = graph
        .into_iter()
        .map(|(name, building)| {
            let record = finish(name.clone(), spec, building);
            (name, record)
        })
        .collect();

    Ok(ClassGraph::new(classes, Arc::clone(spec)))
}

fn link_one(
    graph: &mut BTreeMap<ClassName, Building>,
    record: UnlinkedClassRecord,
    providers_by_root: &HashMap<ClassPathElement, Vec<String>>,
    diagnostics: &Diagnostics,
) -> Result<(), ScanError> {
    let UnlinkedClassRecord {
        name,
        modifiers,
        is_interface,
        is_annotation,
        superclass,
        interfaces,
        signature,
        enclosing_method,
        inner_classes,
        annotations,
        fields,
        methods,
        annotation_defaults,
        origin,
        is_inherited_annotation,
    } = record;

    let providers = providers_by_root.get(&origin).cloned().unwrap_or_default();

    ensure(graph, &name);
    let first_scan = graph[&name].is_external;

    if first_scan {
        let entry = graph.get_mut(&name).expect("just ensured");
        entry.origin = Some(origin.clone());
        entry.signature = signature.clone();
        entry.enclosing_method = enclosing_method.clone();
        entry.constant_values = fields
            .iter()
            .filter_map(|f| f.constant_value.clone().map(|v| (f.name.clone(), v)))
            .collect();
        entry.fields = fields.clone();
        entry.methods = methods.clone();
        entry.annotations = annotations.clone();
        entry.annotation_defaults = annotation_defaults.clone();
    } else {
        let entry = &graph[&name];
        if let (Some(old), Some(new)) = (&entry.signature, &signature) {
            if old != new {
                return Err(ScanError::GraphInconsistency {
                    class_name: name.0.clone(),
                    reason: format!("conflicting Signature attributes: `{old}` vs `{new}`"),
                });
            }
        }
        diagnostics.warn(
            Some(&origin.to_string()),
            Some(name.as_str()),
            format!("duplicate classfile for `{name}`, keeping first-seen origin"),
        );
    }

    {
        let entry = graph.get_mut(&name).expect("just ensured");
        entry.is_external = false;
        entry.modifiers |= modifiers;
        entry.is_interface |= is_interface;
        entry.is_annotation |= is_annotation;
        if is_annotation && is_inherited_annotation {
            entry.is_inherited_meta = true;
        }
        for provider in providers {
            if !entry.classloader_providers.contains(&provider) {
                entry.classloader_providers.push(provider);
            }
        }
    }

    if let Some(superclass) = &superclass {
        add_edge(graph, &name, RelationKind::Superclasses, superclass.clone());
    }
    for iface in &interfaces {
        add_edge(graph, &name, RelationKind::ImplementedInterfaces, iface.clone());
    }
    for ann in &annotations {
        add_edge(graph, &name, RelationKind::ClassAnnotations, ann.annotation_class.clone());
    }
    for field in &fields {
        for ann in &field.annotations {
            add_edge(graph, &name, RelationKind::FieldAnnotations, ann.annotation_class.clone());
        }
    }
    for method in &methods {
        for ann in &method.annotations {
            add_edge(graph, &name, RelationKind::MethodAnnotations, ann.annotation_class.clone());
        }
    }
    for entry in &inner_classes {
        if let Some(outer) = &entry.outer {
            add_edge(graph, outer, RelationKind::ContainsInnerClass, entry.inner.clone());
        }
    }
    if let Some((enclosing_class, _)) = &enclosing_method {
        add_edge(graph, &name, RelationKind::ContainedWithinOuterClass, enclosing_class.clone());
    }

    Ok(())
}

fn ensure(graph: &mut BTreeMap<ClassName, Building>, name: &ClassName) {
    graph.entry(name.clone()).or_insert_with(Building::external);
}

/// Adds `from -relation-> to` and its mirrored reverse edge, creating
/// external stub entries for either side that doesn't exist yet.
fn add_edge(graph: &mut BTreeMap<ClassName, Building>, from: &ClassName, relation: RelationKind, to: ClassName) {
    ensure(graph, from);
    ensure(graph, &to);
    graph
        .get_mut(from)
        .expect("just ensured")
        .relations
        .entry(relation)
        .or_default()
        .insert(to.clone());
    graph
        .get_mut(&to)
        .expect("just ensured")
        .relations
        .entry(relation.reverse())
        .or_default()
        .insert(from.clone());
}

fn finish(name: ClassName, spec: &ScanSpec, b: Building) -> ClassRecord {
    let wants_methods = spec.index_methods || spec.index_method_annotations;
    let fields = (spec.index_fields && !b.is_external).then_some(b.fields);
    let methods = (wants_methods && !b.is_external).then_some(b.methods);
    let annotations = (!b.is_external).then_some(b.annotations);

    ClassRecord {
        inner: Arc::new(Inner {
            name,
            modifiers: b.modifiers,
            is_interface: b.is_interface,
            is_annotation: b.is_annotation,
            is_inherited_meta: b.is_inherited_meta,
            is_external: b.is_external,
            signature: b.signature,
            parsed_signature: OnceLock::new(),
            enclosing_method: b.enclosing_method,
            origin: b.origin,
            classloader_providers: b.classloader_providers,
            fields,
            methods,
            annotations,
            annotation_defaults: b.annotation_defaults,
            constant_values: b.constant_values,
            relations: b.relations,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classpath::ClasspathRootKind;

    fn origin(name: &str) -> ClassPathElement {
        ClassPathElement::new(std::path::PathBuf::from(name), None, ClasspathRootKind::Directory)
    }

    fn minimal(name: &str, superclass: Option<&str>, origin_el: ClassPathElement) -> UnlinkedClassRecord {
        UnlinkedClassRecord {
            name: ClassName::new(name),
            modifiers: Modifiers::PUBLIC,
            is_interface: false,
            is_annotation: false,
            superclass: superclass.map(ClassName::new),
            interfaces: Vec::new(),
            signature: None,
            enclosing_method: None,
            inner_classes: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotation_defaults: Vec::new(),
            origin: origin_el,
            is_inherited_annotation: false,
        }
    }

    #[test]
    fn superclass_edges_are_mirrored() {
        let spec = Arc::new(ScanSpec::builder().build().unwrap());
        let diagnostics = Diagnostics::new();
        let records = vec![
            minimal("com/acme/A", Some("com/acme/B"), origin("root")),
        ];
        let graph = cross_link(&spec, records, &HashMap::new(), &diagnostics).unwrap();

        let a = graph.get(&ClassName::new("com/acme/A")).unwrap();
        assert!(!a.is_external());
        assert!(a.related(RelationKind::Superclasses).contains(&ClassName::new("com/acme/B")));

        let b = graph.get(&ClassName::new("com/acme/B")).unwrap();
        assert!(b.is_external());
        assert!(b.related(RelationKind::Subclasses).contains(&ClassName::new("com/acme/A")));
    }

    #[test]
    fn conflicting_signatures_are_fatal() {
        let spec = Arc::new(ScanSpec::builder().build().unwrap());
        let diagnostics = Diagnostics::new();
        let mut first = minimal("com/acme/A", None, origin("root1"));
        first.signature = Some("LFoo<Ljava/lang/String;>;".to_owned());
        let mut second = minimal("com/acme/A", None, origin("root2"));
        second.signature = Some("LFoo<Ljava/lang/Integer;>;".to_owned());

        let err = cross_link(&spec, vec![first, second], &HashMap::new(), &diagnostics).unwrap_err();
        assert!(matches!(err, ScanError::GraphInconsistency { .. }));
    }

    #[test]
    fn duplicate_classfile_keeps_first_seen_origin() {
        let spec = Arc::new(ScanSpec::builder().build().unwrap());
        let diagnostics = Diagnostics::new();
        let first = minimal("com/acme/A", None, origin("root1"));
        let second = minimal("com/acme/A", None, origin("root2"));

        let graph = cross_link(&spec, vec![first, second], &HashMap::new(), &diagnostics).unwrap();
        let a = graph.get(&ClassName::new("com/acme/A")).unwrap();
        assert_eq!(a.origin().unwrap().canonical_path(), std::path::Path::new("root1"));
        assert!(!diagnostics.is_empty());
    }
}
