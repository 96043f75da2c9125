//! Scenario 1: a directory root with a class, its superclass, an
//! implemented interface, and a class-level annotation.

mod support;

use jclassindex::model::RelationKind;
use jclassindex::types::ClassName;
use jclassindex::{scan, ScanSpec};
use support::{init_tracing, ClassBuilder, ScratchDir};

#[test]
fn whitelisted_class_links_to_external_superclass_and_interface() {
    init_tracing();
    let dir = ScratchDir::new("directory-scan");
    std::fs::create_dir_all(dir.join("com/acme")).unwrap();
    let bytes = ClassBuilder::new("com/acme/A")
        .superclass("com/acme/B")
        .interface("com/acme/I")
        .marker_annotation("com/acme/Dep")
        .build();
    std::fs::write(dir.join("com/acme/A.class"), bytes).unwrap();

    let spec = ScanSpec::builder()
        .with_whitelist_packages(["com/acme/"])
        .with_override_classpath([dir.path.to_string_lossy().into_owned()])
        .enable_external_classes(true)
        .enable_annotation_info(true)
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    let graph = &result.graph;

    let a = ClassName::new("com/acme/A");
    let b = ClassName::new("com/acme/B");
    let i = ClassName::new("com/acme/I");
    let dep = ClassName::new("com/acme/Dep");

    assert!(!graph.get(&a).unwrap().is_external());
    assert!(graph.get(&b).unwrap().is_external());
    assert!(graph.get(&i).unwrap().is_external());
    assert!(graph.get(&dep).unwrap().is_external());

    assert_eq!(graph.direct_related(&a, RelationKind::Superclasses), [b.clone()].into_iter().collect());
    assert_eq!(graph.direct_related(&b, RelationKind::Subclasses), [a.clone()].into_iter().collect());
    assert_eq!(graph.direct_related(&a, RelationKind::ClassAnnotations), [dep].into_iter().collect());
    assert_eq!(graph.direct_related(&a, RelationKind::ImplementedInterfaces), [i].into_iter().collect());
}

#[test]
fn empty_whitelist_match_yields_an_empty_graph_not_a_failure() {
    init_tracing();
    let dir = ScratchDir::new("directory-scan-empty");
    std::fs::create_dir_all(dir.join("com/other")).unwrap();
    std::fs::write(dir.join("com/other/Z.class"), ClassBuilder::new("com/other/Z").build()).unwrap();

    let spec = ScanSpec::builder()
        .with_whitelist_packages(["com/acme/"])
        .with_override_classpath([dir.path.to_string_lossy().into_owned()])
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    assert!(result.graph.is_empty());
}
