//! Scenario 2: an archive whose manifest `Class-Path` header pulls in a
//! second archive sitting next to it on disk.

mod support;

use jclassindex::types::ClassName;
use jclassindex::{scan, ScanSpec};
use support::{init_tracing, ClassBuilder, ScratchDir, write_jar};

#[test]
fn manifest_class_path_entry_is_resolved_relative_to_the_jar() {
    init_tracing();
    let dir = ScratchDir::new("manifest-class-path");
    std::fs::create_dir_all(dir.join("lib")).unwrap();

    write_jar(
        &dir.join("lib/x.jar"),
        &[("com/acme/X.class", ClassBuilder::new("com/acme/X").build())],
    );

    let manifest = b"Manifest-Version: 1.0\r\nClass-Path: lib/x.jar\r\n".to_vec();
    write_jar(
        &dir.join("app.jar"),
        &[
            ("META-INF/MANIFEST.MF", manifest),
            ("com/acme/App.class", ClassBuilder::new("com/acme/App").build()),
        ],
    );

    let spec = ScanSpec::builder()
        .with_override_classpath([dir.join("app.jar").to_string_lossy().into_owned()])
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    assert!(result.graph.get(&ClassName::new("com/acme/App")).is_some());
    assert!(result.graph.get(&ClassName::new("com/acme/X")).is_some());
}

#[test]
fn explicit_classpath_entry_deduplicates_against_the_manifest_chain() {
    init_tracing();
    let dir = ScratchDir::new("manifest-class-path-dedup");
    std::fs::create_dir_all(dir.join("lib")).unwrap();

    write_jar(
        &dir.join("lib/x.jar"),
        &[("com/acme/X.class", ClassBuilder::new("com/acme/X").build())],
    );
    let manifest = b"Manifest-Version: 1.0\r\nClass-Path: lib/x.jar\r\n".to_vec();
    write_jar(&dir.join("app.jar"), &[("META-INF/MANIFEST.MF", manifest)]);

    let spec = ScanSpec::builder()
        .with_override_classpath([
            dir.join("app.jar").to_string_lossy().into_owned(),
            dir.join("lib/x.jar").to_string_lossy().into_owned(),
        ])
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    assert!(result.graph.get(&ClassName::new("com/acme/X")).is_some());
}
