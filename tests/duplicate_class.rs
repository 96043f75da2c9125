//! Scenario 4: the same binary name shows up in two archives on the
//! classpath. The first encounter's origin wins; classloader-provider
//! lists merge in first-seen order; the collision is logged, not fatal.

mod support;

use jclassindex::types::ClassName;
use jclassindex::{scan, ScanSpec};
use support::{init_tracing, ClassBuilder, ScratchDir, write_jar};

#[test]
fn duplicate_binary_name_keeps_the_first_archive_and_logs_a_diagnostic() {
    init_tracing();
    let dir = ScratchDir::new("duplicate-class");

    write_jar(
        &dir.join("first.jar"),
        &[("com/acme/Shared.class", ClassBuilder::new("com/acme/Shared").build())],
    );
    write_jar(
        &dir.join("second.jar"),
        &[("com/acme/Shared.class", ClassBuilder::new("com/acme/Shared").superclass("com/acme/Other").build())],
    );

    let spec = ScanSpec::builder()
        .with_override_classpath([
            dir.join("first.jar").to_string_lossy().into_owned(),
            dir.join("second.jar").to_string_lossy().into_owned(),
        ])
        .num_workers(1)
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    let record = result.graph.get(&ClassName::new("com/acme/Shared")).unwrap();
    assert!(
        record.origin().is_some_and(|o| o.file_name() == "first.jar"),
        "the first archive encountered on the classpath should keep the origin"
    );
    assert!(
        result.diagnostics.snapshot().iter().any(|d| d.message.contains("duplicate")),
        "a duplicate classfile should be logged, not treated as fatal"
    );
}
