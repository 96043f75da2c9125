//! Scenario 6: cancelling a scan partway through returns `Interrupted` and
//! exposes no partial graph.

mod support;

use jclassindex::{spawn, ScanError, ScanSpec};
use support::{init_tracing, ClassBuilder, ScratchDir};

#[test]
fn cancelling_mid_scan_yields_interrupted_with_no_partial_graph() {
    init_tracing();
    let dir = ScratchDir::new("cancellation");
    std::fs::create_dir_all(dir.join("com/acme")).unwrap();
    for i in 0..2000 {
        let bytes = ClassBuilder::new(&format!("com/acme/Gen{i}")).build();
        std::fs::write(dir.join(format!("com/acme/Gen{i}.class")), bytes).unwrap();
    }

    let spec = ScanSpec::builder()
        .with_override_classpath([dir.path.to_string_lossy().into_owned()])
        .num_workers(1)
        .build()
        .unwrap();

    let handle = spawn(spec);
    handle.cancel();
    let result = handle.join();

    assert!(matches!(result, Err(ScanError::Interrupted)));
}
