//! Scenario 3: a Spring Boot-style bootable jar, where classes live under a
//! `BOOT-INF/classes/` package root that must be stripped before deriving
//! the resource path (the binary class name itself comes from the
//! classfile's own constant pool entry, not the archive path).

mod support;

use jclassindex::resource::ResourceMatcher;
use jclassindex::types::ClassName;
use jclassindex::{scan, ScanSpec};
use support::{init_tracing, ClassBuilder, ScratchDir, write_jar};

#[test]
fn boot_inf_prefix_is_stripped_from_resource_paths() {
    init_tracing();
    let dir = ScratchDir::new("bootable-archive");

    write_jar(
        &dir.join("app.jar"),
        &[
            ("BOOT-INF/classes/p/C.class", ClassBuilder::new("p/C").build()),
            ("BOOT-INF/classes/p/app.properties", b"k=v".to_vec()),
        ],
    );

    let spec = ScanSpec::builder()
        .with_override_classpath([dir.join("app.jar").to_string_lossy().into_owned()])
        .with_resource_matchers([ResourceMatcher::Extension(".properties".to_owned())])
        .build()
        .unwrap();

    let result = scan(spec).unwrap();
    assert!(result.graph.get(&ClassName::new("p/C")).is_some());

    let resource = result
        .resources
        .iter()
        .find(|r| r.path_relative_to_package_root() == "p/app.properties")
        .expect("BOOT-INF/classes/ prefix should be stripped from the package-root-relative path");
    assert_eq!(resource.path_relative_to_classpath_element(), "BOOT-INF/classes/p/app.properties");
}
