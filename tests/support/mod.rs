//! Shared fixtures for the end-to-end scan tests.
//!
//! These tests exercise the public API only, so they cannot reach into the
//! crate's own `#[cfg(test)]` classfile builder; this module is a small,
//! self-contained one built the same way.

use std::io::Write as _;
use std::path::Path;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing-subscriber` fmt layer once per test binary, so
/// `cargo test -- --nocapture` shows the scan's structured diagnostics.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_env_filter("jclassindex=debug").try_init();
    });
}

const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
}

impl Pool {
    fn push_utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(1);
        self.bytes.extend((s.len() as u16).to_be_bytes());
        self.bytes.extend(s.as_bytes());
        self.count += 1;
        self.count
    }

    fn push_class(&mut self, binary_name: &str) -> u16 {
        let name_index = self.push_utf8(binary_name);
        self.bytes.push(7);
        self.bytes.extend(name_index.to_be_bytes());
        self.count += 1;
        self.count
    }
}

/// Assembles a minimal, parseable classfile: a public class, an optional
/// superclass (`java/lang/Object` by default), interfaces, and a single
/// marker annotation.
pub struct ClassBuilder {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    annotation: Option<String>,
    is_annotation: bool,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            superclass: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            annotation: None,
            is_annotation: false,
        }
    }

    pub fn superclass(mut self, name: &str) -> Self {
        self.superclass = Some(name.to_owned());
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_owned());
        self
    }

    pub fn marker_annotation(mut self, annotation_class: &str) -> Self {
        self.annotation = Some(annotation_class.to_owned());
        self
    }

    /// Marks this class as an annotation type (`ACC_ANNOTATION | ACC_INTERFACE
    /// | ACC_ABSTRACT`), needed for `@Inherited` detection to apply at all.
    pub fn is_annotation(mut self, yes: bool) -> Self {
        self.is_annotation = yes;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = Pool::default();

        let this_class = pool.push_class(&self.name);
        let super_class = match &self.superclass {
            Some(name) => pool.push_class(name),
            None => 0,
        };
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.push_class(i)).collect();
        let annotation_attr = self.annotation.as_ref().map(|class| {
            let attr_name = pool.push_utf8("RuntimeVisibleAnnotations");
            let annotation_class = pool.push_utf8(&format!("L{class};"));
            (attr_name, annotation_class)
        });

        let mut out = Vec::new();
        out.extend(MAGIC.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        out.extend(61u16.to_be_bytes());
        out.extend((pool.count + 1).to_be_bytes());
        out.extend(&pool.bytes);
        let mut access = 0x0021u16; // ACC_PUBLIC | ACC_SUPER
        if self.is_annotation {
            access |= 0x2000 | 0x0200 | 0x0400; // ACC_ANNOTATION | ACC_INTERFACE | ACC_ABSTRACT
        }
        out.extend(access.to_be_bytes());
        out.extend(this_class.to_be_bytes());
        out.extend(super_class.to_be_bytes());

        out.extend((interface_indices.len() as u16).to_be_bytes());
        for idx in interface_indices {
            out.extend(idx.to_be_bytes());
        }
        out.extend(0u16.to_be_bytes()); // fields_count
        out.extend(0u16.to_be_bytes()); // methods_count

        match annotation_attr {
            Some((attr_name, annotation_class)) => {
                out.extend(1u16.to_be_bytes());
                out.extend(attr_name.to_be_bytes());
                out.extend(8u32.to_be_bytes());
                out.extend(1u16.to_be_bytes());
                out.extend(annotation_class.to_be_bytes());
                out.extend(0u16.to_be_bytes());
            }
            None => out.extend(0u16.to_be_bytes()),
        }

        out
    }
}

/// Writes a zip archive at `path` containing `entries` (entry name, bytes).
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

/// A scratch directory under the system temp dir, named after the calling
/// test, removed when dropped.
pub struct ScratchDir {
    pub path: std::path::PathBuf,
}

impl ScratchDir {
    pub fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("jclassindex-e2e-{test_name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn join(&self, rel: &str) -> std::path::PathBuf {
        self.path.join(rel)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
