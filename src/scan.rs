//! The top-level scan pipeline: resolve the classpath, parse matching
//! classfiles in parallel, and cross-link the results.

use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::collections::HashMap;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::archive::ArchiveReaderPool;
use crate::classfile;
use crate::classpath::{self, ClassLoaderProvider, ClassPathElement, ClasspathRoot, ClasspathRootKind, HandlerRegistry};
use crate::error::ScanError;
use crate::graph::linker;
use crate::log::Diagnostics;
use crate::model::unlinked::UnlinkedClassRecord;
use crate::resource::Resource;
use crate::spec::ScanSpec;
use crate::ScanResult;

/// A cooperative cancellation flag shared between a scan's caller and its
/// worker pool.
///
/// Cheaply cloned; cloning shares the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Creates a fresh, not-yet-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Workers observe this at their next per-file
    /// poll point and stop; already-started scans cannot be rolled back
    /// mid-file, only between files.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`Interrupt::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A running scan, spawned on its own thread, cancellable via
/// [`ScanHandle::cancel`].
#[derive(Debug)]
pub struct ScanHandle {
    interrupt: Interrupt,
    join: std::thread::JoinHandle<Result<ScanResult, ScanError>>,
}

impl ScanHandle {
    /// Requests cancellation; the scan finishes at its next poll point and
    /// [`ScanHandle::join`] returns [`ScanError::Interrupted`].
    pub fn cancel(&self) {
        self.interrupt.cancel();
    }

    /// Blocks until the scan finishes.
    ///
    /// # Errors
    ///
    /// Propagates whatever [`run`] would have returned, or
    /// [`ScanError::Interrupted`] if the worker thread panicked.
    pub fn join(self) -> Result<ScanResult, ScanError> {
        self.join.join().unwrap_or(Err(ScanError::Interrupted))
    }
}

/// Spawns a scan on a dedicated thread and returns a cancellable handle.
#[must_use]
pub fn spawn(spec: Arc<ScanSpec>) -> ScanHandle {
    spawn_with_providers(spec, Vec::new())
}

/// Like [`spawn`], but also walks the given classloader-like providers when
/// `spec` carries no explicit classpath override.
#[must_use]
pub fn spawn_with_providers(
    spec: Arc<ScanSpec>,
    providers: Vec<Box<dyn ClassLoaderProvider + Send>>,
) -> ScanHandle {
    let interrupt = Interrupt::new();
    let handle_interrupt = interrupt.clone();
    let join = std::thread::spawn(move || {
        let provider_refs: Vec<&dyn ClassLoaderProvider> =
            providers.iter().map(|p| p.as_ref() as &dyn ClassLoaderProvider).collect();
        run_inner(spec, &provider_refs, handle_interrupt)
    });
    ScanHandle { interrupt, join }
}

/// Runs a scan to completion on the calling thread, with no classloader
/// providers beyond `spec`'s own override classpath.
pub(crate) fn run(spec: Arc<ScanSpec>) -> Result<ScanResult, ScanError> {
    run_inner(spec, &[], Interrupt::new())
}

/// Runs a scan to completion on the calling thread, walking `providers`
/// when `spec` carries no explicit override classpath.
pub(crate) fn run_with_providers(
    spec: Arc<ScanSpec>,
    providers: &[&dyn ClassLoaderProvider],
) -> Result<ScanResult, ScanError> {
    run_inner(spec, providers, Interrupt::new())
}

fn run_inner(
    spec: Arc<ScanSpec>,
    providers: &[&dyn ClassLoaderProvider],
    interrupt: Interrupt,
) -> Result<ScanResult, ScanError> {
    let diagnostics = Diagnostics::new();
    let keep_temp_files = !spec.remove_temp_files_after_scan || cfg!(feature = "retain-temp-files");
    let pool = Arc::new(ArchiveReaderPool::new(keep_temp_files));

    let roots = classpath::resolve(&spec, providers, &HandlerRegistry::default(), &pool, &diagnostics)?;

    let providers_by_root: HashMap<ClassPathElement, Vec<String>> =
        roots.iter().map(|r| (r.element.clone(), r.providers.clone())).collect();

    let outputs: Vec<WorkerOutput> = match rayon::ThreadPoolBuilder::new().num_threads(spec.num_workers()).build() {
        Ok(thread_pool) => thread_pool.install(|| {
            roots
                .par_iter()
                .map(|root| scan_root(root, &spec, &pool, &interrupt, &diagnostics))
                .collect()
        }),
        Err(err) => {
            diagnostics.warn(None, None, format!("falling back to the global thread pool: {err}"));
            roots
                .par_iter()
                .map(|root| scan_root(root, &spec, &pool, &interrupt, &diagnostics))
                .collect()
        }
    };

    if interrupt.is_cancelled() {
        return Err(ScanError::Interrupted);
    }

    let mut classes = Vec::new();
    let mut resources = Vec::new();
    for output in outputs {
        classes.extend(output.classes);
        resources.extend(output.resources);
    }

    let graph = linker::cross_link(&spec, classes, &providers_by_root, &diagnostics)?;
    diagnostics.flush_to_tracing();

    Ok(ScanResult { graph, resources, diagnostics })
}

#[derive(Default)]
struct WorkerOutput {
    classes: Vec<UnlinkedClassRecord>,
    resources: Vec<Resource>,
}

fn scan_root(
    root: &ClasspathRoot,
    spec: &ScanSpec,
    pool: &Arc<ArchiveReaderPool>,
    interrupt: &Interrupt,
    diagnostics: &Diagnostics,
) -> WorkerOutput {
    let root_label = root.element.to_string();
    let _span = tracing::info_span!("scan_root", root = %root_label).entered();

    match root.element.kind() {
        ClasspathRootKind::Directory => scan_directory(&root.element, spec, pool, interrupt, diagnostics),
        ClasspathRootKind::Archive => scan_archive(&root.element, spec, pool, interrupt, diagnostics),
        ClasspathRootKind::Module => {
            diagnostics.info(Some(&root_label), None, "module classpath roots are identity-only and are not scanned");
            WorkerOutput::default()
        }
    }
}

fn scan_directory(
    element: &ClassPathElement,
    spec: &ScanSpec,
    pool: &Arc<ArchiveReaderPool>,
    interrupt: &Interrupt,
    diagnostics: &Diagnostics,
) -> WorkerOutput {
    let mut out = WorkerOutput::default();
    let root_path = element.canonical_path();

    let mut walker = WalkDir::new(root_path);
    if spec.disable_recursive_scanning {
        walker = walker.max_depth(1);
    }

    for entry in walker.into_iter().filter_map(Result::ok) {
        if interrupt.is_cancelled() {
            break;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(root_path)
            .unwrap_or(path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");

        if rel.ends_with(".class") {
            match File::open(path) {
                Ok(file) => {
                    let mut reader = BufReader::new(file);
                    match classfile::parse_class(&mut reader, spec, element.clone()) {
                        Ok(Some(record)) => out.classes.push(record),
                        Ok(None) => {}
                        Err(err) => diagnostics.warn(Some(&element.to_string()), Some(&rel), format!("{err}")),
                    }
                }
                Err(err) => diagnostics.warn(Some(&element.to_string()), Some(&rel), format!("{err}")),
            }
        } else if spec.resource_matchers.iter().any(|m| m.matches(&rel)) {
            out.resources.push(Resource::from_file(element.clone(), rel.clone(), path.to_path_buf(), Arc::clone(pool)));
        }
    }

    out
}

fn scan_archive(
    element: &ClassPathElement,
    spec: &ScanSpec,
    pool: &Arc<ArchiveReaderPool>,
    interrupt: &Interrupt,
    diagnostics: &Diagnostics,
) -> WorkerOutput {
    let mut out = WorkerOutput::default();
    let archive_path = element.canonical_path();

    let mut reader = match pool.acquire(archive_path) {
        Ok(reader) => reader,
        Err(err) => {
            diagnostics.warn(Some(&element.to_string()), None, format!("could not open archive: {err}"));
            return out;
        }
    };

    let prefix = element.package_root_prefix().map(|p| format!("{p}/"));
    let len = reader.len();

    for index in 0..len {
        if interrupt.is_cancelled() {
            break;
        }

        let (name, is_dir) = {
            let Ok(entry) = reader.by_index(index) else { continue };
            (entry.name().to_owned(), entry.is_dir())
        };
        if is_dir {
            continue;
        }

        let rel = match &prefix {
            Some(prefix) => match name.strip_prefix(prefix.as_str()) {
                Some(stripped) => stripped.to_owned(),
                None => continue,
            },
            None => name.clone(),
        };

        if rel.ends_with(".class") {
            let bytes = {
                let Ok(mut entry) = reader.by_index(index) else { continue };
                let mut buf = Vec::with_capacity(entry.size() as usize);
                if entry.read_to_end(&mut buf).is_err() {
                    diagnostics.warn(Some(&element.to_string()), Some(&rel), "failed to read archive entry");
                    continue;
                }
                buf
            };
            let mut cursor = bytes.as_slice();
            match classfile::parse_class(&mut cursor, spec, element.clone()) {
                Ok(Some(record)) => out.classes.push(record),
                Ok(None) => {}
                Err(err) => diagnostics.warn(Some(&element.to_string()), Some(&rel), format!("{err}")),
            }
        } else if spec.resource_matchers.iter().any(|m| m.matches(&rel)) {
            out.resources.push(Resource::from_archive_entry(
                element.clone(),
                name.clone(),
                archive_path.to_path_buf(),
                Arc::clone(pool),
            ));
        }
    }

    pool.release(archive_path, reader);
    out
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use crate::classpath::ClasspathRootKind;
    use crate::log::Diagnostics;
    use crate::spec::ScanSpec;
    use crate::tests::ClassFileBuilder;

    use super::*;

    #[test]
    fn scans_a_directory_root_end_to_end() {
        let dir = std::env::temp_dir().join(format!("jclassindex-scan-dir-test-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("com/acme")).unwrap();
        let bytes = ClassFileBuilder::new("com/acme/Widget")
            .interface("com/acme/Gadget")
            .build();
        std::fs::write(dir.join("com/acme/Widget.class"), bytes).unwrap();

        let spec = Arc::new(
            ScanSpec::builder()
                .with_override_classpath([dir.to_string_lossy().into_owned()])
                .build()
                .unwrap(),
        );
        let result = run(spec).unwrap();
        assert!(result.graph.get(&crate::types::ClassName::new("com/acme/Widget")).is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn scans_an_archive_root_end_to_end() {
        let dir = std::env::temp_dir().join(format!("jclassindex-scan-jar-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let jar_path = dir.join("lib.jar");
        let file = std::fs::File::create(&jar_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("com/acme/Widget.class", options).unwrap();
        zip.write_all(&ClassFileBuilder::new("com/acme/Widget").build()).unwrap();
        zip.finish().unwrap();

        let spec = Arc::new(
            ScanSpec::builder()
                .with_override_classpath([jar_path.to_string_lossy().into_owned()])
                .build()
                .unwrap(),
        );
        let result = run(spec).unwrap();
        assert!(result.graph.get(&crate::types::ClassName::new("com/acme/Widget")).is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn cancelling_before_the_scan_starts_returns_interrupted() {
        let dir = std::env::temp_dir().join(format!("jclassindex-scan-cancel-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Widget.class"), ClassFileBuilder::new("Widget").build()).unwrap();

        let spec = Arc::new(
            ScanSpec::builder()
                .with_override_classpath([dir.to_string_lossy().into_owned()])
                .build()
                .unwrap(),
        );
        let interrupt = Interrupt::new();
        interrupt.cancel();
        let err = run_inner(spec, &[], interrupt).unwrap_err();
        assert!(matches!(err, ScanError::Interrupted));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn module_roots_are_identity_only_and_never_scanned() {
        let element = ClassPathElement::new(
            std::path::PathBuf::from("jrt:/java.base"),
            None,
            ClasspathRootKind::Module,
        );
        let root = ClasspathRoot { element, providers: Vec::new() };
        let spec = ScanSpec::builder().build().unwrap();
        let pool = Arc::new(ArchiveReaderPool::new(false));
        let diagnostics = Diagnostics::new();
        let interrupt = Interrupt::new();

        let output = scan_root(&root, &spec, &pool, &interrupt, &diagnostics);
        assert!(output.classes.is_empty());
        assert!(output.resources.is_empty());
        assert!(!diagnostics.snapshot().is_empty());
    }
}
