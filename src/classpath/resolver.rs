//! Turns classloader providers (or an explicit override) into an ordered,
//! deduplicated list of [`ClasspathRoot`]s.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveError, ArchiveReaderPool};
use crate::log::Diagnostics;
use crate::spec::ScanSpec;

use super::{ClassLoaderProvider, ClassPathElement, ClasspathRoot, ClasspathRootKind};

/// A problem that aborts classpath resolution entirely.
///
/// Per-entry failures (an unreadable root, a missing nested archive, a
/// cyclic manifest `Class-Path`) are *not* represented here: the resolver
/// logs those to [`Diagnostics`] and continues with the remaining entries.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Neither an explicit override nor any classloader provider was given.
    #[error("no classpath sources were provided")]
    NoSources,
}

/// A predicate/extractor pair for dispatching a [`ClassLoaderProvider`] to
/// the code that knows how to pull entries out of it: an ordered list of
/// (match-predicate, extractor-fn) pairs, tried in order, no inheritance
/// needed.
pub struct Handler {
    matches: Box<dyn Fn(&dyn ClassLoaderProvider) -> bool + Send + Sync>,
    extract: Box<dyn Fn(&dyn ClassLoaderProvider) -> Vec<String> + Send + Sync>,
}

impl Handler {
    /// Builds a handler from a match predicate and an extractor.
    pub fn new(
        matches: impl Fn(&dyn ClassLoaderProvider) -> bool + Send + Sync + 'static,
        extract: impl Fn(&dyn ClassLoaderProvider) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self { matches: Box::new(matches), extract: Box::new(extract) }
    }
}

/// An ordered registry of [`Handler`]s, tried first-to-last; the first
/// match wins.
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl Default for HandlerRegistry {
    /// The default registry has a single catch-all handler that calls
    /// [`ClassLoaderProvider::entries`] directly, since this port's
    /// provider trait is already the extraction point (unlike the
    /// original's runtime-type dispatch over opaque classloader objects).
    fn default() -> Self {
        Self {
            handlers: vec![Handler::new(|_| true, ClassLoaderProvider::entries)],
        }
    }
}

impl HandlerRegistry {
    /// Registers a handler ahead of the default catch-all.
    #[must_use]
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handlers.insert(self.handlers.len().saturating_sub(1), handler);
        self
    }

    fn dispatch(&self, provider: &dyn ClassLoaderProvider) -> Vec<String> {
        for handler in &self.handlers {
            if (handler.matches)(provider) {
                return (handler.extract)(provider);
            }
        }
        Vec::new()
    }
}

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "war", "ear"];

/// File-name prefixes dropped when [`ScanSpec::blacklist_system_jars`] asks
/// to exclude well-known JRE/JDK archives.
const SYSTEM_JAR_PREFIXES: &[&str] = &["rt.jar", "jrt-fs.jar", "jce.jar", "charsets.jar"];

struct PendingEntry {
    raw: String,
    providers: Vec<String>,
    base_dir: Option<PathBuf>,
}

/// Resolves the classpath roots to scan.
///
/// # Errors
///
/// Returns [`ResolutionError::NoSources`] if neither an override classpath
/// nor any provider was given. Individual bad entries are logged to
/// `diagnostics` and skipped, never surfaced as an error here.
pub fn resolve(
    spec: &ScanSpec,
    providers: &[&dyn ClassLoaderProvider],
    registry: &HandlerRegistry,
    pool: &ArchiveReaderPool,
    diagnostics: &Diagnostics,
) -> Result<Vec<ClasspathRoot>, ResolutionError> {
    let mut queue: VecDeque<PendingEntry> = VecDeque::new();

    if let Some(overrides) = &spec.override_classpath {
        for raw in overrides {
            for piece in split_platform(raw) {
                queue.push_back(PendingEntry { raw: piece, providers: vec!["override".to_owned()], base_dir: None });
            }
        }
    } else {
        if providers.is_empty() {
            return Err(ResolutionError::NoSources);
        }
        for provider in providers {
            walk_provider(*provider, spec.ignore_parent_classloaders, registry, &mut queue);
        }
    }

    if queue.is_empty() {
        return Err(ResolutionError::NoSources);
    }

    let mut seen_canonical: Vec<(PathBuf, Option<String>)> = Vec::new();
    let mut seen_raw = std::collections::HashSet::new();
    let mut roots: Vec<ClasspathRoot> = Vec::new();

    while let Some(entry) = queue.pop_front() {
        if !seen_raw.insert((entry.raw.clone(), entry.base_dir.clone())) {
            continue; // already processed this exact (path, base) pair; breaks manifest cycles
        }

        if entry.raw.contains("!/") {
            if let Some(canonical) = resolve_nested_archive(&entry.raw, entry.base_dir.as_deref(), pool, diagnostics) {
                process_candidate(canonical, &entry, spec, diagnostics, &mut seen_canonical, &mut roots, &mut queue);
            }
            continue;
        }

        for candidate in expand_wildcard(&entry.raw, entry.base_dir.as_deref()) {
            let Ok(canonical) = fs::canonicalize(&candidate) else {
                diagnostics.info(Some(&entry.raw), None, "classpath entry does not exist, skipping");
                continue;
            };
            process_candidate(canonical, &entry, spec, diagnostics, &mut seen_canonical, &mut roots, &mut queue);
        }
    }

    Ok(roots)
}

/// Resolves a nested archive URI (`outer!/inner!/...`) to a canonical
/// on-disk path by recursively extracting each layer through `pool`.
/// Returns `None` (after logging) if any layer cannot be opened.
fn resolve_nested_archive(
    raw: &str,
    base_dir: Option<&Path>,
    pool: &ArchiveReaderPool,
    diagnostics: &Diagnostics,
) -> Option<PathBuf> {
    let (outer, chain) = archive::split_nested(raw);
    let outer = resolve_relative(&outer.to_string_lossy(), base_dir);
    let mut current = match fs::canonicalize(&outer) {
        Ok(path) => path,
        Err(_) => {
            diagnostics.info(Some(raw), None, "outer archive of a nested classpath entry does not exist, skipping");
            return None;
        }
    };
    for inner in chain {
        match pool.extract_inner(&current, inner) {
            Ok(extracted) => current = extracted,
            Err(err) => {
                diagnostics.warn(Some(raw), Some(inner), format!("failed to extract nested archive: {err}"));
                return None;
            }
        }
    }
    Some(current)
}

#[allow(clippy::too_many_arguments)]
fn process_candidate(
    canonical: PathBuf,
    entry: &PendingEntry,
    spec: &ScanSpec,
    diagnostics: &Diagnostics,
    seen_canonical: &mut Vec<(PathBuf, Option<String>)>,
    roots: &mut Vec<ClasspathRoot>,
    queue: &mut VecDeque<PendingEntry>,
) {
    let file_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_owned();

    if spec.blacklist_system_jars && SYSTEM_JAR_PREFIXES.iter().any(|p| file_name == *p) {
        return;
    }
    if !spec.accepts_jar(&file_name) {
        return;
    }

    let kind = if canonical.is_dir() {
        ClasspathRootKind::Directory
    } else if is_archive(&canonical) {
        ClasspathRootKind::Archive
    } else {
        diagnostics.info(Some(&entry.raw), None, "not a directory or recognized archive, skipping");
        return;
    };

    let package_root_prefix = if kind == ClasspathRootKind::Archive {
        match archive::detect_package_root(&canonical) {
            Ok(prefix) => prefix,
            Err(err) => {
                diagnostics.warn(Some(&entry.raw), None, format!("could not inspect archive: {err}"));
                None
            }
        }
    } else {
        None
    };

    let key = (canonical.clone(), package_root_prefix.clone());
    if seen_canonical.contains(&key) {
        return;
    }
    seen_canonical.push(key);

    let element = ClassPathElement::new(canonical.clone(), package_root_prefix, kind);
    roots.push(ClasspathRoot { element, providers: entry.providers.clone() });

    if kind == ClasspathRootKind::Archive {
        enqueue_manifest_class_path(&canonical, entry, diagnostics, queue);
    }
}

fn walk_provider(
    provider: &dyn ClassLoaderProvider,
    ignore_parents: bool,
    registry: &HandlerRegistry,
    queue: &mut VecDeque<PendingEntry>,
) {
    let name = provider.provider_name().to_owned();
    for raw in registry.dispatch(provider) {
        queue.push_back(PendingEntry { raw, providers: vec![name.clone()], base_dir: None });
    }
    if !ignore_parents {
        if let Some(parent) = provider.parent() {
            walk_provider(parent, ignore_parents, registry, queue);
        }
    }
}

fn enqueue_manifest_class_path(
    archive_path: &Path,
    entry: &PendingEntry,
    diagnostics: &Diagnostics,
    queue: &mut VecDeque<PendingEntry>,
) {
    let manifest = match archive::read_manifest(archive_path) {
        Ok(m) => m,
        Err(ArchiveError::NoManifest) => return,
        Err(err) => {
            diagnostics.warn(Some(&entry.raw), Some("META-INF/MANIFEST.MF"), format!("{err}"));
            return;
        }
    };
    let Some(parent) = archive_path.parent().map(Path::to_path_buf) else {
        return;
    };
    for class_path_entry in manifest.class_path_entries() {
        queue.push_back(PendingEntry {
            raw: class_path_entry,
            providers: entry.providers.clone(),
            base_dir: Some(parent.clone()),
        });
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Expands a trailing `*` directory-wildcard entry into its `.jar`/`.zip`
/// children; everything else passes through unchanged.
fn expand_wildcard(raw: &str, base_dir: Option<&Path>) -> Vec<PathBuf> {
    let resolved = resolve_relative(raw, base_dir);
    let Some(dir) = raw.strip_suffix('*').map(|d| resolve_relative(d, base_dir)) else {
        return vec![resolved];
    };
    let Ok(read_dir) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    read_dir
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| is_archive(p))
        .collect()
}

fn resolve_relative(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(raw);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

fn split_platform(raw: &str) -> Vec<String> {
    if raw.contains(std::path::MAIN_SEPARATOR) || !raw.contains(platform_separator()) {
        return vec![raw.to_owned()];
    }
    raw.split(platform_separator()).map(str::to_owned).collect()
}

#[cfg(unix)]
fn platform_separator() -> char {
    ':'
}

#[cfg(windows)]
fn platform_separator() -> char {
    ';'
}
