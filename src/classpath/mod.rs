//! Classpath roots and the identity of the element a class was found under.

mod resolver;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use resolver::{resolve, Handler, HandlerRegistry, ResolutionError};

/// The kind of storage backing a [`ClasspathRoot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClasspathRootKind {
    /// A plain directory tree of `.class` files.
    Directory,
    /// A zip/jar archive, possibly with a package-root prefix.
    Archive,
    /// A JPMS module, referenced by name only.
    ///
    /// Out of scope beyond identity: this core never loads module contents
    /// through the host module system, so a module root
    /// exists only so a provider that reports one isn't silently dropped.
    Module,
}

/// Identifies one classpath root a class or resource was discovered under.
///
/// Cheaply cloned (an `Arc` underneath) so it can be stamped onto every
/// [`crate::model::unlinked::UnlinkedClassRecord`] produced from it without
/// copying the canonical path on every class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassPathElement {
    inner: Arc<ElementInner>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ElementInner {
    canonical_path: PathBuf,
    package_root_prefix: Option<String>,
    kind: ClasspathRootKindHash,
}

/// `ClasspathRootKind` doesn't need `Hash`/`Eq` anywhere else; a tiny local
/// newtype keeps [`ElementInner`]'s derives mechanical.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
struct ClasspathRootKindHash(u8);

impl From<ClasspathRootKind> for ClasspathRootKindHash {
    fn from(kind: ClasspathRootKind) -> Self {
        Self(match kind {
            ClasspathRootKind::Directory => 0,
            ClasspathRootKind::Archive => 1,
            ClasspathRootKind::Module => 2,
        })
    }
}

impl ClassPathElement {
    /// Builds a new element identity.
    ///
    /// `canonical_path` should already be canonicalized by the resolver;
    /// this type does not re-canonicalize, so two elements are equal iff
    /// their caller-supplied paths and prefixes are equal.
    #[must_use]
    pub fn new(
        canonical_path: PathBuf,
        package_root_prefix: Option<String>,
        kind: ClasspathRootKind,
    ) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                canonical_path,
                package_root_prefix,
                kind: kind.into(),
            }),
        }
    }

    /// The canonical on-disk path of the directory or archive.
    #[must_use]
    pub fn canonical_path(&self) -> &Path {
        &self.inner.canonical_path
    }

    /// The package-root prefix to strip from entry paths, if any (e.g.
    /// `BOOT-INF/classes` for a Spring-style bootable jar).
    #[must_use]
    pub fn package_root_prefix(&self) -> Option<&str> {
        self.inner.package_root_prefix.as_deref()
    }

    /// The root's storage kind.
    #[must_use]
    pub fn kind(&self) -> ClasspathRootKind {
        match self.inner.kind.0 {
            0 => ClasspathRootKind::Directory,
            1 => ClasspathRootKind::Archive,
            _ => ClasspathRootKind::Module,
        }
    }

    /// The file or directory name, for jar whitelist/blacklist matching and
    /// log messages (e.g. `guava.jar`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.inner
            .canonical_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for ClassPathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.package_root_prefix {
            Some(prefix) => write!(f, "{}!/{prefix}", self.inner.canonical_path.display()),
            None => write!(f, "{}", self.inner.canonical_path.display()),
        }
    }
}

/// One entry in the resolver's ordered output: a classpath element plus the
/// classloader providers that contributed it, in first-seen order.
#[derive(Debug, Clone)]
pub struct ClasspathRoot {
    /// The element's identity.
    pub element: ClassPathElement,
    /// The providers (by name) that surfaced this root, outermost first.
    pub providers: Vec<String>,
}

/// An abstract source of classpath roots, analogous to a JVM classloader.
///
/// A provider may have a parent (the next classloader up the delegation
/// chain); the resolver walks this link unless
/// [`crate::ScanSpec`]'s `ignore_parent_classloaders` is set.
pub trait ClassLoaderProvider {
    /// A short name identifying this provider's kind, used by the handler
    /// registry for dispatch and attached to emitted roots for diagnostics.
    fn provider_name(&self) -> &str;

    /// The raw classpath entries this provider contributes (paths or
    /// archive URIs, not yet canonicalized).
    fn entries(&self) -> Vec<String>;

    /// The parent provider in the delegation chain, if any.
    fn parent(&self) -> Option<&dyn ClassLoaderProvider>;
}
