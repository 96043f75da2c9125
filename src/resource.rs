//! Non-classfile resources matched during a scan, lazily opened.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveReaderPool;
use crate::classpath::ClassPathElement;

/// Where a [`Resource`]'s bytes live until someone asks to read them.
#[derive(Debug, Clone)]
enum Location {
    /// A plain file under a directory classpath root.
    File(PathBuf),
    /// An entry inside an archive, opened through the pool on demand.
    Archive { archive_path: PathBuf, entry_name: String },
}

/// A matched non-classfile resource (per a caller's path/leaf/extension/
/// pattern filter), not opened until [`Resource::open`] or [`Resource::read`]
/// is called.
///
/// Holds a cloned handle to the scan's [`ArchiveReaderPool`] so it can lease
/// a reader on demand; this keeps `Resource` values usable after the worker
/// that discovered them has moved on, for as long as the pool itself lives.
#[derive(Clone)]
pub struct Resource {
    path_relative_to_package_root: String,
    path_relative_to_classpath_element: String,
    origin: ClassPathElement,
    location: Location,
    pool: std::sync::Arc<ArchiveReaderPool>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path_relative_to_package_root", &self.path_relative_to_package_root)
            .field("path_relative_to_classpath_element", &self.path_relative_to_classpath_element)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl Resource {
    pub(crate) fn from_file(
        origin: ClassPathElement,
        path_relative_to_classpath_element: String,
        absolute_path: PathBuf,
        pool: std::sync::Arc<ArchiveReaderPool>,
    ) -> Self {
        let path_relative_to_package_root = path_relative_to_classpath_element.clone();
        Self {
            path_relative_to_package_root,
            path_relative_to_classpath_element,
            origin,
            location: Location::File(absolute_path),
            pool,
        }
    }

    pub(crate) fn from_archive_entry(
        origin: ClassPathElement,
        entry_name: String,
        archive_path: PathBuf,
        pool: std::sync::Arc<ArchiveReaderPool>,
    ) -> Self {
        let path_relative_to_package_root = match origin.package_root_prefix() {
            Some(prefix) => entry_name
                .strip_prefix(prefix)
                .map(|s| s.trim_start_matches('/').to_owned())
                .unwrap_or_else(|| entry_name.clone()),
            None => entry_name.clone(),
        };
        Self {
            path_relative_to_package_root,
            path_relative_to_classpath_element: entry_name.clone(),
            origin,
            location: Location::Archive { archive_path, entry_name },
            pool,
        }
    }

    /// The resource's path with the classpath element's package-root prefix
    /// stripped, e.g. `p/resource.txt` for a bootable jar's
    /// `BOOT-INF/classes/p/resource.txt`.
    #[must_use]
    pub fn path_relative_to_package_root(&self) -> &str {
        &self.path_relative_to_package_root
    }

    /// The resource's path as stored in the classpath element, with no
    /// prefix stripped.
    #[must_use]
    pub fn path_relative_to_classpath_element(&self) -> &str {
        &self.path_relative_to_classpath_element
    }

    /// The classpath element this resource was discovered under.
    #[must_use]
    pub fn origin(&self) -> &ClassPathElement {
        &self.origin
    }

    /// Opens a reader over the resource's bytes.
    ///
    /// # Errors
    ///
    /// An I/O error opening the file, or a zip-format error reading the
    /// archive entry.
    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.location {
            Location::File(path) => Ok(Box::new(File::open(path)?)),
            Location::Archive { archive_path, entry_name } => {
                let mut reader = self
                    .pool
                    .acquire(archive_path)
                    .map_err(|e| io::Error::other(e.to_string()))?;
                let mut buf = Vec::new();
                {
                    let mut entry = reader
                        .by_name(entry_name)
                        .map_err(|e| io::Error::other(e.to_string()))?;
                    entry.read_to_end(&mut buf)?;
                }
                self.pool.release(archive_path, reader);
                Ok(Box::new(io::Cursor::new(buf)))
            }
        }
    }

    /// Reads the resource's bytes fully into memory.
    ///
    /// # Errors
    ///
    /// Same as [`Resource::open`].
    pub fn read(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// A filter for resource enumeration, matched against
/// [`Resource::path_relative_to_package_root`].
#[derive(Debug, Clone)]
pub enum ResourceMatcher {
    /// An exact path match.
    Path(String),
    /// Matches the file's leaf name only (the part after the last `/`).
    Leaf(String),
    /// Matches files whose leaf name ends with this extension (dot
    /// included, e.g. `.properties`).
    Extension(String),
    /// Matches paths containing this substring anywhere.
    Pattern(String),
}

impl ResourceMatcher {
    #[must_use]
    pub(crate) fn matches(&self, path: &str) -> bool {
        let leaf = Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path);
        match self {
            ResourceMatcher::Path(p) => path == p,
            ResourceMatcher::Leaf(name) => leaf == name,
            ResourceMatcher::Extension(ext) => leaf.ends_with(ext.as_str()),
            ResourceMatcher::Pattern(substr) => path.contains(substr.as_str()),
        }
    }
}
