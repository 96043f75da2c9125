//! A bounded, per-path pool of open archive readers, plus nested-archive
//! extraction to temporary files.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::ArchiveError;

type ZipReader = zip::ZipArchive<BufReader<File>>;

const DEFAULT_SOFT_CAP: usize = 4;

struct PathPool {
    free: Mutex<Vec<ZipReader>>,
    open_lock: Mutex<()>,
}

impl PathPool {
    fn new() -> Self {
        Self { free: Mutex::new(Vec::new()), open_lock: Mutex::new(()) }
    }
}

enum ExtractedFile {
    /// Deleted when the pool is dropped, unless the scan spec asked to
    /// keep temp files (in which case the entry is [`ExtractedFile::Kept`]
    /// instead of being inserted here).
    Temp(tempfile::TempPath),
    /// Left on disk past the pool's lifetime.
    Kept(PathBuf),
}

impl ExtractedFile {
    fn path(&self) -> &Path {
        match self {
            ExtractedFile::Temp(p) => p.as_ref(),
            ExtractedFile::Kept(p) => p.as_path(),
        }
    }
}

/// A reference-counted pool of open [`zip::ZipArchive`] readers, one
/// free-list per canonicalized archive path, plus a cache of temp files
/// extracted from nested archives.
///
/// `acquire` and `release` are the only public operations on the reader
/// side; `close` (or simply dropping the pool) flushes every key.
pub struct ArchiveReaderPool {
    pools: DashMap<PathBuf, Arc<PathPool>>,
    extracted: DashMap<(PathBuf, String), Arc<Mutex<ExtractedFile>>>,
    soft_cap: usize,
    keep_temp_files: bool,
}

impl ArchiveReaderPool {
    /// Creates an empty pool. `keep_temp_files` mirrors
    /// [`crate::ScanSpec`]'s `remove_temp_files_after_scan` (inverted):
    /// when `true`, extracted nested archives outlive the pool.
    #[must_use]
    pub fn new(keep_temp_files: bool) -> Self {
        Self {
            pools: DashMap::new(),
            extracted: DashMap::new(),
            soft_cap: DEFAULT_SOFT_CAP,
            keep_temp_files,
        }
    }

    /// Overrides the default soft cap on pooled readers per path.
    #[must_use]
    pub fn with_soft_cap(mut self, cap: usize) -> Self {
        self.soft_cap = cap.max(1);
        self
    }

    /// Leases a reader for `path`, opening it if the pool has none free.
    ///
    /// # Errors
    ///
    /// An I/O or zip-format error if the archive cannot be opened.
    pub fn acquire(&self, path: &Path) -> Result<ZipReader, ArchiveError> {
        let pool = self
            .pools
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(PathPool::new()))
            .clone();

        if let Some(reader) = pool.free.lock().pop() {
            return Ok(reader);
        }

        // Serializes concurrent opens of the same path (at most one
        // in-flight `File::open` per archive).
        let _open_guard = pool.open_lock.lock();
        if let Some(reader) = pool.free.lock().pop() {
            return Ok(reader);
        }
        let file = File::open(path)?;
        let archive = zip::ZipArchive::new(BufReader::new(file))?;
        Ok(archive)
    }

    /// Returns a reader to the pool, or drops it outright once the pool
    /// for `path` is at its soft cap.
    pub fn release(&self, path: &Path, reader: ZipReader) {
        if let Some(pool) = self.pools.get(path) {
            let mut free = pool.free.lock();
            if free.len() < self.soft_cap {
                free.push(reader);
            }
        }
    }

    /// Extracts `inner_path` from the archive at `outer` to a temp file,
    /// memoized per `(outer, inner_path)`.
    ///
    /// # Errors
    ///
    /// An I/O or zip-format error reading the outer archive, or an I/O
    /// error writing the temp file.
    pub fn extract_inner(&self, outer: &Path, inner_path: &str) -> Result<PathBuf, ArchiveError> {
        let key = (outer.to_path_buf(), inner_path.to_owned());
        if let Some(existing) = self.extracted.get(&key) {
            return Ok(existing.lock().path().to_path_buf());
        }

        let mut reader = self.acquire(outer)?;
        let bytes = {
            let mut entry = reader.by_name(inner_path)?;
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf)?;
            buf
        };
        self.release(outer, reader);

        let suffix = Path::new(inner_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let mut tmp = tempfile::Builder::new().prefix("jclassindex-").suffix(&suffix).tempfile()?;
        tmp.write_all(&bytes)?;

        let extracted = if self.keep_temp_files {
            let (_file, path) = tmp.keep().map_err(|e| ArchiveError::Io(e.error))?;
            ExtractedFile::Kept(path)
        } else {
            ExtractedFile::Temp(tmp.into_temp_path())
        };
        let path = extracted.path().to_path_buf();
        self.extracted.insert(key, Arc::new(Mutex::new(extracted)));
        Ok(path)
    }

    /// Releases every pooled reader and deletes every non-kept temp file.
    /// Idempotent; also runs implicitly when the pool is dropped.
    pub fn close(&self) {
        self.pools.clear();
        self.extracted.clear();
    }
}

impl Default for ArchiveReaderPool {
    fn default() -> Self {
        Self::new(false)
    }
}
