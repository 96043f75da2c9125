//! Opening archives, pooling readers, and extracting nested archives to
//! temporary storage.

mod manifest;
mod pool;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub use manifest::Manifest;
pub use pool::ArchiveReaderPool;

/// A problem opening or reading an archive.
///
/// These are scoped to one archive entry: the resolver and worker
/// log them as diagnostics and move on, never aborting the whole scan.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Failed reading the archive file itself.
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),
    /// The zip central directory could not be parsed.
    #[error("invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// The archive has no `META-INF/MANIFEST.MF` entry.
    #[error("archive has no manifest")]
    NoManifest,
    /// The manifest entry was not valid UTF-8.
    #[error("manifest is not valid UTF-8")]
    InvalidManifestEncoding,
}

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Well-known directory prefixes that mark a bootable archive's actual
/// class root. Detected by presence rather than by a manifest header,
/// since that's how real executable jars (Spring Boot, WAR files) are
/// structured — see DESIGN.md for why this was chosen over a fabricated
/// manifest attribute.
const KNOWN_PACKAGE_ROOTS: &[&str] = &["BOOT-INF/classes/", "WEB-INF/classes/"];

/// Opens `path` as a zip archive and reads its manifest, if present.
///
/// # Errors
///
/// [`ArchiveError::NoManifest`] if the archive has no manifest entry;
/// otherwise an I/O or zip-format error.
pub fn read_manifest(path: &Path) -> Result<Manifest, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Err(ArchiveError::NoManifest),
        Err(err) => return Err(err.into()),
    };
    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|_| ArchiveError::InvalidManifestEncoding)?;
    Ok(Manifest::parse(&contents))
}

/// Detects a known package-root prefix (e.g. a Spring Boot bootable jar's
/// `BOOT-INF/classes/`) by scanning the archive's entry names.
///
/// # Errors
///
/// An I/O or zip-format error if the archive cannot be opened at all.
pub fn detect_package_root(path: &Path) -> Result<Option<String>, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let name = entry.name();
        for prefix in KNOWN_PACKAGE_ROOTS {
            if name.starts_with(prefix) {
                return Ok(Some(prefix.trim_end_matches('/').to_owned()));
            }
        }
    }
    Ok(None)
}

/// For a nested archive URI of the form `outer!/inner!/...`, returns the
/// canonical on-disk path of the outermost archive.
#[must_use]
pub fn get_outermost(nested: &str) -> PathBuf {
    let outer = nested.split("!/").next().unwrap_or(nested);
    PathBuf::from(outer)
}

/// Splits a nested archive URI into its outer path and the `!/`-joined
/// chain of inner entry paths within it.
#[must_use]
pub fn split_nested(nested: &str) -> (PathBuf, Vec<&str>) {
    let mut parts = nested.split("!/");
    let outer = parts.next().unwrap_or(nested);
    (PathBuf::from(outer), parts.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_doubly_nested_uri() {
        let (outer, inner) = split_nested("a.jar!/lib/b.jar!/c/D.class");
        assert_eq!(outer, PathBuf::from("a.jar"));
        assert_eq!(inner, vec!["lib/b.jar", "c/D.class"]);
    }

    #[test]
    fn get_outermost_of_a_plain_path_is_itself() {
        assert_eq!(get_outermost("plain.jar"), PathBuf::from("plain.jar"));
    }
}
