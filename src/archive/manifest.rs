//! `META-INF/MANIFEST.MF` parsing.

use std::collections::HashMap;

/// The parsed main section of a jar manifest.
///
/// Only the main attributes section is kept; per-entry sections (digest
/// attributes per resource) have no use in this engine and are skipped.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    attributes: HashMap<String, String>,
}

impl Manifest {
    /// Parses a manifest's raw text.
    ///
    /// Handles the jar-spec continuation rule: a line beginning with a
    /// single space is a continuation of the previous line's value (used
    /// to wrap long lines at 72 bytes).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut attributes = HashMap::new();
        let mut last_key: Option<String> = None;
        for raw_line in text.lines() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if line.is_empty() {
                last_key = None; // blank line ends the main section
                continue;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some(key) = &last_key {
                    if let Some(value) = attributes.get_mut(key) {
                        let value: &mut String = value;
                        value.push_str(continuation);
                    }
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_owned();
                let value = value.strip_prefix(' ').unwrap_or(value).to_owned();
                attributes.insert(key.clone(), value);
                last_key = Some(key);
            }
        }
        Self { attributes }
    }

    /// Looks up a main-section attribute by name, case-sensitively (the jar
    /// spec treats header names as case-insensitive ASCII, but every header
    /// this engine recognizes is referenced by its canonical spelling).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `Main-Class` header, if present.
    #[must_use]
    pub fn main_class(&self) -> Option<&str> {
        self.get("Main-Class")
    }

    /// The space-separated `Class-Path` header, split into entries.
    #[must_use]
    pub fn class_path_entries(&self) -> Vec<String> {
        self.get("Class-Path")
            .map(|v| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// The comma-separated OSGi `Bundle-ClassPath` header, split into
    /// entries with any `;`-delimited parameters stripped.
    #[must_use]
    pub fn bundle_class_path_entries(&self) -> Vec<String> {
        self.get("Bundle-ClassPath")
            .map(|v| {
                v.split(',')
                    .map(|entry| entry.split(';').next().unwrap_or(entry).trim().to_owned())
                    .filter(|entry| !entry.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_headers() {
        let text = "Manifest-Version: 1.0\nMain-Class: com.acme.Main\nClass-Path: lib/a.jar lib/b.jar\n";
        let manifest = Manifest::parse(text);
        assert_eq!(manifest.main_class(), Some("com.acme.Main"));
        assert_eq!(manifest.class_path_entries(), vec!["lib/a.jar", "lib/b.jar"]);
    }

    #[test]
    fn joins_continuation_lines() {
        let text = "Manifest-Version: 1.0\nClass-Path: lib/a.jar\n lib/b.jar\n";
        let manifest = Manifest::parse(text);
        assert_eq!(manifest.class_path_entries(), vec!["lib/a.jar", "lib/b.jar"]);
    }

    #[test]
    fn bundle_class_path_strips_parameters() {
        let text = "Bundle-ClassPath: .,lib/a.jar;version=\"1.0\"\n";
        let manifest = Manifest::parse(text);
        assert_eq!(manifest.bundle_class_path_entries(), vec![".", "lib/a.jar"]);
    }

    #[test]
    fn missing_header_is_empty() {
        let manifest = Manifest::parse("Manifest-Version: 1.0\n");
        assert!(manifest.class_path_entries().is_empty());
    }
}
