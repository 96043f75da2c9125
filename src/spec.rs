//! The scan configuration value and its builder.

use crate::error::ConfigError;
use crate::resource::ResourceMatcher;

/// A read-only bundle of scan options.
///
/// A `ScanSpec` is built once via [`ScanSpecBuilder`] and then shared
/// (behind an `Arc`) by every worker for the duration of a single scan. It
/// is never mutated after `build()` succeeds.
#[derive(Debug, Clone, Default)]
pub struct ScanSpec {
    pub(crate) whitelist_packages: Vec<String>,
    pub(crate) blacklist_packages: Vec<String>,
    pub(crate) whitelist_jars: Vec<String>,
    pub(crate) blacklist_jars: Vec<String>,
    pub(crate) override_classpath: Option<Vec<String>>,
    pub(crate) index_fields: bool,
    pub(crate) index_methods: bool,
    pub(crate) index_field_annotations: bool,
    pub(crate) index_method_annotations: bool,
    pub(crate) index_static_final_field_constants: bool,
    pub(crate) enable_annotation_info: bool,
    pub(crate) enable_class_info: bool,
    pub(crate) enable_external_classes: bool,
    pub(crate) ignore_field_visibility: bool,
    pub(crate) ignore_method_visibility: bool,
    pub(crate) ignore_parent_classloaders: bool,
    pub(crate) strict_whitelist: bool,
    pub(crate) disable_recursive_scanning: bool,
    pub(crate) blacklist_system_jars: bool,
    pub(crate) remove_temp_files_after_scan: bool,
    pub(crate) num_workers: usize,
    pub(crate) resource_matchers: Vec<ResourceMatcher>,
}

impl ScanSpec {
    /// Starts building a new spec with every option at its default.
    #[must_use]
    pub fn builder() -> ScanSpecBuilder {
        ScanSpecBuilder::default()
    }

    /// Returns `true` if `binary_name` (slash-separated) is accepted by the
    /// whitelist/blacklist package patterns.
    #[must_use]
    pub fn accepts_class(&self, binary_name: &str) -> bool {
        if Self::any_prefix_matches(&self.blacklist_packages, binary_name) {
            return false;
        }
        if self.whitelist_packages.is_empty() {
            return true;
        }
        Self::any_prefix_matches(&self.whitelist_packages, binary_name)
    }

    /// Returns `true` if the archive or directory named by `element_name`
    /// (typically a file name, e.g. `guava.jar`) passes the jar
    /// whitelist/blacklist.
    #[must_use]
    pub fn accepts_jar(&self, element_name: &str) -> bool {
        if Self::any_prefix_matches(&self.blacklist_jars, element_name) {
            return false;
        }
        if self.whitelist_jars.is_empty() {
            return true;
        }
        Self::any_prefix_matches(&self.whitelist_jars, element_name)
    }

    fn any_prefix_matches(patterns: &[String], candidate: &str) -> bool {
        patterns.iter().any(|p| candidate.starts_with(p.as_str()))
    }

    /// Number of worker threads to use for the parse phase.
    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

/// Fluent builder for [`ScanSpec`].
///
/// Mirrors the fields of [`ScanSpec`] one-to-one; each `with_*` method
/// consumes and returns `self` so calls can be chained, ending in a
/// fallible [`build`](ScanSpecBuilder::build).
#[derive(Debug, Clone)]
pub struct ScanSpecBuilder {
    spec: ScanSpec,
}

impl Default for ScanSpecBuilder {
    fn default() -> Self {
        Self {
            spec: ScanSpec {
                num_workers: 6,
                ..ScanSpec::default()
            },
        }
    }
}

impl ScanSpecBuilder {
    /// Adds package prefixes to scan (e.g. `com.acme.`).
    #[must_use]
    pub fn with_whitelist_packages<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        packages: I,
    ) -> Self {
        self.spec
            .whitelist_packages
            .extend(packages.into_iter().map(Into::into));
        self
    }

    /// Adds package prefixes to exclude, overriding the whitelist.
    #[must_use]
    pub fn with_blacklist_packages<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        packages: I,
    ) -> Self {
        self.spec
            .blacklist_packages
            .extend(packages.into_iter().map(Into::into));
        self
    }

    /// Restricts scanning to archives whose file name starts with one of
    /// these prefixes.
    #[must_use]
    pub fn with_whitelist_jars<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        jars: I,
    ) -> Self {
        self.spec
            .whitelist_jars
            .extend(jars.into_iter().map(Into::into));
        self
    }

    /// Excludes archives whose file name starts with one of these prefixes.
    #[must_use]
    pub fn with_blacklist_jars<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        jars: I,
    ) -> Self {
        self.spec
            .blacklist_jars
            .extend(jars.into_iter().map(Into::into));
        self
    }

    /// Replaces auto-detection with an explicit, platform-separated or
    /// pre-split classpath.
    #[must_use]
    pub fn with_override_classpath<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        entries: I,
    ) -> Self {
        self.spec.override_classpath = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    /// Populates field records on scanned classes.
    #[must_use]
    pub fn index_fields(mut self, yes: bool) -> Self {
        self.spec.index_fields = yes;
        self
    }

    /// Populates method records on scanned classes.
    #[must_use]
    pub fn index_methods(mut self, yes: bool) -> Self {
        self.spec.index_methods = yes;
        self
    }

    /// Populates the field-annotation reverse index.
    #[must_use]
    pub fn index_field_annotations(mut self, yes: bool) -> Self {
        self.spec.index_field_annotations = yes;
        self
    }

    /// Populates the method-annotation reverse index.
    #[must_use]
    pub fn index_method_annotations(mut self, yes: bool) -> Self {
        self.spec.index_method_annotations = yes;
        self
    }

    /// Resolves and records `static final` constant values from the
    /// constant pool.
    #[must_use]
    pub fn index_static_final_field_constants(mut self, yes: bool) -> Self {
        self.spec.index_static_final_field_constants = yes;
        self
    }

    /// Records full annotation parameter values, not just existence edges.
    #[must_use]
    pub fn enable_annotation_info(mut self, yes: bool) -> Self {
        self.spec.enable_annotation_info = yes;
        self
    }

    /// Records class-level metadata (modifiers, superclass, interfaces).
    #[must_use]
    pub fn enable_class_info(mut self, yes: bool) -> Self {
        self.spec.enable_class_info = yes;
        self
    }

    /// Keeps externally-referenced classes (never scanned directly) in the
    /// graph and in query results.
    #[must_use]
    pub fn enable_external_classes(mut self, yes: bool) -> Self {
        self.spec.enable_external_classes = yes;
        self
    }

    /// Includes non-public fields.
    #[must_use]
    pub fn ignore_field_visibility(mut self, yes: bool) -> Self {
        self.spec.ignore_field_visibility = yes;
        self
    }

    /// Includes non-public methods.
    #[must_use]
    pub fn ignore_method_visibility(mut self, yes: bool) -> Self {
        self.spec.ignore_method_visibility = yes;
        self
    }

    /// Does not walk parent classloader links when resolving providers.
    #[must_use]
    pub fn ignore_parent_classloaders(mut self, yes: bool) -> Self {
        self.spec.ignore_parent_classloaders = yes;
        self
    }

    /// Drops external classes from results, implying `enable_external_classes(false)`.
    #[must_use]
    pub fn strict_whitelist(mut self, yes: bool) -> Self {
        self.spec.strict_whitelist = yes;
        self
    }

    /// Scans only the top level of each directory root.
    #[must_use]
    pub fn disable_recursive_scanning(mut self, yes: bool) -> Self {
        self.spec.disable_recursive_scanning = yes;
        self
    }

    /// Excludes well-known system archives from resolution.
    #[must_use]
    pub fn blacklist_system_jars(mut self, yes: bool) -> Self {
        self.spec.blacklist_system_jars = yes;
        self
    }

    /// Deletes extracted nested-archive temp files once the scan finishes.
    #[must_use]
    pub fn remove_temp_files_after_scan(mut self, yes: bool) -> Self {
        self.spec.remove_temp_files_after_scan = yes;
        self
    }

    /// Sets the worker pool size for the parse phase. Default is 6.
    #[must_use]
    pub fn num_workers(mut self, n: usize) -> Self {
        self.spec.num_workers = n.max(1);
        self
    }

    /// Adds filters for non-classfile resources to enumerate alongside
    /// classes (e.g. `.properties` files, `META-INF/services/*` entries).
    #[must_use]
    pub fn with_resource_matchers<I: IntoIterator<Item = ResourceMatcher>>(mut self, matchers: I) -> Self {
        self.spec.resource_matchers.extend(matchers);
        self
    }

    /// Validates the accumulated options and produces a [`ScanSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit classpath override resolves
    /// to zero entries, if `strict_whitelist` is set with no whitelist
    /// patterns at all, or if a pattern appears in both a whitelist and its
    /// corresponding blacklist.
    pub fn build(self) -> Result<ScanSpec, ConfigError> {
        let spec = self.spec;

        if let Some(entries) = &spec.override_classpath {
            if entries.iter().all(|e| e.trim().is_empty()) {
                return Err(ConfigError::EmptyOverrideClasspath);
            }
        }

        if spec.strict_whitelist
            && spec.whitelist_packages.is_empty()
            && spec.whitelist_jars.is_empty()
        {
            return Err(ConfigError::StrictWhitelistWithoutWhitelist);
        }

        for p in &spec.whitelist_packages {
            if spec.blacklist_packages.contains(p) {
                return Err(ConfigError::ContradictoryPattern(p.clone()));
            }
        }

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_cleanly() {
        let spec = ScanSpec::builder().build().expect("default spec is valid");
        assert!(spec.accepts_class("com/acme/Foo"));
        assert_eq!(spec.num_workers(), 6);
    }

    #[test]
    fn blacklist_wins_over_whitelist() {
        let spec = ScanSpec::builder()
            .with_whitelist_packages(["com/acme/"])
            .with_blacklist_packages(["com/acme/internal/"])
            .build()
            .unwrap();
        assert!(spec.accepts_class("com/acme/Foo"));
        assert!(!spec.accepts_class("com/acme/internal/Bar"));
        assert!(!spec.accepts_class("org/other/Baz"));
    }

    #[test]
    fn empty_override_classpath_is_rejected() {
        let err = ScanSpec::builder()
            .with_override_classpath(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyOverrideClasspath));
    }

    #[test]
    fn strict_whitelist_requires_a_whitelist() {
        let err = ScanSpec::builder()
            .strict_whitelist(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::StrictWhitelistWithoutWhitelist));
    }

    #[test]
    fn contradictory_pattern_is_rejected() {
        let err = ScanSpec::builder()
            .with_whitelist_packages(["com/acme/"])
            .with_blacklist_packages(["com/acme/"])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ContradictoryPattern(_)));
    }
}
