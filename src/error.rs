//! Top-level error types surfaced from a scan.

/// A fatal error returned from [`crate::scan`].
///
/// Per-file parse failures and per-root resolution failures are *not*
/// represented here: those are non-fatal and collected into
/// [`crate::log::Diagnostics`] instead. Only failures that abort the whole
/// scan reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The [`crate::ScanSpec`] passed to the scan was invalid.
    #[error("invalid scan configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// Classpath resolution found nothing to scan.
    #[error("classpath resolution failed: {0}")]
    Resolution(#[from] crate::classpath::ResolutionError),
    /// Two classfiles claiming the same binary name disagreed on their
    /// recorded type signature.
    #[error("graph inconsistency for class `{class_name}`: {reason}")]
    GraphInconsistency {
        /// The binary name of the offending class.
        class_name: String,
        /// A human-readable description of the disagreement.
        reason: String,
    },
    /// The scan was cancelled before it finished.
    #[error("scan was interrupted")]
    Interrupted,
    /// One or more caller-supplied processors raised an error while
    /// handling a matched class.
    #[error("{} processor callback(s) failed", .errors.len())]
    Processor {
        /// The individual failures, in the order they were observed.
        errors: Vec<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// A problem with a [`crate::ScanSpec`] detected while building it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicit classpath override was given but resolved to no entries.
    #[error("the explicit classpath override contains no usable entries")]
    EmptyOverrideClasspath,
    /// `strict_whitelist` was requested but no whitelist patterns were
    /// given, which would make every class external.
    #[error("strict_whitelist requires at least one whitelist pattern")]
    StrictWhitelistWithoutWhitelist,
    /// The same pattern appears in both a whitelist and its corresponding
    /// blacklist.
    #[error("pattern `{0}` is present in both a whitelist and its blacklist")]
    ContradictoryPattern(String),
}
