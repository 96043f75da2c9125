#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! A fast, in-memory classpath scanner.
//!
//! This crate parses JVM classfiles directly off disk (or out of jars, or
//! out of jars nested inside jars) without ever starting a JVM, and links
//! the results into a queryable class graph: superclasses, interfaces,
//! annotations, fields, and methods, all cross-referenced in both
//! directions.
//!
//! ## Features
#![doc = document_features::document_features!()]

pub mod archive;
pub mod classfile;
pub mod classpath;
pub mod error;
pub mod graph;
pub mod log;
pub mod model;
pub(crate) mod macros;
pub mod query;
pub mod resource;
pub mod scan;
pub mod spec;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use error::ScanError;
pub use graph::{ClassGraph, ClassRecord};
pub use spec::{ScanSpec, ScanSpecBuilder};

use std::sync::Arc;

/// Runs a full scan: resolves the classpath described by `spec`, parses every
/// matching classfile in parallel, and cross-links the results into a frozen
/// [`ClassGraph`].
///
/// # Errors
///
/// Returns [`ScanError`] for configuration problems, graph inconsistencies,
/// or cooperative cancellation. Per-file and per-root failures are
/// non-fatal; they accumulate in [`ScanResult::diagnostics`] instead.
pub fn scan(spec: ScanSpec) -> Result<ScanResult, ScanError> {
    let spec = Arc::new(spec);
    scan::run(spec)
}

/// Like [`scan`], but walks `providers` (classloader-like delegation chains)
/// instead of requiring `spec` to carry an explicit classpath override.
///
/// # Errors
///
/// Same as [`scan`].
pub fn scan_with_providers(
    spec: ScanSpec,
    providers: &[&dyn classpath::ClassLoaderProvider],
) -> Result<ScanResult, ScanError> {
    let spec = Arc::new(spec);
    scan::run_with_providers(spec, providers)
}

/// Spawns a scan on a dedicated thread, returning a handle that can cancel
/// it cooperatively before it finishes.
#[must_use]
pub fn spawn(spec: ScanSpec) -> scan::ScanHandle {
    scan::spawn(Arc::new(spec))
}

/// The outcome of a successful [`scan`] call.
#[derive(Debug)]
pub struct ScanResult {
    /// The frozen, queryable class graph.
    pub graph: ClassGraph,
    /// Non-classfile resources matched against [`ScanSpec`]'s resource
    /// matchers.
    pub resources: Vec<resource::Resource>,
    /// Non-fatal problems encountered along the way.
    pub diagnostics: log::Diagnostics,
}
