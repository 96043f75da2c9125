//! The frozen, queryable class graph.
//!
//! [`cross_link`](linker::cross_link) is the only way to build a
//! [`ClassGraph`]; once built it is immutable and safe to query from any
//! number of threads without locking.

pub(crate) mod linker;
mod record;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use record::ClassRecord;

use crate::spec::ScanSpec;
use crate::types::ClassName;

/// The result of cross-linking a scan: every class discovered or referenced,
/// keyed by binary name, plus the spec the scan ran under (queries need it
/// to apply blacklist/external-visibility rules).
#[derive(Debug)]
pub struct ClassGraph {
    classes: BTreeMap<ClassName, ClassRecord>,
    pub(crate) spec: Arc<ScanSpec>,
}

impl ClassGraph {
    pub(crate) fn new(classes: BTreeMap<ClassName, ClassRecord>, spec: Arc<ScanSpec>) -> Self {
        Self { classes, spec }
    }

    /// Looks up a class record by binary name.
    #[must_use]
    pub fn get(&self, name: &ClassName) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    /// Every class record in the graph, in name order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    /// The number of class records in the graph, scanned and external alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// `true` if the graph holds no class records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
