//! Structured diagnostics collected during a scan.
//!
//! The hierarchical "log tree" of the original design is expressed here as
//! a `tracing` span hierarchy (one span per scan, a child span per
//! classpath root, a grandchild per archive entry) plus a flat buffer of
//! non-fatal [`Diagnostic`] values that is only turned into log events once,
//! after the parallel parse phase joins, so concurrent workers never
//! interleave their output.

use std::sync::Mutex;

/// The severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Something was skipped but the scan is otherwise healthy.
    Info,
    /// Something was skipped that the caller likely wants to know about.
    Warn,
    /// A root or entry could not be processed at all.
    Error,
}

/// A single non-fatal problem encountered while resolving or parsing.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity of the problem.
    pub level: Level,
    /// The classpath root this diagnostic is about, if any.
    pub root: Option<String>,
    /// The specific entry (classfile path, archive member) this
    /// diagnostic is about, if any.
    pub entry: Option<String>,
    /// A human-readable description.
    pub message: String,
}

/// A thread-safe buffer of diagnostics accumulated during a scan.
///
/// Workers append to it concurrently during the parse phase; nothing reads
/// it until [`Diagnostics::flush_to_tracing`] is called after the worker
/// pool joins.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Creates an empty diagnostics buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic. Safe to call from any worker thread.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(diagnostic);
    }

    /// Convenience for [`Level::Info`].
    pub fn info(&self, root: Option<&str>, entry: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            level: Level::Info,
            root: root.map(str::to_owned),
            entry: entry.map(str::to_owned),
            message: message.into(),
        });
    }

    /// Convenience for [`Level::Warn`].
    pub fn warn(&self, root: Option<&str>, entry: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            level: Level::Warn,
            root: root.map(str::to_owned),
            entry: entry.map(str::to_owned),
            message: message.into(),
        });
    }

    /// Convenience for [`Level::Error`].
    pub fn error(&self, root: Option<&str>, entry: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            level: Level::Error,
            root: root.map(str::to_owned),
            entry: entry.map(str::to_owned),
            message: message.into(),
        });
    }

    /// Returns a snapshot of everything collected so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_empty()
    }

    /// Drains the buffer, emitting one `tracing` event per diagnostic.
    ///
    /// Called once, on the caller thread, after the worker pool has joined.
    pub fn flush_to_tracing(&self) {
        let drained = std::mem::take(
            &mut *self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        for d in drained {
            match d.level {
                Level::Info => {
                    tracing::info!(root = d.root.as_deref(), entry = d.entry.as_deref(), "{}", d.message);
                }
                Level::Warn => {
                    tracing::warn!(root = d.root.as_deref(), entry = d.entry.as_deref(), "{}", d.message);
                }
                Level::Error => {
                    tracing::error!(root = d.root.as_deref(), entry = d.entry.as_deref(), "{}", d.message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_snapshot_round_trips() {
        let d = Diagnostics::new();
        d.warn(Some("app.jar"), Some("Foo.class"), "bad magic number");
        let snap = d.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].level, Level::Warn);
        assert_eq!(snap[0].entry.as_deref(), Some("Foo.class"));
    }

    #[test]
    fn flush_drains_the_buffer() {
        let d = Diagnostics::new();
        d.info(None, None, "hello");
        d.flush_to_tracing();
        assert!(d.is_empty());
    }
}
