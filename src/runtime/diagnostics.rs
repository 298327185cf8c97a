//! Diagnostics collection for member enumeration and runtime mirroring.
//!
//! This module provides the logging sink consumed by the enumeration core. Inspecting a
//! live process is a lenient operation by design: a member with inconsistent metadata is
//! reported here and skipped, never allowed to abort the enumeration that contains it.
//! The sink is injected into each enumeration call and is append-only from the core's
//! perspective; nothing in this crate reads entries back.
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for lock-free append operations, so a
//! host may hand the same container to UI code on another thread without coordination.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual entry with severity and context
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Category of the diagnostic source
//!
//! # Usage Examples
//!
//! ```rust
//! use monoscope::runtime::diagnostics::{Diagnostics, DiagnosticCategory};
//!
//! let diagnostics = Diagnostics::new();
//!
//! diagnostics.warning(
//!     DiagnosticCategory::Member,
//!     "failed to cache member Game.Entity.health",
//! );
//!
//! assert!(diagnostics.has_warnings());
//! for entry in diagnostics.iter() {
//!     println!("{entry}");
//! }
//! ```

use std::fmt;

use strum::Display;

/// Severity level of a diagnostic entry.
///
/// Mirrors the log/warning/error surface the host loader exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    #[strum(serialize = "INFO")]
    Info,

    /// Warning about a candidate that was dropped or metadata that looks suspect.
    ///
    /// Enumeration continues; the affected member is simply absent from the result.
    #[strum(serialize = "WARN")]
    Warning,

    /// Error indicating invalid metadata or a broken host link.
    ///
    /// Enumeration still continues; errors are never propagated per member.
    #[strum(serialize = "ERROR")]
    Error,
}

/// Category indicating the source or type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticCategory {
    /// Issues while walking a type's ancestor chain.
    Hierarchy,

    /// Issues while classifying or binding a single member candidate.
    Member,

    /// Decisions made by the injected policy gate.
    Policy,

    /// Issues with mirrored type metadata (dead references, unset links).
    Type,

    /// General issues not fitting other categories.
    General,
}

/// A single diagnostic entry with context information.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional metadata token related to the issue.
    pub token: Option<u32>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            token: None,
        }
    }

    /// Adds metadata token information to the diagnostic.
    #[must_use]
    pub fn with_token(mut self, token: u32) -> Self {
        self.token = Some(token);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(token) = self.token {
            write!(f, " (token: 0x{token:08x})")?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free append operations. The enumeration core
/// only ever appends; reading the collected entries is the host's concern.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Adds a diagnostic entry directly.
    ///
    /// Use this for diagnostics that need token context attached.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if any warning-level diagnostics have been collected.
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Iterates over all collected diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(DiagnosticSeverity::Info.to_string(), "INFO");
        assert_eq!(DiagnosticSeverity::Warning.to_string(), "WARN");
        assert_eq!(DiagnosticSeverity::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_push_and_query() {
        let diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_any());

        diagnostics.info(DiagnosticCategory::General, "mirroring 3 types");
        diagnostics.warning(DiagnosticCategory::Member, "dropped Game.Entity.health");

        assert!(diagnostics.has_any());
        assert!(diagnostics.has_warnings());
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.count(), 2);
    }

    #[test]
    fn test_diagnostic_display_with_token() {
        let entry = Diagnostic::new(
            DiagnosticSeverity::Error,
            DiagnosticCategory::Type,
            "dead base reference",
        )
        .with_token(0x02000007);

        let rendered = entry.to_string();
        assert!(rendered.contains("[ERROR] Type: dead base reference"));
        assert!(rendered.contains("0x02000007"));
    }

    #[test]
    fn test_iter_preserves_order() {
        let diagnostics = Diagnostics::new();
        diagnostics.info(DiagnosticCategory::General, "first");
        diagnostics.warning(DiagnosticCategory::Member, "second");

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
