//! Structured load diagnostics.
//!
//! Every problem the loader recovers from is recorded here as well as being
//! logged, so callers and tests can assert on degradation directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Control skipped or degraded
    Warning,
    /// Whole file unusable
    Error,
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File could not be read
    FileUnreadable {
        /// I/O error text
        message: String,
    },
    /// File is not well-formed XML
    MalformedXml {
        /// Parser error text
        message: String,
    },
    /// Root element is not `objectstore`
    UnexpectedRoot {
        /// Root element name as written
        root: String,
    },
    /// No `control` under the `objectstore` root
    NoControls,
    /// Control without a `key`
    MissingKey,
    /// Control without a `searchrecord`
    MissingSearchRecord,
    /// Control with more than one `searchrecords` block
    AmbiguousSearchRecords {
        /// Number of blocks found
        blocks: usize,
    },
    /// First record has no `method`
    MissingMethod,
    /// First record has no text value
    MissingValue,
    /// Selector builder rejected the record
    TranslationFailed {
        /// Builder error text
        message: String,
    },
    /// Selector matched a rejected pattern
    RejectedPattern {
        /// The pattern that matched
        pattern: String,
    },
    /// Unknown method, raw value used as selector (control kept)
    UnknownMethod {
        /// Method as written
        method: String,
    },
}

impl DiagnosticKind {
    /// Severity of this kind
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::FileUnreadable { .. } | Self::MalformedXml { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Whether the control was dropped from the store
    #[must_use]
    pub const fn skips_control(&self) -> bool {
        matches!(
            self,
            Self::MissingKey
                | Self::MissingSearchRecord
                | Self::AmbiguousSearchRecords { .. }
                | Self::MissingMethod
                | Self::MissingValue
                | Self::TranslationFailed { .. }
                | Self::RejectedPattern { .. }
        )
    }
}

/// One recovered problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Object-store file, when known
    pub source: Option<PathBuf>,
    /// Control key, when known
    pub key: Option<String>,
    /// What happened
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a diagnostic
    #[must_use]
    pub fn new(source: Option<&Path>, key: Option<&str>, kind: DiagnosticKind) -> Self {
        Self {
            source: source.map(Path::to_path_buf),
            key: key.map(str::to_string),
            kind,
        }
    }

    /// Severity of the underlying kind
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Key for messages, `unknown` if absent
    #[must_use]
    pub fn key_or_unknown(&self) -> &str {
        self.key.as_deref().unwrap_or("unknown")
    }

    /// Emit through `tracing` at the matching level
    pub fn log(&self) {
        match self.severity() {
            Severity::Error => tracing::error!("{self}"),
            Severity::Warning => tracing::warn!("{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self
            .source
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        match &self.kind {
            DiagnosticKind::FileUnreadable { message } => {
                write!(f, "Failed to load locators from {source}: {message}")
            }
            DiagnosticKind::MalformedXml { message } => {
                write!(f, "Failed to parse locators from {source}: {message}")
            }
            DiagnosticKind::UnexpectedRoot { root } => write!(
                f,
                "Expected <objectstore> root but found <{root}> in XML at {source}"
            ),
            DiagnosticKind::NoControls => write!(f, "No <control> found in XML at {source}"),
            DiagnosticKind::MissingKey
            | DiagnosticKind::MissingSearchRecord
            | DiagnosticKind::MissingMethod
            | DiagnosticKind::MissingValue => {
                write!(f, "Skipping invalid control: {}", self.key_or_unknown())
            }
            DiagnosticKind::AmbiguousSearchRecords { blocks } => write!(
                f,
                "Skipping invalid control: {} ({blocks} <searchrecords> blocks)",
                self.key_or_unknown()
            ),
            DiagnosticKind::TranslationFailed { message } => write!(
                f,
                "Failed to build selector for key: {}, error: {message}",
                self.key_or_unknown()
            ),
            DiagnosticKind::RejectedPattern { pattern } => write!(
                f,
                "Skipping problematic locator for key: {} (matches {pattern:?})",
                self.key_or_unknown()
            ),
            DiagnosticKind::UnknownMethod { method } => write!(
                f,
                "Unsupported locator method: {method} for key: {}, using as CSS selector",
                self.key_or_unknown()
            ),
        }
    }
}
