//! Structured conversion diagnostics.
//!
//! The pipeline never aborts for recoverable issues; it records them here
//! and keeps going. The surrounding layer decides how to render them.

use recast_engine::rules::RuleDiagnostic;
use serde::{Deserialize, Serialize};

/// Severity of a conversion diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Something was skipped or defaulted; no action needed.
    Info,
    /// The converted output may need a manual touch-up.
    Warning,
    /// Part of the document could not be converted.
    Error,
}

impl std::fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One diagnostic attached to a source location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Slash-separated path of the item concerned (e.g. `Orders/Create`).
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Severity level.
    pub severity: WarningSeverity,
}

impl ImportWarning {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    /// Info-level diagnostic.
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Info)
    }

    /// Warning-level diagnostic.
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Warning)
    }

    /// Error-level diagnostic.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Error)
    }

    /// Diagnostic for a transform rule that failed to compile and was
    /// skipped.
    pub fn rule_skipped(path: impl Into<String>, diagnostic: RuleDiagnostic) -> Self {
        Self::warning(
            path,
            format!(
                "rule '{}' was skipped: {}",
                diagnostic.rule, diagnostic.message
            ),
        )
    }

    /// Returns true for error-level diagnostics.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, WarningSeverity::Error)
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Aggregate counts over a diagnostic list.
#[derive(Debug, Default, Clone, Copy)]
pub struct WarningStats {
    /// Info-level count.
    pub info_count: usize,
    /// Warning-level count.
    pub warning_count: usize,
    /// Error-level count.
    pub error_count: usize,
}

impl WarningStats {
    /// Tallies a diagnostic list.
    #[must_use]
    pub fn from_warnings(warnings: &[ImportWarning]) -> Self {
        let mut stats = Self::default();
        for warning in warnings {
            match warning.severity {
                WarningSeverity::Info => stats.info_count += 1,
                WarningSeverity::Warning => stats.warning_count += 1,
                WarningSeverity::Error => stats.error_count += 1,
            }
        }
        stats
    }

    /// Total diagnostic count.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info_count + self.warning_count + self.error_count
    }

    /// Returns true if any error-level diagnostics were recorded.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let warning = ImportWarning::warning("Orders/Create", "auth type skipped");
        assert_eq!(
            warning.to_string(),
            "[warning] Orders/Create: auth type skipped"
        );
    }

    #[test]
    fn test_rule_skipped_mentions_rule_name() {
        let warning = ImportWarning::rule_skipped(
            "preprocess",
            RuleDiagnostic {
                rule: "broken".to_string(),
                message: "unclosed group".to_string(),
            },
        );
        assert!(warning.message.contains("broken"));
        assert_eq!(warning.severity, WarningSeverity::Warning);
    }

    #[test]
    fn test_stats_tally() {
        let warnings = vec![
            ImportWarning::info("a", "skipped"),
            ImportWarning::warning("b", "touch-up"),
            ImportWarning::error("c", "lost"),
            ImportWarning::error("d", "lost"),
        ];

        let stats = WarningStats::from_warnings(&warnings);
        assert_eq!(stats.info_count, 1);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.error_count, 2);
        assert_eq!(stats.total(), 4);
        assert!(stats.has_errors());
    }
}
