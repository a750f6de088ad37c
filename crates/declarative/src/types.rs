//! Core types for declarative resource management

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported to the user, does not fail the operation
    Warning,
    /// Fails the operation
    Error,
}

/// A message surfaced to the user by the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Check if this diagnostic fails the operation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Diagnostic sink passed to every operation
///
/// Operations append to the sink instead of returning errors. The presence
/// of any error diagnostic is the failure signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Append an error diagnostic
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::error(message));
    }

    /// Append a warning diagnostic
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::warning(message));
    }

    /// Check if any error has been recorded
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    /// Number of error diagnostics
    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A remote call result together with the diagnostics the API attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    /// Wrap a value with no diagnostics
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Wrap a value with diagnostics
    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Check if the API reported an error alongside the value
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Transform the value, keeping the diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// What an update does when the remote object has disappeared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotFoundPolicy {
    /// Drop the resource from state so the next plan re-creates it
    RemoveFromState,
    /// Fail and ask the user to re-create the resource
    Fail,
}

/// Which attributes a successful remote call refreshes in state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadRefresh {
    /// Replace the whole state with the remote view
    Full,
    /// Only refresh `id` and attributes still null; every other attribute
    /// keeps the value already held
    IdOnly,
}

/// Result of an operation that may change or drop existing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "state", rename_all = "snake_case")]
pub enum StateOutcome {
    /// New state to store
    Set(Value),
    /// Resource no longer exists and must be removed from state
    Removed,
    /// Operation failed; keep the prior state
    Unchanged,
}

impl StateOutcome {
    /// Get the new state, if any
    pub fn state(&self) -> Option<&Value> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Check if the resource was dropped from state
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_error_signal() {
        let mut diags = Diagnostics::new();
        diags.warning("heads up");
        assert!(!diags.has_errors());

        diags.error("broken");
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_diagnostics_serialize_as_list() {
        let mut diags = Diagnostics::new();
        diags.warning("careful");
        let json = serde_json::to_value(&diags).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "severity": "warning", "message": "careful" }])
        );
    }

    #[test]
    fn test_outcome_map_keeps_diagnostics() {
        let outcome = Outcome::with_diagnostics(2, vec![Diagnostic::warning("w")]);
        let mapped = outcome.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert_eq!(mapped.diagnostics.len(), 1);
        assert!(!mapped.has_errors());
    }
}
