//! API diagnostics → host diagnostics

use controlplane::{DiagnosticLevel, Response};
use declarative::{Diagnostic, Outcome};

/// Convert one API diagnostic, keeping its message
///
/// Unspecified levels are surfaced as warnings.
pub fn bridge(diagnostic: controlplane::Diagnostic) -> Diagnostic {
    match diagnostic.level {
        DiagnosticLevel::Error => Diagnostic::error(diagnostic.message),
        DiagnosticLevel::Warning | DiagnosticLevel::Unspecified => {
            Diagnostic::warning(diagnostic.message)
        }
    }
}

/// Convert an API response into a harness outcome
pub fn outcome<T>(response: Response<T>) -> Outcome<T> {
    Outcome::with_diagnostics(
        response.value,
        response.diagnostics.into_iter().map(bridge).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Severity;

    fn api(level: DiagnosticLevel, message: &str) -> controlplane::Diagnostic {
        controlplane::Diagnostic {
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_levels_map_to_severity() {
        assert_eq!(bridge(api(DiagnosticLevel::Error, "e")).severity, Severity::Error);
        assert_eq!(bridge(api(DiagnosticLevel::Warning, "w")).severity, Severity::Warning);
        assert_eq!(
            bridge(api(DiagnosticLevel::Unspecified, "u")).severity,
            Severity::Warning
        );
    }

    #[test]
    fn test_outcome_keeps_order_and_messages() {
        let response = Response::new(
            7,
            vec![
                api(DiagnosticLevel::Warning, "first"),
                api(DiagnosticLevel::Warning, "second"),
            ],
        );
        let outcome = outcome(response);
        assert_eq!(outcome.value, 7);
        assert!(!outcome.has_errors());
        let messages: Vec<_> = outcome.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
