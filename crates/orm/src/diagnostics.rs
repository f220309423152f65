//! Diagnostics emitted by models and collections
//!
//! Non-fatal notices (deprecated operations, the unescaped bulk upsert) go to
//! a sink injected through the model or collection configuration. The default
//! sink forwards them to `tracing` as warnings.

use std::fmt;
use std::sync::Arc;

/// A non-fatal notice about how the API is being used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A deprecated operation was called
    Deprecated {
        operation: &'static str,
        replacement: Option<&'static str>,
    },
    /// A bulk upsert inlined attribute values without escaping them
    UnescapedUpsert { table: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Deprecated {
                operation,
                replacement: Some(replacement),
            } => write!(
                f,
                "mysql-model: {} is deprecated method, use {} instead.",
                operation, replacement
            ),
            Diagnostic::Deprecated {
                operation,
                replacement: None,
            } => write!(f, "mysql-model: {} is deprecated method.", operation),
            Diagnostic::UnescapedUpsert { table } => write!(
                f,
                "mysql-model: bulk save into {} inlines values without escaping",
                table
            ),
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Default sink: a `tracing` warning per diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}

/// Shared sink handle stored in configurations
pub type DiagnosticsRef = Arc<dyn DiagnosticSink>;

pub fn default_sink() -> DiagnosticsRef {
    Arc::new(TracingSink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_deprecation_messages() {
        let with_replacement = Diagnostic::Deprecated {
            operation: "find",
            replacement: Some("fetch"),
        };
        assert_eq!(
            with_replacement.to_string(),
            "mysql-model: find is deprecated method, use fetch instead."
        );

        let without = Diagnostic::Deprecated {
            operation: "query",
            replacement: None,
        };
        assert_eq!(without.to_string(), "mysql-model: query is deprecated method.");
    }

    #[test]
    fn test_closure_sink_receives_diagnostics() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let sink: DiagnosticsRef = Arc::new(move |d: &Diagnostic| {
            captured.lock().unwrap().push(d.clone());
        });

        sink.emit(&Diagnostic::UnescapedUpsert {
            table: "users".to_string(),
        });

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Diagnostic::UnescapedUpsert {
                table: "users".to_string()
            }]
        );
    }
}
