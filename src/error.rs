//! Error types.
//!
//! A found deferred cell is not an error: it is reported as a
//! [`Violation`](crate::Violation). Errors here mean the check itself could
//! not be completed.

use std::borrow::Cow;
use thiserror::Error;

/// A cell whose representation could not be classified.
///
/// Never treated as "no violation": callers of `check` always see it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The producer of a deferred cell panicked; the cell holds neither a
    /// value nor a computation.
    #[error("cell of type {type_name} is poisoned: its producer panicked")]
    Poisoned { type_name: Cow<'static, str> },

    /// A custom cell reported a representation it cannot interpret.
    #[error("cell of type {type_name} has an unsupported representation: {detail}")]
    Unsupported {
        type_name: Cow<'static, str>,
        detail: String,
    },
}

impl ClassifyError {
    /// Type name of the cell that failed.
    pub fn type_name(&self) -> &str {
        match self {
            ClassifyError::Poisoned { type_name } => type_name,
            ClassifyError::Unsupported { type_name, .. } => type_name,
        }
    }
}

/// Invalid checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected one of 1/0, true/false, yes/no, on/off")]
    InvalidBool { var: &'static str, value: String },
}

/// A violation trail that names no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("violation trail must name at least the deferred cell")]
pub struct EmptyTrailError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_error_display() {
        let err = ClassifyError::Poisoned {
            type_name: Cow::Borrowed("Ledger"),
        };
        assert!(err.to_string().contains("Ledger"));
        assert_eq!(err.type_name(), "Ledger");

        let err = ClassifyError::Unsupported {
            type_name: Cow::Borrowed("ForeignHandle"),
            detail: "tag 9".to_string(),
        };
        assert!(err.to_string().contains("tag 9"));
        assert_eq!(err.type_name(), "ForeignHandle");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidBool {
            var: "DEFERRED_AUDIT_TRACK_SHARED",
            value: "maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DEFERRED_AUDIT_TRACK_SHARED"));
        assert!(msg.contains("maybe"));
    }
}
