//! The result of a failing check.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EmptyTrailError;

/// An unexpected deferred cell, located by the trail of type names leading to
/// it (innermost first).
///
/// Built once by the dispatcher and never mutated; the trail is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawViolation")]
pub struct Violation {
    trail: Vec<String>,
}

/// Wire form, checked before it becomes a [`Violation`].
#[derive(Deserialize)]
struct RawViolation {
    trail: Vec<String>,
}

impl TryFrom<Vec<String>> for Violation {
    type Error = EmptyTrailError;

    fn try_from(trail: Vec<String>) -> Result<Self, Self::Error> {
        if trail.is_empty() {
            return Err(EmptyTrailError);
        }
        Ok(Self { trail })
    }
}

impl TryFrom<RawViolation> for Violation {
    type Error = EmptyTrailError;

    fn try_from(raw: RawViolation) -> Result<Self, Self::Error> {
        Self::try_from(raw.trail)
    }
}

impl Violation {
    pub(crate) fn new(trail: Vec<String>) -> Self {
        debug_assert!(!trail.is_empty(), "a violation always names its cell");
        Self { trail }
    }

    /// Type names from the deferred cell outwards to the checked root.
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    /// Type of the deferred cell itself.
    pub fn innermost(&self) -> &str {
        self.trail.first().map(String::as_str).unwrap_or_default()
    }

    /// Type of the value `check` was called on (after collapsing).
    pub fn outermost(&self) -> &str {
        self.trail.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn into_trail(self) -> Vec<String> {
        self.trail
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected deferred cell: {}", self.trail.join(" < "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Violation {
        Violation::new(vec![
            "Payload".to_string(),
            "BTreeMap".to_string(),
            "Registry".to_string(),
        ])
    }

    #[test]
    fn accessors() {
        let violation = sample();
        assert_eq!(violation.innermost(), "Payload");
        assert_eq!(violation.outermost(), "Registry");
        assert_eq!(violation.len(), 3);
        assert!(!violation.is_empty());
    }

    #[test]
    fn display_renders_trail() {
        assert_eq!(
            sample().to_string(),
            "unexpected deferred cell: Payload < BTreeMap < Registry"
        );
    }

    #[test]
    fn serializes_as_trail() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "trail": ["Payload", "BTreeMap", "Registry"] })
        );
        let back: Violation = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn empty_trail_is_rejected() {
        let err = serde_json::from_str::<Violation>(r#"{"trail": []}"#).unwrap_err();
        assert!(err.to_string().contains("at least the deferred cell"));

        assert_eq!(Violation::try_from(Vec::<String>::new()), Err(EmptyTrailError));
        let violation = Violation::try_from(vec!["u8".to_string()]).unwrap();
        assert_eq!(violation.innermost(), "u8");
    }
}
