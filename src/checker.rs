//! Top-level entry points.

use tracing::{debug, warn};

use crate::audit::Audit;
use crate::cell::Cell;
use crate::config::CheckOptions;
use crate::deep;
use crate::dispatch::{self, CheckResult};
use crate::error::{ClassifyError, ConfigError};
use crate::trail::Trail;

/// Runs checks with a fixed set of options.
///
/// Holds no state between calls; one checker can be shared across threads
/// and used for any number of concurrent checks.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    options: CheckOptions,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    /// Checker configured from `DEFERRED_AUDIT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(CheckOptions::from_env()?))
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check `value`, starting from an empty trail.
    ///
    /// `Ok(None)`: no unexpected deferred cell. `Ok(Some(_))`: the first one
    /// found. `Err(_)`: a cell could not be classified.
    pub fn check<T: Audit>(&self, value: &T) -> CheckResult {
        let trail = Trail::root(&self.options);
        let result = dispatch::dispatch(value, &trail);
        match &result {
            Ok(Some(violation)) => debug!(
                root = %T::type_name(),
                trail = %violation,
                "deferred cell found"
            ),
            Ok(None) => {}
            Err(error) => warn!(root = %T::type_name(), %error, "cell classification failed"),
        }
        result
    }

    /// Whether every cell reachable from `value` is realized.
    pub fn is_fully_realized<T: Cell>(&self, value: &T) -> Result<bool, ClassifyError> {
        deep::is_fully_realized(value, &self.options)
    }

    /// Panic with the trail if `value` holds an unexpected deferred cell.
    ///
    /// Meant for tests and debug assertions.
    #[track_caller]
    pub fn assert_realized<T: Audit>(&self, value: &T) {
        match self.check(value) {
            Ok(None) => {}
            Ok(Some(violation)) => panic!("{violation}"),
            Err(error) => panic!("deferred-cell check failed: {error}"),
        }
    }
}

/// Check `value` with default options.
pub fn check<T: Audit>(value: &T) -> CheckResult {
    Checker::default().check(value)
}

/// Deep strategy over `value` with default options.
pub fn is_fully_realized<T: Cell>(value: &T) -> Result<bool, ClassifyError> {
    Checker::default().is_fully_realized(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Thunk;
    use std::collections::BTreeMap;

    #[test]
    fn checks_start_from_empty_trail() {
        let checker = Checker::default();
        let map: BTreeMap<u8, Thunk<u8>> = [(1, Thunk::new(|| 1))].into_iter().collect();

        let first = checker.check(&map).unwrap().unwrap();
        let second = checker.check(&map).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.trail(), ["u8", "BTreeMap"]);
    }

    #[test]
    fn options_reach_the_trail() {
        let nested = vec![vec![Thunk::new(|| 0u8)]];

        let collapsed = Checker::default().check(&nested).unwrap().unwrap();
        assert_eq!(collapsed.trail(), ["u8", "Vec"]);

        let checker = Checker::new(CheckOptions::default().with_collapse_repeats(false));
        let full = checker.check(&nested).unwrap().unwrap();
        assert_eq!(full.trail(), ["u8", "Vec", "Vec"]);
    }

    #[test]
    fn assert_realized_passes_on_clean_value() {
        Checker::default().assert_realized(&vec![Thunk::ready(1u8)]);
    }

    #[test]
    #[should_panic(expected = "u8 < Vec")]
    fn assert_realized_panics_with_trail() {
        Checker::default().assert_realized(&vec![Thunk::new(|| 1u8)]);
    }

    #[test]
    fn free_functions_use_defaults() {
        assert_eq!(check(&Thunk::ready(1u8)).unwrap(), None);
        assert!(is_fully_realized(&Thunk::ready(1u8)).unwrap());
        assert!(!is_fully_realized(&Thunk::new(|| 1u8)).unwrap());
    }
}
