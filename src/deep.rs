//! Deep-realization strategy.
//!
//! For types that do not describe their structure: walk every cell reachable
//! through [`Cell::children`] and require each one to be realized. No field
//! attribution, no trail detail below the type itself.

use std::collections::HashSet;

use tracing::trace;

use crate::audit::Audit;
use crate::cell::{Cell, Classification};
use crate::config::CheckOptions;
use crate::dispatch::CheckResult;
use crate::error::ClassifyError;
use crate::trail::Trail;

/// Whether every cell reachable from `root` is realized.
///
/// Returns `Ok(false)` as soon as one deferred cell is found, and `Ok(true)`
/// for leaves and empty containers. With `track_shared`, a shared cell
/// (`Rc`, `Arc`) is visited once, which also makes reference cycles
/// terminate.
pub fn is_fully_realized(root: &dyn Cell, options: &CheckOptions) -> Result<bool, ClassifyError> {
    let mut pending: Vec<&dyn Cell> = vec![root];
    let mut seen: HashSet<usize> = HashSet::new();
    let mut visited = 0usize;

    while let Some(cell) = pending.pop() {
        if options.track_shared {
            if let Some(identity) = cell.shared_identity() {
                if !seen.insert(identity) {
                    continue;
                }
            }
        }

        visited += 1;
        if cell.classify()? == Classification::Deferred {
            trace!(visited, "deferred cell found");
            return Ok(false);
        }

        // Reversed so children are visited in declaration order.
        let mut children = cell.children();
        children.reverse();
        pending.extend(children);
    }

    trace!(visited, "all reachable cells realized");
    Ok(true)
}

/// Deep participation for [`Audit::audit`]: a deferred cell anywhere below
/// `value` is reported against `value`'s own type.
pub fn audit_deep<T: Audit>(value: &T, trail: &Trail<'_>) -> CheckResult {
    if is_fully_realized(value, trail.options())? {
        Ok(None)
    } else {
        Ok(Some(trail.violation(T::type_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Thunk;
    use std::rc::Rc;
    use std::sync::Arc;

    fn realized(cell: &dyn Cell) -> bool {
        is_fully_realized(cell, &CheckOptions::default()).unwrap()
    }

    #[test]
    fn leaves_and_empty_values_are_realized() {
        assert!(realized(&42u32));
        assert!(realized(&Vec::<Thunk<u8>>::new()));
        assert!(realized(&String::from("text")));
    }

    #[test]
    fn deferred_at_any_depth_is_found() {
        let nested = vec![
            vec![Thunk::ready(1u8), Thunk::ready(2)],
            vec![Thunk::ready(3), Thunk::new(|| 4)],
        ];
        assert!(!realized(&nested));

        let forced = vec![vec![Thunk::ready(1u8)], vec![Thunk::ready(2)]];
        assert!(realized(&forced));
    }

    #[test]
    fn deferred_root_is_found() {
        assert!(!realized(&Thunk::new(|| 1u64)));
    }

    #[test]
    fn realized_thunk_is_walked_into() {
        let outer = Thunk::ready(vec![Thunk::new(|| 0u8)]);
        assert!(!realized(&outer));
    }

    #[test]
    fn shared_cells_visited_once() {
        let shared = Rc::new(Thunk::ready(7u32));
        let graph = vec![Rc::clone(&shared), Rc::clone(&shared), shared];
        assert!(realized(&graph));

        let pending = Arc::new(Thunk::new(|| 7u32));
        let graph = vec![Arc::clone(&pending), pending];
        assert!(!realized(&graph));
    }

    #[test]
    fn sharing_untracked_still_correct() {
        let options = CheckOptions::default().with_track_shared(false);
        let shared = Rc::new(Thunk::ready(7u32));
        let graph = vec![Rc::clone(&shared), shared];
        assert!(is_fully_realized(&graph, &options).unwrap());
    }

    #[test]
    fn poisoned_cell_is_an_error() {
        let thunk: Thunk<u8> = Thunk::new(|| panic!("no value"));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| thunk.force()));
        let graph = vec![thunk];
        assert!(is_fully_realized(&graph, &CheckOptions::default()).is_err());
    }
}
