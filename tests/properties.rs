//! Property tests for trail shape and realized graphs.

use deferred_audit::{check, is_fully_realized, Audit, CheckOptions, Checker, Thunk};
use proptest::prelude::*;

#[derive(Audit)]
enum Chain {
    End(Thunk<u32>),
    Link(Box<Chain>),
}

fn chain(links: usize, tail: Thunk<u32>) -> Chain {
    (0..links).fold(Chain::End(tail), |inner, _| Chain::Link(Box::new(inner)))
}

#[derive(Audit)]
enum Tree {
    Leaf(Thunk<u32>),
    Node(Vec<Tree>),
}

fn tree(depth: usize, deferred: bool) -> Tree {
    if depth == 0 {
        let cell = if deferred {
            Thunk::new(|| 0)
        } else {
            Thunk::ready(0)
        };
        Tree::Leaf(cell)
    } else {
        Tree::Node(vec![tree(depth - 1, false), tree(depth - 1, deferred)])
    }
}

fn cells(deferred: &[bool]) -> Vec<Option<Thunk<u32>>> {
    deferred
        .iter()
        .enumerate()
        .map(|(i, &pending)| {
            let value = i as u32;
            Some(if pending {
                Thunk::new(move || value)
            } else {
                Thunk::ready(value)
            })
        })
        .collect()
}

fn has_consecutive_repeat(trail: &[String]) -> bool {
    trail.windows(2).any(|pair| pair[0] == pair[1])
}

proptest! {
    #[test]
    fn uniform_chain_collapses(links in 2usize..64) {
        let violation = check(&chain(links, Thunk::new(|| 1))).unwrap().unwrap();
        prop_assert_eq!(violation.trail(), ["u32", "Chain"]);
        prop_assert!(!has_consecutive_repeat(violation.trail()));
    }

    #[test]
    fn uniform_chain_without_collapse_keeps_every_frame(links in 0usize..32) {
        let checker = Checker::new(CheckOptions::default().with_collapse_repeats(false));
        let violation = checker.check(&chain(links, Thunk::new(|| 1))).unwrap().unwrap();
        prop_assert_eq!(violation.len(), links + 2);
        prop_assert_eq!(violation.innermost(), "u32");
    }

    #[test]
    fn alternating_recursion_never_repeats(depth in 1usize..8) {
        let violation = check(&tree(depth, true)).unwrap().unwrap();
        prop_assert!(!has_consecutive_repeat(violation.trail()));
        prop_assert_eq!(violation.innermost(), "u32");
        prop_assert_eq!(violation.outermost(), "Tree");
    }

    #[test]
    fn realized_graph_is_clean(len in 0usize..64) {
        let graph = cells(&vec![false; len]);
        prop_assert_eq!(check(&graph).unwrap(), None);
        prop_assert!(is_fully_realized(&graph).unwrap());
        prop_assert!(is_fully_realized(&tree(4, false)).unwrap());
    }

    #[test]
    fn any_deferred_cell_is_found(deferred in proptest::collection::vec(any::<bool>(), 1..64)) {
        let graph = cells(&deferred);
        let expect_clean = deferred.iter().all(|pending| !pending);

        let outcome = check(&graph).unwrap();
        prop_assert_eq!(outcome.is_none(), expect_clean);
        prop_assert_eq!(is_fully_realized(&graph).unwrap(), expect_clean);

        if let Some(violation) = outcome {
            prop_assert_eq!(violation.trail(), ["u32", "Option", "Vec"]);
            // Repeatable: same graph, same first violation.
            prop_assert_eq!(check(&graph).unwrap(), Some(violation));
        }
        prop_assert!(graph.iter().flatten().zip(&deferred).all(|(cell, pending)| cell.is_forced() != *pending));
    }
}
