//! Property-based tests for the location flattening projection.
//!
//! Invariants under test:
//! - Flattening is a pre-order traversal: every node is emitted before all
//!   of its descendants, siblings keep their original order.
//! - Depth equals the number of ancestors.
//! - Name search is monotone: results are a subset of the unfiltered list,
//!   and membership is exactly "name contains query, case-insensitive".

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::api::models::{LocationKind, LocationNode};
use crate::core::locations::{filter_locations, flatten_locations, FlatLocation};

fn arb_kind() -> impl Strategy<Value = LocationKind> {
    prop_oneof![
        Just(LocationKind::Campus),
        Just(LocationKind::Building),
        Just(LocationKind::Floor),
        Just(LocationKind::Room),
    ]
}

fn arb_node() -> impl Strategy<Value = LocationNode> {
    let leaf = ("[A-Za-z ]{1,12}", arb_kind()).prop_map(|(name, kind)| LocationNode {
        id: String::new(),
        name,
        kind,
        children: vec![],
    });
    leaf.prop_recursive(4, 24, 4, |inner| {
        (
            "[A-Za-z ]{1,12}",
            arb_kind(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, kind, children)| LocationNode {
                id: String::new(),
                name,
                kind,
                children,
            })
    })
}

fn arb_forest() -> impl Strategy<Value = Vec<LocationNode>> {
    prop::collection::vec(arb_node(), 0..4).prop_map(|mut roots| {
        let mut counter = 0usize;
        for root in &mut roots {
            renumber(root, &mut counter);
        }
        roots
    })
}

/// Give every node a unique id so positions are identifiable.
fn renumber(node: &mut LocationNode, counter: &mut usize) {
    node.id = format!("n{}", *counter);
    *counter += 1;
    for child in &mut node.children {
        renumber(child, counter);
    }
}

/// Reference implementation: straightforward recursive pre-order.
fn reference_preorder(roots: &[LocationNode]) -> Vec<FlatLocation> {
    fn walk(node: &LocationNode, depth: usize, out: &mut Vec<FlatLocation>) {
        out.push(FlatLocation {
            id: node.id.clone(),
            name: node.name.clone(),
            depth,
            kind: node.kind,
        });
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    for root in roots {
        walk(root, 0, &mut out);
    }
    out
}

fn subtree_size(node: &LocationNode) -> usize {
    1 + node.children.iter().map(subtree_size).sum::<usize>()
}

fn collect_sizes(node: &LocationNode, out: &mut Vec<(String, usize)>) {
    out.push((node.id.clone(), subtree_size(node)));
    for child in &node.children {
        collect_sizes(child, out);
    }
}

proptest! {
    #[test]
    fn prop_flatten_matches_recursive_preorder(roots in arb_forest()) {
        let flat = flatten_locations(&roots);
        let expected = reference_preorder(&roots);
        prop_assert_eq!(flat, expected);
    }

    #[test]
    fn prop_every_node_precedes_its_descendants(roots in arb_forest()) {
        let flat = flatten_locations(&roots);

        let mut sizes = Vec::new();
        for root in &roots {
            collect_sizes(root, &mut sizes);
        }

        for (id, size) in sizes {
            let index = flat.iter().position(|f| f.id == id).unwrap();
            let depth = flat[index].depth;
            // The subtree occupies exactly the next `size - 1` entries,
            // all strictly deeper than the node itself.
            for offset in 1..size {
                prop_assert!(flat[index + offset].depth > depth);
            }
            if index + size < flat.len() {
                prop_assert!(flat[index + size].depth <= depth);
            }
        }
    }

    #[test]
    fn prop_depth_is_ancestor_count(roots in arb_forest()) {
        // Walk the tree tracking ancestry explicitly and compare.
        fn check(node: &LocationNode, ancestors: usize, flat: &[FlatLocation]) -> Result<(), TestCaseError> {
            let entry = flat.iter().find(|f| f.id == node.id).unwrap();
            prop_assert_eq!(entry.depth, ancestors);
            for child in &node.children {
                check(child, ancestors + 1, flat)?;
            }
            Ok(())
        }
        let flat = flatten_locations(&roots);
        for root in &roots {
            check(root, 0, &flat)?;
        }
    }

    #[test]
    fn prop_search_is_monotone(roots in arb_forest(), query in "[A-Za-z ]{0,6}") {
        let flat = flatten_locations(&roots);
        let filtered = filter_locations(&flat, &query);
        let needle = query.to_lowercase();

        // Subset of the unfiltered list, in order.
        let mut last_index = 0usize;
        for hit in &filtered {
            let index = flat
                .iter()
                .enumerate()
                .skip(last_index)
                .find(|(_, f)| f == hit)
                .map(|(i, _)| i);
            prop_assert!(index.is_some());
            last_index = index.unwrap() + 1;
        }

        // Exact membership condition.
        for entry in &flat {
            let matches = entry.name.to_lowercase().contains(&needle);
            let present = filtered.iter().any(|f| f.id == entry.id);
            prop_assert_eq!(matches, present);
        }
    }

    #[test]
    fn prop_empty_query_is_identity(roots in arb_forest()) {
        let flat = flatten_locations(&roots);
        let unfiltered = filter_locations(&flat, "");
        prop_assert_eq!(unfiltered.len(), flat.len());
        for (a, b) in unfiltered.iter().zip(flat.iter()) {
            prop_assert_eq!(*a, b);
        }
    }
}
