//! Flattened projection of the location tree, plus name search.
//!
//! The tree arrives nested from the server; list UIs want one ordered,
//! depth-annotated sequence. Flattening and filtering are deliberately
//! separate passes so a new query never re-walks the tree.

use crate::api::models::{LocationKind, LocationNode};

/// One row of the flattened location list. `depth` is the number of
/// ancestors; roots sit at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLocation {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub kind: LocationKind,
}

/// Pre-order flattening: every node is emitted before its children, and
/// children keep their original order. Pure; recomputed whenever the
/// source tree changes. Iterative so nesting depth is unbounded.
pub fn flatten_locations(roots: &[LocationNode]) -> Vec<FlatLocation> {
    let mut out = Vec::new();
    let mut stack: Vec<(&LocationNode, usize)> = roots.iter().rev().map(|r| (r, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        out.push(FlatLocation {
            id: node.id.clone(),
            name: node.name.clone(),
            depth,
            kind: node.kind,
        });
        for child in node.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}

/// Case-insensitive substring filter over `name` only. An empty query
/// yields the whole list in its original pre-order.
pub fn filter_locations<'a>(flat: &'a [FlatLocation], query: &str) -> Vec<&'a FlatLocation> {
    if query.is_empty() {
        return flat.iter().collect();
    }
    let needle = query.to_lowercase();
    flat.iter()
        .filter(|location| location.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, kind: LocationKind, children: Vec<LocationNode>) -> LocationNode {
        LocationNode {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            children,
        }
    }

    #[test]
    fn test_flatten_single_parent_child() {
        let roots = vec![node(
            "A",
            "Main Campus",
            LocationKind::Campus,
            vec![node("B", "Block B", LocationKind::Building, vec![])],
        )];
        let flat = flatten_locations(&roots);
        assert_eq!(flat.len(), 2);
        assert_eq!((flat[0].id.as_str(), flat[0].depth), ("A", 0));
        assert_eq!((flat[1].id.as_str(), flat[1].depth), ("B", 1));
    }

    #[test]
    fn test_flatten_empty_input() {
        assert!(flatten_locations(&[]).is_empty());
    }

    #[test]
    fn test_flatten_sibling_order_preserved() {
        let roots = vec![
            node(
                "c1",
                "North",
                LocationKind::Campus,
                vec![
                    node("b1", "Alpha", LocationKind::Building, vec![]),
                    node("b2", "Beta", LocationKind::Building, vec![]),
                ],
            ),
            node("c2", "South", LocationKind::Campus, vec![]),
        ];
        let flat = flatten_locations(&roots);
        let ids: Vec<&str> = flat.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "b1", "b2", "c2"]);
    }

    #[test]
    fn test_flatten_depth_counts_ancestors() {
        let roots = vec![node(
            "c",
            "Campus",
            LocationKind::Campus,
            vec![node(
                "b",
                "Building",
                LocationKind::Building,
                vec![node(
                    "f",
                    "Floor",
                    LocationKind::Floor,
                    vec![node("r", "Room", LocationKind::Room, vec![])],
                )],
            )],
        )];
        let depths: Vec<usize> = flatten_locations(&roots).iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_name_only() {
        let flat = vec![
            FlatLocation {
                id: "pump".into(),
                name: "Pump Room".into(),
                depth: 2,
                kind: LocationKind::Room,
            },
            FlatLocation {
                id: "roof".into(),
                name: "Roof".into(),
                depth: 1,
                kind: LocationKind::Floor,
            },
        ];
        let hits = filter_locations(&flat, "pUmP");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "pump");

        // "roof" appears in the id of neither and matching ignores ids anyway
        let hits = filter_locations(&flat, "pump room");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_filter_empty_query_returns_all_in_order() {
        let flat = vec![
            FlatLocation {
                id: "a".into(),
                name: "A".into(),
                depth: 0,
                kind: LocationKind::Campus,
            },
            FlatLocation {
                id: "b".into(),
                name: "B".into(),
                depth: 1,
                kind: LocationKind::Building,
            },
        ];
        let all = filter_locations(&flat, "");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[1].id, "b");
    }

    #[test]
    fn test_filter_no_match_is_empty_not_error() {
        let flat = vec![FlatLocation {
            id: "a".into(),
            name: "Atrium".into(),
            depth: 0,
            kind: LocationKind::Campus,
        }];
        assert!(filter_locations(&flat, "zzz").is_empty());
    }
}
