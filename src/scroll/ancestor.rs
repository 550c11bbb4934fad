//! Nearest scrollable ancestor lookup.

/// Walk upward from `start` (inclusive) and return the first node for which
/// `has_overflow` holds, or `None` at the root.
///
/// Iterative and side-effect free, so it can be re-run whenever the tree changes.
pub fn find_scroll_parent<N, P, O>(start: Option<N>, mut parent_of: P, mut has_overflow: O) -> Option<N>
where
    P: FnMut(&N) -> Option<N>,
    O: FnMut(&N) -> bool,
{
    let mut current = start;
    while let Some(node) = current {
        if has_overflow(&node) {
            return Some(node);
        }
        current = parent_of(&node);
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    struct Node {
        parent: Option<usize>,
        scroll_height: f64,
        client_height: f64,
    }

    fn tree() -> Vec<Node> {
        vec![
            Node { parent: None, scroll_height: 2000.0, client_height: 800.0 },
            Node { parent: Some(0), scroll_height: 500.0, client_height: 500.0 },
            Node { parent: Some(1), scroll_height: 100.0, client_height: 100.0 },
        ]
    }

    #[test]
    fn test_finds_nearest_overflowing() {
        let nodes = tree();
        let found = find_scroll_parent(
            Some(2),
            |&i| nodes[i].parent,
            |&i| nodes[i].scroll_height > nodes[i].client_height,
        );
        assert_eq!(found, Some(0));
    }

    #[test]
    fn test_start_node_counts() {
        let nodes = tree();
        let found = find_scroll_parent(Some(0), |&i| nodes[i].parent, |_| true);
        assert_eq!(found, Some(0));
    }

    #[test]
    fn test_none_without_overflow() {
        let nodes = tree();
        assert_eq!(find_scroll_parent(Some(2), |&i| nodes[i].parent, |_| false), None);
        assert_eq!(find_scroll_parent(None::<usize>, |_| None, |_| true), None);
    }
}
