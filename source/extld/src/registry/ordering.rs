use std::collections::{HashMap, HashSet};

/// One node to place in the activation order: its stable name, its `order`
/// tiebreak field, and the `before`/`after` sets of names it must sort
/// relative to.
pub struct OrderedNode<'a> {
    pub name: &'a str,
    pub order: i32,
    pub before: &'a [&'a str],
    pub after: &'a [&'a str],
}

/// Topologically sorts `nodes` over the before/after graph, breaking ties
/// (and cycles) with `(order, name)`. Cycles never abort the sort: any node
/// that can't be placed by the graph falls back to the numeric/name
/// tiebreaker, which is still a deterministic, stable total order.
pub fn topo_sort(nodes: &[OrderedNode<'_>]) -> Vec<String> {
    let index_of: HashMap<&str, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.name, i)).collect();

    // edge a -> b means "a before b"
    let mut out_edges: Vec<HashSet<usize>> = vec![HashSet::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        for &b in node.before {
            if let Some(&j) = index_of.get(b) {
                if out_edges[i].insert(j) {
                    in_degree[j] += 1;
                }
            }
        }
        for &a in node.after {
            if let Some(&j) = index_of.get(a) {
                if out_edges[j].insert(i) {
                    in_degree[i] += 1;
                }
            }
        }
    }

    let mut placed = vec![false; nodes.len()];
    let mut result = Vec::with_capacity(nodes.len());

    while result.len() < nodes.len() {
        // Among all not-yet-placed nodes with in-degree 0, pick the
        // (order, name) minimum; if none has in-degree 0 (a cycle), fall
        // back to the (order, name) minimum among all remaining nodes.
        let ready: Vec<usize> = (0..nodes.len())
            .filter(|&i| !placed[i] && in_degree[i] == 0)
            .collect();
        let candidates = if ready.is_empty() {
            (0..nodes.len()).filter(|&i| !placed[i]).collect::<Vec<_>>()
        } else {
            ready
        };

        let next = *candidates
            .iter()
            .min_by_key(|&&i| (nodes[i].order, nodes[i].name))
            .expect("candidates is non-empty while result is incomplete");

        placed[next] = true;
        result.push(nodes[next].name.to_string());
        for &j in &out_edges[next] {
            if !placed[j] && in_degree[j] > 0 {
                in_degree[j] -= 1;
            }
        }
    }

    result
}
