//! Elementary cycle enumeration.
//!
//! Depth-first search from every unvisited node with an explicit frame
//! stack; deep dependency chains must not exhaust the native call stack.
//! Each back edge found while a node is on the traversal path yields one
//! elementary cycle: the path slice from the target's first occurrence
//! through the current node, closed back on the target.

use serde::{Deserialize, Serialize};

use super::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleSeverity {
    High,
    Medium,
    Low,
}

impl CycleSeverity {
    /// Short loops are the most damaging and the easiest to break.
    fn from_length(distinct_nodes: usize) -> Self {
        match distinct_nodes {
            0..=3 => CycleSeverity::High,
            4..=5 => CycleSeverity::Medium,
            _ => CycleSeverity::Low,
        }
    }
}

/// A closed import chain: `path[0] == path[last]`, no other repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub path: Vec<String>,
    pub severity: CycleSeverity,
}

struct Frame {
    node: usize,
    neighbors: Vec<usize>,
    next: usize,
}

/// Enumerate one cycle per distinct back edge across all DFS roots.
/// Output is canonicalized (rotated to start at the smallest path) and
/// sorted, so results do not depend on traversal incidentals.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut on_path = vec![false; n];
    let mut path: Vec<usize> = Vec::new();
    let mut found: Vec<Vec<usize>> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        let mut stack = vec![frame_for(graph, root)];
        visited[root] = true;
        on_path[root] = true;
        path.push(root);

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.neighbors.len() {
                on_path[frame.node] = false;
                path.pop();
                stack.pop();
                continue;
            }
            let target = frame.neighbors[frame.next];
            frame.next += 1;

            if on_path[target] {
                // Back edge: the slice from target's occurrence closes a loop.
                if let Some(start) = path.iter().position(|&p| p == target) {
                    found.push(path[start..].to_vec());
                }
            } else if !visited[target] {
                visited[target] = true;
                on_path[target] = true;
                path.push(target);
                stack.push(frame_for(graph, target));
            }
        }
    }

    let mut cycles: Vec<Cycle> = found
        .into_iter()
        .map(|ids| {
            let rotated = rotate_to_min(&ids);
            let mut names: Vec<String> = rotated
                .iter()
                .map(|&id| graph.node(id).to_string())
                .collect();
            names.push(names[0].clone());
            Cycle {
                severity: CycleSeverity::from_length(rotated.len()),
                path: names,
            }
        })
        .collect();
    cycles.sort_by(|a, b| a.path.cmp(&b.path));
    cycles.dedup();
    cycles
}

fn frame_for(graph: &DependencyGraph, node: usize) -> Frame {
    Frame {
        node,
        neighbors: graph.out_neighbors(node).iter().copied().collect(),
        next: 0,
    }
}

/// Rotate so the node with the smallest path starts the cycle.
fn rotate_to_min(ids: &[usize]) -> Vec<usize> {
    let min_pos = ids
        .iter()
        .enumerate()
        .min_by_key(|(_, &id)| id)
        .map(|(pos, _)| pos)
        .unwrap_or(0);
    let mut rotated = Vec::with_capacity(ids.len());
    rotated.extend_from_slice(&ids[min_pos..]);
    rotated.extend_from_slice(&ids[..min_pos]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_from;

    #[test]
    fn mutual_import_is_one_high_cycle() {
        let graph = graph_from(&["a.py", "b.py"], &[("a.py", "b.py"), ("b.py", "a.py")]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path, vec!["a.py", "b.py", "a.py"]);
        assert_eq!(cycles[0].severity, CycleSeverity::High);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_from(
            &["a.py", "b.py", "c.py"],
            &[("a.py", "b.py"), ("b.py", "c.py"), ("a.py", "c.py")],
        );
        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn disjoint_cycles_are_all_reported() {
        let graph = graph_from(
            &["a.py", "b.py", "x.py", "y.py", "z.py"],
            &[
                ("a.py", "b.py"),
                ("b.py", "a.py"),
                ("x.py", "y.py"),
                ("y.py", "z.py"),
                ("z.py", "x.py"),
            ],
        );
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].path[0], "a.py");
        assert_eq!(cycles[1].path[0], "x.py");
    }

    #[test]
    fn severity_tracks_cycle_length() {
        let graph = graph_from(
            &["a.py", "b.py", "c.py", "d.py"],
            &[
                ("a.py", "b.py"),
                ("b.py", "c.py"),
                ("c.py", "d.py"),
                ("d.py", "a.py"),
            ],
        );
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].severity, CycleSeverity::Medium);
        assert_eq!(cycles[0].path.len(), 5);
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let names: Vec<String> = (0..20_000).map(|i| format!("m{i:05}.py")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
        let mut all_edges = edges.clone();
        // Close the whole chain into one giant loop.
        all_edges.push((refs[refs.len() - 1], refs[0]));
        let graph = graph_from(&refs, &all_edges);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].severity, CycleSeverity::Low);
    }

    #[test]
    fn shared_node_cycles_each_get_a_record() {
        // b sits on two distinct loops through a and c.
        let graph = graph_from(
            &["a.py", "b.py", "c.py"],
            &[
                ("a.py", "b.py"),
                ("b.py", "a.py"),
                ("b.py", "c.py"),
                ("c.py", "b.py"),
            ],
        );
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }
}
