//! Fan-in/fan-out accounting and coupling pattern classification.

use serde::{Deserialize, Serialize};

use super::DependencyGraph;

/// High-coupling band; the pattern table is fixed, unlike the configurable
/// `exceeds_threshold` cutoff.
const HIGH_COUPLING: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingPattern {
    /// Nothing in, nothing out
    Orphan,
    /// Heavily imported and heavily importing
    GodObject,
    /// Heavily imported, imports little
    Utility,
    /// Imports heavily, rarely imported
    Controller,
    /// Everything else
    Isolated,
}

impl CouplingPattern {
    fn classify(fan_in: usize, fan_out: usize) -> Self {
        let high_in = fan_in >= HIGH_COUPLING;
        let high_out = fan_out >= HIGH_COUPLING;
        if fan_in == 0 && fan_out == 0 {
            CouplingPattern::Orphan
        } else if high_in && high_out {
            CouplingPattern::GodObject
        } else if high_in {
            CouplingPattern::Utility
        } else if high_out {
            CouplingPattern::Controller
        } else {
            CouplingPattern::Isolated
        }
    }
}

/// Per-module coupling. Neighbor lists are populated only when details
/// were requested; counts are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplingRecord {
    pub module: String,
    pub fan_in: usize,
    pub fan_out: usize,
    pub total: usize,
    pub pattern: CouplingPattern,
    pub exceeds_threshold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
}

/// One record per node, in node (path) order. `exceeds_threshold` is
/// `total >= threshold`.
pub fn analyze_coupling(
    graph: &DependencyGraph,
    threshold: usize,
    with_details: bool,
) -> Vec<CouplingRecord> {
    (0..graph.node_count())
        .map(|id| {
            let fan_in = graph.fan_in(id);
            let fan_out = graph.fan_out(id);
            let neighbor_names = |ids: &std::collections::BTreeSet<usize>| -> Vec<String> {
                ids.iter().map(|&n| graph.node(n).to_string()).collect()
            };
            CouplingRecord {
                module: graph.node(id).to_string(),
                fan_in,
                fan_out,
                total: fan_in + fan_out,
                pattern: CouplingPattern::classify(fan_in, fan_out),
                exceeds_threshold: fan_in + fan_out >= threshold,
                imported_by: with_details.then(|| neighbor_names(graph.in_neighbors(id))),
                imports: with_details.then(|| neighbor_names(graph.out_neighbors(id))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_from;

    fn star_graph(fan_in: usize, fan_out: usize) -> DependencyGraph {
        let mut names = vec!["hub.py".to_string()];
        names.extend((0..fan_in).map(|i| format!("in{i:02}.py")));
        names.extend((0..fan_out).map(|i| format!("out{i:02}.py")));
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let mut graph = graph_from(&refs, &[]);
        for i in 0..fan_in {
            graph.add_edge(&format!("in{i:02}.py"), "hub.py");
        }
        for i in 0..fan_out {
            graph.add_edge("hub.py", &format!("out{i:02}.py"));
        }
        graph
    }

    fn hub_record(graph: &DependencyGraph) -> CouplingRecord {
        analyze_coupling(graph, 10, false)
            .into_iter()
            .find(|r| r.module == "hub.py")
            .unwrap()
    }

    #[test]
    fn god_object_with_high_fan_both_ways() {
        let record = hub_record(&star_graph(15, 12));
        assert_eq!(record.pattern, CouplingPattern::GodObject);
        assert_eq!(record.total, 27);
        assert!(record.exceeds_threshold);
    }

    #[test]
    fn utility_and_controller_bands() {
        assert_eq!(
            hub_record(&star_graph(10, 2)).pattern,
            CouplingPattern::Utility
        );
        assert_eq!(
            hub_record(&star_graph(2, 10)).pattern,
            CouplingPattern::Controller
        );
    }

    #[test]
    fn middle_band_is_isolated() {
        let record = hub_record(&star_graph(5, 4));
        assert_eq!(record.pattern, CouplingPattern::Isolated);
        assert!(!record.exceeds_threshold);
    }

    #[test]
    fn unconnected_node_is_orphan_pattern() {
        let graph = graph_from(&["alone.py"], &[]);
        let record = hub_record_or(&graph, "alone.py");
        assert_eq!(record.pattern, CouplingPattern::Orphan);
        assert_eq!(record.total, 0);
    }

    #[test]
    fn details_carry_sorted_neighbor_lists() {
        let graph = graph_from(
            &["a.py", "b.py", "c.py"],
            &[("b.py", "a.py"), ("c.py", "a.py"), ("a.py", "b.py")],
        );
        let records = analyze_coupling(&graph, 10, true);
        let a = records.iter().find(|r| r.module == "a.py").unwrap();
        assert_eq!(
            a.imported_by.as_deref(),
            Some(["b.py".to_string(), "c.py".to_string()].as_slice())
        );
        assert_eq!(a.imports.as_deref(), Some(["b.py".to_string()].as_slice()));
    }

    fn hub_record_or(graph: &DependencyGraph, module: &str) -> CouplingRecord {
        analyze_coupling(graph, 10, false)
            .into_iter()
            .find(|r| r.module == module)
            .unwrap()
    }
}
