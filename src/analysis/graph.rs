use crate::model::GraphModel;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Petgraph-backed index over the traversal-eligible call edges.
///
/// Node weights are function ids, edge weights call ids. Rebuilt wholesale
/// whenever the model changes; never patched incrementally.
pub struct CallGraph {
    graph: DiGraph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
}

impl CallGraph {
    pub fn build(model: &GraphModel) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for function in &model.functions {
            let idx = graph.add_node(function.id.clone());
            node_indices.insert(function.id.clone(), idx);
        }

        for edge in model.traversal_edges() {
            let (Some(&from), Some(&to)) = (
                node_indices.get(&edge.caller_id),
                node_indices.get(&edge.callee_id),
            ) else {
                continue;
            };
            graph.add_edge(from, to, edge.id.clone());
        }

        Self {
            graph,
            node_indices,
        }
    }

    pub fn graph(&self) -> &DiGraph<String, String> {
        &self.graph
    }

    pub fn contains(&self, function_id: &str) -> bool {
        self.node_indices.contains_key(function_id)
    }

    /// Number of distinct callers of a function.
    pub fn fan_in(&self, function_id: &str) -> usize {
        match self.node_indices.get(function_id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .count(),
            None => 0,
        }
    }

    /// Number of distinct callees of a function.
    pub fn fan_out(&self, function_id: &str) -> usize {
        match self.node_indices.get(function_id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .count(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::RawGraph;

    fn model(json: &str) -> GraphModel {
        let raw: RawGraph = serde_json::from_str(json).unwrap();
        GraphModel::from_raw(raw)
    }

    #[test]
    fn fan_counts_follow_direct_edges_only() {
        let m = model(
            r#"{
                "functions": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
                "calls": [
                    {"id": "e1", "caller_id": "a", "callee_id": "c", "call_type": "direct"},
                    {"id": "e2", "caller_id": "b", "callee_id": "c", "call_type": "direct"},
                    {"id": "e3", "caller_id": "c", "callee_id": "a", "call_type": "indirect"}
                ]
            }"#,
        );
        let graph = CallGraph::build(&m);
        assert!(graph.contains("a"));
        assert!(!graph.contains("ghost"));
        assert_eq!(graph.fan_in("c"), 2);
        assert_eq!(graph.fan_out("c"), 0);
        assert_eq!(graph.fan_out("a"), 1);
        assert_eq!(graph.fan_in("ghost"), 0);
    }
}
