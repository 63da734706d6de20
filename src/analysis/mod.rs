mod cycles;
mod depth;
mod graph;

pub use cycles::{cycle_groups, detect_back_edges};
pub use depth::max_call_depth;
pub use graph::CallGraph;

use crate::model::{GraphModel, Statistics};
use std::collections::{BTreeSet, HashSet};

/// Recompute the full statistics for a model.
///
/// Never trusts caller-supplied statistics; cycle and orphan sets are
/// always derived from the edges at hand.
pub fn compute_statistics(model: &GraphModel) -> Statistics {
    let back_edges = detect_back_edges(model);
    compute_statistics_with(model, &back_edges)
}

/// Variant that reuses an already-detected back-edge set, for callers that
/// also need it for layout. The set is deterministic for a fixed model, so
/// caching it between the two uses is safe.
pub fn compute_statistics_with(model: &GraphModel, back_edges: &BTreeSet<String>) -> Statistics {
    let call_graph = CallGraph::build(model);

    let mut has_incoming: HashSet<&str> = HashSet::new();
    for edge in model.traversal_edges() {
        has_incoming.insert(edge.callee_id.as_str());
    }

    // is_entry_point is resolved against the entry-point list during model
    // construction, so the flag alone decides membership here.
    let orphan_functions: Vec<String> = model
        .functions
        .iter()
        .filter(|f| !has_incoming.contains(f.id.as_str()) && !f.is_entry_point)
        .map(|f| f.id.clone())
        .collect();

    Statistics {
        total_functions: model.functions.len(),
        total_calls: model.calls.len(),
        max_call_depth: max_call_depth(model, back_edges),
        circular_dependencies: cycle_groups(model, &call_graph),
        orphan_functions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GraphModel;
    use crate::model::raw::RawGraph;

    fn model(json: &str) -> GraphModel {
        let raw: RawGraph = serde_json::from_str(json).unwrap();
        GraphModel::from_raw(raw)
    }

    #[test]
    fn empty_input_yields_zeroed_statistics() {
        let stats = compute_statistics(&model(r#"{}"#));
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn orphans_exclude_entry_points_and_called_functions() {
        let m = model(
            r#"{
                "functions": [{"id": "main"}, {"id": "helper"}, {"id": "unused"}],
                "calls": [
                    {"id": "e1", "caller_id": "main", "callee_id": "helper", "call_type": "direct"}
                ],
                "entry_points": [{"id": "ep", "type": "main_function", "function_id": "main"}]
            }"#,
        );
        let stats = compute_statistics(&m);
        assert_eq!(stats.orphan_functions, vec!["unused".to_string()]);
    }

    #[test]
    fn indirect_calls_count_but_do_not_traverse() {
        let m = model(
            r#"{
                "functions": [{"id": "a"}, {"id": "b"}],
                "calls": [
                    {"id": "e1", "caller_id": "a", "callee_id": "b", "call_type": "indirect"}
                ]
            }"#,
        );
        let stats = compute_statistics(&m);
        assert_eq!(stats.total_calls, 1);
        assert_eq!(stats.max_call_depth, 0);
        // b gets no direct incoming edge, so it is an orphan.
        assert_eq!(stats.orphan_functions.len(), 2);
    }
}
