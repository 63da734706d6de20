use crate::analysis::CallGraph;
use crate::model::GraphModel;
use petgraph::algo::tarjan_scc;
use std::collections::{BTreeSet, HashMap, HashSet};

const WHITE: u8 = 0;
const GRAY: u8 = 1;
const BLACK: u8 = 2;

/// Identify every back edge in the direct call graph: an edge into a node
/// that is still on the DFS recursion stack.
///
/// Three-color DFS over the functions in input order, O(V+E) and fully
/// deterministic for a fixed input ordering. Self-loops are always back
/// edges. Traversal stops at a back edge; it is recorded, not followed.
pub fn detect_back_edges(model: &GraphModel) -> BTreeSet<String> {
    let n = model.functions.len();
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
    for (i, function) in model.functions.iter().enumerate() {
        index.insert(function.id.as_str(), i);
    }

    // Adjacency in input order, carrying the edge id for reporting.
    let mut adj: Vec<Vec<(usize, &str)>> = vec![Vec::new(); n];
    for edge in model.traversal_edges() {
        let (Some(&u), Some(&v)) = (
            index.get(edge.caller_id.as_str()),
            index.get(edge.callee_id.as_str()),
        ) else {
            continue;
        };
        adj[u].push((v, edge.id.as_str()));
    }

    let mut color = vec![WHITE; n];
    let mut back_edges = BTreeSet::new();

    for start in 0..n {
        if color[start] != WHITE {
            continue;
        }
        color[start] = GRAY;
        // Explicit stack of (node, next-child cursor) so deep chains
        // cannot overflow the call stack.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let u = frame.0;
            let cursor = frame.1;
            if cursor < adj[u].len() {
                frame.1 += 1;
                let (v, edge_id) = adj[u][cursor];
                match color[v] {
                    GRAY => {
                        back_edges.insert(edge_id.to_string());
                    }
                    WHITE => {
                        color[v] = GRAY;
                        stack.push((v, 0));
                    }
                    _ => {}
                }
            } else {
                color[u] = BLACK;
                stack.pop();
            }
        }
    }

    back_edges
}

/// Group cyclic edges per strongly connected component, for the
/// `circular_dependencies` statistic.
///
/// Every traversal-eligible edge with both endpoints inside a cyclic SCC
/// belongs to that component's group, so a two-node mutual cycle reports
/// one group containing both edge ids. Groups and their members are
/// sorted for determinism.
pub fn cycle_groups(model: &GraphModel, call_graph: &CallGraph) -> Vec<Vec<String>> {
    let graph = call_graph.graph();
    let mut groups = Vec::new();

    for scc in tarjan_scc(graph) {
        let mut edges: Vec<String> = if scc.len() > 1 {
            let members: HashSet<&str> = scc.iter().map(|&idx| graph[idx].as_str()).collect();
            model
                .traversal_edges()
                .filter(|e| {
                    members.contains(e.caller_id.as_str())
                        && members.contains(e.callee_id.as_str())
                })
                .map(|e| e.id.clone())
                .collect()
        } else {
            // Single-node SCC only counts with a self-loop.
            let id = graph[scc[0]].as_str();
            model
                .traversal_edges()
                .filter(|e| e.caller_id == id && e.callee_id == id)
                .map(|e| e.id.clone())
                .collect()
        };

        if !edges.is_empty() {
            edges.sort();
            groups.push(edges);
        }
    }

    groups.sort();
    groups
}
