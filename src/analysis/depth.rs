use crate::model::GraphModel;
use std::collections::{BTreeSet, HashMap};

/// Longest path length, in edge count, over the direct-call subgraph with
/// the detected back edges removed.
///
/// Memoized depth-from-node keeps the walk linear in nodes plus edges
/// despite revisits. The walk uses an explicit stack so chains as long as
/// the whole graph cannot overflow the call stack.
pub fn max_call_depth(model: &GraphModel, back_edges: &BTreeSet<String>) -> usize {
    let n = model.functions.len();
    if n == 0 {
        return 0;
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
    for (i, function) in model.functions.iter().enumerate() {
        index.insert(function.id.as_str(), i);
    }

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for edge in model.traversal_edges() {
        if back_edges.contains(edge.id.as_str()) {
            continue;
        }
        let (Some(&u), Some(&v)) = (
            index.get(edge.caller_id.as_str()),
            index.get(edge.callee_id.as_str()),
        ) else {
            continue;
        };
        adj[u].push(v);
    }

    let mut memo: Vec<Option<usize>> = vec![None; n];
    (0..n).map(|u| depth_from(u, &adj, &mut memo)).max().unwrap_or(0)
}

fn depth_from(start: usize, adj: &[Vec<usize>], memo: &mut [Option<usize>]) -> usize {
    if let Some(d) = memo[start] {
        return d;
    }

    // Frames of (node, next-child cursor, best depth so far), mirroring
    // the cycle detector's iterative traversal.
    let mut stack: Vec<(usize, usize, usize)> = vec![(start, 0, 0)];

    while let Some(frame) = stack.last_mut() {
        let u = frame.0;
        let cursor = frame.1;
        if cursor < adj[u].len() {
            frame.1 += 1;
            let v = adj[u][cursor];
            match memo[v] {
                Some(d) => frame.2 = frame.2.max(1 + d),
                None => stack.push((v, 0, 0)),
            }
        } else {
            let depth = frame.2;
            memo[u] = Some(depth);
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.2 = parent.2.max(1 + depth);
            }
        }
    }

    memo[start].unwrap_or(0)
}
