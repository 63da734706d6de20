//! Hierarchical (Sugiyama-style) layout for the call graph.
//!
//! Pipeline: longest-path layering over the acyclic subgraph, barycenter
//! crossing minimization, coordinate assignment, direction remap. Back
//! edges are excluded from rank computation and re-attached afterwards as
//! dashed `(circular)` connectors. Fully deterministic: the same
//! structural input always produces identical geometry.

pub mod seed;

use crate::model::FunctionNode;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Horizontal gap between nodes within a rank.
    pub node_sep: f64,
    /// Vertical gap between ranks.
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    /// Dimension floors; zero-sized nodes never reach the algorithm.
    pub min_node_width: f64,
    pub min_node_height: f64,
    pub crossing_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_sep: 60.0,
            rank_sep: 90.0,
            margin_x: 40.0,
            margin_y: 40.0,
            min_node_width: 140.0,
            min_node_height: 56.0,
            crossing_sweeps: 8,
        }
    }
}

/// Annotation overlays are cosmetic: they keep whatever position they
/// already have and never participate in layout or highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Function,
    Annotation,
}

/// Pre-layout node: id, kind, measured footprint, optional prior position
/// (used as-is for annotations, ignored for structural nodes).
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub width: f64,
    pub height: f64,
    pub position: Option<(f64, f64)>,
}

impl LayoutNode {
    pub fn annotation(id: impl Into<String>, width: f64, height: f64, position: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Annotation,
            width,
            height,
            position: Some(position),
        }
    }
}

/// Minimal edge view consumed by layout and highlighting, decoupled from
/// the full call-edge record.
#[derive(Debug, Clone)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A laid-out node, top-left anchored. Fresh on every pass; manual drags
/// belong to the caller and are reapplied via the seed mechanism, never by
/// mutating these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub circular: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub dashed: bool,
    pub animated: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<StyledEdge>,
}

/// Compute a node's footprint from its displayed content (name, parameter
/// rows, decorator rows, complexity badge), clamped to the configured
/// floors.
pub fn measure_function(function: &FunctionNode, config: &LayoutConfig) -> (f64, f64) {
    let widest_text = function
        .parameters
        .iter()
        .chain(function.decorators.iter())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max(function.name.chars().count());

    let width = (widest_text as f64 * 8.0 + 48.0).max(config.min_node_width);
    // Name row, one row per parameter and decorator, complexity badge row.
    let rows = 2 + function.parameters.len() + function.decorators.len();
    let height = (rows as f64 * 18.0 + 16.0).max(config.min_node_height);
    (width, height)
}

pub fn node_for_function(function: &FunctionNode, config: &LayoutConfig) -> LayoutNode {
    let (width, height) = measure_function(function, config);
    LayoutNode {
        id: function.id.clone(),
        kind: NodeKind::Function,
        width,
        height,
        position: None,
    }
}

/// Lay out the graph.
///
/// `edges` are the traversal-eligible call edges; `back_edges` is the
/// cycle detector's result. Structural nodes are ranked and positioned
/// over the acyclic subgraph; annotation overlays pass through untouched;
/// back edges re-attach to the output styled as circular.
pub fn layout(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    back_edges: &BTreeSet<String>,
    direction: Direction,
    config: &LayoutConfig,
) -> LayoutResult {
    let structural: Vec<&LayoutNode> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Function)
        .collect();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(structural.len());
    for (i, node) in structural.iter().enumerate() {
        index.insert(node.id.as_str(), i);
    }

    let n = structural.len();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut radj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for edge in edges {
        if back_edges.contains(edge.id.as_str()) {
            continue;
        }
        let (Some(&u), Some(&v)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        else {
            continue;
        };
        if u != v {
            adj[u].push(v);
            radj[v].push(u);
        }
    }

    let widths: Vec<f64> = structural
        .iter()
        .map(|node| node.width.max(config.min_node_width))
        .collect();
    let heights: Vec<f64> = structural
        .iter()
        .map(|node| node.height.max(config.min_node_height))
        .collect();

    let ranks = assign_ranks(&adj, n);
    let layers = order_within_ranks(&ranks, &adj, &radj, n, config.crossing_sweeps);

    // Horizontal directions swap the axes afterwards, so spacing must be
    // computed from the extent each node will occupy along the swapped
    // axis: widths separate ranks, heights separate siblings.
    let horizontal = matches!(direction, Direction::LeftRight | Direction::RightLeft);
    let (span_x, span_y) = if horizontal {
        (&heights, &widths)
    } else {
        (&widths, &heights)
    };
    let (mut x, mut y) = assign_coordinates(&layers, &adj, &radj, span_x, span_y, config);
    remap_for_direction(&mut x, &mut y, direction);

    // Shift the drawing so its top-left corner sits at the margins.
    let mut min_left = f64::INFINITY;
    let mut min_top = f64::INFINITY;
    for i in 0..n {
        min_left = min_left.min(x[i] - widths[i] / 2.0);
        min_top = min_top.min(y[i] - heights[i] / 2.0);
    }
    let (dx, dy) = if n == 0 {
        (0.0, 0.0)
    } else {
        (config.margin_x - min_left, config.margin_y - min_top)
    };

    let mut positioned = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.kind {
            NodeKind::Function => {
                let i = index[node.id.as_str()];
                positioned.push(PositionedNode {
                    id: node.id.clone(),
                    x: x[i] + dx - widths[i] / 2.0,
                    y: y[i] + dy - heights[i] / 2.0,
                    width: widths[i],
                    height: heights[i],
                });
            }
            NodeKind::Annotation => {
                let (px, py) = node.position.unwrap_or((0.0, 0.0));
                positioned.push(PositionedNode {
                    id: node.id.clone(),
                    x: px,
                    y: py,
                    width: node.width.max(1.0),
                    height: node.height.max(1.0),
                });
            }
        }
    }

    let styled = edges
        .iter()
        .map(|edge| {
            let circular = back_edges.contains(edge.id.as_str());
            StyledEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                circular,
                label: circular.then(|| "(circular)".to_string()),
                dashed: circular,
                animated: !circular,
            }
        })
        .collect();

    LayoutResult {
        nodes: positioned,
        edges: styled,
    }
}

/// Longest-path layering: Kahn's topological order, then rank relaxation.
/// Isolated nodes land on rank 0. The relaxation pass is bounded so a
/// caller-supplied incomplete back-edge set cannot hang it.
fn assign_ranks(adj: &[Vec<usize>], n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut in_deg = vec![0usize; n];
    for targets in adj {
        for &v in targets {
            in_deg[v] += 1;
        }
    }

    let mut queue: Vec<usize> = (0..n).filter(|&v| in_deg[v] == 0).collect();
    queue.sort_unstable();
    let mut topo = Vec::with_capacity(n);
    let mut seen = vec![false; n];

    while let Some(u) = queue.first().copied() {
        queue.remove(0);
        seen[u] = true;
        topo.push(u);
        for &v in &adj[u] {
            in_deg[v] -= 1;
            if in_deg[v] == 0 {
                let pos = queue.partition_point(|&x| x < v);
                queue.insert(pos, v);
            }
        }
    }
    for (v, &s) in seen.iter().enumerate() {
        if !s {
            topo.push(v);
        }
    }

    let mut rank = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for &u in &topo {
            for &v in &adj[u] {
                if rank[v] <= rank[u] {
                    rank[v] = rank[u] + 1;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    rank
}

/// Barycenter crossing minimization with alternating forward/backward
/// sweeps, keeping the best ordering seen.
fn order_within_ranks(
    ranks: &[usize],
    adj: &[Vec<usize>],
    radj: &[Vec<usize>],
    n: usize,
    sweeps: usize,
) -> Vec<Vec<usize>> {
    if n == 0 {
        return Vec::new();
    }

    let num_layers = ranks.iter().copied().max().unwrap_or(0) + 1;
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); num_layers];
    for v in 0..n {
        layers[ranks[v]].push(v);
    }
    for layer in &mut layers {
        layer.sort_unstable();
    }

    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, adj);

    for sweep in 0..sweeps {
        if sweep % 2 == 0 {
            for i in 1..num_layers {
                barycenter_sort(&mut layers, i, adj, radj, true);
            }
        } else {
            for i in (0..num_layers.saturating_sub(1)).rev() {
                barycenter_sort(&mut layers, i, adj, radj, false);
            }
        }

        let crossings = count_crossings(&layers, adj);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
        if best_crossings == 0 {
            break;
        }
    }

    best
}

fn barycenter_sort(
    layers: &mut [Vec<usize>],
    layer_idx: usize,
    adj: &[Vec<usize>],
    radj: &[Vec<usize>],
    forward: bool,
) {
    let ref_idx = if forward {
        layer_idx.checked_sub(1)
    } else if layer_idx + 1 < layers.len() {
        Some(layer_idx + 1)
    } else {
        None
    };
    let Some(ref_idx) = ref_idx else {
        return;
    };

    let mut ref_pos: HashMap<usize, usize> = HashMap::with_capacity(layers[ref_idx].len());
    for (p, &v) in layers[ref_idx].iter().enumerate() {
        ref_pos.insert(v, p);
    }

    let mut scored: Vec<(usize, f64)> = layers[layer_idx]
        .iter()
        .map(|&v| {
            let neighbors = if forward { &radj[v] } else { &adj[v] };
            let positions: Vec<f64> = neighbors
                .iter()
                .filter_map(|u| ref_pos.get(u))
                .map(|&p| p as f64)
                .collect();
            if positions.is_empty() {
                (v, f64::MAX)
            } else {
                (v, positions.iter().sum::<f64>() / positions.len() as f64)
            }
        })
        .collect();

    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    layers[layer_idx] = scored.into_iter().map(|(v, _)| v).collect();
}

fn count_crossings(layers: &[Vec<usize>], adj: &[Vec<usize>]) -> usize {
    let mut crossings = 0;
    for i in 0..layers.len().saturating_sub(1) {
        let mut pos_b: HashMap<usize, usize> = HashMap::with_capacity(layers[i + 1].len());
        for (p, &v) in layers[i + 1].iter().enumerate() {
            pos_b.insert(v, p);
        }

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (pa, &u) in layers[i].iter().enumerate() {
            for v in &adj[u] {
                if let Some(&pb) = pos_b.get(v) {
                    pairs.push((pa, pb));
                }
            }
        }

        for a in 0..pairs.len() {
            for b in (a + 1)..pairs.len() {
                let (a1, b1) = pairs[a];
                let (a2, b2) = pairs[b];
                if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

/// Center-anchored coordinates: each rank is centered horizontally, rank
/// heights accumulate vertically, then a few median refinement passes pull
/// nodes toward their neighbors without reintroducing overlaps.
fn assign_coordinates(
    layers: &[Vec<usize>],
    adj: &[Vec<usize>],
    radj: &[Vec<usize>],
    widths: &[f64],
    heights: &[f64],
    config: &LayoutConfig,
) -> (Vec<f64>, Vec<f64>) {
    let n = widths.len();
    let mut x = vec![0.0f64; n];
    let mut y = vec![0.0f64; n];

    let mut layer_top = 0.0f64;
    for layer in layers {
        let layer_height = layer
            .iter()
            .map(|&v| heights[v])
            .fold(0.0f64, f64::max);
        let total_width: f64 = layer.iter().map(|&v| widths[v]).sum::<f64>()
            + layer.len().saturating_sub(1) as f64 * config.node_sep;

        let mut cursor = -total_width / 2.0;
        for &v in layer {
            x[v] = cursor + widths[v] / 2.0;
            y[v] = layer_top + layer_height / 2.0;
            cursor += widths[v] + config.node_sep;
        }
        layer_top += layer_height + config.rank_sep;
    }

    for _ in 0..2 {
        for layer in layers {
            for &v in layer {
                let mut neighbor_x: Vec<f64> = adj[v]
                    .iter()
                    .chain(radj[v].iter())
                    .map(|&u| x[u])
                    .collect();
                if !neighbor_x.is_empty() {
                    neighbor_x.sort_by(|a, b| a.total_cmp(b));
                    let median = neighbor_x[neighbor_x.len() / 2];
                    x[v] = (x[v] + median) / 2.0;
                }
            }
        }

        // Restore the minimum gap within each rank, left to right.
        for layer in layers {
            let mut ordered: Vec<usize> = layer.clone();
            ordered.sort_by(|&a, &b| x[a].total_cmp(&x[b]).then_with(|| a.cmp(&b)));
            for i in 1..ordered.len() {
                let prev = ordered[i - 1];
                let curr = ordered[i];
                let min_gap = (widths[prev] + widths[curr]) / 2.0 + config.node_sep;
                if x[curr] - x[prev] < min_gap {
                    x[curr] = x[prev] + min_gap;
                }
            }
        }
    }

    (x, y)
}

fn remap_for_direction(x: &mut [f64], y: &mut [f64], direction: Direction) {
    match direction {
        Direction::TopBottom => {}
        Direction::BottomTop => {
            let max_y = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for yi in y.iter_mut() {
                *yi = max_y - *yi;
            }
        }
        Direction::LeftRight => {
            for i in 0..x.len() {
                std::mem::swap(&mut x[i], &mut y[i]);
            }
        }
        Direction::RightLeft => {
            let max_y = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for i in 0..x.len() {
                std::mem::swap(&mut x[i], &mut y[i]);
                x[i] = max_y - x[i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func_node(id: &str) -> LayoutNode {
        LayoutNode {
            id: id.to_string(),
            kind: NodeKind::Function,
            width: 140.0,
            height: 56.0,
            position: None,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> LayoutEdge {
        LayoutEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    fn positions(result: &LayoutResult) -> HashMap<String, (f64, f64)> {
        result
            .nodes
            .iter()
            .map(|n| (n.id.clone(), (n.x, n.y)))
            .collect()
    }

    #[test]
    fn chain_ranks_increase_downward() {
        let nodes = vec![func_node("a"), func_node("b"), func_node("c")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "b", "c")];
        let result = layout(
            &nodes,
            &edges,
            &BTreeSet::new(),
            Direction::TopBottom,
            &LayoutConfig::default(),
        );
        let pos = positions(&result);
        assert!(pos["a"].1 < pos["b"].1);
        assert!(pos["b"].1 < pos["c"].1);
    }

    #[test]
    fn layout_is_idempotent() {
        let nodes = vec![
            func_node("a"),
            func_node("b"),
            func_node("c"),
            func_node("d"),
        ];
        let edges = vec![
            edge("e1", "a", "b"),
            edge("e2", "a", "c"),
            edge("e3", "b", "d"),
            edge("e4", "c", "d"),
        ];
        let config = LayoutConfig::default();
        let first = layout(&nodes, &edges, &BTreeSet::new(), Direction::TopBottom, &config);
        let second = layout(&nodes, &edges, &BTreeSet::new(), Direction::TopBottom, &config);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn back_edges_do_not_affect_ranks_and_come_back_styled() {
        let nodes = vec![func_node("a"), func_node("b")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "b", "a")];
        let back: BTreeSet<String> = ["e2".to_string()].into_iter().collect();
        let result = layout(&nodes, &edges, &back, Direction::TopBottom, &LayoutConfig::default());

        let pos = positions(&result);
        assert!(pos["a"].1 < pos["b"].1);

        let circular = result.edges.iter().find(|e| e.id == "e2").unwrap();
        assert!(circular.circular);
        assert!(circular.dashed);
        assert!(!circular.animated);
        assert_eq!(circular.label.as_deref(), Some("(circular)"));

        let straight = result.edges.iter().find(|e| e.id == "e1").unwrap();
        assert!(!straight.circular);
        assert!(straight.animated);
    }

    #[test]
    fn isolated_nodes_get_valid_positions() {
        let nodes = vec![func_node("a"), func_node("b"), func_node("c")];
        let result = layout(
            &nodes,
            &[],
            &BTreeSet::new(),
            Direction::TopBottom,
            &LayoutConfig::default(),
        );
        assert_eq!(result.nodes.len(), 3);
        for node in &result.nodes {
            assert!(node.x.is_finite());
            assert!(node.y.is_finite());
        }
        // All isolated nodes share rank 0 but never overlap.
        let mut xs: Vec<f64> = result.nodes.iter().map(|n| n.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
    }

    #[test]
    fn nodes_within_a_rank_never_overlap() {
        let nodes = vec![
            func_node("root"),
            func_node("w1"),
            func_node("w2"),
            func_node("w3"),
        ];
        let edges = vec![
            edge("e1", "root", "w1"),
            edge("e2", "root", "w2"),
            edge("e3", "root", "w3"),
        ];
        let result = layout(
            &nodes,
            &edges,
            &BTreeSet::new(),
            Direction::TopBottom,
            &LayoutConfig::default(),
        );
        let row: Vec<&PositionedNode> = result
            .nodes
            .iter()
            .filter(|n| n.id.starts_with('w'))
            .collect();
        for a in 0..row.len() {
            for b in (a + 1)..row.len() {
                let (l, r) = if row[a].x < row[b].x {
                    (row[a], row[b])
                } else {
                    (row[b], row[a])
                };
                assert!(l.x + l.width <= r.x, "{} overlaps {}", l.id, r.id);
            }
        }
    }

    #[test]
    fn annotations_keep_their_position() {
        let mut nodes = vec![func_node("a"), func_node("b")];
        nodes.push(LayoutNode::annotation("note", 200.0, 80.0, (500.0, 700.0)));
        let edges = vec![edge("e1", "a", "b")];
        let result = layout(
            &nodes,
            &edges,
            &BTreeSet::new(),
            Direction::TopBottom,
            &LayoutConfig::default(),
        );
        let note = result.nodes.iter().find(|n| n.id == "note").unwrap();
        assert_eq!((note.x, note.y), (500.0, 700.0));
    }

    fn disjoint(a: &PositionedNode, b: &PositionedNode) -> bool {
        a.x + a.width <= b.x
            || b.x + b.width <= a.x
            || a.y + a.height <= b.y
            || b.y + b.height <= a.y
    }

    #[test]
    fn wide_nodes_do_not_overlap_in_horizontal_directions() {
        // Boxes much wider than a default rank gap; successive ranks must
        // still clear each other once the axes are swapped.
        let wide = |id: &str| LayoutNode {
            id: id.to_string(),
            kind: NodeKind::Function,
            width: 300.0,
            height: 56.0,
            position: None,
        };
        let nodes = vec![wide("a"), wide("b"), wide("c"), wide("d")];
        let edges = vec![
            edge("e1", "a", "b"),
            edge("e2", "b", "c"),
            edge("e3", "b", "d"),
        ];

        for direction in [Direction::LeftRight, Direction::RightLeft] {
            let result = layout(
                &nodes,
                &edges,
                &BTreeSet::new(),
                direction,
                &LayoutConfig::default(),
            );
            for i in 0..result.nodes.len() {
                for j in (i + 1)..result.nodes.len() {
                    assert!(
                        disjoint(&result.nodes[i], &result.nodes[j]),
                        "{:?}: {} overlaps {}",
                        direction,
                        result.nodes[i].id,
                        result.nodes[j].id
                    );
                }
            }
        }
    }

    #[test]
    fn left_right_direction_swaps_axes() {
        let nodes = vec![func_node("a"), func_node("b")];
        let edges = vec![edge("e1", "a", "b")];
        let result = layout(
            &nodes,
            &edges,
            &BTreeSet::new(),
            Direction::LeftRight,
            &LayoutConfig::default(),
        );
        let pos = positions(&result);
        assert!(pos["a"].0 < pos["b"].0);
    }

    #[test]
    fn zero_sized_nodes_are_clamped() {
        let nodes = vec![LayoutNode {
            id: "a".to_string(),
            kind: NodeKind::Function,
            width: 0.0,
            height: 0.0,
            position: None,
        }];
        let config = LayoutConfig::default();
        let result = layout(&nodes, &[], &BTreeSet::new(), Direction::TopBottom, &config);
        assert_eq!(result.nodes[0].width, config.min_node_width);
        assert_eq!(result.nodes[0].height, config.min_node_height);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let result = layout(
            &[],
            &[],
            &BTreeSet::new(),
            Direction::TopBottom,
            &LayoutConfig::default(),
        );
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
    }
}
