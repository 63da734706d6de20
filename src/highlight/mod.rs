//! Hover highlighting over the rendered graph.
//!
//! The engine precomputes incidence from the laid-out nodes and edges, so
//! answering a hover is a map lookup rather than a graph walk. It must be
//! rebuilt whenever the graph structure changes; rebuilding always starts
//! from the unhovered state.

use crate::layout::{LayoutEdge, LayoutNode, NodeKind};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hover {
    Node(String),
    Edge(String),
}

/// The set of elements to render highlighted. Everything outside both
/// sets dims while a hover is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub active_node_ids: BTreeSet<String>,
    pub active_edge_ids: BTreeSet<String>,
}

pub struct HighlightEngine {
    /// node id -> ids of edges touching it, in input order.
    incident: HashMap<String, Vec<String>>,
    /// edge id -> (source, target).
    endpoints: HashMap<String, (String, String)>,
    /// Annotation overlay ids; hovering these is a no-op.
    overlays: HashSet<String>,
    hovered: Option<Hover>,
    state: Option<HighlightState>,
}

impl HighlightEngine {
    pub fn new(nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Self {
        let mut incident: HashMap<String, Vec<String>> = HashMap::new();
        let mut overlays = HashSet::new();

        for node in nodes {
            match node.kind {
                NodeKind::Function => {
                    incident.entry(node.id.clone()).or_default();
                }
                NodeKind::Annotation => {
                    overlays.insert(node.id.clone());
                }
            }
        }

        let mut endpoints = HashMap::new();
        for edge in edges {
            if !incident.contains_key(&edge.source) || !incident.contains_key(&edge.target) {
                continue;
            }
            endpoints.insert(edge.id.clone(), (edge.source.clone(), edge.target.clone()));
            if let Some(list) = incident.get_mut(&edge.source) {
                list.push(edge.id.clone());
            }
            if edge.source != edge.target {
                if let Some(list) = incident.get_mut(&edge.target) {
                    list.push(edge.id.clone());
                }
            }
        }

        Self {
            incident,
            endpoints,
            overlays,
            hovered: None,
            state: None,
        }
    }

    /// Update the hover target. Overlay ids leave the current state
    /// untouched; any other unrecognized id clears it.
    pub fn set_hovered(&mut self, hover: Option<Hover>) {
        match hover {
            None => self.clear(),
            Some(Hover::Node(id)) => {
                if self.overlays.contains(&id) {
                    return;
                }
                match self.incident.get(&id) {
                    Some(edge_ids) => {
                        let mut state = HighlightState::default();
                        state.active_node_ids.insert(id.clone());
                        for edge_id in edge_ids {
                            state.active_edge_ids.insert(edge_id.clone());
                            if let Some((source, target)) = self.endpoints.get(edge_id) {
                                state.active_node_ids.insert(source.clone());
                                state.active_node_ids.insert(target.clone());
                            }
                        }
                        self.hovered = Some(Hover::Node(id));
                        self.state = Some(state);
                    }
                    None => self.clear(),
                }
            }
            Some(Hover::Edge(id)) => match self.endpoints.get(&id) {
                Some((source, target)) => {
                    let mut state = HighlightState::default();
                    state.active_edge_ids.insert(id.clone());
                    state.active_node_ids.insert(source.clone());
                    state.active_node_ids.insert(target.clone());
                    self.hovered = Some(Hover::Edge(id));
                    self.state = Some(state);
                }
                None => self.clear(),
            },
        }
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.state = None;
    }

    pub fn hovered(&self) -> Option<&Hover> {
        self.hovered.as_ref()
    }

    /// `None` means nothing is hovered and everything renders at full
    /// opacity.
    pub fn state(&self) -> Option<&HighlightState> {
        self.state.as_ref()
    }
}
