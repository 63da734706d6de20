//! Saved-layout persistence.
//!
//! A saved layout is a position seed, not a cache: loading one overrides
//! the computed positions for the node ids it names, and ids it does not
//! name keep their fresh geometry. Unknown ids in the seed are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use super::PositionedNode;

pub const SAVED_LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    pub version: u32,
    pub nodes: Vec<SavedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_metadata: Option<LayoutMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedNode {
    pub id: String,
    pub position: Position,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetadata {
    pub last_saved: u64,
}

/// Override computed positions with the seed's, by node id.
pub fn apply_seed(nodes: &mut [PositionedNode], seed: &SavedLayout) {
    let overrides: HashMap<&str, Position> = seed
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.position))
        .collect();

    for node in nodes.iter_mut() {
        if let Some(pos) = overrides.get(node.id.as_str()) {
            node.x = pos.x;
            node.y = pos.y;
        }
    }
}

/// Snapshot the current geometry into a persistable seed.
pub fn to_saved(nodes: &[PositionedNode]) -> SavedLayout {
    SavedLayout {
        version: SAVED_LAYOUT_VERSION,
        nodes: nodes
            .iter()
            .map(|n| SavedNode {
                id: n.id.clone(),
                position: Position { x: n.x, y: n.y },
                kind: None,
                data: None,
            })
            .collect(),
        layout_metadata: Some(LayoutMetadata {
            last_saved: unix_seconds(),
        }),
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
