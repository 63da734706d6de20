//! Clean library API for callmap.
//!
//! This module provides a programmatic interface for using callmap as a
//! Rust library. Unlike the CLI commands which print output and return
//! exit codes, these functions return proper Result types that can be
//! handled by calling code.
//!
//! # Example
//!
//! ```no_run
//! use callmap::{Config, VisualizeOptions, ingest, visualize};
//!
//! let model = ingest(&std::fs::read_to_string("graph.json")?)?;
//! let view = visualize(&model, &Config::default(), &VisualizeOptions::default());
//! println!("Laid out {} nodes", view.nodes.len());
//! println!("{}", view.narrative.overview);
//! # Ok::<(), callmap::CallmapError>(())
//! ```

use crate::analysis::{compute_statistics_with, detect_back_edges};
use crate::config::{Config, ConfigError};
use crate::highlight::HighlightEngine;
use crate::layout::seed::SavedLayout;
use crate::layout::{
    Direction, LayoutEdge, LayoutNode, PositionedNode, StyledEdge, layout, node_for_function,
    seed::apply_seed,
};
use crate::model::raw::RawGraph;
use crate::model::{GraphModel, Statistics};
use crate::narrative::{NarrativeReport, generate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during callmap operations.
#[derive(Debug, Error)]
pub enum CallmapError {
    /// The graph file could not be found or read.
    #[error("Failed to read {0}: {1}")]
    ReadGraph(PathBuf, #[source] std::io::Error),

    /// The graph JSON could not be parsed.
    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse raw graph JSON into a validated, indexed model.
///
/// Records missing required ids are skipped with a logged warning rather
/// than failing the whole ingest; only malformed JSON itself is an error.
pub fn ingest(json: &str) -> Result<GraphModel, CallmapError> {
    let raw: RawGraph = serde_json::from_str(json)?;
    Ok(GraphModel::from_raw(raw))
}

/// Read and ingest a graph JSON file.
pub fn load_graph(path: &Path) -> Result<GraphModel, CallmapError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CallmapError::ReadGraph(path.to_path_buf(), e))?;
    ingest(&content)
}

/// Options for the `visualize` function.
#[derive(Debug, Clone, Default)]
pub struct VisualizeOptions {
    /// Flow direction of the hierarchical layout.
    pub direction: Direction,

    /// Previously saved positions, applied atop the fresh layout.
    pub seed: Option<SavedLayout>,
}

/// Everything one visualization pass produces: geometry, styled edges,
/// recomputed statistics, and the narrative report.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<StyledEdge>,
    pub statistics: Statistics,
    pub narrative: NarrativeReport,
}

/// Run the full pipeline over a model: cycle detection, statistics,
/// hierarchical layout (seeded if requested), and narrative generation.
pub fn visualize(model: &GraphModel, config: &Config, options: &VisualizeOptions) -> Visualization {
    let back_edges = detect_back_edges(model);
    let statistics = compute_statistics_with(model, &back_edges);

    let nodes: Vec<LayoutNode> = model
        .functions
        .iter()
        .map(|f| node_for_function(f, &config.layout))
        .collect();
    let edges: Vec<LayoutEdge> = model
        .traversal_edges()
        .map(|e| LayoutEdge {
            id: e.id.clone(),
            source: e.caller_id.clone(),
            target: e.callee_id.clone(),
        })
        .collect();

    let mut result = layout(&nodes, &edges, &back_edges, options.direction, &config.layout);
    if let Some(seed) = &options.seed {
        apply_seed(&mut result.nodes, seed);
    }

    let narrative = generate(Some(model), Some(&statistics), &config.thresholds);

    Visualization {
        nodes: result.nodes,
        edges: result.edges,
        statistics,
        narrative,
    }
}

/// Build a hover-highlight engine for the model's current node and edge
/// lists. Rebuild whenever the model changes; a fresh engine always
/// starts unhovered.
pub fn highlight_engine(model: &GraphModel, config: &Config) -> HighlightEngine {
    let nodes: Vec<LayoutNode> = model
        .functions
        .iter()
        .map(|f| node_for_function(f, &config.layout))
        .collect();
    let edges: Vec<LayoutEdge> = model
        .traversal_edges()
        .map(|e| LayoutEdge {
            id: e.id.clone(),
            source: e.caller_id.clone(),
            target: e.callee_id.clone(),
        })
        .collect();
    HighlightEngine::new(&nodes, &edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_rejects_invalid_json() {
        assert!(ingest("not json").is_err());
    }

    #[test]
    fn ingest_accepts_empty_object() {
        let model = ingest("{}").unwrap();
        assert!(model.functions.is_empty());
    }

    #[test]
    fn visualize_empty_model_is_empty_but_defined() {
        let model = ingest("{}").unwrap();
        let view = visualize(&model, &Config::default(), &VisualizeOptions::default());
        assert!(view.nodes.is_empty());
        assert!(view.edges.is_empty());
        assert_eq!(view.statistics, Statistics::default());
        assert!(!view.narrative.overview.is_empty());
    }

    #[test]
    fn visualize_applies_a_seed() {
        let model = ingest(
            r#"{
                "functions": [{"id": "a", "name": "a"}, {"id": "b", "name": "b"}],
                "calls": [
                    {"id": "e1", "caller_id": "a", "callee_id": "b", "call_type": "direct"}
                ]
            }"#,
        )
        .unwrap();

        let seed: SavedLayout = serde_json::from_str(
            r#"{"version": 1, "nodes": [{"id": "a", "position": {"x": 321.0, "y": 654.0}}]}"#,
        )
        .unwrap();

        let options = VisualizeOptions {
            seed: Some(seed),
            ..Default::default()
        };
        let view = visualize(&model, &Config::default(), &options);
        let a = view.nodes.iter().find(|n| n.id == "a").unwrap();
        assert_eq!((a.x, a.y), (321.0, 654.0));
    }
}
