pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod narrative;
pub mod style;

pub use api::{
    CallmapError, Visualization, VisualizeOptions, highlight_engine, ingest, load_graph, visualize,
};
pub use cli::Cli;
pub use commands::{cmd_analyze, cmd_layout, cmd_narrative};
pub use config::{Config, Thresholds};
pub use model::{GraphModel, Statistics};
