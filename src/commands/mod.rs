mod analyze;
mod layout;
mod narrative;

pub use analyze::cmd_analyze;
pub use layout::cmd_layout;
pub use narrative::cmd_narrative;

use crate::api::load_graph;
use crate::config::Config;
use crate::model::GraphModel;
use crate::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub model: GraphModel,
    pub config: Config,
}

impl CommandContext {
    /// Load the graph and the config next to it (or in an explicit config
    /// directory). Returns Err(exit_code) if setup fails.
    pub fn new(graph: &Path, config_dir: Option<&Path>) -> Result<Self, i32> {
        let model = match load_graph(graph) {
            Ok(model) => model,
            Err(e) => {
                style::error(&format!("Could not load {}: {}", style::path(graph), e));
                return Err(2);
            }
        };

        let dir = config_dir
            .map(Path::to_path_buf)
            .or_else(|| graph.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        let config = Config::load(&dir).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        Ok(Self { model, config })
    }
}

/// Write to the given file, or stdout when absent. Returns an exit code on
/// failure so commands can bail uniformly.
fn write_output(output: Option<&Path>, content: &str) -> Result<(), i32> {
    let result = match output {
        Some(path) => std::fs::write(path, content),
        None => io::stdout().write_all(content.as_bytes()),
    };
    result.map_err(|e| {
        style::error(&format!("Could not write output: {}", e));
        1
    })
}
