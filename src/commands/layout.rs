use crate::api::{VisualizeOptions, visualize};
use crate::cli::LayoutArgs;
use crate::layout::seed::{SavedLayout, to_saved};
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_layout(args: LayoutArgs) -> i32 {
    let ctx = match CommandContext::new(&args.graph, args.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let seed = match &args.seed {
        Some(path) => match load_seed(path) {
            Ok(seed) => Some(seed),
            Err(code) => return code,
        },
        None => None,
    };

    let options = VisualizeOptions {
        direction: args.direction.into(),
        seed,
    };
    let view = visualize(&ctx.model, &ctx.config, &options);

    let payload = serde_json::json!({
        "nodes": view.nodes,
        "edges": view.edges,
    });
    let json = match serde_json::to_string_pretty(&payload) {
        Ok(json) => json,
        Err(e) => {
            style::error(&format!("Failed to serialize layout: {}", e));
            return 1;
        }
    };
    if let Err(code) = write_output(args.output.as_deref(), &json) {
        return code;
    }

    if let Some(save_path) = &args.save_layout {
        let saved = to_saved(&view.nodes);
        let json = match serde_json::to_string_pretty(&saved) {
            Ok(json) => json,
            Err(e) => {
                style::error(&format!("Failed to serialize saved layout: {}", e));
                return 1;
            }
        };
        if let Err(e) = std::fs::write(save_path, json) {
            style::error(&format!("Could not write saved layout: {}", e));
            return 1;
        }
        style::success(&format!("Saved layout to {}", style::path(save_path)));
    }

    0
}

fn load_seed(path: &std::path::Path) -> Result<SavedLayout, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        style::error(&format!("Could not read seed {}: {}", style::path(path), e));
        2
    })?;
    serde_json::from_str(&content).map_err(|e| {
        style::error(&format!("Invalid seed {}: {}", style::path(path), e));
        2
    })
}
