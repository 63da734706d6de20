use crate::analysis::compute_statistics;
use crate::cli::{NarrativeArgs, OutputFormat};
use crate::narrative::generate;
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_narrative(args: NarrativeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.graph, args.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let statistics = compute_statistics(&ctx.model);
    let report = generate(Some(&ctx.model), Some(&statistics), &ctx.config.thresholds);

    let content = match args.format {
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                style::error(&format!("Failed to serialize narrative: {}", e));
                return 1;
            }
        },
    };

    match write_output(args.output.as_deref(), &content) {
        Ok(()) => 0,
        Err(code) => code,
    }
}
