use crate::analysis::compute_statistics;
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::narrative::generate;
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_analyze(args: AnalyzeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.graph, args.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let statistics = compute_statistics(&ctx.model);
    let report = generate(Some(&ctx.model), Some(&statistics), &ctx.config.thresholds);

    match args.format {
        OutputFormat::Markdown => {
            if args.output.is_none() {
                style::header("Call graph summary");
                println!("{}", style::metric("functions", statistics.total_functions));
                println!("{}", style::metric("calls", statistics.total_calls));
                println!("{}", style::metric("max call depth", statistics.max_call_depth));
                println!(
                    "{}",
                    style::metric("cycles", statistics.circular_dependencies.len())
                );
                println!(
                    "{}",
                    style::metric("orphans", statistics.orphan_functions.len())
                );
                println!();
            }
            if let Err(code) = write_output(args.output.as_deref(), &report.to_markdown()) {
                return code;
            }
        }
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "statistics": statistics,
                "narrative": report,
            });
            let json = match serde_json::to_string_pretty(&payload) {
                Ok(json) => json,
                Err(e) => {
                    style::error(&format!("Failed to serialize report: {}", e));
                    return 1;
                }
            };
            if let Err(code) = write_output(args.output.as_deref(), &json) {
                return code;
            }
        }
    }

    0
}
