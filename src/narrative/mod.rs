//! Template-based narrative synthesis.
//!
//! Produces the six prose sections from the model and statistics alone.
//! Fully deterministic, no external calls; this is the report the tool
//! falls back to when no richer analysis backend is available. Every
//! branch is empty-safe: absent inputs yield placeholder sentences, never
//! empty strings.

use crate::config::Thresholds;
use crate::model::{CallType, ComplexityBand, EntryPointKind, FunctionNode, GraphModel, Statistics};
use serde::Serialize;
use std::collections::HashMap;

/// Six independent prose sections describing the call graph.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeReport {
    pub overview: String,
    pub how_it_starts: String,
    pub architecture: String,
    pub complexity: String,
    pub potential_issues: String,
    pub call_chains: String,
}

impl NarrativeReport {
    pub fn to_markdown(&self) -> String {
        format!(
            "# Call Graph Report\n\n\
             ## Overview\n\n{}\n\n\
             ## How It Starts\n\n{}\n\n\
             ## Architecture\n\n{}\n\n\
             ## Complexity\n\n{}\n\n\
             ## Potential Issues\n\n{}\n\n\
             ## Call Chains\n\n{}\n",
            self.overview,
            self.how_it_starts,
            self.architecture,
            self.complexity,
            self.potential_issues,
            self.call_chains
        )
    }
}

const MISSING_GRAPH: &str = "No call graph is available for this section.";
const MISSING_STATISTICS: &str = "No statistics are available for this section.";

/// Generate the full report. Either input may be absent; sections that
/// need the missing piece degrade to a placeholder sentence.
pub fn generate(
    model: Option<&GraphModel>,
    statistics: Option<&Statistics>,
    thresholds: &Thresholds,
) -> NarrativeReport {
    NarrativeReport {
        overview: model.map_or_else(|| MISSING_GRAPH.to_string(), overview),
        how_it_starts: model.map_or_else(|| MISSING_GRAPH.to_string(), how_it_starts),
        architecture: model.map_or_else(|| MISSING_GRAPH.to_string(), architecture),
        complexity: model.map_or_else(
            || MISSING_GRAPH.to_string(),
            |m| complexity(m, thresholds),
        ),
        potential_issues: match (model, statistics) {
            (Some(m), Some(s)) => potential_issues(m, s, thresholds),
            _ => MISSING_STATISTICS.to_string(),
        },
        call_chains: match (model, statistics) {
            (Some(m), Some(s)) => call_chains(m, s, thresholds),
            _ => MISSING_STATISTICS.to_string(),
        },
    }
}

fn overview(model: &GraphModel) -> String {
    if model.functions.is_empty() {
        return "The graph contains no functions; there is nothing to analyze yet.".to_string();
    }

    let archetype = if model
        .functions
        .iter()
        .any(|f| f.decorators.iter().any(|d| is_route_decorator(d)))
    {
        "a web application with routed request handlers"
    } else if model.functions.iter().any(|f| f.name == "main")
        || model
            .entry_points
            .iter()
            .any(|ep| ep.kind == EntryPointKind::MainFunction)
    {
        "a program driven from a main function"
    } else {
        "a general-purpose script or library"
    };

    let mut text = format!(
        "This codebase contains {} function{} across {} module{}, connected by {} call{} and exposing {} entry point{}. It looks like {}.",
        model.functions.len(),
        plural(model.functions.len()),
        model.modules.len(),
        plural(model.modules.len()),
        model.calls.len(),
        plural(model.calls.len()),
        model.entry_points.len(),
        plural(model.entry_points.len()),
        archetype
    );

    let async_count = model.functions.iter().filter(|f| f.is_async).count();
    if async_count > 0 {
        text.push_str(&format!(
            " {} function{} {} asynchronous.",
            async_count,
            plural(async_count),
            if async_count == 1 { "is" } else { "are" }
        ));
    }

    text
}

fn how_it_starts(model: &GraphModel) -> String {
    if model.entry_points.is_empty() {
        return match model.functions.iter().find(|f| f.name == "main") {
            Some(main) => format!(
                "No explicit entry points were detected, but execution likely begins at `{}` ({}:{}).",
                main.name, main.file_path, main.line_number
            ),
            None => {
                "No entry points were detected; this codebase looks like a library meant to be imported rather than run directly.".to_string()
            }
        };
    }

    // Kind label -> representative function names, in entry-point order.
    let mut by_kind: Vec<(String, Vec<String>)> = Vec::new();
    for entry in &model.entry_points {
        let name = model
            .function(&entry.function_id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| entry.function_id.clone());
        match by_kind.iter_mut().find(|(label, _)| *label == entry.kind.label()) {
            Some((_, names)) => names.push(name),
            None => by_kind.push((entry.kind.label().to_string(), vec![name])),
        }
    }

    let groups: Vec<String> = by_kind
        .iter()
        .map(|(label, names)| {
            let shown: Vec<String> = names.iter().take(3).map(|n| format!("`{n}`")).collect();
            let suffix = if names.len() > 3 {
                format!(" and {} more", names.len() - 3)
            } else {
                String::new()
            };
            format!(
                "{} {} entr{}: {}{}",
                names.len(),
                label,
                if names.len() == 1 { "y" } else { "ies" },
                shown.join(", "),
                suffix
            )
        })
        .collect();

    format!("Execution starts from {}.", groups.join("; "))
}

fn architecture(model: &GraphModel) -> String {
    if model.functions.is_empty() {
        return "There are no functions, so no structural patterns can be described.".to_string();
    }

    let mut fan_in: HashMap<&str, usize> = HashMap::new();
    for edge in model.traversal_edges() {
        *fan_in.entry(edge.callee_id.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&FunctionNode, usize)> = model
        .functions
        .iter()
        .map(|f| (f, fan_in.get(f.id.as_str()).copied().unwrap_or(0)))
        .filter(|(_, count)| *count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));

    let mut text = if ranked.is_empty() {
        "No function is called by another, so there are no structural hubs.".to_string()
    } else {
        let hubs: Vec<String> = ranked
            .iter()
            .take(3)
            .map(|(f, count)| format!("`{}` ({} caller{})", f.name, count, plural(*count)))
            .collect();
        format!(
            "The most heavily used function{} {} {}.",
            plural(hubs.len()),
            if hubs.len() == 1 { "is" } else { "are" },
            hubs.join(", ")
        )
    };

    let mut routes = 0usize;
    let mut statics = 0usize;
    let mut class_level = 0usize;
    let mut properties = 0usize;
    for function in &model.functions {
        for decorator in &function.decorators {
            if is_route_decorator(decorator) {
                routes += 1;
            } else if decorator.contains("staticmethod") {
                statics += 1;
            } else if decorator.contains("classmethod") {
                class_level += 1;
            } else if decorator.contains("property") {
                properties += 1;
            }
        }
    }

    let mut categories = Vec::new();
    if routes > 0 {
        categories.push(format!("{routes} route handler{}", plural(routes)));
    }
    if statics > 0 {
        categories.push(format!("{statics} static method{}", plural(statics)));
    }
    if class_level > 0 {
        categories.push(format!("{class_level} class method{}", plural(class_level)));
    }
    if properties > 0 {
        categories.push(format!("{properties} propert{}", if properties == 1 { "y" } else { "ies" }));
    }
    if !categories.is_empty() {
        text.push_str(&format!(" Decorators mark {}.", categories.join(", ")));
    }

    text
}

fn complexity(model: &GraphModel, thresholds: &Thresholds) -> String {
    if model.functions.is_empty() {
        return "No functions to classify.".to_string();
    }

    let mut simple = 0usize;
    let mut moderate = 0usize;
    let mut high: Vec<&FunctionNode> = Vec::new();
    for function in &model.functions {
        match ComplexityBand::classify(function.complexity, thresholds) {
            ComplexityBand::Simple => simple += 1,
            ComplexityBand::Moderate => moderate += 1,
            ComplexityBand::High => high.push(function),
        }
    }
    high.sort_by(|a, b| b.complexity.cmp(&a.complexity).then_with(|| a.id.cmp(&b.id)));

    let mut text = format!(
        "Complexity spread: {simple} simple, {moderate} moderate, {} high.",
        high.len()
    );
    if !high.is_empty() {
        let worst: Vec<String> = high
            .iter()
            .take(3)
            .map(|f| format!("`{}` (line {}, score {})", f.name, f.line_number, f.complexity))
            .collect();
        text.push_str(&format!(
            " The most complex function{}: {}.",
            plural(worst.len()),
            worst.join(", ")
        ));
    }
    text
}

fn potential_issues(model: &GraphModel, statistics: &Statistics, thresholds: &Thresholds) -> String {
    let mut findings = Vec::new();

    let cycles = statistics.circular_dependencies.len();
    if cycles > 0 {
        findings.push(format!(
            "{cycles} circular dependenc{} that may complicate reasoning about call order",
            if cycles == 1 { "y" } else { "ies" }
        ));
    }

    let orphans = &statistics.orphan_functions;
    if !orphans.is_empty() {
        let names: Vec<String> = orphans
            .iter()
            .take(3)
            .map(|id| {
                model
                    .function(id)
                    .map(|f| format!("`{}`", f.name))
                    .unwrap_or_else(|| format!("`{id}`"))
            })
            .collect();
        findings.push(format!(
            "{} function{} never called and not registered as entry point{} (e.g. {})",
            orphans.len(),
            plural(orphans.len()),
            plural(orphans.len()),
            names.join(", ")
        ));
    }

    let very_high = model
        .functions
        .iter()
        .filter(|f| f.complexity > thresholds.very_high)
        .count();
    if very_high > 0 {
        findings.push(format!(
            "{very_high} function{} with very high complexity (above {})",
            plural(very_high),
            thresholds.very_high
        ));
    }

    if findings.is_empty() {
        "No structural issues detected: no cycles, no unreachable functions, and no extreme complexity.".to_string()
    } else {
        format!("Found {}.", findings.join("; "))
    }
}

fn call_chains(model: &GraphModel, statistics: &Statistics, thresholds: &Thresholds) -> String {
    let depth = statistics.max_call_depth;
    let remark = if depth <= thresholds.shallow_chain {
        "shallow, so most behavior is close to its entry point"
    } else if depth > thresholds.deep_chain {
        "deep, so tracing behavior may require following many hops"
    } else {
        "of moderate depth"
    };

    let direct = model
        .calls
        .iter()
        .filter(|c| c.call_type == CallType::Direct)
        .count();
    let conditional = model.calls.iter().filter(|c| c.is_conditional).count();
    let looped = model.calls.iter().filter(|c| c.is_loop).count();

    format!(
        "The longest call chain spans {depth} call{}; the graph is {remark}. Of {} recorded call{}, {direct} {} direct, {conditional} conditional, and {looped} inside loops.",
        plural(depth),
        model.calls.len(),
        plural(model.calls.len()),
        if direct == 1 { "is" } else { "are" }
    )
}

fn is_route_decorator(decorator: &str) -> bool {
    let d = decorator.to_ascii_lowercase();
    d.contains("route")
        || d.contains(".get")
        || d.contains(".post")
        || d.contains(".put")
        || d.contains(".delete")
        || d.contains(".patch")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_statistics;
    use crate::model::GraphModel;
    use crate::model::raw::RawGraph;

    fn model(json: &str) -> GraphModel {
        let raw: RawGraph = serde_json::from_str(json).unwrap();
        GraphModel::from_raw(raw)
    }

    fn sections(report: &NarrativeReport) -> [&String; 6] {
        [
            &report.overview,
            &report.how_it_starts,
            &report.architecture,
            &report.complexity,
            &report.potential_issues,
            &report.call_chains,
        ]
    }

    #[test]
    fn no_section_is_ever_empty() {
        let t = Thresholds::default();
        let empty = model(r#"{}"#);
        let stats = compute_statistics(&empty);

        for report in [
            generate(None, None, &t),
            generate(Some(&empty), None, &t),
            generate(None, Some(&stats), &t),
            generate(Some(&empty), Some(&stats), &t),
        ] {
            for section in sections(&report) {
                assert!(!section.is_empty());
            }
        }
    }

    #[test]
    fn empty_graph_mentions_no_functions() {
        let m = model(r#"{}"#);
        let stats = compute_statistics(&m);
        let report = generate(Some(&m), Some(&stats), &Thresholds::default());
        assert!(report.overview.contains("no functions"));
    }

    #[test]
    fn hub_and_high_complexity_are_named() {
        let m = model(
            r#"{
                "modules": [{"id": "m1", "name": "app"}, {"id": "m2", "name": "util"}],
                "functions": [
                    {"id": "f1", "name": "main", "complexity": 2},
                    {"id": "f2", "name": "handle", "complexity": 3},
                    {"id": "f3", "name": "store", "complexity": 12, "line_number": 40},
                    {"id": "f4", "name": "log", "complexity": 1},
                    {"id": "f5", "name": "parse", "complexity": 4}
                ],
                "calls": [
                    {"id": "e1", "caller_id": "f1", "callee_id": "f2", "call_type": "direct"},
                    {"id": "e2", "caller_id": "f2", "callee_id": "f3", "call_type": "direct"},
                    {"id": "e3", "caller_id": "f3", "callee_id": "f4", "call_type": "direct"},
                    {"id": "e4", "caller_id": "f5", "callee_id": "f4", "call_type": "direct", "is_conditional": true}
                ]
            }"#,
        );
        let stats = compute_statistics(&m);
        assert_eq!(stats.max_call_depth, 3);

        let report = generate(Some(&m), Some(&stats), &Thresholds::default());
        // f4 has two callers; the rest have one or zero.
        assert!(report.architecture.contains("`log`"));
        assert!(report.complexity.contains("`store`"));
        assert!(report.complexity.contains("score 12"));
        assert!(report.complexity.contains("line 40"));
        assert!(report.call_chains.contains('3'));
    }

    #[test]
    fn entry_points_group_by_kind() {
        let m = model(
            r#"{
                "functions": [
                    {"id": "f1", "name": "index"},
                    {"id": "f2", "name": "about"},
                    {"id": "f3", "name": "main"}
                ],
                "entry_points": [
                    {"id": "ep1", "type": "route", "function_id": "f1"},
                    {"id": "ep2", "type": "route", "function_id": "f2"},
                    {"id": "ep3", "type": "main_function", "function_id": "f3"}
                ]
            }"#,
        );
        let report = generate(Some(&m), None, &Thresholds::default());
        assert!(report.how_it_starts.contains("route"));
        assert!(report.how_it_starts.contains("main function"));
        assert!(report.how_it_starts.contains("`index`"));
    }

    #[test]
    fn no_entry_points_falls_back_to_main_then_library() {
        let with_main = model(r#"{"functions": [{"id": "f1", "name": "main"}]}"#);
        let report = generate(Some(&with_main), None, &Thresholds::default());
        assert!(report.how_it_starts.contains("`main`"));

        let no_main = model(r#"{"functions": [{"id": "f1", "name": "helper"}]}"#);
        let report = generate(Some(&no_main), None, &Thresholds::default());
        assert!(report.how_it_starts.contains("library"));
    }

    #[test]
    fn clean_graph_gets_a_clean_bill() {
        let m = model(
            r#"{
                "functions": [{"id": "f1", "name": "main"}, {"id": "f2", "name": "run"}],
                "calls": [
                    {"id": "e1", "caller_id": "f1", "callee_id": "f2", "call_type": "direct"}
                ],
                "entry_points": [{"id": "ep1", "type": "main_function", "function_id": "f1"}]
            }"#,
        );
        let stats = compute_statistics(&m);
        let report = generate(Some(&m), Some(&stats), &Thresholds::default());
        assert!(report.potential_issues.contains("No structural issues"));
    }

    #[test]
    fn issues_report_cycles_orphans_and_extremes() {
        let m = model(
            r#"{
                "functions": [
                    {"id": "f1", "name": "a", "complexity": 20},
                    {"id": "f2", "name": "b"},
                    {"id": "f3", "name": "dead"}
                ],
                "calls": [
                    {"id": "e1", "caller_id": "f1", "callee_id": "f2", "call_type": "direct"},
                    {"id": "e2", "caller_id": "f2", "callee_id": "f1", "call_type": "direct"}
                ]
            }"#,
        );
        let stats = compute_statistics(&m);
        let report = generate(Some(&m), Some(&stats), &Thresholds::default());
        assert!(report.potential_issues.contains("circular"));
        assert!(report.potential_issues.contains("`dead`"));
        assert!(report.potential_issues.contains("very high complexity"));
    }

    #[test]
    fn depth_remarks_follow_thresholds() {
        let t = Thresholds::default();
        let shallow = Statistics {
            max_call_depth: 1,
            ..Default::default()
        };
        let deep = Statistics {
            max_call_depth: 9,
            ..Default::default()
        };
        let m = model(r#"{"functions": [{"id": "f1", "name": "a"}]}"#);
        assert!(generate(Some(&m), Some(&shallow), &t).call_chains.contains("shallow"));
        assert!(generate(Some(&m), Some(&deep), &t).call_chains.contains("deep"));
    }

    #[test]
    fn markdown_report_has_all_sections() {
        let report = generate(None, None, &Thresholds::default());
        let md = report.to_markdown();
        for heading in [
            "## Overview",
            "## How It Starts",
            "## Architecture",
            "## Complexity",
            "## Potential Issues",
            "## Call Chains",
        ] {
            assert!(md.contains(heading));
        }
    }
}
