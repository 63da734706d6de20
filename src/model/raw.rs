use serde::Deserialize;

/// Wire shape of the graph JSON handed over by the language parsers.
///
/// Every field is optional-tolerant: a record missing required pieces is
/// skipped during model construction instead of failing the whole parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub modules: Vec<RawModule>,
    #[serde(default)]
    pub functions: Vec<RawFunction>,
    #[serde(default)]
    pub calls: Vec<RawCall>,
    #[serde(default)]
    pub entry_points: Vec<RawEntryPoint>,
    /// Advisory only; the core recomputes its own statistics.
    #[serde(default)]
    pub statistics: Option<RawStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModule {
    pub id: Option<String>,
    pub name: Option<String>,
    pub file_path: Option<String>,
    pub class_count: Option<usize>,
    pub function_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFunction {
    pub id: Option<String>,
    pub name: Option<String>,
    pub qualified_name: Option<String>,
    pub module: Option<String>,
    pub file_path: Option<String>,
    pub line_number: Option<usize>,
    pub end_line: Option<usize>,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub decorators: Vec<String>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_method: bool,
    pub class_name: Option<String>,
    pub docstring: Option<String>,
    pub complexity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCall {
    pub id: Option<String>,
    pub caller_id: Option<String>,
    pub callee_id: Option<String>,
    pub callee_name: Option<String>,
    pub file_path: Option<String>,
    pub line_number: Option<usize>,
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub is_loop: bool,
    pub call_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntryPoint {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub function_id: Option<String>,
    pub decorator: Option<String>,
    pub file_path: Option<String>,
    pub line_number: Option<usize>,
}

/// Caller-supplied statistics, kept loose on purpose: they are display
/// data and never feed a correctness-critical decision.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatistics {
    pub total_functions: Option<usize>,
    pub total_calls: Option<usize>,
    pub total_control_flows: Option<usize>,
    pub max_call_depth: Option<usize>,
    #[serde(default)]
    pub circular_dependencies: Vec<serde_json::Value>,
    #[serde(default)]
    pub orphan_functions: Vec<serde_json::Value>,
}
