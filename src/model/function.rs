use serde::{Deserialize, Serialize};

/// Descriptive grouping only; modules never participate in layout or
/// traversal.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub function_count: usize,
}

/// A function or method entity. Identity is the id; two entities are
/// never merged.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionNode {
    pub id: String,
    pub name: String,
    pub qualified_name: String,
    pub module_id: Option<String>,
    pub file_path: String,
    pub line_number: usize,
    pub end_line: usize,
    pub parameters: Vec<String>,
    pub decorators: Vec<String>,
    pub is_async: bool,
    pub is_method: bool,
    pub class_name: Option<String>,
    pub docstring: Option<String>,
    pub is_entry_point: bool,
    /// Cyclomatic complexity, clamped to >= 1 at construction.
    pub complexity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Direct,
    Indirect,
}

impl CallType {
    /// Missing call types are treated as direct; anything that is not
    /// explicitly direct is indirect and stays out of traversal.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => CallType::Direct,
            Some(s) if s.eq_ignore_ascii_case("direct") => CallType::Direct,
            Some(_) => CallType::Indirect,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallEdge {
    pub id: String,
    pub caller_id: String,
    pub callee_id: String,
    pub call_type: CallType,
    pub is_conditional: bool,
    pub is_loop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointKind {
    Route,
    MainFunction,
    Other(String),
}

impl EntryPointKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "route" => EntryPointKind::Route,
            "main_function" | "main" => EntryPointKind::MainFunction,
            other => EntryPointKind::Other(other.to_string()),
        }
    }

    /// Human label used by the narrative generator.
    pub fn label(&self) -> &str {
        match self {
            EntryPointKind::Route => "route",
            EntryPointKind::MainFunction => "main function",
            EntryPointKind::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for EntryPointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A program/request entry reference. A function may be referenced by
/// zero or more entry points.
#[derive(Debug, Clone, Serialize)]
pub struct EntryPoint {
    pub id: String,
    pub function_id: String,
    pub kind: EntryPointKind,
}
