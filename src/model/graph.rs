use crate::model::raw::{RawGraph, RawStatistics};
use crate::model::{CallEdge, CallType, EntryPoint, EntryPointKind, FunctionNode, ModuleInfo};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// The normalized, id-indexed call graph for one visualization session.
///
/// Built once per incoming graph JSON and immutable afterwards; a new
/// upload replaces it wholesale. Records missing required ids are skipped
/// with a warning, never fatal.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    pub modules: Vec<ModuleInfo>,
    pub functions: Vec<FunctionNode>,
    pub calls: Vec<CallEdge>,
    pub entry_points: Vec<EntryPoint>,
    /// Statistics as reported by the parser, kept for display only.
    pub reported_statistics: Option<RawStatistics>,
    function_index: HashMap<String, usize>,
    module_index: HashMap<String, usize>,
}

impl GraphModel {
    pub fn from_raw(raw: RawGraph) -> Self {
        let mut modules = Vec::with_capacity(raw.modules.len());
        let mut module_index = HashMap::new();

        for m in raw.modules {
            let Some(id) = m.id else {
                warn!("skipping module without id");
                continue;
            };
            let name = m.name.unwrap_or_else(|| id.clone());
            if module_index.contains_key(&id) {
                warn!(module = %id, "skipping duplicate module id");
                continue;
            }
            module_index.insert(id.clone(), modules.len());
            modules.push(ModuleInfo {
                id,
                name,
                file_path: m.file_path.unwrap_or_default(),
                function_count: m.function_count.unwrap_or(0),
            });
        }

        // Entry-point references are resolved before functions so the
        // is_entry_point flag can be set in the same pass.
        let mut entry_points = Vec::with_capacity(raw.entry_points.len());
        let mut entry_function_ids: HashSet<String> = HashSet::new();
        for e in raw.entry_points {
            let Some(function_id) = e.function_id else {
                warn!("skipping entry point without function_id");
                continue;
            };
            let kind = EntryPointKind::parse(e.kind.as_deref().unwrap_or("unknown"));
            let id = e
                .id
                .unwrap_or_else(|| format!("entry:{}", function_id));
            entry_function_ids.insert(function_id.clone());
            entry_points.push(EntryPoint {
                id,
                function_id,
                kind,
            });
        }

        let mut functions = Vec::with_capacity(raw.functions.len());
        let mut function_index = HashMap::new();
        for f in raw.functions {
            let Some(id) = f.id else {
                warn!("skipping function without id");
                continue;
            };
            if function_index.contains_key(&id) {
                warn!(function = %id, "skipping duplicate function id");
                continue;
            }
            let qualified_name = f.qualified_name.unwrap_or_else(|| id.clone());
            let name = f.name.unwrap_or_else(|| qualified_name.clone());
            let is_entry_point = entry_function_ids.contains(&id);
            function_index.insert(id.clone(), functions.len());
            functions.push(FunctionNode {
                id,
                name,
                qualified_name,
                module_id: f.module,
                file_path: f.file_path.unwrap_or_default(),
                line_number: f.line_number.unwrap_or(0),
                end_line: f.end_line.unwrap_or(0),
                parameters: f.parameters,
                decorators: f.decorators,
                is_async: f.is_async,
                is_method: f.is_method,
                class_name: f.class_name,
                docstring: f.docstring,
                is_entry_point,
                complexity: f.complexity.unwrap_or(1).max(1),
            });
        }

        let mut calls = Vec::with_capacity(raw.calls.len());
        for c in raw.calls {
            let (Some(id), Some(caller_id), Some(callee_id)) = (c.id, c.caller_id, c.callee_id)
            else {
                warn!("skipping call edge missing id, caller, or callee");
                continue;
            };
            calls.push(CallEdge {
                id,
                caller_id,
                callee_id,
                call_type: CallType::parse(c.call_type.as_deref()),
                is_conditional: c.is_conditional,
                is_loop: c.is_loop,
            });
        }

        Self {
            modules,
            functions,
            calls,
            entry_points,
            reported_statistics: raw.statistics,
            function_index,
            module_index,
        }
    }

    pub fn function(&self, id: &str) -> Option<&FunctionNode> {
        self.function_index.get(id).map(|&i| &self.functions[i])
    }

    pub fn module(&self, id: &str) -> Option<&ModuleInfo> {
        self.module_index.get(id).map(|&i| &self.modules[i])
    }

    /// An edge participates in traversal and layout only when both
    /// endpoints resolve to known functions and the call is direct.
    /// Everything else is retained for statistics display alone.
    pub fn is_traversal_edge(&self, edge: &CallEdge) -> bool {
        edge.call_type == CallType::Direct
            && self.function_index.contains_key(&edge.caller_id)
            && self.function_index.contains_key(&edge.callee_id)
    }

    /// Traversal-eligible edges in input order.
    pub fn traversal_edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.calls.iter().filter(|e| self.is_traversal_edge(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::RawGraph;

    fn parse(json: &str) -> GraphModel {
        let raw: RawGraph = serde_json::from_str(json).unwrap();
        GraphModel::from_raw(raw)
    }

    #[test]
    fn malformed_calls_are_skipped_not_fatal() {
        let model = parse(
            r#"{
                "functions": [
                    {"id": "a", "name": "a"},
                    {"id": "b", "name": "b"}
                ],
                "calls": [
                    {"id": "c1", "caller_id": "a", "callee_id": "b", "call_type": "direct"},
                    {"id": "c2", "caller_id": "a"},
                    {"caller_id": "a", "callee_id": "b"}
                ]
            }"#,
        );
        assert_eq!(model.functions.len(), 2);
        assert_eq!(model.calls.len(), 1);
        assert_eq!(model.calls[0].id, "c1");
    }

    #[test]
    fn indirect_and_dangling_edges_excluded_from_traversal() {
        let model = parse(
            r#"{
                "functions": [{"id": "a"}, {"id": "b"}],
                "calls": [
                    {"id": "c1", "caller_id": "a", "callee_id": "b", "call_type": "direct"},
                    {"id": "c2", "caller_id": "a", "callee_id": "b", "call_type": "indirect"},
                    {"id": "c3", "caller_id": "a", "callee_id": "ghost", "call_type": "direct"}
                ]
            }"#,
        );
        assert_eq!(model.calls.len(), 3);
        let traversal: Vec<_> = model.traversal_edges().map(|e| e.id.as_str()).collect();
        assert_eq!(traversal, vec!["c1"]);
    }

    #[test]
    fn empty_input_builds_empty_model() {
        let model = parse(r#"{}"#);
        assert!(model.functions.is_empty());
        assert!(model.calls.is_empty());
        assert!(model.entry_points.is_empty());
    }

    #[test]
    fn complexity_clamped_to_one() {
        let model = parse(r#"{"functions": [{"id": "a", "complexity": 0}]}"#);
        assert_eq!(model.functions[0].complexity, 1);
    }

    #[test]
    fn entry_point_flag_set_on_referenced_function() {
        let model = parse(
            r#"{
                "functions": [{"id": "a"}, {"id": "b"}],
                "entry_points": [{"id": "e1", "type": "route", "function_id": "a"}]
            }"#,
        );
        assert!(model.function("a").unwrap().is_entry_point);
        assert!(!model.function("b").unwrap().is_entry_point);
        assert_eq!(model.entry_points[0].kind, EntryPointKind::Route);
    }
}
