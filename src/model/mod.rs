mod function;
mod graph;
pub mod raw;
mod statistics;

pub use function::{CallEdge, CallType, EntryPoint, EntryPointKind, FunctionNode, ModuleInfo};
pub use graph::GraphModel;
pub use statistics::{ComplexityBand, Statistics};
