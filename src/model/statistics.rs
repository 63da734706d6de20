use crate::config::Thresholds;
use serde::Serialize;

/// Derived call-graph statistics. Always recomputable from the model;
/// never authoritative on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_functions: usize,
    pub total_calls: usize,
    /// Longest path in edge count over the acyclic direct-call subgraph.
    pub max_call_depth: usize,
    /// One edge-id group per cyclic strongly connected component.
    pub circular_dependencies: Vec<Vec<String>>,
    /// Functions with no incoming direct call and no entry-point reference.
    pub orphan_functions: Vec<String>,
}

/// Presentation bucket for a cyclomatic complexity score. The thresholds
/// are a display convention, centralized so layout styling and the
/// narrative generator always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityBand {
    Simple,
    Moderate,
    High,
}

impl ComplexityBand {
    pub fn classify(complexity: u32, thresholds: &Thresholds) -> Self {
        if complexity <= thresholds.simple_max {
            ComplexityBand::Simple
        } else if complexity <= thresholds.moderate_max {
            ComplexityBand::Moderate
        } else {
            ComplexityBand::High
        }
    }
}

impl std::fmt::Display for ComplexityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityBand::Simple => write!(f, "simple"),
            ComplexityBand::Moderate => write!(f, "moderate"),
            ComplexityBand::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;

    #[test]
    fn classification_boundaries() {
        let t = Thresholds::default();
        assert_eq!(ComplexityBand::classify(1, &t), ComplexityBand::Simple);
        assert_eq!(ComplexityBand::classify(5, &t), ComplexityBand::Simple);
        assert_eq!(ComplexityBand::classify(6, &t), ComplexityBand::Moderate);
        assert_eq!(ComplexityBand::classify(10, &t), ComplexityBand::Moderate);
        assert_eq!(ComplexityBand::classify(11, &t), ComplexityBand::High);
    }
}
