use crate::layout::LayoutConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub layout: LayoutConfig,
}

/// Presentation thresholds shared by every consumer (layout styling and
/// the narrative generator). The defaults carry no structural meaning
/// beyond the simple/moderate/high labeling.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Complexity at or below this is "simple".
    pub simple_max: u32,
    /// Complexity at or below this (and above simple) is "moderate".
    pub moderate_max: u32,
    /// Complexity strictly above this gets a separate issue callout.
    pub very_high: u32,
    /// Call chains at or below this depth read as shallow.
    pub shallow_chain: usize,
    /// Call chains strictly deeper than this read as deep.
    pub deep_chain: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            simple_max: 5,
            moderate_max: 10,
            very_high: 15,
            shallow_chain: 2,
            deep_chain: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    thresholds: Option<RawThresholds>,
    layout: Option<RawLayout>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    simple_max: Option<u32>,
    moderate_max: Option<u32>,
    very_high: Option<u32>,
    shallow_chain: Option<usize>,
    deep_chain: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    node_sep: Option<f64>,
    rank_sep: Option<f64>,
    margin_x: Option<f64>,
    margin_y: Option<f64>,
    min_node_width: Option<f64>,
    min_node_height: Option<f64>,
    crossing_sweeps: Option<usize>,
}

impl Config {
    /// Load `.callmap.toml` from the given directory, falling back to the
    /// defaults when no file exists.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(".callmap.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Thresholds::default();
        let layout_defaults = LayoutConfig::default();

        let thresholds = match raw.thresholds {
            Some(t) => Thresholds {
                simple_max: t.simple_max.unwrap_or(defaults.simple_max),
                moderate_max: t.moderate_max.unwrap_or(defaults.moderate_max),
                very_high: t.very_high.unwrap_or(defaults.very_high),
                shallow_chain: t.shallow_chain.unwrap_or(defaults.shallow_chain),
                deep_chain: t.deep_chain.unwrap_or(defaults.deep_chain),
            },
            None => defaults,
        };

        let layout = match raw.layout {
            Some(l) => LayoutConfig {
                node_sep: l.node_sep.unwrap_or(layout_defaults.node_sep),
                rank_sep: l.rank_sep.unwrap_or(layout_defaults.rank_sep),
                margin_x: l.margin_x.unwrap_or(layout_defaults.margin_x),
                margin_y: l.margin_y.unwrap_or(layout_defaults.margin_y),
                min_node_width: l.min_node_width.unwrap_or(layout_defaults.min_node_width),
                min_node_height: l
                    .min_node_height
                    .unwrap_or(layout_defaults.min_node_height),
                crossing_sweeps: l.crossing_sweeps.unwrap_or(layout_defaults.crossing_sweeps),
            },
            None => layout_defaults,
        };

        Ok(Self { thresholds, layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_bands() {
        let config = Config::default();
        assert_eq!(config.thresholds.simple_max, 5);
        assert_eq!(config.thresholds.moderate_max, 10);
        assert_eq!(config.thresholds.very_high, 15);
        assert_eq!(config.thresholds.deep_chain, 5);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config =
            Config::from_toml("[thresholds]\nsimple_max = 3\n\n[layout]\nnode_sep = 100.0\n")
                .unwrap();
        assert_eq!(config.thresholds.simple_max, 3);
        assert_eq!(config.thresholds.moderate_max, 10);
        assert_eq!(config.layout.node_sep, 100.0);
        assert_eq!(config.layout.rank_sep, LayoutConfig::default().rank_sep);
    }
}
