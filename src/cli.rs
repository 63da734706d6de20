use crate::layout::Direction;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "callmap")]
#[command(about = "Lay out and narrate call graphs extracted from source code")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Recompute statistics and generate the full report
    Analyze(AnalyzeArgs),

    /// Compute node positions and styled edges for rendering
    Layout(LayoutArgs),

    /// Generate only the prose narrative
    Narrative(NarrativeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Call graph JSON file to analyze
    pub graph: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing .callmap.toml (defaults to the graph's directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct LayoutArgs {
    /// Call graph JSON file to lay out
    pub graph: PathBuf,

    /// Flow direction of the hierarchy
    #[arg(short, long, default_value = "tb")]
    pub direction: DirectionArg,

    /// Saved layout JSON applied atop the computed positions
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Write the resulting positions as a saved layout to this file
    #[arg(long)]
    pub save_layout: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing .callmap.toml (defaults to the graph's directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct NarrativeArgs {
    /// Call graph JSON file to describe
    pub graph: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing .callmap.toml (defaults to the graph's directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// CLI-facing direction names; kept separate from the layout type so clap
/// derives stay out of the library surface.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Top to bottom
    Tb,
    /// Bottom to top
    Bt,
    /// Left to right
    Lr,
    /// Right to left
    Rl,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Tb => Direction::TopBottom,
            DirectionArg::Bt => Direction::BottomTop,
            DirectionArg::Lr => Direction::LeftRight,
            DirectionArg::Rl => Direction::RightLeft,
        }
    }
}
