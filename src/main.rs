use callmap::cli::{Cli, Command};
use callmap::{cmd_analyze, cmd_layout, cmd_narrative};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Narrative(args) => cmd_narrative(args),
    };

    std::process::exit(exit_code);
}
