mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roiview", about = "Region-of-interest viewer configuration tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save the default application config as TOML
    Config(commands::config::ConfigArgs),
    /// Compile a viewer config for a set of interaction groups
    Compile(commands::compile::CompileArgs),
    /// Load and navigate the top ROIs of an interaction group
    Rois(commands::rois::RoisArgs),
    /// Fetch ROI polygons and print their centroids
    Shapes(commands::shapes::ShapesArgs),
    /// Turn a heatmap payload, from a file or fetched for one ROI, into chart layers
    Heatmap(commands::heatmap::HeatmapArgs),
    /// List the channel and interaction-group tables
    Groups(commands::groups::GroupsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Config(args) => commands::config::run(args),
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Rois(args) => commands::rois::run(args),
        Commands::Shapes(args) => commands::shapes::run(args),
        Commands::Heatmap(args) => commands::heatmap::run(args),
        Commands::Groups(args) => commands::groups::run(args),
    }
}
