use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use roiview_core::remote::{DataServiceSource, RoiSource};
use roiview_core::source::resolver_for;

use super::SourceArgs;
use crate::summary::print_shapes;

#[derive(Args)]
pub struct ShapesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show shapes tagged with this interaction
    #[arg(long)]
    pub interaction: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ShapesArgs) -> Result<()> {
    let app = args.source.app_config()?;
    let source = DataServiceSource::new(Arc::from(resolver_for(&app)), app.shapes_canvas_height);

    let mut shapes = source
        .fetch_roi_shapes()
        .context("Failed to load ROI shapes")?;
    if let Some(ref interaction) = args.interaction {
        shapes.retain(|s| s.interactions.iter().any(|i| i == interaction));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shapes)?);
    } else {
        print_shapes(&shapes);
    }
    Ok(())
}
