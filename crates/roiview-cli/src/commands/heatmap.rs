use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use ndarray::Array2;
use roiview_core::heatmap::{blend, channel_layers, interaction_overlays, CompositeLayer};
use roiview_core::navigation::HeatmapSlot;
use roiview_core::payload::{parse_channel_heatmaps, parse_interaction_heatmaps};
use roiview_core::registry::{default_channels, default_heatmap_groups};
use roiview_core::remote::{DataServiceSource, HeatmapLoader};
use roiview_core::source::resolver_for;

use super::{emit_json, wait_with_spinner, SourceArgs};

#[derive(Args)]
pub struct HeatmapArgs {
    /// Heatmap payload (JSON); omit to fetch with --group and --roi
    #[arg(required_unless_present = "group")]
    pub file: Option<PathBuf>,

    /// Interaction group to fetch heatmaps for
    #[arg(long, requires = "roi", conflicts_with = "file")]
    pub group: Option<String>,

    /// ROI id within the group
    #[arg(long, requires = "group")]
    pub roi: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Treat the payload as per-channel intensity heatmaps
    #[arg(long)]
    pub channels: bool,

    /// Comma-separated heatmap group ids to overlay (default: all)
    #[arg(long)]
    pub groups: Option<String>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &HeatmapArgs) -> Result<()> {
    let layers = match (&args.file, &args.group, &args.roi) {
        (Some(file), _, _) => {
            let contents = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            if args.channels {
                let heatmaps =
                    parse_channel_heatmaps(&contents).context("Invalid channel heatmap payload")?;
                channel_layers(&heatmaps, &default_channels())
            } else {
                let heatmaps = parse_interaction_heatmaps(&contents)
                    .context("Invalid interaction heatmap payload")?;
                interaction_layers(&heatmaps, args.groups.as_deref())
            }
        }
        (None, Some(group), Some(roi)) => {
            if args.channels {
                bail!("Channel heatmaps can only be read from a file");
            }
            let heatmaps = fetch(args, group, roi)?;
            interaction_layers(&heatmaps, args.groups.as_deref())
        }
        _ => bail!("Give a heatmap file, or both --group and --roi"),
    };

    emit_json(&serde_json::to_string_pretty(&layers)?, args.output.as_deref())
}

fn interaction_layers(
    heatmaps: &BTreeMap<String, Array2<f64>>,
    ids: Option<&str>,
) -> Vec<CompositeLayer> {
    let groups = default_heatmap_groups();
    let active: Vec<u32> = match ids {
        Some(ids) => ids.split(',').filter_map(|s| s.trim().parse().ok()).collect(),
        None => groups.iter().map(|g| g.id).collect(),
    };
    blend(&interaction_overlays(heatmaps, &groups, &active))
}

/// Load the heatmaps of one ROI through the background loader. A failed
/// load yields an empty set of layers.
fn fetch(args: &HeatmapArgs, group: &str, roi: &str) -> Result<BTreeMap<String, Array2<f64>>> {
    let app = args.source.app_config()?;
    let source = DataServiceSource::new(Arc::from(resolver_for(&app)), app.shapes_canvas_height);
    let loader = HeatmapLoader::new(Arc::new(source));
    let mut slot = HeatmapSlot::new();

    loader.request(slot.request(group, roi));
    let outcome = wait_with_spinner(format!("Loading heatmaps for ROI {roi}"), |timeout| {
        loader.wait(timeout)
    })?;
    slot.accept(&outcome.ticket, outcome.result);

    Ok(slot.heatmaps().clone())
}
