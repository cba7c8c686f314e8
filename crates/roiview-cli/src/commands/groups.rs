use anyhow::Result;
use clap::Args;
use roiview_core::registry::{default_channels, default_heatmap_groups, default_interaction_groups};

use crate::summary::print_registries;

#[derive(Args)]
pub struct GroupsArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &GroupsArgs) -> Result<()> {
    let channels = default_channels();
    let groups = default_interaction_groups();
    let heatmap_groups = default_heatmap_groups();

    if args.json {
        let listing = serde_json::json!({
            "channels": channels,
            "interactionGroups": groups.iter().collect::<Vec<_>>(),
            "heatmapGroups": heatmap_groups,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_registries(&channels, &groups, &heatmap_groups);
    }
    Ok(())
}
