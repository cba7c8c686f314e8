use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use roiview_core::compiler::{compile, CompileContext};
use roiview_core::registry::{default_channels, default_interaction_groups};
use roiview_core::remote::HttpMirror;
use roiview_core::source::resolver_for;
use roiview_core::view::{apply_override, preserve};
use tracing::{info, warn};

use super::{emit_json, parse_view, read_compiled, SourceArgs};
use crate::summary::print_compile_summary;

#[derive(Args)]
pub struct CompileArgs {
    /// Interaction groups to overlay (display names)
    pub groups: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Camera override as x,y,zoom
    #[arg(long)]
    pub view: Option<String>,

    /// Previously compiled config whose camera is kept
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Do not mirror the result to the data service
    #[arg(long)]
    pub no_mirror: bool,

    /// Print a summary instead of the JSON document
    #[arg(long)]
    pub summary: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CompileArgs) -> Result<()> {
    let app = args.source.app_config()?;
    let resolver = resolver_for(&app);
    let groups = default_interaction_groups();
    let channels = default_channels();

    let view = args.view.as_deref().map(parse_view).transpose()?;
    let previous = args.previous.as_deref().map(read_compiled).transpose()?;

    for name in args.groups.iter().filter(|g| !groups.contains(g)) {
        warn!(group = %name, "Unknown interaction group, skipping");
    }

    let ctx = CompileContext {
        groups: &groups,
        resolver: resolver.as_ref(),
        image_url: &app.image_url,
        default_view: app.camera,
    };
    let mut compiled = compile(&args.groups, &channels, &ctx);
    compiled.coordination_space = preserve(
        previous.as_ref().map(|c| &c.coordination_space),
        compiled.coordination_space,
    );
    compiled.coordination_space = apply_override(compiled.coordination_space, view);
    compiled
        .validate()
        .context("Compiled config failed scope validation")?;

    if !args.no_mirror {
        if let Some(mirror) = HttpMirror::for_config(&app, resolver.as_ref()) {
            match mirror.send_blocking(&compiled) {
                Ok(response) => info!(url = mirror.url(), %response, "Config sent to backend"),
                Err(e) => warn!(url = mirror.url(), "Error sending config to backend: {e}"),
            }
        }
    }

    if args.summary {
        print_compile_summary(&compiled, app.environment);
        Ok(())
    } else {
        emit_json(&compiled.to_json_pretty()?, args.output.as_deref())
    }
}
