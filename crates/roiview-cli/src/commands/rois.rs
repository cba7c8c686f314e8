use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use roiview_core::remote::{DataServiceSource, HttpMirror, RoiLoader};
use roiview_core::session::Session;
use roiview_core::source::{resolver_for, DataSourceResolver};

use super::{emit_json, wait_with_spinner, SourceArgs};
use crate::summary::print_roi_list;

#[derive(Args)]
pub struct RoisArgs {
    /// Interaction group display name
    pub group: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum number of ROIs to keep
    #[arg(long)]
    pub cap: Option<usize>,

    /// Start at this ROI index
    #[arg(long, default_value = "0")]
    pub index: usize,

    /// Step forward this many times (wraps around)
    #[arg(long, default_value = "0")]
    pub next: usize,

    /// Step back this many times (wraps around)
    #[arg(long, default_value = "0")]
    pub prev: usize,

    /// Emit a config framed on the current ROI
    #[arg(long)]
    pub set_view: bool,

    /// Output file path for --set-view
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &RoisArgs) -> Result<()> {
    let mut app = args.source.app_config()?;
    if let Some(cap) = args.cap {
        app.top_roi_cap = cap;
    }

    let resolver: Arc<dyn DataSourceResolver> = Arc::from(resolver_for(&app));
    let source = Arc::new(DataServiceSource::new(
        Arc::clone(&resolver),
        app.shapes_canvas_height,
    ));
    let loader = RoiLoader::new(source, app.top_roi_cap);
    let mirror = HttpMirror::for_config(&app, resolver.as_ref());
    let mut session = Session::new(&app, resolver);
    if let Some(mirror) = mirror {
        session.add_sink(Box::new(mirror));
    }

    let Some(ticket) = session.toggle_group(&args.group) else {
        bail!("Group '{}' could not be selected", args.group);
    };
    loader.request(ticket);

    let outcome = wait_with_spinner(format!("Loading ROIs for {}", args.group), |timeout| {
        loader.wait(timeout)
    })?;
    session.accept_rois(outcome);

    session.navigator_mut().go_to(args.index);
    for _ in 0..args.next {
        session.next_roi();
    }
    for _ in 0..args.prev {
        session.prev_roi();
    }

    print_roi_list(&args.group, session.navigator(), session.transform());

    let result = if args.set_view {
        match session.set_view_current() {
            Some(config) => config
                .to_json_pretty()
                .map_err(anyhow::Error::from)
                .and_then(|json| emit_json(&json, args.output.as_deref())),
            None => Err(anyhow::anyhow!(
                "No ROI loaded for '{}', nothing to frame",
                args.group
            )),
        }
    } else {
        Ok(())
    };

    session.flush_sinks();
    result
}
