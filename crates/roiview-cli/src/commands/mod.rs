pub mod compile;
pub mod config;
pub mod groups;
pub mod heatmap;
pub mod rois;
pub mod shapes;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use roiview_core::compiler::CompiledConfig;
use roiview_core::config::AppConfig;
use roiview_core::source::Environment;
use roiview_core::view::ViewState;

/// Options shared by every command that talks to the data service.
#[derive(Args)]
pub struct SourceArgs {
    /// Application config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use statically hosted files instead of the local data service
    #[arg(long)]
    pub hosted: bool,

    /// Data service base URL (local mode)
    #[arg(long)]
    pub base_url: Option<String>,
}

impl SourceArgs {
    /// Config file values, with command-line flags applied on top.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match self.config {
            Some(ref path) => AppConfig::load(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => AppConfig::default(),
        };
        if self.hosted {
            config.environment = Environment::Hosted;
        }
        if let Some(ref url) = self.base_url {
            config.service_base_url = url.clone();
        }
        Ok(config)
    }
}

/// Parse `x,y,zoom`.
pub fn parse_view(s: &str) -> Result<ViewState> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid view '{s}', expected x,y,zoom"))?;
    match parts.as_slice() {
        [x, y, zoom] => Ok(ViewState::new(*x, *y, *zoom)),
        _ => bail!("Invalid view '{s}', expected x,y,zoom"),
    }
}

pub fn read_compiled(path: &Path) -> Result<CompiledConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    CompiledConfig::from_json(&contents)
        .with_context(|| format!("Invalid compiled config {}", path.display()))
}

/// Write `json` to `output`, or stdout when no path is given.
pub fn emit_json(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Longest the CLI waits for one background load.
pub const LOAD_WAIT_LIMIT: Duration = Duration::from_secs(60);

/// Poll `next` behind a spinner until it yields an outcome or
/// [`LOAD_WAIT_LIMIT`] passes.
pub fn wait_with_spinner<T>(
    message: String,
    mut next: impl FnMut(Duration) -> Option<T>,
) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(message);

    let started = Instant::now();
    let outcome = loop {
        if let Some(outcome) = next(Duration::from_millis(100)) {
            break Some(outcome);
        }
        if started.elapsed() >= LOAD_WAIT_LIMIT {
            break None;
        }
        pb.tick();
    };
    pb.finish_and_clear();

    outcome.with_context(|| format!("No response after {}s", LOAD_WAIT_LIMIT.as_secs()))
}
