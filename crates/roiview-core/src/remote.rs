//! Network I/O against the data service.
//!
//! All requests are fire-and-forget from the caller's point of view. ROI and
//! heatmap loads run on background threads and report back over a channel;
//! config mirroring never blocks or fails the caller. There is no timeout or
//! retry. A failed request surfaces as an `Err` outcome, which the navigator
//! or heatmap slot turns into an empty result.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::compiler::CompiledConfig;
use crate::config::AppConfig;
use crate::consts::{HEATMAP_THREAD_NAME, LOADER_THREAD_NAME, MIRROR_THREAD_NAME};
use crate::error::{Result, RoiviewError};
use crate::navigation::{HeatmapTicket, LoadTicket, RoiEntry};
use crate::payload::{parse_interaction_heatmaps, parse_roi_shapes, parse_top_rois, RoiShape};
use crate::source::DataSourceResolver;

/// Read-only view of the remote data service.
pub trait RoiSource: Send + Sync {
    /// Top-ranked ROIs of a group, at most `cap`, in source order.
    fn fetch_top_rois(&self, group: &str, cap: usize) -> Result<Vec<RoiEntry>>;

    fn fetch_roi_shapes(&self) -> Result<Vec<RoiShape>>;

    fn fetch_interaction_heatmaps(
        &self,
        group: &str,
        roi_id: &str,
    ) -> Result<BTreeMap<String, Array2<f64>>>;
}

/// [`RoiSource`] backed by the URLs of a [`DataSourceResolver`].
///
/// `http(s)://` URLs are fetched over the network; anything else is read as
/// a path, which is how statically hosted files are reached from the CLI.
pub struct DataServiceSource {
    resolver: Arc<dyn DataSourceResolver>,
    shapes_flip_height: f64,
}

impl DataServiceSource {
    pub fn new(resolver: Arc<dyn DataSourceResolver>, shapes_flip_height: f64) -> Self {
        Self {
            resolver,
            shapes_flip_height,
        }
    }
}

impl RoiSource for DataServiceSource {
    fn fetch_top_rois(&self, group: &str, cap: usize) -> Result<Vec<RoiEntry>> {
        let body = fetch_text(&self.resolver.top_rois_url(group))?;
        parse_top_rois(&body, group, cap)
    }

    fn fetch_roi_shapes(&self) -> Result<Vec<RoiShape>> {
        let body = fetch_text(&self.resolver.roi_shapes_url())?;
        parse_roi_shapes(&body, self.shapes_flip_height)
    }

    fn fetch_interaction_heatmaps(
        &self,
        group: &str,
        roi_id: &str,
    ) -> Result<BTreeMap<String, Array2<f64>>> {
        let body = fetch_text(&self.resolver.heatmaps_url(group, roi_id))?;
        parse_interaction_heatmaps(&body)
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn fetch_text(url: &str) -> Result<String> {
    debug!(url, "Fetching");
    if is_http(url) {
        Ok(ureq::get(url).call()?.into_body().read_to_string()?)
    } else {
        Ok(std::fs::read_to_string(url)?)
    }
}

/// Result of one background load, tagged with the ticket it was issued for.
#[derive(Debug)]
pub struct Outcome<K, T> {
    pub ticket: K,
    pub result: Result<T>,
}

pub type LoadOutcome = Outcome<LoadTicket, Vec<RoiEntry>>;

pub type HeatmapOutcome = Outcome<HeatmapTicket, BTreeMap<String, Array2<f64>>>;

/// Runs jobs on named background threads and queues their outcomes.
///
/// Every job reports back exactly once: a job that panics or a thread that
/// cannot be spawned yields an `Err` outcome for its ticket.
struct Worker<K, T> {
    thread_name: &'static str,
    tx: mpsc::Sender<Outcome<K, T>>,
    rx: mpsc::Receiver<Outcome<K, T>>,
}

impl<K, T> Worker<K, T>
where
    K: Clone + Send + 'static,
    T: Send + 'static,
{
    fn new(thread_name: &'static str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { thread_name, tx, rx }
    }

    fn spawn<F>(&self, ticket: K, job: F)
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let tx = self.tx.clone();
        let job_ticket = ticket.clone();
        let name = self.thread_name;

        let spawned = thread::Builder::new()
            .name(self.thread_name.into())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                    Err(RoiviewError::Worker(format!("{name} panicked")))
                });
                let _ = tx.send(Outcome {
                    ticket: job_ticket,
                    result,
                });
            });

        if let Err(e) = spawned {
            warn!(thread = self.thread_name, "Failed to spawn loader thread: {e}");
            let _ = self.tx.send(Outcome {
                ticket,
                result: Err(e.into()),
            });
        }
    }

    fn try_next(&self) -> Option<Outcome<K, T>> {
        self.rx.try_recv().ok()
    }

    fn wait(&self, timeout: Duration) -> Option<Outcome<K, T>> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Runs ROI loads off the caller's thread and queues their outcomes.
///
/// Outcomes are delivered in completion order, not request order; the
/// navigator's generation check decides which one counts.
pub struct RoiLoader {
    source: Arc<dyn RoiSource>,
    cap: usize,
    worker: Worker<LoadTicket, Vec<RoiEntry>>,
}

impl RoiLoader {
    pub fn new(source: Arc<dyn RoiSource>, cap: usize) -> Self {
        Self {
            source,
            cap,
            worker: Worker::new(LOADER_THREAD_NAME),
        }
    }

    /// Start loading the ROIs for `ticket` on a background thread.
    pub fn request(&self, ticket: LoadTicket) {
        let source = Arc::clone(&self.source);
        let cap = self.cap;
        let group = ticket.group.clone();
        self.worker
            .spawn(ticket, move || source.fetch_top_rois(&group, cap));
    }

    /// Next finished outcome, if any, without blocking.
    pub fn try_next(&self) -> Option<LoadOutcome> {
        self.worker.try_next()
    }

    /// Wait up to `timeout` for the next finished outcome.
    pub fn wait(&self, timeout: Duration) -> Option<LoadOutcome> {
        self.worker.wait(timeout)
    }
}

/// Background loads of per-ROI interaction heatmaps. Stale outcomes are
/// filtered by [`HeatmapSlot`](crate::navigation::HeatmapSlot).
pub struct HeatmapLoader {
    source: Arc<dyn RoiSource>,
    worker: Worker<HeatmapTicket, BTreeMap<String, Array2<f64>>>,
}

impl HeatmapLoader {
    pub fn new(source: Arc<dyn RoiSource>) -> Self {
        Self {
            source,
            worker: Worker::new(HEATMAP_THREAD_NAME),
        }
    }

    pub fn request(&self, ticket: HeatmapTicket) {
        let source = Arc::clone(&self.source);
        let group = ticket.group.clone();
        let roi_id = ticket.roi_id.clone();
        self.worker.spawn(ticket, move || {
            source.fetch_interaction_heatmaps(&group, &roi_id)
        });
    }

    pub fn try_next(&self) -> Option<HeatmapOutcome> {
        self.worker.try_next()
    }

    pub fn wait(&self, timeout: Duration) -> Option<HeatmapOutcome> {
        self.worker.wait(timeout)
    }
}

/// Receives every regenerated configuration.
pub trait ConfigSink {
    fn publish(&self, config: &CompiledConfig);

    /// Block until everything published so far has been handled.
    fn flush(&self) {}
}

/// Mirrors compiled configs to the data service's `/updateconfig`.
///
/// Each POST runs on its own thread; the response is only logged.
pub struct HttpMirror {
    url: String,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpMirror {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// The mirror for `config`, if mirroring is enabled and `resolver`
    /// has an endpoint to mirror to.
    pub fn for_config(config: &AppConfig, resolver: &dyn DataSourceResolver) -> Option<Self> {
        if !config.mirrors_config() {
            return None;
        }
        resolver.update_config_url().map(Self::new)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST on the calling thread and return the response body.
    pub fn send_blocking(&self, config: &CompiledConfig) -> Result<String> {
        post_json(&self.url, &serde_json::to_value(config)?)
    }

    /// Number of POSTs started and not yet flushed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().map_or(0, |handles| handles.len())
    }
}

impl ConfigSink for HttpMirror {
    fn publish(&self, config: &CompiledConfig) {
        let body = match serde_json::to_value(config) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize config for mirroring: {e}");
                return;
            }
        };
        let url = self.url.clone();
        let spawned = thread::Builder::new()
            .name(MIRROR_THREAD_NAME.into())
            .spawn(move || match post_json(&url, &body) {
                Ok(response) => debug!(url = %url, response = %response, "Config sent to backend"),
                Err(e) => warn!(url = %url, "Error sending config to backend: {e}"),
            });
        match spawned {
            Ok(handle) => {
                if let Ok(mut handles) = self.in_flight.lock() {
                    handles.push(handle);
                }
            }
            Err(e) => warn!("Failed to spawn mirror thread: {e}"),
        }
    }

    fn flush(&self) {
        let handles = match self.in_flight.lock() {
            Ok(mut handles) => std::mem::take(&mut *handles),
            Err(_) => return,
        };
        for handle in handles {
            if handle.join().is_err() {
                warn!(url = %self.url, "Mirror thread panicked");
            }
        }
    }
}

fn post_json(url: &str, body: &serde_json::Value) -> Result<String> {
    Ok(ureq::post(url).send_json(body)?.into_body().read_to_string()?)
}
