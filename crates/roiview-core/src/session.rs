//! Orchestration of one viewing session.
//!
//! `Session` owns everything that changes over time (the active selection,
//! the ROI navigator, the last compiled config and a pending camera
//! override) and sequences the pure pieces around it. Regeneration always
//! runs in the same order:
//!
//! 1. take the previous config as the camera snapshot,
//! 2. compile a fresh config from the current selection,
//! 3. preserve the snapshot's camera into it,
//! 4. apply a pending "set view"/recenter override, if any,
//! 5. publish to every sink and keep it as the last config.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::compiler::{compile, CompileContext, CompiledConfig};
use crate::config::AppConfig;
use crate::navigation::{
    ActiveSelection, HeatmapSlot, HeatmapTicket, LoadTicket, RoiEntry, RoiNavigator,
};
use crate::registry::{default_channels, default_interaction_groups, ChannelDefinition, GroupRegistry};
use crate::remote::{ConfigSink, HeatmapOutcome, LoadOutcome};
use crate::source::DataSourceResolver;
use crate::transform::CoordinateTransform;
use crate::view::{apply_override, preserve, ViewState};

pub struct Session {
    channels: Vec<ChannelDefinition>,
    groups: GroupRegistry,
    resolver: Arc<dyn DataSourceResolver>,
    image_url: String,
    transform: CoordinateTransform,
    default_view: ViewState,
    navigator: RoiNavigator,
    heatmaps: HeatmapSlot,
    last_config: Option<CompiledConfig>,
    pending_override: Option<ViewState>,
    sinks: Vec<Box<dyn ConfigSink>>,
}

impl Session {
    /// Session over the built-in channel and group tables.
    pub fn new(config: &AppConfig, resolver: Arc<dyn DataSourceResolver>) -> Self {
        Self::with_registries(config, resolver, default_channels(), default_interaction_groups())
    }

    pub fn with_registries(
        config: &AppConfig,
        resolver: Arc<dyn DataSourceResolver>,
        channels: Vec<ChannelDefinition>,
        groups: GroupRegistry,
    ) -> Self {
        Self {
            channels,
            groups,
            resolver,
            image_url: config.image_url.clone(),
            transform: CoordinateTransform::new(config.transform),
            default_view: config.camera,
            navigator: RoiNavigator::new(config.top_roi_cap),
            heatmaps: HeatmapSlot::new(),
            last_config: None,
            pending_override: None,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn ConfigSink>) {
        self.sinks.push(sink);
    }

    /// Wait for every sink to finish what has been published so far.
    pub fn flush_sinks(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }

    /// Toggle `name`: re-selecting the active group deselects it, selecting
    /// any other group replaces the selection. The camera is recentered on
    /// the default view.
    ///
    /// Returns the ticket of the ROI load to issue, if a group was selected.
    /// Heatmaps of the previous selection are dropped.
    pub fn toggle_group(&mut self, name: &str) -> Option<LoadTicket> {
        self.heatmaps.clear();
        let ticket = if self.navigator.selection().is_active(name) {
            self.navigator.clear_selection();
            None
        } else {
            Some(self.navigator.select_group(name))
        };
        self.pending_override = Some(self.default_view);
        self.regenerate();
        ticket
    }

    /// Feed a finished load back in. Stale outcomes are discarded.
    pub fn accept_rois(&mut self, outcome: LoadOutcome) -> bool {
        self.navigator.accept(&outcome.ticket, outcome.result)
    }

    /// Start a heatmap load for the current ROI. `None` when there is no ROI.
    pub fn request_heatmaps(&mut self) -> Option<HeatmapTicket> {
        let roi = self.navigator.current()?;
        Some(self.heatmaps.request(&roi.source_group, &roi.id))
    }

    /// Feed a finished heatmap load back in. Stale outcomes are discarded.
    pub fn accept_heatmaps(&mut self, outcome: HeatmapOutcome) -> bool {
        self.heatmaps.accept(&outcome.ticket, outcome.result)
    }

    pub fn heatmaps(&self) -> &BTreeMap<String, Array2<f64>> {
        self.heatmaps.heatmaps()
    }

    pub fn next_roi(&mut self) -> Option<&RoiEntry> {
        self.navigator.next()
    }

    pub fn prev_roi(&mut self) -> Option<&RoiEntry> {
        self.navigator.prev()
    }

    /// Frame the current ROI and regenerate. `None` when there is no ROI.
    pub fn set_view_current(&mut self) -> Option<&CompiledConfig> {
        let Some(roi) = self.navigator.current() else {
            warn!("No valid ROI selected for set view");
            return None;
        };
        let view = self.transform.set_view(roi);
        info!(roi = %roi.id, ?view, "Setting view to ROI");
        self.set_view(view);
        self.last_config.as_ref()
    }

    /// Regenerate with an explicit camera.
    pub fn set_view(&mut self, view: ViewState) -> &CompiledConfig {
        self.pending_override = Some(view);
        self.regenerate()
    }

    /// Recompile from the current selection, keeping the camera.
    pub fn regenerate(&mut self) -> &CompiledConfig {
        let previous = self.last_config.take();

        let ctx = CompileContext {
            groups: &self.groups,
            resolver: self.resolver.as_ref(),
            image_url: &self.image_url,
            default_view: self.default_view,
        };
        let active = self.navigator.selection().groups();
        let mut next = compile(&active, &self.channels, &ctx);

        next.coordination_space = preserve(
            previous.as_ref().map(|c| &c.coordination_space),
            next.coordination_space,
        );
        next.coordination_space = apply_override(next.coordination_space, self.pending_override.take());
        debug!(name = %next.name, camera = ?next.camera(), "Regenerated config");

        for sink in &self.sinks {
            sink.publish(&next);
        }
        self.last_config.insert(next)
    }

    pub fn last_config(&self) -> Option<&CompiledConfig> {
        self.last_config.as_ref()
    }

    pub fn selection(&self) -> &ActiveSelection {
        self.navigator.selection()
    }

    pub fn navigator(&self) -> &RoiNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut RoiNavigator {
        &mut self.navigator
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn channels(&self) -> &[ChannelDefinition] {
        &self.channels
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }
}
