//! ROI navigation for the single active interaction group.
//!
//! Selecting a group starts a new generation and hands back a [`LoadTicket`].
//! The ROI list for that group arrives later, tagged with its ticket; a
//! result whose generation is no longer current is discarded, so a slow
//! response for an earlier selection can never overwrite a newer one.
//! Heatmaps of the inspected ROI follow the same rule through
//! [`HeatmapSlot`] and [`HeatmapTicket`].

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// A scored candidate region, tied to the group it was loaded for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiEntry {
    pub id: String,
    pub position: RoiPosition,
    pub score: f64,
    pub source_group: String,
    pub tooltip: String,
}

/// Which group drives navigation. Multi-group overlay is possible at the
/// compiler level, but navigation is single-group by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveSelection {
    #[default]
    None,
    Single(String),
}

impl ActiveSelection {
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Single(name) => Some(name),
        }
    }

    /// Active groups in the list form the compiler takes.
    pub fn groups(&self) -> Vec<&str> {
        self.group().into_iter().collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.group() == Some(name)
    }
}

/// Identifies one outstanding ROI load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub group: String,
}

#[derive(Debug)]
pub struct RoiNavigator {
    selection: ActiveSelection,
    entries: Vec<RoiEntry>,
    current_index: usize,
    generation: u64,
    cap: usize,
}

impl RoiNavigator {
    /// `cap` bounds the number of entries kept per selection (at least 1).
    pub fn new(cap: usize) -> Self {
        Self {
            selection: ActiveSelection::None,
            entries: Vec::new(),
            current_index: 0,
            generation: 0,
            cap: cap.max(1),
        }
    }

    /// Make `name` the only active group and start a new load generation.
    ///
    /// Entries of the previous selection are dropped immediately; they are
    /// replaced wholesale when the returned ticket's load is accepted.
    pub fn select_group(&mut self, name: &str) -> LoadTicket {
        self.generation += 1;
        self.selection = ActiveSelection::Single(name.to_string());
        self.entries.clear();
        self.current_index = 0;
        info!(group = name, generation = self.generation, "Selected interaction group");
        LoadTicket {
            generation: self.generation,
            group: name.to_string(),
        }
    }

    /// Deselect any group. Outstanding loads become stale.
    pub fn clear_selection(&mut self) {
        self.generation += 1;
        self.selection = ActiveSelection::None;
        self.entries.clear();
        self.current_index = 0;
        info!(generation = self.generation, "Cleared group selection");
    }

    /// Apply the result of a load. Returns `false` if the ticket is stale
    /// and the result was discarded.
    ///
    /// A failed load leaves the selection in place with an empty list.
    pub fn accept(&mut self, ticket: &LoadTicket, result: Result<Vec<RoiEntry>>) -> bool {
        if !self.is_current(ticket) {
            warn!(
                group = %ticket.group,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale ROI response"
            );
            return false;
        }

        self.current_index = 0;
        match result {
            Ok(mut entries) => {
                entries.truncate(self.cap);
                info!(group = %ticket.group, count = entries.len(), "Loaded ROI entries");
                self.entries = entries;
            }
            Err(e) => {
                warn!(group = %ticket.group, "Failed to load ROI data: {e}");
                self.entries.clear();
            }
        }
        true
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.selection.is_active(&ticket.group)
    }

    /// Step forward, wrapping to the first entry. No-op on an empty list.
    pub fn next(&mut self) -> Option<&RoiEntry> {
        if !self.entries.is_empty() {
            self.current_index = (self.current_index + 1) % self.entries.len();
        }
        self.current()
    }

    /// Step back, wrapping to the last entry. No-op on an empty list.
    pub fn prev(&mut self) -> Option<&RoiEntry> {
        let len = self.entries.len();
        if len > 0 {
            self.current_index = (self.current_index + len - 1) % len;
        }
        self.current()
    }

    pub fn current(&self) -> Option<&RoiEntry> {
        self.entries.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Jump to `index`, clamped into the list. No-op on an empty list.
    pub fn go_to(&mut self, index: usize) -> Option<&RoiEntry> {
        if !self.entries.is_empty() {
            self.current_index = index.min(self.entries.len() - 1);
        }
        self.current()
    }

    pub fn entries(&self) -> &[RoiEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

/// Identifies one outstanding heatmap load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatmapTicket {
    pub generation: u64,
    pub group: String,
    pub roi_id: String,
}

/// Interaction heatmaps of the ROI being inspected.
///
/// Each request starts a new generation; only the outcome of the latest
/// request is kept. A failed load leaves the slot empty.
#[derive(Debug, Default)]
pub struct HeatmapSlot {
    generation: u64,
    target: Option<(String, String)>,
    heatmaps: BTreeMap<String, Array2<f64>>,
}

impl HeatmapSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the slot at `roi_id` of `group` and drop the old heatmaps.
    pub fn request(&mut self, group: &str, roi_id: &str) -> HeatmapTicket {
        self.generation += 1;
        self.target = Some((group.to_string(), roi_id.to_string()));
        self.heatmaps.clear();
        debug!(group, roi = roi_id, generation = self.generation, "Requested heatmaps");
        HeatmapTicket {
            generation: self.generation,
            group: group.to_string(),
            roi_id: roi_id.to_string(),
        }
    }

    /// Forget the target. Outstanding loads become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.target = None;
        self.heatmaps.clear();
    }

    /// Apply the result of a load. Returns `false` if the ticket is stale
    /// and the result was discarded.
    pub fn accept(
        &mut self,
        ticket: &HeatmapTicket,
        result: Result<BTreeMap<String, Array2<f64>>>,
    ) -> bool {
        if !self.is_current(ticket) {
            warn!(
                group = %ticket.group,
                roi = %ticket.roi_id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale heatmap response"
            );
            return false;
        }

        match result {
            Ok(heatmaps) => {
                info!(roi = %ticket.roi_id, count = heatmaps.len(), "Loaded heatmaps");
                self.heatmaps = heatmaps;
            }
            Err(e) => {
                warn!(group = %ticket.group, roi = %ticket.roi_id, "Failed to load heatmaps: {e}");
                self.heatmaps.clear();
            }
        }
        true
    }

    pub fn is_current(&self, ticket: &HeatmapTicket) -> bool {
        ticket.generation == self.generation
            && self
                .target
                .as_ref()
                .is_some_and(|(g, r)| *g == ticket.group && *r == ticket.roi_id)
    }

    /// `(group, roi_id)` the slot currently belongs to.
    pub fn target(&self) -> Option<(&str, &str)> {
        self.target.as_ref().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    pub fn heatmaps(&self) -> &BTreeMap<String, Array2<f64>> {
        &self.heatmaps
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
