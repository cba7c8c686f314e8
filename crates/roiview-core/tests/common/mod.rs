#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use ndarray::Array2;
use roiview_core::compiler::CompileContext;
use roiview_core::error::{Result, RoiviewError};
use roiview_core::navigation::{RoiEntry, RoiPosition};
use roiview_core::payload::RoiShape;
use roiview_core::registry::GroupRegistry;
use roiview_core::remote::RoiSource;
use roiview_core::source::{LocalService, StaticHosted};
use roiview_core::view::ViewState;

pub const IMAGE_URL: &str = "https://example.org/image.ome.zarr";

/// Local resolver with a fixed cache token so compiled URLs are stable.
pub fn local_resolver() -> LocalService {
    LocalService::new("http://localhost:5000", "/api").with_cache_token(Some("42"))
}

pub fn hosted_resolver() -> StaticHosted {
    StaticHosted::new("./data")
}

pub fn context<'a>(
    groups: &'a GroupRegistry,
    resolver: &'a dyn roiview_core::source::DataSourceResolver,
) -> CompileContext<'a> {
    CompileContext {
        groups,
        resolver,
        image_url: IMAGE_URL,
        default_view: ViewState::default(),
    }
}

pub fn roi(id: &str, x: f64, y: f64, score: f64, group: &str) -> RoiEntry {
    RoiEntry {
        id: id.to_string(),
        position: RoiPosition { x, y, z: 0.0 },
        score,
        source_group: group.to_string(),
        tooltip: format!("ROI_{id} Score: {score:.3}"),
    }
}

/// Three ROIs for `group`, ids "1".."3".
pub fn three_rois(group: &str) -> Vec<RoiEntry> {
    vec![
        roi("1", 100.0, 50.0, 0.9, group),
        roi("2", 200.0, 150.0, 0.8, group),
        roi("3", 300.0, 250.0, 0.7, group),
    ]
}

pub type Heatmaps = BTreeMap<String, Array2<f64>>;

/// In-memory [`RoiSource`] serving canned ROI lists and heatmaps.
#[derive(Default)]
pub struct FakeSource {
    rois: BTreeMap<String, Vec<RoiEntry>>,
    heatmaps: BTreeMap<(String, String), Heatmaps>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_group(mut self, group: &str, entries: Vec<RoiEntry>) -> Self {
        self.rois.insert(group.to_string(), entries);
        self
    }

    pub fn with_heatmaps(mut self, group: &str, roi_id: &str, heatmaps: Heatmaps) -> Self {
        self.heatmaps
            .insert((group.to_string(), roi_id.to_string()), heatmaps);
        self
    }
}

/// A single `group_1` heatmap filled with `value`.
pub fn heatmaps(value: f64) -> Heatmaps {
    BTreeMap::from([("group_1".to_string(), Array2::from_elem((2, 2), value))])
}

impl RoiSource for FakeSource {
    fn fetch_top_rois(&self, group: &str, cap: usize) -> Result<Vec<RoiEntry>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(group.to_string());
        }
        match self.rois.get(group) {
            Some(entries) => Ok(entries.iter().take(cap).cloned().collect()),
            None => Err(RoiviewError::Http(format!("404 for {group}"))),
        }
    }

    fn fetch_roi_shapes(&self) -> Result<Vec<RoiShape>> {
        Ok(Vec::new())
    }

    fn fetch_interaction_heatmaps(&self, group: &str, roi_id: &str) -> Result<Heatmaps> {
        self.heatmaps
            .get(&(group.to_string(), roi_id.to_string()))
            .cloned()
            .ok_or_else(|| RoiviewError::Http(format!("404 for {group}/{roi_id}")))
    }
}

/// A source whose every fetch panics.
pub struct PanickingSource;

impl RoiSource for PanickingSource {
    fn fetch_top_rois(&self, group: &str, _cap: usize) -> Result<Vec<RoiEntry>> {
        panic!("top ROIs for {group} exploded");
    }

    fn fetch_roi_shapes(&self) -> Result<Vec<RoiShape>> {
        panic!("shapes exploded");
    }

    fn fetch_interaction_heatmaps(&self, group: &str, _roi_id: &str) -> Result<Heatmaps> {
        panic!("heatmaps for {group} exploded");
    }
}

pub const TOP_ROIS_JSON: &str = r#"{
  "top_rois": [
    { "roi_id": 7, "position": { "x": 100.0, "y": 50.0 }, "scores": { "combined_score": 0.91234 } },
    { "roi_id": "12", "position": { "x": 10.0, "y": 20.0, "z": 3.0 }, "scores": { "combined_score": 0.5 } },
    { "position": { "x": 1.0, "y": 2.0 }, "scores": { "combined_score": 0.25 } },
    { "roi_id": 99, "position": { "x": "bad" }, "scores": {} },
    { "roi_id": 5, "position": { "x": 4.0, "y": 5.0 }, "scores": { "combined_score": 0.1 } }
  ]
}"#;

pub const ROI_SHAPES_JSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]] },
      "properties": { "name": "ROI_A", "score": 0.8, "interactions": ["B-cell infiltration"] }
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [[[[0, 0], [2, 0], [2, 2]]], [[[4, 4], [6, 4], [6, 6]]]]
      },
      "properties": { "score": 0.3 }
    },
    { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1, 1] }, "properties": {} },
    { "type": "Feature", "geometry": null, "properties": { "name": "empty" } }
  ]
}"#;
