//! Parsing of remote data-service payloads.
//!
//! Payloads are parsed record by record: a malformed record is logged and
//! dropped, the rest of the batch is kept. Only a payload that is not JSON
//! at all, or whose top-level shape is wrong, is an error.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, RoiviewError};
use crate::heatmap::matrix_from_rows;
use crate::navigation::{RoiEntry, RoiPosition};

#[derive(Deserialize)]
struct TopRoisEnvelope {
    #[serde(default)]
    top_rois: Option<Value>,
}

#[derive(Deserialize)]
struct RawTopRoi {
    #[serde(default)]
    roi_id: Option<Value>,
    position: RawPosition,
    scores: RawScores,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
    #[serde(default)]
    z: Option<f64>,
}

#[derive(Deserialize)]
struct RawScores {
    combined_score: f64,
}

/// Parse a `{ top_rois: [...] }` payload for `group`.
///
/// Source order is kept; at most `cap` valid records are returned. A record
/// without a usable `roi_id` (absent, blank or `0`) takes its 1-based index.
pub fn parse_top_rois(json: &str, group: &str, cap: usize) -> Result<Vec<RoiEntry>> {
    let envelope: TopRoisEnvelope = serde_json::from_str(json)?;
    let records = match envelope.top_rois {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(RoiviewError::InvalidPayload(
                "top_rois is not an array".to_string(),
            ))
        }
    };

    let mut entries = Vec::with_capacity(records.len().min(cap));
    for (index, record) in records.into_iter().enumerate() {
        if entries.len() >= cap {
            break;
        }
        let raw: RawTopRoi = match serde_json::from_value(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(group, index, "Dropping malformed ROI record: {e}");
                continue;
            }
        };
        let id = roi_id(raw.roi_id.as_ref()).unwrap_or_else(|| (index + 1).to_string());
        let score = raw.scores.combined_score;
        entries.push(RoiEntry {
            tooltip: format!("ROI_{id} Score: {score:.3}"),
            id,
            position: RoiPosition {
                x: raw.position.x,
                y: raw.position.y,
                z: raw.position.z.unwrap_or(0.0),
            },
            score,
            source_group: group.to_string(),
        });
    }
    debug!(group, count = entries.len(), "Parsed top ROI payload");
    Ok(entries)
}

// A zero or blank id counts as missing.
fn roi_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// A region from the `/roi_shapes` collection, reduced to its centroid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiShape {
    pub id: String,
    /// Centroid X in stored coordinates.
    pub x: f64,
    /// Centroid Y, flipped against the shapes canvas height.
    pub y: f64,
    pub score: f64,
    pub interactions: Vec<String>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<RawShapeProperties>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Option<Value>,
}

#[derive(Default, Deserialize)]
struct RawShapeProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    interactions: Option<Vec<String>>,
}

type Ring = Vec<Vec<f64>>;

/// Parse a GeoJSON FeatureCollection of ROI polygons.
///
/// Features without geometry, with a geometry other than Polygon or
/// MultiPolygon, or without any usable vertex are dropped.
pub fn parse_roi_shapes(json: &str, flip_height: f64) -> Result<Vec<RoiShape>> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    let features = collection.features.unwrap_or_default();

    let shapes: Vec<RoiShape> = features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| parse_feature(index, feature, flip_height))
        .collect();
    debug!(count = shapes.len(), "Parsed ROI shapes");
    Ok(shapes)
}

fn parse_feature(index: usize, feature: Value, flip_height: f64) -> Option<RoiShape> {
    let feature: RawFeature = match serde_json::from_value(feature) {
        Ok(f) => f,
        Err(e) => {
            warn!(index, "Dropping malformed ROI feature: {e}");
            return None;
        }
    };
    let geometry = feature.geometry?;
    let coordinates = geometry.coordinates?;

    let rings: Vec<Ring> = match geometry.kind.as_str() {
        "Polygon" => serde_json::from_value(coordinates).ok()?,
        "MultiPolygon" => serde_json::from_value::<Vec<Vec<Ring>>>(coordinates)
            .ok()?
            .into_iter()
            .flatten()
            .collect(),
        other => {
            debug!(index, geometry = other, "Skipping unsupported geometry");
            return None;
        }
    };

    let (cx, cy) = centroid(&rings)?;
    let properties = feature.properties.unwrap_or_default();
    Some(RoiShape {
        id: properties
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("ROI_{index}")),
        x: cx,
        y: flip_height - cy,
        score: properties.score.unwrap_or(0.0),
        interactions: properties.interactions.unwrap_or_default(),
    })
}

/// Arithmetic mean of every vertex across all rings.
fn centroid(rings: &[Ring]) -> Option<(f64, f64)> {
    let (sx, sy, count) = rings
        .iter()
        .flatten()
        .filter(|p| p.len() >= 2)
        .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p[0], sy + p[1], n + 1));
    if count == 0 {
        return None;
    }
    Some((sx / count as f64, sy / count as f64))
}

#[derive(Deserialize)]
struct InteractionHeatmapEnvelope {
    #[serde(default)]
    heatmaps: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize)]
struct ChannelHeatmapEnvelope {
    #[serde(default)]
    channel_heatmaps: Option<BTreeMap<String, Value>>,
}

/// Parse `{ heatmaps: { "group_<n>": [[...]] } }`.
pub fn parse_interaction_heatmaps(json: &str) -> Result<BTreeMap<String, Array2<f64>>> {
    let envelope: InteractionHeatmapEnvelope = serde_json::from_str(json)?;
    Ok(parse_matrices(envelope.heatmaps.unwrap_or_default()))
}

/// Parse `{ channel_heatmaps: { "<channel>": [[...]] } }`.
pub fn parse_channel_heatmaps(json: &str) -> Result<BTreeMap<String, Array2<f64>>> {
    let envelope: ChannelHeatmapEnvelope = serde_json::from_str(json)?;
    Ok(parse_matrices(envelope.channel_heatmaps.unwrap_or_default()))
}

fn parse_matrices(raw: BTreeMap<String, Value>) -> BTreeMap<String, Array2<f64>> {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let parsed = serde_json::from_value::<Vec<Vec<f64>>>(value)
                .map_err(RoiviewError::from)
                .and_then(|rows| matrix_from_rows(&rows));
            match parsed {
                Ok(matrix) => Some((key, matrix)),
                Err(e) => {
                    warn!(key = %key, "Dropping malformed heatmap matrix: {e}");
                    None
                }
            }
        })
        .collect()
}
