//! Heatmap preparation for the overlay chart.
//!
//! Matrices arrive row-major with row 0 at the bottom of the region, while
//! the chart draws row 0 at the top, so rows are reversed before display.
//! Interaction heatmaps are then min/max normalized and square-root
//! compressed so low-magnitude cells stay visible next to the peaks:
//!
//!   normalized = sqrt((raw - min) / (max - min))
//!
//! A matrix with no value range normalizes to all zeros.

use std::collections::BTreeMap;

use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use crate::color::{Rgb, TRANSPARENT};
use crate::consts::PARALLEL_OVERLAY_THRESHOLD;
use crate::error::{Result, RoiviewError};
use crate::registry::{ChannelDefinition, HeatmapGroup};

/// Build a matrix from nested rows. All rows must have the same length.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(RoiviewError::InvalidMatrix(format!(
            "row {i} has {} columns, expected {width}",
            row.len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| RoiviewError::InvalidMatrix(e.to_string()))
}

/// Reverse row order to match the chart's top-down Y axis.
pub fn flip_rows(matrix: &Array2<f64>) -> Array2<f64> {
    matrix.slice(s![..;-1, ..]).to_owned()
}

/// Square-root normalize into `[0, 1]`. See the module docs.
pub fn normalize(matrix: &Array2<f64>) -> Array2<f64> {
    let (min, max) = matrix
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if matrix.is_empty() || max <= min || !range.is_finite() {
        return Array2::zeros(matrix.dim());
    }
    matrix.mapv(|v| {
        let t = (v - min) / range;
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0).sqrt()
        }
    })
}

/// One stop of a chart colorscale, serialized as `[position, color]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop(pub f64, pub String);

/// Ramp for interaction overlays: transparent at 0, then the group color at
/// 30%, 60% and full opacity.
pub fn interaction_colorscale(color: Rgb) -> Vec<ColorStop> {
    vec![
        ColorStop(0.0, TRANSPARENT.to_string()),
        ColorStop(0.3, color.rgba(0.3)),
        ColorStop(0.6, color.rgba(0.6)),
        ColorStop(1.0, color.rgba(1.0)),
    ]
}

/// Ramp for single-channel heatmaps, darkened toward the low end so small
/// intensities still read against the image.
pub fn channel_colorscale(color: Rgb) -> Vec<ColorStop> {
    vec![
        ColorStop(0.0, TRANSPARENT.to_string()),
        ColorStop(0.1, color.rgba_scaled(2.0, 0.4)),
        ColorStop(0.3, color.rgba_scaled(1.5, 0.6)),
        ColorStop(0.6, color.rgba_scaled(1.2, 0.8)),
        ColorStop(1.0, color.rgba(1.0)),
    ]
}

/// Ramp for channels without a definition.
pub fn fallback_colorscale() -> Vec<ColorStop> {
    vec![
        ColorStop(0.0, TRANSPARENT.to_string()),
        ColorStop(0.1, "rgba(68, 1, 84, 0.4)".to_string()),
        ColorStop(0.3, "rgba(59, 82, 139, 0.6)".to_string()),
        ColorStop(0.6, "rgba(33, 145, 140, 0.8)".to_string()),
        ColorStop(1.0, "rgba(94, 201, 98, 1)".to_string()),
    ]
}

/// Raw heatmap of one active group, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapOverlay {
    pub name: String,
    pub matrix: Array2<f64>,
    pub color: Rgb,
    pub opacity: f64,
}

/// One chart trace. Layers are drawn independently, never summed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompositeLayer {
    pub name: String,
    #[serde(serialize_with = "serialize_matrix")]
    pub z: Array2<f64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub colorscale: Vec<ColorStop>,
    pub showscale: bool,
    pub opacity: f64,
}

impl CompositeLayer {
    fn heatmap(name: &str, z: Array2<f64>, colorscale: Vec<ColorStop>, opacity: f64) -> Self {
        Self {
            name: name.to_string(),
            z,
            kind: "heatmap".to_string(),
            colorscale,
            showscale: false,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

fn serialize_matrix<S: Serializer>(matrix: &Array2<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let rows: Vec<Vec<f64>> = matrix.rows().into_iter().map(|r| r.to_vec()).collect();
    rows.serialize(serializer)
}

/// Turn each overlay into its own colored, normalized layer.
pub fn blend(overlays: &[HeatmapOverlay]) -> Vec<CompositeLayer> {
    let build = |overlay: &HeatmapOverlay| {
        CompositeLayer::heatmap(
            &overlay.name,
            normalize(&flip_rows(&overlay.matrix)),
            interaction_colorscale(overlay.color),
            overlay.opacity,
        )
    };
    if overlays.len() >= PARALLEL_OVERLAY_THRESHOLD {
        overlays.par_iter().map(build).collect()
    } else {
        overlays.iter().map(build).collect()
    }
}

/// Pick the overlays of `active` heatmap groups out of a payload.
///
/// Groups are taken in table order; groups missing from the payload are
/// skipped.
pub fn interaction_overlays(
    heatmaps: &BTreeMap<String, Array2<f64>>,
    groups: &[HeatmapGroup],
    active: &[u32],
) -> Vec<HeatmapOverlay> {
    groups
        .iter()
        .filter(|g| active.contains(&g.id))
        .filter_map(|g| {
            heatmaps.get(&g.payload_key()).map(|matrix| HeatmapOverlay {
                name: g.name.clone(),
                matrix: matrix.clone(),
                color: g.color,
                opacity: 1.0,
            })
        })
        .collect()
}

/// Per-channel intensity layers: rows reversed, values left as measured.
pub fn channel_layers(
    heatmaps: &BTreeMap<String, Array2<f64>>,
    channels: &[ChannelDefinition],
) -> Vec<CompositeLayer> {
    heatmaps
        .iter()
        .map(|(name, matrix)| {
            let colorscale = channels
                .iter()
                .find(|c| &c.name == name)
                .map_or_else(fallback_colorscale, |c| channel_colorscale(c.color));
            CompositeLayer::heatmap(name, flip_rows(matrix), colorscale, 1.0)
        })
        .collect()
}
