use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use roiview_core::color::Rgb;
use roiview_core::heatmap::{
    blend, channel_colorscale, channel_layers, fallback_colorscale, flip_rows,
    interaction_colorscale, interaction_overlays, matrix_from_rows, normalize, ColorStop,
    HeatmapOverlay,
};
use roiview_core::registry::{default_channels, default_heatmap_groups};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_sqrt_scaling() {
    let n = normalize(&array![[0.0, 10.0], [5.0, 10.0]]);
    assert_abs_diff_eq!(n[[0, 0]], 0.0);
    assert_abs_diff_eq!(n[[0, 1]], 1.0);
    assert_abs_diff_eq!(n[[1, 0]], 0.5f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(n[[1, 1]], 1.0);
}

#[test]
fn test_normalize_constant_matrix_is_zero() {
    let n = normalize(&Array2::from_elem((3, 4), 7.0));
    assert_eq!(n, Array2::<f64>::zeros((3, 4)));
}

#[test]
fn test_normalize_empty_matrix() {
    let n = normalize(&Array2::<f64>::zeros((0, 0)));
    assert!(n.is_empty());
}

#[test]
fn test_normalize_range_is_unit_interval() {
    let n = normalize(&array![[-3.0, 1.0, 4.0], [1.0, 5.0, 9.0]]);
    assert!(n.iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert_abs_diff_eq!(n.iter().cloned().fold(f64::MIN, f64::max), 1.0);
}

// ---------------------------------------------------------------------------
// Shape handling
// ---------------------------------------------------------------------------

#[test]
fn test_flip_rows_reverses_rows_only() {
    let m = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    assert_eq!(flip_rows(&m), array![[5.0, 6.0], [3.0, 4.0], [1.0, 2.0]]);
}

#[test]
fn test_matrix_from_rows() {
    let m = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(m, array![[1.0, 2.0], [3.0, 4.0]]);
}

#[test]
fn test_matrix_from_ragged_rows_fails() {
    assert!(matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
}

// ---------------------------------------------------------------------------
// Colorscales
// ---------------------------------------------------------------------------

#[test]
fn test_interaction_colorscale() {
    let scale = interaction_colorscale(Rgb::from_hex("#e41a1c").unwrap());
    assert_eq!(
        scale,
        vec![
            ColorStop(0.0, "rgba(0, 0, 0, 0)".to_string()),
            ColorStop(0.3, "rgba(228, 26, 28, 0.3)".to_string()),
            ColorStop(0.6, "rgba(228, 26, 28, 0.6)".to_string()),
            ColorStop(1.0, "rgba(228, 26, 28, 1)".to_string()),
        ]
    );
}

#[test]
fn test_channel_colorscale_darkens_low_end() {
    let scale = channel_colorscale(Rgb::new(0, 255, 0));
    assert_eq!(scale.len(), 5);
    assert_eq!(scale[1].1, "rgba(0, 127.5, 0, 0.4)");
    assert_eq!(scale[4].1, "rgba(0, 255, 0, 1)");
}

#[test]
fn test_fallback_colorscale_positions() {
    let positions: Vec<f64> = fallback_colorscale().iter().map(|s| s.0).collect();
    assert_eq!(positions, vec![0.0, 0.1, 0.3, 0.6, 1.0]);
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

fn overlay(name: &str, matrix: Array2<f64>) -> HeatmapOverlay {
    HeatmapOverlay {
        name: name.to_string(),
        matrix,
        color: Rgb::new(55, 126, 184),
        opacity: 1.0,
    }
}

#[test]
fn test_blend_flips_then_normalizes() {
    let layers = blend(&[overlay("g", array![[0.0, 10.0], [5.0, 10.0]])]);
    assert_eq!(layers.len(), 1);
    let z = &layers[0].z;
    // Source row 1 is drawn first.
    assert_abs_diff_eq!(z[[0, 0]], 0.5f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(z[[1, 0]], 0.0);
    assert_eq!(layers[0].kind, "heatmap");
    assert!(!layers[0].showscale);
}

#[test]
fn test_blend_keeps_layers_separate_and_ordered() {
    let overlays: Vec<HeatmapOverlay> = (0..6)
        .map(|i| overlay(&format!("g{i}"), array![[0.0, i as f64 + 1.0]]))
        .collect();
    let layers = blend(&overlays);
    let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["g0", "g1", "g2", "g3", "g4", "g5"]);
    for layer in &layers {
        assert_abs_diff_eq!(layer.z[[0, 1]], 1.0);
    }
}

#[test]
fn test_blend_clamps_opacity() {
    let mut o = overlay("g", array![[1.0]]);
    o.opacity = 3.0;
    assert_abs_diff_eq!(blend(&[o])[0].opacity, 1.0);
}

#[test]
fn test_layer_serializes_for_chart() {
    let layers = blend(&[overlay("g", array![[0.0, 1.0]])]);
    let json = serde_json::to_value(&layers[0]).unwrap();
    assert_eq!(json["type"], "heatmap");
    assert_eq!(json["z"], serde_json::json!([[0.0, 1.0]]));
    assert_eq!(json["colorscale"][0], serde_json::json!([0.0, "rgba(0, 0, 0, 0)"]));
}

#[test]
fn test_interaction_overlays_selects_active_groups() {
    let mut heatmaps = BTreeMap::new();
    heatmaps.insert("group_1".to_string(), array![[1.0]]);
    heatmaps.insert("group_3".to_string(), array![[2.0]]);

    let groups = default_heatmap_groups();
    let picked = interaction_overlays(&heatmaps, &groups, &[1, 2, 3]);
    let colors: Vec<String> = picked.iter().map(|o| o.color.to_hex()).collect();
    assert_eq!(colors, vec!["#e41a1c", "#4daf4a"]);

    assert!(interaction_overlays(&heatmaps, &groups, &[]).is_empty());
}

#[test]
fn test_channel_layers_flip_without_normalizing() {
    let mut heatmaps = BTreeMap::new();
    heatmaps.insert("CD31".to_string(), array![[1.0, 2.0], [30.0, 40.0]]);
    heatmaps.insert("Mystery".to_string(), array![[5.0]]);

    let layers = channel_layers(&heatmaps, &default_channels());
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].name, "CD31");
    assert_eq!(layers[0].z, array![[30.0, 40.0], [1.0, 2.0]]);
    assert_eq!(layers[0].colorscale, channel_colorscale(Rgb::new(0, 255, 0)));
    assert_eq!(layers[1].colorscale, fallback_colorscale());
}
