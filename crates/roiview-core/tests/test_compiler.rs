mod common;

use roiview_core::compiler::{compile, CompiledConfig, IMAGE_FILE_TYPE, SEGMENTATION_FILE_TYPE};
use roiview_core::consts::{CAMERA_SCOPE, CONFIG_SCHEMA_VERSION, IMAGE_SCOPE, META_SCOPE};
use roiview_core::coordination::{validate_scopes, CoordinationType, ScopeRef};
use roiview_core::registry::{default_channels, default_interaction_groups};
use roiview_core::view::ViewState;
use serde_json::json;

use common::{context, hosted_resolver, local_resolver, IMAGE_URL};

const B_CELL: &str = "B-cell infiltration";
const T_CELL: &str = "T-cell entry site";

fn compile_local(groups: &[&str]) -> CompiledConfig {
    let registry = default_interaction_groups();
    let resolver = local_resolver();
    compile(groups, &default_channels(), &context(&registry, &resolver))
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn test_compile_is_idempotent() {
    let a = compile_local(&[B_CELL, T_CELL]);
    let b = compile_local(&[B_CELL, T_CELL]);
    assert_eq!(a, b);
    assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
}

#[test]
fn test_compiled_json_round_trips() {
    let config = compile_local(&[B_CELL]);
    let json = config.to_json_pretty().unwrap();
    let parsed = CompiledConfig::from_json(&json).unwrap();
    assert_eq!(parsed, config);
}

// ---------------------------------------------------------------------------
// Scope consistency
// ---------------------------------------------------------------------------

#[test]
fn test_scope_consistency_image_only() {
    let config = compile_local(&[]);
    config.validate().unwrap();
}

#[test]
fn test_scope_consistency_all_groups() {
    let registry = default_interaction_groups();
    let names: Vec<&str> = registry.names().collect();
    let config = compile_local(&names);
    validate_scopes(&config.coordination_space, &config.layout).unwrap();
}

#[test]
fn test_every_meta_scope_entry_exists_in_space() {
    let config = compile_local(&[B_CELL, T_CELL]);
    let space = &config.coordination_space;
    for by_type in space.meta_scopes().values() {
        for (type_name, scopes) in by_type {
            for scope in scopes {
                assert!(
                    space.has_scope(type_name, scope),
                    "{type_name} is missing scope {scope}"
                );
            }
        }
    }
}

#[test]
fn test_validate_rejects_dangling_meta_scope() {
    let mut config = compile_local(&[B_CELL]);
    config.coordination_space.append_meta(
        META_SCOPE,
        CoordinationType::TooltipsVisible,
        "ROI_Nowhere",
    );
    assert!(config.validate().is_err());
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[test]
fn test_overlay_entries_for_active_group() {
    let config = compile_local(&[B_CELL]);
    let space = &config.coordination_space;
    let tag = "ROI_B-cell";

    assert_eq!(
        space.get(CoordinationType::SpatialSegmentationFilled, tag),
        Some(&json!(true))
    );
    assert_eq!(
        space.get_f64(CoordinationType::SpatialSegmentationStrokeWidth, tag),
        Some(16.0)
    );
    assert_eq!(space.get_f64(CoordinationType::SpatialLayerOpacity, tag), Some(0.5));
    assert_eq!(
        space.get(CoordinationType::SpatialLayerVisible, tag),
        Some(&json!(true))
    );
    assert_eq!(space.get(CoordinationType::TooltipsVisible, tag), Some(&json!(true)));
    assert_eq!(
        space.get(CoordinationType::SpatialChannelColor, tag),
        Some(&json!([255, 180, 180]))
    );

    for ctype in CoordinationType::OVERLAY_TYPES {
        assert!(
            space.meta_scope(META_SCOPE, ctype).iter().any(|s| s == tag),
            "{ctype} meta list lacks {tag}"
        );
    }
}

#[test]
fn test_duplicate_group_appends_once() {
    let config = compile_local(&[B_CELL, B_CELL]);
    let filled = config
        .coordination_space
        .meta_scope(META_SCOPE, CoordinationType::SpatialSegmentationFilled);
    assert_eq!(filled, ["ROI_B-cell".to_string()]);
    assert_eq!(config.segmentation_files().count(), 1);
}

#[test]
fn test_unknown_groups_are_skipped() {
    let config = compile_local(&["Nonexistent group", T_CELL]);
    let filled = config
        .coordination_space
        .meta_scope(META_SCOPE, CoordinationType::SpatialSegmentationFilled);
    assert_eq!(filled, ["ROI_T-cell".to_string()]);
    assert_eq!(config.name, "BioMedVis Challenge - T-cell entry site");
}

#[test]
fn test_only_unknown_groups_yields_image_only() {
    let unknown = compile_local(&["Nope"]);
    let empty = compile_local(&[]);
    assert_eq!(unknown, empty);
}

#[test]
fn test_image_only_document() {
    let config = compile_local(&[]);
    assert_eq!(config.version, CONFIG_SCHEMA_VERSION);
    assert_eq!(config.name, "BioMedVis Challenge - Image Only");
    assert_eq!(
        config.description,
        "Dynamic config with selected interaction types: None"
    );
    assert_eq!(config.segmentation_files().count(), 0);

    let files = &config.datasets[0].files;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_type, IMAGE_FILE_TYPE);
    assert_eq!(files[0].url, IMAGE_URL);

    let space = &config.coordination_space;
    assert!(space
        .meta_scope(META_SCOPE, CoordinationType::SpatialSegmentationFilled)
        .is_empty());
    assert_eq!(
        space.meta_scope(META_SCOPE, CoordinationType::ImageLayer),
        [IMAGE_SCOPE.to_string()]
    );
}

#[test]
fn test_overlay_order_follows_input_order() {
    let config = compile_local(&[T_CELL, B_CELL]);
    let tags = config
        .coordination_space
        .meta_scope(META_SCOPE, CoordinationType::TooltipsVisible)
        .to_vec();
    assert_eq!(tags, vec!["ROI_T-cell".to_string(), "ROI_B-cell".to_string()]);
    let obs: Vec<&str> = config
        .segmentation_files()
        .filter_map(|f| f.obs_type())
        .collect();
    assert_eq!(obs, vec!["ROI_T-cell", "ROI_B-cell"]);
}

// ---------------------------------------------------------------------------
// Channels and camera
// ---------------------------------------------------------------------------

#[test]
fn test_channel_entries() {
    let config = compile_local(&[]);
    let space = &config.coordination_space;
    assert_eq!(
        space.get(CoordinationType::SpatialChannelColor, "CD31"),
        Some(&json!([0, 255, 0]))
    );
    assert_eq!(space.get_f64(CoordinationType::SpatialTargetC, "CD31"), Some(19.0));
    assert_eq!(
        space.get(CoordinationType::SpatialChannelWindow, "CD31"),
        Some(&json!([300.0, 20000.0]))
    );

    let binding = &space.meta_scopes_by()[META_SCOPE]["imageLayer"]["imageChannel"][IMAGE_SCOPE];
    let channels: Vec<String> = default_channels().into_iter().map(|c| c.name).collect();
    assert_eq!(binding, &ScopeRef::Many(channels));
}

#[test]
fn test_default_camera() {
    let config = compile_local(&[B_CELL]);
    assert_eq!(config.camera(), Some(ViewState::new(5454.0, 2600.0, -3.0)));
    assert_eq!(
        config
            .coordination_space
            .get_f64(CoordinationType::SpatialTargetX, CAMERA_SCOPE),
        Some(5454.0)
    );
}

#[test]
fn test_layout_panels() {
    let config = compile_local(&[B_CELL]);
    let components: Vec<&str> = config.layout.iter().map(|p| p.component.as_str()).collect();
    assert_eq!(components, vec!["spatialBeta", "layerControllerBeta"]);

    let spatial = &config.layout[0];
    assert_eq!((spatial.x, spatial.y, spatial.w, spatial.h), (2, 0, 10, 12));
    assert_eq!(
        spatial.coordination_scopes.get("spatialZoom"),
        Some(&ScopeRef::one(CAMERA_SCOPE))
    );
}

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

#[test]
fn test_local_segmentation_url() {
    let config = compile_local(&[B_CELL]);
    let file = config.segmentation_files().next().unwrap();
    assert_eq!(file.file_type, SEGMENTATION_FILE_TYPE);
    assert_eq!(
        file.url,
        "http://localhost:5000/api/roi_segmentation_B-cell_infiltration.json?v=42"
    );
}

#[test]
fn test_hosted_segmentation_url() {
    let registry = default_interaction_groups();
    let resolver = hosted_resolver();
    let config = compile(&[B_CELL], &default_channels(), &context(&registry, &resolver));
    let file = config.segmentation_files().next().unwrap();
    assert_eq!(file.url, "./data/roi_segmentation_B-cell_infiltration.json");
}

#[test]
fn test_environment_only_changes_urls() {
    let registry = default_interaction_groups();
    let local = local_resolver();
    let hosted = hosted_resolver();
    let a = compile(&[B_CELL], &default_channels(), &context(&registry, &local));
    let b = compile(&[B_CELL], &default_channels(), &context(&registry, &hosted));
    assert_eq!(a.coordination_space, b.coordination_space);
    assert_eq!(a.layout, b.layout);
    assert_ne!(a.datasets, b.datasets);
}
