mod common;

use roiview_core::compiler::compile;
use roiview_core::consts::CAMERA_SCOPE;
use roiview_core::coordination::{CoordinationSpace, CoordinationType};
use roiview_core::registry::{default_channels, default_interaction_groups};
use roiview_core::view::{apply_override, preserve, ViewState};

use common::{context, local_resolver};

fn compiled_space(groups: &[&str]) -> CoordinationSpace {
    let registry = default_interaction_groups();
    let resolver = local_resolver();
    compile(groups, &default_channels(), &context(&registry, &resolver)).coordination_space
}

fn moved_space() -> CoordinationSpace {
    let mut space = compiled_space(&[]);
    ViewState::new(1200.0, 3400.0, -1.5).write_to(&mut space);
    space
}

#[test]
fn test_from_space_requires_all_fields() {
    let mut space = CoordinationSpace::new();
    assert_eq!(ViewState::from_space(&space), None);
    space.set(CoordinationType::SpatialTargetX, CAMERA_SCOPE, 1.0);
    space.set(CoordinationType::SpatialTargetY, CAMERA_SCOPE, 2.0);
    assert_eq!(ViewState::from_space(&space), None);
    space.set(CoordinationType::SpatialZoom, CAMERA_SCOPE, -2.0);
    assert_eq!(
        ViewState::from_space(&space),
        Some(ViewState::new(1.0, 2.0, -2.0))
    );
}

#[test]
fn test_preserve_carries_camera() {
    let previous = moved_space();
    let next = preserve(Some(&previous), compiled_space(&["B-cell infiltration"]));
    assert_eq!(
        ViewState::from_space(&next),
        Some(ViewState::new(1200.0, 3400.0, -1.5))
    );
}

#[test]
fn test_preserve_replaces_default_camera() {
    let mut previous = compiled_space(&[]);
    ViewState::new(100.0, 200.0, -2.0).write_to(&mut previous);
    let next = compiled_space(&["B-cell infiltration"]);
    assert_eq!(ViewState::from_space(&next), Some(ViewState::new(5454.0, 2600.0, -3.0)));

    let merged = preserve(Some(&previous), next);
    assert_eq!(
        ViewState::from_space(&merged),
        Some(ViewState::new(100.0, 200.0, -2.0))
    );
}

#[test]
fn test_preserve_without_previous_keeps_defaults() {
    let next = preserve(None, compiled_space(&[]));
    assert_eq!(ViewState::from_space(&next), Some(ViewState::default()));
}

#[test]
fn test_preserve_ignores_incomplete_camera() {
    let mut previous = CoordinationSpace::new();
    previous.set(CoordinationType::SpatialTargetX, CAMERA_SCOPE, 99.0);
    let next = preserve(Some(&previous), compiled_space(&[]));
    assert_eq!(ViewState::from_space(&next), Some(ViewState::default()));
}

#[test]
fn test_preserve_touches_only_camera() {
    let previous = moved_space();
    let fresh = compiled_space(&["T-cell entry site"]);
    let mut expected = fresh.clone();
    ViewState::new(1200.0, 3400.0, -1.5).write_to(&mut expected);

    let next = preserve(Some(&previous), fresh);
    assert_eq!(next, expected);
}

#[test]
fn test_override_wins_over_preserved() {
    let previous = moved_space();
    let target = ViewState::new(800.0, 5108.0, -1.0);
    let next = apply_override(
        preserve(Some(&previous), compiled_space(&[])),
        Some(target),
    );
    assert_eq!(ViewState::from_space(&next), Some(target));
}

#[test]
fn test_no_override_is_identity() {
    let space = moved_space();
    assert_eq!(apply_override(space.clone(), None), space);
}
