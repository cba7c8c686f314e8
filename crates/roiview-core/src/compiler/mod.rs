//! Compile semantic intents (active groups, channels, data source) into a
//! coordination space and layout for the rendering engine.
//!
//! Compilation is a pure function of its inputs: no ambient state is read,
//! and identical inputs produce identical documents. Unknown group names are
//! skipped, and with no resolvable groups the result is an image-only
//! document.

mod document;

pub use document::{CompiledConfig, DataFile, Dataset, IMAGE_FILE_TYPE, SEGMENTATION_FILE_TYPE};

use serde_json::json;
use tracing::debug;

use crate::consts::{
    CAMERA_SCOPE, CONFIG_SCHEMA_VERSION, DATASET_UID, DEFAULT_CHANNEL_OPACITY,
    DEFAULT_PHOTOMETRIC_INTERPRETATION, DEFAULT_RENDERING_MODE, DEFAULT_TARGET_RESOLUTION,
    DOCUMENT_TITLE, IMAGE_CHANNEL_PLACEHOLDER, IMAGE_SCOPE, META_SCOPE,
};
use crate::coordination::{build_layout, CoordinationSpace, CoordinationType, ScopeRef};
use crate::registry::{ChannelDefinition, GroupRegistry, InteractionGroup};
use crate::source::{resolve_data_url, DataSourceResolver};
use crate::view::ViewState;

/// Everything compilation needs besides the per-call intents.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub groups: &'a GroupRegistry,
    pub resolver: &'a dyn DataSourceResolver,
    pub image_url: &'a str,
    /// Camera of a freshly compiled document.
    pub default_view: ViewState,
}

/// Compile the active groups and channels into a full document.
///
/// Groups are applied in the order given; repeats and unknown names are
/// dropped. Overlay tags are appended to each meta-scope list at most once.
pub fn compile<S: AsRef<str>>(
    active_groups: &[S],
    channels: &[ChannelDefinition],
    ctx: &CompileContext<'_>,
) -> CompiledConfig {
    let groups = resolve_groups(active_groups, ctx.groups);

    let mut space = base_space(channels, ctx.default_view);
    let mut files = vec![DataFile::image(ctx.image_url)];
    for group in &groups {
        add_overlay(&mut space, group);
        files.push(DataFile::segmentation(
            group,
            resolve_data_url(group, ctx.resolver),
        ));
    }

    let layout = build_layout(&space, META_SCOPE);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    debug!(
        groups = ?names,
        channels = channels.len(),
        environment = %ctx.resolver.environment(),
        "Compiled coordination space"
    );

    CompiledConfig {
        version: CONFIG_SCHEMA_VERSION.to_string(),
        name: document_name(&names),
        description: document_description(&names),
        datasets: vec![Dataset::new(files)],
        init_strategy: "auto".to_string(),
        coordination_space: space,
        layout,
    }
}

fn resolve_groups<'r, S: AsRef<str>>(
    active_groups: &[S],
    registry: &'r GroupRegistry,
) -> Vec<&'r InteractionGroup> {
    let mut resolved: Vec<&InteractionGroup> = Vec::with_capacity(active_groups.len());
    for name in active_groups {
        let name = name.as_ref();
        match registry.get(name) {
            Some(group) if resolved.iter().any(|g| g.name == group.name) => {
                debug!(group = name, "Group listed twice, ignoring repeat");
            }
            Some(group) => resolved.push(group),
            None => debug!(group = name, "Skipping unknown interaction group"),
        }
    }
    resolved
}

/// Image layer, camera and channel entries shared by every document.
fn base_space(channels: &[ChannelDefinition], view: ViewState) -> CoordinationSpace {
    use CoordinationType::*;

    let mut space = CoordinationSpace::new();

    space.set(CoordinationType::Dataset, CAMERA_SCOPE, DATASET_UID);
    space.set(ImageLayer, IMAGE_SCOPE, IMAGE_SCOPE);
    space.set(SpatialChannelOpacity, IMAGE_SCOPE, DEFAULT_CHANNEL_OPACITY);
    space.set(SpatialLayerOpacity, IMAGE_SCOPE, 1.0);
    space.set(SpatialLayerVisible, IMAGE_SCOPE, true);
    space.set(SpatialRenderingMode, IMAGE_SCOPE, DEFAULT_RENDERING_MODE);
    space.set(SpatialTargetZ, CAMERA_SCOPE, 0);
    space.set(SpatialTargetResolution, IMAGE_SCOPE, DEFAULT_TARGET_RESOLUTION);
    space.set(SpatialTargetT, IMAGE_SCOPE, 0);
    space.set(
        PhotometricInterpretation,
        IMAGE_SCOPE,
        DEFAULT_PHOTOMETRIC_INTERPRETATION,
    );
    view.write_to(&mut space);

    for ctype in [
        ImageChannel,
        SpatialChannelColor,
        SpatialChannelVisible,
        SpatialChannelWindow,
        SpatialTargetC,
        SpatialSegmentationFilled,
        SpatialSegmentationStrokeWidth,
        TooltipsVisible,
    ] {
        space.declare(ctype);
    }

    for ctype in [
        ImageLayer,
        SpatialChannelVisible,
        SpatialChannelOpacity,
        SpatialChannelColor,
        SpatialLayerOpacity,
        SpatialLayerVisible,
        SpatialSegmentationFilled,
        SpatialSegmentationStrokeWidth,
        TooltipsVisible,
    ] {
        space.declare_meta(META_SCOPE, ctype);
    }
    for ctype in [ImageLayer, SpatialLayerOpacity, SpatialLayerVisible] {
        space.append_meta(META_SCOPE, ctype, IMAGE_SCOPE);
    }

    let mut channel_names: Vec<&str> = Vec::with_capacity(channels.len());
    for channel in channels {
        let name = channel.name.as_str();
        space.set(ImageChannel, name, IMAGE_CHANNEL_PLACEHOLDER);
        space.set(SpatialChannelColor, name, json!(channel.color));
        space.set(SpatialChannelOpacity, name, DEFAULT_CHANNEL_OPACITY);
        space.set(SpatialChannelVisible, name, true);
        space.set(SpatialChannelWindow, name, json!(channel.window));
        space.set(SpatialTargetC, name, channel.target_channel_index);

        for ctype in [SpatialChannelVisible, SpatialChannelOpacity, SpatialChannelColor] {
            space.append_meta(META_SCOPE, ctype, name);
        }
        if !channel_names.contains(&name) {
            channel_names.push(name);
        }
    }

    space.bind_meta(
        META_SCOPE,
        ImageLayer,
        ImageChannel,
        IMAGE_SCOPE,
        ScopeRef::many(channel_names.iter().copied()),
    );
    for child in [
        SpatialLayerVisible,
        SpatialLayerOpacity,
        SpatialRenderingMode,
        SpatialTargetResolution,
        SpatialTargetT,
        PhotometricInterpretation,
    ] {
        space.bind_meta(META_SCOPE, ImageLayer, child, IMAGE_SCOPE, ScopeRef::one(IMAGE_SCOPE));
    }
    for child in CoordinationType::CHANNEL_TYPES {
        space.declare_binding(META_SCOPE, ImageChannel, child);
        for name in &channel_names {
            space.bind_meta(META_SCOPE, ImageChannel, child, name, ScopeRef::one(*name));
        }
    }

    space
}

/// Overlay entries for one resolved group.
fn add_overlay(space: &mut CoordinationSpace, group: &InteractionGroup) {
    use CoordinationType::*;

    let tag = group.overlay_tag.as_str();
    // Filled polygons stay visible at low zoom; outlines alone vanish.
    space.set(SpatialSegmentationFilled, tag, true);
    space.set(SpatialSegmentationStrokeWidth, tag, group.stroke_width);
    space.set(SpatialLayerOpacity, tag, group.default_opacity);
    space.set(SpatialLayerVisible, tag, true);
    space.set(TooltipsVisible, tag, true);
    space.set(SpatialChannelColor, tag, json!(group.color));

    for ctype in CoordinationType::OVERLAY_TYPES {
        space.append_meta(META_SCOPE, ctype, tag);
    }
}

fn document_name(groups: &[&str]) -> String {
    if groups.is_empty() {
        format!("{DOCUMENT_TITLE} - Image Only")
    } else {
        format!("{DOCUMENT_TITLE} - {}", groups.join(", "))
    }
}

fn document_description(groups: &[&str]) -> String {
    let listed = if groups.is_empty() {
        "None".to_string()
    } else {
        groups.join(", ")
    };
    format!("Dynamic config with selected interaction types: {listed}")
}
