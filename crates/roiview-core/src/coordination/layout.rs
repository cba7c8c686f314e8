use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::space::{CoordinationSpace, ScopeRef};
use super::types::CoordinationType;
use crate::consts::{CAMERA_SCOPE, IMAGE_SCOPE};

/// Panel key referencing meta-scope lists.
pub const META_KEY: &str = "metaCoordinationScopes";

/// Panel key referencing meta-scope bindings.
pub const META_BY_KEY: &str = "metaCoordinationScopesBy";

/// One view of the rendering engine and the scopes it is bound to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub component: String,
    pub coordination_scopes: BTreeMap<String, ScopeRef>,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

pub type Layout = Vec<Panel>;

struct PanelSlot {
    component: &'static str,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

const PANEL_SLOTS: [PanelSlot; 2] = [
    PanelSlot {
        component: "spatialBeta",
        x: 2,
        y: 0,
        w: 10,
        h: 12,
    },
    PanelSlot {
        component: "layerControllerBeta",
        x: 0,
        y: 0,
        w: 2,
        h: 8,
    },
];

/// Derive the layout from a coordination space.
///
/// This is a pure projection: every scope a panel references is read back
/// from `space`, so the layout cannot drift from the space it describes.
pub fn build_layout(space: &CoordinationSpace, meta: &str) -> Layout {
    let scopes = panel_scopes(space, meta);
    PANEL_SLOTS
        .iter()
        .map(|slot| Panel {
            component: slot.component.to_string(),
            coordination_scopes: scopes.clone(),
            x: slot.x,
            y: slot.y,
            w: slot.w,
            h: slot.h,
        })
        .collect()
}

fn panel_scopes(space: &CoordinationSpace, meta: &str) -> BTreeMap<String, ScopeRef> {
    use CoordinationType::*;

    let mut scopes = BTreeMap::new();
    scopes.insert(META_KEY.to_string(), ScopeRef::many([meta]));
    scopes.insert(META_BY_KEY.to_string(), ScopeRef::many([meta]));

    for ctype in [SpatialTargetX, SpatialTargetY, SpatialTargetZ, SpatialZoom] {
        scopes.insert(ctype.as_str().to_string(), ScopeRef::one(CAMERA_SCOPE));
    }
    for ctype in [SpatialTargetResolution, SpatialTargetT, SpatialRenderingMode] {
        scopes.insert(ctype.as_str().to_string(), ScopeRef::one(IMAGE_SCOPE));
    }

    // Channel panels list marker channels only, in registry order.
    let channels = space.meta_scope(meta, SpatialChannelVisible).to_vec();
    scopes.insert(
        SpatialChannelVisible.as_str().to_string(),
        ScopeRef::Many(channels.clone()),
    );
    scopes.insert(SpatialChannelColor.as_str().to_string(), ScopeRef::Many(channels));

    for ctype in [
        SpatialChannelOpacity,
        SpatialLayerOpacity,
        SpatialLayerVisible,
        SpatialSegmentationFilled,
        SpatialSegmentationStrokeWidth,
        TooltipsVisible,
    ] {
        scopes.insert(ctype.as_str().to_string(), ScopeRef::Many(space.scopes(ctype)));
    }

    scopes
}
