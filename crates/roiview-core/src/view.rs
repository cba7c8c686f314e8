//! Camera state carried across coordination-space regenerations.
//!
//! Only the three camera fields ever cross a regeneration. The order is
//! fixed: snapshot the previous space, compile the next one, [`preserve`]
//! the snapshot into it, then [`apply_override`] any explicit "set view".

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    CAMERA_SCOPE, DEFAULT_CAMERA_TARGET_X, DEFAULT_CAMERA_TARGET_Y, DEFAULT_CAMERA_ZOOM,
};
use crate::coordination::{CoordinationSpace, CoordinationType};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub target_x: f64,
    pub target_y: f64,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            target_x: DEFAULT_CAMERA_TARGET_X,
            target_y: DEFAULT_CAMERA_TARGET_Y,
            zoom: DEFAULT_CAMERA_ZOOM,
        }
    }
}

impl ViewState {
    pub fn new(target_x: f64, target_y: f64, zoom: f64) -> Self {
        Self {
            target_x,
            target_y,
            zoom,
        }
    }

    /// Read the camera from `space`. `None` unless all three fields are set.
    pub fn from_space(space: &CoordinationSpace) -> Option<Self> {
        Some(Self {
            target_x: space.get_f64(CoordinationType::SpatialTargetX, CAMERA_SCOPE)?,
            target_y: space.get_f64(CoordinationType::SpatialTargetY, CAMERA_SCOPE)?,
            zoom: space.get_f64(CoordinationType::SpatialZoom, CAMERA_SCOPE)?,
        })
    }

    /// Write the camera into `space`, leaving every other entry alone.
    pub fn write_to(&self, space: &mut CoordinationSpace) {
        space.set(CoordinationType::SpatialTargetX, CAMERA_SCOPE, self.target_x);
        space.set(CoordinationType::SpatialTargetY, CAMERA_SCOPE, self.target_y);
        space.set(CoordinationType::SpatialZoom, CAMERA_SCOPE, self.zoom);
    }
}

/// Carry the camera of `previous` over into `next`.
///
/// `next` is returned unchanged when there is no previous space or it has
/// no complete camera.
pub fn preserve(previous: Option<&CoordinationSpace>, mut next: CoordinationSpace) -> CoordinationSpace {
    if let Some(view) = previous.and_then(ViewState::from_space) {
        debug!(?view, "Preserving camera across regeneration");
        view.write_to(&mut next);
    }
    next
}

/// Final merge step: an explicit camera wins over both the preserved
/// snapshot and the compiled defaults.
pub fn apply_override(mut space: CoordinationSpace, view: Option<ViewState>) -> CoordinationSpace {
    if let Some(view) = view {
        debug!(?view, "Applying camera override");
        view.write_to(&mut space);
    }
    space
}
