//! Mapping from stored ROI positions to camera coordinates.
//!
//! Stored positions are in a physical unit with the origin at the opposite
//! vertical edge from the viewer's camera origin, so the mapping scales both
//! axes and flips Y against the full canvas height:
//!
//!   x_view = x * scale
//!   y_view = canvas_height - y * scale
//!
//! The scale and height are tuned to one dataset's coordinate frame and are
//! treated as configuration, not derived.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_ROI_SCALE, DEFAULT_SET_VIEW_ZOOM};
use crate::navigation::RoiEntry;
use crate::view::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Physical-to-pixel scale factor.
    pub scale: f64,
    /// Full image height in camera pixels.
    pub canvas_height: f64,
    /// Zoom used to frame a single ROI.
    pub set_view_zoom: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale: DEFAULT_ROI_SCALE,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            set_view_zoom: DEFAULT_SET_VIEW_ZOOM,
        }
    }
}

/// A point in camera (viewport) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateTransform {
    params: TransformParams,
}

impl CoordinateTransform {
    pub fn new(params: TransformParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    pub fn to_viewport(&self, roi: &RoiEntry) -> ViewportPoint {
        self.point_to_viewport(roi.position.x, roi.position.y)
    }

    pub fn point_to_viewport(&self, x: f64, y: f64) -> ViewportPoint {
        ViewportPoint {
            x: x * self.params.scale,
            y: self.params.canvas_height - y * self.params.scale,
        }
    }

    /// Camera override for a "set view" on `roi`.
    pub fn set_view(&self, roi: &RoiEntry) -> ViewState {
        let target = self.to_viewport(roi);
        ViewState {
            target_x: target.x,
            target_y: target.y,
            zoom: self.params.set_view_zoom,
        }
    }
}
