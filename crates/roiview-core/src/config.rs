use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_API_PREFIX, DEFAULT_IMAGE_URL, DEFAULT_SERVICE_BASE_URL,
    DEFAULT_SHAPES_CANVAS_HEIGHT, DEFAULT_STATIC_BASE_PATH, DEFAULT_TOP_ROI_CAP,
};
use crate::error::Result;
use crate::source::Environment;
use crate::transform::TransformParams;
use crate::view::ViewState;

/// Application settings, loaded from TOML. Every field has a default so a
/// partial file (or none at all) is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,
    pub service_base_url: String,
    pub api_prefix: String,
    pub static_base_path: String,
    /// OME-Zarr image passed through to the rendering engine.
    pub image_url: String,
    /// Maximum ROI entries kept per group selection.
    pub top_roi_cap: usize,
    /// Height used to flip `/roi_shapes` centroids.
    pub shapes_canvas_height: f64,
    /// POST every compiled config to the data service (local mode only).
    pub mirror_config: bool,
    pub transform: TransformParams,
    /// Camera of a freshly compiled configuration.
    pub camera: ViewState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            static_base_path: DEFAULT_STATIC_BASE_PATH.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            top_roi_cap: DEFAULT_TOP_ROI_CAP,
            shapes_canvas_height: DEFAULT_SHAPES_CANVAS_HEIGHT,
            mirror_config: true,
            transform: TransformParams::default(),
            camera: ViewState::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Mirroring only happens where there is a service to mirror to.
    pub fn mirrors_config(&self) -> bool {
        self.mirror_config && self.environment == Environment::Local
    }
}
