/// Physical-to-pixel scale applied to stored ROI positions.
pub const DEFAULT_ROI_SCALE: f64 = 8.0;

/// Full pixel height of the image in the camera coordinate frame.
/// Stored ROI positions are Y-flipped against this height.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 5508.0;

/// Zoom used when framing a single ROI with "set view".
pub const DEFAULT_SET_VIEW_ZOOM: f64 = -1.0;

/// Default camera target X for a freshly compiled configuration.
pub const DEFAULT_CAMERA_TARGET_X: f64 = 5454.0;

/// Default camera target Y for a freshly compiled configuration.
pub const DEFAULT_CAMERA_TARGET_Y: f64 = 2600.0;

/// Default camera zoom for a freshly compiled configuration.
pub const DEFAULT_CAMERA_ZOOM: f64 = -3.0;

/// Height used to flip centroids computed from `/roi_shapes` polygons.
pub const DEFAULT_SHAPES_CANVAS_HEIGHT: f64 = 688.0;

/// Maximum number of ROI entries kept per group selection.
pub const DEFAULT_TOP_ROI_CAP: usize = 4;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:5000";

pub const DEFAULT_API_PREFIX: &str = "/api";

pub const DEFAULT_STATIC_BASE_PATH: &str = "./data";

pub const DEFAULT_IMAGE_URL: &str =
    "https://lsp-public-data.s3.amazonaws.com/biomedvis-challenge-2025/Dataset1-LSP13626-melanoma-in-situ/0";

/// Schema version stamped on every compiled document.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.16";

pub const DATASET_UID: &str = "bv";

pub const DATASET_NAME: &str = "Blood Vessel";

pub const DOCUMENT_TITLE: &str = "BioMedVis Challenge";

/// Scope identifier of the background image layer.
pub const IMAGE_SCOPE: &str = "image";

/// Scope identifier shared by the camera coordination entries.
pub const CAMERA_SCOPE: &str = "A";

/// Name of the single meta-scope binding every panel together.
pub const META_SCOPE: &str = "metaA";

/// Placeholder value the rendering engine expects for image channel scopes.
pub const IMAGE_CHANNEL_PLACEHOLDER: &str = "__dummy__";

pub const DEFAULT_CHANNEL_OPACITY: f64 = 1.0;

pub const DEFAULT_TARGET_RESOLUTION: u32 = 3;

pub const DEFAULT_RENDERING_MODE: &str = "3D";

pub const DEFAULT_PHOTOMETRIC_INTERPRETATION: &str = "BlackIsZero";

/// Minimum overlay count to normalize heatmap layers with Rayon.
pub const PARALLEL_OVERLAY_THRESHOLD: usize = 4;

/// Thread name used for background ROI loads.
pub const LOADER_THREAD_NAME: &str = "roiview-loader";

/// Thread name used for background heatmap loads.
pub const HEATMAP_THREAD_NAME: &str = "roiview-heatmaps";

/// Thread name used for fire-and-forget config mirroring.
pub const MIRROR_THREAD_NAME: &str = "roiview-mirror";
