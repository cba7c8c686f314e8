/// Coordination-type names understood by the rendering engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoordinationType {
    Dataset,
    ImageLayer,
    ImageChannel,
    SpatialChannelColor,
    SpatialChannelOpacity,
    SpatialChannelVisible,
    SpatialChannelWindow,
    SpatialTargetC,
    SpatialLayerOpacity,
    SpatialLayerVisible,
    SpatialRenderingMode,
    SpatialTargetX,
    SpatialTargetY,
    SpatialTargetZ,
    SpatialZoom,
    SpatialTargetResolution,
    SpatialTargetT,
    PhotometricInterpretation,
    SpatialSegmentationFilled,
    SpatialSegmentationStrokeWidth,
    TooltipsVisible,
}

impl CoordinationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::ImageLayer => "imageLayer",
            Self::ImageChannel => "imageChannel",
            Self::SpatialChannelColor => "spatialChannelColor",
            Self::SpatialChannelOpacity => "spatialChannelOpacity",
            Self::SpatialChannelVisible => "spatialChannelVisible",
            Self::SpatialChannelWindow => "spatialChannelWindow",
            Self::SpatialTargetC => "spatialTargetC",
            Self::SpatialLayerOpacity => "spatialLayerOpacity",
            Self::SpatialLayerVisible => "spatialLayerVisible",
            Self::SpatialRenderingMode => "spatialRenderingMode",
            Self::SpatialTargetX => "spatialTargetX",
            Self::SpatialTargetY => "spatialTargetY",
            Self::SpatialTargetZ => "spatialTargetZ",
            Self::SpatialZoom => "spatialZoom",
            Self::SpatialTargetResolution => "spatialTargetResolution",
            Self::SpatialTargetT => "spatialTargetT",
            Self::PhotometricInterpretation => "photometricInterpretation",
            Self::SpatialSegmentationFilled => "spatialSegmentationFilled",
            Self::SpatialSegmentationStrokeWidth => "spatialSegmentationStrokeWidth",
            Self::TooltipsVisible => "tooltipsVisible",
        }
    }

    /// Per-channel coordination types bound under the image layer.
    pub const CHANNEL_TYPES: [Self; 5] = [
        Self::SpatialTargetC,
        Self::SpatialChannelColor,
        Self::SpatialChannelVisible,
        Self::SpatialChannelOpacity,
        Self::SpatialChannelWindow,
    ];

    /// Types every active overlay group contributes an entry to.
    pub const OVERLAY_TYPES: [Self; 6] = [
        Self::SpatialSegmentationFilled,
        Self::SpatialSegmentationStrokeWidth,
        Self::SpatialLayerOpacity,
        Self::SpatialLayerVisible,
        Self::TooltipsVisible,
        Self::SpatialChannelColor,
    ];

    /// The three camera fields carried across regenerations.
    pub const CAMERA_TYPES: [Self; 3] = [Self::SpatialTargetX, Self::SpatialTargetY, Self::SpatialZoom];
}

impl std::fmt::Display for CoordinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
