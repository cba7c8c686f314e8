use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// One imaging channel of the background image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    /// Marker name; doubles as the channel's scope identifier.
    pub name: String,
    pub color: Rgb,
    /// Intensity window `[low, high]`.
    pub window: [f64; 2],
    /// Index of the source channel inside the multi-channel image.
    pub target_channel_index: u32,
}

impl ChannelDefinition {
    pub fn new(name: &str, color: Rgb, window: [f64; 2], target_channel_index: u32) -> Self {
        Self {
            name: name.to_string(),
            color,
            window,
            target_channel_index,
        }
    }
}

/// The five marker channels shown over the melanoma-in-situ image.
pub fn default_channels() -> Vec<ChannelDefinition> {
    vec![
        ChannelDefinition::new("CD31", Rgb::new(0, 255, 0), [300.0, 20000.0], 19),
        ChannelDefinition::new("CD20", Rgb::new(255, 255, 0), [1000.0, 7000.0], 27),
        ChannelDefinition::new("CD11b", Rgb::new(255, 0, 255), [700.0, 6000.0], 37),
        ChannelDefinition::new("CD4", Rgb::new(0, 255, 255), [1638.0, 10000.0], 25),
        ChannelDefinition::new("CD11c", Rgb::new(128, 0, 128), [370.0, 1432.0], 42),
    ]
}
