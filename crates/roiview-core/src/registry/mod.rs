//! Static tables describing the imaging channels and interaction groups.
//!
//! Both registries are plain data, built once at startup and never mutated.

pub mod channel;
pub mod group;

pub use channel::{default_channels, ChannelDefinition};
pub use group::{
    default_heatmap_groups, default_interaction_groups, GroupRegistry, HeatmapGroup,
    InteractionGroup,
};
