pub mod color;
pub mod compiler;
pub mod config;
pub mod consts;
pub mod coordination;
pub mod error;
pub mod heatmap;
pub mod navigation;
pub mod payload;
pub mod remote;
pub mod registry;
pub mod session;
pub mod source;
pub mod transform;
pub mod view;
