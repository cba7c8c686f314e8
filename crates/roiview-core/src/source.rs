//! Where remote data lives.
//!
//! Execution context (a local data service vs. static hosting) affects the
//! generated URLs and nothing else. It is chosen once at startup by building
//! one [`DataSourceResolver`] and handing it to the compiler and the loaders.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::registry::InteractionGroup;

/// Execution context the resolver was selected for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// A data service reachable over HTTP, typically on localhost.
    #[default]
    Local,
    /// Static files served next to the application.
    Hosted,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Hosted => write!(f, "hosted"),
        }
    }
}

/// Maps logical data references to URLs for one execution context.
pub trait DataSourceResolver: Send + Sync {
    fn environment(&self) -> Environment;

    /// Segmentation polygons for an interaction group, consumed by the
    /// rendering engine by reference.
    fn segmentation_url(&self, group: &InteractionGroup) -> String;

    /// Top-ranked ROI list for a group display name.
    fn top_rois_url(&self, group_name: &str) -> String;

    fn roi_shapes_url(&self) -> String;

    /// Precomputed interaction heatmaps for one ROI of a group.
    fn heatmaps_url(&self, group_name: &str, roi_id: &str) -> String;

    /// Endpoint compiled configs are mirrored to, if any.
    fn update_config_url(&self) -> Option<String>;
}

/// Resolve the segmentation URL of `group`. This is the only place the
/// compiler's output depends on the execution context.
pub fn resolve_data_url(group: &InteractionGroup, resolver: &dyn DataSourceResolver) -> String {
    resolver.segmentation_url(group)
}

/// Group display name with every whitespace run replaced by `_`.
pub fn group_slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Data service reachable over HTTP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalService {
    base_url: String,
    api_prefix: String,
    cache_token: Option<String>,
}

impl LocalService {
    /// Build a resolver with a cache-busting token derived from the current
    /// time. The token is fixed for the resolver's lifetime.
    pub fn new(base_url: &str, api_prefix: &str) -> Self {
        let token = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().to_string())
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: normalize_prefix(api_prefix),
            cache_token: Some(token),
        }
    }

    pub fn with_cache_token(mut self, token: Option<&str>) -> Self {
        self.cache_token = token.map(str::to_string);
        self
    }

    pub fn cache_token(&self) -> Option<&str> {
        self.cache_token.as_deref()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, self.api_prefix, path)
    }
}

impl DataSourceResolver for LocalService {
    fn environment(&self) -> Environment {
        Environment::Local
    }

    fn segmentation_url(&self, group: &InteractionGroup) -> String {
        let url = self.endpoint(&group.data_file);
        match &self.cache_token {
            Some(token) => format!("{url}?v={token}"),
            None => url,
        }
    }

    fn top_rois_url(&self, group_name: &str) -> String {
        self.endpoint(&format!("top5_roi_{}.json", group_slug(group_name)))
    }

    fn roi_shapes_url(&self) -> String {
        self.endpoint("roi_shapes")
    }

    fn heatmaps_url(&self, group_name: &str, roi_id: &str) -> String {
        self.endpoint(&format!(
            "interaction_heatmaps_{}_{}.json",
            group_slug(group_name),
            roi_id
        ))
    }

    fn update_config_url(&self) -> Option<String> {
        Some(self.endpoint("updateconfig"))
    }
}

/// Files served statically relative to the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticHosted {
    base_path: String,
}

impl StaticHosted {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    fn path(&self, file: &str) -> String {
        format!("{}/{}", self.base_path, file)
    }
}

impl DataSourceResolver for StaticHosted {
    fn environment(&self) -> Environment {
        Environment::Hosted
    }

    fn segmentation_url(&self, group: &InteractionGroup) -> String {
        self.path(&group.data_file)
    }

    fn top_rois_url(&self, group_name: &str) -> String {
        self.path(&format!("top5_roi_{}.json", group_slug(group_name)))
    }

    fn roi_shapes_url(&self) -> String {
        self.path("roi_shapes.json")
    }

    fn heatmaps_url(&self, group_name: &str, roi_id: &str) -> String {
        self.path(&format!(
            "interaction_heatmaps_{}_{}.json",
            group_slug(group_name),
            roi_id
        ))
    }

    fn update_config_url(&self) -> Option<String> {
        None
    }
}

/// Build the resolver for the configured environment.
pub fn resolver_for(config: &AppConfig) -> Box<dyn DataSourceResolver> {
    match config.environment {
        Environment::Local => Box::new(LocalService::new(
            &config.service_base_url,
            &config.api_prefix,
        )),
        Environment::Hosted => Box::new(StaticHosted::new(&config.static_base_path)),
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
