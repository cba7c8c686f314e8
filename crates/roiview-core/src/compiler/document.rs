use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{DATASET_NAME, DATASET_UID};
use crate::coordination::{validate_scopes, CoordinationSpace, Layout};
use crate::error::Result;
use crate::registry::InteractionGroup;
use crate::view::ViewState;

pub const IMAGE_FILE_TYPE: &str = "image.ome-zarr";
pub const SEGMENTATION_FILE_TYPE: &str = "obsSegmentations.json";

/// The full document handed to the rendering engine, and the body mirrored
/// to `/updateconfig`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledConfig {
    pub version: String,
    pub name: String,
    pub description: String,
    pub datasets: Vec<Dataset>,
    pub init_strategy: String,
    pub coordination_space: CoordinationSpace,
    pub layout: Layout,
}

impl CompiledConfig {
    /// Check the scope-consistency postcondition.
    pub fn validate(&self) -> Result<()> {
        validate_scopes(&self.coordination_space, &self.layout)
    }

    pub fn camera(&self) -> Option<ViewState> {
        ViewState::from_space(&self.coordination_space)
    }

    /// Data files of every overlay, in compile order.
    pub fn segmentation_files(&self) -> impl Iterator<Item = &DataFile> {
        self.datasets
            .iter()
            .flat_map(|d| d.files.iter())
            .filter(|f| f.file_type == SEGMENTATION_FILE_TYPE)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub uid: String,
    pub name: String,
    pub files: Vec<DataFile>,
}

impl Dataset {
    pub fn new(files: Vec<DataFile>) -> Self {
        Self {
            uid: DATASET_UID.to_string(),
            name: DATASET_NAME.to_string(),
            files,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub file_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination_values: Option<BTreeMap<String, String>>,
}

impl DataFile {
    pub fn image(url: &str) -> Self {
        Self {
            file_type: IMAGE_FILE_TYPE.to_string(),
            url: url.to_string(),
            coordination_values: None,
        }
    }

    pub fn segmentation(group: &InteractionGroup, url: String) -> Self {
        let mut values = BTreeMap::new();
        values.insert("obsType".to_string(), group.overlay_tag.clone());
        Self {
            file_type: SEGMENTATION_FILE_TYPE.to_string(),
            url,
            coordination_values: Some(values),
        }
    }

    pub fn obs_type(&self) -> Option<&str> {
        self.coordination_values
            .as_ref()
            .and_then(|values| values.get("obsType"))
            .map(String::as_str)
    }
}
