use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// One overlay category with its own segmentation file and styling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionGroup {
    /// Human-readable name, unique within a registry.
    pub name: String,
    /// File name of the segmentation polygons served by the data service.
    pub data_file: String,
    /// Observation type the rendering engine uses to tell overlays apart.
    pub overlay_tag: String,
    pub color: Rgb,
    pub stroke_width: f64,
    /// Layer opacity in `[0, 1]`.
    pub default_opacity: f64,
}

impl InteractionGroup {
    pub fn new(name: &str, data_file: &str, overlay_tag: &str, color: Rgb) -> Self {
        Self {
            name: name.to_string(),
            data_file: data_file.to_string(),
            overlay_tag: overlay_tag.to_string(),
            color,
            stroke_width: 16.0,
            default_opacity: 0.5,
        }
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_default_opacity(mut self, opacity: f64) -> Self {
        self.default_opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Lookup table of interaction groups, keyed by display name.
///
/// Insertion order is kept so listings match the order groups were defined.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupRegistry {
    groups: Vec<InteractionGroup>,
}

impl GroupRegistry {
    pub fn new(groups: Vec<InteractionGroup>) -> Self {
        let mut registry = Self::default();
        for group in groups {
            registry.insert(group);
        }
        registry
    }

    /// Insert a group, replacing any existing group with the same name.
    pub fn insert(&mut self, group: InteractionGroup) {
        match self.groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InteractionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionGroup> {
        self.groups.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn default_interaction_groups() -> GroupRegistry {
    GroupRegistry::new(vec![
        InteractionGroup::new(
            "B-cell infiltration",
            "roi_segmentation_B-cell_infiltration.json",
            "ROI_B-cell",
            Rgb::new(255, 180, 180),
        ),
        InteractionGroup::new(
            "Inflammatory zone",
            "roi_segmentation_Inflammatory_zone.json",
            "ROI_Inflammatory",
            Rgb::new(180, 255, 180),
        ),
        InteractionGroup::new(
            "T-cell entry site",
            "roi_segmentation_T-cell_entry_site.json",
            "ROI_T-cell",
            Rgb::new(180, 180, 255),
        ),
        InteractionGroup::new(
            "Oxidative stress niche",
            "roi_segmentation_Oxidative_stress_niche.json",
            "ROI_Oxidative",
            Rgb::new(255, 255, 180),
        ),
    ])
}

/// A group of the interaction-heatmap chart. Heatmap payloads address it
/// as `group_<id>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGroup {
    pub id: u32,
    pub name: String,
    pub color: Rgb,
}

impl HeatmapGroup {
    pub fn payload_key(&self) -> String {
        format!("group_{}", self.id)
    }
}

pub fn default_heatmap_groups() -> Vec<HeatmapGroup> {
    let group = |id, name: &str, color| HeatmapGroup {
        id,
        name: name.to_string(),
        color,
    };
    vec![
        group(1, "Endothelial-immune interface", Rgb::new(0xe4, 0x1a, 0x1c)),
        group(2, "ROS detox, immune stress", Rgb::new(0x37, 0x7e, 0xb8)),
        group(3, "T/B cell recruitment", Rgb::new(0x4d, 0xaf, 0x4a)),
        group(4, "T-B collaboration", Rgb::new(0x98, 0x4e, 0xa3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_same_name() {
        let mut registry = default_interaction_groups();
        let before = registry.len();
        registry.insert(
            InteractionGroup::new("Inflammatory zone", "x.json", "ROI_X", Rgb::new(1, 2, 3))
                .with_stroke_width(4.0),
        );
        assert_eq!(registry.len(), before);
        let group = registry.get("Inflammatory zone").unwrap();
        assert_eq!(group.overlay_tag, "ROI_X");
        assert_eq!(group.stroke_width, 4.0);
    }

    #[test]
    fn opacity_is_clamped() {
        let g = InteractionGroup::new("g", "g.json", "ROI_g", Rgb::new(0, 0, 0))
            .with_default_opacity(1.7);
        assert_eq!(g.default_opacity, 1.0);
    }
}
