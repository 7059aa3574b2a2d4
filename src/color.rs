use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ClusterId;

/// Marker colour of the highlighted job.
pub const SELECTED_COLOR: Color32 = Color32::BLACK;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cluster → Color32
// ---------------------------------------------------------------------------

/// Maps every cluster of a dataset to a distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<ClusterId, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the dataset's sorted cluster ids.
    pub fn new(clusters: &BTreeSet<ClusterId>) -> Self {
        let palette = generate_palette(clusters.len());
        let mapping = clusters.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a cluster; unknown ids get grey.
    pub fn color_for(&self, cluster: &ClusterId) -> Color32 {
        self.mapping
            .get(cluster)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (cluster, colour) in cluster order.
    pub fn legend_entries(&self) -> Vec<(&ClusterId, Color32)> {
        self.mapping.iter().map(|(id, c)| (id, *c)).collect()
    }
}
