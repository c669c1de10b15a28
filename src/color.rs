use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Legend label for records whose colour column is null.
pub const NULL_LABEL: &str = "<null>";

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
// Color mapping: categorical value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of the "Color by" column to distinct colours.
/// Nulls and unknown values share a neutral grey.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Color32>,
    null_color: Color32,
}

impl ColorMap {
    /// Build a colour map for `column` from its sorted distinct values.
    pub fn new<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        let mapping = values
            .iter()
            .zip(generate_palette(values.len()))
            .map(|(v, c)| (v.to_string(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            null_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: Option<&str>) -> Color32 {
        value
            .and_then(|v| self.mapping.get(v))
            .copied()
            .unwrap_or(self.null_color)
    }

    /// Legend label for a cell value.
    pub fn label(value: Option<&str>) -> &str {
        value.unwrap_or(NULL_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_distinct() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color_map_lookup() {
        let cm = ColorMap::new("condition", ["excellent", "fair", "good"]);
        assert_eq!(cm.column, "condition");
        assert_ne!(cm.color_for(Some("good")), Color32::GRAY);
        assert_ne!(cm.color_for(Some("excellent")), Color32::GRAY);
        assert_ne!(cm.color_for(Some("good")), cm.color_for(Some("fair")));
        assert_eq!(cm.color_for(None), Color32::GRAY);
        assert_eq!(cm.color_for(Some("salvage")), Color32::GRAY);
    }

    #[test]
    fn test_null_label() {
        assert_eq!(ColorMap::label(None), NULL_LABEL);
        assert_eq!(ColorMap::label(Some("gas")), "gas");
    }
}
