use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

/// A blue → red ramp over `n` steps, for ordered categories
/// (night → evening, clear → heavy rain, low → high).
pub fn cool_warm(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(230.0 - 230.0 * t, 0.65, 0.55);
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
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the category labels of one chart to colours, in label order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Distinct hues for unordered categories.
    pub fn distinct<S: AsRef<str>>(labels: &[S]) -> Self {
        Self::from_palette(labels, generate_palette(labels.len()))
    }

    /// Cool-to-warm ramp for ordered categories.
    pub fn ordered<S: AsRef<str>>(labels: &[S]) -> Self {
        Self::from_palette(labels, cool_warm(labels.len()))
    }

    fn from_palette<S: AsRef<str>>(labels: &[S], palette: Vec<Color32>) -> Self {
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(l, c)| (l.as_ref().to_string(), c))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(4).len(), 4);
        assert_eq!(cool_warm(3).len(), 3);
    }

    #[test]
    fn test_unknown_label_is_gray() {
        let cm = ColorMap::ordered(&["Low", "Medium", "High"]);
        assert_ne!(cm.color_for("Low"), cm.color_for("High"));
        assert_eq!(cm.color_for("Unclassified"), Color32::GRAY);
    }
}
