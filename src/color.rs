use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Model colours: candidate name → Color32
// ---------------------------------------------------------------------------

/// Stable colour per candidate model, used by the score chart and tables.
#[derive(Debug, Clone, Default)]
pub struct ModelColors {
    mapping: BTreeMap<String, Color32>,
}

impl ModelColors {
    /// Assign colours to `names` in order.
    pub fn new<'a>(names: impl ExactSizeIterator<Item = &'a str>) -> Self {
        let palette = generate_palette(names.len());
        let mapping = names
            .zip(palette)
            .map(|(name, color)| (name.to_string(), color))
            .collect();
        Self { mapping }
    }

    /// Colour of a model; grey for names this map has not seen.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_model_gets_its_own_colour() {
        let colors = ModelColors::new(["Logistic Regression", "Random Forest"].into_iter());
        assert_ne!(
            colors.color_for("Logistic Regression"),
            colors.color_for("Random Forest")
        );
        assert_eq!(colors.color_for("Unknown"), Color32::GRAY);
    }
}
