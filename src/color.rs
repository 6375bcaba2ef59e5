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
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
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
// Chart colours
// ---------------------------------------------------------------------------

/// Colours for the series drawn by the chart panel.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    /// Line, markers and scatter points.
    pub primary: Color32,
    /// Histogram bars.
    pub bars: Color32,
    /// KDE curve over the histogram.
    pub density: Color32,
}

impl Default for ChartColors {
    fn default() -> Self {
        let palette = generate_palette(3);
        ChartColors {
            primary: palette[0],
            bars: palette[0].gamma_multiply(0.6),
            density: palette[2],
        }
    }
}
