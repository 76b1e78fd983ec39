//! Colour palettes for the light and dark dashboard themes

use factory_common::Theme;
use factory_config::GraphConfig;
use plotters::style::RGBColor;
use serde::Serialize;

/// Resolved colours and fonts for one theme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    pub theme: Theme,
    pub background: String,
    pub text: String,
    pub grid: String,
    pub title: String,
    pub line: String,
    pub bar: String,
    pub production_time: String,
    pub reject: String,
    /// Second series of two-line charts
    pub secondary: String,
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub show_grid: bool,
}

impl Palette {
    /// Palette for `theme` with the series colours of `graph`
    pub fn new(graph: &GraphConfig, theme: Theme) -> Self {
        let (background, text, grid) = match theme {
            Theme::Light => ("#ffffff", "#333333", "#dddddd"),
            Theme::Dark => ("#343a40", "#ffffff", "#555b61"),
        };

        Self {
            theme,
            background: background.to_string(),
            text: text.to_string(),
            grid: grid.to_string(),
            title: graph.title_color.clone(),
            line: graph.line_color.clone(),
            bar: graph.bar_color.clone(),
            production_time: graph.production_time_color.clone(),
            reject: graph.reject_color.clone(),
            secondary: graph.reject_color.clone(),
            font_family: graph.font_family.clone(),
            title_font_size: graph.title_font_size,
            label_font_size: graph.label_font_size,
            show_grid: graph.show_grid,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(&GraphConfig::default(), Theme::default())
    }
}

/// Parse a `#rrggbb` colour, falling back to black
pub fn parse_color(color: &str) -> RGBColor {
    let channel = |hex: &str, at: usize| {
        hex.get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| Some(RGBColor(channel(hex, 0)?, channel(hex, 2)?, channel(hex, 4)?)))
        .unwrap_or(RGBColor(0, 0, 0))
}
