//! Configuration for graphic generation

use serde::{Deserialize, Serialize};

/// Brand colours applied to every generated graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandPalette {
    /// Main brand blue
    pub primary: String,
    /// Lighter blue
    pub secondary: String,
    /// Dark blue
    pub dark: String,
    /// Highlight colour
    pub accent: String,
    /// Text and axis grey
    pub neutral: String,
}

impl BrandPalette {
    /// Colours cycled through for pie slices and series
    pub fn series(&self) -> [&str; 5] {
        [
            self.primary.as_str(),
            self.secondary.as_str(),
            self.dark.as_str(),
            self.accent.as_str(),
            self.neutral.as_str(),
        ]
    }
}

impl Default for BrandPalette {
    fn default() -> Self {
        Self {
            primary: "#0077B5".to_string(),
            secondary: "#00A0DC".to_string(),
            dark: "#005582".to_string(),
            accent: "#FF6B35".to_string(),
            neutral: "#666666".to_string(),
        }
    }
}

/// Configuration for the graphics router and chart renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Brand palette
    pub palette: BrandPalette,

    /// Rendered chart width in pixels (12in at 150dpi)
    pub chart_width_px: u32,

    /// Rendered chart height in pixels (6.75in at 150dpi)
    pub chart_height_px: u32,

    /// Token budget for the chart-spec completion
    pub chart_max_tokens: u32,

    /// Requested clip length
    pub video_duration_secs: u32,

    /// Delay between video operation polls
    pub video_poll_interval_secs: u64,

    /// Polls before a video is declared timed out
    pub video_max_polls: u32,

    /// Renderings produced by a variations request
    pub variation_count: usize,
}

impl GraphicsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chart_width_px < 200 || self.chart_height_px < 200 {
            return Err("chart dimensions must be at least 200px".to_string());
        }
        if self.chart_max_tokens == 0 {
            return Err("chart_max_tokens must be greater than 0".to_string());
        }
        if self.video_duration_secs == 0 {
            return Err("video_duration_secs must be greater than 0".to_string());
        }
        if self.video_max_polls == 0 {
            return Err("video_max_polls must be greater than 0".to_string());
        }
        if self.variation_count == 0 {
            return Err("variation_count must be greater than 0".to_string());
        }
        for colour in self.palette.series() {
            if !is_hex_colour(colour) {
                return Err(format!("invalid palette colour: {}", colour));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

fn is_hex_colour(value: &str) -> bool {
    value.len() == 7 && value.starts_with('#') && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            palette: BrandPalette::default(),
            chart_width_px: 1800,
            chart_height_px: 1012,
            chart_max_tokens: 2000,
            video_duration_secs: 8,
            video_poll_interval_secs: 10,
            video_max_polls: 30,
            variation_count: 3,
        }
    }
}
