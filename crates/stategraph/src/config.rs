//! Configuration types for Stategraph layout and output.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field has a default, so a partial document (or
//! none at all) yields a usable configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and output settings.
//! - [`LayoutConfig`] - Spacing constants used by the layout engine.
//! - [`OutputConfig`] - Controls how the layout graph is serialized.
//!
//! # Example
//!
//! ```
//! # use stategraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().vertical_spacing(), 100.0);
//! assert!(config.output().pretty());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, output: OutputConfig) -> Self {
        Self { layout, output }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Spacing constants of the layout, in layout units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between a state and its successor below it.
    vertical_spacing: f32,

    /// Horizontal distance between neighbouring branch or choice slots.
    branch_spacing: f32,

    /// Horizontal offset of the error side lane from the throwing state.
    error_lane_offset: f32,

    /// Minimum horizontal distance between two nodes on the same row.
    min_node_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_spacing: 100.0,
            branch_spacing: 220.0,
            error_lane_offset: 220.0,
            min_node_gap: 180.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(
        vertical_spacing: f32,
        branch_spacing: f32,
        error_lane_offset: f32,
        min_node_gap: f32,
    ) -> Self {
        Self {
            vertical_spacing,
            branch_spacing,
            error_lane_offset,
            min_node_gap,
        }
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn branch_spacing(&self) -> f32 {
        self.branch_spacing
    }

    pub fn error_lane_offset(&self) -> f32 {
        self.error_lane_offset
    }

    pub fn min_node_gap(&self) -> f32 {
        self.min_node_gap
    }
}

/// Serialization options for the layout graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit indented JSON.
    pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl OutputConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns whether JSON output is indented.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_partial_layout_section_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"layout": {"vertical_spacing": 80}}"#).unwrap();

        assert_approx_eq!(f32, config.layout().vertical_spacing(), 80.0);
        assert_approx_eq!(f32, config.layout().branch_spacing(), 220.0);
        assert_approx_eq!(f32, config.layout().error_lane_offset(), 220.0);
        assert_approx_eq!(f32, config.layout().min_node_gap(), 180.0);
        assert!(config.output().pretty());
    }

    #[test]
    fn test_output_section() {
        let config: AppConfig = serde_json::from_str(r#"{"output": {"pretty": false}}"#).unwrap();
        assert!(!config.output().pretty());
        assert_eq!(config.layout(), &LayoutConfig::default());
    }
}
