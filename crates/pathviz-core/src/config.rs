//! Rendering and sizing constants.
//!
//! Every section has a complete `Default` and deserializes with `serde(default)`, so a JSON
//! override only needs the keys it changes:
//!
//! ```json
//! { "node_sizes": { "standard": { "width": 160, "height": 60 } }, "layout": { "node_spacing": 60 } }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub node_sizes: NodeSizes,
    pub text: TextConfig,
    pub marker: MarkerConfig,
    pub edge: EdgeConfig,
    pub filter: FilterConfig,
    pub layout: LayoutConfig,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would produce degenerate geometry (non-positive sizes, fonts).
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("node_sizes.point.width", self.node_sizes.point.width),
            ("node_sizes.point.height", self.node_sizes.point.height),
            ("node_sizes.standard.width", self.node_sizes.standard.width),
            ("node_sizes.standard.height", self.node_sizes.standard.height),
            ("node_sizes.cofactor.height", self.node_sizes.cofactor.height),
            ("text.font_sizes.cofactor", self.text.font_sizes.cofactor),
            ("text.font_sizes.standard", self.text.font_sizes.standard),
            ("text.font_sizes.min", self.text.font_sizes.min),
            ("text.max_width", self.text.max_width),
            ("text.max_height", self.text.max_height),
            ("text.line_height", self.text.line_height),
            ("layout.scale_padding", self.layout.scale_padding),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{key} must be a positive number (got {value})"),
                });
            }
        }
        if self.node_sizes.cofactor.text_padding < 0.0 {
            return Err(Error::InvalidConfig {
                message: "node_sizes.cofactor.text_padding must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Fixed extent of `point` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PointSize {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 5.0,
        }
    }
}

/// Fallback extent when neither the node nor the graph's `size_config` sets one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardSize {
    pub width: f64,
    pub height: f64,
}

impl Default for StandardSize {
    fn default() -> Self {
        Self {
            width: 140.0,
            height: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CofactorSize {
    /// Fixed single-line height.
    pub height: f64,
    /// Horizontal padding applied on both sides of the measured label.
    pub text_padding: f64,
}

impl Default for CofactorSize {
    fn default() -> Self {
        Self {
            height: 20.0,
            text_padding: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizes {
    pub point: PointSize,
    pub standard: StandardSize,
    pub cofactor: CofactorSize,
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            point: PointSize::default(),
            standard: StandardSize::default(),
            cofactor: CofactorSize::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub cofactor: f64,
    pub standard: f64,
    pub min: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            cofactor: 14.0,
            standard: 16.0,
            min: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_sizes: FontSizes,
    pub max_width: f64,
    pub max_height: f64,
    /// In `em`.
    pub line_height: f64,
    /// In `em`, applied to the first line so the block is vertically centered.
    pub vertical_offset: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_sizes: FontSizes::default(),
            max_width: 120.0,
            max_height: 50.0,
            line_height: 1.2,
            vertical_offset: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub ref_x: f64,
    pub view_box: String,
    pub size: f64,
    pub path: String,
    /// Pull-back applied to the edge end for standard arrowheads.
    pub arrow_pullback: f64,
    /// Pull-back applied to the edge end for tick (`t-arrow`) markers.
    pub tick_pullback: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            ref_x: 8.0,
            view_box: "0 -5 10 10".to_string(),
            size: 6.0,
            path: "M0,-5L10,0L0,5".to_string(),
            arrow_pullback: 3.0,
            tick_pullback: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub stroke_width: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self { stroke_width: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub blur_std_deviation: f64,
    pub width: String,
    pub height: String,
    pub x: String,
    pub y: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blur_std_deviation: 2.0,
            width: "200%".to_string(),
            height: "200%".to_string(),
            x: "-50%".to_string(),
            y: "-50%".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of the viewport the fitted graph may occupy.
    pub scale_padding: f64,
    pub rectangle_corner_radius: f64,
    pub octagon_factor: f64,
    pub node_spacing: f64,
    pub root_padding: f64,
    pub group_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale_padding: 0.95,
            rectangle_corner_radius: 5.0,
            octagon_factor: 0.3,
            node_spacing: 40.0,
            root_padding: 25.0,
            group_padding: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            Config::from_json_str(r#"{"node_sizes":{"standard":{"width":160,"height":60}}}"#)
                .unwrap();
        assert_eq!(config.node_sizes.standard.width, 160.0);
        assert_eq!(config.node_sizes.point.width, 5.0);
        assert_eq!(config.marker.tick_pullback, 10.0);
        assert_eq!(config.layout.group_padding, 15.0);
    }

    #[test]
    fn single_extent_key_override_keeps_the_other() {
        let config = Config::from_json_str(r#"{"node_sizes":{"point":{"width":8}}}"#).unwrap();
        assert_eq!(config.node_sizes.point.width, 8.0);
        assert_eq!(config.node_sizes.point.height, 5.0);
        assert_eq!(config.node_sizes.standard, StandardSize::default());

        let config = Config::from_json_str(r#"{"node_sizes":{"standard":{"height":80}}}"#).unwrap();
        assert_eq!(config.node_sizes.standard.width, 140.0);
        assert_eq!(config.node_sizes.standard.height, 80.0);
    }

    #[test]
    fn non_positive_font_size_is_rejected() {
        let err = Config::from_json_str(r#"{"text":{"font_sizes":{"min":0}}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains("text.font_sizes.min"));
    }
}
