//! Layout and hit-testing configuration.
//!
//! All values are in canvas units. The defaults reproduce the spacing the
//! catalogue editor has always used; a config file only needs the fields it
//! wants to change.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spacing used by the automatic row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between module centres in a row
    pub column_spacing: i32,
    /// Vertical distance between rows
    pub row_spacing: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 160,
            row_spacing: 80,
        }
    }
}

/// Geometry used for hit testing in an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorGeometry {
    pub module_width: i32,
    pub module_height: i32,
    /// Maximum distance from an edge's line that still selects it
    pub edge_hit_threshold: f64,
    /// Slack around an edge's extent within which a point may project onto it
    pub edge_hit_margin: i32,
}

impl Default for EditorGeometry {
    fn default() -> Self {
        Self {
            module_width: 120,
            module_height: 40,
            edge_hit_threshold: 6.0,
            edge_hit_margin: 10,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathwayConfig {
    pub layout: LayoutConfig,
    pub editor: EditorGeometry,
}

impl PathwayConfig {
    /// Check that every spacing and size is usable.
    pub fn validate(&self) -> Result<()> {
        if self.layout.column_spacing <= 0 || self.layout.row_spacing <= 0 {
            return Err(Error::InvalidConfig(format!(
                "layout spacing must be positive (column {}, row {})",
                self.layout.column_spacing, self.layout.row_spacing
            )));
        }
        if self.editor.module_width <= 0 || self.editor.module_height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "module size must be positive ({}x{})",
                self.editor.module_width, self.editor.module_height
            )));
        }
        let threshold = self.editor.edge_hit_threshold;
        if threshold.is_nan() || threshold <= 0.0 || self.editor.edge_hit_margin < 0 {
            return Err(Error::InvalidConfig(
                "edge hit threshold must be positive and margin non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PathwayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PathwayConfig =
            serde_json::from_str(r#"{ "layout": { "row_spacing": 100 } }"#).unwrap();
        assert_eq!(config.layout.row_spacing, 100);
        assert_eq!(config.layout.column_spacing, 160);
        assert_eq!(config.editor, EditorGeometry::default());
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let mut config = PathwayConfig::default();
        config.layout.column_spacing = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
