// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Size;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placement: PlacementConfig,
    pub mindmap: MindmapConfig,
    pub slides: SlideConfig,
}

/// Where new content lands relative to the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Vertical gap between the selection's bottom edge and inserted content.
    pub gap: f64,
    pub text_block: Size,
    pub embed: Size,
    pub image: Size,
    /// Horizontal spacing between images inserted side by side.
    pub image_spacing: f64,
    /// Offset from the document origin used when there is nothing to anchor to.
    pub origin_margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 20.0,
            text_block: Size::new(800.0, 95.0),
            embed: Size::new(400.0, 200.0),
            image: Size::new(400.0, 400.0),
            image_spacing: 20.0,
            origin_margin: 20.0,
        }
    }
}

/// Metrics for fit-sizing and laying out mind-map nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_node: Size,
    pub max_node_width: f64,
    /// Horizontal distance between a parent and its children column.
    pub h_gap: f64,
    /// Vertical distance between sibling branches.
    pub v_gap: f64,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 22.0,
            padding_x: 16.0,
            padding_y: 10.0,
            min_node: Size::new(60.0, 32.0),
            max_node_width: 320.0,
            h_gap: 60.0,
            v_gap: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub size: Size,
    pub gap: f64,
    pub title_height: f64,
    pub image: Size,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            size: Size::new(960.0, 540.0),
            gap: 40.0,
            title_height: 64.0,
            image: Size::new(280.0, 180.0),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config json in {path:?}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Json { path: path.to_owned(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("placement.text_block", self.placement.text_block),
            ("placement.embed", self.placement.embed),
            ("placement.image", self.placement.image),
            ("mindmap.min_node", self.mindmap.min_node),
            ("slides.size", self.slides.size),
            ("slides.image", self.slides.image),
        ];
        for (field, size) in sizes {
            if !(size.w > 0.0 && size.h > 0.0) {
                return Err(ConfigError::Invalid { field, reason: "size must be positive" });
            }
        }

        let gaps = [
            ("placement.gap", self.placement.gap),
            ("placement.image_spacing", self.placement.image_spacing),
            ("placement.origin_margin", self.placement.origin_margin),
            ("mindmap.h_gap", self.mindmap.h_gap),
            ("mindmap.v_gap", self.mindmap.v_gap),
            ("slides.gap", self.slides.gap),
        ];
        for (field, gap) in gaps {
            if !(gap >= 0.0) {
                return Err(ConfigError::Invalid { field, reason: "must be non-negative" });
            }
        }

        if !(self.mindmap.char_width > 0.0 && self.mindmap.line_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "mindmap",
                reason: "char_width and line_height must be positive",
            });
        }
        if self.mindmap.max_node_width < self.mindmap.min_node.w {
            return Err(ConfigError::Invalid {
                field: "mindmap.max_node_width",
                reason: "must not be smaller than min_node.w",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use crate::model::Size;

    #[test]
    fn defaults_match_documented_placement() {
        let config = EngineConfig::default();
        assert_eq!(config.placement.gap, 20.0);
        assert_eq!(config.placement.text_block, Size::new(800.0, 95.0));
        assert_eq!(config.placement.embed, Size::new(400.0, 200.0));
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "placement": { "gap": 32 } }"#).expect("config");
        assert_eq!(config.placement.gap, 32.0);
        assert_eq!(config.placement.text_block, Size::new(800.0, 95.0));
        assert_eq!(config.mindmap, EngineConfig::default().mindmap);
    }

    #[test]
    fn negative_gap_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "mindmap": { "v_gap": -1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "mindmap.v_gap", .. }));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("here.json"));
    }
}
