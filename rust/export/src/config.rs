// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export configuration, optionally loaded from environment variables.

use massing_geometry::{SceneOptions, UpAxis};

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// File name stem for produced artifacts (`<stem>.glb`, `<stem>.json`).
    pub file_stem: String,
    /// Pretty-print the JSON document.
    pub pretty_json: bool,
    /// Emit one PBR material per program in the GLB.
    pub include_materials: bool,
    /// Visual slab ratio for GLB boxes, in (0, 1].
    pub level_height_ratio: f64,
}

impl ExportConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            file_stem: std::env::var("MASSING_EXPORT_FILE_STEM")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.file_stem),
            pretty_json: std::env::var("MASSING_EXPORT_PRETTY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.pretty_json),
            include_materials: std::env::var("MASSING_GLB_MATERIALS")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.include_materials),
            level_height_ratio: std::env::var("MASSING_LEVEL_HEIGHT_RATIO")
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|r| r.is_finite() && *r > 0.0)
                .map(|r| r.min(1.0))
                .unwrap_or(defaults.level_height_ratio),
        }
    }

    /// Scene options used for the GLB (glTF is Y-up).
    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            up: UpAxis::Y,
            level_height_ratio: self.level_height_ratio,
        }
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem, extension)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_stem: "massing-blocks".into(),
            pretty_json: true,
            include_materials: true,
            level_height_ratio: 1.0,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
