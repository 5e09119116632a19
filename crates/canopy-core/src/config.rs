// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Presentation settings, stored as RON.

use crate::backend::{GraphicsApiKind, WindowSystemKind};
use crate::platform::WindowDescriptor;
use crate::renderer::api::ClearColor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or saving a [`PresentationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The text is not a valid configuration.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration could not be written out.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
}

/// Which backends to use and what to open with them.
///
/// Every field is optional in the RON source and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// The window system to drive.
    pub window_system: WindowSystemKind,
    /// The graphics API to drive.
    pub graphics_api: GraphicsApiKind,
    /// The main window.
    pub window: WindowDescriptor,
    /// Whether the main swapchain waits for vertical blank.
    pub vsync: bool,
    /// Background color of each frame.
    pub clear_color: ClearColor,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            window_system: WindowSystemKind::Headless,
            graphics_api: GraphicsApiKind::Headless,
            window: WindowDescriptor::default(),
            vsync: true,
            clear_color: ClearColor::BLACK,
        }
    }
}

impl PresentationConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Reads and parses a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&source)?;
        log::info!("Loaded presentation configuration from {}.", path.display());
        Ok(config)
    }
}
