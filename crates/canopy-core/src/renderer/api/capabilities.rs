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

//! Capability negotiation.
//!
//! A context reports what it supports once, at creation. Client code is expected to
//! branch on these values before issuing a call; there is no runtime fallback, and
//! using a feature the context lacks is reported as
//! [`CanopyError::UnsupportedFeature`].

use crate::error::CanopyError;
use std::fmt;

/// Feature flags and numeric limits of a graphics context.
///
/// This struct is versionless: new fields may be added, existing ones never change
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsCapabilities {
    /// Compute shader stages can be created.
    pub compute_shaders: bool,
    /// Tessellation shader stages can be created.
    pub tessellation: bool,
    /// Geometry shader stages can be created.
    pub geometry_shaders: bool,
    /// Largest supported texture dimension, in texels.
    pub max_texture_size: u32,
    /// Largest number of vertex attributes a pipeline may declare.
    pub max_vertex_attributes: u32,
}

impl GraphicsCapabilities {
    /// The floor every backend must meet: vertex + fragment only, 16 attributes.
    pub const BASELINE: Self = Self {
        compute_shaders: false,
        tessellation: false,
        geometry_shaders: false,
        max_texture_size: 2048,
        max_vertex_attributes: 16,
    };

    /// Returns `true` if the feature is available.
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::ComputeShaders => self.compute_shaders,
            Feature::Tessellation => self.tessellation,
            Feature::GeometryShaders => self.geometry_shaders,
            Feature::TextureSize(size) => size <= self.max_texture_size,
            Feature::VertexAttributes(count) => count <= self.max_vertex_attributes,
        }
    }

    /// Fails with [`CanopyError::UnsupportedFeature`] if the feature is not available.
    pub fn require(&self, feature: Feature) -> Result<(), CanopyError> {
        if self.supports(feature) {
            Ok(())
        } else {
            Err(CanopyError::UnsupportedFeature(feature))
        }
    }
}

impl Default for GraphicsCapabilities {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// A feature or a limit that can be checked against [`GraphicsCapabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Compute shader stages.
    ComputeShaders,
    /// Tessellation shader stages.
    Tessellation,
    /// Geometry shader stages.
    GeometryShaders,
    /// A texture of the given dimension.
    TextureSize(u32),
    /// A pipeline with the given number of vertex attributes.
    VertexAttributes(u32),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::ComputeShaders => write!(f, "compute shaders"),
            Feature::Tessellation => write!(f, "tessellation"),
            Feature::GeometryShaders => write!(f, "geometry shaders"),
            Feature::TextureSize(size) => write!(f, "texture size {size}"),
            Feature::VertexAttributes(count) => write!(f, "{count} vertex attributes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_rejects_optional_stages() {
        let caps = GraphicsCapabilities::BASELINE;
        assert!(!caps.supports(Feature::ComputeShaders));
        assert_eq!(
            caps.require(Feature::GeometryShaders),
            Err(CanopyError::UnsupportedFeature(Feature::GeometryShaders))
        );
    }

    #[test]
    fn limits_are_inclusive() {
        let caps = GraphicsCapabilities {
            max_vertex_attributes: 8,
            max_texture_size: 4096,
            ..Default::default()
        };
        assert!(caps.supports(Feature::VertexAttributes(8)));
        assert!(!caps.supports(Feature::VertexAttributes(9)));
        assert!(caps.supports(Feature::TextureSize(4096)));
        assert!(!caps.supports(Feature::TextureSize(4097)));
    }
}
