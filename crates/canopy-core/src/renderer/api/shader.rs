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

use super::capabilities::Feature;
use crate::error::CanopyError;
use std::borrow::Cow;

/// The pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Compute stage. Requires [`Feature::ComputeShaders`].
    Compute,
    /// Geometry stage. Requires [`Feature::GeometryShaders`].
    Geometry,
    /// Tessellation stage. Requires [`Feature::Tessellation`].
    Tessellation,
}

impl ShaderStage {
    /// The capability this stage depends on, if it is not part of the baseline.
    pub const fn required_feature(self) -> Option<Feature> {
        match self {
            ShaderStage::Vertex | ShaderStage::Fragment => None,
            ShaderStage::Compute => Some(Feature::ComputeShaders),
            ShaderStage::Geometry => Some(Feature::GeometryShaders),
            ShaderStage::Tessellation => Some(Feature::Tessellation),
        }
    }
}

/// A descriptor used to create a shader.
///
/// The source is handed to the backend verbatim; translation between shading
/// languages happens outside this crate.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// Shader source text in the backend's language.
    pub source: Cow<'a, str>,
    /// Stage the shader runs in.
    pub stage: ShaderStage,
}

impl<'a> ShaderDescriptor<'a> {
    /// Creates a descriptor for `source` running at `stage`.
    pub fn new(source: impl Into<Cow<'a, str>>, stage: ShaderStage) -> Self {
        Self {
            label: None,
            source: source.into(),
            stage,
        }
    }

    /// Checks that the source is not blank.
    pub fn validate(&self) -> Result<(), CanopyError> {
        if self.source.trim().is_empty() {
            return Err(CanopyError::InvalidDescriptor(format!(
                "{:?} shader '{}' has empty source",
                self.stage,
                self.label.unwrap_or("unnamed")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_stages_map_to_features() {
        assert_eq!(ShaderStage::Vertex.required_feature(), None);
        assert_eq!(ShaderStage::Fragment.required_feature(), None);
        assert_eq!(
            ShaderStage::Compute.required_feature(),
            Some(Feature::ComputeShaders)
        );
        assert_eq!(
            ShaderStage::Tessellation.required_feature(),
            Some(Feature::Tessellation)
        );
    }

    #[test]
    fn blank_source_is_invalid() {
        assert!(ShaderDescriptor::new("   \n", ShaderStage::Vertex)
            .validate()
            .is_err());
        assert!(ShaderDescriptor::new("void main() {}", ShaderStage::Fragment)
            .validate()
            .is_ok());
    }
}
