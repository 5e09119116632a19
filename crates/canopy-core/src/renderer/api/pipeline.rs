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

//! Pipeline descriptors: a shader pair plus the vertex layout it reads.

use super::buffer::IndexFormat;
use super::handle::ShaderId;
use crate::error::CanopyError;
use std::borrow::Cow;

/// The format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
}

impl VertexFormat {
    /// Size of the attribute in bytes.
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
        }
    }
}

/// Describes where one vertex attribute lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// The data format of the attribute.
    pub format: VertexFormat,
    /// Byte offset of the attribute inside one vertex.
    pub offset: u64,
    /// The vertex buffer slot the attribute is read from.
    pub buffer_slot: u32,
}

impl VertexAttribute {
    /// Creates an attribute description.
    pub const fn new(format: VertexFormat, offset: u64, buffer_slot: u32) -> Self {
        Self {
            format,
            offset,
            buffer_slot,
        }
    }
}

/// A descriptor used to create a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The vertex stage. Referenced, not owned.
    pub vertex_shader: ShaderId,
    /// The fragment stage. Referenced, not owned.
    pub fragment_shader: ShaderId,
    /// Ordered vertex attributes.
    pub attributes: Cow<'a, [VertexAttribute]>,
    /// Distance in bytes between two consecutive vertices.
    pub vertex_stride: u64,
    /// The index width indexed draws with this pipeline expect. `None` accepts both.
    pub index_format: Option<IndexFormat>,
}

impl<'a> PipelineDescriptor<'a> {
    /// Creates a descriptor with no attributes and no index width constraint.
    pub fn new(vertex_shader: ShaderId, fragment_shader: ShaderId) -> Self {
        Self {
            label: None,
            vertex_shader,
            fragment_shader,
            attributes: Cow::Borrowed(&[]),
            vertex_stride: 0,
            index_format: None,
        }
    }

    /// Sets the vertex layout.
    pub fn with_layout(mut self, attributes: &'a [VertexAttribute], vertex_stride: u64) -> Self {
        self.attributes = Cow::Borrowed(attributes);
        self.vertex_stride = vertex_stride;
        self
    }

    /// Declares the index width expected by indexed draws.
    pub fn with_index_format(mut self, format: IndexFormat) -> Self {
        self.index_format = Some(format);
        self
    }

    /// The vertex buffer slots this pipeline reads, sorted and deduplicated.
    pub fn required_slots(&self) -> Vec<u32> {
        let mut slots: Vec<u32> = self.attributes.iter().map(|a| a.buffer_slot).collect();
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    /// Checks that every attribute fits inside the vertex stride.
    pub fn validate_layout(&self) -> Result<(), CanopyError> {
        if self.attributes.is_empty() {
            return Ok(());
        }
        if self.vertex_stride == 0 {
            return Err(CanopyError::InvalidDescriptor(
                "pipeline declares attributes but a zero vertex stride".into(),
            ));
        }
        for (location, attribute) in self.attributes.iter().enumerate() {
            let end = attribute.offset + attribute.format.size();
            if end > self.vertex_stride {
                return Err(CanopyError::InvalidDescriptor(format!(
                    "attribute {location} ({:?} at offset {}) overruns the {}-byte stride",
                    attribute.format, attribute.offset, self.vertex_stride
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::handle::ContextId;

    fn shaders() -> (ShaderId, ShaderId) {
        (
            ShaderId::new(ContextId(0), 0),
            ShaderId::new(ContextId(0), 1),
        )
    }

    #[test]
    fn required_slots_are_unique() {
        let (vs, fs) = shaders();
        let attributes = [
            VertexAttribute::new(VertexFormat::Float3, 0, 1),
            VertexAttribute::new(VertexFormat::Float2, 12, 0),
            VertexAttribute::new(VertexFormat::Float4, 20, 1),
        ];
        let desc = PipelineDescriptor::new(vs, fs).with_layout(&attributes, 36);
        assert_eq!(desc.required_slots(), vec![0, 1]);
        assert!(desc.validate_layout().is_ok());
    }

    #[test]
    fn attribute_past_stride_is_invalid() {
        let (vs, fs) = shaders();
        let attributes = [VertexAttribute::new(VertexFormat::Float4, 8, 0)];
        let desc = PipelineDescriptor::new(vs, fs).with_layout(&attributes, 16);
        assert!(matches!(
            desc.validate_layout(),
            Err(CanopyError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn attribute_free_pipeline_is_valid() {
        let (vs, fs) = shaders();
        assert!(PipelineDescriptor::new(vs, fs).validate_layout().is_ok());
    }
}
