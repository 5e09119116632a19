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

use crate::error::CanopyError;
use std::borrow::Cow;

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub const fn size(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// The role a buffer was created for, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data.
    Vertex,
    /// Index data.
    Index,
    /// Shader constants.
    Uniform,
}

/// How a buffer will be used. Index buffers carry their element width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Bound with `set_vertex_buffer`.
    Vertex,
    /// Consumed by `draw_indexed`; every element has the given width.
    Index(IndexFormat),
    /// Bound with `set_uniform_buffer`.
    Uniform,
}

impl BufferUsage {
    /// The kind of buffer this usage describes.
    pub const fn kind(self) -> BufferKind {
        match self {
            BufferUsage::Vertex => BufferKind::Vertex,
            BufferUsage::Index(_) => BufferKind::Index,
            BufferUsage::Uniform => BufferKind::Uniform,
        }
    }

    /// The index width, if this is an index buffer.
    pub const fn index_format(self) -> Option<IndexFormat> {
        match self {
            BufferUsage::Index(format) => Some(format),
            _ => None,
        }
    }
}

/// A descriptor used to create a buffer, holding its initial contents.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The initial contents. The buffer's size is the length of this slice.
    pub data: Cow<'a, [u8]>,
    /// How the buffer will be bound.
    pub usage: BufferUsage,
}

impl<'a> BufferDescriptor<'a> {
    /// A vertex buffer initialised with `data`.
    pub fn vertex(data: &'a [u8]) -> Self {
        Self {
            label: None,
            data: Cow::Borrowed(data),
            usage: BufferUsage::Vertex,
        }
    }

    /// An index buffer of `format`-wide elements initialised with `data`.
    pub fn index(data: &'a [u8], format: IndexFormat) -> Self {
        Self {
            label: None,
            data: Cow::Borrowed(data),
            usage: BufferUsage::Index(format),
        }
    }

    /// A uniform buffer initialised with `data`.
    pub fn uniform(data: &'a [u8]) -> Self {
        Self {
            label: None,
            data: Cow::Borrowed(data),
            usage: BufferUsage::Uniform,
        }
    }

    /// Attaches a debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Checks the descriptor: data must be non-empty and index data must hold
    /// a whole number of elements.
    pub fn validate(&self) -> Result<(), CanopyError> {
        if self.data.is_empty() {
            return Err(CanopyError::InvalidDescriptor(format!(
                "buffer '{}' has no data",
                self.label.as_deref().unwrap_or("unnamed")
            )));
        }
        if let BufferUsage::Index(format) = self.usage {
            if self.size() % format.size() != 0 {
                return Err(CanopyError::InvalidDescriptor(format!(
                    "index buffer of {} bytes is not a multiple of the {:?} width",
                    self.size(),
                    format
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_buffer_must_hold_whole_elements() {
        let data = [0u8; 6];
        assert!(BufferDescriptor::index(&data, IndexFormat::Uint16)
            .validate()
            .is_ok());
        assert!(matches!(
            BufferDescriptor::index(&data, IndexFormat::Uint32).validate(),
            Err(CanopyError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn empty_buffers_are_rejected() {
        let err = BufferDescriptor::vertex(&[])
            .with_label("triangle")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            CanopyError::InvalidDescriptor("buffer 'triangle' has no data".into())
        );
    }

    #[test]
    fn usage_reports_kind_and_width() {
        assert_eq!(BufferUsage::Vertex.kind(), BufferKind::Vertex);
        assert_eq!(
            BufferUsage::Index(IndexFormat::Uint32).index_format(),
            Some(IndexFormat::Uint32)
        );
        assert_eq!(BufferUsage::Uniform.index_format(), None);
    }
}
