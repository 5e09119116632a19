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

//! Pass actions: what happens to each attachment when a render pass begins.

use crate::error::CanopyError;
use serde::{Deserialize, Serialize};

/// The operation to perform on an attachment at the beginning of a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadAction<V> {
    /// The previous contents are undefined; the backend may skip any work.
    DontCare,
    /// The attachment will be cleared to the specified value.
    Clear(V),
    /// The existing contents of the attachment are preserved.
    Load,
}

impl<V> LoadAction<V> {
    /// The clear value, if this action clears.
    pub fn clear_value(&self) -> Option<&V> {
        match self {
            LoadAction::Clear(value) => Some(value),
            _ => None,
        }
    }
}

/// A linear RGBA color used to clear color attachments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearColor {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl ClearColor {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Values used to clear a depth/stencil attachment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthStencilClear {
    /// Depth clear value, within `[0, 1]`.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u8,
}

impl Default for DepthStencilClear {
    fn default() -> Self {
        Self {
            depth: 1.0,
            stencil: 0,
        }
    }
}

/// Per-attachment load behaviour of a render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassAction {
    /// Action for the color attachment.
    pub color: LoadAction<ClearColor>,
    /// Action for the depth/stencil attachment.
    pub depth_stencil: LoadAction<DepthStencilClear>,
}

impl PassAction {
    /// Clears color to `color` and depth to `depth` (stencil to zero).
    pub fn clear(color: ClearColor, depth: f32) -> Self {
        Self {
            color: LoadAction::Clear(color),
            depth_stencil: LoadAction::Clear(DepthStencilClear { depth, stencil: 0 }),
        }
    }

    /// Preserves the contents of every attachment.
    pub fn load() -> Self {
        Self {
            color: LoadAction::Load,
            depth_stencil: LoadAction::Load,
        }
    }

    /// Checks that clear values are in range.
    pub fn validate(&self) -> Result<(), CanopyError> {
        if let LoadAction::Clear(clear) = &self.depth_stencil {
            if !(0.0..=1.0).contains(&clear.depth) {
                return Err(CanopyError::InvalidDescriptor(format!(
                    "depth clear value {} is outside [0, 1]",
                    clear.depth
                )));
            }
        }
        Ok(())
    }
}

impl Default for PassAction {
    /// Clears to opaque black and a depth of 1.0.
    fn default() -> Self {
        Self::clear(ClearColor::BLACK, 1.0)
    }
}
