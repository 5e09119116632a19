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

//! Opaque handles for graphics objects.
//!
//! Every handle created from a context embeds that context's [`ContextId`], so a
//! handle that outlives its context can be recognised as stale without any lookup.

use crate::platform::WindowId;
use std::fmt;

/// An opaque handle to a graphics context, unique within one [`GraphicsDevice`].
///
/// [`GraphicsDevice`]: crate::renderer::GraphicsDevice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context {}", self.0)
    }
}

macro_rules! context_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            context: ContextId,
            index: u64,
        }

        impl $name {
            /// Builds a handle from its owning context and its per-context index.
            pub const fn new(context: ContextId, index: u64) -> Self {
                Self { context, index }
            }

            /// The context this object was created from.
            pub const fn context(&self) -> ContextId {
                self.context
            }

            /// The per-context index of this object.
            pub const fn index(&self) -> u64 {
                self.index
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{} (context {})"), self.index, self.context.0)
            }
        }
    };
}

context_handle!(
    /// A presentable surface bound to a window.
    SwapchainId,
    "swapchain"
);
context_handle!(
    /// A GPU buffer (vertex, index or uniform data).
    BufferId,
    "buffer"
);
context_handle!(
    /// A shader stage program.
    ShaderId,
    "shader"
);
context_handle!(
    /// A pipeline: a shader pair plus its vertex layout.
    PipelineId,
    "pipeline"
);

/// A handle to one render pass instance recorded against a swapchain.
///
/// Each call to `begin_render_pass` yields a new serial, so a handle to an ended pass
/// never aliases the pass that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderPassId {
    swapchain: SwapchainId,
    serial: u64,
}

impl RenderPassId {
    /// Builds a pass handle for the given swapchain and serial.
    pub const fn new(swapchain: SwapchainId, serial: u64) -> Self {
        Self { swapchain, serial }
    }

    /// The swapchain this pass records into.
    pub const fn swapchain(&self) -> SwapchainId {
        self.swapchain
    }

    /// The per-swapchain serial of this pass.
    pub const fn serial(&self) -> u64 {
        self.serial
    }

    /// The context owning the pass' swapchain.
    pub const fn context(&self) -> ContextId {
        self.swapchain.context()
    }
}

impl fmt::Display for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render pass {} on {}", self.serial, self.swapchain)
    }
}

/// Names any object tracked by the presentation layer, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// A native window.
    Window(WindowId),
    /// A graphics context.
    Context(ContextId),
    /// A swapchain.
    Swapchain(SwapchainId),
    /// A buffer.
    Buffer(BufferId),
    /// A shader.
    Shader(ShaderId),
    /// A pipeline.
    Pipeline(PipelineId),
    /// A render pass.
    RenderPass(RenderPassId),
}

impl ResourceId {
    /// The context owning the resource, if it is a graphics object.
    pub fn context(&self) -> Option<ContextId> {
        match self {
            ResourceId::Window(_) => None,
            ResourceId::Context(id) => Some(*id),
            ResourceId::Swapchain(id) => Some(id.context()),
            ResourceId::Buffer(id) => Some(id.context()),
            ResourceId::Shader(id) => Some(id.context()),
            ResourceId::Pipeline(id) => Some(id.context()),
            ResourceId::RenderPass(id) => Some(id.context()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Window(id) => write!(f, "window #{}", id.0),
            ResourceId::Context(id) => write!(f, "{id}"),
            ResourceId::Swapchain(id) => write!(f, "{id}"),
            ResourceId::Buffer(id) => write!(f, "{id}"),
            ResourceId::Shader(id) => write!(f, "{id}"),
            ResourceId::Pipeline(id) => write!(f, "{id}"),
            ResourceId::RenderPass(id) => write!(f, "{id}"),
        }
    }
}

impl From<SwapchainId> for ResourceId {
    fn from(id: SwapchainId) -> Self {
        ResourceId::Swapchain(id)
    }
}

impl From<BufferId> for ResourceId {
    fn from(id: BufferId) -> Self {
        ResourceId::Buffer(id)
    }
}

impl From<ShaderId> for ResourceId {
    fn from(id: ShaderId) -> Self {
        ResourceId::Shader(id)
    }
}

impl From<PipelineId> for ResourceId {
    fn from(id: PipelineId) -> Self {
        ResourceId::Pipeline(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_carry_their_context() {
        let buffer = BufferId::new(ContextId(4), 12);
        assert_eq!(buffer.context(), ContextId(4));
        assert_eq!(buffer.index(), 12);
        assert_eq!(ResourceId::from(buffer).context(), Some(ContextId(4)));
        assert_eq!(ResourceId::Window(WindowId(1)).context(), None);
    }

    #[test]
    fn pass_serials_distinguish_instances() {
        let swapchain = SwapchainId::new(ContextId(1), 0);
        let first = RenderPassId::new(swapchain, 0);
        let second = RenderPassId::new(swapchain, 1);
        assert_ne!(first, second);
        assert_eq!(first.swapchain(), second.swapchain());
        assert_eq!(
            format!("{second}"),
            "render pass 1 on swapchain #0 (context 1)"
        );
    }
}
