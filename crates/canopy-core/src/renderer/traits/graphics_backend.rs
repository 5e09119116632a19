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

use crate::backend::GraphicsApiKind;
use crate::error::CanopyError;
use crate::renderer::api::*;
use std::fmt::Debug;

/// The capability set a graphics API implementation must provide.
///
/// Backends are only ever driven through a [`GraphicsDevice`], which allocates every
/// handle, keeps the resource registry and runs the render pass state machine. By the
/// time a method here is called, the device has already checked that:
/// * every handle is live and belongs to a live context,
/// * pass handles name the pass currently recording on their swapchain,
/// * draws have a pipeline and all of its vertex buffer slots bound,
/// * buffers are used in the role they were created for.
///
/// Backends therefore only translate calls into native work. Methods that return
/// `Result` are those where the native layer itself can refuse (out of memory, lost
/// surface, ...). All calls happen on the thread that owns the device.
///
/// [`GraphicsDevice`]: crate::renderer::GraphicsDevice
pub trait GraphicsBackend: Debug {
    /// The graphics API this backend drives.
    fn kind(&self) -> GraphicsApiKind;

    /// Creates a native device/session for `context` and reports its capabilities.
    /// ## Errors
    /// * `BackendFailure` - If no device can be opened.
    fn create_context(&mut self, context: ContextId) -> Result<GraphicsCapabilities, CanopyError>;

    /// Releases the native device and everything still allocated from it.
    fn destroy_context(&mut self, context: ContextId);

    /// Reports the feature flags and limits of a live context.
    fn capabilities(&self, context: ContextId) -> GraphicsCapabilities;

    /// Binds a new swapchain to the native window named in the descriptor.
    fn create_swapchain(
        &mut self,
        swapchain: SwapchainId,
        descriptor: &SwapchainDescriptor,
    ) -> Result<(), CanopyError>;

    /// Updates the presentation size. The swapchain keeps its identity.
    fn resize_swapchain(&mut self, swapchain: SwapchainId, width: u32, height: u32);

    /// Destroys a swapchain. No pass is recording on it.
    fn destroy_swapchain(&mut self, swapchain: SwapchainId);

    /// Acquires the next image of the pass' swapchain and starts recording.
    /// ## Errors
    /// * `SwapchainUnavailable` - If there is no presentable image right now.
    fn begin_render_pass(&mut self, pass: RenderPassId, action: &PassAction)
        -> Result<(), CanopyError>;

    /// Finalizes the commands recorded in `pass`.
    fn end_render_pass(&mut self, pass: RenderPassId);

    /// Submits the last ended pass of the swapchain and flips it on screen.
    ///
    /// May block until the resources of an earlier frame can be reused.
    fn present(&mut self, swapchain: SwapchainId) -> Result<(), CanopyError>;

    /// Allocates a buffer and uploads its initial contents.
    fn create_buffer(
        &mut self,
        buffer: BufferId,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<(), CanopyError>;

    /// Releases a buffer.
    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Compiles a shader stage.
    fn create_shader(
        &mut self,
        shader: ShaderId,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<(), CanopyError>;

    /// Releases a shader.
    fn destroy_shader(&mut self, shader: ShaderId);

    /// Builds a pipeline from two live shaders and a vertex layout.
    fn create_pipeline(
        &mut self,
        pipeline: PipelineId,
        descriptor: &PipelineDescriptor<'_>,
    ) -> Result<(), CanopyError>;

    /// Releases a pipeline.
    fn destroy_pipeline(&mut self, pipeline: PipelineId);

    /// Records a pipeline switch.
    fn set_pipeline(&mut self, pass: RenderPassId, pipeline: PipelineId);

    /// Records a vertex buffer binding at `slot`.
    fn set_vertex_buffer(&mut self, pass: RenderPassId, slot: u32, buffer: BufferId);

    /// Records a uniform buffer binding at `slot`, starting `offset` bytes in.
    fn set_uniform_buffer(&mut self, pass: RenderPassId, slot: u32, offset: u32, buffer: BufferId);

    /// Records a non-indexed draw.
    fn draw(&mut self, pass: RenderPassId, vertex_count: u32, first_vertex: u32);

    /// Records an indexed draw of `index_count` indices starting at `first_index`.
    fn draw_indexed(
        &mut self,
        pass: RenderPassId,
        index_buffer: BufferId,
        first_index: u32,
        index_count: u32,
        vertex_offset: i32,
    );
}
