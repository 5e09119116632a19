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

//! A graphics backend that records instead of rendering.
//!
//! Every command reaching the backend is appended to a journal that tests and tools
//! can inspect through a [`HeadlessGpu`] handle.

use canopy_core::backend::GraphicsApiKind;
use canopy_core::renderer::api::*;
use canopy_core::renderer::GraphicsBackend;
use canopy_core::CanopyError;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A command as received by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// A render pass started.
    BeginPass {
        /// The pass.
        pass: RenderPassId,
        /// Its load actions.
        action: PassAction,
    },
    /// A pipeline was bound.
    SetPipeline {
        /// The pass.
        pass: RenderPassId,
        /// The pipeline.
        pipeline: PipelineId,
    },
    /// A vertex buffer was bound.
    SetVertexBuffer {
        /// The pass.
        pass: RenderPassId,
        /// The slot.
        slot: u32,
        /// The buffer.
        buffer: BufferId,
    },
    /// A uniform buffer was bound.
    SetUniformBuffer {
        /// The pass.
        pass: RenderPassId,
        /// The slot.
        slot: u32,
        /// Byte offset into the buffer.
        offset: u32,
        /// The buffer.
        buffer: BufferId,
    },
    /// A non-indexed draw.
    Draw {
        /// The pass.
        pass: RenderPassId,
        /// Vertices drawn.
        vertex_count: u32,
        /// First vertex.
        first_vertex: u32,
    },
    /// An indexed draw.
    DrawIndexed {
        /// The pass.
        pass: RenderPassId,
        /// The index buffer.
        index_buffer: BufferId,
        /// First index read.
        first_index: u32,
        /// Indices drawn.
        index_count: u32,
        /// Added to each index.
        vertex_offset: i32,
    },
    /// A render pass ended.
    EndPass {
        /// The pass.
        pass: RenderPassId,
    },
    /// A swapchain image was presented.
    Present {
        /// The swapchain.
        swapchain: SwapchainId,
    },
}

#[derive(Debug)]
struct GpuState {
    capabilities: GraphicsCapabilities,
    adapter_available: bool,
    contexts: HashSet<ContextId>,
    swapchains: HashMap<SwapchainId, (u32, u32)>,
    occluded: HashSet<SwapchainId>,
    buffers: HashMap<BufferId, Vec<u8>>,
    shaders: HashMap<ShaderId, ShaderStage>,
    pipelines: HashSet<PipelineId>,
    journal: Vec<RecordedCommand>,
    presents: usize,
}

impl Default for GpuState {
    fn default() -> Self {
        Self {
            capabilities: GraphicsCapabilities::BASELINE,
            adapter_available: true,
            contexts: HashSet::new(),
            swapchains: HashMap::new(),
            occluded: HashSet::new(),
            buffers: HashMap::new(),
            shaders: HashMap::new(),
            pipelines: HashSet::new(),
            journal: Vec::new(),
            presents: 0,
        }
    }
}

impl GpuState {
    fn record(&mut self, command: RecordedCommand) {
        log::trace!("Recorded {command:?}.");
        self.journal.push(command);
    }
}

/// Inspection and fault-injection handle on a headless GPU.
///
/// Cloning yields another handle to the same GPU.
#[derive(Debug, Clone, Default)]
pub struct HeadlessGpu {
    state: Rc<RefCell<GpuState>>,
}

impl HeadlessGpu {
    /// A GPU with [`GraphicsCapabilities::BASELINE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A GPU reporting `capabilities` for every context created afterwards.
    pub fn with_capabilities(capabilities: GraphicsCapabilities) -> Self {
        let gpu = Self::new();
        gpu.state.borrow_mut().capabilities = capabilities;
        gpu
    }

    /// A graphics backend driving this GPU.
    pub fn backend(&self) -> HeadlessGraphicsBackend {
        HeadlessGraphicsBackend { gpu: self.clone() }
    }

    /// Makes context creation fail (or succeed again).
    pub fn set_adapter_available(&self, available: bool) {
        self.state.borrow_mut().adapter_available = available;
    }

    /// Simulates an occluded window: passes on `swapchain` get no image.
    pub fn set_swapchain_occluded(&self, swapchain: SwapchainId, occluded: bool) {
        let mut state = self.state.borrow_mut();
        if occluded {
            state.occluded.insert(swapchain);
        } else {
            state.occluded.remove(&swapchain);
        }
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.state.borrow().journal.clone()
    }

    /// Empties the journal.
    pub fn clear_commands(&self) {
        self.state.borrow_mut().journal.clear();
    }

    /// Number of presents.
    pub fn present_count(&self) -> usize {
        self.state.borrow().presents
    }

    /// Native contexts alive.
    pub fn live_contexts(&self) -> usize {
        self.state.borrow().contexts.len()
    }

    /// Native swapchains alive.
    pub fn live_swapchains(&self) -> usize {
        self.state.borrow().swapchains.len()
    }

    /// Native buffers alive.
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Native shaders alive.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Native pipelines alive.
    pub fn live_pipelines(&self) -> usize {
        self.state.borrow().pipelines.len()
    }

    /// Size the backend last saw for a swapchain.
    pub fn swapchain_size(&self, swapchain: SwapchainId) -> Option<(u32, u32)> {
        self.state.borrow().swapchains.get(&swapchain).copied()
    }

    /// Contents uploaded into a buffer.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }
}

/// The recording graphics backend.
#[derive(Debug, Clone, Default)]
pub struct HeadlessGraphicsBackend {
    gpu: HeadlessGpu,
}

impl HeadlessGraphicsBackend {
    /// A backend on a private GPU.
    pub fn new() -> Self {
        Self::default()
    }

    /// The GPU this backend drives.
    pub fn gpu(&self) -> &HeadlessGpu {
        &self.gpu
    }

    fn record(&mut self, command: RecordedCommand) {
        self.gpu.state.borrow_mut().record(command);
    }
}

impl GraphicsBackend for HeadlessGraphicsBackend {
    fn kind(&self) -> GraphicsApiKind {
        GraphicsApiKind::Headless
    }

    fn create_context(&mut self, context: ContextId) -> Result<GraphicsCapabilities, CanopyError> {
        let mut state = self.gpu.state.borrow_mut();
        if !state.adapter_available {
            return Err(CanopyError::BackendFailure(
                "no headless adapter available".to_owned(),
            ));
        }
        state.contexts.insert(context);
        Ok(state.capabilities)
    }

    fn destroy_context(&mut self, context: ContextId) {
        let mut state = self.gpu.state.borrow_mut();
        state.contexts.remove(&context);
        state.swapchains.retain(|id, _| id.context() != context);
        state.occluded.retain(|id| id.context() != context);
        state.buffers.retain(|id, _| id.context() != context);
        state.shaders.retain(|id, _| id.context() != context);
        state.pipelines.retain(|id| id.context() != context);
    }

    fn capabilities(&self, _context: ContextId) -> GraphicsCapabilities {
        self.gpu.state.borrow().capabilities
    }

    fn create_swapchain(
        &mut self,
        swapchain: SwapchainId,
        descriptor: &SwapchainDescriptor,
    ) -> Result<(), CanopyError> {
        self.gpu
            .state
            .borrow_mut()
            .swapchains
            .insert(swapchain, (descriptor.width, descriptor.height));
        Ok(())
    }

    fn resize_swapchain(&mut self, swapchain: SwapchainId, width: u32, height: u32) {
        if let Some(size) = self.gpu.state.borrow_mut().swapchains.get_mut(&swapchain) {
            *size = (width, height);
        }
    }

    fn destroy_swapchain(&mut self, swapchain: SwapchainId) {
        let mut state = self.gpu.state.borrow_mut();
        state.swapchains.remove(&swapchain);
        state.occluded.remove(&swapchain);
    }

    fn begin_render_pass(
        &mut self,
        pass: RenderPassId,
        action: &PassAction,
    ) -> Result<(), CanopyError> {
        let mut state = self.gpu.state.borrow_mut();
        if state.occluded.contains(&pass.swapchain()) {
            return Err(CanopyError::SwapchainUnavailable(pass.swapchain()));
        }
        state.record(RecordedCommand::BeginPass {
            pass,
            action: *action,
        });
        Ok(())
    }

    fn end_render_pass(&mut self, pass: RenderPassId) {
        self.record(RecordedCommand::EndPass { pass });
    }

    fn present(&mut self, swapchain: SwapchainId) -> Result<(), CanopyError> {
        let mut state = self.gpu.state.borrow_mut();
        state.presents += 1;
        state.record(RecordedCommand::Present { swapchain });
        Ok(())
    }

    fn create_buffer(
        &mut self,
        buffer: BufferId,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<(), CanopyError> {
        self.gpu
            .state
            .borrow_mut()
            .buffers
            .insert(buffer, descriptor.data.to_vec());
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        self.gpu.state.borrow_mut().buffers.remove(&buffer);
    }

    fn create_shader(
        &mut self,
        shader: ShaderId,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<(), CanopyError> {
        self.gpu
            .state
            .borrow_mut()
            .shaders
            .insert(shader, descriptor.stage);
        Ok(())
    }

    fn destroy_shader(&mut self, shader: ShaderId) {
        self.gpu.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_pipeline(
        &mut self,
        pipeline: PipelineId,
        _descriptor: &PipelineDescriptor<'_>,
    ) -> Result<(), CanopyError> {
        self.gpu.state.borrow_mut().pipelines.insert(pipeline);
        Ok(())
    }

    fn destroy_pipeline(&mut self, pipeline: PipelineId) {
        self.gpu.state.borrow_mut().pipelines.remove(&pipeline);
    }

    fn set_pipeline(&mut self, pass: RenderPassId, pipeline: PipelineId) {
        self.record(RecordedCommand::SetPipeline { pass, pipeline });
    }

    fn set_vertex_buffer(&mut self, pass: RenderPassId, slot: u32, buffer: BufferId) {
        self.record(RecordedCommand::SetVertexBuffer { pass, slot, buffer });
    }

    fn set_uniform_buffer(&mut self, pass: RenderPassId, slot: u32, offset: u32, buffer: BufferId) {
        self.record(RecordedCommand::SetUniformBuffer {
            pass,
            slot,
            offset,
            buffer,
        });
    }

    fn draw(&mut self, pass: RenderPassId, vertex_count: u32, first_vertex: u32) {
        self.record(RecordedCommand::Draw {
            pass,
            vertex_count,
            first_vertex,
        });
    }

    fn draw_indexed(
        &mut self,
        pass: RenderPassId,
        index_buffer: BufferId,
        first_index: u32,
        index_count: u32,
        vertex_offset: i32,
    ) {
        self.record(RecordedCommand::DrawIndexed {
            pass,
            index_buffer,
            first_index,
            index_count,
            vertex_offset,
        });
    }
}
