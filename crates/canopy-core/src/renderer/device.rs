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

//! The graphics front-end client code talks to.

use super::pass::{ActivePass, PassState, PassTracker};
use super::registry::{BufferRecord, PipelineRecord, RegistryCounts, ResourceRegistry, SwapchainRecord};
use super::traits::GraphicsBackend;
use crate::backend::GraphicsApiKind;
use crate::error::{violation, CanopyError};
use crate::renderer::api::*;

/// Counters describing the work submitted through a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Render passes that started recording.
    pub passes_begun: u64,
    /// Render passes that ended.
    pub passes_ended: u64,
    /// Draw calls recorded, indexed or not.
    pub draw_calls: u64,
    /// Successful presents.
    pub frames_presented: u64,
    /// Frames skipped because the swapchain had no presentable image.
    pub frames_skipped: u64,
}

/// Validating front-end over one [`GraphicsBackend`].
///
/// The device allocates every handle, owns the resource registry and runs the render
/// pass state machine of each swapchain. A backend only ever sees calls that already
/// passed these checks, so the same misuse is reported the same way on every API.
///
/// Contract violations are logged at error level and returned; nothing is performed
/// on the backend when a call is rejected.
#[derive(Debug)]
pub struct GraphicsDevice {
    backend: Box<dyn GraphicsBackend>,
    registry: ResourceRegistry,
    passes: PassTracker,
    stats: FrameStats,
}

impl GraphicsDevice {
    /// Wraps a backend.
    pub fn new(backend: Box<dyn GraphicsBackend>) -> Self {
        log::info!("Graphics device created on the {:?} backend.", backend.kind());
        Self {
            backend,
            registry: ResourceRegistry::new(),
            passes: PassTracker::new(),
            stats: FrameStats::default(),
        }
    }

    /// The graphics API of the wrapped backend.
    pub fn kind(&self) -> GraphicsApiKind {
        self.backend.kind()
    }

    /// Counters since the device was created.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of live objects of each kind.
    pub fn live_counts(&self) -> RegistryCounts {
        self.registry.counts()
    }

    /// Current pass state of a swapchain, `None` if the handle is not live.
    pub fn pass_state(&self, swapchain: SwapchainId) -> Option<PassState> {
        self.registry.swapchain(swapchain).ok()?;
        self.passes.state(swapchain)
    }

    // --- Contexts ---

    /// `false` once `context` is destroyed, or if it never existed.
    pub fn is_context_live(&self, context: ContextId) -> bool {
        self.registry.context(context).is_ok()
    }

    /// Opens a new graphics context.
    /// ## Errors
    /// * `BackendFailure` - If the backend cannot open a device.
    pub fn create_context(&mut self) -> Result<ContextId, CanopyError> {
        let id = self.registry.allocate_context();
        let capabilities = self.backend.create_context(id)?;
        self.registry.insert_context(id, capabilities);
        log::info!("Created {id} ({capabilities:?}).");
        Ok(id)
    }

    /// Destroys a context. Every handle created from it becomes stale.
    ///
    /// Objects still alive are released with the context and reported as a warning.
    /// ## Errors
    /// * `ResourceInUse` - If one of its swapchains is recording a pass.
    pub fn destroy_context(&mut self, context: ContextId) -> Result<(), CanopyError> {
        self.registry.context(context).map_err(violation)?;
        if self.passes.recording_in(context).is_some() {
            return Err(violation(CanopyError::ResourceInUse(ResourceId::Context(
                context,
            ))));
        }

        let leaked = self.registry.remove_context(context).map_err(violation)?;
        self.passes.untrack_context(context);
        self.backend.destroy_context(context);
        if leaked.resources() > 0 {
            log::warn!("Destroyed {context} with live objects still attached: {leaked:?}");
        } else {
            log::info!("Destroyed {context}.");
        }
        Ok(())
    }

    /// Capabilities of a live context.
    pub fn capabilities(&self, context: ContextId) -> Result<GraphicsCapabilities, CanopyError> {
        self.registry.capabilities(context).map_err(violation)
    }

    /// `true` if the context provides `feature`.
    pub fn supports(&self, context: ContextId, feature: Feature) -> Result<bool, CanopyError> {
        Ok(self.capabilities(context)?.supports(feature))
    }

    /// Fails with `UnsupportedFeature` unless the context provides `feature`.
    pub fn require(&self, context: ContextId, feature: Feature) -> Result<(), CanopyError> {
        self.capabilities(context)?.require(feature).map_err(violation)
    }

    // --- Swapchains ---

    /// Binds a new swapchain to a native window.
    pub fn create_swapchain(
        &mut self,
        context: ContextId,
        descriptor: &SwapchainDescriptor,
    ) -> Result<SwapchainId, CanopyError> {
        let id = SwapchainId::new(context, self.registry.next_index(context).map_err(violation)?);
        self.backend.create_swapchain(id, descriptor)?;
        self.registry
            .insert_swapchain(id, SwapchainRecord::from(descriptor));
        self.passes.track(id);
        log::debug!(
            "Created {id} ({}x{}, vsync: {}).",
            descriptor.width,
            descriptor.height,
            descriptor.vsync
        );
        Ok(id)
    }

    /// Current size of a swapchain.
    pub fn swapchain_size(&self, swapchain: SwapchainId) -> Result<(u32, u32), CanopyError> {
        let record = self.registry.swapchain(swapchain).map_err(violation)?;
        Ok((record.width, record.height))
    }

    /// Resizes a swapchain. A zero dimension is accepted and means "minimized":
    /// passes begun on it are skipped until it grows again.
    /// ## Errors
    /// * `ResourceInUse` - If a pass is recording on the swapchain.
    pub fn resize_swapchain(
        &mut self,
        swapchain: SwapchainId,
        width: u32,
        height: u32,
    ) -> Result<(), CanopyError> {
        self.registry.swapchain(swapchain).map_err(violation)?;
        if self.passes.is_recording(swapchain) {
            return Err(violation(CanopyError::ResourceInUse(ResourceId::Swapchain(
                swapchain,
            ))));
        }
        self.backend.resize_swapchain(swapchain, width, height);
        let record = self.registry.swapchain_mut(swapchain).map_err(violation)?;
        record.width = width;
        record.height = height;
        log::debug!("Resized {swapchain} to {width}x{height}.");
        Ok(())
    }

    /// Destroys a swapchain. A pending ended pass is discarded.
    /// ## Errors
    /// * `ResourceInUse` - If a pass is recording on the swapchain.
    pub fn destroy_swapchain(&mut self, swapchain: SwapchainId) -> Result<(), CanopyError> {
        self.registry.swapchain(swapchain).map_err(violation)?;
        self.passes.untrack(swapchain).map_err(violation)?;
        self.backend.destroy_swapchain(swapchain);
        self.registry.remove_swapchain(swapchain).map_err(violation)?;
        log::debug!("Destroyed {swapchain}.");
        Ok(())
    }

    // --- Frame ---

    /// Starts recording a render pass into the next image of `swapchain`.
    /// ## Errors
    /// * `SwapchainUnavailable` - If there is no presentable image (zero-sized or
    ///   occluded). Skip the frame and retry later.
    /// * `PassAlreadyActive` - If a pass is already recording on the swapchain.
    pub fn begin_render_pass(
        &mut self,
        swapchain: SwapchainId,
        action: &PassAction,
    ) -> Result<RenderPassId, CanopyError> {
        let presentable = self
            .registry
            .swapchain(swapchain)
            .map_err(violation)?
            .is_presentable();
        action.validate().map_err(violation)?;
        let pass = self.passes.prepare_begin(swapchain).map_err(violation)?;

        if !presentable {
            return Err(self.skip_frame(swapchain));
        }
        match self.backend.begin_render_pass(pass, action) {
            Ok(()) => {}
            Err(CanopyError::SwapchainUnavailable(_)) => return Err(self.skip_frame(swapchain)),
            Err(err) => return Err(err),
        }

        self.passes.commit_begin(pass);
        self.stats.passes_begun += 1;
        log::trace!("Began {pass}.");
        Ok(pass)
    }

    /// Ends a recording pass. The handle becomes stale.
    /// ## Errors
    /// * `PassAlreadyEnded` - If the pass has already ended.
    pub fn end_render_pass(&mut self, pass: RenderPassId) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        let active = self.passes.end(pass).map_err(violation)?;
        self.backend.end_render_pass(pass);
        self.stats.passes_ended += 1;
        log::trace!("Ended {pass} after {} draw call(s).", active.draw_calls);
        Ok(())
    }

    /// Submits the last ended pass of `swapchain` to the screen.
    /// ## Errors
    /// * `PassNotEnded` - If a pass is still recording.
    /// * `NothingToPresent` - If no pass ended since the last present.
    pub fn present(&mut self, swapchain: SwapchainId) -> Result<(), CanopyError> {
        self.registry.swapchain(swapchain).map_err(violation)?;
        self.passes.prepare_present(swapchain).map_err(violation)?;
        match self.backend.present(swapchain) {
            Ok(()) => {}
            Err(CanopyError::SwapchainUnavailable(_)) => {
                // The ended pass is dropped along with the frame.
                self.passes.commit_present(swapchain);
                return Err(self.skip_frame(swapchain));
            }
            Err(err) => return Err(err),
        }
        self.passes.commit_present(swapchain);
        self.stats.frames_presented += 1;
        Ok(())
    }

    // --- Resources ---

    /// Allocates a buffer and uploads `descriptor.data` into it.
    pub fn create_buffer(
        &mut self,
        context: ContextId,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<BufferId, CanopyError> {
        descriptor.validate().map_err(violation)?;
        let id = BufferId::new(context, self.registry.next_index(context).map_err(violation)?);
        self.backend.create_buffer(id, descriptor)?;
        self.registry.insert_buffer(
            id,
            BufferRecord {
                label: descriptor.label.as_ref().map(|l| l.to_string()),
                usage: descriptor.usage,
                size: descriptor.size(),
            },
        );
        log::debug!(
            "Created {id} ({:?}, {} bytes, label: {:?}).",
            descriptor.usage,
            descriptor.size(),
            descriptor.label
        );
        Ok(id)
    }

    /// Size in bytes and usage of a live buffer.
    pub fn buffer_info(&self, buffer: BufferId) -> Result<(u64, BufferUsage), CanopyError> {
        let record = self.registry.buffer(buffer).map_err(violation)?;
        Ok((record.size, record.usage))
    }

    /// Destroys a buffer.
    /// ## Errors
    /// * `ResourceInUse` - If the recording pass of a swapchain has it bound.
    pub fn destroy_buffer(&mut self, buffer: BufferId) -> Result<(), CanopyError> {
        self.registry.buffer(buffer).map_err(violation)?;
        self.ensure_unused(ResourceId::Buffer(buffer))?;
        self.backend.destroy_buffer(buffer);
        self.registry.remove_buffer(buffer).map_err(violation)?;
        Ok(())
    }

    /// Compiles a shader.
    /// ## Errors
    /// * `UnsupportedFeature` - If the stage needs a feature the context lacks.
    pub fn create_shader(
        &mut self,
        context: ContextId,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<ShaderId, CanopyError> {
        let capabilities = self.registry.capabilities(context).map_err(violation)?;
        if let Some(feature) = descriptor.stage.required_feature() {
            capabilities.require(feature).map_err(violation)?;
        }
        descriptor.validate().map_err(violation)?;

        let id = ShaderId::new(context, self.registry.next_index(context).map_err(violation)?);
        self.backend.create_shader(id, descriptor)?;
        self.registry.insert_shader(id, descriptor.stage);
        log::debug!("Created {id} ({:?}, label: {:?}).", descriptor.stage, descriptor.label);
        Ok(id)
    }

    /// Destroys a shader.
    /// ## Errors
    /// * `ResourceInUse` - If a live pipeline references it.
    pub fn destroy_shader(&mut self, shader: ShaderId) -> Result<(), CanopyError> {
        self.registry.remove_shader(shader).map_err(violation)?;
        self.backend.destroy_shader(shader);
        Ok(())
    }

    /// Builds a pipeline from a vertex and a fragment shader of the same context.
    /// ## Errors
    /// * `UnsupportedFeature` - If the layout has more attributes than the context allows.
    /// * `ContextMismatch` - If a shader comes from another context.
    /// * `InvalidDescriptor` - If a shader has the wrong stage or the layout is malformed.
    pub fn create_pipeline(
        &mut self,
        context: ContextId,
        descriptor: &PipelineDescriptor<'_>,
    ) -> Result<PipelineId, CanopyError> {
        let capabilities = self.registry.capabilities(context).map_err(violation)?;
        let attribute_count = u32::try_from(descriptor.attributes.len()).unwrap_or(u32::MAX);
        capabilities
            .require(Feature::VertexAttributes(attribute_count))
            .map_err(violation)?;
        descriptor.validate_layout().map_err(violation)?;
        self.check_shader(context, descriptor.vertex_shader, ShaderStage::Vertex)?;
        self.check_shader(context, descriptor.fragment_shader, ShaderStage::Fragment)?;

        let id = PipelineId::new(context, self.registry.next_index(context).map_err(violation)?);
        self.backend.create_pipeline(id, descriptor)?;
        self.registry.insert_pipeline(
            id,
            PipelineRecord {
                vertex_shader: descriptor.vertex_shader,
                fragment_shader: descriptor.fragment_shader,
                required_slots: descriptor.required_slots(),
                index_format: descriptor.index_format,
            },
        );
        log::debug!("Created {id} (label: {:?}).", descriptor.label);
        Ok(id)
    }

    /// Destroys a pipeline and releases its shaders.
    /// ## Errors
    /// * `ResourceInUse` - If the recording pass of a swapchain has it bound.
    pub fn destroy_pipeline(&mut self, pipeline: PipelineId) -> Result<(), CanopyError> {
        self.registry.pipeline(pipeline).map_err(violation)?;
        self.ensure_unused(ResourceId::Pipeline(pipeline))?;
        self.backend.destroy_pipeline(pipeline);
        self.registry.remove_pipeline(pipeline).map_err(violation)?;
        Ok(())
    }

    // --- Commands ---

    /// Binds a pipeline for the following draws of `pass`.
    pub fn set_pipeline(&mut self, pass: RenderPassId, pipeline: PipelineId) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        self.passes.active(pass).map_err(violation)?;
        self.registry.pipeline(pipeline).map_err(violation)?;
        same_context(pass, ResourceId::Pipeline(pipeline))?;

        self.active_pass(pass)?.pipeline = Some(pipeline);
        self.backend.set_pipeline(pass, pipeline);
        Ok(())
    }

    /// Binds a vertex buffer at `slot`.
    pub fn set_vertex_buffer(
        &mut self,
        pass: RenderPassId,
        slot: u32,
        buffer: BufferId,
    ) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        self.passes.active(pass).map_err(violation)?;
        self.check_buffer(pass, buffer, BufferKind::Vertex)?;

        self.active_pass(pass)?.vertex_buffers.insert(slot, buffer);
        self.backend.set_vertex_buffer(pass, slot, buffer);
        Ok(())
    }

    /// Binds a uniform buffer at `slot`, starting `offset` bytes into it.
    /// ## Errors
    /// * `OutOfBounds` - If `offset` is not inside the buffer.
    pub fn set_uniform_buffer(
        &mut self,
        pass: RenderPassId,
        slot: u32,
        offset: u32,
        buffer: BufferId,
    ) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        self.passes.active(pass).map_err(violation)?;
        let (size, _) = self.check_buffer(pass, buffer, BufferKind::Uniform)?;
        if u64::from(offset) >= size {
            return Err(violation(CanopyError::OutOfBounds(format!(
                "uniform offset {offset} is outside {buffer} ({size} bytes)"
            ))));
        }

        self.active_pass(pass)?
            .uniform_buffers
            .insert(slot, (buffer, offset));
        self.backend.set_uniform_buffer(pass, slot, offset, buffer);
        Ok(())
    }

    /// Records a non-indexed draw of `vertex_count` vertices.
    /// ## Errors
    /// * `NoPipelineBound` - If no pipeline is bound in the pass.
    /// * `MissingVertexBuffer` - If a slot read by the pipeline has no buffer bound.
    pub fn draw(
        &mut self,
        pass: RenderPassId,
        vertex_count: u32,
        first_vertex: u32,
    ) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        self.check_draw(pass)?;

        self.active_pass(pass)?.draw_calls += 1;
        self.backend.draw(pass, vertex_count, first_vertex);
        self.stats.draw_calls += 1;
        Ok(())
    }

    /// Records an indexed draw covering every index of `index_buffer` from `first_index`.
    /// ## Errors
    /// * `NoPipelineBound` / `MissingVertexBuffer` - As for [`draw`](Self::draw).
    /// * `WrongBufferKind` - If `index_buffer` is not an index buffer.
    /// * `IndexWidthMismatch` - If the pipeline expects another index width.
    /// * `OutOfBounds` - If `first_index` is past the last index.
    pub fn draw_indexed(
        &mut self,
        pass: RenderPassId,
        index_buffer: BufferId,
        first_index: u32,
        vertex_offset: i32,
    ) -> Result<(), CanopyError> {
        self.ensure_pass_context(pass)?;
        let pipeline = self.check_draw(pass)?;
        let (size, usage) = self.check_buffer(pass, index_buffer, BufferKind::Index)?;
        let Some(found) = usage.index_format() else {
            return Err(violation(CanopyError::WrongBufferKind {
                expected: BufferKind::Index,
                found: usage.kind(),
            }));
        };
        if let Some(expected) = pipeline.index_format {
            if expected != found {
                return Err(violation(CanopyError::IndexWidthMismatch { expected, found }));
            }
        }

        let total = size / found.size();
        if u64::from(first_index) >= total {
            return Err(violation(CanopyError::OutOfBounds(format!(
                "first index {first_index} is past the {total} indices of {index_buffer}"
            ))));
        }
        let index_count = u32::try_from(total - u64::from(first_index)).unwrap_or(u32::MAX);

        let active = self.active_pass(pass)?;
        active.index_buffers.push(index_buffer);
        active.draw_calls += 1;
        self.backend
            .draw_indexed(pass, index_buffer, first_index, index_count, vertex_offset);
        self.stats.draw_calls += 1;
        Ok(())
    }

    // --- Helpers ---

    fn skip_frame(&mut self, swapchain: SwapchainId) -> CanopyError {
        self.stats.frames_skipped += 1;
        log::debug!("Skipping frame: {swapchain} has no presentable image.");
        CanopyError::SwapchainUnavailable(swapchain)
    }

    fn ensure_pass_context(&self, pass: RenderPassId) -> Result<(), CanopyError> {
        self.registry
            .ensure_context(pass.context(), ResourceId::RenderPass(pass))
            .map_err(violation)
    }

    fn active_pass(&mut self, pass: RenderPassId) -> Result<&mut ActivePass, CanopyError> {
        self.passes.active_mut(pass).map_err(violation)
    }

    fn ensure_unused(&self, resource: ResourceId) -> Result<(), CanopyError> {
        match self.passes.user_of(resource) {
            Some(pass) => {
                log::debug!("{resource} is bound in {pass}.");
                Err(violation(CanopyError::ResourceInUse(resource)))
            }
            None => Ok(()),
        }
    }

    fn check_shader(
        &self,
        context: ContextId,
        shader: ShaderId,
        stage: ShaderStage,
    ) -> Result<(), CanopyError> {
        let record = self.registry.shader(shader).map_err(violation)?;
        if shader.context() != context {
            return Err(violation(CanopyError::ContextMismatch {
                resource: ResourceId::Shader(shader),
                expected: context,
                found: shader.context(),
            }));
        }
        if record.stage != stage {
            return Err(violation(CanopyError::InvalidDescriptor(format!(
                "{shader} is a {:?} shader, expected {stage:?}",
                record.stage
            ))));
        }
        Ok(())
    }

    fn check_buffer(
        &self,
        pass: RenderPassId,
        buffer: BufferId,
        expected: BufferKind,
    ) -> Result<(u64, BufferUsage), CanopyError> {
        let record = self.registry.buffer(buffer).map_err(violation)?;
        same_context(pass, ResourceId::Buffer(buffer))?;
        let found = record.usage.kind();
        if found != expected {
            return Err(violation(CanopyError::WrongBufferKind { expected, found }));
        }
        Ok((record.size, record.usage))
    }

    fn check_draw(&self, pass: RenderPassId) -> Result<PipelineRecord, CanopyError> {
        let active = self.passes.active(pass).map_err(violation)?;
        let pipeline = active
            .pipeline
            .ok_or(CanopyError::NoPipelineBound)
            .map_err(violation)?;
        let record = self.registry.pipeline(pipeline).map_err(violation)?;
        if let Some(slot) = record
            .required_slots
            .iter()
            .copied()
            .find(|slot| !active.vertex_buffers.contains_key(slot))
        {
            return Err(violation(CanopyError::MissingVertexBuffer { slot }));
        }
        Ok(record.clone())
    }
}

fn same_context(pass: RenderPassId, resource: ResourceId) -> Result<(), CanopyError> {
    match resource.context() {
        Some(found) if found != pass.context() => Err(violation(CanopyError::ContextMismatch {
            resource,
            expected: pass.context(),
            found,
        })),
        _ => Ok(()),
    }
}

impl Drop for GraphicsDevice {
    fn drop(&mut self) {
        for context in self.registry.live_contexts() {
            log::warn!("{context} was not destroyed before the device was dropped.");
            if let Ok(leaked) = self.registry.remove_context(context) {
                if leaked.resources() > 0 {
                    log::warn!("Releasing leaked objects of {context}: {leaked:?}");
                }
            }
            self.backend.destroy_context(context);
        }
    }
}
