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

//! Tracks every context and every object created from it.
//!
//! The registry is the single source of truth for handle validity. It never frees
//! anything on its own: ordering is the caller's job, and the registry only refuses
//! operations that would break it.

use crate::error::CanopyError;
use crate::platform::NativeWindowHandle;
use crate::renderer::api::*;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Per-context bookkeeping.
#[derive(Debug, Clone)]
pub struct ContextRecord {
    /// Capabilities reported by the backend when the context was created.
    pub capabilities: GraphicsCapabilities,
    next_index: u64,
}

/// A live swapchain.
#[derive(Debug, Clone)]
pub struct SwapchainRecord {
    /// The window the swapchain presents into.
    pub native_handle: NativeWindowHandle,
    /// Current presentation width.
    pub width: u32,
    /// Current presentation height.
    pub height: u32,
    /// Whether presentation waits for vertical blank.
    pub vsync: bool,
}

impl SwapchainRecord {
    /// `true` when both dimensions are non-zero.
    pub fn is_presentable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl From<&SwapchainDescriptor> for SwapchainRecord {
    fn from(desc: &SwapchainDescriptor) -> Self {
        Self {
            native_handle: desc.native_handle,
            width: desc.width,
            height: desc.height,
            vsync: desc.vsync,
        }
    }
}

/// A live buffer.
#[derive(Debug, Clone)]
pub struct BufferRecord {
    /// Debug label, if any.
    pub label: Option<String>,
    /// How the buffer is bound.
    pub usage: BufferUsage,
    /// Size in bytes.
    pub size: u64,
}

/// A live shader.
#[derive(Debug, Clone)]
pub struct ShaderRecord {
    /// Stage the shader runs in.
    pub stage: ShaderStage,
    /// Number of live pipelines referencing this shader.
    pub pipeline_refs: usize,
}

/// A live pipeline.
#[derive(Debug, Clone)]
pub struct PipelineRecord {
    /// Referenced vertex shader.
    pub vertex_shader: ShaderId,
    /// Referenced fragment shader.
    pub fragment_shader: ShaderId,
    /// Vertex buffer slots that must be bound before a draw.
    pub required_slots: Vec<u32>,
    /// Index width expected by indexed draws, if constrained.
    pub index_format: Option<IndexFormat>,
}

/// Number of live objects of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryCounts {
    /// Live contexts.
    pub contexts: usize,
    /// Live swapchains.
    pub swapchains: usize,
    /// Live buffers.
    pub buffers: usize,
    /// Live shaders.
    pub shaders: usize,
    /// Live pipelines.
    pub pipelines: usize,
}

impl RegistryCounts {
    /// Total number of objects, contexts excluded.
    pub fn resources(&self) -> usize {
        self.swapchains + self.buffers + self.shaders + self.pipelines
    }
}

/// The resource registry of one graphics device.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    contexts: HashMap<ContextId, ContextRecord>,
    destroyed_contexts: HashSet<ContextId>,
    next_context: u64,
    swapchains: HashMap<SwapchainId, SwapchainRecord>,
    buffers: HashMap<BufferId, BufferRecord>,
    shaders: HashMap<ShaderId, ShaderRecord>,
    pipelines: HashMap<PipelineId, PipelineRecord>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the id of the next context. Nothing is recorded until
    /// [`insert_context`](Self::insert_context).
    pub fn allocate_context(&mut self) -> ContextId {
        let id = ContextId(self.next_context);
        self.next_context += 1;
        id
    }

    /// Records a context the backend has created.
    pub fn insert_context(&mut self, id: ContextId, capabilities: GraphicsCapabilities) {
        self.contexts.insert(
            id,
            ContextRecord {
                capabilities,
                next_index: 0,
            },
        );
    }

    /// Fails with `StaleContext` if `context` was destroyed, `InvalidHandle(resource)`
    /// if it never existed.
    pub fn ensure_context(&self, context: ContextId, resource: ResourceId) -> Result<(), CanopyError> {
        if self.destroyed_contexts.contains(&context) {
            return Err(CanopyError::StaleContext(context));
        }
        if !self.contexts.contains_key(&context) {
            return Err(CanopyError::InvalidHandle(resource));
        }
        Ok(())
    }

    /// Looks up a live context.
    pub fn context(&self, id: ContextId) -> Result<&ContextRecord, CanopyError> {
        self.ensure_context(id, ResourceId::Context(id))?;
        self.contexts
            .get(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Context(id)))
    }

    /// Capabilities of a live context.
    pub fn capabilities(&self, id: ContextId) -> Result<GraphicsCapabilities, CanopyError> {
        Ok(self.context(id)?.capabilities)
    }

    /// Ids of every live context.
    pub fn live_contexts(&self) -> Vec<ContextId> {
        let mut ids: Vec<ContextId> = self.contexts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Hands out the next per-context object index. Indices are never reused.
    pub fn next_index(&mut self, context: ContextId) -> Result<u64, CanopyError> {
        self.ensure_context(context, ResourceId::Context(context))?;
        let record = self
            .contexts
            .get_mut(&context)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Context(context)))?;
        let index = record.next_index;
        record.next_index += 1;
        Ok(index)
    }

    /// Marks a context destroyed and forgets every object created from it.
    ///
    /// Returns what was still alive, so the caller can report leaks. Later use of
    /// any of those handles fails with `StaleContext`.
    pub fn remove_context(&mut self, id: ContextId) -> Result<RegistryCounts, CanopyError> {
        self.context(id)?;
        self.contexts.remove(&id);
        self.destroyed_contexts.insert(id);

        Ok(RegistryCounts {
            contexts: 0,
            swapchains: drain_context(&mut self.swapchains, id, |k| k.context()),
            buffers: drain_context(&mut self.buffers, id, |k| k.context()),
            shaders: drain_context(&mut self.shaders, id, |k| k.context()),
            pipelines: drain_context(&mut self.pipelines, id, |k| k.context()),
        })
    }

    /// Records a new swapchain.
    pub fn insert_swapchain(&mut self, id: SwapchainId, record: SwapchainRecord) {
        self.swapchains.insert(id, record);
    }

    /// Looks up a live swapchain.
    pub fn swapchain(&self, id: SwapchainId) -> Result<&SwapchainRecord, CanopyError> {
        self.lookup(&self.swapchains, id, id.context(), ResourceId::Swapchain(id))
    }

    /// Looks up a live swapchain for mutation.
    pub fn swapchain_mut(&mut self, id: SwapchainId) -> Result<&mut SwapchainRecord, CanopyError> {
        self.ensure_context(id.context(), ResourceId::Swapchain(id))?;
        self.swapchains
            .get_mut(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Swapchain(id)))
    }

    /// Forgets a swapchain.
    pub fn remove_swapchain(&mut self, id: SwapchainId) -> Result<SwapchainRecord, CanopyError> {
        self.swapchain(id)?;
        self.swapchains
            .remove(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Swapchain(id)))
    }

    /// Records a new buffer.
    pub fn insert_buffer(&mut self, id: BufferId, record: BufferRecord) {
        self.buffers.insert(id, record);
    }

    /// Looks up a live buffer.
    pub fn buffer(&self, id: BufferId) -> Result<&BufferRecord, CanopyError> {
        self.lookup(&self.buffers, id, id.context(), ResourceId::Buffer(id))
    }

    /// Forgets a buffer.
    pub fn remove_buffer(&mut self, id: BufferId) -> Result<BufferRecord, CanopyError> {
        self.buffer(id)?;
        self.buffers
            .remove(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Buffer(id)))
    }

    /// Records a new shader.
    pub fn insert_shader(&mut self, id: ShaderId, stage: ShaderStage) {
        self.shaders.insert(
            id,
            ShaderRecord {
                stage,
                pipeline_refs: 0,
            },
        );
    }

    /// Looks up a live shader.
    pub fn shader(&self, id: ShaderId) -> Result<&ShaderRecord, CanopyError> {
        self.lookup(&self.shaders, id, id.context(), ResourceId::Shader(id))
    }

    /// Forgets a shader. Fails with `ResourceInUse` while a live pipeline references it.
    pub fn remove_shader(&mut self, id: ShaderId) -> Result<ShaderRecord, CanopyError> {
        if self.shader(id)?.pipeline_refs > 0 {
            return Err(CanopyError::ResourceInUse(ResourceId::Shader(id)));
        }
        self.shaders
            .remove(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Shader(id)))
    }

    /// Records a new pipeline and takes a reference on both of its shaders.
    pub fn insert_pipeline(&mut self, id: PipelineId, record: PipelineRecord) {
        for shader in [record.vertex_shader, record.fragment_shader] {
            if let Some(entry) = self.shaders.get_mut(&shader) {
                entry.pipeline_refs += 1;
            }
        }
        self.pipelines.insert(id, record);
    }

    /// Looks up a live pipeline.
    pub fn pipeline(&self, id: PipelineId) -> Result<&PipelineRecord, CanopyError> {
        self.lookup(&self.pipelines, id, id.context(), ResourceId::Pipeline(id))
    }

    /// Forgets a pipeline and releases its shader references.
    pub fn remove_pipeline(&mut self, id: PipelineId) -> Result<PipelineRecord, CanopyError> {
        self.pipeline(id)?;
        let record = self
            .pipelines
            .remove(&id)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Pipeline(id)))?;
        for shader in [record.vertex_shader, record.fragment_shader] {
            if let Some(entry) = self.shaders.get_mut(&shader) {
                entry.pipeline_refs = entry.pipeline_refs.saturating_sub(1);
            }
        }
        Ok(record)
    }

    /// Number of live objects of each kind.
    pub fn counts(&self) -> RegistryCounts {
        RegistryCounts {
            contexts: self.contexts.len(),
            swapchains: self.swapchains.len(),
            buffers: self.buffers.len(),
            shaders: self.shaders.len(),
            pipelines: self.pipelines.len(),
        }
    }

    fn lookup<'a, K: Eq + Hash, V>(
        &self,
        map: &'a HashMap<K, V>,
        key: K,
        context: ContextId,
        resource: ResourceId,
    ) -> Result<&'a V, CanopyError> {
        self.ensure_context(context, resource)?;
        map.get(&key).ok_or(CanopyError::InvalidHandle(resource))
    }
}

fn drain_context<K: Copy + Eq + Hash, V>(
    map: &mut HashMap<K, V>,
    context: ContextId,
    owner: impl Fn(&K) -> ContextId,
) -> usize {
    let before = map.len();
    map.retain(|key, _| owner(key) != context);
    before - map.len()
}
