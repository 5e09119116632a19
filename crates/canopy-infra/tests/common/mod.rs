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

#![allow(dead_code)]

use bytemuck::{Pod, Zeroable};
use canopy_core::backend::{BackendFactory, GraphicsApiKind, WindowSystemKind};
use canopy_core::platform::{WindowDescriptor, WindowId};
use canopy_core::renderer::api::*;
use canopy_core::Presentation;
use canopy_infra::{HeadlessDisplay, HeadlessGpu};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

pub const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [0.0, 0.5, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
    },
];

pub const VERTEX_SOURCE: &str = "void main() { gl_Position = vec4(position, 1.0); }";
pub const FRAGMENT_SOURCE: &str = "void main() { color = vec4(1.0); }";

/// A headless presentation plus handles to inspect the fake display and GPU.
pub struct Harness {
    pub presentation: Presentation,
    pub display: HeadlessDisplay,
    pub gpu: HeadlessGpu,
}

pub fn harness() -> Harness {
    harness_with(GraphicsCapabilities::BASELINE)
}

pub fn harness_with(capabilities: GraphicsCapabilities) -> Harness {
    let display = HeadlessDisplay::new();
    let gpu = HeadlessGpu::with_capabilities(capabilities);

    let mut factory = BackendFactory::new();
    let window_display = display.clone();
    factory.register_window_backend(WindowSystemKind::Headless, move || {
        Ok(Box::new(window_display.backend()))
    });
    let backend_gpu = gpu.clone();
    factory.register_graphics_backend(GraphicsApiKind::Headless, move || {
        Ok(Box::new(backend_gpu.backend()))
    });

    let presentation = factory
        .create(WindowSystemKind::Headless, GraphicsApiKind::Headless)
        .expect("headless backends are always available");
    Harness {
        presentation,
        display,
        gpu,
    }
}

/// Everything needed to draw the triangle into one window.
pub struct Scene {
    pub window: WindowId,
    pub context: ContextId,
    pub swapchain: SwapchainId,
    pub vertex_shader: ShaderId,
    pub fragment_shader: ShaderId,
    pub pipeline: PipelineId,
    pub vertex_buffer: BufferId,
}

pub fn vertex_layout() -> [VertexAttribute; 1] {
    [VertexAttribute::new(VertexFormat::Float3, 0, 0)]
}

pub fn triangle_scene(harness: &mut Harness) -> Scene {
    let presentation = &mut harness.presentation;
    let window = presentation
        .platform_mut()
        .create_window(&WindowDescriptor::new("Demo", 800, 600))
        .unwrap();
    let context = presentation.device_mut().create_context().unwrap();
    let swapchain = presentation.bind_swapchain(window, context, true).unwrap();

    let device = presentation.device_mut();
    let vertex_shader = device
        .create_shader(context, &ShaderDescriptor::new(VERTEX_SOURCE, ShaderStage::Vertex))
        .unwrap();
    let fragment_shader = device
        .create_shader(
            context,
            &ShaderDescriptor::new(FRAGMENT_SOURCE, ShaderStage::Fragment),
        )
        .unwrap();
    let layout = vertex_layout();
    let pipeline = device
        .create_pipeline(
            context,
            &PipelineDescriptor::new(vertex_shader, fragment_shader)
                .with_layout(&layout, std::mem::size_of::<Vertex>() as u64),
        )
        .unwrap();
    let vertex_buffer = device
        .create_buffer(
            context,
            &BufferDescriptor::vertex(bytemuck::cast_slice(&TRIANGLE)),
        )
        .unwrap();

    Scene {
        window,
        context,
        swapchain,
        vertex_shader,
        fragment_shader,
        pipeline,
        vertex_buffer,
    }
}

pub fn clear_pass() -> PassAction {
    PassAction::clear(ClearColor::new(0.1, 0.1, 0.1, 1.0), 1.0)
}
