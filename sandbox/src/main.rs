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

//! Opens a window through the backend factory and draws a triangle every frame.
//!
//! Usage: `sandbox [config.ron] [frames]`. Without a configuration the headless
//! backends are used and the loop stops after 120 frames.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use canopy_core::backend::WindowSystemKind;
use canopy_core::platform::{Event, KeyCode};
use canopy_core::renderer::api::*;
use canopy_core::{CanopyError, GraphicsDevice, PresentationConfig};
use std::time::Duration;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

const VERTEX_SHADER: &str = r#"
#version 450
layout(location = 0) in vec3 position;
layout(location = 1) in vec3 color;
layout(location = 0) out vec3 v_color;
void main() {
    v_color = color;
    gl_Position = vec4(position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"
#version 450
layout(location = 0) in vec3 v_color;
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(v_color, 1.0);
}
"#;

const HEADLESS_FRAMES: u64 = 120;

struct Scene {
    vertex_buffer: BufferId,
    vertex_shader: ShaderId,
    fragment_shader: ShaderId,
    pipeline: PipelineId,
}

impl Scene {
    fn create(device: &mut GraphicsDevice, context: ContextId) -> Result<Self> {
        let vertex_buffer = device.create_buffer(
            context,
            &BufferDescriptor::vertex(bytemuck::cast_slice(&TRIANGLE)).with_label("triangle"),
        )?;
        let vertex_shader =
            device.create_shader(context, &ShaderDescriptor::new(VERTEX_SHADER, ShaderStage::Vertex))?;
        let fragment_shader = device.create_shader(
            context,
            &ShaderDescriptor::new(FRAGMENT_SHADER, ShaderStage::Fragment),
        )?;

        let attributes = [
            VertexAttribute::new(VertexFormat::Float3, 0, 0),
            VertexAttribute::new(VertexFormat::Float3, 12, 0),
        ];
        let pipeline = device.create_pipeline(
            context,
            &PipelineDescriptor::new(vertex_shader, fragment_shader)
                .with_layout(&attributes, std::mem::size_of::<Vertex>() as u64),
        )?;

        Ok(Self {
            vertex_buffer,
            vertex_shader,
            fragment_shader,
            pipeline,
        })
    }

    fn render(
        &self,
        device: &mut GraphicsDevice,
        swapchain: SwapchainId,
        action: &PassAction,
    ) -> Result<(), CanopyError> {
        let pass = device.begin_render_pass(swapchain, action)?;
        device.set_pipeline(pass, self.pipeline)?;
        device.set_vertex_buffer(pass, 0, self.vertex_buffer)?;
        device.draw(pass, TRIANGLE.len() as u32, 0)?;
        device.end_render_pass(pass)?;
        device.present(swapchain)
    }

    fn destroy(self, device: &mut GraphicsDevice) -> Result<()> {
        device.destroy_pipeline(self.pipeline)?;
        device.destroy_shader(self.vertex_shader)?;
        device.destroy_shader(self.fragment_shader)?;
        device.destroy_buffer(self.vertex_buffer)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PresentationConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => PresentationConfig::default(),
    };
    let frame_limit = match args.next() {
        Some(frames) => Some(frames.parse::<u64>().context("frame count must be a number")?),
        None if config.window_system == WindowSystemKind::Headless => Some(HEADLESS_FRAMES),
        None => None,
    };

    let factory = canopy_infra::default_factory();
    let mut presentation = factory
        .create_from_config(&config)
        .context("failed to create the presentation backends")?;

    let window = presentation.platform_mut().create_window(&config.window)?;
    let context = presentation.device_mut().create_context()?;
    let swapchain = presentation.bind_swapchain(window, context, config.vsync)?;
    let scene = Scene::create(presentation.device_mut(), context)?;
    let action = PassAction::clear(config.clear_color, 1.0);

    let mut frame = 0u64;
    loop {
        presentation.platform_mut().poll_events()?;
        let events: Vec<Event> = presentation.platform_mut().events(window)?.collect();
        let mut resized = false;
        for event in events {
            match event {
                Event::WindowClose => presentation.platform_mut().request_close(window)?,
                Event::KeyDown(key) if key.key == KeyCode::Escape => {
                    presentation.platform_mut().request_close(window)?
                }
                Event::Resized { .. } => resized = true,
                other => log::debug!("Event: {other:?}"),
            }
        }
        if resized {
            let (width, height) = presentation.handle_resize(window)?;
            log::info!("Window resized to {width}x{height}.");
        }
        if presentation.platform().should_close(window)? {
            log::info!("Close requested, leaving the frame loop.");
            break;
        }

        match scene.render(presentation.device_mut(), swapchain, &action) {
            Ok(()) => {}
            Err(CanopyError::SwapchainUnavailable(_)) => {}
            Err(err) => return Err(err.into()),
        }

        frame += 1;
        if frame_limit.is_some_and(|limit| frame >= limit) {
            break;
        }
        if config.window_system != WindowSystemKind::Headless {
            std::thread::sleep(Duration::from_millis(16));
        }
    }

    scene.destroy(presentation.device_mut())?;
    presentation.destroy_window(window)?;
    presentation.device_mut().destroy_context(context)?;

    let stats = presentation.device().stats();
    log::info!(
        "Ran {frame} frame(s): {} presented, {} skipped, {} draw call(s).",
        stats.frames_presented,
        stats.frames_skipped,
        stats.draw_calls
    );
    Ok(())
}
