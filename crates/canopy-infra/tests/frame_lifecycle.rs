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

mod common;

use canopy_core::renderer::api::*;
use canopy_core::renderer::PassState;
use canopy_core::CanopyError;
use canopy_infra::RecordedCommand;
use common::{clear_pass, harness, triangle_scene};

#[test]
fn triangle_frame_presents_exactly_once() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    device.set_pipeline(pass, scene.pipeline).unwrap();
    device.set_vertex_buffer(pass, 0, scene.vertex_buffer).unwrap();
    device.draw(pass, 3, 0).unwrap();
    device.end_render_pass(pass).unwrap();
    device.present(scene.swapchain).unwrap();

    assert_eq!(h.gpu.present_count(), 1);
    assert_eq!(
        h.gpu.commands(),
        vec![
            RecordedCommand::BeginPass {
                pass,
                action: clear_pass()
            },
            RecordedCommand::SetPipeline {
                pass,
                pipeline: scene.pipeline
            },
            RecordedCommand::SetVertexBuffer {
                pass,
                slot: 0,
                buffer: scene.vertex_buffer
            },
            RecordedCommand::Draw {
                pass,
                vertex_count: 3,
                first_vertex: 0
            },
            RecordedCommand::EndPass { pass },
            RecordedCommand::Present {
                swapchain: scene.swapchain
            },
        ]
    );

    let stats = h.presentation.device().stats();
    assert_eq!(stats.frames_presented, 1);
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.frames_skipped, 0);
}

#[test]
fn passes_can_be_repeated_and_ended_ids_stay_dead() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let mut ended = Vec::new();
    for _ in 0..3 {
        let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
        assert!(!ended.contains(&pass));
        device.end_render_pass(pass).unwrap();
        device.present(scene.swapchain).unwrap();
        ended.push(pass);
    }

    for pass in ended {
        assert_eq!(
            device.end_render_pass(pass),
            Err(CanopyError::PassAlreadyEnded(pass))
        );
        assert_eq!(
            device.set_pipeline(pass, scene.pipeline),
            Err(CanopyError::PassAlreadyEnded(pass))
        );
        assert_eq!(device.draw(pass, 3, 0), Err(CanopyError::PassAlreadyEnded(pass)));
    }
    assert_eq!(h.gpu.present_count(), 3);
}

#[test]
fn several_passes_may_precede_one_present() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let first = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    device.end_render_pass(first).unwrap();
    let second = device.begin_render_pass(scene.swapchain, &PassAction::load()).unwrap();
    assert_eq!(
        device.pass_state(scene.swapchain),
        Some(PassState::Recording(second))
    );
    device.end_render_pass(second).unwrap();
    device.present(scene.swapchain).unwrap();
    assert_eq!(device.pass_state(scene.swapchain), Some(PassState::Idle));
}

#[test]
fn begin_while_recording_is_rejected() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    assert_eq!(
        device.begin_render_pass(scene.swapchain, &clear_pass()),
        Err(CanopyError::PassAlreadyActive {
            swapchain: scene.swapchain,
            active: pass
        })
    );
    // The original pass is untouched.
    device.end_render_pass(pass).unwrap();
}

#[test]
fn present_requires_an_ended_pass() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    assert_eq!(
        device.present(scene.swapchain),
        Err(CanopyError::NothingToPresent(scene.swapchain))
    );
    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    assert_eq!(
        device.present(scene.swapchain),
        Err(CanopyError::PassNotEnded(scene.swapchain))
    );
    device.end_render_pass(pass).unwrap();
    device.present(scene.swapchain).unwrap();
    assert_eq!(
        device.present(scene.swapchain),
        Err(CanopyError::NothingToPresent(scene.swapchain))
    );
    assert_eq!(h.gpu.present_count(), 1);
}

#[test]
fn draw_without_pipeline_fails() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    device.set_vertex_buffer(pass, 0, scene.vertex_buffer).unwrap();
    assert_eq!(device.draw(pass, 3, 0), Err(CanopyError::NoPipelineBound));

    let index_data: [u16; 3] = [0, 1, 2];
    let indices = device
        .create_buffer(
            scene.context,
            &BufferDescriptor::index(bytemuck::cast_slice(&index_data), IndexFormat::Uint16),
        )
        .unwrap();
    assert_eq!(
        device.draw_indexed(pass, indices, 0, 0),
        Err(CanopyError::NoPipelineBound)
    );
    assert!(!h
        .gpu
        .commands()
        .iter()
        .any(|c| matches!(c, RecordedCommand::Draw { .. } | RecordedCommand::DrawIndexed { .. })));
}

#[test]
fn draw_needs_every_slot_the_pipeline_reads() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    device.set_pipeline(pass, scene.pipeline).unwrap();
    assert_eq!(
        device.draw(pass, 3, 0),
        Err(CanopyError::MissingVertexBuffer { slot: 0 })
    );
    device.set_vertex_buffer(pass, 0, scene.vertex_buffer).unwrap();
    assert!(device.draw(pass, 3, 0).is_ok());
}

#[test]
fn minimized_window_skips_frames_until_restored() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);

    h.display.resize(scene.window, 0, 0);
    h.presentation.platform_mut().poll_events().unwrap();
    assert_eq!(h.presentation.handle_resize(scene.window).unwrap(), (0, 0));

    let device = h.presentation.device_mut();
    let err = device
        .begin_render_pass(scene.swapchain, &clear_pass())
        .unwrap_err();
    assert_eq!(err, CanopyError::SwapchainUnavailable(scene.swapchain));
    assert!(err.is_recoverable());
    assert_eq!(device.pass_state(scene.swapchain), Some(PassState::Idle));
    assert_eq!(device.stats().frames_skipped, 1);

    h.display.resize(scene.window, 1024, 768);
    h.presentation.platform_mut().poll_events().unwrap();
    h.presentation.handle_resize(scene.window).unwrap();
    assert_eq!(h.gpu.swapchain_size(scene.swapchain), Some((1024, 768)));

    let device = h.presentation.device_mut();
    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    device.end_render_pass(pass).unwrap();
    device.present(scene.swapchain).unwrap();
}

#[test]
fn occluded_swapchain_reports_unavailable() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    h.gpu.set_swapchain_occluded(scene.swapchain, true);

    let device = h.presentation.device_mut();
    assert_eq!(
        device.begin_render_pass(scene.swapchain, &clear_pass()),
        Err(CanopyError::SwapchainUnavailable(scene.swapchain))
    );
    assert_eq!(device.stats().frames_skipped, 1);

    h.gpu.set_swapchain_occluded(scene.swapchain, false);
    let device = h.presentation.device_mut();
    assert!(device.begin_render_pass(scene.swapchain, &clear_pass()).is_ok());
}

#[test]
fn resize_is_refused_mid_pass() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let pass = device.begin_render_pass(scene.swapchain, &clear_pass()).unwrap();
    assert_eq!(
        device.resize_swapchain(scene.swapchain, 640, 480),
        Err(CanopyError::ResourceInUse(ResourceId::Swapchain(
            scene.swapchain
        )))
    );
    device.end_render_pass(pass).unwrap();
    device.resize_swapchain(scene.swapchain, 640, 480).unwrap();
    assert_eq!(device.swapchain_size(scene.swapchain), Ok((640, 480)));
}

#[test]
fn invalid_depth_clear_is_rejected() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let device = h.presentation.device_mut();

    let action = PassAction::clear(ClearColor::BLACK, 1.5);
    assert!(matches!(
        device.begin_render_pass(scene.swapchain, &action),
        Err(CanopyError::InvalidDescriptor(_))
    ));
    assert_eq!(device.pass_state(scene.swapchain), Some(PassState::Idle));
}
