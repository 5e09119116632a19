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

use canopy_core::platform::{Event, KeyCode, Modifiers, NativeWindowHandle, Platform};
use canopy_core::renderer::api::{ContextId, ResourceId, SwapchainId};
use canopy_core::{CanopyError, ErrorClass, WindowDescriptor, WindowId};
use canopy_infra::HeadlessDisplay;
use common::{harness, triangle_scene};

fn platform() -> (Platform, HeadlessDisplay) {
    let display = HeadlessDisplay::new();
    let platform = Platform::init(Box::new(display.backend())).unwrap();
    (platform, display)
}

#[test]
fn windows_are_released_on_destroy() {
    let (mut platform, display) = platform();
    assert!(display.is_connected());

    let first = platform
        .create_window(&WindowDescriptor::new("First", 320, 240))
        .unwrap();
    let second = platform
        .create_window(&WindowDescriptor::new("Second", 640, 480).hidden())
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(platform.window_count(), 2);
    assert_eq!(display.title(second).as_deref(), Some("Second"));
    assert_eq!(display.is_visible(first), Some(true));
    assert_eq!(display.is_visible(second), Some(false));
    assert_eq!(platform.size(second), Ok((640, 480)));

    platform.show(second).unwrap();
    assert_eq!(display.is_visible(second), Some(true));
    platform.hide(first).unwrap();
    assert_eq!(display.is_visible(first), Some(false));

    platform.destroy_window(first).unwrap();
    platform.destroy_window(second).unwrap();
    assert_eq!(platform.window_count(), 0);
    assert_eq!(display.live_windows(), 0);
    assert_eq!(display.windows_created(), 2);
    assert_eq!(display.windows_destroyed(), 2);
}

#[test]
fn destroyed_and_unknown_windows_are_invalid() {
    let (mut platform, _display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Gone", 100, 100))
        .unwrap();
    platform.destroy_window(window).unwrap();

    let invalid = CanopyError::InvalidHandle(ResourceId::Window(window));
    assert_eq!(platform.destroy_window(window), Err(invalid.clone()));
    assert_eq!(platform.should_close(window), Err(invalid.clone()));
    assert_eq!(platform.poll_event(window), Err(invalid.clone()));
    assert_eq!(platform.size(window), Err(invalid.clone()));
    assert!(platform.native_handle(window).is_err());

    let never = WindowId(42);
    assert_eq!(
        platform.show(never),
        Err(CanopyError::InvalidHandle(ResourceId::Window(never)))
    );
}

#[test]
fn window_sizes_are_validated() {
    let (mut platform, display) = platform();
    for (width, height) in [(0, 600), (800, 0), (u32::MAX, 600)] {
        assert!(matches!(
            platform.create_window(&WindowDescriptor::new("Bad", width, height)),
            Err(CanopyError::InvalidDescriptor(_))
        ));
    }
    assert_eq!(display.windows_created(), 0);
}

#[test]
fn request_close_only_flags_the_window() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    let platform = h.presentation.platform_mut();

    assert_eq!(platform.should_close(scene.window), Ok(false));
    platform.request_close(scene.window).unwrap();
    assert_eq!(platform.should_close(scene.window), Ok(true));
    assert_eq!(platform.swapchain(scene.window), Ok(Some(scene.swapchain)));
    assert_eq!(h.display.live_windows(), 1);
    assert_eq!(h.gpu.live_swapchains(), 1);
}

#[test]
fn close_button_is_only_an_event() {
    let (mut platform, display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Closable", 200, 200))
        .unwrap();

    display.click_close(window);
    platform.poll_events().unwrap();
    assert_eq!(platform.poll_event(window), Ok(Some(Event::WindowClose)));
    assert_eq!(platform.should_close(window), Ok(false));
}

#[test]
fn poll_event_is_empty_until_pumped() {
    let (mut platform, display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Quiet", 200, 200))
        .unwrap();

    for _ in 0..3 {
        assert_eq!(platform.poll_event(window), Ok(None));
    }
    display.press_key(window, 53, Modifiers::NONE);
    assert_eq!(platform.poll_event(window), Ok(None));

    platform.poll_events().unwrap();
    let event = platform.poll_event(window).unwrap();
    assert_eq!(event.as_ref().and_then(Event::key).map(|k| k.key), Some(KeyCode::Escape));
    assert_eq!(platform.poll_event(window), Ok(None));
    assert_eq!(display.pumps(), 1);
}

#[test]
fn events_drain_in_arrival_order() {
    let (mut platform, display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Busy", 200, 200))
        .unwrap();
    let other = platform
        .create_window(&WindowDescriptor::new("Idle", 200, 200))
        .unwrap();

    display.press_key(window, 0, Modifiers::SHIFT | Modifiers::CONTROL);
    display.release_key(window, 0, Modifiers::NONE);
    display.resize(window, 300, 150);
    platform.poll_events().unwrap();

    let events: Vec<Event> = platform.events(window).unwrap().collect();
    assert_eq!(events.len(), 3);
    match &events[0] {
        Event::KeyDown(key) => {
            assert_eq!(key.key, KeyCode::A);
            assert!(key.modifiers.contains(Modifiers::SHIFT));
            assert!(key.modifiers.contains(Modifiers::CONTROL));
            assert!(!key.modifiers.contains(Modifiers::ALT));
            assert_eq!(key.scancode, Some(0));
        }
        other => panic!("expected a key press, got {other:?}"),
    }
    assert!(matches!(&events[1], Event::KeyUp(key) if key.key == KeyCode::A));
    assert_eq!(
        events[2],
        Event::Resized {
            width: 300,
            height: 150
        }
    );
    assert_eq!(platform.size(window), Ok((300, 150)));

    assert_eq!(platform.events(window).unwrap().count(), 0);
    assert_eq!(platform.events(other).unwrap().count(), 0);
}

#[test]
fn unmapped_keys_keep_their_native_code() {
    let (mut platform, display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Keys", 200, 200))
        .unwrap();

    display.press_key(window, 0x7F, Modifiers::NONE);
    platform.poll_events().unwrap();
    let event = platform.poll_event(window).unwrap();
    let key = event.as_ref().and_then(Event::key).copied();
    assert_eq!(key.map(|k| k.key), Some(KeyCode::Unknown));
    assert_eq!(key.and_then(|k| k.scancode), Some(0x7F));
}

#[test]
fn native_handles_are_distinct_per_window() {
    let (mut platform, _display) = platform();
    let a = platform
        .create_window(&WindowDescriptor::new("A", 100, 100))
        .unwrap();
    let b = platform
        .create_window(&WindowDescriptor::new("B", 100, 100))
        .unwrap();

    let ha = platform.native_handle(a).unwrap();
    let hb = platform.native_handle(b).unwrap();
    assert!(matches!(ha, NativeWindowHandle::Headless(_)));
    assert_ne!(ha, hb);
}

#[test]
fn shutdown_is_idempotent_and_final() {
    let (mut platform, display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Leaked", 100, 100))
        .unwrap();

    platform.shutdown();
    assert!(!platform.is_active());
    assert!(!display.is_connected());
    assert_eq!(display.live_windows(), 0);
    assert_eq!(platform.window_count(), 0);

    platform.shutdown();
    assert_eq!(display.windows_destroyed(), 1);

    assert!(matches!(
        platform.poll_events(),
        Err(CanopyError::PlatformUnavailable(_))
    ));
    assert!(matches!(
        platform.create_window(&WindowDescriptor::default()),
        Err(CanopyError::PlatformUnavailable(_))
    ));
    assert!(matches!(
        platform.should_close(window),
        Err(CanopyError::PlatformUnavailable(_))
    ));
}

#[test]
fn dropping_the_platform_shuts_it_down() {
    let display = HeadlessDisplay::new();
    {
        let mut platform = Platform::init(Box::new(display.backend())).unwrap();
        platform
            .create_window(&WindowDescriptor::new("Dropped", 100, 100))
            .unwrap();
        assert_eq!(display.live_windows(), 1);
    }
    assert_eq!(display.live_windows(), 0);
    assert!(!display.is_connected());
}

#[test]
fn unreachable_display_fails_init() {
    let display = HeadlessDisplay::new();
    display.set_available(false);

    let err = Platform::init(Box::new(display.backend())).unwrap_err();
    assert!(matches!(err, CanopyError::PlatformUnavailable(_)));
    assert_eq!(err.class(), ErrorClass::Initialization);
    assert!(!display.is_connected());

    display.set_available(true);
    assert!(Platform::init(Box::new(display.backend())).is_ok());
}

#[test]
fn window_with_swapchain_cannot_be_destroyed() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);

    assert_eq!(
        h.presentation.platform_mut().destroy_window(scene.window),
        Err(CanopyError::ResourceInUse(ResourceId::Window(scene.window)))
    );
    assert_eq!(
        h.presentation.bind_swapchain(scene.window, scene.context, false),
        Err(CanopyError::ResourceInUse(ResourceId::Window(scene.window)))
    );

    h.presentation.destroy_window(scene.window).unwrap();
    assert_eq!(h.display.live_windows(), 0);
    assert_eq!(h.gpu.live_swapchains(), 0);
    assert_eq!(h.presentation.platform().window_count(), 0);
}

#[test]
fn swapchain_starts_at_the_window_size() {
    let mut h = harness();
    let scene = triangle_scene(&mut h);
    assert_eq!(
        h.presentation.device().swapchain_size(scene.swapchain),
        Ok((800, 600))
    );
    assert_eq!(h.gpu.swapchain_size(scene.swapchain), Some((800, 600)));
}

#[test]
fn window_records_at_most_one_swapchain() {
    let (mut platform, _display) = platform();
    let window = platform
        .create_window(&WindowDescriptor::new("Bound", 100, 100))
        .unwrap();
    let first = SwapchainId::new(ContextId(0), 0);
    let second = SwapchainId::new(ContextId(0), 1);

    platform.set_swapchain(window, Some(first)).unwrap();
    assert_eq!(
        platform.set_swapchain(window, Some(second)),
        Err(CanopyError::ResourceInUse(ResourceId::Window(window)))
    );
    assert_eq!(platform.swapchain(window), Ok(Some(first)));

    platform.set_swapchain(window, None).unwrap();
    platform.set_swapchain(window, Some(second)).unwrap();
    assert_eq!(platform.swapchain(window), Ok(Some(second)));
    platform.set_swapchain(window, None).unwrap();
}
