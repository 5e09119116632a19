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

use canopy_core::backend::{BackendFactory, GraphicsApiKind, WindowSystemKind};
use canopy_core::{CanopyError, PresentationConfig, WindowDescriptor};
use canopy_infra::{default_factory, HeadlessDisplay, HeadlessGpu};

#[test]
fn default_factory_builds_the_headless_pair() {
    let factory = default_factory();
    assert!(factory.supports(WindowSystemKind::Headless, GraphicsApiKind::Headless));
    assert!(factory.window_systems().contains(&WindowSystemKind::Headless));
    assert_eq!(factory.graphics_apis(), vec![GraphicsApiKind::Headless]);

    let mut presentation = factory
        .create(WindowSystemKind::Headless, GraphicsApiKind::Headless)
        .unwrap();
    assert_eq!(presentation.platform().kind(), WindowSystemKind::Headless);
    assert_eq!(presentation.device().kind(), GraphicsApiKind::Headless);

    let window = presentation
        .platform_mut()
        .create_window(&WindowDescriptor::new("Factory", 64, 64))
        .unwrap();
    let context = presentation.device_mut().create_context().unwrap();
    presentation.bind_swapchain(window, context, true).unwrap();
    presentation.destroy_window(window).unwrap();
    presentation.device_mut().destroy_context(context).unwrap();
}

#[cfg(feature = "platform")]
#[test]
fn winit_is_registered_with_the_platform_feature() {
    let factory = default_factory();
    assert!(factory.supports(WindowSystemKind::Winit, GraphicsApiKind::Headless));
    assert!(!factory.supports(WindowSystemKind::Winit, GraphicsApiKind::Vulkan));
}

#[test]
fn incompatible_pairs_are_unavailable() {
    let factory = default_factory();
    assert!(!factory.is_compatible(WindowSystemKind::Headless, GraphicsApiKind::Metal));

    let err = factory
        .create(WindowSystemKind::Headless, GraphicsApiKind::Metal)
        .unwrap_err();
    assert_eq!(
        err,
        CanopyError::BackendUnavailable {
            window_system: WindowSystemKind::Headless,
            graphics_api: GraphicsApiKind::Metal,
        }
    );
}

#[test]
fn compatible_but_unregistered_pairs_are_unavailable() {
    let factory = default_factory();
    assert!(factory.is_compatible(WindowSystemKind::X11, GraphicsApiKind::Vulkan));
    assert!(matches!(
        factory.create(WindowSystemKind::X11, GraphicsApiKind::Vulkan),
        Err(CanopyError::BackendUnavailable { .. })
    ));
    assert!(BackendFactory::new().window_systems().is_empty());
}

#[test]
fn unreachable_display_surfaces_from_create() {
    let display = HeadlessDisplay::new();
    display.set_available(false);
    let gpu = HeadlessGpu::new();

    let mut factory = BackendFactory::new();
    let window_display = display.clone();
    factory.register_window_backend(WindowSystemKind::Headless, move || {
        Ok(Box::new(window_display.backend()))
    });
    factory.register_graphics_backend(GraphicsApiKind::Headless, move || {
        Ok(Box::new(gpu.backend()))
    });

    assert!(matches!(
        factory.create(WindowSystemKind::Headless, GraphicsApiKind::Headless),
        Err(CanopyError::PlatformUnavailable(_))
    ));
    display.set_available(true);
    assert!(factory
        .create(WindowSystemKind::Headless, GraphicsApiKind::Headless)
        .is_ok());
}

#[test]
fn configuration_picks_the_backends() {
    let config = PresentationConfig::from_ron_str(
        "(window_system: Headless, graphics_api: Headless, window: (title: \"From RON\", width: 320, height: 200))",
    )
    .unwrap();

    let mut presentation = default_factory().create_from_config(&config).unwrap();
    let window = presentation
        .platform_mut()
        .create_window(&config.window)
        .unwrap();
    assert_eq!(presentation.platform().size(window), Ok((320, 200)));

    let unsupported = PresentationConfig::from_ron_str("(graphics_api: D3D12)").unwrap();
    assert!(matches!(
        default_factory().create_from_config(&unsupported),
        Err(CanopyError::BackendUnavailable { .. })
    ));
}
