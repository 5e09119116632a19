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

//! Backend identification and explicit selection.
//!
//! Nothing is auto-detected: the caller names a window system and a graphics API,
//! and the [`BackendFactory`] either builds that pair or reports `BackendUnavailable`.

use crate::config::PresentationConfig;
use crate::error::CanopyError;
use crate::platform::{Platform, WindowBackend};
use crate::presentation::Presentation;
use crate::renderer::{GraphicsBackend, GraphicsDevice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A native window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowSystemKind {
    /// AppKit on macOS.
    Cocoa,
    /// The Win32 API.
    Win32,
    /// The X Window System.
    X11,
    /// A Wayland compositor.
    Wayland,
    /// The cross-platform `winit` abstraction.
    Winit,
    /// In-memory windows with no display.
    Headless,
}

/// A graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphicsApiKind {
    /// Apple Metal.
    Metal,
    /// Khronos Vulkan.
    Vulkan,
    /// Direct3D 12.
    D3D12,
    /// A recording backend with no GPU.
    Headless,
}

impl GraphicsApiKind {
    /// Whether this API can present into windows of `window_system`.
    pub fn is_compatible_with(self, window_system: WindowSystemKind) -> bool {
        use GraphicsApiKind as G;
        use WindowSystemKind as W;
        match (self, window_system) {
            (G::Headless, _) => true,
            (_, W::Headless) => false,
            (G::Metal, W::Cocoa | W::Winit) => true,
            (G::D3D12, W::Win32 | W::Winit) => true,
            (G::Vulkan, W::Win32 | W::X11 | W::Wayland | W::Winit) => true,
            _ => false,
        }
    }
}

/// Builds a window backend.
pub type WindowBackendConstructor = Box<dyn Fn() -> Result<Box<dyn WindowBackend>, CanopyError>>;

/// Builds a graphics backend.
pub type GraphicsBackendConstructor =
    Box<dyn Fn() -> Result<Box<dyn GraphicsBackend>, CanopyError>>;

/// Registry of backend constructors, keyed by kind.
#[derive(Default)]
pub struct BackendFactory {
    window_backends: HashMap<WindowSystemKind, WindowBackendConstructor>,
    graphics_backends: HashMap<GraphicsApiKind, GraphicsBackendConstructor>,
}

impl BackendFactory {
    /// Creates a factory with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the constructor of a window system.
    pub fn register_window_backend<F>(&mut self, kind: WindowSystemKind, constructor: F)
    where
        F: Fn() -> Result<Box<dyn WindowBackend>, CanopyError> + 'static,
    {
        log::debug!("Registered window backend {kind:?}.");
        self.window_backends.insert(kind, Box::new(constructor));
    }

    /// Registers (or replaces) the constructor of a graphics API.
    pub fn register_graphics_backend<F>(&mut self, kind: GraphicsApiKind, constructor: F)
    where
        F: Fn() -> Result<Box<dyn GraphicsBackend>, CanopyError> + 'static,
    {
        log::debug!("Registered graphics backend {kind:?}.");
        self.graphics_backends.insert(kind, Box::new(constructor));
    }

    /// Whether the pair may work together at all, registered or not.
    pub fn is_compatible(&self, window_system: WindowSystemKind, graphics_api: GraphicsApiKind) -> bool {
        graphics_api.is_compatible_with(window_system)
    }

    /// Whether [`create`](Self::create) can build the pair.
    pub fn supports(&self, window_system: WindowSystemKind, graphics_api: GraphicsApiKind) -> bool {
        self.is_compatible(window_system, graphics_api)
            && self.window_backends.contains_key(&window_system)
            && self.graphics_backends.contains_key(&graphics_api)
    }

    /// Registered window systems.
    pub fn window_systems(&self) -> Vec<WindowSystemKind> {
        self.window_backends.keys().copied().collect()
    }

    /// Registered graphics APIs.
    pub fn graphics_apis(&self) -> Vec<GraphicsApiKind> {
        self.graphics_backends.keys().copied().collect()
    }

    /// Builds both backends and initializes the platform.
    /// ## Errors
    /// * `BackendUnavailable` - If the pair is incompatible or not registered.
    /// * `PlatformUnavailable` - If the window system cannot be reached.
    pub fn create(
        &self,
        window_system: WindowSystemKind,
        graphics_api: GraphicsApiKind,
    ) -> Result<Presentation, CanopyError> {
        let unavailable = CanopyError::BackendUnavailable {
            window_system,
            graphics_api,
        };
        if !self.supports(window_system, graphics_api) {
            log::error!("{unavailable}");
            return Err(unavailable);
        }
        let (Some(make_window), Some(make_graphics)) = (
            self.window_backends.get(&window_system),
            self.graphics_backends.get(&graphics_api),
        ) else {
            return Err(unavailable);
        };

        let platform = Platform::init(make_window()?)?;
        let device = GraphicsDevice::new(make_graphics()?);
        log::info!("Presentation ready: {window_system:?} + {graphics_api:?}.");
        Ok(Presentation::new(platform, device))
    }

    /// [`create`](Self::create) with the kinds named in a configuration.
    pub fn create_from_config(&self, config: &PresentationConfig) -> Result<Presentation, CanopyError> {
        self.create(config.window_system, config.graphics_api)
    }
}

impl fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendFactory")
            .field("window_backends", &self.window_systems())
            .field("graphics_backends", &self.graphics_apis())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GraphicsApiKind as G;
    use WindowSystemKind as W;

    #[test]
    fn compatibility_matrix() {
        let all_windows = [W::Cocoa, W::Win32, W::X11, W::Wayland, W::Winit, W::Headless];
        for w in all_windows {
            assert!(G::Headless.is_compatible_with(w), "headless graphics on {w:?}");
        }
        for g in [G::Metal, G::Vulkan, G::D3D12] {
            assert!(!g.is_compatible_with(W::Headless), "{g:?} on headless windows");
        }

        assert!(G::Metal.is_compatible_with(W::Cocoa));
        assert!(G::Metal.is_compatible_with(W::Winit));
        assert!(!G::Metal.is_compatible_with(W::Win32));
        assert!(!G::Metal.is_compatible_with(W::X11));

        assert!(G::D3D12.is_compatible_with(W::Win32));
        assert!(!G::D3D12.is_compatible_with(W::Wayland));

        for w in [W::Win32, W::X11, W::Wayland, W::Winit] {
            assert!(G::Vulkan.is_compatible_with(w));
        }
        assert!(!G::Vulkan.is_compatible_with(W::Cocoa));
    }

    #[test]
    fn empty_factory_supports_nothing() {
        let factory = BackendFactory::new();
        assert!(factory.is_compatible(W::Headless, G::Headless));
        assert!(!factory.supports(W::Headless, G::Headless));
        assert_eq!(
            factory.create(W::Headless, G::Headless).unwrap_err(),
            CanopyError::BackendUnavailable {
                window_system: W::Headless,
                graphics_api: G::Headless,
            }
        );
    }
}
