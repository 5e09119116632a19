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
//! # Canopy Infra
//!
//! Concrete implementations of the `canopy-core` backend traits.
//!
//! - [`platform`]: window backends (headless, and `winit` with the `platform` feature).
//! - [`graphics`]: graphics backends (a recording headless GPU).
//!
//! [`register_builtin_backends`] makes all of them available to a
//! [`BackendFactory`].

#![warn(missing_docs)]

pub mod graphics;
pub mod platform;

pub use graphics::{HeadlessGpu, HeadlessGraphicsBackend, RecordedCommand};
pub use platform::{HeadlessDisplay, HeadlessWindowBackend};
#[cfg(feature = "platform")]
pub use platform::WinitWindowBackend;

use canopy_core::backend::{BackendFactory, GraphicsApiKind, WindowSystemKind};

/// Registers every backend compiled into this crate.
pub fn register_builtin_backends(factory: &mut BackendFactory) {
    factory.register_window_backend(WindowSystemKind::Headless, || {
        Ok(Box::new(HeadlessWindowBackend::new()))
    });
    factory.register_graphics_backend(GraphicsApiKind::Headless, || {
        Ok(Box::new(HeadlessGraphicsBackend::new()))
    });
    #[cfg(feature = "platform")]
    factory.register_window_backend(WindowSystemKind::Winit, || {
        Ok(Box::new(WinitWindowBackend::new()))
    });
}

/// A factory with every built-in backend registered.
pub fn default_factory() -> BackendFactory {
    let mut factory = BackendFactory::new();
    register_builtin_backends(&mut factory);
    factory
}
