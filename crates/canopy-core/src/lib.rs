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

//! # Canopy Core
//!
//! Foundational crate containing the contracts of the presentation layer: the
//! capability sets a window backend and a graphics backend must implement, the
//! descriptors exchanged with them, and the front-ends that enforce resource
//! lifetimes and the render pass state machine on top of any backend.

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod platform;
pub mod presentation;
pub mod renderer;

pub use backend::{BackendFactory, GraphicsApiKind, WindowSystemKind};
pub use config::{ConfigError, PresentationConfig};
pub use error::{CanopyError, ErrorClass, Result};
pub use platform::{Event, KeyCode, KeyEvent, Modifiers, Platform, WindowBackend, WindowDescriptor, WindowId};
pub use presentation::Presentation;
pub use renderer::{GraphicsBackend, GraphicsDevice};
