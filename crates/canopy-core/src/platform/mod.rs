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

//! Provides abstractions over the native window system.
//!
//! This module contains the [`WindowBackend`] trait every window system implements,
//! the [`Platform`] front-end that validates window handles on top of it, and the
//! platform-neutral event and key types backends translate their input into.

pub mod backend;
pub mod event;
pub mod host;
pub mod keymap;
pub mod window;

pub use backend::WindowBackend;
pub use event::{Event, KeyEvent, Modifiers};
pub use host::{Events, Platform};
pub use keymap::KeyCode;
pub use window::{NativeWindowHandle, WindowDescriptor, WindowId, WindowPosition};
