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

use super::{Event, NativeWindowHandle, WindowDescriptor, WindowId};
use crate::backend::WindowSystemKind;
use crate::error::CanopyError;
use std::fmt::Debug;

/// A trait that abstracts one native window system.
///
/// Any windowing backend (Cocoa, Win32, X11, winit, an in-memory test double...) can
/// implement this trait to be driven by a [`Platform`]. The platform allocates window
/// ids and only passes ids of windows that are alive, so implementations need not
/// re-check them.
///
/// [`Platform`]: crate::platform::Platform
pub trait WindowBackend: Debug {
    /// The window system this backend drives.
    fn kind(&self) -> WindowSystemKind;

    /// Acquires the window system (display connection, application object...).
    /// ## Errors
    /// * `PlatformUnavailable` - If the subsystem cannot be reached.
    fn init(&mut self) -> Result<(), CanopyError>;

    /// Releases the window system. Every window has already been destroyed.
    fn shutdown(&mut self);

    /// Pumps the native event source once without blocking, queueing events per window.
    fn poll_events(&mut self);

    /// Creates a native window for `id`.
    /// ## Errors
    /// * `WindowCreationFailed` - If the window system refuses.
    fn create_window(&mut self, id: WindowId, descriptor: &WindowDescriptor)
        -> Result<(), CanopyError>;

    /// Destroys the native window and drops its pending events.
    fn destroy_window(&mut self, id: WindowId);

    /// Makes the window visible.
    fn show(&mut self, id: WindowId);

    /// Hides the window.
    fn hide(&mut self, id: WindowId);

    /// Whether a close was requested for the window.
    fn should_close(&self, id: WindowId) -> bool;

    /// Flags the window for closing. It is not destroyed.
    fn request_close(&mut self, id: WindowId);

    /// Pops the oldest queued event of the window.
    fn poll_event(&mut self, id: WindowId) -> Option<Event>;

    /// The handle a graphics backend needs to build a swapchain.
    fn native_handle(&self, id: WindowId) -> Option<NativeWindowHandle>;

    /// Current inner size in pixels.
    fn size(&self, id: WindowId) -> (u32, u32);
}
