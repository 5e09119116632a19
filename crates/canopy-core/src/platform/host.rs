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

//! The window front-end.

use super::{Event, NativeWindowHandle, WindowBackend, WindowDescriptor, WindowId};
use crate::backend::WindowSystemKind;
use crate::error::{violation, CanopyError};
use crate::renderer::api::{ResourceId, SwapchainId};
use std::collections::BTreeMap;

#[derive(Debug)]
struct WindowEntry {
    title: String,
    swapchain: Option<SwapchainId>,
}

/// Process-wide window system state, wrapping one [`WindowBackend`].
///
/// Created explicitly with [`Platform::init`] and torn down with
/// [`Platform::shutdown`] (or on drop). Every window operation is checked against
/// the set of live windows, so a destroyed or unknown [`WindowId`] is reported as
/// `InvalidHandle` instead of reaching the native layer.
#[derive(Debug)]
pub struct Platform {
    backend: Box<dyn WindowBackend>,
    windows: BTreeMap<WindowId, WindowEntry>,
    next_window: u64,
    active: bool,
}

impl Platform {
    /// Acquires the window system behind `backend`.
    /// ## Errors
    /// * `PlatformUnavailable` - If the backend cannot reach its subsystem.
    pub fn init(mut backend: Box<dyn WindowBackend>) -> Result<Self, CanopyError> {
        let kind = backend.kind();
        if let Err(err) = backend.init() {
            log::error!("Failed to initialize the {kind:?} window system: {err}");
            return Err(err);
        }
        log::info!("Platform initialized on the {kind:?} window system.");
        Ok(Self {
            backend,
            windows: BTreeMap::new(),
            next_window: 0,
            active: true,
        })
    }

    /// The window system of the wrapped backend.
    pub fn kind(&self) -> WindowSystemKind {
        self.backend.kind()
    }

    /// `false` once [`shutdown`](Self::shutdown) ran.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Destroys every remaining window and releases the window system.
    ///
    /// Windows still alive at this point are leaks and are reported as warnings.
    /// Calling it again does nothing.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        for (id, entry) in std::mem::take(&mut self.windows) {
            log::warn!("{id} (\"{}\") was still alive at shutdown.", entry.title);
            self.backend.destroy_window(id);
        }
        self.backend.shutdown();
        self.active = false;
        log::info!("Platform shut down.");
    }

    /// Pumps native events once. Never blocks.
    pub fn poll_events(&mut self) -> Result<(), CanopyError> {
        self.ensure_active()?;
        self.backend.poll_events();
        Ok(())
    }

    /// Opens a new window.
    /// ## Errors
    /// * `InvalidDescriptor` - If a dimension is zero or exceeds `i32::MAX`.
    /// * `WindowCreationFailed` - If the window system refuses.
    pub fn create_window(&mut self, descriptor: &WindowDescriptor) -> Result<WindowId, CanopyError> {
        self.ensure_active()?;
        descriptor.validate().map_err(violation)?;

        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.backend.create_window(id, descriptor).map_err(|err| {
            log::error!("Failed to create window \"{}\": {err}", descriptor.title);
            match err {
                CanopyError::WindowCreationFailed(_) => err,
                other => CanopyError::WindowCreationFailed(other.to_string()),
            }
        })?;
        self.windows.insert(
            id,
            WindowEntry {
                title: descriptor.title.clone(),
                swapchain: None,
            },
        );
        log::info!(
            "Created {id} \"{}\" ({}x{}).",
            descriptor.title,
            descriptor.width,
            descriptor.height
        );
        Ok(id)
    }

    /// Closes a window.
    /// ## Errors
    /// * `ResourceInUse` - If a swapchain is still bound to it.
    pub fn destroy_window(&mut self, window: WindowId) -> Result<(), CanopyError> {
        if let Some(swapchain) = self.entry(window)?.swapchain {
            log::debug!("{window} is still presented by {swapchain}.");
            return Err(violation(CanopyError::ResourceInUse(ResourceId::Window(
                window,
            ))));
        }
        self.backend.destroy_window(window);
        self.windows.remove(&window);
        log::info!("Destroyed {window}.");
        Ok(())
    }

    /// Makes a window visible.
    pub fn show(&mut self, window: WindowId) -> Result<(), CanopyError> {
        self.entry(window)?;
        self.backend.show(window);
        Ok(())
    }

    /// Hides a window.
    pub fn hide(&mut self, window: WindowId) -> Result<(), CanopyError> {
        self.entry(window)?;
        self.backend.hide(window);
        Ok(())
    }

    /// Whether a close was requested. Receiving [`Event::WindowClose`] does not set
    /// this; the application decides with [`request_close`](Self::request_close).
    pub fn should_close(&self, window: WindowId) -> Result<bool, CanopyError> {
        self.entry(window)?;
        Ok(self.backend.should_close(window))
    }

    /// Asks for the window to close. Nothing is destroyed.
    pub fn request_close(&mut self, window: WindowId) -> Result<(), CanopyError> {
        self.entry(window)?;
        self.backend.request_close(window);
        log::debug!("Close requested for {window}.");
        Ok(())
    }

    /// Pops the next pending event of a window, `None` once the queue is drained.
    pub fn poll_event(&mut self, window: WindowId) -> Result<Option<Event>, CanopyError> {
        self.entry(window)?;
        Ok(self.backend.poll_event(window))
    }

    /// Drains every pending event of a window.
    pub fn events(&mut self, window: WindowId) -> Result<Events<'_>, CanopyError> {
        self.entry(window)?;
        Ok(Events {
            backend: self.backend.as_mut(),
            window,
        })
    }

    /// The native surface a swapchain can be bound to.
    pub fn native_handle(&self, window: WindowId) -> Result<NativeWindowHandle, CanopyError> {
        self.entry(window)?;
        self.backend
            .native_handle(window)
            .ok_or_else(|| CanopyError::BackendFailure(format!("{window} has no native handle")))
    }

    /// Current inner size in pixels.
    pub fn size(&self, window: WindowId) -> Result<(u32, u32), CanopyError> {
        self.entry(window)?;
        Ok(self.backend.size(window))
    }

    /// Records (or clears) the swapchain presenting into a window.
    /// ## Errors
    /// * `ResourceInUse` - If another swapchain is already recorded on the window.
    pub fn set_swapchain(
        &mut self,
        window: WindowId,
        swapchain: Option<SwapchainId>,
    ) -> Result<(), CanopyError> {
        self.ensure_active()?;
        let entry = self
            .windows
            .get_mut(&window)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Window(window)))
            .map_err(violation)?;
        if let (Some(bound), Some(_)) = (entry.swapchain, swapchain) {
            log::debug!("{window} is already presented by {bound}.");
            return Err(violation(CanopyError::ResourceInUse(ResourceId::Window(
                window,
            ))));
        }
        entry.swapchain = swapchain;
        Ok(())
    }

    /// The swapchain presenting into a window, if any.
    pub fn swapchain(&self, window: WindowId) -> Result<Option<SwapchainId>, CanopyError> {
        Ok(self.entry(window)?.swapchain)
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Ids of the live windows, oldest first.
    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    fn ensure_active(&self) -> Result<(), CanopyError> {
        if self.active {
            Ok(())
        } else {
            log::error!("Platform used after shutdown.");
            Err(CanopyError::PlatformUnavailable(
                "the platform has been shut down".to_owned(),
            ))
        }
    }

    fn entry(&self, window: WindowId) -> Result<&WindowEntry, CanopyError> {
        self.ensure_active()?;
        self.windows
            .get(&window)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Window(window)))
            .map_err(violation)
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Draining iterator over the pending events of one window.
///
/// Ends when the queue is empty. Events arriving after the next
/// [`Platform::poll_events`] are picked up by a new iterator.
#[derive(Debug)]
pub struct Events<'a> {
    backend: &'a mut dyn WindowBackend,
    window: WindowId,
}

impl Iterator for Events<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.backend.poll_event(self.window)
    }
}
