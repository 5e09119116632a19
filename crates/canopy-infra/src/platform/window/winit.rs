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

//! A `winit`-based implementation of the `WindowBackend` trait.

use crate::platform::input::{modifiers_from_winit, translate_window_event};
use canopy_core::backend::WindowSystemKind;
use canopy_core::platform::{
    Event, Modifiers, NativeWindowHandle, WindowBackend, WindowDescriptor, WindowId,
};
use canopy_core::CanopyError;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::Window;

#[derive(Debug)]
struct WinitWindow {
    inner: Window,
    events: VecDeque<Event>,
    close_requested: bool,
}

/// Window state `winit` dispatches into while events are pumped.
#[derive(Debug, Default)]
struct WinitState {
    windows: HashMap<WindowId, WinitWindow>,
    by_native: HashMap<winit::window::WindowId, WindowId>,
    modifiers: Modifiers,
}

impl ApplicationHandler for WinitState {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::ModifiersChanged(modifiers) = &event {
            self.modifiers = modifiers_from_winit(modifiers.state());
            return;
        }
        let Some(window) = self
            .by_native
            .get(&window_id)
            .and_then(|id| self.windows.get_mut(id))
        else {
            return;
        };
        if let Some(event) = translate_window_event(&event, self.modifiers) {
            log::trace!("Queued {event:?}.");
            window.events.push_back(event);
        }
    }
}

/// Drives native windows through `winit`, one event pump per
/// [`poll_events`](WindowBackend::poll_events).
///
/// `winit` allows a single event loop per process; a second backend fails to
/// initialize with `PlatformUnavailable`.
#[derive(Debug, Default)]
pub struct WinitWindowBackend {
    event_loop: Option<EventLoop<()>>,
    state: WinitState,
}

impl WinitWindowBackend {
    /// Creates an uninitialized backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn window(&self, id: WindowId) -> Option<&WinitWindow> {
        self.state.windows.get(&id)
    }
}

impl WindowBackend for WinitWindowBackend {
    fn kind(&self) -> WindowSystemKind {
        WindowSystemKind::Winit
    }

    fn init(&mut self) -> Result<(), CanopyError> {
        let event_loop =
            EventLoop::new().map_err(|e| CanopyError::PlatformUnavailable(e.to_string()))?;
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.state.windows.clear();
        self.state.by_native.clear();
        // Keep the loop itself alive: winit refuses to create another one.
    }

    fn poll_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        if let PumpStatus::Exit(code) =
            event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            log::info!("winit event loop exited with code {code}.");
        }
    }

    fn create_window(
        &mut self,
        id: WindowId,
        descriptor: &WindowDescriptor,
    ) -> Result<(), CanopyError> {
        let event_loop = self.event_loop.as_ref().ok_or_else(|| {
            CanopyError::WindowCreationFailed("winit event loop not initialized".to_owned())
        })?;

        let mut attributes = Window::default_attributes()
            .with_title(descriptor.title.as_str())
            .with_inner_size(PhysicalSize::new(descriptor.width, descriptor.height))
            .with_resizable(descriptor.resizable)
            .with_visible(false);
        if !descriptor.position.center {
            attributes = attributes.with_position(PhysicalPosition::new(
                descriptor.position.x,
                descriptor.position.y,
            ));
        }

        #[allow(deprecated)]
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| CanopyError::WindowCreationFailed(e.to_string()))?;

        if descriptor.position.center {
            center_on_monitor(&window);
        }
        if descriptor.visible {
            window.set_visible(true);
        }

        log::debug!("winit window {:?} backs {id}.", window.id());
        self.state.by_native.insert(window.id(), id);
        self.state.windows.insert(
            id,
            WinitWindow {
                inner: window,
                events: VecDeque::new(),
                close_requested: false,
            },
        );
        Ok(())
    }

    fn destroy_window(&mut self, id: WindowId) {
        if let Some(window) = self.state.windows.remove(&id) {
            self.state.by_native.remove(&window.inner.id());
        }
    }

    fn show(&mut self, id: WindowId) {
        if let Some(window) = self.window(id) {
            window.inner.set_visible(true);
        }
    }

    fn hide(&mut self, id: WindowId) {
        if let Some(window) = self.window(id) {
            window.inner.set_visible(false);
        }
    }

    fn should_close(&self, id: WindowId) -> bool {
        self.window(id).is_some_and(|w| w.close_requested)
    }

    fn request_close(&mut self, id: WindowId) {
        if let Some(window) = self.state.windows.get_mut(&id) {
            window.close_requested = true;
        }
    }

    fn poll_event(&mut self, id: WindowId) -> Option<Event> {
        self.state.windows.get_mut(&id)?.events.pop_front()
    }

    fn native_handle(&self, id: WindowId) -> Option<NativeWindowHandle> {
        let window = &self.window(id)?.inner;
        let raw_window = window.window_handle().ok()?.as_raw();
        let raw_display = window.display_handle().ok()?.as_raw();
        Some(NativeWindowHandle::Raw {
            window: raw_window,
            display: raw_display,
        })
    }

    fn size(&self, id: WindowId) -> (u32, u32) {
        self.window(id)
            .map(|w| {
                let size = w.inner.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }
}

/// (Internal) Moves a window to the middle of the monitor it sits on.
fn center_on_monitor(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        log::debug!("No monitor reported; leaving the window where the system put it.");
        return;
    };
    let area = monitor.size();
    let origin = monitor.position();
    let outer = window.outer_size();
    let x = origin.x + (area.width as i32 - outer.width as i32) / 2;
    let y = origin.y + (area.height as i32 - outer.height as i32) / 2;
    window.set_outer_position(PhysicalPosition::new(x, y));
}
