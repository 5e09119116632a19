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

//! An in-memory window system.
//!
//! Windows exist only as records. Input is injected through a [`HeadlessDisplay`]
//! using macOS virtual key codes, and only becomes visible to the platform after
//! the next event pump, as it would with a real display server.

use canopy_core::backend::WindowSystemKind;
use canopy_core::platform::keymap::from_macos_virtual_key;
use canopy_core::platform::{
    Event, KeyEvent, Modifiers, NativeWindowHandle, WindowBackend, WindowDescriptor, WindowId,
};
use canopy_core::CanopyError;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

#[derive(Debug)]
struct HeadlessWindow {
    native: u64,
    title: String,
    width: u32,
    height: u32,
    visible: bool,
    close_requested: bool,
    // Injected, not yet pumped.
    pending: VecDeque<Event>,
    events: VecDeque<Event>,
}

#[derive(Debug)]
struct DisplayState {
    available: bool,
    connected: bool,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_native: u64,
    created: usize,
    destroyed: usize,
    pumps: usize,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            available: true,
            connected: false,
            windows: BTreeMap::new(),
            next_native: 1,
            created: 0,
            destroyed: 0,
            pumps: 0,
        }
    }
}

/// The fake display server behind one or more [`HeadlessWindowBackend`]s.
///
/// Cloning yields another handle to the same display, so a test can keep one while
/// the platform owns the backend.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<DisplayState>>,
}

impl HeadlessDisplay {
    /// A reachable display with no windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// A window backend connected to this display.
    pub fn backend(&self) -> HeadlessWindowBackend {
        HeadlessWindowBackend {
            display: self.clone(),
        }
    }

    /// Makes the display unreachable (or reachable again) for later `init` calls.
    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    /// Whether a backend is currently connected.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Queues a key press, given as a macOS virtual key code.
    ///
    /// Returns `false` if no such window exists.
    pub fn press_key(&self, window: WindowId, virtual_key: u16, modifiers: Modifiers) -> bool {
        self.inject(window, Event::KeyDown(key_event(virtual_key, modifiers)))
    }

    /// Queues a key release, given as a macOS virtual key code.
    pub fn release_key(&self, window: WindowId, virtual_key: u16, modifiers: Modifiers) -> bool {
        self.inject(window, Event::KeyUp(key_event(virtual_key, modifiers)))
    }

    /// Simulates the user clicking the close button.
    pub fn click_close(&self, window: WindowId) -> bool {
        self.inject(window, Event::WindowClose)
    }

    /// Simulates the user resizing the window. The new size applies when pumped.
    pub fn resize(&self, window: WindowId, width: u32, height: u32) -> bool {
        self.inject(window, Event::Resized { width, height })
    }

    /// Windows currently open.
    pub fn live_windows(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// Windows ever created.
    pub fn windows_created(&self) -> usize {
        self.state.borrow().created
    }

    /// Windows ever destroyed.
    pub fn windows_destroyed(&self) -> usize {
        self.state.borrow().destroyed
    }

    /// Number of event pumps so far.
    pub fn pumps(&self) -> usize {
        self.state.borrow().pumps
    }

    /// Whether a window is shown, `None` if it does not exist.
    pub fn is_visible(&self, window: WindowId) -> Option<bool> {
        self.state.borrow().windows.get(&window).map(|w| w.visible)
    }

    /// Title of a window, `None` if it does not exist.
    pub fn title(&self, window: WindowId) -> Option<String> {
        self.state.borrow().windows.get(&window).map(|w| w.title.clone())
    }

    fn inject(&self, window: WindowId, event: Event) -> bool {
        match self.state.borrow_mut().windows.get_mut(&window) {
            Some(target) => {
                target.pending.push_back(event);
                true
            }
            None => {
                log::warn!("Dropping {event:?}: {window} does not exist on the headless display.");
                false
            }
        }
    }
}

fn key_event(virtual_key: u16, modifiers: Modifiers) -> KeyEvent {
    KeyEvent::new(
        from_macos_virtual_key(virtual_key),
        modifiers,
        Some(u32::from(virtual_key)),
    )
}

/// A window backend with no display server.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWindowBackend {
    display: HeadlessDisplay,
}

impl HeadlessWindowBackend {
    /// A backend on a private display.
    pub fn new() -> Self {
        Self::default()
    }

    /// The display this backend is connected to.
    pub fn display(&self) -> &HeadlessDisplay {
        &self.display
    }
}

impl WindowBackend for HeadlessWindowBackend {
    fn kind(&self) -> WindowSystemKind {
        WindowSystemKind::Headless
    }

    fn init(&mut self) -> Result<(), CanopyError> {
        let mut state = self.display.state.borrow_mut();
        if !state.available {
            return Err(CanopyError::PlatformUnavailable(
                "headless display is unreachable".to_owned(),
            ));
        }
        state.connected = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.display.state.borrow_mut().connected = false;
    }

    fn poll_events(&mut self) {
        let mut state = self.display.state.borrow_mut();
        state.pumps += 1;
        for window in state.windows.values_mut() {
            while let Some(event) = window.pending.pop_front() {
                if let Event::Resized { width, height } = event {
                    window.width = width;
                    window.height = height;
                }
                window.events.push_back(event);
            }
        }
    }

    fn create_window(
        &mut self,
        id: WindowId,
        descriptor: &WindowDescriptor,
    ) -> Result<(), CanopyError> {
        let mut state = self.display.state.borrow_mut();
        if !state.connected {
            return Err(CanopyError::WindowCreationFailed(
                "headless display is not connected".to_owned(),
            ));
        }
        let native = state.next_native;
        state.next_native += 1;
        state.created += 1;
        state.windows.insert(
            id,
            HeadlessWindow {
                native,
                title: descriptor.title.clone(),
                width: descriptor.width,
                height: descriptor.height,
                visible: descriptor.visible,
                close_requested: false,
                pending: VecDeque::new(),
                events: VecDeque::new(),
            },
        );
        Ok(())
    }

    fn destroy_window(&mut self, id: WindowId) {
        let mut state = self.display.state.borrow_mut();
        if state.windows.remove(&id).is_some() {
            state.destroyed += 1;
        }
    }

    fn show(&mut self, id: WindowId) {
        if let Some(window) = self.display.state.borrow_mut().windows.get_mut(&id) {
            window.visible = true;
        }
    }

    fn hide(&mut self, id: WindowId) {
        if let Some(window) = self.display.state.borrow_mut().windows.get_mut(&id) {
            window.visible = false;
        }
    }

    fn should_close(&self, id: WindowId) -> bool {
        self.display
            .state
            .borrow()
            .windows
            .get(&id)
            .is_some_and(|w| w.close_requested)
    }

    fn request_close(&mut self, id: WindowId) {
        if let Some(window) = self.display.state.borrow_mut().windows.get_mut(&id) {
            window.close_requested = true;
        }
    }

    fn poll_event(&mut self, id: WindowId) -> Option<Event> {
        self.display
            .state
            .borrow_mut()
            .windows
            .get_mut(&id)?
            .events
            .pop_front()
    }

    fn native_handle(&self, id: WindowId) -> Option<NativeWindowHandle> {
        self.display
            .state
            .borrow()
            .windows
            .get(&id)
            .map(|w| NativeWindowHandle::Headless(w.native))
    }

    fn size(&self, id: WindowId) -> (u32, u32) {
        self.display
            .state
            .borrow()
            .windows
            .get(&id)
            .map_or((0, 0), |w| (w.width, w.height))
    }
}
