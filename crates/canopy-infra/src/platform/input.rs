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

//! Provides translation from `winit` window events to canopy's [`Event`] format.
//!
//! This module acts as an adapter layer, decoupling the rest of the crate from the
//! specific event format of the `winit` crate.

use canopy_core::platform::{Event, KeyCode, KeyEvent, Modifiers};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

/// Translates a `winit::event::WindowEvent` into a canopy [`Event`].
///
/// `modifiers` is the modifier state last reported by `ModifiersChanged`, which
/// `winit` delivers separately from key events.
///
/// Returns `None` for events canopy does not model (focus, cursor, IME...).
pub fn translate_window_event(event: &WindowEvent, modifiers: Modifiers) -> Option<Event> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let key = match key_event.physical_key {
                PhysicalKey::Code(code) => key_from_winit(code),
                PhysicalKey::Unidentified(_) => KeyCode::Unknown,
            };
            let key = KeyEvent::new(key, modifiers, native_scancode(key_event.physical_key));
            match key_event.state {
                ElementState::Pressed => Some(Event::KeyDown(key)),
                ElementState::Released => Some(Event::KeyUp(key)),
            }
        }
        WindowEvent::CloseRequested => Some(Event::WindowClose),
        WindowEvent::Resized(size) => Some(Event::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => None,
    }
}

/// Maps a `winit` physical key to a canopy [`KeyCode`].
pub fn key_from_winit(code: WinitKeyCode) -> KeyCode {
    use WinitKeyCode as W;
    match code {
        W::KeyA => KeyCode::A,
        W::KeyB => KeyCode::B,
        W::KeyC => KeyCode::C,
        W::KeyD => KeyCode::D,
        W::KeyE => KeyCode::E,
        W::KeyF => KeyCode::F,
        W::KeyG => KeyCode::G,
        W::KeyH => KeyCode::H,
        W::KeyI => KeyCode::I,
        W::KeyJ => KeyCode::J,
        W::KeyK => KeyCode::K,
        W::KeyL => KeyCode::L,
        W::KeyM => KeyCode::M,
        W::KeyN => KeyCode::N,
        W::KeyO => KeyCode::O,
        W::KeyP => KeyCode::P,
        W::KeyQ => KeyCode::Q,
        W::KeyR => KeyCode::R,
        W::KeyS => KeyCode::S,
        W::KeyT => KeyCode::T,
        W::KeyU => KeyCode::U,
        W::KeyV => KeyCode::V,
        W::KeyW => KeyCode::W,
        W::KeyX => KeyCode::X,
        W::KeyY => KeyCode::Y,
        W::KeyZ => KeyCode::Z,
        W::Digit0 => KeyCode::Digit0,
        W::Digit1 => KeyCode::Digit1,
        W::Digit2 => KeyCode::Digit2,
        W::Digit3 => KeyCode::Digit3,
        W::Digit4 => KeyCode::Digit4,
        W::Digit5 => KeyCode::Digit5,
        W::Digit6 => KeyCode::Digit6,
        W::Digit7 => KeyCode::Digit7,
        W::Digit8 => KeyCode::Digit8,
        W::Digit9 => KeyCode::Digit9,
        W::Enter => KeyCode::Enter,
        W::Tab => KeyCode::Tab,
        W::Space => KeyCode::Space,
        W::Backspace => KeyCode::Backspace,
        W::Escape => KeyCode::Escape,
        W::ArrowLeft => KeyCode::Left,
        W::ArrowRight => KeyCode::Right,
        W::ArrowUp => KeyCode::Up,
        W::ArrowDown => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

/// Maps the `winit` modifier state to canopy's [`Modifiers`].
pub fn modifiers_from_winit(state: ModifiersState) -> Modifiers {
    Modifiers::new(
        state.shift_key(),
        state.control_key(),
        state.alt_key(),
        state.super_key(),
    )
}

// --- Private Helper Functions ---

/// (Internal) The native code of a physical key, where `winit` exposes it.
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
fn native_scancode(key: PhysicalKey) -> Option<u32> {
    use winit::platform::scancode::PhysicalKeyExtScancode;
    key.to_scancode()
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn native_scancode(_key: PhysicalKey) -> Option<u32> {
    None
}
