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

//! Window events in a platform-neutral form.

use super::keymap::KeyCode;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Modifier keys held when a key event was generated.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self(0);
    /// Either Shift key.
    pub const SHIFT: Self = Self(0b0001);
    /// Either Control key.
    pub const CONTROL: Self = Self(0b0010);
    /// Alt, or Option on macOS.
    pub const ALT: Self = Self(0b0100);
    /// Command on macOS, the Windows key elsewhere.
    pub const SYSTEM: Self = Self(0b1000);

    /// Builds a set from individual flags.
    pub const fn new(shift: bool, control: bool, alt: bool, system: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT.0;
        }
        if control {
            bits |= Self::CONTROL.0;
        }
        if alt {
            bits |= Self::ALT.0;
        }
        if system {
            bits |= Self::SYSTEM.0;
        }
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if no modifier is held.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets or clears the flags of `other`.
    pub fn set(&mut self, other: Self, held: bool) {
        if held {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

impl BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::SHIFT, "SHIFT"),
            (Self::CONTROL, "CONTROL"),
            (Self::ALT, "ALT"),
            (Self::SYSTEM, "SYSTEM"),
        ];
        let held: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if held.is_empty() {
            write!(f, "Modifiers(NONE)")
        } else {
            write!(f, "Modifiers({})", held.join(" | "))
        }
    }
}

/// A key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The normalized key, [`KeyCode::Unknown`] if the native code has no mapping.
    pub key: KeyCode,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    /// The raw native key code, when the window system provides one.
    pub scancode: Option<u32>,
}

impl KeyEvent {
    /// Creates a key event.
    pub const fn new(key: KeyCode, modifiers: Modifiers, scancode: Option<u32>) -> Self {
        Self {
            key,
            modifiers,
            scancode,
        }
    }
}

/// Something that happened to a window since the last poll.
///
/// "Nothing pending" is expressed as `Option::None` by the polling functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A key was pressed (or auto-repeated).
    KeyDown(KeyEvent),
    /// A key was released.
    KeyUp(KeyEvent),
    /// The user asked to close the window. The window stays open.
    WindowClose,
    /// The inner size changed. Zero on either axis means minimized.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

impl Event {
    /// The key event carried by `KeyDown`/`KeyUp`.
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Event::KeyDown(key) | Event::KeyUp(key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_flags_combine() {
        let mods = Modifiers::SHIFT | Modifiers::SYSTEM;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::CONTROL));
        assert_eq!(mods, Modifiers::new(true, false, false, true));
        assert_eq!(format!("{mods:?}"), "Modifiers(SHIFT | SYSTEM)");

        let mut mods = mods;
        mods.set(Modifiers::SHIFT, false);
        assert_eq!(mods, Modifiers::SYSTEM);
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn key_accessor() {
        let key = KeyEvent::new(KeyCode::A, Modifiers::NONE, Some(0));
        assert_eq!(Event::KeyUp(key).key(), Some(&key));
        assert_eq!(Event::WindowClose.key(), None);
    }
}
