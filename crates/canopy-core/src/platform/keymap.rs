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

//! Normalized key codes and the tables translating native codes into them.
//!
//! Each window system numbers its keys differently. Backends run the native code
//! through the matching table here, and keep the native value in
//! [`KeyEvent::scancode`](super::KeyEvent::scancode).

/// A physical key, independent of the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Enter,
    Tab,
    Space,
    Backspace,
    Escape,
    Left,
    Right,
    Up,
    Down,
    /// Any key without a mapping.
    Unknown,
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::A,
    KeyCode::B,
    KeyCode::C,
    KeyCode::D,
    KeyCode::E,
    KeyCode::F,
    KeyCode::G,
    KeyCode::H,
    KeyCode::I,
    KeyCode::J,
    KeyCode::K,
    KeyCode::L,
    KeyCode::M,
    KeyCode::N,
    KeyCode::O,
    KeyCode::P,
    KeyCode::Q,
    KeyCode::R,
    KeyCode::S,
    KeyCode::T,
    KeyCode::U,
    KeyCode::V,
    KeyCode::W,
    KeyCode::X,
    KeyCode::Y,
    KeyCode::Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

impl KeyCode {
    /// The letter key for an ASCII letter of either case.
    pub fn from_letter(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase()
            .then(|| LETTERS[(c as u8 - b'A') as usize])
    }

    /// The digit key for an ASCII digit.
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| DIGITS[d as usize])
    }

    /// `true` for the four arrow keys.
    pub fn is_arrow(self) -> bool {
        matches!(self, KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down)
    }
}

/// Translates a macOS virtual key code (`kVK_*`, as delivered by `NSEvent.keyCode`).
pub fn from_macos_virtual_key(code: u16) -> KeyCode {
    match code {
        0 => KeyCode::A,
        1 => KeyCode::S,
        2 => KeyCode::D,
        3 => KeyCode::F,
        4 => KeyCode::H,
        5 => KeyCode::G,
        6 => KeyCode::Z,
        7 => KeyCode::X,
        8 => KeyCode::C,
        9 => KeyCode::V,
        11 => KeyCode::B,
        12 => KeyCode::Q,
        13 => KeyCode::W,
        14 => KeyCode::E,
        15 => KeyCode::R,
        16 => KeyCode::Y,
        17 => KeyCode::T,
        18 => KeyCode::Digit1,
        19 => KeyCode::Digit2,
        20 => KeyCode::Digit3,
        21 => KeyCode::Digit4,
        22 => KeyCode::Digit6,
        23 => KeyCode::Digit5,
        25 => KeyCode::Digit9,
        26 => KeyCode::Digit7,
        28 => KeyCode::Digit8,
        29 => KeyCode::Digit0,
        31 => KeyCode::O,
        32 => KeyCode::U,
        34 => KeyCode::I,
        35 => KeyCode::P,
        36 => KeyCode::Enter,
        37 => KeyCode::L,
        38 => KeyCode::J,
        40 => KeyCode::K,
        45 => KeyCode::N,
        46 => KeyCode::M,
        48 => KeyCode::Tab,
        49 => KeyCode::Space,
        51 => KeyCode::Backspace,
        53 => KeyCode::Escape,
        123 => KeyCode::Left,
        124 => KeyCode::Right,
        125 => KeyCode::Down,
        126 => KeyCode::Up,
        _ => KeyCode::Unknown,
    }
}

/// Translates a Win32 virtual key code (`VK_*`).
pub fn from_win32_virtual_key(code: u32) -> KeyCode {
    match code {
        0x41..=0x5A => LETTERS[(code - 0x41) as usize],
        0x30..=0x39 => DIGITS[(code - 0x30) as usize],
        0x0D => KeyCode::Enter,
        0x09 => KeyCode::Tab,
        0x20 => KeyCode::Space,
        0x08 => KeyCode::Backspace,
        0x1B => KeyCode::Escape,
        0x25 => KeyCode::Left,
        0x26 => KeyCode::Up,
        0x27 => KeyCode::Right,
        0x28 => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

/// Translates an X11 keysym. Letters map from both cases.
pub fn from_x11_keysym(keysym: u32) -> KeyCode {
    match keysym {
        0x61..=0x7a => LETTERS[(keysym - 0x61) as usize],
        0x41..=0x5a => LETTERS[(keysym - 0x41) as usize],
        0x30..=0x39 => DIGITS[(keysym - 0x30) as usize],
        0xff0d => KeyCode::Enter,
        0xff09 => KeyCode::Tab,
        0x20 => KeyCode::Space,
        0xff08 => KeyCode::Backspace,
        0xff1b => KeyCode::Escape,
        0xff51 => KeyCode::Left,
        0xff52 => KeyCode::Up,
        0xff53 => KeyCode::Right,
        0xff54 => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}
