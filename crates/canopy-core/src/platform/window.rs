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

use crate::error::CanopyError;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a native window, unique for the lifetime of a [`Platform`].
///
/// [`Platform`]: crate::platform::Platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window #{}", self.0)
    }
}

/// Where a window is placed on screen. `center` overrides `x` and `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    /// Left edge in screen coordinates.
    pub x: i32,
    /// Top edge in screen coordinates.
    pub y: i32,
    /// Center the window on its monitor.
    pub center: bool,
}

impl WindowPosition {
    /// A centered window.
    pub const CENTERED: Self = Self {
        x: 0,
        y: 0,
        center: true,
    };

    /// A window at a fixed screen position.
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            center: false,
        }
    }
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Describes a window to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDescriptor {
    /// Inner width in pixels.
    pub width: u32,
    /// Inner height in pixels.
    pub height: u32,
    /// Initial placement.
    pub position: WindowPosition,
    /// Title bar text.
    pub title: String,
    /// Whether the user may resize the window.
    pub resizable: bool,
    /// Whether the window is shown right after creation.
    pub visible: bool,
}

impl WindowDescriptor {
    /// A visible, resizable, centered window.
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Replaces the placement.
    pub fn with_position(mut self, position: WindowPosition) -> Self {
        self.position = position;
        self
    }

    /// Creates the window hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Checks that both dimensions are within `1..=i32::MAX`.
    pub fn validate(&self) -> Result<(), CanopyError> {
        let limit = i32::MAX as u32;
        if self.width == 0 || self.height == 0 || self.width > limit || self.height > limit {
            return Err(CanopyError::InvalidDescriptor(format!(
                "window size {}x{} must be within 1..={limit} on both axes",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            position: WindowPosition::CENTERED,
            title: "Canopy".to_owned(),
            resizable: true,
            visible: true,
        }
    }
}

/// The native surface a swapchain presents into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeWindowHandle {
    /// A real window of the host window system.
    Raw {
        /// The window itself (NSView, HWND, X11 window, Wayland surface...).
        window: RawWindowHandle,
        /// The connection it belongs to.
        display: RawDisplayHandle,
    },
    /// A window of the in-memory headless backend.
    Headless(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_descriptor_is_centered_800_by_600() {
        let desc = WindowDescriptor::default();
        assert_eq!((desc.width, desc.height), (800, 600));
        assert!(desc.position.center);
        assert_eq!(desc.title, "Canopy");
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn zero_or_oversized_windows_are_rejected() {
        for (w, h) in [(0, 600), (800, 0), (u32::MAX, 600), (800, i32::MAX as u32 + 1)] {
            let desc = WindowDescriptor::new("bad", w, h);
            assert!(matches!(
                desc.validate(),
                Err(CanopyError::InvalidDescriptor(_))
            ));
        }
        assert!(WindowDescriptor::new("max", i32::MAX as u32, 1)
            .validate()
            .is_ok());
    }
}
