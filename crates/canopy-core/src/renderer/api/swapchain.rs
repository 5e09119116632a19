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

use crate::platform::NativeWindowHandle;

/// Describes a swapchain to bind to a native window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapchainDescriptor {
    /// The window the swapchain presents into.
    pub native_handle: NativeWindowHandle,
    /// Presentation width in pixels.
    pub width: u32,
    /// Presentation height in pixels.
    pub height: u32,
    /// Whether presentation waits for vertical blank.
    pub vsync: bool,
}

impl SwapchainDescriptor {
    /// Creates a descriptor for the given window and size.
    pub fn new(native_handle: NativeWindowHandle, width: u32, height: u32, vsync: bool) -> Self {
        Self {
            native_handle,
            width,
            height,
            vsync,
        }
    }
}
