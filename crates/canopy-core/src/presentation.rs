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

use crate::error::{violation, CanopyError};
use crate::platform::{Platform, WindowId};
use crate::renderer::api::{ContextId, ResourceId, SwapchainDescriptor, SwapchainId};
use crate::renderer::GraphicsDevice;

/// A platform and a graphics device selected together by the
/// [`BackendFactory`](crate::backend::BackendFactory).
///
/// Besides giving access to both front-ends, it keeps windows and the swapchains
/// presenting into them consistent.
#[derive(Debug)]
pub struct Presentation {
    // Declared first so the device, and every context it still holds, goes before the
    // windows its swapchains point to.
    device: GraphicsDevice,
    platform: Platform,
}

impl Presentation {
    /// Pairs an initialized platform with a device.
    pub fn new(platform: Platform, device: GraphicsDevice) -> Self {
        Self { device, platform }
    }

    /// The window front-end.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The window front-end, mutably.
    pub fn platform_mut(&mut self) -> &mut Platform {
        &mut self.platform
    }

    /// The graphics front-end.
    pub fn device(&self) -> &GraphicsDevice {
        &self.device
    }

    /// The graphics front-end, mutably.
    pub fn device_mut(&mut self) -> &mut GraphicsDevice {
        &mut self.device
    }

    /// Both front-ends at once.
    pub fn split_mut(&mut self) -> (&mut Platform, &mut GraphicsDevice) {
        (&mut self.platform, &mut self.device)
    }

    /// Creates a swapchain sized to `window` and records it on the window.
    /// ## Errors
    /// * `ResourceInUse` - If the window already has a swapchain.
    pub fn bind_swapchain(
        &mut self,
        window: WindowId,
        context: ContextId,
        vsync: bool,
    ) -> Result<SwapchainId, CanopyError> {
        if self.live_swapchain(window)?.is_some() {
            return Err(violation(CanopyError::ResourceInUse(ResourceId::Window(
                window,
            ))));
        }
        let native_handle = self.platform.native_handle(window)?;
        let (width, height) = self.platform.size(window)?;
        let swapchain = self.device.create_swapchain(
            context,
            &SwapchainDescriptor::new(native_handle, width, height, vsync),
        )?;
        self.platform.set_swapchain(window, Some(swapchain))?;
        log::info!("Bound {swapchain} to {window}.");
        Ok(swapchain)
    }

    /// Destroys the swapchain of `window`, if it has one.
    ///
    /// A swapchain already released with its context only has its binding cleared.
    pub fn unbind_swapchain(&mut self, window: WindowId) -> Result<(), CanopyError> {
        if let Some(swapchain) = self.platform.swapchain(window)? {
            if self.device.is_context_live(swapchain.context()) {
                self.device.destroy_swapchain(swapchain)?;
            } else {
                log::debug!("{swapchain} was released with {}.", swapchain.context());
            }
            self.platform.set_swapchain(window, None)?;
            log::info!("Unbound {swapchain} from {window}.");
        }
        Ok(())
    }

    /// The live swapchain of `window`. A binding left behind by a destroyed
    /// context is cleared on the way.
    fn live_swapchain(&mut self, window: WindowId) -> Result<Option<SwapchainId>, CanopyError> {
        match self.platform.swapchain(window)? {
            Some(swapchain) if !self.device.is_context_live(swapchain.context()) => {
                self.unbind_swapchain(window)?;
                Ok(None)
            }
            bound => Ok(bound),
        }
    }

    /// Brings the swapchain of `window` to the window's current size.
    ///
    /// Call it after [`Event::Resized`](crate::platform::Event::Resized), between
    /// frames. Returns the new size.
    pub fn handle_resize(&mut self, window: WindowId) -> Result<(u32, u32), CanopyError> {
        let (width, height) = self.platform.size(window)?;
        if let Some(swapchain) = self.live_swapchain(window)? {
            if self.device.swapchain_size(swapchain)? != (width, height) {
                self.device.resize_swapchain(swapchain, width, height)?;
            }
        }
        Ok((width, height))
    }

    /// Unbinds the swapchain of `window`, then closes the window.
    pub fn destroy_window(&mut self, window: WindowId) -> Result<(), CanopyError> {
        self.unbind_swapchain(window)?;
        self.platform.destroy_window(window)
    }
}
