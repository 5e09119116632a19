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

//! Defines the error taxonomy shared by the window and graphics layers.
//!
//! Errors fall into three classes (see [`ErrorClass`]): initialization failures
//! the caller may recover from, per-frame failures that only mean "skip this frame",
//! and contract violations which are caller bugs and must never be ignored.

use crate::backend::{GraphicsApiKind, WindowSystemKind};
use crate::renderer::api::{
    BufferKind, ContextId, Feature, IndexFormat, RenderPassId, ResourceId, SwapchainId,
};
use thiserror::Error;

/// A convenient alias for results produced by this crate.
pub type Result<T, E = CanopyError> = std::result::Result<T, E>;

/// How an error should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Startup failure. The caller may retry with different parameters or abort.
    Initialization,
    /// Expected under normal operation (e.g. minimized window). Skip the frame.
    Frame,
    /// The caller broke the contract. Reported immediately, never masked.
    ContractViolation,
}

/// Every error the presentation layer can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanopyError {
    /// The platform subsystem (e.g. the display server) could not be acquired.
    #[error("platform unavailable: {0}")]
    PlatformUnavailable(String),

    /// The native window system refused to create a window.
    #[error("window creation failed: {0}")]
    WindowCreationFailed(String),

    /// The requested window-system / graphics-API combination cannot be instantiated.
    #[error("no backend available for window system {window_system:?} with graphics API {graphics_api:?}")]
    BackendUnavailable {
        /// The requested window system.
        window_system: WindowSystemKind,
        /// The requested graphics API.
        graphics_api: GraphicsApiKind,
    },

    /// A backend failed internally while creating a native object.
    #[error("backend failure: {0}")]
    BackendFailure(String),

    /// The swapchain has no presentable image right now (minimized or occluded window).
    #[error("swapchain {0:?} has no presentable image")]
    SwapchainUnavailable(SwapchainId),

    /// A feature or limit the context does not provide was used.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(Feature),

    /// A draw call was issued before any pipeline was bound in the pass.
    #[error("draw issued with no pipeline bound")]
    NoPipelineBound,

    /// The bound pipeline reads a vertex buffer slot that has nothing bound.
    #[error("no vertex buffer bound at slot {slot}")]
    MissingVertexBuffer {
        /// The unbound slot.
        slot: u32,
    },

    /// The index buffer width differs from the width the pipeline expects.
    #[error("index width mismatch: pipeline expects {expected:?}, buffer holds {found:?}")]
    IndexWidthMismatch {
        /// Width declared by the bound pipeline.
        expected: IndexFormat,
        /// Width the index buffer was created with.
        found: IndexFormat,
    },

    /// The render pass handle refers to a pass that has already ended.
    #[error("render pass {0:?} has already ended")]
    PassAlreadyEnded(RenderPassId),

    /// A render pass was begun on a swapchain that is still recording another one.
    #[error("swapchain {swapchain:?} is already recording pass {active:?}")]
    PassAlreadyActive {
        /// The swapchain the pass was begun on.
        swapchain: SwapchainId,
        /// The pass that is still recording.
        active: RenderPassId,
    },

    /// `present` was called while a pass on the swapchain is still recording.
    #[error("cannot present swapchain {0:?} while a render pass is recording")]
    PassNotEnded(SwapchainId),

    /// `present` was called without an ended pass to submit.
    #[error("swapchain {0:?} has no ended render pass to present")]
    NothingToPresent(SwapchainId),

    /// The resource is still referenced and cannot be destroyed or mutated.
    #[error("{0} is still in use")]
    ResourceInUse(ResourceId),

    /// The handle belongs to a context that has been destroyed.
    #[error("context {0:?} has been destroyed")]
    StaleContext(ContextId),

    /// The handle does not name a live object.
    #[error("invalid handle: {0}")]
    InvalidHandle(ResourceId),

    /// A descriptor failed validation.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// A buffer was used in a role its kind does not allow.
    #[error("wrong buffer kind: expected {expected:?}, found {found:?}")]
    WrongBufferKind {
        /// The kind the operation requires.
        expected: BufferKind,
        /// The kind the buffer was created with.
        found: BufferKind,
    },

    /// An offset or index lies outside the bounds of a buffer.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// Resources from two different contexts were mixed in one operation.
    #[error("{resource} belongs to context {found:?}, expected {expected:?}")]
    ContextMismatch {
        /// The offending resource.
        resource: ResourceId,
        /// The context of the swapchain or pipeline being used.
        expected: ContextId,
        /// The context the resource was created from.
        found: ContextId,
    },
}

impl CanopyError {
    /// Returns the handling class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            CanopyError::PlatformUnavailable(_)
            | CanopyError::WindowCreationFailed(_)
            | CanopyError::BackendUnavailable { .. }
            | CanopyError::BackendFailure(_) => ErrorClass::Initialization,
            CanopyError::SwapchainUnavailable(_) => ErrorClass::Frame,
            _ => ErrorClass::ContractViolation,
        }
    }

    /// `true` if the error signals a bug in the calling code.
    pub fn is_contract_violation(&self) -> bool {
        self.class() == ErrorClass::ContractViolation
    }

    /// `true` if the caller can carry on (retry, pick other parameters, or skip a frame).
    pub fn is_recoverable(&self) -> bool {
        !self.is_contract_violation()
    }
}

/// Logs a contract violation at error level and hands the error back.
///
/// The front-ends route every contract violation through here so that misuse is
/// loud even when the caller discards the `Result`.
pub(crate) fn violation(err: CanopyError) -> CanopyError {
    debug_assert!(err.is_contract_violation());
    log::error!("contract violation: {err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::BufferId;

    #[test]
    fn classes_follow_propagation_policy() {
        assert_eq!(
            CanopyError::PlatformUnavailable("no display".into()).class(),
            ErrorClass::Initialization
        );
        assert_eq!(
            CanopyError::BackendUnavailable {
                window_system: WindowSystemKind::Headless,
                graphics_api: GraphicsApiKind::Metal,
            }
            .class(),
            ErrorClass::Initialization
        );
        let swapchain = SwapchainId::new(ContextId(1), 0);
        assert_eq!(
            CanopyError::SwapchainUnavailable(swapchain).class(),
            ErrorClass::Frame
        );
        assert!(CanopyError::NoPipelineBound.is_contract_violation());
        assert!(CanopyError::StaleContext(ContextId(3)).is_contract_violation());
        assert!(CanopyError::SwapchainUnavailable(swapchain).is_recoverable());
    }

    #[test]
    fn display_names_the_resource() {
        let buffer = BufferId::new(ContextId(2), 7);
        let err = CanopyError::ResourceInUse(ResourceId::Buffer(buffer));
        assert_eq!(format!("{err}"), "buffer #7 (context 2) is still in use");

        let err = CanopyError::MissingVertexBuffer { slot: 1 };
        assert_eq!(format!("{err}"), "no vertex buffer bound at slot 1");
    }
}
