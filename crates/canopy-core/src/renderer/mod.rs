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

//! Backend-agnostic graphics contracts and the device front-end.
//!
//! The [`GraphicsBackend`] trait defines the 'what' one graphics API must provide,
//! while [`GraphicsDevice`] wraps any backend and enforces handle validity, resource
//! lifetimes and the render pass state machine. Concrete backends live in the
//! `canopy-infra` crate.

pub mod api;
pub mod device;
pub mod pass;
pub mod registry;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::device::{FrameStats, GraphicsDevice};
pub use self::pass::PassState;
pub use self::registry::RegistryCounts;
pub use self::traits::GraphicsBackend;
