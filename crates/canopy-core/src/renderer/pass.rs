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

//! The per-swapchain render pass state machine.
//!
//! ```text
//! Idle --begin--> Recording --end--> Ended --present--> Idle
//!                     ^                |
//!                     +-----begin------+
//! ```

use crate::error::CanopyError;
use crate::renderer::api::*;
use std::collections::{BTreeMap, HashMap};

/// Observable state of a swapchain's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Nothing recorded since the last present.
    Idle,
    /// A pass is accepting commands.
    Recording(RenderPassId),
    /// The last pass ended and is waiting to be presented.
    Ended(RenderPassId),
}

/// Bindings made inside the pass that is currently recording.
#[derive(Debug, Clone)]
pub struct ActivePass {
    /// The pass handle.
    pub id: RenderPassId,
    /// The bound pipeline, if any.
    pub pipeline: Option<PipelineId>,
    /// Vertex buffers by slot.
    pub vertex_buffers: BTreeMap<u32, BufferId>,
    /// Uniform buffers by slot, with their byte offset.
    pub uniform_buffers: BTreeMap<u32, (BufferId, u32)>,
    /// Index buffers consumed by indexed draws so far.
    pub index_buffers: Vec<BufferId>,
    /// Draw calls recorded so far.
    pub draw_calls: u32,
}

impl ActivePass {
    fn new(id: RenderPassId) -> Self {
        Self {
            id,
            pipeline: None,
            vertex_buffers: BTreeMap::new(),
            uniform_buffers: BTreeMap::new(),
            index_buffers: Vec::new(),
            draw_calls: 0,
        }
    }

    /// `true` if the pass holds a binding to `resource`.
    pub fn references(&self, resource: ResourceId) -> bool {
        match resource {
            ResourceId::Pipeline(id) => self.pipeline == Some(id),
            ResourceId::Buffer(id) => {
                self.vertex_buffers.values().any(|b| *b == id)
                    || self.uniform_buffers.values().any(|(b, _)| *b == id)
                    || self.index_buffers.contains(&id)
            }
            ResourceId::Swapchain(id) => self.id.swapchain() == id,
            ResourceId::Context(id) => self.id.context() == id,
            _ => false,
        }
    }
}

#[derive(Debug)]
enum FrameState {
    Idle,
    Recording(ActivePass),
    Ended(RenderPassId),
}

#[derive(Debug)]
struct SwapchainFrame {
    state: FrameState,
    next_serial: u64,
}

/// Runs one state machine per live swapchain.
#[derive(Debug, Default)]
pub struct PassTracker {
    frames: HashMap<SwapchainId, SwapchainFrame>,
}

impl PassTracker {
    /// Creates a tracker with no swapchains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a new swapchain in the `Idle` state.
    pub fn track(&mut self, swapchain: SwapchainId) {
        self.frames.insert(
            swapchain,
            SwapchainFrame {
                state: FrameState::Idle,
                next_serial: 0,
            },
        );
    }

    /// Stops tracking a swapchain.
    /// ## Errors
    /// * `ResourceInUse` - If a pass is still recording on it.
    pub fn untrack(&mut self, swapchain: SwapchainId) -> Result<(), CanopyError> {
        if self.is_recording(swapchain) {
            return Err(CanopyError::ResourceInUse(ResourceId::Swapchain(swapchain)));
        }
        self.frames.remove(&swapchain);
        Ok(())
    }

    /// Drops every swapchain of a destroyed context.
    pub fn untrack_context(&mut self, context: ContextId) {
        self.frames.retain(|id, _| id.context() != context);
    }

    /// Current state of a swapchain, `None` if it is not tracked.
    pub fn state(&self, swapchain: SwapchainId) -> Option<PassState> {
        self.frames.get(&swapchain).map(|frame| match &frame.state {
            FrameState::Idle => PassState::Idle,
            FrameState::Recording(active) => PassState::Recording(active.id),
            FrameState::Ended(pass) => PassState::Ended(*pass),
        })
    }

    /// `true` while a pass is recording on `swapchain`.
    pub fn is_recording(&self, swapchain: SwapchainId) -> bool {
        matches!(
            self.frames.get(&swapchain).map(|f| &f.state),
            Some(FrameState::Recording(_))
        )
    }

    /// The first recording pass belonging to `context`, if any.
    pub fn recording_in(&self, context: ContextId) -> Option<RenderPassId> {
        self.recording().find(|pass| pass.id.context() == context).map(|pass| pass.id)
    }

    /// The recording pass holding a binding to `resource`, if any.
    pub fn user_of(&self, resource: ResourceId) -> Option<RenderPassId> {
        self.recording().find(|pass| pass.references(resource)).map(|pass| pass.id)
    }

    /// Checks that a pass may begin on `swapchain` and returns the handle it will get.
    ///
    /// Nothing changes until [`commit_begin`](Self::commit_begin), so a backend
    /// refusal leaves the state untouched.
    /// ## Errors
    /// * `PassAlreadyActive` - If a pass is still recording on the swapchain.
    pub fn prepare_begin(&self, swapchain: SwapchainId) -> Result<RenderPassId, CanopyError> {
        let frame = self
            .frames
            .get(&swapchain)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Swapchain(swapchain)))?;
        if let FrameState::Recording(active) = &frame.state {
            return Err(CanopyError::PassAlreadyActive {
                swapchain,
                active: active.id,
            });
        }
        Ok(RenderPassId::new(swapchain, frame.next_serial))
    }

    /// Moves the swapchain of `pass` into `Recording`.
    pub fn commit_begin(&mut self, pass: RenderPassId) {
        if let Some(frame) = self.frames.get_mut(&pass.swapchain()) {
            frame.next_serial = pass.serial() + 1;
            frame.state = FrameState::Recording(ActivePass::new(pass));
        }
    }

    /// The bindings of `pass`, which must be the pass currently recording.
    /// ## Errors
    /// * `PassAlreadyEnded` - If `pass` was begun and has since ended.
    /// * `InvalidHandle` - If `pass` was never handed out.
    pub fn active(&self, pass: RenderPassId) -> Result<&ActivePass, CanopyError> {
        let frame = self.frame_of(pass)?;
        match &frame.state {
            FrameState::Recording(active) if active.id == pass => Ok(active),
            _ => Err(Self::stale(frame.next_serial, pass)),
        }
    }

    /// Mutable access to the bindings of the recording `pass`.
    pub fn active_mut(&mut self, pass: RenderPassId) -> Result<&mut ActivePass, CanopyError> {
        let frame = self
            .frames
            .get_mut(&pass.swapchain())
            .ok_or(CanopyError::PassAlreadyEnded(pass))?;
        let next_serial = frame.next_serial;
        match &mut frame.state {
            FrameState::Recording(active) if active.id == pass => Ok(active),
            _ => Err(Self::stale(next_serial, pass)),
        }
    }

    /// Ends the recording `pass` and returns what was bound in it.
    pub fn end(&mut self, pass: RenderPassId) -> Result<ActivePass, CanopyError> {
        self.active(pass)?;
        let frame = self
            .frames
            .get_mut(&pass.swapchain())
            .ok_or(CanopyError::PassAlreadyEnded(pass))?;
        match std::mem::replace(&mut frame.state, FrameState::Ended(pass)) {
            FrameState::Recording(active) => Ok(active),
            _ => Err(CanopyError::PassAlreadyEnded(pass)),
        }
    }

    /// Checks that `swapchain` has an ended pass to present, without changing state.
    /// ## Errors
    /// * `PassNotEnded` - If a pass is still recording.
    /// * `NothingToPresent` - If no pass ended since the last present.
    pub fn prepare_present(&self, swapchain: SwapchainId) -> Result<RenderPassId, CanopyError> {
        let frame = self
            .frames
            .get(&swapchain)
            .ok_or(CanopyError::InvalidHandle(ResourceId::Swapchain(swapchain)))?;
        match &frame.state {
            FrameState::Ended(pass) => Ok(*pass),
            FrameState::Recording(_) => Err(CanopyError::PassNotEnded(swapchain)),
            FrameState::Idle => Err(CanopyError::NothingToPresent(swapchain)),
        }
    }

    /// Returns the swapchain to `Idle` after a present.
    pub fn commit_present(&mut self, swapchain: SwapchainId) {
        if let Some(frame) = self.frames.get_mut(&swapchain) {
            frame.state = FrameState::Idle;
        }
    }

    fn recording(&self) -> impl Iterator<Item = &ActivePass> {
        self.frames.values().filter_map(|frame| match &frame.state {
            FrameState::Recording(active) => Some(active),
            _ => None,
        })
    }

    fn frame_of(&self, pass: RenderPassId) -> Result<&SwapchainFrame, CanopyError> {
        // An untracked swapchain was destroyed, which required its passes to be over.
        self.frames
            .get(&pass.swapchain())
            .ok_or(CanopyError::PassAlreadyEnded(pass))
    }

    fn stale(next_serial: u64, pass: RenderPassId) -> CanopyError {
        if pass.serial() < next_serial {
            CanopyError::PassAlreadyEnded(pass)
        } else {
            CanopyError::InvalidHandle(ResourceId::RenderPass(pass))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swapchain() -> SwapchainId {
        SwapchainId::new(ContextId(0), 0)
    }

    fn begin(tracker: &mut PassTracker, swapchain: SwapchainId) -> RenderPassId {
        let pass = tracker.prepare_begin(swapchain).unwrap();
        tracker.commit_begin(pass);
        pass
    }

    #[test]
    fn full_frame_cycle() {
        let mut tracker = PassTracker::new();
        let sc = swapchain();
        tracker.track(sc);
        assert_eq!(tracker.state(sc), Some(PassState::Idle));

        let pass = begin(&mut tracker, sc);
        assert_eq!(tracker.state(sc), Some(PassState::Recording(pass)));
        assert_eq!(
            tracker.prepare_present(sc).unwrap_err(),
            CanopyError::PassNotEnded(sc)
        );

        tracker.end(pass).unwrap();
        assert_eq!(tracker.state(sc), Some(PassState::Ended(pass)));
        assert_eq!(tracker.prepare_present(sc).unwrap(), pass);
        tracker.commit_present(sc);
        assert_eq!(tracker.state(sc), Some(PassState::Idle));
        assert_eq!(
            tracker.prepare_present(sc).unwrap_err(),
            CanopyError::NothingToPresent(sc)
        );
    }

    #[test]
    fn second_begin_while_recording_is_rejected() {
        let mut tracker = PassTracker::new();
        let sc = swapchain();
        tracker.track(sc);
        let pass = begin(&mut tracker, sc);

        assert_eq!(
            tracker.prepare_begin(sc).unwrap_err(),
            CanopyError::PassAlreadyActive {
                swapchain: sc,
                active: pass
            }
        );
    }

    #[test]
    fn ended_pass_handle_is_stale_and_serials_advance() {
        let mut tracker = PassTracker::new();
        let sc = swapchain();
        tracker.track(sc);
        let first = begin(&mut tracker, sc);
        tracker.end(first).unwrap();

        let second = begin(&mut tracker, sc);
        assert_ne!(first, second);
        assert!(second.serial() > first.serial());
        assert_eq!(
            tracker.active_mut(first).unwrap_err(),
            CanopyError::PassAlreadyEnded(first)
        );
        assert_eq!(
            tracker.end(first).unwrap_err(),
            CanopyError::PassAlreadyEnded(first)
        );

        let forged = RenderPassId::new(sc, 42);
        assert_eq!(
            tracker.active(forged).unwrap_err(),
            CanopyError::InvalidHandle(ResourceId::RenderPass(forged))
        );
    }

    #[test]
    fn bindings_make_resources_busy() {
        let mut tracker = PassTracker::new();
        let sc = swapchain();
        tracker.track(sc);
        let pass = begin(&mut tracker, sc);
        let buffer = BufferId::new(ContextId(0), 3);

        assert_eq!(tracker.user_of(ResourceId::Buffer(buffer)), None);
        tracker
            .active_mut(pass)
            .unwrap()
            .uniform_buffers
            .insert(0, (buffer, 0));
        assert_eq!(tracker.user_of(ResourceId::Buffer(buffer)), Some(pass));
        assert_eq!(tracker.recording_in(ContextId(0)), Some(pass));
        assert_eq!(
            tracker.untrack(sc).unwrap_err(),
            CanopyError::ResourceInUse(ResourceId::Swapchain(sc))
        );

        tracker.end(pass).unwrap();
        assert_eq!(tracker.user_of(ResourceId::Buffer(buffer)), None);
        assert!(tracker.untrack(sc).is_ok());
    }
}
