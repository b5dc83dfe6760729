//! Frame synchronization.
//!
//! One frame is in flight at a time. Each iteration goes
//! `Idle -> Recording -> Submitted -> WaitingForGpu -> Idle`:
//!
//! 1. the back buffer is acquired (queried fresh every frame),
//! 2. commands are recorded into the single recording target,
//! 3. the recording is closed, submitted and the back buffer presented,
//! 4. the fence is advanced to `N` and a signal for `N` is enqueued,
//! 5. the CPU blocks until the fence's completed value reaches `N`,
//! 6. the recording target is reset for the next frame.
//!
//! The GPU side is abstracted behind [`FrameBackend`] so the handshake can be
//! driven against wgpu ([`crate::context::Context`]) or a simulated queue.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::error::FrameError;

/// Phase of the frame loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FrameState {
    /// The recording target is reset and empty.
    #[default]
    Idle,
    Recording,
    Submitted,
    WaitingForGpu,
}

impl FrameState {
    /// The only state `self` may move to.
    pub const fn next(self) -> FrameState {
        match self {
            FrameState::Idle => FrameState::Recording,
            FrameState::Recording => FrameState::Submitted,
            FrameState::Submitted => FrameState::WaitingForGpu,
            FrameState::WaitingForGpu => FrameState::Idle,
        }
    }

    pub fn can_transition_to(self, to: FrameState) -> bool {
        self.next() == to
    }
}

/// Completed-value side of a [`Fence`], shareable with GPU callbacks.
#[derive(Clone, Debug, Default)]
pub struct FenceCompletion(Arc<AtomicU64>);

impl FenceCompletion {
    /// Records that the GPU reached `value`. Older values are ignored.
    pub fn signal(&self, value: u64) {
        self.0.fetch_max(value, Ordering::AcqRel);
    }

    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

/// Monotonic CPU/GPU fence.
///
/// `value` is the last value the CPU asked the GPU to signal; `completed`
/// is the last value the GPU reported. Neither ever decreases.
#[derive(Debug, Default)]
pub struct Fence {
    value: u64,
    completed: FenceCompletion,
}

impl Fence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value handed to a signal.
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn completed_value(&self) -> u64 {
        self.completed.value()
    }

    /// Bumps the fence and returns the value the next signal must carry.
    pub fn advance(&mut self) -> u64 {
        self.value += 1;
        self.value
    }

    pub fn signal_completion(&self, value: u64) {
        self.completed.signal(value);
    }

    pub fn is_complete(&self, value: u64) -> bool {
        self.completed_value() >= value
    }

    /// Handle the GPU side uses to report completion.
    pub fn completion(&self) -> FenceCompletion {
        self.completed.clone()
    }
}

/// GPU operations the frame loop drives.
///
/// `Target` is the back buffer of the current frame, `Recording` the open
/// command recording. Both are consumed within a single iteration.
pub trait FrameBackend {
    type Target;
    type Recording;

    fn acquire_back_buffer(&mut self) -> Result<Self::Target, FrameError>;

    fn begin_recording(&mut self, target: &Self::Target) -> Result<Self::Recording, FrameError>;

    /// Closes `recording` and submits it to the queue.
    fn close_and_execute(&mut self, recording: Self::Recording) -> Result<(), FrameError>;

    fn present(&mut self, target: Self::Target) -> Result<(), FrameError>;

    /// Enqueues a signal that sets `fence` to `value` once all previously
    /// submitted work has finished.
    fn signal(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError>;

    /// Blocks until `fence` reached `value`. No timeout.
    fn wait_for_fence(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError>;

    fn reset_recording(&mut self) -> Result<(), FrameError> {
        Ok(())
    }
}

/// Outcome of one completed iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// 1-based index of the frame.
    pub frame: u64,
    /// Fence value signaled for this frame.
    pub fence_value: u64,
    /// Whether the CPU had to block for the GPU.
    pub waited: bool,
}

/// Render loop state that would otherwise live in globals.
#[derive(Debug, Default)]
pub struct FrameContext {
    state: FrameState,
    fence: Fence,
    frames: u64,
    quit_requested: bool,
}

impl FrameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing fence, e.g. one shared with other queues.
    pub fn with_fence(fence: Fence) -> Self {
        Self {
            fence,
            ..Self::default()
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn fence(&self) -> &Fence {
        &self.fence
    }

    /// Number of frames that completed a full iteration.
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Stops the loop before the next frame starts recording.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn transition(&mut self, to: FrameState) -> Result<(), FrameError> {
        if !self.state.can_transition_to(to) {
            return Err(FrameError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Runs one iteration of the loop.
    ///
    /// `record` appends the frame's commands between the opening and closing
    /// of the recording. Returns `Ok(None)` without touching the GPU if a quit
    /// was requested.
    pub fn run_frame<B, F>(
        &mut self,
        backend: &mut B,
        record: F,
    ) -> Result<Option<FrameReport>, FrameError>
    where
        B: FrameBackend,
        F: FnOnce(&mut B::Recording, &B::Target) -> Result<(), FrameError>,
    {
        if self.quit_requested {
            log::debug!("Quit requested, skipping frame {}", self.frames + 1);
            return Ok(None);
        }
        if self.state != FrameState::Idle {
            return Err(FrameError::InvalidTransition {
                from: self.state,
                to: FrameState::Recording,
            });
        }
        let completed = self.fence.completed_value();
        if completed < self.fence.value() {
            return Err(FrameError::FrameInFlight {
                completed,
                expected: self.fence.value(),
            });
        }

        let target = backend.acquire_back_buffer()?;
        self.transition(FrameState::Recording)?;
        let recorded = backend
            .begin_recording(&target)
            .and_then(|mut recording| record(&mut recording, &target).map(|_| recording));
        let recording = match recorded {
            Ok(recording) => recording,
            Err(err) => {
                // nothing was submitted, the frame can be retried from Idle
                backend.reset_recording()?;
                self.state = FrameState::Idle;
                return Err(err);
            }
        };

        backend.close_and_execute(recording)?;
        self.transition(FrameState::Submitted)?;
        backend.present(target)?;

        let value = self.fence.advance();
        backend.signal(&self.fence, value)?;
        self.transition(FrameState::WaitingForGpu)?;

        let waited = !self.fence.is_complete(value);
        if waited {
            backend.wait_for_fence(&self.fence, value)?;
        }
        let completed = self.fence.completed_value();
        if completed < value {
            return Err(FrameError::FenceIncomplete {
                completed,
                expected: value,
            });
        }

        backend.reset_recording()?;
        self.transition(FrameState::Idle)?;
        self.frames += 1;
        log::trace!(
            "Frame {} done, fence {value}, waited: {waited}",
            self.frames
        );
        Ok(Some(FrameReport {
            frame: self.frames,
            fence_value: value,
            waited,
        }))
    }

    /// Waits until the GPU has finished everything signaled so far.
    pub fn flush<B: FrameBackend>(&mut self, backend: &mut B) -> Result<(), FrameError> {
        let value = self.fence.value();
        if !self.fence.is_complete(value) {
            backend.wait_for_fence(&self.fence, value)?;
        }
        let completed = self.fence.completed_value();
        if completed < value {
            return Err(FrameError::FenceIncomplete {
                completed,
                expected: value,
            });
        }
        log::debug!("Flushed GPU at fence {value}");
        Ok(())
    }
}
