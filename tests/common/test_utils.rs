use std::collections::VecDeque;

use quad_ngin::{
    error::FrameError,
    sync::{Fence, FenceCompletion, FrameBackend},
};

/// One call the frame loop made into the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum GpuEvent {
    Acquire(u32),
    BeginRecording(u32),
    Execute(Vec<&'static str>),
    Present(u32),
    Signal(u64),
    Wait(u64),
    Reset,
}

/// How the simulated queue retires signals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum GpuMode {
    /// Signals complete once the CPU waits for them.
    Deferred,
    /// Signals complete as soon as they are enqueued.
    Instant,
    /// Waits return without anything completing.
    Stalled,
}

/// A queue that executes nothing and only tracks fence signals.
pub(crate) struct SimulatedGpu {
    mode: GpuMode,
    back_buffers: u32,
    next_back_buffer: u32,
    pending: VecDeque<(FenceCompletion, u64)>,
    last_signaled: Option<(FenceCompletion, u64)>,
    pub(crate) fail_acquire: Option<wgpu::SurfaceError>,
    pub(crate) events: Vec<GpuEvent>,
}

impl SimulatedGpu {
    pub(crate) fn new(mode: GpuMode) -> Self {
        Self {
            mode,
            back_buffers: 2,
            next_back_buffer: 0,
            pending: VecDeque::new(),
            last_signaled: None,
            fail_acquire: None,
            events: Vec::new(),
        }
    }

    pub(crate) fn pending_signals(&self) -> usize {
        self.pending.len()
    }

    /// Retires every pending signal, like a GPU catching up.
    pub(crate) fn drain(&mut self) {
        while let Some((completion, value)) = self.pending.pop_front() {
            completion.signal(value);
        }
    }

    pub(crate) fn take_events(&mut self) -> Vec<GpuEvent> {
        std::mem::take(&mut self.events)
    }
}

impl FrameBackend for SimulatedGpu {
    type Target = u32;
    type Recording = Vec<&'static str>;

    fn acquire_back_buffer(&mut self) -> Result<u32, FrameError> {
        if let Some(err) = self.fail_acquire.take() {
            return Err(err.into());
        }
        let index = self.next_back_buffer;
        self.next_back_buffer = (self.next_back_buffer + 1) % self.back_buffers;
        self.events.push(GpuEvent::Acquire(index));
        Ok(index)
    }

    fn begin_recording(&mut self, target: &u32) -> Result<Vec<&'static str>, FrameError> {
        if let Some((completion, value)) = &self.last_signaled {
            assert!(
                completion.value() >= *value,
                "recording started while fence {value} was still pending"
            );
        }
        self.events.push(GpuEvent::BeginRecording(*target));
        Ok(Vec::new())
    }

    fn close_and_execute(&mut self, recording: Vec<&'static str>) -> Result<(), FrameError> {
        self.events.push(GpuEvent::Execute(recording));
        Ok(())
    }

    fn present(&mut self, target: u32) -> Result<(), FrameError> {
        self.events.push(GpuEvent::Present(target));
        Ok(())
    }

    fn signal(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError> {
        self.events.push(GpuEvent::Signal(value));
        let completion = fence.completion();
        self.last_signaled = Some((completion.clone(), value));
        if self.mode == GpuMode::Instant {
            completion.signal(value);
        } else {
            self.pending.push_back((completion, value));
        }
        Ok(())
    }

    fn wait_for_fence(&mut self, _fence: &Fence, value: u64) -> Result<(), FrameError> {
        self.events.push(GpuEvent::Wait(value));
        if self.mode != GpuMode::Stalled {
            self.drain();
        }
        Ok(())
    }

    fn reset_recording(&mut self) -> Result<(), FrameError> {
        self.events.push(GpuEvent::Reset);
        Ok(())
    }
}

/// Runs `$body` with a headless GPU context on a fresh tokio runtime.
#[cfg(feature = "integration-tests")]
#[macro_export]
macro_rules! headless_test {
    ($width:expr, $height:expr, $body:expr) => {{
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime.");
        runtime.block_on(async move {
            let ctx = quad_ngin::context::HeadlessContext::new($width, $height)
                .await
                .expect("Failed to create headless context for integration test.");
            ($body)(ctx).await
        })
    }};
}
