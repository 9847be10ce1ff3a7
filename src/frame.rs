use crate::camera::pose_at;
use crate::core::{Clock, Controller, PerfMonitor};
use crate::error::RenderError;
use crate::state::AppState;
use crate::traits::{RenderFrame, SceneRenderer};

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Rendered; schedule the next refresh.
    Presented(FrameInfo),
    /// Frame dropped on a recoverable failure; schedule the next refresh.
    Skipped(FrameInfo, RenderError),
    /// Fatal failure; the loop must stop.
    Stopped(RenderError),
}

impl FrameOutcome {
    pub fn should_continue(&self) -> bool {
        !matches!(self, FrameOutcome::Stopped(_))
    }
}

/// Drives one iteration per display refresh.
///
/// Order per iteration: sample clock, base camera motion, orbit, perf begin,
/// render, perf end. Scheduling the next refresh is the caller's job and
/// depends on the returned outcome.
pub struct FrameLoop {
    clock: Clock,
    perf: PerfMonitor,
    frame_number: u64,
    last_time: f32,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            perf: PerfMonitor::new(),
            frame_number: 0,
            last_time: 0.0,
        }
    }

    /// Runs one iteration at the clock's current elapsed time.
    pub fn tick(
        &mut self,
        state: &mut AppState,
        input: Option<&dyn Controller>,
        renderer: &mut dyn SceneRenderer,
    ) -> FrameOutcome {
        let sample = self.clock.sample();
        self.advance(sample.elapsed, state, input, renderer)
    }

    /// Runs one iteration at an explicit elapsed time.
    pub fn advance(
        &mut self,
        elapsed: f32,
        state: &mut AppState,
        input: Option<&dyn Controller>,
        renderer: &mut dyn SceneRenderer,
    ) -> FrameOutcome {
        let info = FrameInfo::new(self.frame_number, elapsed, (elapsed - self.last_time).max(0.0));
        self.frame_number += 1;
        self.last_time = elapsed;

        state.camera.apply_pose(&pose_at(elapsed));

        if let Some(input) = input {
            let (_, logical_height) = state.viewport.logical_size();
            let height = (logical_height * state.viewport.device_pixel_ratio()) as f32;
            state.orbit.handle_input(input, height);
        }
        state.orbit.update(&mut state.camera);

        self.perf.begin();
        let result = renderer.render(&RenderFrame {
            store: &state.store,
            materials: &state.materials,
            camera: &state.camera,
            info,
            perf: &self.perf,
        });
        if self.perf.end() {
            log::debug!(
                "{:.0} fps, {:.2} ms/frame, {} objects",
                self.perf.fps(),
                self.perf.frame_ms(),
                state.store.len()
            );
        }

        match result {
            Ok(()) => FrameOutcome::Presented(info),
            Err(err) if err.is_fatal() => {
                log::error!("render failed, stopping: {}", err);
                FrameOutcome::Stopped(err)
            }
            Err(err) => {
                log::debug!("frame {} skipped: {}", info.number, err);
                FrameOutcome::Skipped(info, err)
            }
        }
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
