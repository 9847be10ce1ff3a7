use std::time::Instant;

/// Window over which the FPS figure is averaged, seconds.
pub const FPS_WINDOW: f32 = 1.0;

/// Frame-time and FPS monitor.
///
/// `begin`/`end` bracket the render work of one frame. The frame-time
/// reading is per frame; the FPS reading refreshes once per window.
#[derive(Debug, Clone)]
pub struct PerfMonitor {
    frame_start: Option<Instant>,
    last_end: Option<Instant>,
    frame_ms: f32,
    fps: f32,
    window_elapsed: f32,
    window_frames: u32,
    total_frames: u64,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            last_end: None,
            frame_ms: 0.0,
            fps: 0.0,
            window_elapsed: 0.0,
            window_frames: 0,
            total_frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Closes the sample opened by `begin`. Unpaired calls are ignored.
    /// Returns true when the FPS reading was refreshed.
    pub fn end(&mut self) -> bool {
        let Some(start) = self.frame_start.take() else {
            return false;
        };
        let now = Instant::now();
        let work = now.duration_since(start).as_secs_f32();
        let since_last = match self.last_end {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None => work,
        };
        self.last_end = Some(now);
        self.record(work, since_last)
    }

    pub fn is_sampling(&self) -> bool {
        self.frame_start.is_some()
    }

    /// Records one frame taking `work_secs`, ending `since_last_secs` after
    /// the previous one.
    pub fn record(&mut self, work_secs: f32, since_last_secs: f32) -> bool {
        self.frame_ms = work_secs * 1000.0;
        self.total_frames += 1;
        self.window_frames += 1;
        self.window_elapsed += since_last_secs.max(0.0);

        if self.window_elapsed >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / self.window_elapsed;
            self.window_frames = 0;
            self.window_elapsed = 0.0;
            return true;
        }
        false
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    /// Zero until the first window completes.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}
