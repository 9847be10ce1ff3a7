use crate::camera::PerspectiveCamera;
use crate::core::PerfMonitor;
use crate::error::RenderError;
use crate::frame::FrameInfo;
use crate::scene::{Materials, SceneGraphStore};

/// Everything one frame draws from. `perf` is mid-sample while the
/// renderer holds it.
pub struct RenderFrame<'a> {
    pub store: &'a SceneGraphStore,
    pub materials: &'a Materials,
    pub camera: &'a PerspectiveCamera,
    pub info: FrameInfo,
    pub perf: &'a PerfMonitor,
}

/// Scene renderer - draws the store through a camera onto its target
pub trait SceneRenderer {
    /// Render one frame. Recoverable failures are reported and the caller
    /// decides whether to continue.
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError>;

    /// Resize the output target, in physical pixels. Zero sizes are ignored.
    fn resize(&mut self, width: u32, height: u32);
}
