use std::path::PathBuf;

use thiserror::Error;

/// Startup failures. All of these are fatal: there is no partial scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to load texture {path}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{label} is {width}x{height}, the GPU allows 1..={max} per side")]
    TextureSize {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create render surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter compatible with the render surface")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("render surface reports no supported formats")]
    SurfaceUnsupported,
}

/// Per-frame render failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Surface must be reconfigured before the next frame.
    #[error("render surface lost or outdated")]
    SurfaceLost,

    #[error("timed out acquiring the next surface texture")]
    Timeout,

    #[error("out of GPU memory")]
    OutOfMemory,

    #[error("render failed: {0}")]
    Other(String),
}

impl RenderError {
    /// Fatal errors stop the frame loop; the rest skip a single frame.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::OutOfMemory | RenderError::Other(_))
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::Timeout => RenderError::Timeout,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_errors_are_recoverable() {
        assert!(!RenderError::from(wgpu::SurfaceError::Lost).is_fatal());
        assert!(!RenderError::from(wgpu::SurfaceError::Outdated).is_fatal());
        assert!(!RenderError::from(wgpu::SurfaceError::Timeout).is_fatal());
    }

    #[test]
    fn test_out_of_memory_is_fatal() {
        assert_eq!(
            RenderError::from(wgpu::SurfaceError::OutOfMemory),
            RenderError::OutOfMemory
        );
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(RenderError::Other("boom".into()).is_fatal());
    }
}
