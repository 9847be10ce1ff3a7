pub mod assets;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod math;
pub mod panel;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod traits;
pub mod types;
pub mod ui;
pub mod viewport;

pub use config::SceneConfig;
pub use error::{RenderError, SceneError};
pub use frame::{FrameInfo, FrameLoop, FrameOutcome};
pub use panel::{PanelBridge, PanelCommand, PanelOutcome, PopulationCounter, WireframeTarget};
pub use state::AppState;
pub use viewport::Viewport;
