pub mod clock;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod orbit;
pub mod perf;

pub use clock::{Clock, ClockSample};
pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use orbit::{OrbitControls, Spherical};
pub use perf::PerfMonitor;
