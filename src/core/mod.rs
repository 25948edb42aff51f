//=========================================================================
// Core
//
// Platform-independent input aggregation and frame dispatch.
//
// Responsibilities:
// - Normalize raw pointer samples into relative events (`input`)
// - Buffer events between frame boundaries (`input::frame_buffer`)
// - Deliver each frame's batch to the simulation once (`frame`)
//
// Notes:
// Nothing in `core` depends on winit. Any host (a window toolkit, a
// browser bridge, a replay harness) can drive it through `PointerInput`
// and `FrameDriver`.
//
//=========================================================================

pub mod frame;
pub mod input;

pub use frame::{DriverSignal, FrameDriver, FrameTick, Simulation, TickControl};
pub use input::{FrameEventBuffer, PointerInput};
