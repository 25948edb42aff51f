//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use pointer_frame::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder, EngineError, HeadlessEngine};

// Frame dispatch
pub use crate::core::frame::{DriverSignal, FrameDriver, FrameTick, Simulation};

// Input pipeline
pub use crate::core::input::{
    ButtonMask, ClickEvent, EventKind, EventNormalizer, FrameEventBuffer, MouseButton,
    NormalizedMotionEvent, PointerEvent, PointerInput, RawPointerSample, RawWheelSample,
    ScrollEvent,
};
