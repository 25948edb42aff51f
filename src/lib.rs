//=========================================================================
// Pointer Frame: Library Root
//
// Pointer input normalization and per-frame dispatch for simulation and
// render loops.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the platform-independent core (`core`) for custom hosts
// - Keep the winit host (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use pointer_frame::EngineBuilder;
// use pointer_frame::core::FrameTick;
// use pointer_frame::core::input::PointerEvent;
//
// fn main() {
//     EngineBuilder::new()
//         .build(|_tick: &FrameTick, events: Vec<PointerEvent>| {
//             for event in events { /* update the scene */ }
//         })
//         .run()
//         .unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the event normalizer, the frame event buffer and the frame
// driver. It has no windowing dependency and can be driven by any host.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit host (window, pointer capture, redraw clock).
// `engine` wires the platform and the core together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError, HeadlessEngine};
pub use platform::PlatformError;
