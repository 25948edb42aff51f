//=========================================================================
// Engine
//
// Main entry point: configures and runs the input pipeline around a
// user-supplied simulation.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(sim)──>  Engine  ──run()──────────>  [Winit window]
//         │                             │                           one frame per
//         ├─ with_title()               │                           redraw
//         ├─ with_inner_size()          └──spawn_headless(hz)──>  [Frame thread]
//         ├─ with_capture_on_click()                                fixed cadence,
//         └─ with_buffer_capacity()                                 host feeds
//                                                                   PointerInput
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;
use std::thread;

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Sender};
use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::frame::{DriverSignal, FrameDriver, Simulation};
use crate::core::input::{FrameEventBuffer, PointerInput};
use crate::platform::{Platform, PlatformConfig, PlatformError};

//=== EngineError =========================================================

/// Errors surfaced by [`Engine::run`] and [`HeadlessEngine::shutdown`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The headless frame thread panicked inside the simulation.
    #[error("Frame thread panicked")]
    FrameThreadPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Pointer Frame"
/// - **Inner size**: 800x600 logical pixels
/// - **Capture on click**: enabled
/// - **Buffer capacity**: 128 events (preallocation, not a limit)
///
/// # Examples
///
/// ```no_run
/// use pointer_frame::EngineBuilder;
/// use pointer_frame::core::{FrameTick, input::PointerEvent};
///
/// EngineBuilder::new()
///     .with_title("Orbit")
///     .with_inner_size(1280, 720)
///     .build(|tick: &FrameTick, events: Vec<PointerEvent>| {
///         println!("frame {}: {} events", tick.index, events.len());
///     })
///     .run()
///     .expect("engine failed");
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    title: String,
    inner_size: (u32, u32),
    capture_on_click: bool,
    buffer_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Pointer Frame".to_string(),
            inner_size: (800, 600),
            capture_on_click: true,
            buffer_capacity: 128,
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_inner_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.inner_size = (width, height);
        self
    }

    /// Whether a click inside the window requests exclusive pointer capture.
    ///
    /// Default: true
    pub fn with_capture_on_click(mut self, enabled: bool) -> Self {
        self.capture_on_click = enabled;
        self
    }

    /// Sets how many events the frame buffer preallocates per frame.
    ///
    /// The buffer still grows past this; it never drops input.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Buffer capacity must be positive");
        self.buffer_capacity = capacity;
        self
    }

    /// Builds the engine around `simulation`.
    pub fn build<S: Simulation>(self, simulation: S) -> Engine<S> {
        info!(
            "Building engine ({:?}, {}x{}, capture on click: {})",
            self.title, self.inner_size.0, self.inner_size.1, self.capture_on_click
        );

        Engine {
            config: PlatformConfig {
                title: self.title,
                inner_size: self.inner_size,
                capture_on_click: self.capture_on_click,
                buffer_capacity: self.buffer_capacity,
            },
            simulation,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Configured engine, ready to run.
pub struct Engine<S: Simulation> {
    config: PlatformConfig,
    simulation: S,
}

impl<S: Simulation> Engine<S> {
    //--- Execution --------------------------------------------------------

    /// Opens the window and runs one simulation step per redraw until the
    /// window closes. Returns the simulation afterwards.
    ///
    /// Must be called on the main thread.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the event loop or window cannot
    /// be created.
    pub fn run(self) -> Result<S, EngineError> {
        info!("Starting engine runtime");

        let platform = Platform::new(self.config, self.simulation);
        let simulation = platform.run().map_err(|e| {
            error!("Platform error: {}", e);
            e
        })?;

        info!("Engine shutdown complete");
        Ok(simulation)
    }
}

impl<S: Simulation + Send + 'static> Engine<S> {
    /// Runs the frame loop on its own thread at `rate_hz` without a window.
    ///
    /// The caller becomes the input host: feed the returned
    /// [`HeadlessEngine::input`] from any source (replays, tests, another
    /// windowing layer).
    ///
    /// # Panics
    ///
    /// Panics if `rate_hz <= 0.0`, or if it is so small that one frame
    /// period overflows a `Duration`.
    pub fn spawn_headless(self, rate_hz: f64) -> HeadlessEngine<S> {
        let buffer = Arc::new(FrameEventBuffer::with_capacity(self.config.buffer_capacity));
        let (signals, receiver) = unbounded();

        let join = FrameDriver::new(Arc::clone(&buffer), self.simulation).spawn(rate_hz, receiver);
        info!("Headless frame loop spawned ({} Hz)", rate_hz);

        HeadlessEngine {
            input: PointerInput::new(buffer),
            signals,
            join,
        }
    }
}

//=== HeadlessEngine ======================================================

/// Handle to a running headless frame loop.
pub struct HeadlessEngine<S> {
    /// Producer side of the pipeline.
    pub input: PointerInput,
    signals: Sender<DriverSignal>,
    join: thread::JoinHandle<S>,
}

impl<S> HeadlessEngine<S> {
    /// Stops the loop after delivering all pending input and returns the
    /// simulation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FrameThreadPanicked`] if the simulation
    /// panicked on the frame thread.
    pub fn shutdown(self) -> Result<S, EngineError> {
        // A send error means the thread already stopped; join reports why.
        let _ = self.signals.send(DriverSignal::Shutdown);

        self.join.join().map_err(|e| {
            error!("Frame thread panicked: {:?}", e);
            EngineError::FrameThreadPanicked
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::FrameTick;
    use crate::core::input::{ButtonMask, PointerEvent, RawPointerSample};

    #[derive(Default)]
    struct Counter {
        events: usize,
        frames: usize,
    }

    impl Simulation for Counter {
        fn step(&mut self, _tick: &FrameTick, events: Vec<PointerEvent>) {
            self.frames += 1;
            self.events += events.len();
        }
    }

    struct Panicker;

    impl Simulation for Panicker {
        fn step(&mut self, _tick: &FrameTick, events: Vec<PointerEvent>) {
            if !events.is_empty() {
                panic!("simulation failure");
            }
        }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "Pointer Frame");
        assert_eq!(builder.inner_size, (800, 600));
        assert!(builder.capture_on_click);
        assert_eq!(builder.buffer_capacity, 128);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_title("Orbit")
            .with_inner_size(1280, 720)
            .with_capture_on_click(false)
            .with_buffer_capacity(256)
            .build(Counter::default());

        assert_eq!(engine.config.title, "Orbit");
        assert_eq!(engine.config.inner_size, (1280, 720));
        assert!(!engine.config.capture_on_click);
        assert_eq!(engine.config.buffer_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Buffer capacity must be positive")]
    fn builder_with_buffer_capacity_panics_on_zero() {
        EngineBuilder::new().with_buffer_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_inner_size_panics_on_zero() {
        EngineBuilder::new().with_inner_size(0, 600);
    }

    //=====================================================================
    // Headless Tests
    //=====================================================================

    #[test]
    fn headless_delivers_all_input() {
        let mut engine = EngineBuilder::new().build(Counter::default()).spawn_headless(500.0);

        for i in 0..100u64 {
            engine
                .input
                .on_pointer_move(RawPointerSample::at_millis(i as f32, 0.0, ButtonMask::NONE, i));
        }

        let counter = engine.shutdown().unwrap();
        assert_eq!(counter.events, 100);
        assert!(counter.frames >= 1);
    }

    #[test]
    fn headless_reports_simulation_panic() {
        let mut engine = EngineBuilder::new().build(Panicker).spawn_headless(500.0);
        engine
            .input
            .on_pointer_move(RawPointerSample::at_millis(0.0, 0.0, ButtonMask::NONE, 0));

        assert!(matches!(engine.shutdown(), Err(EngineError::FrameThreadPanicked)));
    }
}
