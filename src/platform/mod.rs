//=========================================================================
// Platform Subsystem
//
// Winit host for the core: turns OS pointer events into raw samples and
// drives one frame per display refresh.
//
// Architecture:
// ```text
//  Main Thread
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                             │
//  │   ↓                                           │
//  │  InputProcessor                               │
//  │   ├─ Tracks held buttons, cursor position     │
//  │   └─ Integrates raw motion while captured     │
//  │   ↓ RawPointerSample                          │
//  │  PointerInput (normalize + append)            │
//  │   ↓                                           │
//  │  FrameEventBuffer                             │
//  │   ↓ RedrawRequested (frame boundary)          │
//  │  FrameDriver::tick → Simulation::step         │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: the buffer is drained exactly
//   once per redraw, then the next redraw is requested
// - **Capture on click**: a press requests pointer lock (falling back to
//   confinement); Escape or focus loss releases it
// - **Baseline reset on capture change**: switching between OS cursor and
//   raw device motion is a discontinuity, so the normalizer is reset
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Instant;

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::frame::{FrameDriver, Simulation};
use crate::core::input::{FrameEventBuffer, PointerInput};
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop and a window no frames run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    /// The OS refused to create the window.
    #[error("Window creation failed: {0}")]
    WindowCreation(#[source] winit::error::OsError),
}

//=== PlatformConfig ======================================================

/// Window and capture settings, filled in by the engine builder.
#[derive(Debug, Clone)]
pub(crate) struct PlatformConfig {
    pub(crate) title: String,
    pub(crate) inner_size: (u32, u32),
    pub(crate) capture_on_click: bool,
    pub(crate) buffer_capacity: usize,
}

//=== Platform ============================================================

/// Window owner, input host and frame clock.
///
/// # Fields
///
/// - `window`: Created lazily in `resumed()` (mobile compatibility)
/// - `processor`: Converts Winit events → raw samples
/// - `input`: Normalizes samples and appends to the frame buffer
/// - `driver`: Drains the buffer on every redraw
pub(crate) struct Platform<S: Simulation> {
    config: PlatformConfig,
    window: Option<Window>,
    processor: InputProcessor,
    input: PointerInput,
    driver: FrameDriver<S>,

    /// First fatal error raised inside the event loop.
    failure: Option<PlatformError>,
}

impl<S: Simulation> Platform<S> {
    //--- Construction -----------------------------------------------------

    /// Creates the host; the window is created later in `resumed()`.
    pub(crate) fn new(config: PlatformConfig, simulation: S) -> Self {
        let buffer = Arc::new(FrameEventBuffer::with_capacity(config.buffer_capacity));
        info!(target: "platform", "Platform subsystem initialized");

        Self {
            config,
            window: None,
            processor: InputProcessor::new(Instant::now()),
            input: PointerInput::new(Arc::clone(&buffer)),
            driver: FrameDriver::new(buffer, simulation),
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes, then returns the
    /// simulation after delivering any pending input. `on_shutdown` also
    /// runs when window creation fails inside the loop.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window could not be created.
    pub(crate) fn run(mut self) -> Result<S, PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        self.conclude()
    }

    /// Delivers pending input and shuts the simulation down, then reports
    /// the first fatal error raised inside the event loop, if any.
    fn conclude(self) -> Result<S, PlatformError> {
        let simulation = self.driver.finish();
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(simulation),
        }
    }

    //--- Input Handling ---------------------------------------------------

    fn handle_cursor_moved(&mut self, x: f32, y: f32, now: Instant) {
        if let Some(sample) = self.processor.process_cursor_moved(x, y, now) {
            self.input.on_pointer_move(sample);
        }
    }

    fn handle_raw_motion(&mut self, dx: f64, dy: f64, now: Instant) {
        if let Some(sample) = self.processor.process_raw_motion(dx, dy, now) {
            self.input.on_pointer_move(sample);
        }
    }

    /// Returns `true` if the event was a press (a click was buffered).
    fn handle_mouse_button(&mut self, button: WinitMouseButton, state: ElementState, now: Instant) -> bool {
        match self.processor.process_mouse_button(button, state, now) {
            Some((sample, button)) => {
                self.input.on_click(sample, button);
                true
            }
            None => false,
        }
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta, now: Instant) {
        let sample = self.processor.process_wheel(delta, now);
        self.input.on_wheel(sample);
    }

    /// Records a capture transition and invalidates the baseline on change.
    fn on_capture_changed(&mut self, captured: bool) {
        if self.processor.set_captured(captured) {
            info!(target: "platform::input", "Pointer capture {}", if captured { "acquired" } else { "released" });
            self.input.reset_baseline();
        }
    }

    //--- Pointer Capture --------------------------------------------------

    fn acquire_capture(&mut self) {
        let Some(window) = &self.window else { return };

        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.on_capture_changed(true);
            }
            Err(e) => warn!(target: "platform::input", "Pointer capture unavailable: {}", e),
        }
    }

    fn release_capture(&mut self) {
        if !self.processor.is_captured() {
            return;
        }
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!(target: "platform::input", "Failed to release pointer capture: {}", e);
            }
            window.set_cursor_visible(true);
        }
        self.on_capture_changed(false);
    }

    //--- Frame Boundary ---------------------------------------------------

    fn handle_frame(&mut self, now: Instant) {
        let frame = self.driver.tick(now);
        trace!(target: "platform", "Frame {} complete ({:?})", frame.index, frame.delta);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl<S: Simulation> ApplicationHandler for Platform<S> {
    /// Creates the window on startup (or the first mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let (width, height) = self.config.inner_size;
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(PlatformError::WindowCreation(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let now = Instant::now();

        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(position.x as f32, position.y as f32, now);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = self.handle_mouse_button(button, state, now);
                if pressed && self.config.capture_on_click && !self.processor.is_captured() {
                    self.acquire_capture();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => self.handle_wheel(delta, now),

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let escape = key_event.physical_key == PhysicalKey::Code(KeyCode::Escape);
                if escape && key_event.state == ElementState::Pressed {
                    self.release_capture();
                }
            }

            WindowEvent::Focused(false) => self.release_capture(),

            WindowEvent::RedrawRequested => {
                self.handle_frame(now);

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Resized, Moved, etc. (not input)
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.handle_raw_motion(dx, dy, Instant::now());
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
