//=========================================================================
// Frame Dispatch
//
// Drives the simulation once per frame with the complete, ordered batch
// of pointer input gathered since the previous frame.
//
// Architecture:
// ```text
//   Producer (host callbacks)          Frame loop
//   ┌────────────────────┐            ┌─────────────────────────┐
//   │ PointerInput       │            │ FrameDriver             │
//   │  └─ append() ──────┼──► Buffer ─┼─► drain() (once/tick)   │
//   └────────────────────┘            │     ↓                   │
//                                     │   Simulation::step()    │
//                                     └─────────────────────────┘
// ```
//
// Two ways to run the loop:
// - `FrameDriver::tick()` called by the host on each display refresh
//   (the winit platform does this on `RedrawRequested`)
// - `FrameDriver::spawn()` for a fixed-rate, headless loop on its own
//   thread, stopped via a `DriverSignal` channel
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::{select, tick, Receiver};
use log::{debug, info};

//=== Internal Modules ====================================================

use crate::core::input::{FrameEventBuffer, PointerEvent};

//=== TickControl =========================================================

/// Frame loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== DriverSignal ========================================================

/// Messages accepted by a spawned frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverSignal {
    /// Deliver the last pending batch and stop.
    Shutdown,
}

//=== FrameTick ===========================================================

/// Timing metadata delivered alongside each frame's batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame counter.
    pub index: u64,

    /// Time since the previous tick (zero on the first tick).
    pub delta: Duration,

    /// Time since the first tick.
    pub elapsed: Duration,
}

//=== Simulation ==========================================================

/// The per-frame consumer of pointer input.
///
/// `events` is the complete input history for the frame, in arrival
/// order. The driver does not keep a copy.
pub trait Simulation {
    fn step(&mut self, tick: &FrameTick, events: Vec<PointerEvent>);

    /// Called once after the final batch when the loop stops.
    fn on_shutdown(&mut self) {}
}

impl<F> Simulation for F
where
    F: FnMut(&FrameTick, Vec<PointerEvent>),
{
    fn step(&mut self, tick: &FrameTick, events: Vec<PointerEvent>) {
        self(tick, events)
    }
}

//=== FrameDriver =========================================================

/// Drains the frame buffer exactly once per tick and forwards the batch.
pub struct FrameDriver<S: Simulation> {
    buffer: Arc<FrameEventBuffer>,
    simulation: S,
    frame_index: u64,
    first_tick: Option<Instant>,
    last_tick: Option<Instant>,
}

impl<S: Simulation> FrameDriver<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(buffer: Arc<FrameEventBuffer>, simulation: S) -> Self {
        Self {
            buffer,
            simulation,
            frame_index: 0,
            first_tick: None,
            last_tick: None,
        }
    }

    //--- tick() -----------------------------------------------------------
    //
    // One frame: drain, build timing metadata, step the simulation.
    //
    pub fn tick(&mut self, now: Instant) -> FrameTick {
        let events = self.buffer.drain();
        let frame = self.advance_clock(now);

        if !events.is_empty() {
            debug!(
                target: "core::frame",
                "Frame {}: delivering {} events",
                frame.index,
                events.len()
            );
        }

        self.simulation.step(&frame, events);
        frame
    }

    //--- finish() ---------------------------------------------------------
    //
    // Delivers whatever is still pending as a last frame, notifies the
    // simulation and hands it back.
    //
    pub fn finish(mut self) -> S {
        if !self.buffer.is_empty() {
            self.tick(Instant::now());
        }
        self.simulation.on_shutdown();
        info!(target: "core::frame", "Frame loop stopped after {} frames", self.frame_index);
        self.simulation
    }

    //--- Accessors --------------------------------------------------------

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    /// Number of frames delivered so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    pub fn buffer(&self) -> &Arc<FrameEventBuffer> {
        &self.buffer
    }

    //--- Internal Helpers -------------------------------------------------

    fn advance_clock(&mut self, now: Instant) -> FrameTick {
        let first = *self.first_tick.get_or_insert(now);
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        let frame = FrameTick {
            index: self.frame_index,
            delta,
            elapsed: now.saturating_duration_since(first),
        };
        self.frame_index += 1;
        frame
    }

    fn control_for(signal: Result<DriverSignal, crossbeam_channel::RecvError>) -> TickControl {
        match signal {
            Ok(DriverSignal::Shutdown) => TickControl::Exit,
            Err(_) => TickControl::Exit,
        }
    }
}

impl<S: Simulation + Send + 'static> FrameDriver<S> {
    //--- spawn() ----------------------------------------------------------
    //
    // Runs the frame loop at `rate_hz` on a dedicated thread until a
    // `Shutdown` signal arrives or every signal sender is dropped. The
    // simulation is returned through the join handle.
    //
    // Panics if `rate_hz` is not positive, or so small that its frame
    // period does not fit in a `Duration`.
    //
    pub fn spawn(mut self, rate_hz: f64, signals: Receiver<DriverSignal>) -> thread::JoinHandle<S> {
        assert!(rate_hz > 0.0, "Frame rate must be positive, got {}", rate_hz);
        let Ok(period) = Duration::try_from_secs_f64(1.0 / rate_hz) else {
            panic!("Frame rate too small to form a frame period, got {}", rate_hz);
        };

        thread::spawn(move || {
            info!(target: "core::frame", "Frame loop started ({} Hz)", rate_hz);
            let ticker = tick(period);

            loop {
                let control = select! {
                    recv(ticker) -> instant => {
                        if let Ok(now) = instant {
                            self.tick(now);
                        }
                        TickControl::Continue
                    }
                    recv(signals) -> signal => Self::control_for(signal),
                };

                if control == TickControl::Exit {
                    break;
                }
            }

            self.finish()
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
