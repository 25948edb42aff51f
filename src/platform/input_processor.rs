//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit pointer events into core `RawPointerSample`s.
//
// Architecture:
//   Winit Events → InputProcessor → RawPointerSample → PointerInput
//
// Stateful tracking: Winit reports button transitions separately from
// motion, so the processor keeps the held-button mask and the last cursor
// position and stamps both onto every sample. While the pointer is
// captured, OS cursor events are ignored and raw device motion is
// integrated into a virtual absolute position instead.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::{Duration, Instant};

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta};

//=== Internal Dependencies ===============================================

use crate::core::input::{ButtonMask, MouseButton, RawPointerSample, RawWheelSample};

//=== InputProcessor ======================================================

/// Converts Winit events to raw core samples with button and capture tracking.
pub(crate) struct InputProcessor {
    origin: Instant,
    buttons: ButtonMask,
    position: (f32, f32),
    captured: bool,
}

impl InputProcessor {
    /// Pixels reported per wheel line for line-based wheel devices.
    const PIXELS_PER_LINE: f32 = 16.0;

    //--- Construction -----------------------------------------------------

    pub(crate) fn new(origin: Instant) -> Self {
        Self {
            origin,
            buttons: ButtonMask::NONE,
            position: (0.0, 0.0),
            captured: false,
        }
    }

    //--- Capture State ----------------------------------------------------

    /// Switches between cursor and captured (raw motion) tracking.
    ///
    /// Returns `true` if the state changed; callers must then invalidate
    /// the normalizer baseline.
    pub(crate) fn set_captured(&mut self, captured: bool) -> bool {
        let changed = self.captured != captured;
        self.captured = captured;
        changed
    }

    pub(crate) fn is_captured(&self) -> bool {
        self.captured
    }

    #[cfg(test)]
    pub(crate) fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    //--- Event Processing -------------------------------------------------

    /// Converts an OS cursor position (ignored while captured).
    pub(crate) fn process_cursor_moved(&mut self, x: f32, y: f32, now: Instant) -> Option<RawPointerSample> {
        if self.captured {
            return None;
        }
        self.position = (x, y);
        Some(self.sample(now))
    }

    /// Converts raw device motion (only used while captured).
    pub(crate) fn process_raw_motion(&mut self, dx: f64, dy: f64, now: Instant) -> Option<RawPointerSample> {
        if !self.captured {
            return None;
        }
        self.position.0 += dx as f32;
        self.position.1 += dy as f32;
        Some(self.sample(now))
    }

    /// Updates the held-button mask; presses yield a click sample.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
        now: Instant,
    ) -> Option<(RawPointerSample, MouseButton)> {
        let button = map_button(button)?;

        match state {
            ElementState::Pressed => {
                self.buttons.insert(button);
                Some((self.sample(now), button))
            }
            ElementState::Released => {
                self.buttons.remove(button);
                None
            }
        }
    }

    /// Converts a wheel delta, scaling line deltas to pixels.
    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta, now: Instant) -> RawWheelSample {
        let (delta_x, delta_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x * Self::PIXELS_PER_LINE, y * Self::PIXELS_PER_LINE),
            MouseScrollDelta::PixelDelta(position) => (position.x as f32, position.y as f32),
        };

        RawWheelSample {
            delta_x,
            delta_y,
            timestamp: self.timestamp(now),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn timestamp(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.origin)
    }

    fn sample(&self, now: Instant) -> RawPointerSample {
        RawPointerSample::new(self.position.0, self.position.1, self.buttons, self.timestamp(now))
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Maps Winit buttons to core buttons; `Other` buttons have no mask bit.
fn map_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

//=========================================================================
// Tests
//=========================================================================
