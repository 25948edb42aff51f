//=========================================================================
// Pointer Input
//
// Producer-side entry point for host input callbacks.
//
// Responsibilities:
// - Normalize every raw host sample on the producer path
// - Append the resulting events to the shared frame buffer
// - Expose the baseline reset the host must call on discontinuities
//
// Notes:
// `PointerInput` owns its `EventNormalizer` exclusively, so the baseline
// needs no synchronization. Only the `FrameEventBuffer` is shared with
// the frame loop.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod frame_buffer;
pub mod normalizer;

//=== Public API ==========================================================

pub use event::{
    ButtonMask, ClickEvent, EventKind, MouseButton, NormalizedMotionEvent, PointerEvent,
    RawPointerSample, RawWheelSample, ScrollEvent,
};
pub use frame_buffer::FrameEventBuffer;
pub use normalizer::{Baseline, EventNormalizer};

//=== Standard Library Imports ============================================

use std::sync::Arc;

//=== PointerInput ========================================================

/// Host-facing input sink: normalizes samples and buffers the results.
#[derive(Debug)]
pub struct PointerInput {
    normalizer: EventNormalizer,
    buffer: Arc<FrameEventBuffer>,
}

impl PointerInput {
    //--- Construction -----------------------------------------------------

    /// Creates an input sink feeding `buffer`.
    pub fn new(buffer: Arc<FrameEventBuffer>) -> Self {
        Self {
            normalizer: EventNormalizer::new(),
            buffer,
        }
    }

    //--- Host Callbacks ---------------------------------------------------

    /// Handles one pointer motion sample.
    pub fn on_pointer_move(&mut self, sample: RawPointerSample) {
        let event = self.normalizer.normalize(sample);
        self.buffer.append(event);
    }

    /// Handles one wheel sample.
    pub fn on_wheel(&mut self, sample: RawWheelSample) {
        let event = self.normalizer.normalize_wheel(sample);
        self.buffer.append(event);
    }

    /// Handles a button press at the sample's position.
    pub fn on_click(&mut self, sample: RawPointerSample, button: MouseButton) {
        let event = self.normalizer.normalize_click(sample, button);
        self.buffer.append(event);
    }

    /// Invalidates the motion baseline (e.g. on pointer capture changes).
    pub fn reset_baseline(&mut self) {
        self.normalizer.reset_baseline();
    }

    //--- Accessors --------------------------------------------------------

    pub fn normalizer(&self) -> &EventNormalizer {
        &self.normalizer
    }

    /// Returns the shared buffer this sink appends to.
    pub fn buffer(&self) -> &Arc<FrameEventBuffer> {
        &self.buffer
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
