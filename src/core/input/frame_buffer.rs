//=========================================================================
// Frame Event Buffer
//
// Accumulates normalized pointer events between frame boundaries and
// hands the complete ordered batch to the frame loop exactly once.
//
// Responsibilities:
// - Append events in arrival order (no dedup, no coalescing, no drops)
// - Drain all pending events atomically and reset to empty
// - Allow producer and consumer to live on different threads
//
// Notes:
// `append` and `drain` are serialized by a single mutex. `drain` swaps
// the pending vector out under the lock, so an event is either in the
// returned batch or still pending, never both.
//=========================================================================

//=== External Crates =====================================================

use log::trace;
use parking_lot::Mutex;

//=== Internal Modules ====================================================

use super::event::PointerEvent;

//=== FrameEventBuffer ====================================================

/// Thread-safe, unbounded, order-preserving event store for one frame.
///
/// Share via `Arc` when the producer and the frame loop run on different
/// threads. Capacity is only a preallocation hint; the buffer grows as
/// needed and relies on the consumer draining at a steady cadence.
#[derive(Debug)]
pub struct FrameEventBuffer {
    pending: Mutex<Vec<PointerEvent>>,
    capacity_hint: usize,
}

impl FrameEventBuffer {
    const DEFAULT_CAPACITY: usize = 128;

    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a buffer that preallocates room for `capacity` events per frame.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(Vec::with_capacity(capacity)),
            capacity_hint: capacity,
        }
    }

    //--- Producer Side ----------------------------------------------------

    /// Appends one event. Never blocks on the consumer beyond the lock.
    pub fn append(&self, event: impl Into<PointerEvent>) {
        self.pending.lock().push(event.into());
    }

    /// Appends a sequence of events as one contiguous run.
    pub fn extend<I>(&self, events: I)
    where
        I: IntoIterator,
        I::Item: Into<PointerEvent>,
    {
        self.pending.lock().extend(events.into_iter().map(Into::into));
    }

    //--- Consumer Side ----------------------------------------------------

    /// Returns every event appended since the last drain and empties the
    /// buffer. Returns an empty vector immediately if nothing is pending.
    pub fn drain(&self) -> Vec<PointerEvent> {
        let replacement = Vec::with_capacity(self.capacity_hint);
        let batch = std::mem::replace(&mut *self.pending.lock(), replacement);

        if !batch.is_empty() {
            trace!(target: "core::input", "Drained {} pointer events", batch.len());
        }
        batch
    }

    //--- Utilities --------------------------------------------------------

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Default for FrameEventBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{ButtonMask, MouseButton, NormalizedMotionEvent, ClickEvent};
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    //--- Test Helpers -----------------------------------------------------

    fn motion(delta_x: f32) -> NormalizedMotionEvent {
        NormalizedMotionEvent {
            delta_x,
            delta_y: 0.0,
            delta_time: None,
            button_mask: ButtonMask::NONE,
        }
    }

    fn delta_xs(events: &[PointerEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| e.as_motion().map(|m| m.delta_x))
            .collect()
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn drain_returns_arrival_order() {
        let buffer = FrameEventBuffer::new();
        for i in 0..5 {
            buffer.append(motion(i as f32));
        }

        let batch = buffer.drain();
        assert_eq!(delta_xs(&batch), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn second_drain_is_empty() {
        let buffer = FrameEventBuffer::new();
        buffer.append(motion(1.0));

        assert_eq!(buffer.drain().len(), 1);
        assert!(buffer.drain().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn drain_on_fresh_buffer_is_empty() {
        let buffer = FrameEventBuffer::with_capacity(4);
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn identical_events_are_all_kept() {
        let buffer = FrameEventBuffer::new();
        buffer.append(motion(2.0));
        buffer.append(motion(2.0));
        buffer.append(motion(2.0));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn mixed_kinds_keep_their_order() {
        let buffer = FrameEventBuffer::new();
        let click = ClickEvent {
            x: 1.0,
            y: 1.0,
            button: MouseButton::Left,
            timestamp: Duration::ZERO,
        };
        buffer.append(motion(1.0));
        buffer.append(click);
        buffer.extend([motion(2.0), motion(3.0)]);

        let batch = buffer.drain();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch[1], PointerEvent::Click(click));
        assert_eq!(delta_xs(&batch), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn grows_past_capacity_hint() {
        let buffer = FrameEventBuffer::with_capacity(2);
        for i in 0..1_000 {
            buffer.append(motion(i as f32));
        }
        assert_eq!(buffer.drain().len(), 1_000);
    }

    //--- Concurrency ------------------------------------------------------
    //
    // A producer thread appends a known sequence while the consumer drains
    // repeatedly; the concatenated batches must equal what was appended.
    //
    #[test]
    fn concurrent_drains_lose_nothing() {
        const TOTAL: usize = 20_000;

        let buffer = Arc::new(FrameEventBuffer::new());
        let producer_buffer = Arc::clone(&buffer);

        let producer = thread::spawn(move || {
            for i in 0..TOTAL {
                producer_buffer.append(motion(i as f32));
            }
        });

        let mut received = Vec::with_capacity(TOTAL);
        while received.len() < TOTAL {
            received.extend(delta_xs(&buffer.drain()));
            thread::yield_now();
        }
        producer.join().unwrap();
        received.extend(delta_xs(&buffer.drain()));

        let expected: Vec<f32> = (0..TOTAL).map(|i| i as f32).collect();
        assert_eq!(received, expected);
    }

    //--- Properties -------------------------------------------------------

    proptest! {
        #[test]
        fn interleaved_drains_concatenate_to_appends(ops in prop::collection::vec(any::<bool>(), 0..200)) {
            let buffer = FrameEventBuffer::new();
            let mut appended = Vec::new();
            let mut drained = Vec::new();

            for (i, is_append) in ops.into_iter().enumerate() {
                if is_append {
                    buffer.append(motion(i as f32));
                    appended.push(i as f32);
                } else {
                    drained.extend(delta_xs(&buffer.drain()));
                }
            }
            drained.extend(delta_xs(&buffer.drain()));

            prop_assert_eq!(drained, appended);
        }

        #[test]
        fn n_appends_then_drain_yields_n(n in 0usize..300) {
            let buffer = FrameEventBuffer::new();
            for i in 0..n {
                buffer.append(motion(i as f32));
            }
            let batch = buffer.drain();
            prop_assert_eq!(batch.len(), n);
            prop_assert!(buffer.drain().is_empty());
        }
    }
}
