//=========================================================================
// Event Normalizer
//=========================================================================
//
// Converts absolute host samples into relative, immutable frame events.
//
// Architecture:
//   RawPointerSample → normalize() → NormalizedMotionEvent
//                         │
//                         └─ Baseline (last x, y, timestamp) advanced
//                            on every call
//
// The first sample after construction or `reset_baseline()` seeds the
// baseline and reports zero motion with no elapsed time. The baseline is
// never expired implicitly; only an explicit reset clears it.
//
// Precondition violations (non-finite coordinates, timestamps moving
// backwards) are host bugs. They are logged and never fatal.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Crates =====================================================

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::event::{
    ClickEvent, MouseButton, NormalizedMotionEvent, RawPointerSample, RawWheelSample, ScrollEvent,
};

//=== Baseline ============================================================

/// Last observed absolute position and capture time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub x: f32,
    pub y: f32,
    pub timestamp: Duration,
}

//=== EventNormalizer =====================================================

/// Stateful converter from raw samples to relative events.
///
/// Owned by the producer. Nothing here is synchronized; keep normalization
/// on the thread that receives host input.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    baseline: Option<Baseline>,
    last_wheel: Option<Duration>,
}

impl EventNormalizer {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Pointer Motion ---------------------------------------------------

    /// Produces the motion event for `sample` and advances the baseline.
    pub fn normalize(&mut self, sample: RawPointerSample) -> NormalizedMotionEvent {
        if !sample.is_finite() {
            warn!(
                target: "core::input",
                "Non-finite pointer sample ({}, {}) passed to normalizer",
                sample.absolute_x,
                sample.absolute_y
            );
        }

        let event = match self.baseline {
            None => {
                trace!(target: "core::input", "Baseline seeded at ({}, {})", sample.absolute_x, sample.absolute_y);
                NormalizedMotionEvent {
                    delta_x: 0.0,
                    delta_y: 0.0,
                    delta_time: None,
                    button_mask: sample.button_mask,
                }
            }
            Some(previous) => NormalizedMotionEvent {
                delta_x: sample.absolute_x - previous.x,
                delta_y: sample.absolute_y - previous.y,
                delta_time: Some(elapsed_since(previous.timestamp, sample.timestamp)),
                button_mask: sample.button_mask,
            },
        };

        self.baseline = Some(Baseline {
            x: sample.absolute_x,
            y: sample.absolute_y,
            timestamp: sample.timestamp,
        });

        event
    }

    //--- Wheel ------------------------------------------------------------

    /// Produces a scroll event, timing it against the previous wheel sample.
    pub fn normalize_wheel(&mut self, sample: RawWheelSample) -> ScrollEvent {
        let delta_time = self
            .last_wheel
            .map(|previous| elapsed_since(previous, sample.timestamp));
        self.last_wheel = Some(sample.timestamp);

        ScrollEvent {
            delta_x: sample.delta_x,
            delta_y: sample.delta_y,
            delta_time,
        }
    }

    //--- Clicks -----------------------------------------------------------

    /// Produces a click event. Clicks do not move the motion baseline.
    pub fn normalize_click(&self, sample: RawPointerSample, button: MouseButton) -> ClickEvent {
        ClickEvent {
            x: sample.absolute_x,
            y: sample.absolute_y,
            button,
            timestamp: sample.timestamp,
        }
    }

    //--- Baseline Control -------------------------------------------------

    /// Forgets the baseline; the next sample reports zero motion.
    ///
    /// Call when the input context changes discontinuously, e.g. after
    /// acquiring or releasing exclusive pointer capture.
    pub fn reset_baseline(&mut self) {
        trace!(target: "core::input", "Baseline invalidated");
        self.baseline = None;
        self.last_wheel = None;
    }

    /// Returns the current baseline, if one exists.
    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }
}

//--- Internal Helpers ----------------------------------------------------

fn elapsed_since(previous: Duration, current: Duration) -> Duration {
    match current.checked_sub(previous) {
        Some(delta) => delta,
        None => {
            warn!(
                target: "core::input",
                "Timestamp moved backwards ({:?} -> {:?}), clamping delta to zero",
                previous,
                current
            );
            Duration::ZERO
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::ButtonMask;
    use proptest::prelude::*;

    //--- Test Helpers -----------------------------------------------------

    fn sample(x: f32, y: f32, millis: u64) -> RawPointerSample {
        RawPointerSample::at_millis(x, y, ButtonMask::NONE, millis)
    }

    fn wheel(delta_y: f32, millis: u64) -> RawWheelSample {
        RawWheelSample {
            delta_x: 0.0,
            delta_y,
            timestamp: Duration::from_millis(millis),
        }
    }

    //=====================================================================
    // Motion Tests
    //=====================================================================

    #[test]
    fn first_sample_reports_no_motion() {
        let mut normalizer = EventNormalizer::new();
        let event = normalizer.normalize(sample(640.0, 480.0, 1_000));

        assert_eq!(event.delta_x, 0.0);
        assert_eq!(event.delta_y, 0.0);
        assert_eq!(event.delta_time, None);
    }

    #[test]
    fn three_sample_scenario() {
        let mut normalizer = EventNormalizer::new();

        let first = normalizer.normalize(sample(100.0, 100.0, 0));
        let second = normalizer.normalize(sample(105.0, 98.0, 16));
        let third = normalizer.normalize(sample(110.0, 100.0, 33));

        assert_eq!((first.delta_x, first.delta_y, first.delta_time), (0.0, 0.0, None));
        assert_eq!(
            (second.delta_x, second.delta_y, second.delta_time),
            (5.0, -2.0, Some(Duration::from_millis(16)))
        );
        assert_eq!(
            (third.delta_x, third.delta_y, third.delta_time),
            (5.0, 2.0, Some(Duration::from_millis(17)))
        );
    }

    #[test]
    fn reset_reseeds_baseline() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(0.0, 0.0, 0));
        normalizer.normalize(sample(10.0, 10.0, 5));

        normalizer.reset_baseline();
        assert!(normalizer.baseline().is_none());

        let event = normalizer.normalize(sample(400.0, 300.0, 10));
        assert_eq!((event.delta_x, event.delta_y, event.delta_time), (0.0, 0.0, None));

        let event = normalizer.normalize(sample(401.0, 299.0, 12));
        assert_eq!((event.delta_x, event.delta_y), (1.0, -1.0));
    }

    #[test]
    fn teleport_is_not_suppressed() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(10.0, 10.0, 0));
        let event = normalizer.normalize(sample(1910.0, -500.0, 1));

        assert_eq!(event.delta_x, 1900.0);
        assert_eq!(event.delta_y, -510.0);
    }

    #[test]
    fn button_mask_passes_through() {
        let mut normalizer = EventNormalizer::new();
        let mask = ButtonMask::from_bits(0b110);
        let event = normalizer.normalize(RawPointerSample::at_millis(1.0, 1.0, mask, 0));
        assert_eq!(event.button_mask, mask);
    }

    #[test]
    fn backwards_timestamp_clamps_to_zero() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(0.0, 0.0, 50));
        let event = normalizer.normalize(sample(3.0, 4.0, 40));

        assert_eq!(event.delta_time, Some(Duration::ZERO));
        assert_eq!((event.delta_x, event.delta_y), (3.0, 4.0));
        assert_eq!(normalizer.baseline().map(|b| b.timestamp), Some(Duration::from_millis(40)));
    }

    #[test]
    fn non_finite_samples_pass_through() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(1.0, 1.0, 0));

        let nan = normalizer.normalize(sample(f32::NAN, 2.0, 10));
        assert!(nan.delta_x.is_nan());
        assert_eq!(nan.delta_y, 1.0);

        let inf = normalizer.normalize(sample(f32::INFINITY, 3.0, 20));
        assert!(inf.delta_x.is_nan() || inf.delta_x.is_infinite());
        assert_eq!(inf.delta_time, Some(Duration::from_millis(10)));

        // A reset recovers from poisoned coordinates.
        normalizer.reset_baseline();
        let recovered = normalizer.normalize(sample(5.0, 5.0, 30));
        assert_eq!((recovered.delta_x, recovered.delta_y, recovered.delta_time), (0.0, 0.0, None));
    }

    #[test]
    fn baseline_tracks_last_sample() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(7.0, 8.0, 9));
        assert_eq!(
            normalizer.baseline(),
            Some(Baseline { x: 7.0, y: 8.0, timestamp: Duration::from_millis(9) })
        );
    }

    //=====================================================================
    // Wheel and Click Tests
    //=====================================================================

    #[test]
    fn wheel_timing_uses_its_own_baseline() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(0.0, 0.0, 0));

        let first = normalizer.normalize_wheel(wheel(-120.0, 100));
        let second = normalizer.normalize_wheel(wheel(-60.0, 130));

        assert_eq!(first.delta_time, None);
        assert_eq!(first.delta_y, -120.0);
        assert_eq!(second.delta_time, Some(Duration::from_millis(30)));
    }

    #[test]
    fn click_leaves_motion_baseline_alone() {
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(sample(10.0, 10.0, 0));

        let click = normalizer.normalize_click(sample(50.0, 60.0, 5), MouseButton::Left);
        assert_eq!((click.x, click.y, click.button), (50.0, 60.0, MouseButton::Left));

        let event = normalizer.normalize(sample(11.0, 10.0, 8));
        assert_eq!(event.delta_x, 1.0);
    }

    //=====================================================================
    // Properties
    //=====================================================================

    fn samples() -> impl Strategy<Value = Vec<RawPointerSample>> {
        prop::collection::vec((-1.0e4f32..1.0e4, -1.0e4f32..1.0e4, 0u64..50, 0u16..32), 1..64).prop_map(
            |raw| {
                let mut clock = 0;
                raw.into_iter()
                    .map(|(x, y, step, bits)| {
                        clock += step;
                        RawPointerSample::at_millis(x, y, ButtonMask::from_bits(bits), clock)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn first_sample_after_reset_is_zero(warmup in samples(), probe in samples()) {
            let mut normalizer = EventNormalizer::new();
            for s in &warmup {
                normalizer.normalize(*s);
            }
            normalizer.reset_baseline();

            let event = normalizer.normalize(probe[0]);
            prop_assert_eq!(event.delta_x, 0.0);
            prop_assert_eq!(event.delta_y, 0.0);
            prop_assert_eq!(event.delta_time, None);
        }

        #[test]
        fn deltas_match_consecutive_samples(input in samples()) {
            let mut normalizer = EventNormalizer::new();
            let events: Vec<_> = input.iter().map(|s| normalizer.normalize(*s)).collect();

            for (pair, event) in input.windows(2).zip(events.iter().skip(1)) {
                prop_assert_eq!(event.delta_x, pair[1].absolute_x - pair[0].absolute_x);
                prop_assert_eq!(event.delta_y, pair[1].absolute_y - pair[0].absolute_y);
                prop_assert_eq!(event.delta_time, Some(pair[1].timestamp - pair[0].timestamp));
            }
        }

        #[test]
        fn replay_is_deterministic(input in samples()) {
            let mut first = EventNormalizer::new();
            let mut second = EventNormalizer::new();

            let a: Vec<_> = input.iter().map(|s| first.normalize(*s)).collect();
            let b: Vec<_> = input.iter().map(|s| second.normalize(*s)).collect();

            let bits = |events: &[NormalizedMotionEvent]| -> Vec<(u32, u32, Option<Duration>, u16)> {
                events
                    .iter()
                    .map(|e| (e.delta_x.to_bits(), e.delta_y.to_bits(), e.delta_time, e.button_mask.bits()))
                    .collect()
            };
            prop_assert_eq!(bits(&a), bits(&b));
        }
    }
}
