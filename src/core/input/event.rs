//=========================================================================
// Pointer Event Types
//
// Defines the portable representation of pointer input as it flows from
// the host platform into the frame buffer.
//
// Responsibilities:
// - Represent raw host samples (`RawPointerSample`) in a stable format
// - Represent normalized, immutable frame events (`PointerEvent`)
// - Decode pointer button bitsets into typed buttons (`ButtonMask`)
//
// Event Flow:
// ```text
// Host (winit, browser, test harness)
//         ↓
//    RawPointerSample (absolute position + timestamp)
//         ↓
//    EventNormalizer (relative deltas)
//         ↓
//    PointerEvent (this module)
//         ↓
//    FrameEventBuffer → Simulation
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;
use std::time::Duration;

//=== MouseButton =========================================================

/// Physical pointer button identifier.
///
/// The discriminant order follows the conventional `buttons` bitset used
/// by pointer APIs: bit 0 primary, bit 1 secondary, bit 2 auxiliary,
/// bits 3 and 4 for the thumb buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Thumb button, "back".
    Back,

    /// Thumb button, "forward".
    Forward,
}

impl MouseButton {
    /// All buttons that have a bit in [`ButtonMask`], in bit order.
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    /// Returns the single bit this button occupies in a [`ButtonMask`].
    pub const fn bit(self) -> u16 {
        match self {
            MouseButton::Left => 1 << 0,
            MouseButton::Right => 1 << 1,
            MouseButton::Middle => 1 << 2,
            MouseButton::Back => 1 << 3,
            MouseButton::Forward => 1 << 4,
        }
    }
}

//=== ButtonMask ==========================================================

/// Bitset of currently pressed pointer buttons.
///
/// Bits without a [`MouseButton`] counterpart are preserved as-is, so a
/// mask received from the host always survives normalization unchanged.
///
/// ```text
/// bit:    4        3      2       1       0
///      Forward   Back  Middle  Right   Left
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonMask(u16);

impl ButtonMask {
    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Wraps a raw host bitset.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bitset.
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `button` is held in this mask.
    pub const fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    /// Returns a copy with `button` set.
    #[must_use]
    pub const fn with(self, button: MouseButton) -> Self {
        Self(self.0 | button.bit())
    }

    /// Returns a copy with `button` cleared.
    #[must_use]
    pub const fn without(self, button: MouseButton) -> Self {
        Self(self.0 & !button.bit())
    }

    pub fn insert(&mut self, button: MouseButton) {
        *self = self.with(button);
    }

    pub fn remove(&mut self, button: MouseButton) {
        *self = self.without(button);
    }

    /// Iterates the known buttons held in this mask, in bit order.
    pub fn iter(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(move |button| self.contains(*button))
    }
}

impl From<MouseButton> for ButtonMask {
    fn from(button: MouseButton) -> Self {
        Self(button.bit())
    }
}

impl FromIterator<MouseButton> for ButtonMask {
    fn from_iter<I: IntoIterator<Item = MouseButton>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, ButtonMask::with)
    }
}

impl fmt::Debug for ButtonMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<_> = self.iter().collect();
        write!(f, "ButtonMask({:#07b}, {:?})", self.0, held)
    }
}

//=== RawPointerSample ====================================================

/// One physical pointer sample as reported by the host.
///
/// Transient: lives only for a single normalization call. `timestamp` is a
/// monotonic capture time measured from a host-chosen origin (for example
/// the moment the host started); only differences between timestamps are
/// ever used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerSample {
    pub absolute_x: f32,
    pub absolute_y: f32,
    pub button_mask: ButtonMask,
    pub timestamp: Duration,
}

impl RawPointerSample {
    pub fn new(absolute_x: f32, absolute_y: f32, button_mask: ButtonMask, timestamp: Duration) -> Self {
        Self {
            absolute_x,
            absolute_y,
            button_mask,
            timestamp,
        }
    }

    /// Convenience constructor taking the timestamp in milliseconds.
    pub fn at_millis(absolute_x: f32, absolute_y: f32, button_mask: ButtonMask, millis: u64) -> Self {
        Self::new(absolute_x, absolute_y, button_mask, Duration::from_millis(millis))
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.absolute_x.is_finite() && self.absolute_y.is_finite()
    }
}

//=== RawWheelSample ======================================================

/// One wheel sample as reported by the host. Wheel deltas are already
/// relative, so only the timing needs a baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWheelSample {
    pub delta_x: f32,
    pub delta_y: f32,
    pub timestamp: Duration,
}

//=== EventKind ===========================================================

/// Tag identifying the variant of a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseMove,
    Scroll,
    Click,
}

//=== NormalizedMotionEvent ===============================================

/// Relative pointer motion since the previous sample.
///
/// Immutable once created. `delta_time` is `None` for the first sample
/// after the normalizer's baseline was (re)initialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMotionEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    pub delta_time: Option<Duration>,
    pub button_mask: ButtonMask,
}

impl NormalizedMotionEvent {
    /// Elapsed time in milliseconds, `0.0` when no timing baseline existed.
    pub fn delta_time_ms(&self) -> f32 {
        duration_ms(self.delta_time)
    }
}

//=== ScrollEvent =========================================================

/// Wheel movement. `delta_time` is measured against the previous wheel
/// sample, not against pointer motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    pub delta_time: Option<Duration>,
}

impl ScrollEvent {
    pub fn delta_time_ms(&self) -> f32 {
        duration_ms(self.delta_time)
    }
}

//=== ClickEvent ==========================================================

/// A button press at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
    pub timestamp: Duration,
}

//=== PointerEvent ========================================================

/// Normalized event stored in the frame buffer and delivered to the
/// simulation, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MouseMove(NormalizedMotionEvent),
    Scroll(ScrollEvent),
    Click(ClickEvent),
}

impl PointerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PointerEvent::MouseMove(_) => EventKind::MouseMove,
            PointerEvent::Scroll(_) => EventKind::Scroll,
            PointerEvent::Click(_) => EventKind::Click,
        }
    }

    /// Returns the motion payload if this is a `MouseMove`.
    pub fn as_motion(&self) -> Option<&NormalizedMotionEvent> {
        match self {
            PointerEvent::MouseMove(motion) => Some(motion),
            _ => None,
        }
    }
}

impl From<NormalizedMotionEvent> for PointerEvent {
    fn from(event: NormalizedMotionEvent) -> Self {
        PointerEvent::MouseMove(event)
    }
}

impl From<ScrollEvent> for PointerEvent {
    fn from(event: ScrollEvent) -> Self {
        PointerEvent::Scroll(event)
    }
}

impl From<ClickEvent> for PointerEvent {
    fn from(event: ClickEvent) -> Self {
        PointerEvent::Click(event)
    }
}

//--- Internal Helpers ----------------------------------------------------

fn duration_ms(delta: Option<Duration>) -> f32 {
    delta.map_or(0.0, |d| d.as_secs_f32() * 1000.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
