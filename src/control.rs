//! Control-rate interface
//!
//! Parameter changes arrive between audio blocks, never during one: either
//! as [`Command`] values applied on the engine's thread, or published from
//! a separate control thread through [`SharedControls`] and drained with
//! [`Pll::sync`](crate::pll::Pll::sync). Both paths write targets only, so
//! the per-sample loop observes either the old value or the new one —
//! never a half-applied update.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::detector::DetectorKind;
use crate::pll::MAX_GAIN;

/// A discrete parameter-change request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Retarget the internal oscillator frequency in Hz. Unbounded.
    SetFrequency(f64),
    /// Retarget the feedback gain *k*. Clamped to [`MAX_GAIN`].
    SetGain(f64),
    /// Retarget the loop-filter cutoff in Hz. Negative values become zero.
    SetCutoff(f64),
    /// Select a phase detector by raw index, validated against 0–3.
    SetDetector(i64),
}

/// Non-error feedback from applying a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    /// The requested gain exceeded [`MAX_GAIN`] and was clamped.
    GainClamped { requested: f64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::GainClamped { requested } => {
                write!(f, "k maxed out ({} requested, {} applied)", requested, MAX_GAIN)
            }
        }
    }
}

/// A rejected control message. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Detector index outside 0–3.
    DetectorOutOfRange(i64),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::DetectorOutOfRange(index) => write!(
                f,
                "detector type {} out of range: enter 0 for 'ideal', 1 for 'analog', \
                 2 for 'digital', or 3 for 'xor'",
                index
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ControlError {}

/// Atomic f64 built on `AtomicU64` bit storage, for lock-free parameter
/// publication between a control thread and the audio thread.
#[derive(Debug)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Parameter mailbox shared between a control thread and the engine.
///
/// Writers store a value and raise the matching dirty bit; the engine
/// drains dirty fields at block boundaries via
/// [`Pll::sync`](crate::pll::Pll::sync). The release store on the dirty
/// bit orders the value write before the flag, paired with the acquire
/// swap on the reader side.
#[derive(Debug, Default)]
pub struct SharedControls {
    frequency: AtomicF64,
    frequency_dirty: AtomicBool,
    gain: AtomicF64,
    gain_dirty: AtomicBool,
    cutoff: AtomicF64,
    cutoff_dirty: AtomicBool,
    detector: AtomicU8,
    detector_dirty: AtomicBool,
}

impl SharedControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frequency(&self, hz: f64) {
        self.frequency.set(hz);
        self.frequency_dirty.store(true, Ordering::Release);
    }

    pub fn set_gain(&self, k: f64) {
        self.gain.set(k);
        self.gain_dirty.store(true, Ordering::Release);
    }

    pub fn set_cutoff(&self, hz: f64) {
        self.cutoff.set(hz);
        self.cutoff_dirty.store(true, Ordering::Release);
    }

    /// Detector changes take an already-validated kind; resolve raw
    /// indices with [`DetectorKind::from_index`] on the writer side.
    pub fn set_detector(&self, kind: DetectorKind) {
        self.detector.store(kind.index(), Ordering::Relaxed);
        self.detector_dirty.store(true, Ordering::Release);
    }

    pub(crate) fn take_frequency(&self) -> Option<f64> {
        self.frequency_dirty
            .swap(false, Ordering::Acquire)
            .then(|| self.frequency.get())
    }

    pub(crate) fn take_gain(&self) -> Option<f64> {
        self.gain_dirty
            .swap(false, Ordering::Acquire)
            .then(|| self.gain.get())
    }

    pub(crate) fn take_cutoff(&self) -> Option<f64> {
        self.cutoff_dirty
            .swap(false, Ordering::Acquire)
            .then(|| self.cutoff.get())
    }

    pub(crate) fn take_detector(&self) -> Option<DetectorKind> {
        if self.detector_dirty.swap(false, Ordering::Acquire) {
            DetectorKind::from_index(self.detector.load(Ordering::Relaxed) as i64)
        } else {
            None
        }
    }
}
