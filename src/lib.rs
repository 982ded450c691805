//! # Phaselock: an audio-rate digital PLL
//!
//! `phaselock` is a Rust library implementing a digital phase-locked loop
//! that tracks the phase of an incoming audio-rate signal and drives an
//! internal oscillator to follow it. It is built for audio processing
//! chains that need a clean oscillator (and its ramping phase) locked to a
//! noisy or musically varying input: pitch-tracking synthesis,
//! cross-synthesis, vocoder-style effects.
//!
//! ## Architecture
//!
//! The loop is four small pieces wired in a fixed per-sample order:
//!
//! - **Phase detector** ([`DetectorKind`]) — four selectable circuits
//!   (ideal multiplier, analog/digital ring modulator emulations, XOR)
//!   turn the previous oscillator sample and the current input into an
//!   error signal.
//! - **Loop filter** ([`OnePole`]) — a one-pole lowpass isolates the
//!   near-DC component of that error.
//! - **Parameter glide** ([`SmoothedParam`]) — control-rate targets for
//!   frequency, gain, and cutoff, read safely from the audio-rate step.
//! - **Oscillator** — a numerically controlled oscillator whose phase
//!   increment is pulled by the filtered error, wrapped into [0, 1).
//!
//! [`Pll`] orchestrates them and carries state across blocks. It is
//! host-independent: any runtime that can hand it input slices can drive
//! it, and the control-rate surface ([`Command`], [`SharedControls`])
//! keeps parameter changes off the hot path.
//!
//! ## Quick Start
//!
//! ```rust
//! use phaselock::prelude::*;
//!
//! // A loop at 44.1kHz, free-running at 220 Hz until it locks
//! let mut pll = Pll::new(44100.0);
//! pll.set_frequency(220.0);
//! let _ = pll.set_gain(800.0);
//! pll.set_cutoff(5.0);
//! pll.set_detector(DetectorKind::Ideal);
//!
//! // Process a block: oscillator out plus the raw phase ramp
//! let input = [0.0_f64; 64];
//! let mut osc = [0.0_f64; 64];
//! let mut phase = [0.0_f64; 64];
//! pll.process(&input, &mut osc, &mut phase);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod control;
pub mod detector;
pub mod filter;
pub mod module;
pub mod pll;
pub mod preset;
pub mod ringmod;
pub mod smooth;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::control::{AtomicF64, Command, ControlError, Notice, SharedControls};
    pub use crate::detector::DetectorKind;
    pub use crate::filter::OnePole;
    pub use crate::module::Module;
    pub use crate::pll::{Pll, PllReport, DEFAULT_CUTOFF, DEFAULT_FREQUENCY, MAX_GAIN};
    pub use crate::preset::PllDef;
    pub use crate::smooth::SmoothedParam;
}

// Re-export key types at crate root for convenience
pub use prelude::*;
