//! The phase-locked loop engine
//!
//! Per sample, in fixed order: advance the parameter targets, derive the
//! phase error from the previous oscillator sample and the current input,
//! lowpass it, then advance the oscillator with the filtered error scaling
//! the phase increment. State carries across samples and across blocks.
//!
//! The hot path allocates nothing, takes no locks, and performs no I/O;
//! buffers are caller-owned slices that are only read from or written to
//! for the duration of one call.

use core::f64::consts::TAU;
use core::fmt;

use libm::Libm;

use crate::control::{Command, ControlError, Notice, SharedControls};
use crate::detector::DetectorKind;
use crate::filter::OnePole;
use crate::module::Module;
use crate::preset::PllDef;
use crate::smooth::SmoothedParam;

/// Feedback gain ceiling. [`Pll::set_gain`] clamps here and reports it.
pub const MAX_GAIN: f64 = 10_000.0;

/// Default internal oscillator frequency in Hz.
pub const DEFAULT_FREQUENCY: f64 = 1_000.0;

/// Default loop-filter cutoff in Hz.
pub const DEFAULT_CUTOFF: f64 = 1.0;

/// A phase-locked loop tracking an audio-rate input signal.
///
/// The internal oscillator free-runs at the configured frequency; with a
/// nonzero feedback gain *k*, the filtered phase error pulls the phase
/// increment until the oscillator locks to the input. Outputs are the
/// oscillator signal and the raw phase ramp, the latter useful for driving
/// an external wavetable from the same lock.
#[derive(Debug, Clone)]
pub struct Pll {
    frequency: SmoothedParam,
    gain: SmoothedParam,
    cutoff_hz: f64,
    cutoff_over_fs: SmoothedParam,
    sample_period: f64,
    filter: OnePole,
    phase: f64,
    last_out: f64,
    detector: DetectorKind,
}

impl Pll {
    /// Create a loop with default parameters: 1000 Hz, *k* = 0, 1 Hz
    /// cutoff, ideal detector.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_def(sample_rate, &PllDef::default())
    }

    /// Create a loop from a preset.
    pub fn with_def(sample_rate: f64, def: &PllDef) -> Self {
        let sample_period = 1.0 / sample_rate;
        let cutoff_hz = if def.cutoff > 0.0 { def.cutoff } else { 0.0 };
        Self {
            frequency: SmoothedParam::new(def.frequency),
            gain: SmoothedParam::new(def.gain),
            cutoff_hz,
            cutoff_over_fs: SmoothedParam::new(cutoff_hz * sample_period),
            sample_period,
            filter: OnePole::new(),
            phase: 0.0,
            last_out: 0.0,
            detector: def.detector,
        }
    }

    /// Advance the loop by one sample. Returns the oscillator sample and
    /// the raw phase in [0, 1).
    #[inline]
    pub fn tick(&mut self, input: f64) -> (f64, f64) {
        let frequency = self.frequency.step();
        let gain = self.gain.step();
        let cutoff_over_fs = self.cutoff_over_fs.step();

        let error = self.detector.detect(self.last_out, input);
        let filtered = self.filter.tick(error, cutoff_over_fs);

        let base_inc = frequency * self.sample_period;
        // A single sample never advances phase by more than half a cycle,
        // even when gain or the filtered error spikes.
        let inc = (base_inc + filtered * gain * base_inc).clamp(-0.5, 0.5);

        self.phase += inc;
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        while self.phase < 0.0 {
            self.phase += 1.0;
        }

        self.last_out = Libm::<f64>::cos(self.phase * TAU);
        (self.last_out, self.phase)
    }

    /// Process a block, writing the oscillator signal and the phase ramp.
    /// The shorter slice bounds the work.
    pub fn process(&mut self, input: &[f64], osc_out: &mut [f64], phase_out: &mut [f64]) {
        for ((sample, osc), phase) in input
            .iter()
            .zip(osc_out.iter_mut())
            .zip(phase_out.iter_mut())
        {
            let (o, p) = self.tick(*sample);
            *osc = o;
            *phase = p;
        }
    }

    /// Process a block, discarding the phase ramp.
    pub fn process_mono(&mut self, input: &[f64], osc_out: &mut [f64]) {
        for (sample, osc) in input.iter().zip(osc_out.iter_mut()) {
            *osc = self.tick(*sample).0;
        }
    }

    /// Adopt a new sample rate. Filter and feedback state restart from
    /// silence and the normalized cutoff (current and target) is
    /// recomputed; the phase accumulator carries over so the ramp output
    /// has no discontinuity.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_period = 1.0 / sample_rate;
        self.cutoff_over_fs.snap(self.cutoff_hz * self.sample_period);
        self.filter.reset();
        self.last_out = 0.0;
    }

    /// Reset filter, feedback, and phase state. Parameters keep their
    /// values.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.last_out = 0.0;
        self.phase = 0.0;
    }

    /// Retarget the internal oscillator frequency in Hz. Unbounded.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency.set_target(frequency);
    }

    /// Retarget the feedback gain *k*. Requests above [`MAX_GAIN`] are
    /// clamped and reported.
    pub fn set_gain(&mut self, gain: f64) -> Option<Notice> {
        if gain > MAX_GAIN {
            self.gain.set_target(MAX_GAIN);
            Some(Notice::GainClamped { requested: gain })
        } else {
            self.gain.set_target(gain);
            None
        }
    }

    /// Retarget the loop-filter cutoff in Hz. Negative values are treated
    /// as zero.
    pub fn set_cutoff(&mut self, cutoff_hz: f64) {
        let cutoff_hz = if cutoff_hz > 0.0 { cutoff_hz } else { 0.0 };
        self.cutoff_hz = cutoff_hz;
        self.cutoff_over_fs
            .set_target(cutoff_hz * self.sample_period);
    }

    /// Select the phase detector algorithm.
    pub fn set_detector(&mut self, detector: DetectorKind) {
        self.detector = detector;
    }

    /// Apply a control-rate command. Rejected commands leave state
    /// untouched.
    pub fn apply(&mut self, command: Command) -> Result<Option<Notice>, ControlError> {
        match command {
            Command::SetFrequency(hz) => {
                self.set_frequency(hz);
                Ok(None)
            }
            Command::SetGain(k) => Ok(self.set_gain(k)),
            Command::SetCutoff(hz) => {
                self.set_cutoff(hz);
                Ok(None)
            }
            Command::SetDetector(index) => match DetectorKind::from_index(index) {
                Some(kind) => {
                    self.set_detector(kind);
                    Ok(None)
                }
                None => Err(ControlError::DetectorOutOfRange(index)),
            },
        }
    }

    /// Drain pending control-thread writes. Call between blocks, on the
    /// engine's thread.
    pub fn sync(&mut self, controls: &SharedControls) -> Option<Notice> {
        if let Some(hz) = controls.take_frequency() {
            self.set_frequency(hz);
        }
        let notice = controls.take_gain().and_then(|k| self.set_gain(k));
        if let Some(hz) = controls.take_cutoff() {
            self.set_cutoff(hz);
        }
        if let Some(kind) = controls.take_detector() {
            self.set_detector(kind);
        }
        notice
    }

    /// Current oscillator frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency.current()
    }

    /// Current feedback gain *k*.
    pub fn gain(&self) -> f64 {
        self.gain.current()
    }

    /// User-facing loop-filter cutoff in Hz.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Current cutoff as a fraction of the sample rate.
    pub fn cutoff_over_fs(&self) -> f64 {
        self.cutoff_over_fs.current()
    }

    /// Active phase detector.
    pub fn detector(&self) -> DetectorKind {
        self.detector
    }

    /// Phase accumulator, in [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Most recent oscillator sample, the internal side of the next phase
    /// comparison.
    pub fn last_output(&self) -> f64 {
        self.last_out
    }

    pub fn sample_rate(&self) -> f64 {
        1.0 / self.sample_period
    }

    /// Read-only snapshot of the loop's control state.
    pub fn report(&self) -> PllReport {
        PllReport {
            cutoff_over_fs: self.cutoff_over_fs.current(),
            gain: self.gain.current(),
            frequency: self.frequency.current(),
            detector: self.detector,
        }
    }
}

impl Module for Pll {
    type In = f64;
    type Out = (f64, f64);

    #[inline]
    fn tick(&mut self, input: f64) -> (f64, f64) {
        Pll::tick(self, input)
    }

    fn reset(&mut self) {
        Pll::reset(self);
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        Pll::set_sample_rate(self, sample_rate);
    }
}

/// Diagnostic snapshot returned by [`Pll::report`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PllReport {
    pub cutoff_over_fs: f64,
    pub gain: f64,
    pub frequency: f64,
    pub detector: DetectorKind,
}

impl fmt::Display for PllReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cutoff / sample rate is {}", self.cutoff_over_fs)?;
        writeln!(f, "k is {}", self.gain)?;
        writeln!(f, "internal frequency is {} Hz", self.frequency)?;
        write!(f, "phase detection method is {}", self.detector.name())
    }
}
