//! Phase detectors
//!
//! Four interchangeable error-signal circuits. Each combines the
//! oscillator's previous output sample with the current input sample into a
//! scalar whose sign and magnitude indicate phase/frequency mismatch.

use serde::{Deserialize, Serialize};

use crate::ringmod::{analog_ringmod, digital_ringmod};

/// Phase detector algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Four-quadrant multiplier, the classic analog PLL phase detector.
    #[default]
    Ideal,
    /// Diode ring modulator emulation.
    Analog,
    /// Soft-clipped multiplicative mixing.
    Digital,
    /// One-bit detector: binarize both signals, XOR, map to ±1.
    Xor,
}

impl DetectorKind {
    /// All detector kinds in index order.
    pub const ALL: [DetectorKind; 4] = [
        DetectorKind::Ideal,
        DetectorKind::Analog,
        DetectorKind::Digital,
        DetectorKind::Xor,
    ];

    /// Resolve a raw control-message index. Indices outside 0–3 are
    /// rejected.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(DetectorKind::Ideal),
            1 => Some(DetectorKind::Analog),
            2 => Some(DetectorKind::Digital),
            3 => Some(DetectorKind::Xor),
            _ => None,
        }
    }

    /// Control-message index of this kind.
    pub fn index(self) -> u8 {
        match self {
            DetectorKind::Ideal => 0,
            DetectorKind::Analog => 1,
            DetectorKind::Digital => 2,
            DetectorKind::Xor => 3,
        }
    }

    /// Human-readable name, as reported by introspection.
    pub fn name(self) -> &'static str {
        match self {
            DetectorKind::Ideal => "ideal ring modulator (multiplier)",
            DetectorKind::Analog => "analog ring modulator",
            DetectorKind::Digital => "digital ring modulator",
            DetectorKind::Xor => "xor ring modulator",
        }
    }

    /// Error signal from the previous oscillator sample and the current
    /// input sample. Defined for all finite inputs.
    #[inline]
    pub fn detect(self, last_out: f64, input: f64) -> f64 {
        match self {
            DetectorKind::Ideal => last_out * input,
            DetectorKind::Analog => analog_ringmod(last_out, input, 0.0),
            DetectorKind::Digital => digital_ringmod(last_out, input, 0.0),
            DetectorKind::Xor => {
                // Zero counts as negative in the binarization.
                let onebit_input = if input > 0.0 { 1.0 } else { -1.0 };
                let onebit_intern = if last_out > 0.0 { 1.0 } else { -1.0 };
                if onebit_intern != onebit_input {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl core::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
