//! Preset definitions
//!
//! Serializable initial parameters, so a host or patch file can describe a
//! loop without touching the engine types.

use serde::{Deserialize, Serialize};

use crate::detector::DetectorKind;
use crate::pll::{Pll, DEFAULT_CUTOFF, DEFAULT_FREQUENCY};

/// Serializable initial parameters for a [`Pll`].
///
/// Every field defaults independently, so a preset may specify any subset
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PllDef {
    /// Internal oscillator frequency in Hz.
    pub frequency: f64,
    /// Feedback gain *k*.
    pub gain: f64,
    /// Loop-filter cutoff in Hz.
    pub cutoff: f64,
    /// Phase detector variant.
    pub detector: DetectorKind,
}

impl Default for PllDef {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            gain: 0.0,
            cutoff: DEFAULT_CUTOFF,
            detector: DetectorKind::Ideal,
        }
    }
}

impl PllDef {
    /// Capture the current control state of a running loop.
    pub fn from_pll(pll: &Pll) -> Self {
        Self {
            frequency: pll.frequency(),
            gain: pll.gain(),
            cutoff: pll.cutoff_hz(),
            detector: pll.detector(),
        }
    }

    /// Serialize to a JSON string.
    #[cfg(feature = "alloc")]
    pub fn to_json(&self) -> Result<alloc::string::String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from a JSON string.
    #[cfg(feature = "alloc")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let def = PllDef::default();
        assert_eq!(def.frequency, 1000.0);
        assert_eq!(def.gain, 0.0);
        assert_eq!(def.cutoff, 1.0);
        assert_eq!(def.detector, DetectorKind::Ideal);
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn test_json_round_trip() {
        let def = PllDef {
            frequency: 440.0,
            gain: 2500.0,
            cutoff: 8.0,
            detector: DetectorKind::Analog,
        };
        let json = def.to_json().unwrap();
        assert_eq!(PllDef::from_json(&json).unwrap(), def);
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn test_partial_preset_fills_defaults() {
        let def = PllDef::from_json(r#"{"detector": "xor"}"#).unwrap();
        assert_eq!(def.detector, DetectorKind::Xor);
        assert_eq!(def.frequency, 1000.0);
        assert_eq!(def.cutoff, 1.0);

        let empty = PllDef::from_json("{}").unwrap();
        assert_eq!(empty, PllDef::default());
    }

    #[test]
    fn test_from_pll_captures_current_state() {
        let mut pll = Pll::with_def(
            48000.0,
            &PllDef {
                frequency: 330.0,
                gain: 10.0,
                cutoff: 4.0,
                detector: DetectorKind::Digital,
            },
        );
        pll.tick(0.0);
        let captured = PllDef::from_pll(&pll);
        assert_eq!(captured.frequency, 330.0);
        assert_eq!(captured.gain, 10.0);
        assert_eq!(captured.cutoff, 4.0);
        assert_eq!(captured.detector, DetectorKind::Digital);
    }

    #[test]
    fn test_negative_preset_cutoff_is_zeroed_on_construction() {
        let pll = Pll::with_def(
            44100.0,
            &PllDef {
                cutoff: -5.0,
                ..PllDef::default()
            },
        );
        assert_eq!(pll.cutoff_hz(), 0.0);
        assert_eq!(pll.cutoff_over_fs(), 0.0);
    }
}
