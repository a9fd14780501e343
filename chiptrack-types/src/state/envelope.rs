//! Envelope curves owned by instruments and arpeggios.

use serde::{Deserialize, Serialize};

/// Kind of envelope slot on an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnvelopeType {
    Volume,
    Arpeggio,
    Pitch,
    DutyCycle,
    FdsWaveform,
    FdsModulation,
    N163Waveform,
}

impl EnvelopeType {
    pub const COUNT: usize = 7;

    pub const ALL: [EnvelopeType; Self::COUNT] = [
        EnvelopeType::Volume,
        EnvelopeType::Arpeggio,
        EnvelopeType::Pitch,
        EnvelopeType::DutyCycle,
        EnvelopeType::FdsWaveform,
        EnvelopeType::FdsModulation,
        EnvelopeType::N163Waveform,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EnvelopeType::Volume => "Volume",
            EnvelopeType::Arpeggio => "Arpeggio",
            EnvelopeType::Pitch => "Pitch",
            EnvelopeType::DutyCycle => "Duty Cycle",
            EnvelopeType::FdsWaveform => "FDS Waveform",
            EnvelopeType::FdsModulation => "FDS Modulation Table",
            EnvelopeType::N163Waveform => "N163 Waveform",
        }
    }

    /// Inclusive value range for one envelope point.
    pub fn value_range(self) -> (i8, i8) {
        match self {
            EnvelopeType::Volume => (0, 15),
            EnvelopeType::Arpeggio | EnvelopeType::Pitch => (-64, 63),
            EnvelopeType::DutyCycle => (0, 3),
            EnvelopeType::FdsWaveform => (0, 63),
            EnvelopeType::FdsModulation => (-4, 3),
            EnvelopeType::N163Waveform => (0, 15),
        }
    }

    pub fn default_value(self) -> i8 {
        match self {
            EnvelopeType::Volume => 15,
            _ => 0,
        }
    }

    /// Waveform-like envelopes have a fixed length and no loop/release.
    pub fn is_fixed_length(self) -> bool {
        matches!(
            self,
            EnvelopeType::FdsWaveform | EnvelopeType::FdsModulation | EnvelopeType::N163Waveform
        )
    }

    pub fn default_length(self) -> usize {
        match self {
            EnvelopeType::FdsWaveform => 64,
            EnvelopeType::FdsModulation => 32,
            EnvelopeType::N163Waveform => 16,
            _ => 0,
        }
    }
}

/// A time-varying parameter curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub length: usize,
    #[serde(default)]
    pub loop_point: Option<usize>,
    #[serde(default)]
    pub release: Option<usize>,
    pub values: Vec<i8>,
}

impl Envelope {
    pub fn new(kind: EnvelopeType) -> Self {
        let length = kind.default_length();
        Self {
            length,
            loop_point: None,
            release: None,
            values: vec![kind.default_value(); length],
        }
    }

    /// An empty envelope has no effect on playback. Fixed-length waveforms are
    /// empty when every point sits at the default value.
    pub fn is_empty(&self, kind: EnvelopeType) -> bool {
        if kind.is_fixed_length() {
            let default = kind.default_value();
            self.values.iter().take(self.length).all(|&v| v == default)
        } else {
            self.length == 0
        }
    }

    pub fn clear_to_default(&mut self, kind: EnvelopeType) {
        self.loop_point = None;
        self.release = None;
        if kind.is_fixed_length() {
            self.values = vec![kind.default_value(); self.length];
        } else {
            self.length = 0;
            self.values.clear();
        }
    }

    pub fn set_length(&mut self, length: usize, kind: EnvelopeType) {
        self.length = length;
        self.values.resize(length, kind.default_value());
        if self.loop_point.is_some_and(|p| p >= length) {
            self.loop_point = None;
        }
        if self.release.is_some_and(|r| r >= length) {
            self.release = None;
        }
    }

    pub fn clamp_to_valid_range(&mut self, kind: EnvelopeType) {
        let (min, max) = kind.value_range();
        for v in &mut self.values {
            *v = (*v).clamp(min, max);
        }
        if self.values.len() < self.length {
            self.values.resize(self.length, kind.default_value());
        }
    }

    pub fn value_at(&self, index: usize) -> i8 {
        self.values.get(index).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_volume_envelope_is_empty() {
        let env = Envelope::new(EnvelopeType::Volume);
        assert_eq!(env.length, 0);
        assert!(env.is_empty(EnvelopeType::Volume));
    }

    #[test]
    fn waveform_empty_until_a_point_changes() {
        let mut env = Envelope::new(EnvelopeType::FdsWaveform);
        assert_eq!(env.length, 64);
        assert!(env.is_empty(EnvelopeType::FdsWaveform));
        env.values[3] = 12;
        assert!(!env.is_empty(EnvelopeType::FdsWaveform));
        env.clear_to_default(EnvelopeType::FdsWaveform);
        assert_eq!(env.length, 64);
        assert!(env.is_empty(EnvelopeType::FdsWaveform));
    }

    #[test]
    fn clear_resets_loop_and_release() {
        let mut env = Envelope::new(EnvelopeType::Pitch);
        env.set_length(8, EnvelopeType::Pitch);
        env.loop_point = Some(2);
        env.release = Some(5);
        env.clear_to_default(EnvelopeType::Pitch);
        assert!(env.is_empty(EnvelopeType::Pitch));
        assert_eq!(env.loop_point, None);
        assert_eq!(env.release, None);
    }

    #[test]
    fn shrinking_drops_out_of_range_loop() {
        let mut env = Envelope::new(EnvelopeType::Arpeggio);
        env.set_length(10, EnvelopeType::Arpeggio);
        env.loop_point = Some(7);
        env.set_length(4, EnvelopeType::Arpeggio);
        assert_eq!(env.loop_point, None);
        assert_eq!(env.values.len(), 4);
    }

    #[test]
    fn clamp_pulls_values_into_range() {
        let mut env = Envelope::new(EnvelopeType::DutyCycle);
        env.set_length(3, EnvelopeType::DutyCycle);
        env.values = vec![-2, 1, 9];
        env.clamp_to_valid_range(EnvelopeType::DutyCycle);
        assert_eq!(env.values, vec![0, 1, 3]);
    }
}
