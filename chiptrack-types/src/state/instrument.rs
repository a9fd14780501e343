//! Instruments and their chip-specific settings.

use serde::{Deserialize, Serialize};

use super::envelope::{Envelope, EnvelopeType};
use super::expansion::ExpansionType;
use crate::{Color, InstrumentId};

/// Generator used to fill a waveform or modulation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePreset {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Square50,
    Square25,
    Flat,
    Custom,
}

impl WavePreset {
    pub const ALL: [WavePreset; 7] = [
        WavePreset::Sine,
        WavePreset::Triangle,
        WavePreset::Sawtooth,
        WavePreset::Square50,
        WavePreset::Square25,
        WavePreset::Flat,
        WavePreset::Custom,
    ];

    pub const NAMES: [&'static str; 7] = [
        "Sine",
        "Triangle",
        "Sawtooth",
        "Square 50%",
        "Square 25%",
        "Flat",
        "Custom",
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Fill `values` with this shape scaled to `[min, max]`. Returns false
    /// for `Custom`, which leaves the table untouched.
    pub fn generate(self, values: &mut [i8], min: i8, max: i8) -> bool {
        if self == WavePreset::Custom {
            return false;
        }
        let n = values.len().max(1) as f32;
        let span = f32::from(max) - f32::from(min);
        for (i, v) in values.iter_mut().enumerate() {
            let t = i as f32 / n;
            let shape = match self {
                WavePreset::Sine => 0.5 + 0.5 * (t * std::f32::consts::TAU).sin(),
                WavePreset::Triangle => {
                    if t < 0.5 {
                        t * 2.0
                    } else {
                        2.0 - t * 2.0
                    }
                }
                WavePreset::Sawtooth => t,
                WavePreset::Square50 => {
                    if t < 0.5 {
                        1.0
                    } else {
                        0.0
                    }
                }
                WavePreset::Square25 => {
                    if t < 0.25 {
                        1.0
                    } else {
                        0.0
                    }
                }
                WavePreset::Flat | WavePreset::Custom => {
                    *v = 0i8.clamp(min, max);
                    continue;
                }
            };
            *v = (f32::from(min) + shape * span).round() as i8;
        }
        true
    }
}

/// FDS-only settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdsSettings {
    pub master_volume: u8,
    pub wave_preset: WavePreset,
    pub mod_preset: WavePreset,
    pub mod_speed: u16,
    pub mod_depth: u8,
    pub mod_delay: u8,
}

impl Default for FdsSettings {
    fn default() -> Self {
        Self {
            master_volume: 0,
            wave_preset: WavePreset::Sine,
            mod_preset: WavePreset::Flat,
            mod_speed: 0,
            mod_depth: 0,
            mod_delay: 0,
        }
    }
}

/// N163-only settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct N163Settings {
    pub wave_preset: WavePreset,
    pub wave_size: u8,
    pub wave_pos: u8,
}

impl Default for N163Settings {
    fn default() -> Self {
        Self {
            wave_preset: WavePreset::Sine,
            wave_size: 16,
            wave_pos: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    pub color: Color,
    pub expansion: ExpansionType,
    /// Indexed by `EnvelopeType::index()`; `None` for slots the chip lacks.
    pub envelopes: [Option<Envelope>; EnvelopeType::COUNT],
    #[serde(default)]
    pub fds: FdsSettings,
    #[serde(default)]
    pub n163: N163Settings,
    #[serde(default = "default_vrc6_saw_master_volume")]
    pub vrc6_saw_master_volume: u8,
    #[serde(default = "default_vrc7_patch")]
    pub vrc7_patch: u8,
}

fn default_vrc6_saw_master_volume() -> u8 {
    1
}

fn default_vrc7_patch() -> u8 {
    1
}

impl Instrument {
    pub fn new(id: InstrumentId, name: &str, expansion: ExpansionType, color: Color) -> Self {
        let mut envelopes: [Option<Envelope>; EnvelopeType::COUNT] = Default::default();
        for &kind in expansion.envelope_slots() {
            envelopes[kind.index()] = Some(Envelope::new(kind));
        }

        let mut inst = Self {
            id,
            name: name.to_string(),
            color,
            expansion,
            envelopes,
            fds: FdsSettings::default(),
            n163: N163Settings::default(),
            vrc6_saw_master_volume: default_vrc6_saw_master_volume(),
            vrc7_patch: default_vrc7_patch(),
        };
        inst.regenerate_waveforms();
        inst
    }

    pub fn envelope(&self, kind: EnvelopeType) -> Option<&Envelope> {
        self.envelopes[kind.index()].as_ref()
    }

    pub fn envelope_mut(&mut self, kind: EnvelopeType) -> Option<&mut Envelope> {
        self.envelopes[kind.index()].as_mut()
    }

    /// True when the instrument has a non-empty envelope in that slot.
    pub fn envelope_in_use(&self, kind: EnvelopeType) -> bool {
        self.envelope(kind).is_some_and(|e| !e.is_empty(kind))
    }

    /// Chips with settings beyond envelopes get expandable parameter rows.
    pub fn has_extra_params(&self) -> bool {
        matches!(
            self.expansion,
            ExpansionType::Fds | ExpansionType::N163 | ExpansionType::Vrc6 | ExpansionType::Vrc7
        )
    }

    pub fn set_fds_wave_preset(&mut self, preset: WavePreset) {
        self.fds.wave_preset = preset;
        self.apply_preset(EnvelopeType::FdsWaveform, preset);
    }

    pub fn set_fds_mod_preset(&mut self, preset: WavePreset) {
        self.fds.mod_preset = preset;
        self.apply_preset(EnvelopeType::FdsModulation, preset);
    }

    pub fn set_n163_wave_preset(&mut self, preset: WavePreset) {
        self.n163.wave_preset = preset;
        self.apply_preset(EnvelopeType::N163Waveform, preset);
    }

    pub fn set_n163_wave_size(&mut self, size: u8) {
        self.n163.wave_size = size;
        if let Some(env) = self.envelope_mut(EnvelopeType::N163Waveform) {
            env.set_length(usize::from(size), EnvelopeType::N163Waveform);
        }
        let preset = self.n163.wave_preset;
        self.apply_preset(EnvelopeType::N163Waveform, preset);
    }

    fn apply_preset(&mut self, kind: EnvelopeType, preset: WavePreset) {
        let (min, max) = kind.value_range();
        if let Some(env) = self.envelope_mut(kind) {
            let len = env.length;
            preset.generate(&mut env.values[..len], min, max);
        }
    }

    fn regenerate_waveforms(&mut self) {
        match self.expansion {
            ExpansionType::Fds => {
                self.set_fds_wave_preset(self.fds.wave_preset);
                self.set_fds_mod_preset(self.fds.mod_preset);
            }
            ExpansionType::N163 => self.set_n163_wave_size(self.n163.wave_size),
            _ => {}
        }
    }

    /// Deep copy one envelope from `src`, along with the chip preset
    /// metadata tied to that slot.
    pub fn copy_envelope_from(&mut self, src: &Instrument, kind: EnvelopeType) -> bool {
        let Some(env) = src.envelope(kind) else {
            return false;
        };
        if self.envelope(kind).is_none() {
            return false;
        }
        self.envelopes[kind.index()] = Some(env.clone());

        match kind {
            EnvelopeType::FdsWaveform => self.fds.wave_preset = src.fds.wave_preset,
            EnvelopeType::FdsModulation => self.fds.mod_preset = src.fds.mod_preset,
            EnvelopeType::N163Waveform => {
                self.n163.wave_preset = src.n163.wave_preset;
                self.n163.wave_size = src.n163.wave_size;
            }
            _ => {}
        }
        true
    }

    pub fn clear_envelope(&mut self, kind: EnvelopeType) {
        if let Some(env) = self.envelope_mut(kind) {
            env.clear_to_default(kind);
        }
        // A cleared waveform no longer matches its preset.
        match kind {
            EnvelopeType::FdsWaveform => self.fds.wave_preset = WavePreset::Custom,
            EnvelopeType::FdsModulation => self.fds.mod_preset = WavePreset::Custom,
            EnvelopeType::N163Waveform => self.n163.wave_preset = WavePreset::Custom,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(expansion: ExpansionType) -> Instrument {
        Instrument::new(InstrumentId::new(1), "Lead", expansion, Color::default())
    }

    #[test]
    fn slots_follow_chip() {
        let i = inst(ExpansionType::Vrc7);
        assert!(i.envelope(EnvelopeType::Volume).is_some());
        assert!(i.envelope(EnvelopeType::DutyCycle).is_none());
        assert!(i.has_extra_params());
        assert!(!inst(ExpansionType::S5B).has_extra_params());
    }

    #[test]
    fn fds_waveform_generated_from_preset() {
        let i = inst(ExpansionType::Fds);
        assert!(i.envelope_in_use(EnvelopeType::FdsWaveform));
        // Flat modulation table is all zero, so unused.
        assert!(!i.envelope_in_use(EnvelopeType::FdsModulation));
    }

    #[test]
    fn n163_size_resizes_waveform() {
        let mut i = inst(ExpansionType::N163);
        i.set_n163_wave_size(32);
        let env = i.envelope(EnvelopeType::N163Waveform).unwrap();
        assert_eq!(env.length, 32);
        assert_eq!(env.values.len(), 32);
    }

    #[test]
    fn envelope_copy_carries_presets() {
        let mut src = inst(ExpansionType::N163);
        src.set_n163_wave_preset(WavePreset::Square25);
        src.set_n163_wave_size(8);
        let mut dst = inst(ExpansionType::N163);
        assert!(dst.copy_envelope_from(&src, EnvelopeType::N163Waveform));
        assert_eq!(dst.n163.wave_preset, WavePreset::Square25);
        assert_eq!(dst.n163.wave_size, 8);
        assert_eq!(
            dst.envelope(EnvelopeType::N163Waveform),
            src.envelope(EnvelopeType::N163Waveform)
        );
    }

    #[test]
    fn copy_into_missing_slot_is_refused() {
        let src = inst(ExpansionType::Fds);
        let mut dst = inst(ExpansionType::None);
        assert!(!dst.copy_envelope_from(&src, EnvelopeType::FdsWaveform));
    }

    #[test]
    fn custom_preset_leaves_values() {
        let mut values = [3i8; 4];
        assert!(!WavePreset::Custom.generate(&mut values, 0, 15));
        assert_eq!(values, [3; 4]);
        assert!(WavePreset::Square50.generate(&mut values, 0, 15));
        assert_eq!(values, [15, 15, 0, 0]);
    }
}
