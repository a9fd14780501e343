//! Parameter descriptors for the extra settings shown under an expanded
//! instrument or sample, and the accessors that read and write them.

use crate::state::{
    DpcmSample, ExpansionType, Instrument, WavePreset, DMC_RATE_NAMES, PADDING_MODE_NAMES,
};

const FDS_MASTER_VOLUME_NAMES: [&str; 4] = ["1.0", "2/3", "2/4", "2/5"];

const VRC6_SAW_MASTER_VOLUME_NAMES: [&str; 3] = ["Full", "Half", "Quarter"];

const VRC7_PATCH_NAMES: [&str; 16] = [
    "Custom",
    "Bell",
    "Guitar",
    "Piano",
    "Flute",
    "Clarinet",
    "Rattling Bell",
    "Trumpet",
    "Reed Organ",
    "Soft Bell",
    "Xylophone",
    "Vibraphone",
    "Brass",
    "Bass Guitar",
    "Synthesizer",
    "Chorus",
];

/// Which setting a parameter row edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    FdsMasterVolume,
    FdsWavePreset,
    FdsModPreset,
    FdsModSpeed,
    FdsModDepth,
    FdsModDelay,
    N163WavePreset,
    N163WaveSize,
    N163WavePos,
    Vrc6SawMasterVolume,
    Vrc7Patch,
    SamplePreviewRate,
    SampleRate,
    SamplePaddingMode,
    SampleDmcInitialValue,
    SampleVolumeAdjust,
    SampleReverseBits,
    SampleTrimZeroVolume,
}

/// Static description of one editable integer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub field: ParamField,
    pub min: i32,
    pub max: i32,
    /// Values snap to multiples of this, counted from `min`.
    pub step: i32,
    pub default: i32,
    /// Display names, one per value from `min` to `max`.
    pub list: Option<&'static [&'static str]>,
    pub tooltip: &'static str,
}

impl ParamInfo {
    fn slider(name: &'static str, field: ParamField, min: i32, max: i32, default: i32) -> Self {
        Self {
            name,
            field,
            min,
            max,
            step: 1,
            default,
            list: None,
            tooltip: "",
        }
    }

    fn list(name: &'static str, field: ParamField, names: &'static [&'static str], default: i32) -> Self {
        Self {
            name,
            field,
            min: 0,
            max: names.len() as i32 - 1,
            step: 1,
            default,
            list: Some(names),
            tooltip: "",
        }
    }

    fn checkbox(name: &'static str, field: ParamField, default: bool) -> Self {
        Self::slider(name, field, 0, 1, i32::from(default))
    }

    fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    fn with_tooltip(mut self, tooltip: &'static str) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn is_list(&self) -> bool {
        self.list.is_some()
    }

    pub fn is_checkbox(&self) -> bool {
        !self.is_list() && self.min == 0 && self.max == 1
    }

    /// Snap to the step grid, then clamp into range.
    pub fn snap_and_clamp(&self, value: i32) -> i32 {
        let step = self.step.max(1);
        let snapped = self.min + ((value - self.min) as f32 / step as f32).round() as i32 * step;
        snapped.clamp(self.min, self.max)
    }

    pub fn value_string(&self, value: i32) -> String {
        match self.list {
            Some(names) => usize::try_from(value - self.min)
                .ok()
                .and_then(|i| names.get(i))
                .map(|s| s.to_string())
                .unwrap_or_else(|| value.to_string()),
            None => value.to_string(),
        }
    }
}

/// Extra parameters for an instrument's chip. Empty for chips with none.
pub fn instrument_params(instrument: &Instrument) -> Vec<ParamInfo> {
    use ParamField::*;

    match instrument.expansion {
        ExpansionType::Fds => vec![
            ParamInfo::list("Master Volume", FdsMasterVolume, &FDS_MASTER_VOLUME_NAMES, 0)
                .with_tooltip("Global volume of the FDS channel."),
            ParamInfo::list("Wave Preset", FdsWavePreset, &WavePreset::NAMES, 0)
                .with_tooltip("Preset shape used to generate the waveform."),
            ParamInfo::list("Mod Preset", FdsModPreset, &WavePreset::NAMES, 5)
                .with_tooltip("Preset shape used to generate the modulation table."),
            ParamInfo::slider("Mod Speed", FdsModSpeed, 0, 4095, 0),
            ParamInfo::slider("Mod Depth", FdsModDepth, 0, 63, 0),
            ParamInfo::slider("Mod Delay", FdsModDelay, 0, 255, 0),
        ],
        ExpansionType::N163 => vec![
            ParamInfo::list("Wave Preset", N163WavePreset, &WavePreset::NAMES, 0)
                .with_tooltip("Preset shape used to generate the waveform."),
            ParamInfo::slider("Wave Size", N163WaveSize, 4, 64, 16)
                .with_step(4)
                .with_tooltip("Number of samples in the waveform."),
            ParamInfo::slider("Wave Position", N163WavePos, 0, 124, 0)
                .with_step(4)
                .with_tooltip("Where the waveform is stored in N163 RAM."),
        ],
        ExpansionType::Vrc6 => vec![ParamInfo::list(
            "Saw Master Volume",
            Vrc6SawMasterVolume,
            &VRC6_SAW_MASTER_VOLUME_NAMES,
            1,
        )],
        ExpansionType::Vrc7 => vec![ParamInfo::list("Patch", Vrc7Patch, &VRC7_PATCH_NAMES, 1)],
        _ => Vec::new(),
    }
}

pub fn sample_params(_sample: &DpcmSample) -> Vec<ParamInfo> {
    use ParamField::*;

    vec![
        ParamInfo::list("Preview Rate", SamplePreviewRate, &DMC_RATE_NAMES, 15)
            .with_tooltip("Rate used when previewing the processed sample."),
        ParamInfo::list("Sample Rate", SampleRate, &DMC_RATE_NAMES, 15)
            .with_tooltip("Rate the WAV source is converted at."),
        ParamInfo::list("Padding Mode", SamplePaddingMode, &PADDING_MODE_NAMES, 2),
        ParamInfo::slider("DMC Initial Value", SampleDmcInitialValue, 0, 127, 64),
        ParamInfo::slider("Volume Adjust", SampleVolumeAdjust, 0, 200, 100)
            .with_tooltip("Volume applied before conversion, in percent. WAV sources only."),
        ParamInfo::checkbox("Reverse Bits", SampleReverseBits, false),
        ParamInfo::checkbox("Trim Zero Volume", SampleTrimZeroVolume, false),
    ]
}

impl Instrument {
    pub fn param_value(&self, field: ParamField) -> i32 {
        use ParamField::*;

        match field {
            FdsMasterVolume => i32::from(self.fds.master_volume),
            FdsWavePreset => self.fds.wave_preset.index() as i32,
            FdsModPreset => self.fds.mod_preset.index() as i32,
            FdsModSpeed => i32::from(self.fds.mod_speed),
            FdsModDepth => i32::from(self.fds.mod_depth),
            FdsModDelay => i32::from(self.fds.mod_delay),
            N163WavePreset => self.n163.wave_preset.index() as i32,
            N163WaveSize => i32::from(self.n163.wave_size),
            N163WavePos => i32::from(self.n163.wave_pos),
            Vrc6SawMasterVolume => i32::from(self.vrc6_saw_master_volume),
            Vrc7Patch => i32::from(self.vrc7_patch),
            _ => 0,
        }
    }

    pub fn set_param_value(&mut self, field: ParamField, value: i32) {
        use ParamField::*;

        let preset = || WavePreset::from_index(value.max(0) as usize).unwrap_or(WavePreset::Custom);
        match field {
            FdsMasterVolume => self.fds.master_volume = to_u8(value),
            FdsWavePreset => self.set_fds_wave_preset(preset()),
            FdsModPreset => self.set_fds_mod_preset(preset()),
            FdsModSpeed => self.fds.mod_speed = value.clamp(0, i32::from(u16::MAX)) as u16,
            FdsModDepth => self.fds.mod_depth = to_u8(value),
            FdsModDelay => self.fds.mod_delay = to_u8(value),
            N163WavePreset => self.set_n163_wave_preset(preset()),
            N163WaveSize => self.set_n163_wave_size(to_u8(value)),
            N163WavePos => self.n163.wave_pos = to_u8(value),
            Vrc6SawMasterVolume => self.vrc6_saw_master_volume = to_u8(value),
            Vrc7Patch => self.vrc7_patch = to_u8(value),
            _ => {}
        }
    }

    /// Modulation settings only apply to a hand-drawn modulation table.
    pub fn param_enabled(&self, field: ParamField) -> bool {
        match field {
            ParamField::FdsModSpeed | ParamField::FdsModDepth | ParamField::FdsModDelay => {
                self.fds.mod_preset == WavePreset::Custom
            }
            _ => true,
        }
    }
}

impl DpcmSample {
    pub fn param_value(&self, field: ParamField) -> i32 {
        use ParamField::*;

        let p = &self.params;
        match field {
            SamplePreviewRate => i32::from(p.preview_rate),
            SampleRate => i32::from(p.sample_rate),
            SamplePaddingMode => i32::from(p.padding_mode),
            SampleDmcInitialValue => i32::from(p.dmc_initial_value),
            SampleVolumeAdjust => i32::from(p.volume_adjust),
            SampleReverseBits => i32::from(p.reverse_bits),
            SampleTrimZeroVolume => i32::from(p.trim_zero_volume),
            _ => 0,
        }
    }

    /// Set a processing parameter and reprocess. Preview rate does not
    /// affect the processed data.
    pub fn set_param_value(&mut self, field: ParamField, value: i32) {
        use ParamField::*;

        let p = &mut self.params;
        match field {
            SamplePreviewRate => {
                p.preview_rate = to_u8(value);
                return;
            }
            SampleRate => p.sample_rate = to_u8(value),
            SamplePaddingMode => p.padding_mode = to_u8(value),
            SampleDmcInitialValue => p.dmc_initial_value = to_u8(value),
            SampleVolumeAdjust => p.volume_adjust = to_u8(value),
            SampleReverseBits => p.reverse_bits = value != 0,
            SampleTrimZeroVolume => p.trim_zero_volume = value != 0,
            _ => return,
        }
        self.process();
    }

    pub fn param_enabled(&self, field: ParamField) -> bool {
        match field {
            ParamField::SampleRate | ParamField::SampleVolumeAdjust => self.source_is_wav(),
            _ => true,
        }
    }
}

fn to_u8(value: i32) -> u8 {
    value.clamp(0, i32::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SampleSource;
    use crate::{Color, InstrumentId, SampleId};

    #[test]
    fn snap_and_clamp_respects_step_origin() {
        let info = ParamInfo::slider("Wave Size", ParamField::N163WaveSize, 4, 64, 16).with_step(4);
        assert_eq!(info.snap_and_clamp(5), 4);
        assert_eq!(info.snap_and_clamp(7), 8);
        assert_eq!(info.snap_and_clamp(100), 64);
        assert_eq!(info.snap_and_clamp(-3), 4);
    }

    #[test]
    fn row_kinds_from_descriptor() {
        let sample = DpcmSample::new(SampleId::new(0), "s", Color::default(), SampleSource::Dmc(vec![0]));
        let params = sample_params(&sample);
        assert!(params[0].is_list());
        assert!(params.iter().any(ParamInfo::is_checkbox));
        let vol = params.iter().find(|p| p.field == ParamField::SampleVolumeAdjust).unwrap();
        assert!(!vol.is_list() && !vol.is_checkbox());
    }

    #[test]
    fn list_value_string() {
        let inst = Instrument::new(InstrumentId::new(0), "i", ExpansionType::Vrc7, Color::default());
        let params = instrument_params(&inst);
        assert_eq!(params[0].value_string(1), "Bell");
        assert_eq!(params[0].value_string(99), "99");
    }

    #[test]
    fn mod_sliders_enabled_only_for_custom_table() {
        let mut inst = Instrument::new(InstrumentId::new(0), "i", ExpansionType::Fds, Color::default());
        assert!(!inst.param_enabled(ParamField::FdsModSpeed));
        inst.set_param_value(ParamField::FdsModPreset, WavePreset::Custom.index() as i32);
        assert!(inst.param_enabled(ParamField::FdsModSpeed));
    }

    #[test]
    fn sample_params_reprocess() {
        let mut sample = DpcmSample::new(SampleId::new(0), "s", Color::default(), SampleSource::Dmc(vec![1; 20]));
        sample.set_param_value(ParamField::SamplePaddingMode, 0);
        assert_eq!(sample.processed_size(), 20);
        sample.set_param_value(ParamField::SampleReverseBits, 1);
        assert_eq!(sample.param_value(ParamField::SampleReverseBits), 1);
        assert_eq!(sample.processed[0], 0x80);
        assert!(!sample.param_enabled(ParamField::SampleVolumeAdjust));
    }

    #[test]
    fn chips_without_settings_have_no_params() {
        let inst = Instrument::new(InstrumentId::new(0), "i", ExpansionType::Mmc5, Color::default());
        assert!(instrument_params(&inst).is_empty());
        assert!(!inst.has_extra_params());
    }
}
