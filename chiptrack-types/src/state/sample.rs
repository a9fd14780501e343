//! DPCM samples: source data, processing parameters and the processed DMC stream.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Color, SampleId};

/// Largest DMC stream the 2A03 can play from a single sample.
pub const MAX_SAMPLE_SIZE: usize = 0x0FF1;

/// Longest WAV source kept on import or reload, in seconds.
pub const MAX_WAV_DURATION_SECS: u32 = 2;

/// NTSC DMC playback rates in Hz, indexed by the 4-bit rate register.
pub const DMC_RATES: [f32; 16] = [
    4181.71, 4709.93, 5264.04, 5593.04, 6257.95, 7046.35, 7919.35, 8363.42, 9419.86, 11186.1,
    12604.0, 13982.6, 16884.6, 21306.8, 24858.0, 33143.9,
];

pub const DMC_RATE_NAMES: [&str; 16] = [
    "0 (4.2 KHz)",
    "1 (4.7 KHz)",
    "2 (5.3 KHz)",
    "3 (5.6 KHz)",
    "4 (6.3 KHz)",
    "5 (7.0 KHz)",
    "6 (7.9 KHz)",
    "7 (8.4 KHz)",
    "8 (9.4 KHz)",
    "9 (11.2 KHz)",
    "10 (12.6 KHz)",
    "11 (14.0 KHz)",
    "12 (16.9 KHz)",
    "13 (21.3 KHz)",
    "14 (24.9 KHz)",
    "15 (33.1 KHz)",
];

pub const PADDING_MODE_NAMES: [&str; 5] = [
    "Unpadded",
    "Pad to 16 bytes",
    "Pad to 16 bytes + 1",
    "Pad to 64 bytes",
    "Pad to 64 bytes + 1",
];

/// DMC byte encoding a flat line at the current level.
const SILENCE_BYTES: [u8; 2] = [0x55, 0xAA];

/// Raw data a sample was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleSource {
    /// Already-encoded 1-bit delta stream.
    Dmc(Vec<u8>),
    /// Mono PCM.
    Wav { samples: Vec<i16>, rate: u32 },
}

impl SampleSource {
    pub fn is_wav(&self) -> bool {
        matches!(self, SampleSource::Wav { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleParams {
    pub preview_rate: u8,
    pub sample_rate: u8,
    pub padding_mode: u8,
    pub dmc_initial_value: u8,
    /// Percent, 100 is unity.
    pub volume_adjust: u8,
    pub reverse_bits: bool,
    pub trim_zero_volume: bool,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            preview_rate: 15,
            sample_rate: 15,
            padding_mode: 2,
            dmc_initial_value: 64,
            volume_adjust: 100,
            reverse_bits: false,
            trim_zero_volume: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpcmSample {
    pub id: SampleId,
    pub name: String,
    pub color: Color,
    #[serde(default)]
    pub source: Option<SampleSource>,
    #[serde(default)]
    pub source_path: Option<PathBuf>,
    #[serde(default)]
    pub params: SampleParams,
    #[serde(default)]
    pub processed: Vec<u8>,
}

impl DpcmSample {
    pub fn new(id: SampleId, name: &str, color: Color, source: SampleSource) -> Self {
        let mut sample = Self {
            id,
            name: name.to_string(),
            color,
            source: Some(source),
            source_path: None,
            params: SampleParams::default(),
            processed: Vec::new(),
        };
        sample.process();
        sample
    }

    pub fn processed_size(&self) -> usize {
        self.processed.len()
    }

    pub fn source_is_wav(&self) -> bool {
        self.source.as_ref().is_some_and(SampleSource::is_wav)
    }

    /// Reload is only offered when the import path was recorded.
    pub fn has_reloadable_source(&self) -> bool {
        self.source_path.is_some()
    }

    /// Replace the source data and reprocess.
    pub fn set_source(&mut self, source: SampleSource, path: Option<PathBuf>) {
        self.source = Some(source);
        if path.is_some() {
            self.source_path = path;
        }
        self.process();
    }

    /// Recompute the processed DMC stream from source and parameters.
    pub fn process(&mut self) {
        let mut data = match &self.source {
            None => Vec::new(),
            Some(SampleSource::Dmc(bytes)) => bytes.clone(),
            Some(SampleSource::Wav { samples, rate }) => {
                let target = DMC_RATES[usize::from(self.params.sample_rate.min(15))];
                let resampled = resample(samples, *rate, target);
                encode_dmc(
                    &resampled,
                    self.params.dmc_initial_value,
                    self.params.volume_adjust,
                )
            }
        };

        if self.params.trim_zero_volume {
            trim_silence(&mut data);
        }
        if self.params.reverse_bits {
            for b in &mut data {
                *b = b.reverse_bits();
            }
        }
        pad(&mut data, self.params.padding_mode);
        data.truncate(MAX_SAMPLE_SIZE);
        self.processed = data;
    }
}

fn resample(samples: &[i16], from: u32, to: f32) -> Vec<i16> {
    if samples.is_empty() || from == 0 {
        return Vec::new();
    }
    let ratio = from as f32 / to;
    let out_len = (samples.len() as f32 / ratio).floor() as usize;
    (0..out_len)
        .map(|i| {
            let src = ((i as f32 * ratio) as usize).min(samples.len() - 1);
            samples[src]
        })
        .collect()
}

/// Delta-encode PCM into the 1-bit DMC format, least significant bit first.
fn encode_dmc(samples: &[i16], initial: u8, volume_percent: u8) -> Vec<u8> {
    let gain = f32::from(volume_percent) / 100.0;
    let mut level = i32::from(initial.min(127));
    let mut out = Vec::with_capacity(samples.len() / 8 + 1);

    for chunk in samples.chunks(8) {
        let mut byte = 0u8;
        for (bit, &s) in chunk.iter().enumerate() {
            let target = ((f32::from(s) * gain / 32768.0 + 1.0) * 63.5).clamp(0.0, 127.0) as i32;
            if target > level {
                byte |= 1 << bit;
                level = (level + 2).min(127);
            } else {
                level = (level - 2).max(0);
            }
        }
        out.push(byte);
    }
    out
}

fn trim_silence(data: &mut Vec<u8>) {
    while data.last().is_some_and(|b| SILENCE_BYTES.contains(b)) {
        data.pop();
    }
    let lead = data
        .iter()
        .take_while(|b| SILENCE_BYTES.contains(b))
        .count();
    data.drain(..lead);
}

fn pad(data: &mut Vec<u8>, mode: u8) {
    let (align, plus_one) = match mode {
        1 => (16, false),
        2 => (16, true),
        3 => (64, false),
        4 => (64, true),
        _ => return,
    };
    let extra = usize::from(plus_one);
    let body = data.len().saturating_sub(extra);
    let mut target = body.div_ceil(align) * align + extra;
    if target < data.len() {
        target += align;
    }
    data.resize(target, SILENCE_BYTES[0]);
}
