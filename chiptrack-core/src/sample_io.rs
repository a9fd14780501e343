//! Reading and writing DPCM sample files.
//!
//! `.wav` goes through hound and is mixed down to mono 16-bit; anything
//! else is treated as a raw DMC stream.

use std::path::{Path, PathBuf};

use chiptrack_types::{SampleSource, MAX_SAMPLE_SIZE, MAX_WAV_DURATION_SECS};

#[derive(Debug)]
pub enum SampleIoError {
    Io(std::io::Error),
    Wav(hound::Error),
    MissingSource(PathBuf),
    NoSourcePath,
}

impl From<std::io::Error> for SampleIoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<hound::Error> for SampleIoError {
    fn from(e: hound::Error) -> Self {
        Self::Wav(e)
    }
}

impl std::fmt::Display for SampleIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Wav(e) => write!(f, "WAV error: {}", e),
            Self::MissingSource(path) => {
                write!(f, "Cannot find source file '{}'!", path.display())
            }
            Self::NoSourcePath => write!(f, "sample has no source file"),
        }
    }
}

impl std::error::Error for SampleIoError {}

pub fn is_wav_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Load a sample source from disk, truncated to what the chip can hold.
pub fn load_source(path: &Path) -> Result<SampleSource, SampleIoError> {
    if !path.exists() {
        return Err(SampleIoError::MissingSource(path.to_path_buf()));
    }

    if is_wav_path(path) {
        let (samples, rate) = read_wav(path)?;
        let max_frames = (rate * MAX_WAV_DURATION_SECS) as usize;
        let mut samples = samples;
        if samples.len() > max_frames {
            log::info!(target: "sample", "{}: truncated to {} seconds", path.display(), MAX_WAV_DURATION_SECS);
            samples.truncate(max_frames);
        }
        Ok(SampleSource::Wav { samples, rate })
    } else {
        let mut bytes = std::fs::read(path)?;
        if bytes.len() > MAX_SAMPLE_SIZE {
            log::info!(target: "sample", "{}: truncated to {} bytes", path.display(), MAX_SAMPLE_SIZE);
            bytes.truncate(MAX_SAMPLE_SIZE);
        }
        Ok(SampleSource::Dmc(bytes))
    }
}

fn read_wav(path: &Path) -> Result<(Vec<i16>, u32), SampleIoError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<i32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * 32767.0) as i32))
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let shift = i32::from(spec.bits_per_sample) - 16;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift > 0 {
                            v >> shift
                        } else {
                            v << -shift
                        }
                    })
                })
                .collect::<Result<_, _>>()?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().sum();
            (sum / frame.len() as i32).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
        })
        .collect();

    Ok((mono, spec.sample_rate))
}

pub fn write_dmc(path: &Path, data: &[u8]) -> Result<(), SampleIoError> {
    std::fs::write(path, data)?;
    log::info!(target: "sample", "wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

pub fn write_wav(path: &Path, samples: &[i16], rate: u32) -> Result<(), SampleIoError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    log::info!(target: "sample", "wrote {} frames to {}", samples.len(), path.display());
    Ok(())
}

/// Write source data back out in its own format.
pub fn write_source(path: &Path, source: &SampleSource) -> Result<(), SampleIoError> {
    match source {
        SampleSource::Dmc(bytes) => write_dmc(path, bytes),
        SampleSource::Wav { samples, rate } => write_wav(path, samples, *rate),
    }
}

/// File extension a source exports to.
pub fn source_extension(source: &SampleSource) -> &'static str {
    if source.is_wav() {
        "wav"
    } else {
        "dmc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.dmc");
        match load_source(&path) {
            Err(SampleIoError::MissingSource(p)) => assert_eq!(p, path),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dmc_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.dmc");
        std::fs::write(&path, vec![0x55u8; MAX_SAMPLE_SIZE + 100]).unwrap();
        match load_source(&path).unwrap() {
            SampleSource::Dmc(bytes) => assert_eq!(bytes.len(), MAX_SAMPLE_SIZE),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn wav_round_trip_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.WAV");
        let samples: Vec<i16> = (0..200).map(|i| (i * 100) as i16).collect();
        write_wav(&path, &samples, 8000).unwrap();

        match load_source(&path).unwrap() {
            SampleSource::Wav { samples: loaded, rate } => {
                assert_eq!(rate, 8000);
                assert_eq!(loaded, samples);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stereo_wav_is_mixed_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 4000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..10 {
            writer.write_sample(1000i16).unwrap();
            writer.write_sample(3000i16).unwrap();
        }
        writer.finalize().unwrap();

        match load_source(&path).unwrap() {
            SampleSource::Wav { samples, .. } => {
                assert_eq!(samples.len(), 10);
                assert!(samples.iter().all(|&s| s == 2000));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn long_wav_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        let rate = 1000;
        write_wav(&path, &vec![0i16; (rate * 5) as usize], rate).unwrap();
        match load_source(&path).unwrap() {
            SampleSource::Wav { samples, .. } => {
                assert_eq!(samples.len(), (rate * MAX_WAV_DURATION_SECS) as usize)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn extension_by_source() {
        assert_eq!(source_extension(&SampleSource::Dmc(vec![])), "dmc");
        assert_eq!(
            source_extension(&SampleSource::Wav {
                samples: vec![],
                rate: 1
            }),
            "wav"
        );
    }
}
