//! WAV loading.
//!
//! Integer samples keep their raw integer scale (a 16-bit sample of 1000 stays
//! 1000.0); 8-bit PCM is unsigned on disk and keeps its stored 0..=255 value.
//! Float samples are read as-is. Multi-channel files are downmixed by
//! averaging channels.

use std::path::Path;

use crate::error::{AudioError, AudioResult};

/// A mono recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Mono samples.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Recording {
    /// Creates a recording from mono samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Writes the recording as 16-bit mono PCM, clamping out-of-range samples.
    pub fn write_pcm16(&self, path: &Path) -> AudioResult<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(path, spec).map_err(|e| AudioError::wav(path, e.to_string()))?;
        for &sample in &self.samples {
            let clamped = sample.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
            writer
                .write_sample(clamped)
                .map_err(|e| AudioError::wav(path, e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::wav(path, e.to_string()))
    }
}

/// hound centres 8-bit samples on zero; the stored byte is `sample + 128`.
const UNSIGNED_8BIT_OFFSET: f64 = 128.0;

/// Loads a WAV file as a mono recording.
///
/// # Errors
/// Returns [`AudioError::Wav`] for unreadable or unsupported files and
/// [`AudioError::EmptyRecording`] when the file holds no samples.
pub fn read_wav(path: &Path) -> AudioResult<Recording> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| AudioError::wav(path, e.to_string()))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            8 => collect_samples::<i8, _>(&mut reader, path)?
                .into_iter()
                .map(|s| s + UNSIGNED_8BIT_OFFSET)
                .collect(),
            16 => collect_samples::<i16, _>(&mut reader, path)?,
            24 | 32 => collect_samples::<i32, _>(&mut reader, path)?,
            bits => {
                return Err(AudioError::wav(
                    path,
                    format!("unsupported bit depth {} (supported: 8, 16, 24, 32)", bits),
                ))
            }
        },
        hound::SampleFormat::Float => collect_samples::<f32, _>(&mut reader, path)?,
    };

    let samples = downmix(&interleaved, spec.channels);
    if samples.is_empty() {
        return Err(AudioError::EmptyRecording {
            path: path.to_path_buf(),
        });
    }
    Ok(Recording::new(samples, spec.sample_rate))
}

fn collect_samples<S, R>(reader: &mut hound::WavReader<R>, path: &Path) -> AudioResult<Vec<f64>>
where
    S: hound::Sample + Into<f64>,
    R: std::io::Read,
{
    reader
        .samples::<S>()
        .map(|s| s.map(Into::into))
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| AudioError::wav(path, e.to_string()))
}

/// Averages interleaved channels into one.
fn downmix(interleaved: &[f64], channels: u16) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}
