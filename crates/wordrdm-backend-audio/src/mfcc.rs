//! Mel-frequency cepstral coefficients.
//!
//! Pipeline per recording: pre-emphasis, framing with zero padding of the
//! last frame, Hamming window, power spectrum `|FFT|^2 / NFFT`, triangular
//! mel filterbank, log, orthonormal DCT-II, cepstral liftering. With
//! `append_energy` the first coefficient is replaced by the log frame energy.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use wordrdm_spec::AcousticParams;

use crate::error::{AudioError, AudioResult};
use crate::features::FeatureMatrix;

/// Converts Hz to mel.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Rounds halves away from zero for the non-negative values used here.
fn round_half_up(value: f64) -> usize {
    (value + 0.5).floor().max(0.0) as usize
}

/// MFCC extractor for one sample rate.
pub struct MfccExtractor {
    frame_len: usize,
    frame_step: usize,
    fft_size: usize,
    preemphasis: f64,
    num_cepstra: usize,
    cepstral_lifter: f64,
    append_energy: bool,
    window: Vec<f64>,
    filterbank: Vec<Vec<f64>>,
    fft: Arc<dyn Fft<f64>>,
}

impl MfccExtractor {
    /// Prepares window, filterbank and FFT plan.
    pub fn new(params: &AcousticParams, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::invalid_param("sample_rate", "must be positive"));
        }
        if params.fft_size < 2 {
            return Err(AudioError::invalid_param("fft_size", "must be at least 2"));
        }
        if params.num_filters == 0 {
            return Err(AudioError::invalid_param("num_filters", "must be positive"));
        }
        if params.num_cepstra == 0 || params.num_cepstra > params.num_filters {
            return Err(AudioError::invalid_param(
                "num_cepstra",
                format!("must be between 1 and num_filters ({})", params.num_filters),
            ));
        }

        let rate = sample_rate as f64;
        let frame_len = round_half_up(params.window_seconds * rate);
        let frame_step = round_half_up(params.step_seconds * rate);
        if frame_len == 0 || frame_step == 0 {
            return Err(AudioError::invalid_param(
                "window_seconds",
                "window and step must span at least one sample",
            ));
        }

        let window = hamming(frame_len);
        let filterbank = mel_filterbank(params.num_filters, params.fft_size, sample_rate);
        let fft = FftPlanner::<f64>::new().plan_fft_forward(params.fft_size);

        Ok(Self {
            frame_len,
            frame_step,
            fft_size: params.fft_size,
            preemphasis: params.preemphasis,
            num_cepstra: params.num_cepstra,
            cepstral_lifter: params.cepstral_lifter,
            append_energy: params.append_energy,
            window,
            filterbank,
            fft,
        })
    }

    /// Samples per frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Samples between frame starts.
    pub fn frame_step(&self) -> usize {
        self.frame_step
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        if len <= self.frame_len {
            1
        } else {
            1 + (len - self.frame_len).div_ceil(self.frame_step)
        }
    }

    /// Computes one row of `num_cepstra` coefficients per frame.
    pub fn compute(&self, signal: &[f64]) -> FeatureMatrix {
        let emphasized = self.preemphasize(signal);
        let frames = self.frame_count(emphasized.len());
        let bins = self.fft_size / 2 + 1;

        let mut out = FeatureMatrix::zeros(frames, self.num_cepstra);
        let mut buffer = vec![Complex::new(0.0, 0.0); self.fft_size];
        let mut power = vec![0.0; bins];
        let mut log_energies = vec![0.0; self.filterbank.len()];

        for frame in 0..frames {
            let start = frame * self.frame_step;
            for (k, slot) in buffer.iter_mut().enumerate() {
                // Frames longer than the FFT are truncated.
                let value = if k < self.frame_len {
                    emphasized.get(start + k).copied().unwrap_or(0.0) * self.window[k]
                } else {
                    0.0
                };
                *slot = Complex::new(value, 0.0);
            }
            self.fft.process(&mut buffer);

            for (p, c) in power.iter_mut().zip(&buffer) {
                *p = c.norm_sqr() / self.fft_size as f64;
            }
            let energy = nonzero(power.iter().sum());

            for (slot, filter) in log_energies.iter_mut().zip(&self.filterbank) {
                let e: f64 = filter.iter().zip(&power).map(|(w, p)| w * p).sum();
                *slot = nonzero(e).ln();
            }

            let row = out.row_mut(frame);
            dct2_ortho(&log_energies, row);
            lifter(row, self.cepstral_lifter);
            if self.append_energy {
                row[0] = energy.ln();
            }
        }

        out
    }

    fn preemphasize(&self, signal: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(signal.len());
        if let Some(&first) = signal.first() {
            out.push(first);
        }
        for pair in signal.windows(2) {
            out.push(pair[1] - self.preemphasis * pair[0]);
        }
        out
    }
}

fn nonzero(value: f64) -> f64 {
    if value == 0.0 {
        f64::EPSILON
    } else {
        value
    }
}

/// Symmetric Hamming window.
fn hamming(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / (len - 1) as f64).cos())
        .collect()
}

/// Triangular filters spaced evenly on the mel scale from 0 Hz to Nyquist.
fn mel_filterbank(num_filters: usize, fft_size: usize, sample_rate: u32) -> Vec<Vec<f64>> {
    let bins = fft_size / 2 + 1;
    let rate = sample_rate as f64;
    let low = hz_to_mel(0.0);
    let high = hz_to_mel(rate / 2.0);

    let points: Vec<usize> = (0..num_filters + 2)
        .map(|i| {
            let mel = low + (high - low) * i as f64 / (num_filters + 1) as f64;
            ((fft_size + 1) as f64 * mel_to_hz(mel) / rate).floor() as usize
        })
        .collect();

    (0..num_filters)
        .map(|j| {
            let (left, center, right) = (points[j], points[j + 1], points[j + 2]);
            let mut filter = vec![0.0; bins];
            for k in left..center.min(bins) {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
            for k in center..right.min(bins) {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
            filter
        })
        .collect()
}

/// Orthonormal DCT-II, keeping as many coefficients as `out` holds.
fn dct2_ortho(input: &[f64], out: &mut [f64]) {
    let n = input.len() as f64;
    for (k, slot) in out.iter_mut().enumerate() {
        let sum: f64 = input
            .iter()
            .enumerate()
            .map(|(i, x)| x * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
            .sum();
        let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
        *slot = sum * scale;
    }
}

fn lifter(coefficients: &mut [f64], lifter: f64) {
    if lifter <= 0.0 {
        return;
    }
    for (n, c) in coefficients.iter_mut().enumerate() {
        *c *= 1.0 + (lifter / 2.0) * (PI * n as f64 / lifter).sin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, rate: u32, seconds: f64) -> Vec<f64> {
        let n = (rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| 8000.0 * (2.0 * PI * freq * i as f64 / rate as f64).sin())
            .collect()
    }

    #[test]
    fn test_mel_round_trip() {
        for hz in [0.0, 440.0, 4000.0, 22050.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
        assert!((hz_to_mel(700.0) - 2595.0 * 2f64.log10()).abs() < 1e-9);
    }

    #[test]
    fn test_frame_geometry() {
        let extractor = MfccExtractor::new(&AcousticParams::default(), 16000).unwrap();
        assert_eq!(extractor.frame_len(), 400);
        assert_eq!(extractor.frame_step(), 160);
        assert_eq!(extractor.frame_count(100), 1);
        assert_eq!(extractor.frame_count(400), 1);
        assert_eq!(extractor.frame_count(401), 2);
        assert_eq!(extractor.frame_count(16000), 99);
    }

    #[test]
    fn test_half_sample_window_rounds_up() {
        // 0.025 * 22050 = 551.25, 0.01 * 22050 = 220.5
        let extractor = MfccExtractor::new(&AcousticParams::default(), 22050).unwrap();
        assert_eq!(extractor.frame_len(), 551);
        assert_eq!(extractor.frame_step(), 221);
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = mel_filterbank(26, 2048, 16000);
        assert_eq!(bank.len(), 26);
        assert!(bank.iter().all(|f| f.len() == 1025));
        for filter in &bank {
            let peak = filter.iter().cloned().fold(0.0, f64::max);
            assert!(peak <= 1.0 + 1e-12);
            assert!(filter.iter().all(|w| *w >= 0.0));
        }
    }

    #[test]
    fn test_dct_of_constant() {
        let mut out = [0.0; 3];
        dct2_ortho(&[2.0; 4], &mut out);
        assert!((out[0] - 4.0).abs() < 1e-12);
        assert!(out[1].abs() < 1e-12);
        assert!(out[2].abs() < 1e-12);
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = hamming(5);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[2] - 1.0).abs() < 1e-12);
        assert!((w[4] - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_compute_shape_and_energy() {
        let params = AcousticParams::default();
        let extractor = MfccExtractor::new(&params, 16000).unwrap();
        let loud = extractor.compute(&sine(440.0, 16000, 0.5));
        assert_eq!(loud.cols(), 12);
        assert_eq!(loud.rows(), extractor.frame_count(8000));
        assert!(loud.as_slice().iter().all(|v| v.is_finite()));

        let quiet: Vec<f64> = sine(440.0, 16000, 0.5).iter().map(|s| s / 100.0).collect();
        let quiet = extractor.compute(&quiet);
        assert!(loud.row(10)[0] > quiet.row(10)[0]);
    }

    #[test]
    fn test_silence_is_finite() {
        let extractor = MfccExtractor::new(&AcousticParams::default(), 8000).unwrap();
        let features = extractor.compute(&[0.0; 1000]);
        assert!(features.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_rejects_bad_params() {
        let params = AcousticParams {
            num_cepstra: 40,
            ..AcousticParams::default()
        };
        assert!(MfccExtractor::new(&params, 16000).is_err());
        assert!(MfccExtractor::new(&AcousticParams::default(), 0).is_err());
    }
}
