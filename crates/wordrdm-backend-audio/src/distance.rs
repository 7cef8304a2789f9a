//! Acoustic distance between two recordings.

use std::path::Path;

use log::warn;
use wordrdm_spec::{AcousticParams, DtwNormalization};

use crate::dtw::dtw_distance;
use crate::error::AudioResult;
use crate::features::{acoustic_features, FeatureMatrix};
use crate::wav::read_wav;

/// Normalized DTW cost between two feature matrices.
///
/// NaN when no warping path fits the band.
pub fn acoustic_distance(a: &FeatureMatrix, b: &FeatureMatrix, params: &AcousticParams) -> f64 {
    let Some(cost) = dtw_distance(a, b, params.dtw_window) else {
        warn!(
            "no warping path between {}-frame and {}-frame sequences within band {}",
            a.rows(),
            b.rows(),
            params.dtw_window
        );
        return f64::NAN;
    };
    let normalizer = match params.normalization {
        DtwNormalization::FeatureWidth => a.cols() + b.cols(),
        DtwNormalization::FrameCount => a.rows() + b.rows(),
    };
    cost / normalizer as f64
}

/// Reads two WAV files and returns their acoustic distance.
pub fn file_distance(first: &Path, second: &Path, params: &AcousticParams) -> AudioResult<f64> {
    let a = acoustic_features(&read_wav(first)?, params)?;
    let b = acoustic_features(&read_wav(second)?, params)?;
    Ok(acoustic_distance(&a, &b, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::Recording;
    use std::f64::consts::PI;

    fn tone(freq: f64, seconds: f64) -> Recording {
        let rate = 16000;
        let n = (rate as f64 * seconds) as usize;
        let samples = (0..n)
            .map(|i| 6000.0 * (2.0 * PI * freq * i as f64 / rate as f64).sin())
            .collect();
        Recording::new(samples, rate)
    }

    #[test]
    fn test_normalization_modes() {
        let a = FeatureMatrix::from_rows(&[vec![0.0, 0.0], vec![0.0, 0.0]]);
        let b = FeatureMatrix::from_rows(&[vec![3.0, 4.0], vec![3.0, 4.0], vec![3.0, 4.0]]);
        let raw = dtw_distance(&a, &b, 200).unwrap();

        let width = acoustic_distance(&a, &b, &AcousticParams::default());
        assert!((width - raw / 4.0).abs() < 1e-12);

        let frames = acoustic_distance(
            &a,
            &b,
            &AcousticParams {
                normalization: DtwNormalization::FrameCount,
                ..AcousticParams::default()
            },
        );
        assert!((frames - raw / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_recording_is_zero() {
        let params = AcousticParams::default();
        let features = acoustic_features(&tone(300.0, 0.4), &params).unwrap();
        assert_eq!(acoustic_distance(&features, &features, &params), 0.0);
    }

    #[test]
    fn test_file_distance() {
        let dir = tempfile::tempdir().unwrap();
        let low = dir.path().join("low.wav");
        let low_again = dir.path().join("low_again.wav");
        let sweep = dir.path().join("sweep.wav");
        tone(300.0, 0.4).write_pcm16(&low).unwrap();
        tone(300.0, 0.5).write_pcm16(&low_again).unwrap();

        let rate = 16000u32;
        let samples = (0..6400)
            .map(|i| {
                let t = i as f64 / rate as f64;
                let noise = ((i * 7919) % 1013) as f64 - 506.0;
                3000.0 * (2.0 * PI * (200.0 + 4000.0 * t) * t).sin() + 4.0 * noise
            })
            .collect();
        Recording::new(samples, rate).write_pcm16(&sweep).unwrap();

        let params = AcousticParams::default();
        let similar = file_distance(&low, &low_again, &params).unwrap();
        let different = file_distance(&low, &sweep, &params).unwrap();
        assert!(similar.is_finite() && different.is_finite());
        assert!(similar >= 0.0);
        assert!(different > similar);
    }
}
