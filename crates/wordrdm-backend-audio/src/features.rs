//! Frame-by-feature matrices: deltas, stacking, and normalization.

use wordrdm_spec::AcousticParams;

use crate::error::AudioResult;
use crate::mfcc::MfccExtractor;
use crate::wav::Recording;

/// Offset added to the standard deviation during variance normalization.
pub const CMVN_EPSILON: f64 = 1.0 / (1u64 << 30) as f64;

/// Row-major `rows x cols` matrix, one row per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from equal-length rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut out = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            out.row_mut(i).copy_from_slice(&row[..cols]);
        }
        out
    }

    /// Frames.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Features per frame.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One frame.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// One frame, mutably.
    pub fn row_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// All values in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Regression deltas over `±width` frames, padding the edges with the
    /// first and last frame.
    pub fn delta(&self, width: usize) -> Self {
        let mut out = Self::zeros(self.rows, self.cols);
        if width == 0 || self.rows == 0 {
            return out;
        }
        let denominator = 2.0 * (1..=width).map(|n| (n * n) as f64).sum::<f64>();
        let last = self.rows - 1;

        for t in 0..self.rows {
            let row = out.row_mut(t);
            for n in 1..=width {
                let ahead = self.row((t + n).min(last));
                let behind = self.row(t.saturating_sub(n));
                for (slot, (a, b)) in row.iter_mut().zip(ahead.iter().zip(behind)) {
                    *slot += n as f64 * (a - b);
                }
            }
            for slot in row.iter_mut() {
                *slot /= denominator;
            }
        }
        out
    }

    /// Concatenates matrices column-wise. All must have the same row count.
    pub fn hstack(parts: &[&FeatureMatrix]) -> Self {
        let rows = parts.first().map(|m| m.rows).unwrap_or(0);
        let cols = parts.iter().map(|m| m.cols).sum();
        let mut out = Self::zeros(rows, cols);
        for r in 0..rows {
            let mut offset = 0;
            for part in parts {
                out.row_mut(r)[offset..offset + part.cols].copy_from_slice(part.row(r));
                offset += part.cols;
            }
        }
        out
    }

    /// Cepstral mean and variance normalization: subtract each column's mean
    /// and divide by its population standard deviation plus [`CMVN_EPSILON`].
    pub fn cmvn(&self) -> Self {
        let mut out = self.clone();
        if self.rows == 0 {
            return out;
        }
        let n = self.rows as f64;
        for c in 0..self.cols {
            let mean = (0..self.rows).map(|r| self.row(r)[c]).sum::<f64>() / n;
            let variance = (0..self.rows)
                .map(|r| (self.row(r)[c] - mean).powi(2))
                .sum::<f64>()
                / n;
            let scale = variance.sqrt() + CMVN_EPSILON;
            for r in 0..self.rows {
                let slot = &mut out.row_mut(r)[c];
                *slot = (*slot - mean) / scale;
            }
        }
        out
    }
}

/// Full acoustic feature pipeline for one recording: MFCC, deltas and
/// delta-deltas stacked side by side, then CMVN.
pub fn acoustic_features(
    recording: &Recording,
    params: &AcousticParams,
) -> AudioResult<FeatureMatrix> {
    let extractor = MfccExtractor::new(params, recording.sample_rate)?;
    Ok(stack_and_normalize(
        &extractor.compute(&recording.samples),
        params.delta_width,
    ))
}

/// Deltas, delta-deltas and CMVN over precomputed cepstra.
pub fn stack_and_normalize(cepstra: &FeatureMatrix, delta_width: usize) -> FeatureMatrix {
    let deltas = cepstra.delta(delta_width);
    let double_deltas = deltas.delta(delta_width);
    FeatureMatrix::hstack(&[cepstra, &deltas, &double_deltas]).cmvn()
}
