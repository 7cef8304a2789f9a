//! Correlation distance over feature vectors.
//!
//! Correlation distance is `1 - r`, where `r` is the Pearson correlation of
//! the two vectors. It lies in `[0, 2]` and is undefined (NaN) when either
//! vector has zero variance.

use crate::error::{RdmError, RdmResult};

/// A per-word feature vector that supports correlation distance.
pub trait CorrelationFeature {
    /// Number of dimensions.
    fn dimension(&self) -> usize;

    /// Correlation distance to another vector of the same dimension.
    ///
    /// Returns NaN when either vector is constant.
    fn correlation_distance(&self, other: &Self) -> RdmResult<f64>;
}

/// Dense real-valued feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseFeatures(pub Vec<f64>);

impl CorrelationFeature for DenseFeatures {
    fn dimension(&self) -> usize {
        self.0.len()
    }

    fn correlation_distance(&self, other: &Self) -> RdmResult<f64> {
        check_dimensions(self.dimension(), other.dimension())?;
        let u = &self.0;
        let v = &other.0;
        let n = u.len() as f64;
        let mean_u = u.iter().sum::<f64>() / n;
        let mean_v = v.iter().sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_u = 0.0;
        let mut var_v = 0.0;
        for (a, b) in u.iter().zip(v) {
            let du = a - mean_u;
            let dv = b - mean_v;
            cov += du * dv;
            var_u += du * du;
            var_v += dv * dv;
        }

        Ok(distance_from(cov / (var_u.sqrt() * var_v.sqrt())))
    }
}

/// Packed binary feature vector (e.g. a rendered pixel mask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    blocks: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// Creates an all-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            blocks: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Builds a vector from booleans.
    pub fn from_bools<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut blocks = Vec::new();
        let mut len = 0;
        for bit in bits {
            if len % 64 == 0 {
                blocks.push(0u64);
            }
            if bit {
                blocks[len / 64] |= 1u64 << (len % 64);
            }
            len += 1;
        }
        Self { blocks, len }
    }

    /// Sets a bit.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bit {index} out of range {}", self.len);
        self.blocks[index / 64] |= 1u64 << (index % 64);
    }

    /// Reads a bit.
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.blocks[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length vector.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Number of positions set in both vectors.
    pub fn count_common(&self, other: &Self) -> usize {
        self.blocks
            .iter()
            .zip(&other.blocks)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }
}

impl CorrelationFeature for BitVector {
    fn dimension(&self) -> usize {
        self.len
    }

    /// Pearson correlation from popcounts: for 0/1 vectors
    /// `cov = n·Σxy − Σx·Σy` and `var = n·Σx − (Σx)²`.
    fn correlation_distance(&self, other: &Self) -> RdmResult<f64> {
        check_dimensions(self.len, other.len)?;
        let n = self.len as f64;
        let sx = self.count_ones() as f64;
        let sy = other.count_ones() as f64;
        let sxy = self.count_common(other) as f64;

        let cov = n * sxy - sx * sy;
        let var_x = n * sx - sx * sx;
        let var_y = n * sy - sy * sy;
        Ok(distance_from(cov / (var_x.sqrt() * var_y.sqrt())))
    }
}

/// `1 - r`, clamped to `[0, 2]` against rounding. NaN stays NaN.
fn distance_from(r: f64) -> f64 {
    (1.0 - r).clamp(0.0, 2.0)
}

fn check_dimensions(expected: usize, found: usize) -> RdmResult<()> {
    if expected != found {
        return Err(RdmError::DimensionMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_dense_identical_is_zero() {
        let a = DenseFeatures(vec![1.0, 2.0, 3.0, 5.0]);
        assert!(approx(a.correlation_distance(&a).unwrap(), 0.0));
    }

    #[test]
    fn test_self_distance_never_negative() {
        // Rounding in the sums can push r just above 1 for a vector and its copy.
        let mut state = 0x2545_f491_4f6c_dd1du64;
        for _ in 0..500 {
            let values: Vec<f64> = (0..50)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state % 10_000) as f64 / 97.0 - 40.0
                })
                .collect();
            let a = DenseFeatures(values);
            let d = a.correlation_distance(&a.clone()).unwrap();
            assert!(d >= 0.0, "negative self-distance {d}");
            assert!(approx(d, 0.0));
        }

        let bits = BitVector::from_bools((0..200).map(|i| i % 3 == 0 || i % 7 == 0));
        assert!(bits.correlation_distance(&bits.clone()).unwrap() >= 0.0);
    }

    #[test]
    fn test_distance_from_clamps_and_keeps_nan() {
        assert_eq!(distance_from(1.0 + 1e-16), 0.0);
        assert_eq!(distance_from(-1.0 - 1e-15), 2.0);
        assert!(distance_from(f64::NAN).is_nan());
    }

    #[test]
    fn test_dense_anticorrelated_is_two() {
        let a = DenseFeatures(vec![1.0, 2.0, 3.0]);
        let b = DenseFeatures(vec![3.0, 2.0, 1.0]);
        assert!(approx(a.correlation_distance(&b).unwrap(), 2.0));
    }

    #[test]
    fn test_dense_constant_is_nan() {
        let a = DenseFeatures(vec![1.0, 1.0, 1.0]);
        let b = DenseFeatures(vec![0.0, 1.0, 2.0]);
        assert!(a.correlation_distance(&b).unwrap().is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DenseFeatures(vec![1.0, 2.0]);
        let b = DenseFeatures(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            a.correlation_distance(&b),
            Err(RdmError::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_bits_match_dense() {
        let pattern_a = [true, false, true, true, false, false, true, false];
        let pattern_b = [true, true, false, true, false, true, false, false];
        let bits_a = BitVector::from_bools(pattern_a);
        let bits_b = BitVector::from_bools(pattern_b);
        let dense_a = DenseFeatures(pattern_a.iter().map(|&b| b as u8 as f64).collect());
        let dense_b = DenseFeatures(pattern_b.iter().map(|&b| b as u8 as f64).collect());

        let from_bits = bits_a.correlation_distance(&bits_b).unwrap();
        let from_dense = dense_a.correlation_distance(&dense_b).unwrap();
        assert!(approx(from_bits, from_dense));
    }

    #[test]
    fn test_bit_vector_spans_blocks() {
        let mut bits = BitVector::zeros(130);
        bits.set(0);
        bits.set(64);
        bits.set(129);
        assert_eq!(bits.len(), 130);
        assert_eq!(bits.count_ones(), 3);
        assert!(bits.get(129));
        assert!(!bits.get(128));
        assert!(!bits.get(500));
    }
}
