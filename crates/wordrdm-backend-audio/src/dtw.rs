//! Dynamic time warping with a slanted-band constraint.

use crate::features::FeatureMatrix;

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cumulative DTW cost between two feature sequences.
///
/// Local cost is Euclidean. Steps follow the symmetric2 pattern: a diagonal
/// step costs twice the local distance, horizontal and vertical steps once.
/// Cell `(i, j)` is admissible only when `|j - i * m / n| <= window`, with
/// `n` and `m` the lengths of `query` and `reference`.
///
/// Returns `None` when either sequence is empty or no admissible path reaches
/// the last cell.
pub fn dtw_distance(query: &FeatureMatrix, reference: &FeatureMatrix, window: usize) -> Option<f64> {
    let n = query.rows();
    let m = reference.rows();
    if n == 0 || m == 0 {
        return None;
    }

    let slope = m as f64 / n as f64;
    let window = window as f64;
    let in_band = |i: usize, j: usize| (j as f64 - i as f64 * slope).abs() <= window;

    let mut prev = vec![f64::INFINITY; m];
    let mut curr = vec![f64::INFINITY; m];

    for i in 0..n {
        for j in 0..m {
            if !in_band(i, j) {
                curr[j] = f64::INFINITY;
                continue;
            }
            let d = euclidean(query.row(i), reference.row(j));
            curr[j] = if i == 0 && j == 0 {
                d
            } else {
                let diagonal = if i > 0 && j > 0 {
                    prev[j - 1] + 2.0 * d
                } else {
                    f64::INFINITY
                };
                let vertical = if i > 0 { prev[j] + d } else { f64::INFINITY };
                let horizontal = if j > 0 { curr[j - 1] + d } else { f64::INFINITY };
                diagonal.min(vertical).min(horizontal)
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let total = prev[m - 1];
    total.is_finite().then_some(total)
}
