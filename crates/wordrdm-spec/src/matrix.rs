//! Word × word distance matrices and their CSV form.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{RdmError, RdmResult};
use crate::table::{escape_field, parse_record};
use crate::words::WordSet;

/// An N×N distance table labeled by a [`WordSet`] on both axes.
///
/// Cells are `None` when no value could be computed (zero-variance
/// correlation, no acoustic recordings). The diagonal is `Some(0.0)` once
/// [`DistanceMatrix::zero_diagonal`] has run.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    cells: Vec<Option<f64>>,
}

impl DistanceMatrix {
    /// Creates a matrix with every cell missing.
    pub fn empty(words: &WordSet) -> Self {
        let n = words.len();
        Self {
            labels: words.as_slice().to_vec(),
            cells: vec![None; n * n],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Row/column labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Cell value.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[self.offset(row, col)]
    }

    /// Stores a value. Non-finite values are recorded as missing.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.cells[offset] = value.is_finite().then_some(value);
    }

    /// Marks a cell as missing.
    pub fn clear(&mut self, row: usize, col: usize) {
        let offset = self.offset(row, col);
        self.cells[offset] = None;
    }

    /// Looks a cell up by its labels (first occurrence).
    pub fn get_by_word(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.labels.iter().position(|w| w == row)?;
        let c = self.labels.iter().position(|w| w == col)?;
        self.get(r, c)
    }

    /// Sets every diagonal cell to zero.
    pub fn zero_diagonal(&mut self) {
        for i in 0..self.size() {
            let offset = self.offset(i, i);
            self.cells[offset] = Some(0.0);
        }
    }

    /// Number of cells holding a value.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when `(i, j)` and `(j, i)` agree within `tolerance` everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (i + 1..n).all(|j| match (self.get(i, j), self.get(j, i)) {
                (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                (None, None) => true,
                _ => false,
            })
        })
    }

    /// Element-wise mean over however many matrices hold a value at each cell.
    ///
    /// All inputs must share the same labels. A cell with no contributing
    /// value stays missing; contributions are not weighted.
    ///
    /// # Errors
    /// Returns [`RdmError::NoMatrices`] for an empty slice.
    pub fn mean_of(matrices: &[DistanceMatrix]) -> RdmResult<Self> {
        let first = matrices.first().ok_or(RdmError::NoMatrices)?;
        let mut sums = vec![0.0f64; first.cells.len()];
        let mut counts = vec![0usize; first.cells.len()];

        for matrix in matrices {
            if matrix.labels != first.labels {
                return Err(RdmError::DimensionMismatch {
                    expected: first.size(),
                    found: matrix.size(),
                });
            }
            for (i, cell) in matrix.cells.iter().enumerate() {
                if let Some(value) = cell {
                    sums[i] += value;
                    counts[i] += 1;
                }
            }
        }

        let cells = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
            .collect();

        Ok(Self {
            labels: first.labels.clone(),
            cells,
        })
    }

    /// Serializes to CSV: an empty corner cell, the words as header, and one
    /// labeled row per word. Missing cells are written empty.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = std::iter::once(String::new())
            .chain(self.labels.iter().map(|w| escape_field(w, ',')))
            .collect();
        let _ = writeln!(out, "{}", header.join(","));

        for (row, label) in self.labels.iter().enumerate() {
            let mut fields = vec![escape_field(label, ',')];
            for col in 0..self.size() {
                fields.push(self.get(row, col).map(format_value).unwrap_or_default());
            }
            let _ = writeln!(out, "{}", fields.join(","));
        }
        out
    }

    /// Writes the CSV form to a file, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> RdmResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_csv())?;
        Ok(())
    }

    /// Parses the CSV form produced by [`DistanceMatrix::to_csv`].
    pub fn from_csv(text: &str) -> RdmResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or(RdmError::Parse {
            line: 1,
            message: "missing header row".to_string(),
        })?;
        let labels: Vec<String> = parse_record(header, ',', 1)?.into_iter().skip(1).collect();
        let n = labels.len();
        let mut cells = Vec::with_capacity(n * n);

        for (row, (idx, line)) in lines.enumerate() {
            let line_no = idx + 1;
            let fields = parse_record(line, ',', line_no)?;
            if fields.len() != n + 1 {
                return Err(RdmError::Parse {
                    line: line_no,
                    message: format!("expected {} fields, found {}", n + 1, fields.len()),
                });
            }
            if labels.get(row) != Some(&fields[0]) {
                return Err(RdmError::Parse {
                    line: line_no,
                    message: format!("row label '{}' does not match header", fields[0]),
                });
            }
            for field in &fields[1..] {
                let field = field.trim();
                if field.is_empty() {
                    cells.push(None);
                } else {
                    let value = field.parse::<f64>().map_err(|e| RdmError::Parse {
                        line: line_no,
                        message: format!("invalid number '{}': {}", field, e),
                    })?;
                    cells.push(value.is_finite().then_some(value));
                }
            }
        }

        if cells.len() != n * n {
            return Err(RdmError::DimensionMismatch {
                expected: n * n,
                found: cells.len(),
            });
        }

        Ok(Self { labels, cells })
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        let n = self.size();
        assert!(row < n && col < n, "cell ({row}, {col}) outside {n}x{n} matrix");
        row * n + col
    }
}

/// Shortest round-trip representation.
fn format_value(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> WordSet {
        WordSet::new(list.iter().copied()).unwrap()
    }

    #[test]
    fn test_set_non_finite_is_missing() {
        let mut m = DistanceMatrix::empty(&words(&["a", "b"]));
        m.set(0, 1, f64::NAN);
        m.set(1, 0, 0.25);
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 0), Some(0.25));
        m.clear(1, 0);
        assert_eq!(m.get(1, 0), None);
    }

    #[test]
    fn test_zero_diagonal() {
        let mut m = DistanceMatrix::empty(&words(&["a", "b", "c"]));
        m.zero_diagonal();
        for i in 0..3 {
            assert_eq!(m.get(i, i), Some(0.0));
        }
        assert_eq!(m.filled_cells(), 3);
    }

    #[test]
    fn test_csv_layout() {
        let mut m = DistanceMatrix::empty(&words(&["dog", "cat"]));
        m.zero_diagonal();
        m.set(0, 1, 0.5);
        assert_eq!(m.to_csv(), ",cat,dog\ncat,0,0.5\ndog,,0\n");
    }

    #[test]
    fn test_csv_round_trip_with_missing_cells() {
        let mut m = DistanceMatrix::empty(&words(&["alpha", "beta", "gamma, delta"]));
        m.zero_diagonal();
        m.set(0, 1, 0.123456789);
        m.set(1, 0, 0.123456789);
        m.set(2, 0, 1.5);

        let parsed = DistanceMatrix::from_csv(&m.to_csv()).unwrap();
        assert_eq!(parsed, m);
    }

    #[test]
    fn test_from_csv_rejects_ragged_rows() {
        let err = DistanceMatrix::from_csv(",a,b\na,0,1\nb,1\n").unwrap_err();
        assert!(matches!(err, RdmError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_mean_of_skips_missing_values() {
        let set = words(&["a", "b"]);
        let mut m1 = DistanceMatrix::empty(&set);
        let mut m2 = DistanceMatrix::empty(&set);
        let mut m3 = DistanceMatrix::empty(&set);
        m1.set(0, 1, 1.0);
        m2.set(0, 1, 3.0);
        // m3 has no value at (0, 1)
        m3.set(1, 0, 9.0);

        let mean = DistanceMatrix::mean_of(&[m1, m2, m3]).unwrap();
        assert_eq!(mean.get(0, 1), Some(2.0));
        assert_eq!(mean.get(1, 0), Some(9.0));
        assert_eq!(mean.get(0, 0), None);
    }

    #[test]
    fn test_mean_of_rejects_mismatched_labels() {
        let a = DistanceMatrix::empty(&words(&["a", "b"]));
        let b = DistanceMatrix::empty(&words(&["a", "c"]));
        assert!(matches!(
            DistanceMatrix::mean_of(&[a, b]),
            Err(RdmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_mean_of_nothing_is_an_error() {
        let err = DistanceMatrix::mean_of(&[]).unwrap_err();
        assert!(matches!(err, RdmError::NoMatrices));
        assert_eq!(err.code().code(), "R009");
    }

    #[test]
    fn test_symmetry_check() {
        let mut m = DistanceMatrix::empty(&words(&["a", "b"]));
        m.zero_diagonal();
        m.set(0, 1, 0.3);
        assert!(!m.is_symmetric(1e-12));
        m.set(1, 0, 0.3);
        assert!(m.is_symmetric(1e-12));
        assert_eq!(m.get_by_word("b", "a"), Some(0.3));
    }
}
