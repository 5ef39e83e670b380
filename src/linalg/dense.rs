//! Owned row-major `f64` matrix.
//!
//! Index arithmetic stays behind `get`/`set`/`row`; callers never see raw
//! offsets. All operations allocate their result and leave inputs intact.
use crate::error::LinalgError;

#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Zero-filled `rows × cols` matrix.
    ///
    /// Panics when the element count overflows or cannot be allocated; use
    /// [`DenseMatrix::try_zeros`] where that must be recoverable.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Zero-filled matrix, reporting allocation failure as an error.
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Self, LinalgError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(LinalgError::Allocation { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| LinalgError::Allocation { rows, cols })?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Wrap row-major `data` of length `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LinalgError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(LinalgError::ShapeMismatch {
                left_rows: rows,
                left_cols: cols,
                right_rows: data.len(),
                right_cols: 1,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows; all rows must have the same length.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self, LinalgError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(LinalgError::ShapeMismatch {
                    left_rows: rows.len(),
                    left_cols: cols,
                    right_rows: 1,
                    right_cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn idx(&self, r: usize, c: usize) -> usize {
        debug_assert!(r < self.rows && c < self.cols);
        r * self.cols + c
    }
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[self.idx(r, c)]
    }
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        let i = self.idx(r, c);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let start = r * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Whole backing store, row after row.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn column(&self, c: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, c)).collect()
    }

    pub fn column_norm(&self, c: usize) -> f64 {
        (0..self.rows)
            .map(|r| self.get(r, c).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn scale_column(&mut self, c: usize, s: f64) {
        for r in 0..self.rows {
            let i = self.idx(r, c);
            self.data[i] *= s;
        }
    }

    /// `self · rhs`; errors when `self.cols != rhs.rows`.
    pub fn multiply(&self, rhs: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
        if self.cols != rhs.rows {
            return Err(LinalgError::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        let mut out = DenseMatrix::try_zeros(self.rows, rhs.cols)?;
        for i in 0..self.rows {
            let lhs_row = self.row(i);
            let out_row = out.row_mut(i);
            for (k, &a) in lhs_row.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (o, &b) in out_row.iter_mut().zip(rhs.row(k)) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> DenseMatrix {
        let mut out = DenseMatrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for (c, &v) in self.row(r).iter().enumerate() {
                out.set(c, r, v);
            }
        }
        out
    }

    /// Every entry multiplied by `s`.
    pub fn scale(&self, s: f64) -> DenseMatrix {
        DenseMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// `Aᵀ·A` (cols × cols), symmetric by construction.
    pub fn gram(&self) -> Result<DenseMatrix, LinalgError> {
        let n = self.cols;
        let mut g = DenseMatrix::try_zeros(n, n)?;
        for r in 0..self.rows {
            let row = self.row(r);
            for i in 0..n {
                let a = row[i];
                if a == 0.0 {
                    continue;
                }
                let g_row = g.row_mut(i);
                for j in i..n {
                    g_row[j] += a * row[j];
                }
            }
        }
        mirror_upper(&mut g);
        Ok(g)
    }

    /// `A·Aᵀ` (rows × rows), symmetric by construction.
    pub fn outer_gram(&self) -> Result<DenseMatrix, LinalgError> {
        let n = self.rows;
        let mut g = DenseMatrix::try_zeros(n, n)?;
        for i in 0..n {
            let ri = self.row(i);
            for j in i..n {
                let dot = ri.iter().zip(self.row(j)).map(|(a, b)| a * b).sum();
                g.set(i, j, dot);
            }
        }
        mirror_upper(&mut g);
        Ok(g)
    }

    /// The first `k` columns (all columns when `k >= cols`).
    pub fn leading_columns(&self, k: usize) -> DenseMatrix {
        let k = k.min(self.cols);
        let mut out = DenseMatrix::zeros(self.rows, k);
        for r in 0..self.rows {
            out.row_mut(r).copy_from_slice(&self.row(r)[..k]);
        }
        out
    }

    /// Largest absolute element-wise difference; `None` on shape mismatch.
    pub fn max_abs_diff(&self, other: &DenseMatrix) -> Option<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}

fn mirror_upper(g: &mut DenseMatrix) {
    let n = g.rows;
    for i in 0..n {
        for j in (i + 1)..n {
            let v = g.get(i, j);
            g.set(j, i, v);
        }
    }
}
