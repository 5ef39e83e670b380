//! Singular value decomposition through a Jacobi eigen-solve of the Gram
//! matrix.
//!
//! Design
//! - Pick the smaller Gram matrix: `AᵀA` when `cols <= rows`, else `AAᵀ`.
//! - Diagonalise it with classic Jacobi rotations, always eliminating the
//!   largest off-diagonal entry. A per-row cache of the largest entry keeps
//!   the pivot search linear in `n` instead of quadratic.
//! - Eigenvalues give `σ² `; the eigenvectors are one factor, the other one
//!   is derived as `A·v/σ` (or `Aᵀ·u/σ`).
//! - Columns are normalised with the scale folded into `σ`, `σ` is sorted
//!   descending (stable), and every pair `(uᵢ, vᵢ)` is flipped so that the
//!   first significant entry of `uᵢ` is positive.
//!
//! Convergence failure is not an error: the rotations applied so far are
//! used and `SvdResult::converged` is `false`.
use crate::error::LinalgError;
use crate::linalg::DenseMatrix;
use log::debug;
use serde::Deserialize;

/// Tuning knobs for [`JacobiSvd`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct JacobiOptions {
    /// Convergence threshold on the largest off-diagonal magnitude, relative
    /// to the Frobenius norm of the Gram matrix.
    pub epsilon: f64,
    /// Rotation budget expressed in sweeps; one sweep is `n(n-1)/2`
    /// rotations for an `n × n` Gram matrix.
    pub max_sweeps: usize,
    /// Absolute rotation budget overriding `max_sweeps` when set.
    pub max_iterations: Option<usize>,
    /// Singular values at or below `zero_threshold · max(σ₀, 1)` are treated
    /// as zero. A factorization whose largest value is at or below
    /// `zero_threshold` is degenerate.
    pub zero_threshold: f64,
}

impl Default for JacobiOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_sweeps: 12,
            max_iterations: None,
            zero_threshold: 1e-9,
        }
    }
}

impl JacobiOptions {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Rotation budget for an `n × n` Gram matrix.
    pub fn iteration_budget(&self, n: usize) -> usize {
        self.max_iterations.unwrap_or_else(|| {
            let pairs = n * n.saturating_sub(1) / 2;
            self.max_sweeps.saturating_mul(pairs).max(1)
        })
    }
}

/// `A ≈ U · diag(σ) · Vᵀ` with `r = min(rows, cols)` triplets.
#[derive(Clone, Debug)]
pub struct SvdResult {
    /// Left singular vectors, `rows × r`.
    pub u: DenseMatrix,
    /// Singular values, non-negative and descending.
    pub sigma: Vec<f64>,
    /// Right singular vectors, `cols × r`.
    pub v: DenseMatrix,
    /// Rotations applied by the eigen-solver.
    pub iterations: usize,
    /// Whether the off-diagonal mass fell below the threshold in budget.
    pub converged: bool,
}

impl SvdResult {
    pub fn rank(&self) -> usize {
        self.sigma.len()
    }

    /// `(U_k · Σ_k) · V_kᵀ` using the leading `k` triplets.
    pub fn reconstruct(&self, k: usize) -> Result<DenseMatrix, LinalgError> {
        let k = k.min(self.rank());
        let mut us = self.u.leading_columns(k);
        for (c, &s) in self.sigma.iter().take(k).enumerate() {
            us.scale_column(c, s);
        }
        us.multiply(&self.v.leading_columns(k).transpose())
    }

    /// Share of `Σσ²` carried by the leading `k` values (1 for a zero matrix).
    pub fn energy_ratio(&self, k: usize) -> f64 {
        let total: f64 = self.sigma.iter().map(|s| s * s).sum();
        if total <= 0.0 {
            return 1.0;
        }
        let kept: f64 = self.sigma.iter().take(k).map(|s| s * s).sum();
        kept / total
    }
}

/// Gram-matrix Jacobi SVD.
#[derive(Clone, Copy, Debug, Default)]
pub struct JacobiSvd {
    options: JacobiOptions,
}

impl JacobiSvd {
    pub fn new(options: JacobiOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JacobiOptions {
        &self.options
    }

    pub fn factorize(&self, a: &DenseMatrix) -> Result<SvdResult, LinalgError> {
        if a.is_empty() {
            return Err(LinalgError::Empty);
        }
        let opts = &self.options;
        let use_right = a.cols() <= a.rows();
        let mut gram = if use_right { a.gram()? } else { a.outer_gram()? };
        let n = gram.rows();
        let mut eigvecs = DenseMatrix::try_zeros(n, n)?;
        for i in 0..n {
            eigvecs.set(i, i, 1.0);
        }

        let budget = opts.iteration_budget(n);
        let (iterations, converged) = diagonalize(&mut gram, &mut eigvecs, opts.epsilon, budget);
        if !converged {
            debug!("JacobiSvd: no convergence after {iterations} rotations (n={n})");
        }

        let mut sigma: Vec<f64> = (0..n).map(|i| gram.get(i, i).abs().sqrt()).collect();
        let order = descending_order(&sigma);
        sigma = order.iter().map(|&i| sigma[i]).collect();
        let mut known = permute_columns(&eigvecs, &order);

        let largest = sigma.first().copied().unwrap_or(0.0);
        if !largest.is_finite() || largest <= opts.zero_threshold {
            return Err(LinalgError::Degenerate { largest });
        }
        let cutoff = opts.zero_threshold * largest.max(1.0);

        for c in 0..known.cols() {
            let norm = known.column_norm(c);
            if norm > 0.0 {
                known.scale_column(c, 1.0 / norm);
            }
        }

        // The eigenvectors are one factor; derive the other as A·V·Σ⁻¹ (or Aᵀ·U·Σ⁻¹).
        let mut derived = if use_right {
            a.multiply(&known)?
        } else {
            a.transpose().multiply(&known)?
        };
        for (c, s) in sigma.iter_mut().enumerate() {
            if *s <= cutoff {
                derived.scale_column(c, 0.0);
                *s = 0.0;
                continue;
            }
            derived.scale_column(c, 1.0 / *s);
            // Fold the normalisation back into σ so that σ·u·vᵀ is unchanged.
            let norm = derived.column_norm(c);
            if norm > 0.0 {
                derived.scale_column(c, 1.0 / norm);
                *s *= norm;
            }
        }

        let order = descending_order(&sigma);
        let sigma: Vec<f64> = order.iter().map(|&i| sigma[i]).collect();
        let known = permute_columns(&known, &order);
        let derived = permute_columns(&derived, &order);
        let (mut u, mut v) = if use_right {
            (derived, known)
        } else {
            (known, derived)
        };
        normalize_signs(&mut u, &mut v, opts.zero_threshold);

        Ok(SvdResult {
            u,
            sigma,
            v,
            iterations,
            converged,
        })
    }
}

/// Rotate `g` toward diagonal form, accumulating rotations into `vecs`.
///
/// Returns the number of rotations applied and whether the largest
/// off-diagonal magnitude dropped to `epsilon · ‖g‖_F` or below.
fn diagonalize(
    g: &mut DenseMatrix,
    vecs: &mut DenseMatrix,
    epsilon: f64,
    budget: usize,
) -> (usize, bool) {
    let n = g.rows();
    if n < 2 {
        return (0, true);
    }
    let tolerance = epsilon * g.frobenius_norm();
    let mut pivots = PivotCache::new(g);

    for iter in 0..budget {
        let (p, q) = pivots.largest(g);
        let gpq = g.get(p, q);
        if gpq.abs() <= tolerance {
            return (iter, true);
        }
        let theta = 0.5 * (2.0 * gpq).atan2(g.get(q, q) - g.get(p, p));
        let (s, c) = theta.sin_cos();
        rotate(g, vecs, p, q, c, s);
        pivots.update(g, p, q);
    }

    let (p, q) = pivots.largest(g);
    (budget, g.get(p, q).abs() <= tolerance)
}

/// `g ← Jᵀ g J`, `vecs ← vecs J` for the plane rotation
/// `J[p][p] = J[q][q] = c`, `J[p][q] = s`, `J[q][p] = -s`.
fn rotate(g: &mut DenseMatrix, vecs: &mut DenseMatrix, p: usize, q: usize, c: f64, s: f64) {
    let n = g.rows();
    let (gpp, gqq, gpq) = (g.get(p, p), g.get(q, q), g.get(p, q));
    for k in 0..n {
        if k == p || k == q {
            continue;
        }
        let gkp = g.get(k, p);
        let gkq = g.get(k, q);
        let new_kp = c * gkp - s * gkq;
        let new_kq = s * gkp + c * gkq;
        g.set(k, p, new_kp);
        g.set(p, k, new_kp);
        g.set(k, q, new_kq);
        g.set(q, k, new_kq);
    }
    g.set(p, p, c * c * gpp - 2.0 * s * c * gpq + s * s * gqq);
    g.set(q, q, s * s * gpp + 2.0 * s * c * gpq + c * c * gqq);
    g.set(p, q, 0.0);
    g.set(q, p, 0.0);

    for k in 0..vecs.rows() {
        let vkp = vecs.get(k, p);
        let vkq = vecs.get(k, q);
        vecs.set(k, p, c * vkp - s * vkq);
        vecs.set(k, q, s * vkp + c * vkq);
    }
}

/// Column index of the largest `|g[i][j]|`, `j > i`, for every row `i`.
///
/// Ties go to the lowest column, and across rows to the lowest row, which
/// reproduces a plain row-major scan for the first maximum.
struct PivotCache {
    best: Vec<usize>,
}

impl PivotCache {
    fn new(g: &DenseMatrix) -> Self {
        let n = g.rows();
        let mut cache = Self {
            best: vec![0; n.saturating_sub(1)],
        };
        for i in 0..cache.best.len() {
            cache.rescan(g, i);
        }
        cache
    }

    fn rescan(&mut self, g: &DenseMatrix, i: usize) {
        let row = g.row(i);
        let mut best = i + 1;
        for j in (i + 2)..row.len() {
            if row[j].abs() > row[best].abs() {
                best = j;
            }
        }
        self.best[i] = best;
    }

    fn largest(&self, g: &DenseMatrix) -> (usize, usize) {
        let mut best_row = 0;
        let mut best_val = f64::NEG_INFINITY;
        for (i, &j) in self.best.iter().enumerate() {
            let v = g.get(i, j).abs();
            if v > best_val {
                best_val = v;
                best_row = i;
            }
        }
        (best_row, self.best[best_row])
    }

    /// Refresh after a rotation touched rows and columns `p` and `q`.
    fn update(&mut self, g: &DenseMatrix, p: usize, q: usize) {
        for i in 0..self.best.len() {
            if i == p || i == q || self.best[i] == p || self.best[i] == q {
                self.rescan(g, i);
                continue;
            }
            let mut best = self.best[i];
            let mut best_val = g.get(i, best).abs();
            for cand in [p, q] {
                if cand <= i {
                    continue;
                }
                let v = g.get(i, cand).abs();
                if v > best_val || (v == best_val && cand < best) {
                    best = cand;
                    best_val = v;
                }
            }
            self.best[i] = best;
        }
    }
}

/// Indices sorting `values` descending; equal values keep their order.
fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order
}

fn permute_columns(m: &DenseMatrix, order: &[usize]) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(m.rows(), order.len());
    for r in 0..m.rows() {
        let src = m.row(r);
        let dst = out.row_mut(r);
        for (c, &from) in order.iter().enumerate() {
            dst[c] = src[from];
        }
    }
    out
}

/// Flip `(uᵢ, vᵢ)` so the first entry of `uᵢ` above `threshold` is positive.
fn normalize_signs(u: &mut DenseMatrix, v: &mut DenseMatrix, threshold: f64) {
    for c in 0..u.cols() {
        let lead = (0..u.rows())
            .map(|r| u.get(r, c))
            .find(|x| x.abs() > threshold);
        if matches!(lead, Some(x) if x < 0.0) {
            u.scale_column(c, -1.0);
            v.scale_column(c, -1.0);
        }
    }
}
