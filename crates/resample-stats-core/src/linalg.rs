//! Least-squares building blocks on faer matrices
//!
//! Feature data arrives column-major, as `x[feature][observation]`, the same
//! layout the public fitting functions accept. The design is equilibrated
//! (each column divided by its Euclidean norm) before a thin QR, so the rank
//! check on the diagonal of R does not depend on the units of the regressors.

use faer::Mat;

/// Relative size of an R diagonal entry below which a column is treated as a
/// linear combination of the columns before it
const RANK_TOLERANCE: f64 = 1e-10;

/// Design matrix over the selected rows: optional leading column of ones,
/// then the features
pub(crate) fn design_matrix(x: &[Vec<f64>], rows: &[usize], fit_intercept: bool) -> Mat<f64> {
    let offset = usize::from(fit_intercept);
    Mat::from_fn(rows.len(), x.len() + offset, |i, j| {
        if j < offset {
            1.0
        } else {
            x[j - offset][rows[i]]
        }
    })
}

/// Thin QR factorisation of an equilibrated design, X D^-1 = Q R
pub(crate) struct LeastSquares {
    x: Mat<f64>,
    scale: Vec<f64>,
    q: Mat<f64>,
    r_inv: Mat<f64>,
}

impl LeastSquares {
    /// Factor `x`; `None` when the design is rank deficient
    pub(crate) fn factor(x: Mat<f64>) -> Option<Self> {
        let (n, p) = (x.nrows(), x.ncols());
        if n < p || p == 0 {
            return None;
        }

        let scale: Vec<f64> = (0..p)
            .map(|j| (0..n).map(|i| x[(i, j)] * x[(i, j)]).sum::<f64>().sqrt())
            .collect();
        if scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return None;
        }

        let equilibrated = Mat::from_fn(n, p, |i, j| x[(i, j)] / scale[j]);
        let qr = equilibrated.qr();
        let q = qr.compute_thin_q();
        let r = qr.compute_thin_r();

        if (0..p).any(|j| r[(j, j)].abs() <= RANK_TOLERANCE) {
            return None;
        }
        let r_inv = upper_triangular_inverse(&r);

        Some(Self { x, scale, q, r_inv })
    }

    pub(crate) fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Least-squares coefficients, beta = D^-1 R^-1 Q'y
    pub(crate) fn solve(&self, y: &[f64]) -> Vec<f64> {
        let y = Mat::from_fn(y.len(), 1, |i, _| y[i]);
        let qt = self.q.transpose().to_owned();
        let qty = &qt * &y;
        let scaled = &self.r_inv * &qty;
        (0..self.n_params())
            .map(|j| scaled[(j, 0)] / self.scale[j])
            .collect()
    }

    /// X beta
    pub(crate) fn predict(&self, beta: &[f64]) -> Vec<f64> {
        let beta = Mat::from_fn(beta.len(), 1, |j, _| beta[j]);
        let fitted = &self.x * &beta;
        (0..fitted.nrows()).map(|i| fitted[(i, 0)]).collect()
    }

    /// Hat-matrix diagonal, the squared row norms of Q
    pub(crate) fn leverage(&self) -> Vec<f64> {
        (0..self.q.nrows())
            .map(|i| (0..self.q.ncols()).map(|j| self.q[(i, j)].powi(2)).sum())
            .collect()
    }

    /// (X'X)^-1
    pub(crate) fn xtx_inverse(&self) -> Mat<f64> {
        let p = self.n_params();
        self.unscale(&Mat::from_fn(p, p, |j, l| if j == l { 1.0 } else { 0.0 }))
    }

    /// Sandwich (X'X)^-1 X' diag(w) X (X'X)^-1
    pub(crate) fn sandwich(&self, weights: &[f64]) -> Mat<f64> {
        let qt = self.q.transpose().to_owned();
        let wq = Mat::from_fn(self.q.nrows(), self.q.ncols(), |i, j| {
            weights[i] * self.q[(i, j)]
        });
        self.unscale(&(&qt * &wq))
    }

    /// D^-1 R^-1 M R^-T D^-1 for a p x p inner matrix M
    fn unscale(&self, inner: &Mat<f64>) -> Mat<f64> {
        let r_inv_t = self.r_inv.transpose().to_owned();
        let left = &self.r_inv * inner;
        let full = &left * &r_inv_t;
        let p = self.n_params();
        Mat::from_fn(p, p, |j, l| full[(j, l)] / (self.scale[j] * self.scale[l]))
    }
}

/// Inverse of a non-singular upper-triangular matrix by back substitution
fn upper_triangular_inverse(r: &Mat<f64>) -> Mat<f64> {
    let p = r.ncols();
    let mut inv = vec![vec![0.0; p]; p];
    for col in 0..p {
        for row in (0..=col).rev() {
            let identity = if row == col { 1.0 } else { 0.0 };
            let tail: f64 = (row + 1..=col).map(|k| r[(row, k)] * inv[k][col]).sum();
            inv[row][col] = (identity - tail) / r[(row, row)];
        }
    }
    Mat::from_fn(p, p, |i, j| inv[i][j])
}
