use anyhow::Result;
use log::debug;

use crate::linalg::{matrix_rows, Matrix, SquareMatrix};

const EIGEN_THRESHOLD: f64 = 1e-10;
const EIGEN_MAX_SWEEPS: usize = 50;

/// A fitted model: principal axes plus the variance each one explains.
pub struct Pca {
    components: Matrix,
    explained_variance: Vec<f64>,
}

impl Pca {
    /// n_features x k, columns orthonormal, ordered by descending
    /// explained variance.
    pub fn components(&self) -> &Matrix {
        &self.components
    }

    /// Eigenvalue per kept component, same order as the columns.
    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }

    pub fn into_components(self) -> Matrix {
        self.components
    }
}

/// Fit principal components to `data` (n_samples x n_features).
///
/// Features are centered to zero mean, the unbiased covariance is
/// eigendecomposed, and the eigenvectors are sorted by descending
/// eigenvalue magnitude. `n_components` of `None` keeps the full basis; a
/// request beyond n_features is clamped. Equal eigenvalues keep the
/// eigensolver's column order (stable sort).
pub fn fit(data: &Matrix, n_components: Option<usize>) -> Result<Pca> {
    let n_features = data.width();
    let mean = matrix_rows(&data.mean_row(), data.height());
    let centered = data.sub(&mean)?;
    let cov = covariance(&centered)?;
    let eigen = cov.symmetric_eigen(EIGEN_THRESHOLD, EIGEN_MAX_SWEEPS);

    let mut order: Vec<usize> = (0..n_features).collect();
    order.sort_by(|&i, &j| eigen.values[j].abs().total_cmp(&eigen.values[i].abs()));

    let k = match n_components {
        Some(k) => k.min(n_features),
        None => n_features,
    };
    debug!("keeping {} of {} components", k, n_features);

    let mut components = Matrix::new(vec![0.0; n_features * k], n_features, k)?;
    let mut explained_variance = Vec::with_capacity(k);
    for (col, &i) in order.iter().take(k).enumerate() {
        components.set_col(col, &eigen.vectors.get_col(i)?)?;
        explained_variance.push(eigen.values[i]);
    }

    Ok(Pca {
        components,
        explained_variance,
    })
}

/// Change of basis: `data` (n_samples x n_features) times `components`
/// (n_features x k). The data is projected as given, without centering;
/// `fit` centers internally but this does not. Callers wanting centered
/// coordinates must subtract the mean row themselves.
pub fn project(data: &Matrix, components: &Matrix) -> Result<Matrix> {
    data.mul(components)
}

/// Unbiased covariance of already-centered data, n_features x n_features.
fn covariance(centered: &Matrix) -> Result<SquareMatrix> {
    let scale = 1.0 / (centered.height() as f64 - 1.0);
    let cov = centered.transpose().mul(centered)?.scalar_mul(scale);
    Ok(cov.try_into()?)
}
