use std::{cmp::min, error::Error, fmt::Display};

use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // Row-major. Declaring minimum element traits for each operation gets
    // verbose and tedious. Sticking with f64.
    elements: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    pub fn new(elements: Vec<f64>, height: usize, width: usize) -> Result<Self> {
        if elements.len() != width * height {
            return Err(MatrixError::SizeMismatch.into());
        }

        Ok(Self {
            elements,
            height,
            width,
        })
    }

    pub fn mul(&self, matrix: &Matrix) -> Result<Matrix> {
        if self.width != matrix.height {
            return Err(MatrixError::SizeMismatch.into());
        }

        let mut elements: Vec<f64> = Vec::with_capacity(self.height * matrix.width);
        for ij in 0..self.height * matrix.width {
            let column = ij % matrix.width;
            let row = ij / matrix.width;
            let mut value = 0.0;
            for i in 0..self.width {
                let a = self.get_unchecked(row, i);
                let b = matrix.get_unchecked(i, column);
                value += a * b;
            }

            elements.push(value);
        }
        Ok(Matrix {
            elements,
            width: matrix.width,
            height: self.height,
        })
    }

    pub fn scalar_mul(&self, value: f64) -> Self {
        let elements: Vec<f64> = self.elements.iter()
            .map(|a| a * value)
            .collect();

        Self {
            elements,
            width: self.width,
            height: self.height,
        }
    }

    pub fn sub(&self, matrix: &Matrix) -> Result<Self> {
        if self.width != matrix.width || self.height != matrix.height {
            return Err(MatrixError::SizeMismatch.into());
        }
        let elements = self.elements.iter()
            .zip(matrix.elements.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            elements,
            width: self.width,
            height: self.height,
        })
    }

    pub fn get_col(&self, i: usize) -> Result<Vec<f64>, MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        let mut elements: Vec<f64> = Vec::with_capacity(self.height);
        for j in 0..self.height {
            elements.push(self.get_unchecked(j, i));
        }
        Ok(elements)
    }

    pub fn set_col(&mut self, i: usize, column: &[f64]) -> Result<(), MatrixError> {
        if i >= self.width || column.len() != self.height {
            return Err(MatrixError::OutOfBounds);
        }

        for j in 0..self.height {
            self.set_unchecked(j, i, column[j]);
        }

        Ok(())
    }

    pub fn set_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.elements[row * self.width + col] = value;
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.elements[row * self.width + col]
    }

    pub fn transpose(&self) -> Matrix {
        let mut elements: Vec<f64> = Vec::with_capacity(self.elements.len());
        for i in 0..self.width {
            for j in 0..self.height {
                elements.push(self.get_unchecked(j, i));
            }
        }
        Matrix {
            elements,
            width: self.height,
            height: self.width,
        }
    }

    pub fn round(&self, places: i32) -> Self {
        let shift = 10.0_f64.powi(places);
        let elements = self.elements.iter()
            .map(|a| (a * shift).round() / shift)
            .collect();
        Self {
            elements,
            width: self.width,
            height: self.height,
        }
    }

    pub fn mean_row(&self) -> Vec<f64> {
        let mut elements = vec![0.0; self.width];
        for i in 0..self.height {
            for j in 0..self.width {
                elements[j] += self.get_unchecked(i, j) / self.height as f64;
            }
        }
        elements
    }

    pub fn identity(width: usize, height: usize) -> Self {
        let mut elements = vec![0.0; width * height];
        let n = min(width, height);
        for i in 0..n {
            elements[i * width + i] = 1.0;
        }
        Self {
            elements,
            width,
            height,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

pub struct SquareMatrix {
    matrix: Matrix,
    n: usize,
}

/// Result of a symmetric eigendecomposition. Column i of `vectors` is the
/// eigenvector paired with `values[i]`; no ordering is applied here.
pub struct Eigen {
    pub values: Vec<f64>,
    pub vectors: Matrix,
}

impl SquareMatrix {
    /// Eigendecomposition by cyclic Jacobi rotations. The matrix must be
    /// symmetric; eigenvalues come out real and eigenvectors orthonormal.
    /// Zero or repeated eigenvalues are fine, entries already below the
    /// threshold are simply skipped.
    ///
    /// `threshold`: how close the off-diagonal norm should be to 0.
    /// `max_sweeps`: maximum number of full (p, q) sweeps.
    pub fn symmetric_eigen(&self, threshold: f64, max_sweeps: usize) -> Eigen {
        let n = self.n;
        let mut a = self.matrix.clone();
        let mut vectors = Matrix::identity(n, n);

        for _ in 0..max_sweeps {
            if off_diagonal_norm(&a, n) <= threshold {
                break;
            }
            for p in 0..n {
                for q in p + 1..n {
                    let apq = a.get_unchecked(p, q);
                    if apq.abs() <= f64::EPSILON {
                        continue;
                    }
                    let (c, s, t) = rotation(a.get_unchecked(p, p), a.get_unchecked(q, q), apq);

                    a.set_unchecked(p, p, a.get_unchecked(p, p) - t * apq);
                    a.set_unchecked(q, q, a.get_unchecked(q, q) + t * apq);
                    a.set_unchecked(p, q, 0.0);
                    a.set_unchecked(q, p, 0.0);
                    for k in 0..n {
                        if k == p || k == q {
                            continue;
                        }
                        let akp = a.get_unchecked(k, p);
                        let akq = a.get_unchecked(k, q);
                        a.set_unchecked(k, p, c * akp - s * akq);
                        a.set_unchecked(p, k, c * akp - s * akq);
                        a.set_unchecked(k, q, s * akp + c * akq);
                        a.set_unchecked(q, k, s * akp + c * akq);
                    }
                    for k in 0..n {
                        let vkp = vectors.get_unchecked(k, p);
                        let vkq = vectors.get_unchecked(k, q);
                        vectors.set_unchecked(k, p, c * vkp - s * vkq);
                        vectors.set_unchecked(k, q, s * vkp + c * vkq);
                    }
                }
            }
        }

        let mut values = Vec::with_capacity(n);
        for i in 0..n {
            values.push(a.get_unchecked(i, i));
        }
        Eigen { values, vectors }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.matrix.get_unchecked(row, col)
    }
}

/// Rotation coefficients (c, s, t) annihilating the (p, q) entry.
fn rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64, f64) {
    let theta = (aqq - app) / (2.0 * apq);
    // For large theta the closed form cancels badly; 1/(2*theta) is the
    // series limit.
    let t = if theta.abs() > 1e10 {
        1.0 / (2.0 * theta)
    } else {
        theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;
    (c, s, t)
}

fn off_diagonal_norm(a: &Matrix, n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in i + 1..n {
            let value = a.get_unchecked(i, j);
            sum += value * value;
        }
    }
    sum.sqrt()
}

impl TryFrom<Matrix> for SquareMatrix {
    type Error = MatrixError;
    fn try_from(value: Matrix) -> std::result::Result<Self, Self::Error> {
        if value.height != value.width {
            Err(MatrixError::NotSquare)
        } else {
            Ok(SquareMatrix {
                n: value.width,
                matrix: value,
            })
        }
    }
}

impl From<SquareMatrix> for Matrix {
    fn from(value: SquareMatrix) -> Matrix {
        value.matrix
    }
}

pub fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v.iter())
        .fold(0.0, |acc, (a, b)| acc + a * b)
}

pub fn matrix_rows(u: &[f64], height: usize) -> Matrix {
    Matrix {
        elements: u.repeat(height),
        height,
        width: u.len(),
    }
}

pub fn norm(u: &[f64]) -> f64 {
    u.iter()
        .fold(0.0, |acc, a| acc + a * a)
        .sqrt()
}

pub fn round(u: &[f64], places: i32) -> Vec<f64> {
    let shift = 10.0_f64.powi(places);
    u.iter()
        .map(|a| (a * shift).round() / shift)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixError {
    SizeMismatch,
    OutOfBounds,
    NotSquare,
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MatrixError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_new_size_mismatch() {
        let a = Matrix::new(
            vec![
                1.0, 2.0, 3.0,
                4.0, 5.0, 6.0,
                7.0, 8.0, 9.0, 10.0,
            ],
            3,
            3,
        );

        let err: Option<MatrixError> = a.err().map(|e| e.downcast().unwrap());
        assert_eq!(err, Some(MatrixError::SizeMismatch));
    }

    #[test]
    fn test_matrix_identity() {
        let result = Matrix::identity(3, 3);
        let expected_result = Matrix::new(
            vec![
                1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, 0.0, 1.0,
            ],
            3,
            3,
        ).unwrap();
        assert_eq!(result, expected_result);
    }

    #[test]
    fn test_multiply_square_matrix() {
        let a = Matrix::new(
            vec![
                1.0, 2.0, 3.0,
                4.0, 5.0, 6.0,
                7.0, 8.0, 9.0,
            ],
            3,
            3,
        ).unwrap();
        let b = Matrix::new(
            vec![
                10.0, 11.0, 12.0,
                13.0, 14.0, 15.0,
                16.0, 17.0, 18.0,
            ],
            3,
            3,
        ).unwrap();

        let result = a.mul(&b).unwrap();

        let expected_result = Matrix::new(
            vec![
                84.0, 90.0, 96.0,
                201.0, 216.0, 231.0,
                318.0, 342.0, 366.0,
            ],
            3,
            3,
        ).unwrap();
        assert_eq!(result, expected_result)
    }

    #[test]
    fn test_multiply_size_mismatch() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::new(vec![1.0, 2.0, 3.0], 3, 1).unwrap();

        let err: Option<MatrixError> = a.mul(&b).err().map(|e| e.downcast().unwrap());
        assert_eq!(err, Some(MatrixError::SizeMismatch));
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::new(
            vec![
                1.0, 2.0,
                3.0, 4.0,
                5.0, 6.0,
            ],
            3,
            2,
        ).unwrap();

        let result = a.transpose();
        let expected_result = Matrix::new(
            vec![
                1.0, 3.0, 5.0,
                2.0, 4.0, 6.0,
            ],
            2,
            3,
        ).unwrap();

        assert_eq!(result, expected_result);
    }

    #[test]
    fn test_round() {
        let a = Matrix::new(
            vec![
                1.0001,
                2.0005,
            ],
            2,
            1,
        ).unwrap();

        let result = a.round(3);

        let expected = Matrix::new(
            vec![
                1.0,
                2.001,
            ],
            2,
            1
        ).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_mean_row() {
        let a = Matrix::new(vec![
            1.0, 2.0,
            3.0, 4.0,
            5.0, 9.0,
        ], 3, 2).unwrap();

        let result = a.mean_row();

        let expected_result = vec![3.0, 5.0];

        assert_eq!(result, expected_result);
    }

    #[test]
    fn test_symmetric_eigen_diagonal() {
        let a: SquareMatrix = Matrix::new(vec![
            4.0, 0.0,
            0.0, 1.0,
        ], 2, 2).unwrap().try_into().unwrap();

        let eigen = a.symmetric_eigen(1e-10, 50);

        assert_eq!(round(&eigen.values, 6), vec![4.0, 1.0]);
        assert_eq!(eigen.vectors.round(6), Matrix::identity(2, 2));
    }

    #[test]
    fn test_symmetric_eigen_values() {
        // Eigenvalues of [[2, 1], [1, 2]] are 3 and 1.
        let a: SquareMatrix = Matrix::new(vec![
            2.0, 1.0,
            1.0, 2.0,
        ], 2, 2).unwrap().try_into().unwrap();

        let eigen = a.symmetric_eigen(1e-10, 50);

        let mut values = round(&eigen.values, 6);
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_symmetric_eigen_reconstructs() {
        let a = Matrix::new(vec![
            3.0, 1.0, 1.0,
            1.0, 2.0, 0.0,
            1.0, 0.0, 1.0,
        ], 3, 3).unwrap();
        let square: SquareMatrix = a.clone().try_into().unwrap();

        let eigen = square.symmetric_eigen(1e-10, 50);

        // A == V diag(w) V^T
        let mut diag = Matrix::identity(3, 3);
        for i in 0..3 {
            diag.set_unchecked(i, i, eigen.values[i]);
        }
        let reconstructed = eigen.vectors
            .mul(&diag).unwrap()
            .mul(&eigen.vectors.transpose()).unwrap();
        assert_eq!(reconstructed.round(6), a.round(6));
    }

    #[test]
    fn test_symmetric_eigen_vectors_orthonormal() {
        let a: SquareMatrix = Matrix::new(vec![
            3.0, 1.0, 1.0,
            1.0, 2.0, 0.0,
            1.0, 0.0, 1.0,
        ], 3, 3).unwrap().try_into().unwrap();

        let eigen = a.symmetric_eigen(1e-10, 50);

        let gram = eigen.vectors.transpose().mul(&eigen.vectors).unwrap();
        assert_eq!(gram.round(6), Matrix::identity(3, 3));
    }

    #[test]
    fn test_symmetric_eigen_singular() {
        // Rank 1, so one eigenvalue is 0. Must still decompose cleanly.
        let a: SquareMatrix = Matrix::new(vec![
            1.0, 1.0,
            1.0, 1.0,
        ], 2, 2).unwrap().try_into().unwrap();

        let eigen = a.symmetric_eigen(1e-10, 50);

        let mut values = round(&eigen.values, 6);
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![0.0, 2.0]);
    }

    #[test]
    fn test_square_from_non_square_errors() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();

        let err = SquareMatrix::try_from(a).err();
        assert_eq!(err, Some(MatrixError::NotSquare));
    }

    #[test]
    fn test_dot_and_norm() {
        let u = vec![3.0, 4.0];
        let v = vec![1.0, 2.0];

        assert_eq!(dot(&u, &v), 11.0);
        assert_eq!(norm(&u), 5.0);
    }
}
