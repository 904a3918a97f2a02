//! Homogeneous 4x4 transform builders.
//!
//! Column vectors sit on the right: a point `p` maps to `M * p`, so in
//! `multiply(A, B)` the transform `B` is applied first. Object placement
//! is `translate * (rotate * scale)`.

pub mod rotation;

use crate::numerics::{FloatingPoint, Matrix, MatrixError, Point3, Vector3};

pub use rotation::{rotation, Axis, RotationOrder, RotationOrderError};

/// 4x4 identity.
pub fn identity<T: FloatingPoint>() -> Matrix<T> {
    Matrix::identity(4)
}

/// Identity with column 3, rows 0..2 set to `(x, y, z)`.
pub fn translate<T: FloatingPoint>(x: T, y: T, z: T) -> Matrix<T> {
    let mut m = identity();
    m.set(0, 3, x);
    m.set(1, 3, y);
    m.set(2, 3, z);
    m
}

/// `diag(x, y, z, 1)`
pub fn scale<T: FloatingPoint>(x: T, y: T, z: T) -> Matrix<T> {
    let mut m = identity();
    m.set(0, 0, x);
    m.set(1, 1, y);
    m.set(2, 2, z);
    m
}

/// Right-handed rotation about X by `theta` radians.
pub fn rotate_x<T: FloatingPoint>(theta: T) -> Matrix<T> {
    let (s, c) = (theta.sin(), theta.cos());
    let mut m = identity();
    m.set(1, 1, c);
    m.set(2, 2, c);
    m.set(1, 2, -s);
    m.set(2, 1, s);
    m
}

/// Right-handed rotation about Y by `theta` radians.
pub fn rotate_y<T: FloatingPoint>(theta: T) -> Matrix<T> {
    let (s, c) = (theta.sin(), theta.cos());
    let mut m = identity();
    m.set(0, 0, c);
    m.set(2, 2, c);
    m.set(0, 2, s);
    m.set(2, 0, -s);
    m
}

/// Right-handed rotation about Z by `theta` radians.
pub fn rotate_z<T: FloatingPoint>(theta: T) -> Matrix<T> {
    let (s, c) = (theta.sin(), theta.cos());
    let mut m = identity();
    m.set(0, 0, c);
    m.set(1, 1, c);
    m.set(0, 1, -s);
    m.set(1, 0, s);
    m
}

/// Identity with the bottom row replaced by `(x, y, z, w)`.
pub fn perspective<T: FloatingPoint>(x: T, y: T, z: T, w: T) -> Matrix<T> {
    let mut m = identity();
    m.set(3, 0, x);
    m.set(3, 1, y);
    m.set(3, 2, z);
    m.set(3, 3, w);
    m
}

/// `translate * (rotation * scale)`.
pub fn place<T: FloatingPoint>(
    translation: Vector3<T>,
    rotation: &Matrix<T>,
    scale_factors: Vector3<T>,
) -> Result<Matrix<T>, MatrixError> {
    let scaled = Matrix::multiply(rotation, &scale(scale_factors.x, scale_factors.y, scale_factors.z))?;
    Matrix::multiply(&translate(translation.x, translation.y, translation.z), &scaled)
}

fn require_4x4<T: FloatingPoint>(operation: &'static str, m: &Matrix<T>) -> Result<(), MatrixError> {
    if m.shape() != (4, 4) {
        return Err(MatrixError::mismatch(operation, m.shape(), (4, 4)));
    }
    Ok(())
}

// Signed 3x3 minor of element (row, col). The remaining rows and columns
// are walked cyclically (row+1, row+2, row+3 mod 4); a 3-cycle is an even
// permutation so the minor keeps its usual sign.
fn cofactor<T: FloatingPoint>(m: &Matrix<T>, row: usize, col: usize) -> f64 {
    let s = |i: usize, j: usize| m[((row + i) & 3, (col + j) & 3)].to_f64();
    let minor = s(1, 1) * (s(2, 2) * s(3, 3) - s(3, 2) * s(2, 3))
        - s(2, 1) * (s(1, 2) * s(3, 3) - s(3, 2) * s(1, 3))
        + s(3, 1) * (s(1, 2) * s(2, 3) - s(2, 2) * s(1, 3));
    if (row + col) & 1 == 1 {
        -minor
    } else {
        minor
    }
}

fn adjugate_f64<T: FloatingPoint>(m: &Matrix<T>) -> [f64; 16] {
    let mut adj = [0.0f64; 16];
    for col in 0..4 {
        for row in 0..4 {
            // adj(row, col) = cofactor(col, row)
            adj[col * 4 + row] = cofactor(m, col, row);
        }
    }
    adj
}

// First row of `m` dotted with the first column of its adjugate.
fn determinant_from<T: FloatingPoint>(m: &Matrix<T>, adj: &[f64; 16]) -> f64 {
    (0..4).map(|k| m[(0, k)].to_f64() * adj[k]).sum()
}

/// Transpose of the cofactor matrix of a 4x4.
pub fn adjugate<T: FloatingPoint>(m: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
    require_4x4("adjugate", m)?;
    let adj = adjugate_f64(m);
    Matrix::from_flat_list(4, 4, adj.iter().map(|&v| T::from_f64(v)).collect())
}

/// Determinant of a 4x4 by cofactor expansion.
pub fn determinant<T: FloatingPoint>(m: &Matrix<T>) -> Result<T, MatrixError> {
    require_4x4("determinant", m)?;
    Ok(T::from_f64(determinant_from(m, &adjugate_f64(m))))
}

/// Closed-form inverse `adj(M) / det(M)` of a 4x4.
///
/// A determinant that is exactly zero or not finite yields `Singular`; no
/// tolerance is applied and no fallback matrix is substituted.
pub fn inverse<T: FloatingPoint>(m: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
    require_4x4("inverse", m)?;
    let adj = adjugate_f64(m);
    let det = determinant_from(m, &adj);
    if det == 0.0 || !det.is_finite() {
        return Err(MatrixError::Singular { determinant: det });
    }
    Matrix::from_flat_list(4, 4, adj.iter().map(|&v| T::from_f64(v / det)).collect())
}

/// Apply an affine 4x4 to a point, `M * (x, y, z, 1)`.
///
/// The homogeneous `w` of the result is discarded; for projective matrices
/// multiply a homogeneous column and use `Vector3::from_homogeneous`.
pub fn transform_point<T: FloatingPoint>(m: &Matrix<T>, p: Point3<T>) -> Result<Point3<T>, MatrixError> {
    require_4x4("transform_point", m)?;
    let column = Matrix::multiply(m, &p.to_homogeneous_point())?;
    Ok(Point3::new(column[(0, 0)], column[(1, 0)], column[(2, 0)]))
}
