//! Canonical-frame shapes, centred on the origin.

use crate::numerics::{FloatingPoint, Matrix};
use super::{HalfSpace, QuadricSurface, SurfacePiece};

fn diagonal_quadric<T: FloatingPoint>(values: [T; 4]) -> QuadricSurface<T> {
    let mut m = Matrix::zeros(4, 4);
    for (i, v) in values.into_iter().enumerate() {
        m.set(i, i, v);
    }
    QuadricSurface { coefficients: m }
}

/// `x² + y² + z² - r² = 0`
pub fn sphere<T: FloatingPoint>(radius: T) -> QuadricSurface<T> {
    diagonal_quadric([T::one(), T::one(), T::one(), -(radius * radius)])
}

/// `x²/a² + y²/b² + z²/c² - 1 = 0`
pub fn ellipsoid<T: FloatingPoint>(a: T, b: T, c: T) -> QuadricSurface<T> {
    diagonal_quadric([
        T::one() / (a * a),
        T::one() / (b * b),
        T::one() / (c * c),
        -T::one(),
    ])
}

/// Infinite cylinder of radius `r` around the Z axis.
pub fn cylinder_z<T: FloatingPoint>(radius: T) -> QuadricSurface<T> {
    diagonal_quadric([T::one(), T::one(), T::zero(), -(radius * radius)])
}

/// Axis-aligned cube with half-extent `r`: six planes `±axis - r`.
pub fn cube<T: FloatingPoint>(r: T) -> Vec<SurfacePiece<T>> {
    let (o, z) = (T::one(), T::zero());
    [
        (o, z, z),
        (-o, z, z),
        (z, o, z),
        (z, -o, z),
        (z, z, o),
        (z, z, -o),
    ]
    .into_iter()
    .map(|(a, b, c)| HalfSpace::new(a, b, c, -r).into())
    .collect()
}

/// Eight planes with unit normals `(±1, ±1, ±1) / √3` at distance `r`.
///
/// Ordered by sign bits of (x, y, z) with negative first.
pub fn octahedron<T: FloatingPoint>(r: T) -> Vec<SurfacePiece<T>> {
    let k = T::one() / T::from_f64(3.0).sqrt();
    (0..8u8)
        .map(|bits| {
            let sign = |bit: u8| if bits & bit != 0 { k } else { -k };
            HalfSpace::new(sign(4), sign(2), sign(1), -r).into()
        })
        .collect()
}
