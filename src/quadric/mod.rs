//! Implicit surfaces carried through affine changes of frame.
//!
//! An object's surfaces are defined once in its canonical frame. With the
//! object transform `M` (canonical -> world) and its inverse, a world point
//! `p` maps back to `M⁻¹ p`, which gives:
//!
//! - quadric `pᵀ Q p = 0` becomes `Q' = (M⁻¹)ᵀ Q M⁻¹`
//! - plane `a · p = 0` (row `a`) becomes `a' = a M⁻¹`
//!
//! Nothing is cached: when `M` changes every frame, call
//! [`WorldSurfaces::compute`] every frame.

pub mod shapes;

use serde::{Deserialize, Serialize};

use crate::numerics::{FloatingPoint, Matrix, MatrixError, Point3};
use crate::transform;

pub use shapes::{cube, cylinder_z, ellipsoid, octahedron, sphere};

/// `(M⁻¹)ᵀ Q M⁻¹` for a 4x4 coefficient matrix `q`.
pub fn transform_quadric<T: FloatingPoint>(q: &Matrix<T>, inverse: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
    if q.shape() != (4, 4) {
        return Err(MatrixError::mismatch("transform_quadric", q.shape(), (4, 4)));
    }
    let right = Matrix::multiply(q, inverse)?;
    Matrix::multiply(&inverse.transpose(), &right)
}

/// `a M⁻¹` for a 1x4 plane row `a`.
pub fn transform_plane<T: FloatingPoint>(a: &Matrix<T>, inverse: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
    if a.shape() != (1, 4) {
        return Err(MatrixError::mismatch("transform_plane", a.shape(), (1, 4)));
    }
    Matrix::multiply(a, inverse)
}

/// Symmetric 4x4 `Q`; a homogeneous point `p` is on the surface iff `pᵀ Q p = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct QuadricSurface<T: FloatingPoint = f32> {
    coefficients: Matrix<T>,
}

impl<T: FloatingPoint> QuadricSurface<T> {
    pub fn new(coefficients: Matrix<T>) -> Result<Self, MatrixError> {
        if coefficients.shape() != (4, 4) {
            return Err(MatrixError::mismatch("quadric", coefficients.shape(), (4, 4)));
        }
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &Matrix<T> {
        &self.coefficients
    }

    /// Re-express in the frame whose inverse transform is `inverse`.
    pub fn transformed(&self, inverse: &Matrix<T>) -> Result<Self, MatrixError> {
        Ok(Self { coefficients: transform_quadric(&self.coefficients, inverse)? })
    }

    /// `pᵀ Q p` with `p = (x, y, z, 1)`; negative inside closed quadrics.
    pub fn evaluate(&self, p: Point3<T>) -> T {
        let v = [p.x.to_f64(), p.y.to_f64(), p.z.to_f64(), 1.0];
        let mut acc = 0.0f64;
        for (i, vi) in v.iter().enumerate() {
            for (j, vj) in v.iter().enumerate() {
                acc += vi * self.coefficients[(i, j)].to_f64() * vj;
            }
        }
        T::from_f64(acc)
    }

    pub fn is_symmetric(&self, tolerance: T) -> bool {
        self.coefficients.approx_eq(&self.coefficients.transpose(), tolerance)
    }

    pub fn to_flat_list(&self) -> Vec<T> {
        self.coefficients.to_flat_list()
    }
}

/// Plane row `(a, b, c, d)`; points with `a x + b y + c z + d <= 0` are inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct HalfSpace<T: FloatingPoint = f32> {
    row: Matrix<T>,
}

impl<T: FloatingPoint> HalfSpace<T> {
    pub fn new(a: T, b: T, c: T, d: T) -> Self {
        Self { row: Matrix::row_vector(&[a, b, c, d]) }
    }

    pub fn from_row(row: Matrix<T>) -> Result<Self, MatrixError> {
        if row.shape() != (1, 4) {
            return Err(MatrixError::mismatch("half_space", row.shape(), (1, 4)));
        }
        Ok(Self { row })
    }

    pub fn row(&self) -> &Matrix<T> {
        &self.row
    }

    pub fn transformed(&self, inverse: &Matrix<T>) -> Result<Self, MatrixError> {
        Ok(Self { row: transform_plane(&self.row, inverse)? })
    }

    /// `a · (x, y, z, 1)`
    pub fn evaluate(&self, p: Point3<T>) -> T {
        let v = [p.x.to_f64(), p.y.to_f64(), p.z.to_f64(), 1.0];
        let acc: f64 = v.iter().enumerate().map(|(j, vj)| self.row[(0, j)].to_f64() * vj).sum();
        T::from_f64(acc)
    }

    pub fn contains(&self, p: Point3<T>) -> bool {
        self.evaluate(p) <= T::zero()
    }

    pub fn to_flat_list(&self) -> Vec<T> {
        self.row.to_flat_list()
    }
}

/// One piece of an object's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub enum SurfacePiece<T: FloatingPoint = f32> {
    Quadric(QuadricSurface<T>),
    Plane(HalfSpace<T>),
}

impl<T: FloatingPoint> SurfacePiece<T> {
    pub fn transformed(&self, inverse: &Matrix<T>) -> Result<Self, MatrixError> {
        Ok(match self {
            SurfacePiece::Quadric(q) => SurfacePiece::Quadric(q.transformed(inverse)?),
            SurfacePiece::Plane(a) => SurfacePiece::Plane(a.transformed(inverse)?),
        })
    }

    pub fn evaluate(&self, p: Point3<T>) -> T {
        match self {
            SurfacePiece::Quadric(q) => q.evaluate(p),
            SurfacePiece::Plane(a) => a.evaluate(p),
        }
    }

    /// 16 values for a quadric, 4 for a plane, column-major.
    pub fn to_flat_list(&self) -> Vec<T> {
        match self {
            SurfacePiece::Quadric(q) => q.to_flat_list(),
            SurfacePiece::Plane(a) => a.to_flat_list(),
        }
    }
}

impl<T: FloatingPoint> From<QuadricSurface<T>> for SurfacePiece<T> {
    fn from(q: QuadricSurface<T>) -> Self {
        SurfacePiece::Quadric(q)
    }
}

impl<T: FloatingPoint> From<HalfSpace<T>> for SurfacePiece<T> {
    fn from(a: HalfSpace<T>) -> Self {
        SurfacePiece::Plane(a)
    }
}

/// True when every piece evaluates `<= 0` at `p` (intersection of
/// half-spaces and quadric interiors).
pub fn inside_all<T: FloatingPoint>(pieces: &[SurfacePiece<T>], p: Point3<T>) -> bool {
    pieces.iter().all(|piece| piece.evaluate(p) <= T::zero())
}

/// One object's surfaces re-expressed in world space for one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSurfaces<T: FloatingPoint = f32> {
    pub model: Matrix<T>,
    pub inverse: Matrix<T>,
    pub pieces: Vec<SurfacePiece<T>>,
}

impl<T: FloatingPoint> WorldSurfaces<T> {
    /// Invert `model` once and carry every canonical piece through it.
    ///
    /// Either every piece is transformed or an error is returned; no
    /// partially filled result escapes.
    pub fn compute(model: Matrix<T>, canonical: &[SurfacePiece<T>]) -> Result<Self, MatrixError> {
        let inverse = transform::inverse(&model)?;
        let pieces = canonical
            .iter()
            .map(|piece| piece.transformed(&inverse))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { model, inverse, pieces })
    }

    pub fn contains(&self, p: Point3<T>) -> bool {
        inside_all(&self.pieces, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::Vector3;
    use crate::transform::{place, rotate_x, rotate_y, rotation, scale, transform_point, translate, RotationOrder};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_translated_sphere_boundary() {
        let r = 0.75;
        let q = sphere::<f64>(r);
        let m = translate(1.0, -2.0, 0.5);
        let world = q.transformed(&transform::inverse(&m).unwrap()).unwrap();

        for canonical in [
            Point3::new(r, 0.0, 0.0),
            Point3::new(0.0, -r, 0.0),
            Point3::new(0.0, 0.0, r),
            Point3::new(r / 2f64.sqrt(), r / 2f64.sqrt(), 0.0),
        ] {
            let p = transform_point(&m, canonical).unwrap();
            assert!(world.evaluate(p).abs() < EPS, "point {:?} off surface", p);
        }
        assert!(world.evaluate(Point3::new(1.0, -2.0, 0.5)) < 0.0);
        assert!(world.evaluate(Point3::new(0.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_rotated_scaled_ellipsoid_boundary() {
        let q = ellipsoid::<f64>(1.0, 2.0, 0.5);
        let r = rotation(&"xy".parse::<RotationOrder>().unwrap(), Vector3::new(0.3, 1.1, 0.0)).unwrap();
        let m = place(Vector3::new(0.2, 0.0, -1.0), &r, Vector3::new(1.5, 1.0, 2.0)).unwrap();
        let world = WorldSurfaces::compute(m.clone(), &[SurfacePiece::from(q)]).unwrap();

        let canonical = Point3::new(0.0, 2.0, 0.0);
        let p = transform_point(&m, canonical).unwrap();
        assert!(world.pieces[0].evaluate(p).abs() < EPS);
        assert!(world.pieces[0].evaluate(transform_point(&m, Point3::zero()).unwrap()) < 0.0);
    }

    #[test]
    fn test_transformed_quadric_stays_symmetric() {
        let m = Matrix::multiply(&translate(1.0, 2.0, 3.0), &rotate_x(0.9f64)).unwrap();
        let world = cylinder_z::<f64>(0.4).transformed(&transform::inverse(&m).unwrap()).unwrap();
        assert!(world.is_symmetric(EPS));
    }

    #[test]
    fn test_plane_follows_transform() {
        // x <= 1 moved by +2 in x becomes x <= 3.
        let plane = HalfSpace::new(1.0f64, 0.0, 0.0, -1.0);
        let inv = transform::inverse(&translate(2.0, 0.0, 0.0)).unwrap();
        let moved = plane.transformed(&inv).unwrap();
        assert!(moved.row().approx_eq(&Matrix::row_vector(&[1.0, 0.0, 0.0, -3.0]), EPS));
        assert!(moved.contains(Point3::new(2.9, 5.0, -5.0)));
        assert!(!moved.contains(Point3::new(3.1, 0.0, 0.0)));
    }

    #[test]
    fn test_cube_membership_under_rotation() {
        let r = 0.3;
        let rot = Matrix::multiply(&rotate_x(0.6f64), &rotate_y(0.6)).unwrap();
        let m = Matrix::multiply(&translate(0.6, 0.0, 1.2), &rot).unwrap();
        let world = WorldSurfaces::compute(m.clone(), &cube::<f64>(r)).unwrap();

        assert!(world.contains(transform_point(&m, Point3::new(0.29, -0.29, 0.29)).unwrap()));
        assert!(!world.contains(transform_point(&m, Point3::new(0.31, 0.0, 0.0)).unwrap()));
        for piece in &world.pieces {
            assert_eq!(piece.to_flat_list().len(), 4);
        }
    }

    #[test]
    fn test_octahedron_membership() {
        let pieces = octahedron::<f64>(0.2);
        assert_eq!(pieces.len(), 8);
        assert!(inside_all(&pieces, Point3::zero()));
        // Vertex of the solid is at distance 0.2 * sqrt(3) along an axis.
        let v = 0.2 * 3f64.sqrt();
        assert!(inside_all(&pieces, Point3::new(v * 0.99, 0.0, 0.0)));
        assert!(!inside_all(&pieces, Point3::new(v * 1.01, 0.0, 0.0)));
    }

    #[test]
    fn test_singular_transform_yields_no_surfaces() {
        let err = WorldSurfaces::compute(scale(1.0f64, 1.0, 0.0), &cube(1.0)).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_shape_validation() {
        assert!(QuadricSurface::<f64>::new(Matrix::identity(3)).unwrap_err().is_dimension_mismatch());
        assert!(HalfSpace::<f64>::from_row(Matrix::column_vector(&[1.0, 0.0, 0.0, 0.0])).is_err());
        let bad_plane = Matrix::<f64>::row_vector(&[1.0, 2.0, 3.0]);
        assert!(transform_plane(&bad_plane, &Matrix::identity(4)).is_err());
    }

    #[test]
    fn test_surface_piece_serde() {
        let piece: SurfacePiece<f64> = sphere(1.0).into();
        let config = bincode::config::standard();
        let bytes = bincode::serde::encode_to_vec(&piece, config).unwrap();
        let (back, _): (SurfacePiece<f64>, usize) = bincode::serde::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(back, piece);
    }
}
