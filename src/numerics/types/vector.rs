//! `Vector3` with default precision `f32`.

use core::ops::{Add, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

use super::matrix::Matrix;
use super::traits::FloatingPoint;

/// Vector3 carries translation offsets, scale factors, Euler angles and
/// sample points for the transform builders.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3<T: FloatingPoint = f32> {
    pub x: T,
    pub y: T,
    pub z: T,
}

// Serialized as a plain 3-tuple so TOML configs can write `[x, y, z]`.
impl<T> Serialize for Vector3<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.x, &self.y, &self.z).serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Vector3<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (x, y, z) = <(T, T, T)>::deserialize(deserializer)?;
        Ok(Vector3 { x, y, z })
    }
}

impl<T: FloatingPoint> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    pub fn one() -> Self {
        Self::new(T::one(), T::one(), T::one())
    }

    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_squared(&self) -> T {
        self.dot(self)
    }

    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    /// `4 x 1` homogeneous column `(x, y, z, 1)`.
    pub fn to_homogeneous_point(&self) -> Matrix<T> {
        Matrix::column_vector(&[self.x, self.y, self.z, T::one()])
    }

    /// `4 x 1` homogeneous column `(x, y, z, 0)`; unaffected by translation.
    pub fn to_homogeneous_direction(&self) -> Matrix<T> {
        Matrix::column_vector(&[self.x, self.y, self.z, T::zero()])
    }

    /// Project a `4 x 1` homogeneous column back to 3-D by dividing by `w`.
    ///
    /// Returns `None` for a non-column input or `w == 0` (a direction).
    pub fn from_homogeneous(column: &Matrix<T>) -> Option<Self> {
        if column.shape() != (4, 1) {
            return None;
        }
        let w = column.elem(3, 0)?;
        if w == T::zero() {
            return None;
        }
        Some(Self::new(
            column.elem(0, 0)? / w,
            column.elem(1, 0)? / w,
            column.elem(2, 0)? / w,
        ))
    }
}

impl<T: FloatingPoint> Add for Vector3<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: FloatingPoint> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: FloatingPoint> Mul<T> for Vector3<T> {
    type Output = Self;

    fn mul(self, scalar: T) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl<T: FloatingPoint> Neg for Vector3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: FloatingPoint> From<[T; 3]> for Vector3<T> {
    fn from(array: [T; 3]) -> Self {
        Self::new(array[0], array[1], array[2])
    }
}

impl<T: FloatingPoint> From<Vector3<T>> for [T; 3] {
    fn from(v: Vector3<T>) -> Self {
        [v.x, v.y, v.z]
    }
}

impl<T: FloatingPoint> From<(T, T, T)> for Vector3<T> {
    fn from(tuple: (T, T, T)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }
}
