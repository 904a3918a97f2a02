//! Dense column-major matrix used for transforms, quadric coefficients and
//! plane rows alike.

use core::fmt;
use core::ops::Index;
use serde::{Deserialize, Serialize};

use crate::numerics::types::error::MatrixError;
use crate::numerics::types::traits::FloatingPoint;

/// Dense `height x width` matrix stored column by column.
///
/// Element `(i, j)` lives at flat index `j * height + i`. The flat store is
/// also the wire layout handed to the renderer, so `to_flat_list` never
/// reorders anything.
///
/// Operations take their operands by reference and return new matrices; the
/// only in-place mutation is `set`, meant for builders filling a fresh value.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T: FloatingPoint = f32> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T: FloatingPoint> Matrix<T> {
    /// All-zero matrix.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::filled(height, width, T::zero())
    }

    /// Matrix with every element set to `value`.
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            height,
            width,
            data: vec![value; height * width],
        }
    }

    /// Wrap a column-major list as a matrix.
    ///
    /// Fails with `DimensionMismatch` unless `values.len() == height * width`.
    pub fn from_flat_list(height: usize, width: usize, values: Vec<T>) -> Result<Self, MatrixError> {
        if values.len() != height * width {
            return Err(MatrixError::mismatch(
                "from_flat_list",
                (values.len(), 1),
                (height * width, 1),
            ));
        }
        Ok(Self { height, width, data: values })
    }

    /// Build from row-major values, which reads naturally in source code.
    pub fn from_row_major(height: usize, width: usize, values: &[T]) -> Result<Self, MatrixError> {
        if values.len() != height * width {
            return Err(MatrixError::mismatch(
                "from_row_major",
                (values.len(), 1),
                (height * width, 1),
            ));
        }
        let mut m = Self::zeros(height, width);
        for i in 0..height {
            for j in 0..width {
                m.data[j * height + i] = values[i * width + j];
            }
        }
        Ok(m)
    }

    /// Square matrix with `values` on the diagonal and zero elsewhere.
    pub fn diagonal(n: usize, values: &[T]) -> Result<Self, MatrixError> {
        if values.len() != n {
            return Err(MatrixError::mismatch("diagonal", (values.len(), 1), (n, 1)));
        }
        let mut m = Self::zeros(n, n);
        for (i, &v) in values.iter().enumerate() {
            m.data[i * n + i] = v;
        }
        Ok(m)
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// `n x 1` column.
    pub fn column_vector(values: &[T]) -> Self {
        Self {
            height: values.len(),
            width: 1,
            data: values.to_vec(),
        }
    }

    /// `1 x n` row. Column-major and row-major coincide for a single row.
    pub fn row_vector(values: &[T]) -> Self {
        Self {
            height: 1,
            width: values.len(),
            data: values.to_vec(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_square(&self) -> bool {
        self.height == self.width
    }

    /// Read element `(i, j)`; `None` when the index is outside the matrix.
    pub fn elem(&self, i: usize, j: usize) -> Option<T> {
        if i < self.height && j < self.width {
            Some(self.data[j * self.height + i])
        } else {
            None
        }
    }

    /// Write element `(i, j)`.
    ///
    /// Out-of-range writes are a caller bug: they panic in debug builds and
    /// leave the matrix untouched in release builds.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(
            i < self.height && j < self.width,
            "set({}, {}) outside {}x{} matrix",
            i, j, self.height, self.width
        );
        if i < self.height && j < self.width {
            self.data[j * self.height + i] = value;
        }
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Vec<T> {
        (0..self.width).map(|j| self[(i, j)]).collect()
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Vec<T> {
        self.data[j * self.height..(j + 1) * self.height].to_vec()
    }

    /// `width x height` matrix with indices swapped.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.width, self.height);
        for i in 0..self.height {
            for j in 0..self.width {
                out.data[i * self.width + j] = self.data[j * self.height + i];
            }
        }
        out
    }

    /// Elementwise sum; shapes must be equal.
    pub fn add(a: &Self, b: &Self) -> Result<Self, MatrixError> {
        if a.shape() != b.shape() {
            return Err(MatrixError::mismatch("add", a.shape(), b.shape()));
        }
        let data = a.data.iter().zip(&b.data).map(|(&x, &y)| x + y).collect();
        Ok(Self { height: a.height, width: a.width, data })
    }

    /// Elementwise difference; shapes must be equal.
    pub fn sub(a: &Self, b: &Self) -> Result<Self, MatrixError> {
        if a.shape() != b.shape() {
            return Err(MatrixError::mismatch("sub", a.shape(), b.shape()));
        }
        let data = a.data.iter().zip(&b.data).map(|(&x, &y)| x - y).collect();
        Ok(Self { height: a.height, width: a.width, data })
    }

    /// Matrix product `a * b`, requires `a.width == b.height`.
    ///
    /// Each output element is accumulated in `f64` before narrowing to `T`.
    pub fn multiply(a: &Self, b: &Self) -> Result<Self, MatrixError> {
        if a.width != b.height {
            return Err(MatrixError::mismatch("multiply", a.shape(), b.shape()));
        }
        let mut out = Self::zeros(a.height, b.width);
        for i in 0..a.height {
            for j in 0..b.width {
                let mut acc = 0.0f64;
                for k in 0..a.width {
                    acc += a.data[k * a.height + i].to_f64() * b.data[j * b.height + k].to_f64();
                }
                out.data[j * a.height + i] = T::from_f64(acc);
            }
        }
        Ok(out)
    }

    /// Multiply every element by `scalar`.
    pub fn scaled(&self, scalar: T) -> Self {
        Self {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|&v| v * scalar).collect(),
        }
    }

    /// Column-major flattening; this is the renderer's uniform layout.
    pub fn to_flat_list(&self) -> Vec<T> {
        self.data.clone()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_flat_list(self) -> Vec<T> {
        self.data
    }

    /// Column-major flattening narrowed to `f32`.
    pub fn to_f32_list(&self) -> Vec<f32> {
        self.data.iter().map(|v| v.to_f32()).collect()
    }

    /// Same shape and every element within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: T) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&x, &y)| (x - y).abs() <= tolerance)
    }

    /// Largest absolute element, `0` for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .map(|v| v.abs())
            .fold(T::zero(), |acc, v| if v > acc { v } else { acc })
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl<T: FloatingPoint> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(
            i < self.height && j < self.width,
            "index ({}, {}) outside {}x{} matrix",
            i, j, self.height, self.width
        );
        &self.data[j * self.height + i]
    }
}

impl<T: FloatingPoint> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.height {
            for j in 0..self.width {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self[(i, j)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct MatrixRef<'a, T> {
    height: usize,
    width: usize,
    data: &'a [T],
}

#[derive(Deserialize)]
struct MatrixOwned<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T> Serialize for Matrix<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        MatrixRef {
            height: self.height,
            width: self.width,
            data: &self.data,
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = MatrixOwned::<T>::deserialize(deserializer)?;
        Matrix::from_flat_list(raw.height, raw.width, raw.data).map_err(serde::de::Error::custom)
    }
}
