use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::numerics::{FloatingPoint, Matrix, MatrixError, Vector3};
use super::{identity, rotate_x, rotate_y, rotate_z};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Rotation about this axis, taking the matching component of `angles`.
    pub fn rotation<T: FloatingPoint>(self, angles: Vector3<T>) -> Matrix<T> {
        match self {
            Axis::X => rotate_x(angles.x),
            Axis::Y => rotate_y(angles.y),
            Axis::Z => rotate_z(angles.z),
        }
    }

    fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// Order in which axis rotations are multiplied, written as a string of
/// axis letters such as `"xy"` or `"zyx"`.
///
/// `"xy"` means `rotate_x * rotate_y`, so Y is applied to points first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RotationOrder {
    axes: Vec<Axis>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationOrderError {
    #[error("rotation order must name 1 to 3 axes, got {0:?}")]
    Length(String),

    #[error("unknown rotation axis {axis:?} in {order:?}")]
    UnknownAxis { axis: char, order: String },

    #[error("axis {axis:?} repeated in {order:?}")]
    Repeated { axis: char, order: String },
}

impl RotationOrder {
    pub fn new(axes: Vec<Axis>) -> Self {
        Self { axes }
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }
}

impl Default for RotationOrder {
    fn default() -> Self {
        Self { axes: vec![Axis::X, Axis::Y] }
    }
}

impl FromStr for RotationOrder {
    type Err = RotationOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let order = s.trim().to_ascii_lowercase();
        if order.is_empty() || order.chars().count() > 3 {
            return Err(RotationOrderError::Length(s.to_string()));
        }
        let mut axes = Vec::with_capacity(3);
        for c in order.chars() {
            let axis = match c {
                'x' => Axis::X,
                'y' => Axis::Y,
                'z' => Axis::Z,
                other => {
                    return Err(RotationOrderError::UnknownAxis { axis: other, order: s.to_string() })
                }
            };
            if axes.contains(&axis) {
                return Err(RotationOrderError::Repeated { axis: c, order: s.to_string() });
            }
            axes.push(axis);
        }
        Ok(Self { axes })
    }
}

impl TryFrom<String> for RotationOrder {
    type Error = RotationOrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RotationOrder> for String {
    fn from(order: RotationOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            write!(f, "{}", axis.letter())?;
        }
        Ok(())
    }
}

/// Product of the axis rotations named by `order`, left to right.
pub fn rotation<T: FloatingPoint>(order: &RotationOrder, angles: Vector3<T>) -> Result<Matrix<T>, MatrixError> {
    order
        .axes
        .iter()
        .try_fold(identity(), |acc, axis| Matrix::multiply(&acc, &axis.rotation(angles)))
}
