/// Errors raised by matrix construction and algebra.
///
/// Shapes are reported as `(height, width)`. For single-operand operations
/// (`inverse`, `from_flat_list`) `right` holds the shape that was required.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("Dimension mismatch in {operation}: got {left:?}, expected {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Singular matrix: determinant is {determinant}")]
    Singular { determinant: f64 },
}

impl MatrixError {
    pub(crate) fn mismatch(operation: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        MatrixError::DimensionMismatch { operation, left, right }
    }

    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, MatrixError::DimensionMismatch { .. })
    }

    pub fn is_singular(&self) -> bool {
        matches!(self, MatrixError::Singular { .. })
    }
}
