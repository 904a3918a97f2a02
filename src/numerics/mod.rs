//! Numeric value types: the element trait, `Matrix`, `Vector3` and `Point3`.

pub mod types {
    pub mod error;
    pub mod matrix;
    pub mod point;
    pub mod traits;
    pub mod vector;
}

pub use types::error::MatrixError;
pub use types::matrix::Matrix;
pub use types::point::Point3;
pub use types::traits::FloatingPoint;
pub use types::vector::Vector3;
