//! `Point3` is an alias for `Vector3`.

use super::vector::Vector3;

/// Point3 names positions in space; the storage is a Vector3.
pub type Point3<T = f32> = Vector3<T>;
