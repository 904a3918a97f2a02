//! Element trait shared by matrices, vectors and the transform builders.

/// FloatingPoint is the element trait for every numeric type in the kernel.
///
/// Implemented for `f32` and `f64`. Sums that feed a single output element
/// (matrix products, cofactors) are accumulated through `to_f64` and narrowed
/// once with `from_f64`, so `f32` storage never truncates mid-sum.
pub trait FloatingPoint:
Copy + PartialOrd + Default + core::fmt::Debug + core::fmt::Display
+ Send + Sync + 'static
+ core::ops::Add<Output = Self>
+ core::ops::Sub<Output = Self>
+ core::ops::Mul<Output = Self>
+ core::ops::Div<Output = Self>
+ core::ops::Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;

    /// Narrow to the single-precision uniform wire form.
    fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}

impl FloatingPoint for f32 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn to_f64(self) -> f64 { self as f64 }
    fn from_f64(value: f64) -> Self { value as f32 }
    fn sin(self) -> Self { f32::sin(self) }
    fn cos(self) -> Self { f32::cos(self) }
    fn sqrt(self) -> Self { f32::sqrt(self) }
    fn abs(self) -> Self { f32::abs(self) }
    fn is_finite(self) -> bool { f32::is_finite(self) }
    fn to_f32(self) -> f32 { self }
}

impl FloatingPoint for f64 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn to_f64(self) -> f64 { self }
    fn from_f64(value: f64) -> Self { value }
    fn sin(self) -> Self { f64::sin(self) }
    fn cos(self) -> Self { f64::cos(self) }
    fn sqrt(self) -> Self { f64::sqrt(self) }
    fn abs(self) -> Self { f64::abs(self) }
    fn is_finite(self) -> bool { f64::is_finite(self) }
}
