//! SIMD vector values
//!
//! A SIMD value is an immutable, fixed-width vector of lanes. Lanes are kept
//! as `f64` and coerced to the lane type when the vector is built, so every
//! integer and float32 lane is exactly representable. Boolean lanes are
//! stored as `0.0`/`1.0`.

use super::operations::number::{
    double_to_int16, double_to_int32, double_to_int8, double_to_uint16, double_to_uint32,
    double_to_uint8, number_to_string,
};
use super::value::same_value_number;
use std::fmt;

/// The SIMD vector types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdType {
    Float64x2,
    Float32x4,
    Int32x4,
    Int16x8,
    Int8x16,
    Uint32x4,
    Uint16x8,
    Uint8x16,
    Bool64x2,
    Bool32x4,
    Bool16x8,
    Bool8x16,
}

impl SimdType {
    /// Number of lanes
    pub fn lanes(self) -> usize {
        match self {
            SimdType::Float64x2 | SimdType::Bool64x2 => 2,
            SimdType::Float32x4 | SimdType::Int32x4 | SimdType::Uint32x4 | SimdType::Bool32x4 => 4,
            SimdType::Int16x8 | SimdType::Uint16x8 | SimdType::Bool16x8 => 8,
            SimdType::Int8x16 | SimdType::Uint8x16 | SimdType::Bool8x16 => 16,
        }
    }

    /// Descriptor name, e.g. `Float32x4`
    pub fn name(self) -> &'static str {
        match self {
            SimdType::Float64x2 => "Float64x2",
            SimdType::Float32x4 => "Float32x4",
            SimdType::Int32x4 => "Int32x4",
            SimdType::Int16x8 => "Int16x8",
            SimdType::Int8x16 => "Int8x16",
            SimdType::Uint32x4 => "Uint32x4",
            SimdType::Uint16x8 => "Uint16x8",
            SimdType::Uint8x16 => "Uint8x16",
            SimdType::Bool64x2 => "Bool64x2",
            SimdType::Bool32x4 => "Bool32x4",
            SimdType::Bool16x8 => "Bool16x8",
            SimdType::Bool8x16 => "Bool8x16",
        }
    }

    /// Result of `typeof` for values of this type
    pub fn type_of(self) -> &'static str {
        match self {
            SimdType::Float64x2 => "float64x2",
            SimdType::Float32x4 => "float32x4",
            SimdType::Int32x4 => "int32x4",
            SimdType::Int16x8 => "int16x8",
            SimdType::Int8x16 => "int8x16",
            SimdType::Uint32x4 => "uint32x4",
            SimdType::Uint16x8 => "uint16x8",
            SimdType::Uint8x16 => "uint8x16",
            SimdType::Bool64x2 => "bool64x2",
            SimdType::Bool32x4 => "bool32x4",
            SimdType::Bool16x8 => "bool16x8",
            SimdType::Bool8x16 => "bool8x16",
        }
    }

    /// Whether lanes are booleans
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            SimdType::Bool64x2 | SimdType::Bool32x4 | SimdType::Bool16x8 | SimdType::Bool8x16
        )
    }

    /// Whether lanes are floating point
    pub fn is_float(self) -> bool {
        matches!(self, SimdType::Float64x2 | SimdType::Float32x4)
    }

    fn coerce_lane(self, value: f64) -> f64 {
        match self {
            SimdType::Float64x2 => value,
            SimdType::Float32x4 => value as f32 as f64,
            SimdType::Int32x4 => double_to_int32(value) as f64,
            SimdType::Int16x8 => double_to_int16(value) as f64,
            SimdType::Int8x16 => double_to_int8(value) as f64,
            SimdType::Uint32x4 => double_to_uint32(value) as f64,
            SimdType::Uint16x8 => double_to_uint16(value) as f64,
            SimdType::Uint8x16 => double_to_uint8(value) as f64,
            _ => {
                if value != 0.0 && !value.is_nan() {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// An immutable SIMD vector
#[derive(Debug, Clone)]
pub struct SimdValue {
    ty: SimdType,
    lanes: Box<[f64]>,
}

impl SimdValue {
    /// Build a vector, coercing every lane to the lane type.
    ///
    /// Panics if the lane count does not match the type.
    pub fn new(ty: SimdType, lanes: &[f64]) -> Self {
        assert_eq!(
            lanes.len(),
            ty.lanes(),
            "{} requires {} lanes",
            ty.name(),
            ty.lanes()
        );
        SimdValue {
            ty,
            lanes: lanes.iter().map(|&v| ty.coerce_lane(v)).collect(),
        }
    }

    /// Build a boolean vector
    pub fn from_bools(ty: SimdType, lanes: &[bool]) -> Self {
        assert!(ty.is_boolean(), "{} is not a boolean SIMD type", ty.name());
        let lanes: Vec<f64> = lanes.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        Self::new(ty, &lanes)
    }

    /// The vector type
    pub fn simd_type(&self) -> SimdType {
        self.ty
    }

    /// All lanes as numbers
    pub fn lanes(&self) -> &[f64] {
        &self.lanes
    }

    /// SameValue applied lane-wise
    pub fn same_value(&self, other: &SimdValue) -> bool {
        self.lanewise(other, same_value_number)
    }

    /// SameValueZero applied lane-wise
    pub fn same_value_zero(&self, other: &SimdValue) -> bool {
        self.lanewise(other, |a, b| (a.is_nan() && b.is_nan()) || a == b)
    }

    /// Strict equality applied lane-wise
    pub fn strict_equals(&self, other: &SimdValue) -> bool {
        self.lanewise(other, |a, b| a == b)
    }

    fn lanewise(&self, other: &SimdValue, eq: impl Fn(f64, f64) -> bool) -> bool {
        self.ty == other.ty
            && self
                .lanes
                .iter()
                .zip(other.lanes.iter())
                .all(|(&a, &b)| eq(a, b))
    }
}

impl fmt::Display for SimdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIMD.{}(", self.ty.name())?;
        for (i, &lane) in self.lanes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if self.ty.is_boolean() {
                write!(f, "{}", lane != 0.0)?;
            } else {
                write!(f, "{}", number_to_string(lane))?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_coercion() {
        let v = SimdValue::new(SimdType::Int8x16, &[200.0; 16]);
        assert_eq!(v.lanes()[0], -56.0);

        let u = SimdValue::new(SimdType::Uint32x4, &[-1.0, 1.5, f64::NAN, 4294967296.0]);
        assert_eq!(u.lanes(), &[4294967295.0, 1.0, 0.0, 0.0]);

        let f = SimdValue::new(SimdType::Float32x4, &[0.1, 0.0, 0.0, 0.0]);
        assert_eq!(f.lanes()[0], 0.1f32 as f64);
    }

    #[test]
    fn test_display() {
        let v = SimdValue::new(SimdType::Float32x4, &[1.0, 2.5, -0.0, f64::NAN]);
        assert_eq!(v.to_string(), "SIMD.Float32x4(1, 2.5, 0, NaN)");
        let b = SimdValue::from_bools(SimdType::Bool64x2, &[true, false]);
        assert_eq!(b.to_string(), "SIMD.Bool64x2(true, false)");
    }

    #[test]
    fn test_lanewise_equality() {
        let a = SimdValue::new(SimdType::Float64x2, &[f64::NAN, 0.0]);
        let b = SimdValue::new(SimdType::Float64x2, &[f64::NAN, -0.0]);
        assert!(!a.same_value(&b));
        assert!(a.same_value_zero(&b));
        assert!(!a.strict_equals(&b));
        assert!(a.same_value(&a.clone()));

        let c = SimdValue::new(SimdType::Int32x4, &[1.0, 2.0, 3.0, 4.0]);
        let d = SimdValue::new(SimdType::Uint32x4, &[1.0, 2.0, 3.0, 4.0]);
        assert!(!c.strict_equals(&d));
    }

    #[test]
    #[should_panic(expected = "requires 4 lanes")]
    fn test_wrong_lane_count() {
        SimdValue::new(SimdType::Int32x4, &[1.0]);
    }
}
