//! # Unit Types
//!
//! Type-safe wrappers for the handful of units a takeoff deals with. Inputs
//! and geometry are in millimetres, quantities are reported in metres,
//! kilograms and tonnes.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Kilograms, KgPerMeter, Meters, Millimeters, Tonnes};
//!
//! let span = Millimeters(6000.0);
//! let span_m: Meters = span.into();
//! assert_eq!(span_m.0, 6.0);
//!
//! let weight = KgPerMeter(49.9).over(span_m);
//! let tonnes: Tonnes = weight.into();
//! assert!((tonnes.0 - 0.2994).abs() < 1e-9);
//! # let _ = Kilograms(0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl From<Tonnes> for Kilograms {
    fn from(t: Tonnes) -> Self {
        Kilograms(t.0 * 1000.0)
    }
}

// ============================================================================
// Linear Mass
// ============================================================================

/// Mass per unit length in kg/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

impl KgPerMeter {
    /// Mass of a member of this unit weight over `length`
    pub fn over(self, length: Meters) -> Kilograms {
        Kilograms(self.0 * length.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Tonnes);
impl_arithmetic!(KgPerMeter);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let mm = Millimeters(4200.0);
        let m: Meters = mm.into();
        assert_eq!(m.0, 4.2);
    }

    #[test]
    fn test_kg_to_tonnes() {
        let kg = Kilograms(1500.0);
        let t: Tonnes = kg.into();
        assert_eq!(t.0, 1.5);
    }

    #[test]
    fn test_unit_weight_over_length() {
        let mass = KgPerMeter(50.0).over(Meters(4.0));
        assert_eq!(mass, Kilograms(200.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(3000.0);
        let b = Millimeters(1000.0);
        assert_eq!((a + b).0, 4000.0);
        assert_eq!((a - b).0, 2000.0);
        assert_eq!((a * 2.0).0, 6000.0);
        assert_eq!((a / 2.0).0, 1500.0);
        let total: Millimeters = [a, b].into_iter().sum();
        assert_eq!(total.0, 4000.0);
    }

    #[test]
    fn test_serialization() {
        let kgm = KgPerMeter(17.2);
        let json = serde_json::to_string(&kgm).unwrap();
        assert_eq!(json, "17.2");

        let roundtrip: KgPerMeter = serde_json::from_str(&json).unwrap();
        assert_eq!(kgm, roundtrip);
    }
}
