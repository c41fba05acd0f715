//! Constrained numeric parameters.
//!
//! Hardware-meaningful configuration values are validated at construction
//! time, before any hardware object is built. A value that violates its
//! bounds or domain predicate is a hard failure: no rounding, clamping,
//! or coercion is performed, because an invalid vector length or element
//! length would corrupt the numeric model of the generated hardware.
//!
//! Validated values are newtypes, so construction (including serde
//! deserialization) is the only way to obtain one and every assignment
//! re-runs the validator.
//!
//! # Example
//!
//! ```
//! use opal::param::VectorRegisterLength;
//!
//! let vlen = VectorRegisterLength::new(512).unwrap();
//! assert_eq!(vlen.bits(), 512);
//!
//! // 300 is in range but not a power of two
//! assert!(VectorRegisterLength::new(300).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a parameter value violates its constraint.
///
/// Always fatal to configuration assembly; the offending value and the
/// violated constraint are named so the configuration author can fix
/// the input and re-run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value falls outside the parameter's inclusive bounds.
    #[error("{name} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// The value is in range but is not a power of two.
    #[error("{name} is not a power of 2: {value}")]
    NotPowerOfTwo { name: &'static str, value: u64 },

    /// A vector element cannot be wider than the register holding it.
    #[error("elen ({elen}) must not exceed vlen ({vlen})")]
    ElementExceedsRegister { elen: u32, vlen: u32 },
}

/// A constraint on a numeric parameter value.
///
/// The set of constraint kinds is closed and small; each is checked by
/// the pure [`Constraint::check`] function rather than dynamic dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// Inclusive range `[min, max]`.
    Range { min: u64, max: u64 },

    /// Inclusive range `[min, max]` plus power-of-two.
    ///
    /// The bounds must exclude zero; the power-of-two test relies on it.
    PowerOfTwoRange { min: u64, max: u64 },
}

impl Constraint {
    /// Returns the inclusive bounds of this constraint.
    pub const fn bounds(&self) -> (u64, u64) {
        match self {
            Constraint::Range { min, max } => (*min, *max),
            Constraint::PowerOfTwoRange { min, max } => (*min, *max),
        }
    }

    /// Checks `value` against this constraint.
    ///
    /// # Arguments
    /// * `name` - Parameter name used in error messages
    /// * `value` - The candidate value
    ///
    /// # Returns
    /// `Ok(())` if the value satisfies the constraint, otherwise the
    /// [`ValidationError`] naming the violation.
    pub fn check(&self, name: &'static str, value: u64) -> Result<(), ValidationError> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                name,
                value,
                min,
                max,
            });
        }

        if let Constraint::PowerOfTwoRange { .. } = self {
            // Bounds exclude zero, so the bit trick is well-defined.
            if value & (value - 1) != 0 {
                return Err(ValidationError::NotPowerOfTwo { name, value });
            }
        }

        Ok(())
    }
}

/// Length of each vector register in bits (VLEN).
///
/// Constrained to powers of two in `[8, 65536]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct VectorRegisterLength(u32);

impl VectorRegisterLength {
    /// Minimum register length in bits.
    pub const MIN: u32 = 8;
    /// Maximum register length in bits.
    pub const MAX: u32 = 65536;
    /// Default register length in bits.
    pub const DEFAULT: u32 = 256;

    /// The constraint enforced on every construction.
    pub const CONSTRAINT: Constraint = Constraint::PowerOfTwoRange {
        min: Self::MIN as u64,
        max: Self::MAX as u64,
    };

    /// Validates and wraps a register length.
    pub fn new(bits: u32) -> Result<Self, ValidationError> {
        Self::CONSTRAINT.check("vlen", bits as u64)?;
        Ok(Self(bits))
    }

    /// Returns the register length in bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl Default for VectorRegisterLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for VectorRegisterLength {
    type Error = ValidationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl fmt::Display for VectorRegisterLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length of each vector element in bits (ELEN).
///
/// Constrained to powers of two in `[8, 64]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct VectorElementLength(u32);

impl VectorElementLength {
    /// Minimum element length in bits.
    pub const MIN: u32 = 8;
    /// Maximum element length in bits.
    pub const MAX: u32 = 64;
    /// Default element length in bits.
    pub const DEFAULT: u32 = 64;

    /// The constraint enforced on every construction.
    pub const CONSTRAINT: Constraint = Constraint::PowerOfTwoRange {
        min: Self::MIN as u64,
        max: Self::MAX as u64,
    };

    /// Validates and wraps an element length.
    pub fn new(bits: u32) -> Result<Self, ValidationError> {
        Self::CONSTRAINT.check("elen", bits as u64)?;
        Ok(Self(bits))
    }

    /// Returns the element length in bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl Default for VectorElementLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for VectorElementLength {
    type Error = ValidationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl fmt::Display for VectorElementLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_range() {
        let c = Constraint::Range { min: 1, max: 8 };

        assert!(c.check("width", 1).is_ok());
        assert!(c.check("width", 5).is_ok());
        assert!(c.check("width", 8).is_ok());

        assert_eq!(
            c.check("width", 0),
            Err(ValidationError::OutOfRange {
                name: "width",
                value: 0,
                min: 1,
                max: 8,
            })
        );
        assert!(c.check("width", 9).is_err());

        // Plain ranges do not require powers of two
        assert!(c.check("width", 6).is_ok());
    }

    #[test]
    fn test_constraint_power_of_two_range() {
        let c = Constraint::PowerOfTwoRange { min: 8, max: 64 };

        assert!(c.check("elen", 8).is_ok());
        assert!(c.check("elen", 32).is_ok());
        assert!(c.check("elen", 64).is_ok());

        assert_eq!(
            c.check("elen", 48),
            Err(ValidationError::NotPowerOfTwo {
                name: "elen",
                value: 48,
            })
        );

        // Range check runs first
        assert_eq!(
            c.check("elen", 4),
            Err(ValidationError::OutOfRange {
                name: "elen",
                value: 4,
                min: 8,
                max: 64,
            })
        );
        assert!(c.check("elen", 128).is_err());
    }

    #[test]
    fn test_vlen_accepts_every_power_of_two_in_range() {
        let mut bits = VectorRegisterLength::MIN;
        while bits <= VectorRegisterLength::MAX {
            let vlen = VectorRegisterLength::new(bits).unwrap();
            assert_eq!(vlen.bits(), bits);
            bits <<= 1;
        }
    }

    #[test]
    fn test_vlen_rejects_non_powers_of_two() {
        for bits in [100, 300, 1000, 65535] {
            let err = VectorRegisterLength::new(bits).unwrap_err();
            assert_eq!(
                err,
                ValidationError::NotPowerOfTwo {
                    name: "vlen",
                    value: bits as u64,
                }
            );
        }
    }

    #[test]
    fn test_vlen_rejects_out_of_range() {
        // Below the minimum, power-of-two-ness does not matter
        assert!(matches!(
            VectorRegisterLength::new(4),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            VectorRegisterLength::new(131072),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            VectorRegisterLength::new(0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_elen_same_law_over_its_range() {
        let mut bits = VectorElementLength::MIN;
        while bits <= VectorElementLength::MAX {
            assert_eq!(VectorElementLength::new(bits).unwrap().bits(), bits);
            bits <<= 1;
        }

        assert!(matches!(
            VectorElementLength::new(48),
            Err(ValidationError::NotPowerOfTwo { .. })
        ));
        assert!(matches!(
            VectorElementLength::new(4),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            VectorElementLength::new(128),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(VectorRegisterLength::default().bits(), 256);
        assert_eq!(VectorElementLength::default().bits(), 64);
    }

    #[test]
    fn test_deserialization_validates() {
        let vlen: VectorRegisterLength = serde_json::from_str("1024").unwrap();
        assert_eq!(vlen.bits(), 1024);

        // Invalid input is rejected at parse time, not bound and checked later
        assert!(serde_json::from_str::<VectorRegisterLength>("300").is_err());
        assert!(serde_json::from_str::<VectorElementLength>("128").is_err());
    }

    #[test]
    fn test_serialization_is_transparent() {
        let elen = VectorElementLength::new(32).unwrap();
        assert_eq!(serde_json::to_string(&elen).unwrap(), "32");
    }

    #[test]
    fn test_error_messages_name_value_and_constraint() {
        let err = VectorRegisterLength::new(300).unwrap_err();
        assert_eq!(err.to_string(), "vlen is not a power of 2: 300");

        let err = VectorElementLength::new(128).unwrap_err();
        assert_eq!(err.to_string(), "elen out of range: 128 not in [8, 64]");
    }
}
