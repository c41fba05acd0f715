//! Declarative ISA parameter block.
//!
//! Groups the instruction-set-level knobs consumed by the processor
//! model: base ISA width, alignment checking, and the vector-extension
//! lengths. Per-field constraints are enforced by the parameter newtypes
//! at construction time; [`IsaParams::validate`] adds the cross-field
//! checks a single field cannot express.

use serde::{Deserialize, Serialize};

use crate::param::{ValidationError, VectorElementLength, VectorRegisterLength};

/// The base integer ISA width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BaseIsa {
    /// 32-bit base ISA.
    Rv32,
    /// 64-bit base ISA.
    #[default]
    Rv64,
}

/// ISA-level configuration parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsaParams {
    /// Base integer ISA (RV32 or RV64).
    #[serde(default)]
    pub base: BaseIsa,

    /// Whether to check memory access alignment.
    #[serde(default = "default_check_alignment")]
    pub check_alignment: bool,

    /// Enable the vector extension.
    #[serde(default = "default_enable_rvv")]
    pub enable_rvv: bool,

    /// Length of each vector register in bits (VLEN).
    #[serde(default)]
    pub vlen: VectorRegisterLength,

    /// Length of each vector element in bits (ELEN).
    #[serde(default)]
    pub elen: VectorElementLength,
}

fn default_check_alignment() -> bool {
    true
}

fn default_enable_rvv() -> bool {
    true
}

impl Default for IsaParams {
    fn default() -> Self {
        Self {
            base: BaseIsa::default(),
            check_alignment: default_check_alignment(),
            enable_rvv: default_enable_rvv(),
            vlen: VectorRegisterLength::default(),
            elen: VectorElementLength::default(),
        }
    }
}

impl IsaParams {
    /// Validates cross-field invariants.
    ///
    /// The vector extension requires `elen <= vlen`: an element cannot
    /// be wider than the register holding it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enable_rvv && self.elen.bits() > self.vlen.bits() {
            return Err(ValidationError::ElementExceedsRegister {
                elen: self.elen.bits(),
                vlen: self.vlen.bits(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let isa = IsaParams::default();
        assert_eq!(isa.base, BaseIsa::Rv64);
        assert!(isa.check_alignment);
        assert!(isa.enable_rvv);
        assert_eq!(isa.vlen.bits(), 256);
        assert_eq!(isa.elen.bits(), 64);
        assert!(isa.validate().is_ok());
    }

    #[test]
    fn test_elen_must_not_exceed_vlen() {
        let isa = IsaParams {
            vlen: VectorRegisterLength::new(32).unwrap(),
            elen: VectorElementLength::new(64).unwrap(),
            ..IsaParams::default()
        };

        assert_eq!(
            isa.validate(),
            Err(ValidationError::ElementExceedsRegister { elen: 64, vlen: 32 })
        );
    }

    #[test]
    fn test_cross_check_skipped_when_rvv_disabled() {
        let isa = IsaParams {
            enable_rvv: false,
            vlen: VectorRegisterLength::new(32).unwrap(),
            elen: VectorElementLength::new(64).unwrap(),
            ..IsaParams::default()
        };

        assert!(isa.validate().is_ok());
    }

    #[test]
    fn test_yaml_parsing_with_defaults() {
        let yaml = r#"
base: RV32
vlen: 512
"#;
        let isa: IsaParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(isa.base, BaseIsa::Rv32);
        assert_eq!(isa.vlen.bits(), 512);
        assert_eq!(isa.elen.bits(), 64);
        assert!(isa.check_alignment);
    }

    #[test]
    fn test_yaml_parsing_rejects_invalid_vlen() {
        let yaml = "vlen: 300";
        assert!(serde_yaml::from_str::<IsaParams>(yaml).is_err());
    }
}
