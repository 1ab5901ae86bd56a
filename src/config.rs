//! Numeric tolerance policy for judging hand-computed answers.
//!
//! Shares and coefficients in the teaching scenario are small integers or
//! simple rationals, so an absolute tolerance of `0.1` leaves room for a
//! player who rounds `8/3` to `2.67`. It is a leniency for manual arithmetic,
//! not a precision bound.
//!
//! Comparisons are exclusive: a value exactly one tolerance away is wrong.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest absolute error (exclusive) accepted for a Lagrange coefficient.
pub const COEFFICIENT_TOLERANCE: f64 = 0.1;

/// Largest absolute error (exclusive) accepted for the final signature.
pub const SIGNATURE_TOLERANCE: f64 = 0.1;

/// Tolerances used by [`LagrangeVerifier`](crate::verifier::LagrangeVerifier).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    #[serde(default = "default_coefficient_tolerance")]
    pub coefficient_tolerance: f64,
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance: f64,
}

fn default_coefficient_tolerance() -> f64 {
    COEFFICIENT_TOLERANCE
}

fn default_signature_tolerance() -> f64 {
    SIGNATURE_TOLERANCE
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            coefficient_tolerance: COEFFICIENT_TOLERANCE,
            signature_tolerance: SIGNATURE_TOLERANCE,
        }
    }
}

impl VerifierConfig {
    /// Reject tolerances that would make every comparison meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("coefficient tolerance", self.coefficient_tolerance)?;
        check_tolerance("signature tolerance", self.signature_tolerance)
    }

    /// `true` when `submitted` is strictly within the coefficient tolerance.
    pub fn coefficient_matches(&self, submitted: f64, computed: f64) -> bool {
        within(submitted, computed, self.coefficient_tolerance)
    }

    /// `true` when `submitted` is strictly within the signature tolerance.
    pub fn signature_matches(&self, submitted: f64, computed: f64) -> bool {
        within(submitted, computed, self.signature_tolerance)
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}

fn within(submitted: f64, computed: f64, tolerance: f64) -> bool {
    (submitted - computed).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_named_constants() {
        let cfg = VerifierConfig::default();
        assert_eq!(cfg.coefficient_tolerance, COEFFICIENT_TOLERANCE);
        assert_eq!(cfg.signature_tolerance, SIGNATURE_TOLERANCE);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn boundary_is_exclusive() {
        // 0.125 is exactly representable, so the boundary is tested without rounding noise.
        let cfg = VerifierConfig {
            coefficient_tolerance: 0.125,
            signature_tolerance: 0.125,
        };
        assert!(!cfg.coefficient_matches(1.125, 1.0));
        assert!(!cfg.coefficient_matches(0.875, 1.0));
        assert!(cfg.coefficient_matches(1.0625, 1.0));
        assert!(!cfg.signature_matches(-15.875, -16.0));
        assert!(cfg.signature_matches(-15.9375, -16.0));
    }

    #[test]
    fn rejects_bad_tolerances() {
        let negative = VerifierConfig {
            coefficient_tolerance: -0.1,
            ..VerifierConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::InvalidTolerance {
                name: "coefficient tolerance",
                ..
            })
        ));

        let zero = VerifierConfig {
            coefficient_tolerance: 0.0,
            signature_tolerance: 0.0,
        };
        assert!(!zero.coefficient_matches(1.0, 1.0));
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidTolerance { value, .. }) if value == 0.0
        ));

        let nan = VerifierConfig {
            signature_tolerance: f64::NAN,
            ..VerifierConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: VerifierConfig = serde_json::from_str(r#"{ "signatureTolerance": 0.5 }"#).unwrap();
        assert_eq!(cfg.coefficient_tolerance, COEFFICIENT_TOLERANCE);
        assert_eq!(cfg.signature_tolerance, 0.5);
    }
}
