//! Judging a player's hand-computed threshold signature.
//!
//! The player picks `t` participants, works out each Lagrange coefficient
//! L_i(0) and sums `share_i × L_i(0)`. [`LagrangeVerifier`] recomputes both
//! for whatever subset was actually chosen and compares within the
//! configured tolerances. It keeps no state between calls.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::VerifierConfig;
use crate::error::{ConfigError, VerifyError};
use crate::lagrange::{
    as_integer, basis_at_zero, exact_coefficient, lagrange_coefficients, parse_ratio, Fraction,
};
use crate::roster::{Roster, Selection};

/// Player-entered coefficient text keyed by participant id.
///
/// Only the selected ids are read; entries for anyone else are ignored.
pub type CoefficientSubmission = BTreeMap<String, String>;

/// Outcome of one evaluation. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Selected ids in ascending position order.
    pub selected_ids: Vec<String>,
    pub coefficient_checks: BTreeMap<String, bool>,
    pub coefficients_correct: bool,
    pub signature_correct: bool,
    pub is_correct: bool,
    pub computed_coefficients: BTreeMap<String, f64>,
    pub computed_signature: f64,
    pub submitted_signature: f64,
}

/// Which part of a submission went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// At least one coefficient is off; the final sum may or may not be.
    WrongCoefficients {
        ids: Vec<String>,
        signature_correct: bool,
    },
    /// Every coefficient is right but the final sum is not.
    WrongSignature,
}

impl VerificationResult {
    /// Ids whose submitted coefficient was rejected, in position order.
    pub fn wrong_coefficients(&self) -> Vec<String> {
        self.selected_ids
            .iter()
            .filter(|id| !self.coefficient_checks.get(*id).copied().unwrap_or(false))
            .cloned()
            .collect()
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_correct {
            Outcome::Solved
        } else if !self.coefficients_correct {
            Outcome::WrongCoefficients {
                ids: self.wrong_coefficients(),
                signature_correct: self.signature_correct,
            }
        } else {
            Outcome::WrongSignature
        }
    }
}

pub struct LagrangeVerifier<'r> {
    roster: &'r Roster,
    config: VerifierConfig,
}

impl<'r> LagrangeVerifier<'r> {
    pub fn new(roster: &'r Roster) -> Self {
        LagrangeVerifier {
            roster,
            config: VerifierConfig::default(),
        }
    }

    pub fn with_config(roster: &'r Roster, config: VerifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(LagrangeVerifier { roster, config })
    }

    /// For configs that were validated when their owner was built.
    pub(crate) fn from_validated(roster: &'r Roster, config: VerifierConfig) -> Self {
        LagrangeVerifier { roster, config }
    }

    pub fn roster(&self) -> &'r Roster {
        self.roster
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// L_i(0) for every member of `selection`, keyed by id.
    pub fn compute_coefficients(&self, selection: &Selection<'_>) -> BTreeMap<String, f64> {
        let coeffs = lagrange_coefficients(&selection.positions());
        selection
            .members()
            .iter()
            .zip(coeffs)
            .map(|(p, l)| (p.id.clone(), l))
            .collect()
    }

    /// Σ share_i × coefficient_i, summed in position order.
    ///
    /// Members absent from `coefficients` contribute nothing.
    pub fn compute_expected_signature(
        &self,
        selection: &Selection<'_>,
        coefficients: &BTreeMap<String, f64>,
    ) -> f64 {
        selection
            .members()
            .iter()
            .filter_map(|p| coefficients.get(&p.id).map(|l| p.share * l))
            .sum()
    }

    /// Validate a submission and judge it.
    ///
    /// Errors are returned for malformed submissions only; a wrong answer is
    /// an `Ok` result with `is_correct == false`.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        selected_ids: &[S],
        coefficients: &CoefficientSubmission,
        signature: &str,
    ) -> Result<VerificationResult, VerifyError> {
        let selection = self
            .roster
            .select(selected_ids)
            .inspect_err(|e| debug!(error = %e, "selection rejected"))?;

        let mut submitted = Vec::with_capacity(selection.len());
        let mut missing = Vec::new();
        for p in selection.members() {
            match coefficients.get(&p.id).and_then(|s| parse_number(s)) {
                Some(v) => submitted.push(v),
                None => missing.push(*p),
            }
        }
        if !missing.is_empty() {
            let err = VerifyError::MissingCoefficient {
                ids: missing.iter().map(|p| p.id.clone()).collect(),
                names: missing.iter().map(|p| p.display_name().to_string()).collect(),
            };
            debug!(error = %err, "coefficients rejected");
            return Err(err);
        }
        let submitted_signature = parse_number(signature).ok_or_else(|| {
            debug!(input = signature, "signature rejected");
            VerifyError::MissingSignature
        })?;

        let computed = self.compute_coefficients(&selection);
        let computed_signature = self.compute_expected_signature(&selection, &computed);

        let mut coefficient_checks = BTreeMap::new();
        for (p, &value) in selection.members().iter().zip(&submitted) {
            let expected = computed[&p.id];
            let ok = self.config.coefficient_matches(value, expected);
            trace!(id = %p.id, submitted = value, expected, ok, "coefficient check");
            coefficient_checks.insert(p.id.clone(), ok);
        }
        let coefficients_correct = coefficient_checks.values().all(|&ok| ok);
        let signature_correct = self
            .config
            .signature_matches(submitted_signature, computed_signature);
        let is_correct = coefficients_correct && signature_correct;

        debug!(
            roster = %self.roster.fingerprint(),
            selection = ?selection.ids(),
            coefficients_correct,
            signature_correct,
            "submission evaluated"
        );

        Ok(VerificationResult {
            selected_ids: selection.ids().into_iter().map(String::from).collect(),
            coefficient_checks,
            coefficients_correct,
            signature_correct,
            is_correct,
            computed_coefficients: computed,
            computed_signature,
            submitted_signature,
        })
    }

    /// Worked solution for `selection`, ordered by position.
    pub fn explain(&self, selection: &Selection<'_>) -> Explanation {
        let positions = selection.positions();
        let int_positions: Option<Vec<i64>> = positions.iter().map(|&x| as_integer(x)).collect();
        let coeffs = self.compute_coefficients(selection);

        let terms: Vec<Term> = selection
            .members()
            .iter()
            .enumerate()
            .map(|(k, p)| {
                let (numerator, denominator) = basis_at_zero(k, &positions);
                let coefficient = coeffs[&p.id];
                Term {
                    id: p.id.clone(),
                    name: p.display_name().to_string(),
                    position: p.position,
                    share: p.share,
                    numerator,
                    denominator,
                    coefficient,
                    exact: int_positions
                        .as_ref()
                        .and_then(|xs| exact_coefficient(k, xs)),
                    contribution: p.share * coefficient,
                }
            })
            .collect();

        let exact_signature = terms.iter().try_fold(Fraction::zero(), |acc, t| {
            let y = Fraction::from_integer(as_integer(t.share)?);
            Some(acc + &(y * t.exact.as_ref()?))
        });

        Explanation {
            signature: self.compute_expected_signature(selection, &coeffs),
            exact_signature,
            terms,
        }
    }
}

/// Parse player input: a finite decimal, or a fraction such as `8/3`.
pub fn parse_number(input: &str) -> Option<f64> {
    let (n, d) = parse_ratio::<f64>(input)?;
    if d == 0.0 {
        return None;
    }
    let value = n / d;
    value.is_finite().then_some(value)
}

/// One participant's line in an [`Explanation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub position: f64,
    pub share: f64,
    /// ∏ (0 - x_j)
    pub numerator: f64,
    /// ∏ (x_i - x_j)
    pub denominator: f64,
    pub coefficient: f64,
    /// Reduced fraction, when every position is an integer.
    pub exact: Option<Fraction>,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub terms: Vec<Term>,
    pub signature: f64,
    /// Present when positions and shares are all integers.
    pub exact_signature: Option<Fraction>,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.terms {
            write!(
                f,
                "{} (x={}, share={}): L(0) = {} / {} = ",
                t.name, t.position, t.share, t.numerator, t.denominator
            )?;
            match &t.exact {
                Some(exact) if !exact.is_integer() => writeln!(f, "{} ≈ {:.4}", exact, t.coefficient)?,
                Some(exact) => writeln!(f, "{}", exact)?,
                None => writeln!(f, "{:.4}", t.coefficient)?,
            }
        }
        let sum = self
            .terms
            .iter()
            .map(|t| match &t.exact {
                Some(exact) => format!("{} × {}", t.share, exact),
                None => format!("{} × {:.4}", t.share, t.coefficient),
            })
            .collect::<Vec<_>>()
            .join(" + ");
        match &self.exact_signature {
            Some(exact) if exact.is_integer() => write!(f, "signature = {} = {}", sum, exact),
            Some(exact) => write!(f, "signature = {} = {} ≈ {:.4}", sum, exact, self.signature),
            None => write!(f, "signature = {} ≈ {:.4}", sum, self.signature),
        }
    }
}
