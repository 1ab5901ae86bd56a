//! Typed challenge answers and the player-facing verdicts derived from them.
//!
//! A threshold challenge is judged by [`LagrangeVerifier`]; every other
//! challenge kind carries an exact JSON value compared structurally.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::VerifierConfig;
use crate::error::{ConfigError, VerifyError};
use crate::roster::Roster;
use crate::verifier::{CoefficientSubmission, LagrangeVerifier, Outcome, VerificationResult};

/// A number typed by the player, or the raw text of an input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn to_text(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.clone(),
        }
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Text(String::new())
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagrangeAnswer {
    pub selected_ids: Vec<String>,
    #[serde(default)]
    pub coefficients: BTreeMap<String, NumericInput>,
    #[serde(default)]
    pub signature: NumericInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeAnswer {
    Lagrange(LagrangeAnswer),
    Exact { value: Value },
}

impl ChallengeAnswer {
    pub fn kind(&self) -> &'static str {
        match self {
            ChallengeAnswer::Lagrange(_) => "lagrange",
            ChallengeAnswer::Exact { .. } => "exact",
        }
    }
}

/// What a submitted answer is judged against.
#[derive(Debug, Clone)]
pub enum AnswerKey {
    Lagrange(LagrangeKey),
    Exact { value: Value },
}

#[derive(Debug, Clone)]
pub struct LagrangeKey {
    roster: Roster,
    config: VerifierConfig,
}

impl LagrangeKey {
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }
}

impl AnswerKey {
    pub fn lagrange(roster: Roster) -> Self {
        AnswerKey::Lagrange(LagrangeKey {
            roster,
            config: VerifierConfig::default(),
        })
    }

    pub fn lagrange_with_config(roster: Roster, config: VerifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(AnswerKey::Lagrange(LagrangeKey { roster, config }))
    }

    pub fn exact(value: Value) -> Self {
        AnswerKey::Exact { value }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnswerKey::Lagrange(_) => "lagrange",
            AnswerKey::Exact { .. } => "exact",
        }
    }

    /// Judge `answer`. Malformed or mismatched submissions are errors.
    pub fn judge(&self, answer: &ChallengeAnswer) -> Result<Judgement, VerifyError> {
        match (self, answer) {
            (AnswerKey::Lagrange(key), ChallengeAnswer::Lagrange(answer)) => {
                let verifier = LagrangeVerifier::from_validated(&key.roster, key.config);
                let coefficients: CoefficientSubmission = answer
                    .coefficients
                    .iter()
                    .map(|(id, v)| (id.clone(), v.to_text()))
                    .collect();
                let result = verifier.evaluate(
                    &answer.selected_ids,
                    &coefficients,
                    &answer.signature.to_text(),
                )?;
                let feedback = Feedback::from_result(&result, &key.roster);
                Ok(Judgement {
                    correct: result.is_correct,
                    feedback,
                    result: Some(result),
                })
            }
            (AnswerKey::Exact { value }, ChallengeAnswer::Exact { value: submitted }) => {
                let correct = value == submitted;
                Ok(Judgement {
                    correct,
                    feedback: if correct {
                        Feedback::Solved
                    } else {
                        Feedback::Incorrect
                    },
                    result: None,
                })
            }
            (key, answer) => Err(VerifyError::AnswerKindMismatch {
                expected: key.kind(),
                got: answer.kind(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Judgement {
    pub correct: bool,
    pub feedback: Feedback,
    /// Full breakdown for threshold challenges.
    pub result: Option<VerificationResult>,
}

/// Targeted feedback, so "right executives, wrong math" and "right math,
/// wrong final number" read differently to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Solved,
    WrongCoefficients {
        names: Vec<String>,
        signature_correct: bool,
    },
    WrongSignature {
        submitted: f64,
        expected: f64,
    },
    Incorrect,
}

impl Feedback {
    pub fn from_result(result: &VerificationResult, roster: &Roster) -> Self {
        match result.outcome() {
            Outcome::Solved => Feedback::Solved,
            Outcome::WrongCoefficients {
                ids,
                signature_correct,
            } => Feedback::WrongCoefficients {
                names: ids
                    .iter()
                    .map(|id| {
                        roster
                            .get(id)
                            .map_or_else(|| id.clone(), |p| p.display_name().to_string())
                    })
                    .collect(),
                signature_correct,
            },
            Outcome::WrongSignature => Feedback::WrongSignature {
                submitted: result.submitted_signature,
                expected: result.computed_signature,
            },
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Solved => f.write_str("Vault unlocked: the threshold signature checks out."),
            Feedback::WrongCoefficients {
                names,
                signature_correct: false,
            } => write!(
                f,
                "Check your Lagrange coefficients for {}.",
                names.join(", ")
            ),
            Feedback::WrongCoefficients {
                names,
                signature_correct: true,
            } => write!(
                f,
                "Your final number matches, but the Lagrange coefficients for {} are off.",
                names.join(", ")
            ),
            Feedback::WrongSignature {
                submitted,
                expected,
            } => write!(
                f,
                "Right executives and coefficients, wrong final number: you entered {}, the vault expects {:.2}.",
                submitted, expected
            ),
            Feedback::Incorrect => f.write_str("Incorrect answer."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> AnswerKey {
        AnswerKey::lagrange(Roster::executives())
    }

    #[test]
    fn deserializes_mixed_numeric_inputs() {
        let answer: ChallengeAnswer = serde_json::from_value(json!({
            "kind": "lagrange",
            "selectedIds": ["alice", "bob", "carol"],
            "coefficients": { "alice": 3, "bob": "-3", "carol": "1" },
            "signature": -16
        }))
        .unwrap();
        let judgement = key().judge(&answer).unwrap();
        assert!(judgement.correct);
        assert_eq!(judgement.feedback, Feedback::Solved);
        assert!(judgement.result.unwrap().is_correct);
    }

    #[test]
    fn wrong_final_number_feedback() {
        let answer = ChallengeAnswer::Lagrange(LagrangeAnswer {
            selected_ids: vec!["alice".into(), "bob".into(), "carol".into()],
            coefficients: [("alice", 3.0), ("bob", -3.0), ("carol", 1.0)]
                .into_iter()
                .map(|(id, v)| (id.to_string(), NumericInput::from(v)))
                .collect(),
            signature: NumericInput::from("-15"),
        });
        let judgement = key().judge(&answer).unwrap();
        assert!(!judgement.correct);
        assert_eq!(
            judgement.feedback,
            Feedback::WrongSignature {
                submitted: -15.0,
                expected: -16.0
            }
        );
        assert_eq!(
            judgement.feedback.to_string(),
            "Right executives and coefficients, wrong final number: you entered -15, the vault expects -16.00."
        );
    }

    #[test]
    fn wrong_coefficients_use_display_names() {
        let answer: ChallengeAnswer = serde_json::from_value(json!({
            "kind": "lagrange",
            "selectedIds": ["alice", "bob", "carol"],
            "coefficients": { "alice": "1", "bob": "1", "carol": "1" },
            "signature": "46"
        }))
        .unwrap();
        let judgement = key().judge(&answer).unwrap();
        assert_eq!(
            judgement.feedback.to_string(),
            "Check your Lagrange coefficients for Alice, Bob."
        );
    }

    #[test]
    fn validation_errors_pass_through() {
        let answer: ChallengeAnswer = serde_json::from_value(json!({
            "kind": "lagrange",
            "selectedIds": ["alice", "bob"]
        }))
        .unwrap();
        assert_eq!(
            key().judge(&answer).unwrap_err(),
            VerifyError::InvalidSelection { expected: 3, got: 2 }
        );
    }

    #[test]
    fn exact_answers_compare_structurally() {
        let key = AnswerKey::exact(json!({ "attackSuccessful": false, "validSignature": true }));
        let right: ChallengeAnswer = serde_json::from_value(json!({
            "kind": "exact",
            "value": { "validSignature": true, "attackSuccessful": false }
        }))
        .unwrap();
        let wrong = ChallengeAnswer::Exact {
            value: json!({ "attackSuccessful": true, "validSignature": true }),
        };
        assert!(key.judge(&right).unwrap().correct);
        let judgement = key.judge(&wrong).unwrap();
        assert!(!judgement.correct);
        assert_eq!(judgement.feedback, Feedback::Incorrect);
        assert!(judgement.result.is_none());
    }

    #[test]
    fn kind_mismatch_is_an_error() {
        let answer = ChallengeAnswer::Exact { value: json!(42) };
        assert_eq!(
            key().judge(&answer).unwrap_err(),
            VerifyError::AnswerKindMismatch {
                expected: "lagrange",
                got: "exact"
            }
        );
    }

    #[test]
    fn lagrange_with_config_validates() {
        let config = VerifierConfig {
            signature_tolerance: f64::INFINITY,
            ..VerifierConfig::default()
        };
        assert!(AnswerKey::lagrange_with_config(Roster::executives(), config).is_err());
    }
}
