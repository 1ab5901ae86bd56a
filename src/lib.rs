//! Threshold-signature puzzles: check a player's hand-computed Lagrange
//! coefficients and recombined signature for any `t` of `n` share holders.

pub mod answer;
pub mod config;
pub mod error;
mod fingerprint;
pub mod lagrange;
pub mod polynomial;
pub mod roster;
pub mod verifier;

pub use answer::{AnswerKey, ChallengeAnswer, Feedback, Judgement, LagrangeAnswer, NumericInput};
pub use config::{VerifierConfig, COEFFICIENT_TOLERANCE, SIGNATURE_TOLERANCE};
pub use error::{ConfigError, ParseFractionError, RosterError, VerifyError};
pub use fingerprint::tagged_hash;
pub use polynomial::Poly;
pub use roster::{Participant, Roster, Selection};
pub use verifier::{
    parse_number, CoefficientSubmission, Explanation, LagrangeVerifier, Outcome, Term,
    VerificationResult,
};
