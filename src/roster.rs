//! Participants, validated rosters and per-attempt selections.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RosterError, VerifyError};
use crate::fingerprint::roster_fingerprint;
use crate::polynomial::Poly;

const EXECUTIVES_CSV: &str = include_str!("../data/executives.csv");

/// Threshold of the embedded executive roster.
pub const EXECUTIVE_THRESHOLD: usize = 3;

/// One holder of a secret share: the point (position, share) on the secret polynomial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Public x-coordinate. Nonzero and unique within a roster.
    pub position: f64,
    /// Secret share f(position).
    pub share: f64,
}

impl Participant {
    pub fn new(id: impl Into<String>, position: f64, share: f64) -> Self {
        Participant {
            id: id.into(),
            name: String::new(),
            role: String::new(),
            position,
            share,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.name = name.into();
        self.role = role.into();
        self
    }

    /// Name for player-facing messages, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// An immutable (t, n) roster whose integrity was checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    threshold: usize,
    participants: Vec<Participant>,
}

impl Roster {
    /// Validate and build a roster.
    ///
    /// Positions must be finite, nonzero and pairwise distinct, otherwise some
    /// Lagrange denominator would vanish.
    pub fn new(threshold: usize, participants: Vec<Participant>) -> Result<Self, RosterError> {
        if participants.is_empty() {
            return Err(RosterError::Empty);
        }
        if threshold == 0 || threshold > participants.len() {
            return Err(RosterError::InvalidThreshold {
                threshold,
                participants: participants.len(),
            });
        }

        Self::check_participants(&participants)?;

        let roster = Roster {
            threshold,
            participants,
        };
        debug!(
            participants = roster.participants.len(),
            threshold,
            fingerprint = %roster.fingerprint(),
            "roster loaded"
        );
        Ok(roster)
    }

    fn check_participants(participants: &[Participant]) -> Result<(), RosterError> {
        let mut ids = HashSet::new();
        for (i, p) in participants.iter().enumerate() {
            if !ids.insert(p.id.as_str()) {
                return Err(RosterError::DuplicateId(p.id.clone()));
            }
            if !p.position.is_finite() {
                return Err(RosterError::NonFinite {
                    id: p.id.clone(),
                    field: "position",
                });
            }
            if !p.share.is_finite() {
                return Err(RosterError::NonFinite {
                    id: p.id.clone(),
                    field: "share",
                });
            }
            if p.position == 0.0 {
                return Err(RosterError::ZeroPosition(p.id.clone()));
            }
            if let Some(earlier) = participants[..i].iter().find(|q| q.position == p.position) {
                return Err(RosterError::DuplicatePosition {
                    first: earlier.id.clone(),
                    second: p.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Load `id,name,role,position,share` records. `name` and `role` may be omitted.
    pub fn from_csv_reader<R: io::Read>(threshold: usize, reader: R) -> Result<Self, RosterError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let participants = rdr
            .deserialize::<Participant>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(threshold, participants)
    }

    pub fn from_csv_path<P: AsRef<Path>>(threshold: usize, path: P) -> Result<Self, RosterError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let participants = rdr
            .deserialize::<Participant>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(threshold, participants)
    }

    /// The five-executive 3-of-5 roster shipped with the crate.
    pub fn executives() -> Self {
        Self::from_csv_reader(EXECUTIVE_THRESHOLD, EXECUTIVES_CSV.as_bytes())
            .expect("embedded executive roster is valid")
    }

    /// A roster whose shares all lie on `poly`; the threshold is `poly.threshold()`.
    pub fn from_polynomial(poly: &Poly, members: &[(&str, f64)]) -> Result<Self, RosterError> {
        let participants = members
            .iter()
            .map(|&(id, x)| Participant::new(id, x, poly.eval(x)))
            .collect();
        Self::new(poly.threshold(), participants)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn fingerprint(&self) -> String {
        roster_fingerprint(self)
    }

    /// Resolve player-chosen ids into a [`Selection`].
    ///
    /// The size check runs first, so a short or long selection is always
    /// reported as [`VerifyError::InvalidSelection`].
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Selection<'_>, VerifyError> {
        if ids.len() != self.threshold {
            return Err(VerifyError::InvalidSelection {
                expected: self.threshold,
                got: ids.len(),
            });
        }
        let mut members: Vec<&Participant> = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let p = self
                .get(id)
                .ok_or_else(|| VerifyError::UnknownParticipant(id.to_string()))?;
            if members.iter().any(|q| q.id == p.id) {
                return Err(VerifyError::DuplicateSelection(p.id.clone()));
            }
            members.push(p);
        }
        Ok(Selection::new(members))
    }

    /// Every selection of exactly `threshold` participants, C(n, t) in total.
    pub fn combinations(&self) -> Vec<Selection<'_>> {
        index_combinations(self.participants.len(), self.threshold)
            .into_iter()
            .map(|idx| Selection::new(idx.into_iter().map(|i| &self.participants[i]).collect()))
            .collect()
    }
}

/// Exactly `t` distinct participants, ordered by ascending public position.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'r> {
    members: Vec<&'r Participant>,
}

impl<'r> Selection<'r> {
    fn new(mut members: Vec<&'r Participant>) -> Self {
        members.sort_by(|a, b| a.position.total_cmp(&b.position));
        Selection { members }
    }

    pub fn members(&self) -> &[&'r Participant] {
        &self.members
    }

    pub fn ids(&self) -> Vec<&'r str> {
        self.members.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.members.iter().map(|p| p.position).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Lexicographic k-subsets of 0..n.
fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
