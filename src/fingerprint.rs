//! Domain-separated roster fingerprints.
//!
//! Uses the tagged hash construction H = SHA256(SHA256(tag)||SHA256(tag)||msg)
//! so a fingerprint can never collide with a hash of some other structure.

use sha2::{Digest, Sha256};

use crate::roster::Roster;

const ROSTER_TAG: &str = "ThresholdHeist/roster";

/// Compute a 32-byte tagged hash.
pub fn tagged_hash(tag: &str, msg: &[u8]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(&tag_hash);
    hasher.update(&tag_hash);
    hasher.update(msg);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Hex fingerprint over the threshold and every participant's id, position and share.
///
/// Floats are hashed by bit pattern; ids are length-prefixed.
pub fn roster_fingerprint(roster: &Roster) -> String {
    let mut msg = Vec::new();
    msg.extend_from_slice(&(roster.threshold() as u64).to_be_bytes());
    for p in roster.participants() {
        msg.extend_from_slice(&(p.id.len() as u64).to_be_bytes());
        msg.extend_from_slice(p.id.as_bytes());
        msg.extend_from_slice(&p.position.to_bits().to_be_bytes());
        msg.extend_from_slice(&p.share.to_bits().to_be_bytes());
    }
    hex::encode(tagged_hash(ROSTER_TAG, &msg))
}
