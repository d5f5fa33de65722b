//! Persisted discovery documents.
//!
//! A discovery is one candidate worth keeping: its signature (in document
//! form), provenance, score breakdown, fingerprint, and free-form notes.
//! The JSON layout here is the contract with the library collaborator that
//! owns the on-disk catalog.

use serde::{Deserialize, Serialize};

use crate::score::ScoreBreakdown;
use crate::signature::{DocError, Signature, SignatureDoc};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Discovery {
    pub id: String,
    pub name: String,
    pub signature: SignatureDoc,
    pub derivation_chain: Vec<String>,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub fingerprint: String,
    #[serde(default)]
    pub notes: String,
}

impl Discovery {
    pub fn new(
        id: impl Into<String>,
        sig: &Signature,
        breakdown: &ScoreBreakdown,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: sig.name.clone(),
            signature: sig.to_doc(),
            derivation_chain: sig.derivation_chain.clone(),
            score: breakdown.total,
            score_breakdown: breakdown.clone(),
            fingerprint: sig.fingerprint(),
            notes: notes.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reconstruct the signature from the embedded document.
    pub fn reconstruct_signature(&self) -> Result<Signature, DocError> {
        Signature::from_doc(&self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::score::ScoringEngine;

    #[test]
    fn json_round_trip() {
        let sig = catalog::group();
        let breakdown = ScoringEngine::new().score(&sig, None, None);
        let disc = Discovery::new("disc_0001", &sig, &breakdown, "seed structure");

        let json = disc.to_json().unwrap();
        let back = Discovery::from_json(&json).unwrap();
        assert_eq!(back.id, "disc_0001");
        assert_eq!(back.fingerprint, sig.fingerprint());
        assert_eq!(back.score, breakdown.total);

        let rebuilt = back.reconstruct_signature().unwrap();
        assert_eq!(rebuilt, sig);
    }
}
