//! The twelve-dimension interestingness score.
//!
//! Structural dimensions read the signature alone; model-theoretic
//! dimensions read the spectrum and are exactly zero when no spectrum is
//! given (two-phase scoring relies on this); novelty reads the fingerprint
//! against a known-set and the derivation chain. The total is the weighted
//! sum under [`Weights`], which must sum to 1.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moves::MoveKind;
use crate::signature::{AxiomKind, Signature};
use crate::solver::ModelSpectrum;

/// Per-dimension scores in `[0, 1]`, plus the weighted total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    // Structural quality
    pub connectivity: f64,
    pub richness: f64,
    pub tension: f64,
    pub economy: f64,
    pub fertility: f64,
    pub axiom_synergy: f64,

    // Model-theoretic quality
    pub has_models: f64,
    pub model_diversity: f64,
    pub spectrum_pattern: f64,
    pub solver_difficulty: f64,

    // Novelty
    pub is_novel: f64,
    pub distance: f64,

    pub total: f64,
}

/// Dimension weights. The defaults sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub connectivity: f64,
    pub richness: f64,
    pub tension: f64,
    pub economy: f64,
    pub fertility: f64,
    pub axiom_synergy: f64,
    pub has_models: f64,
    pub model_diversity: f64,
    pub spectrum_pattern: f64,
    pub solver_difficulty: f64,
    pub is_novel: f64,
    pub distance: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            connectivity: 0.05,
            richness: 0.08,
            tension: 0.08,
            economy: 0.10,
            fertility: 0.03,
            axiom_synergy: 0.06,
            has_models: 0.15,
            model_diversity: 0.10,
            spectrum_pattern: 0.10,
            solver_difficulty: 0.05,
            is_novel: 0.15,
            distance: 0.05,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.connectivity
            + self.richness
            + self.tension
            + self.economy
            + self.fertility
            + self.axiom_synergy
            + self.has_models
            + self.model_diversity
            + self.spectrum_pattern
            + self.solver_difficulty
            + self.is_novel
            + self.distance
    }
}

/// Weight sets must sum to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct BadWeights {
    pub sum: f64,
}

impl fmt::Display for BadWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score weights sum to {} instead of 1.0", self.sum)
    }
}

impl std::error::Error for BadWeights {}

/// Scores candidate signatures for mathematical interestingness.
#[derive(Clone, Debug, Default)]
pub struct ScoringEngine {
    weights: Weights,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: Weights) -> Result<Self, BadWeights> {
        let sum = weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(BadWeights { sum });
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Compute the full breakdown. Without a spectrum the four
    /// model-theoretic dimensions are exactly 0; without a known-set,
    /// `is_novel` is 0.
    pub fn score(
        &self,
        sig: &Signature,
        spectrum: Option<&ModelSpectrum>,
        known_fingerprints: Option<&HashSet<String>>,
    ) -> ScoreBreakdown {
        let mut b = ScoreBreakdown {
            connectivity: connectivity(sig),
            richness: richness(sig),
            tension: tension(sig),
            economy: economy(sig),
            fertility: fertility(sig),
            axiom_synergy: axiom_synergy(sig),
            distance: distance(sig),
            ..Default::default()
        };

        if let Some(spectrum) = spectrum {
            b.has_models = has_models(spectrum);
            b.model_diversity = model_diversity(spectrum);
            b.spectrum_pattern = spectrum_pattern(spectrum);
            b.solver_difficulty = solver_difficulty(spectrum);
        }

        if let Some(known) = known_fingerprints {
            b.is_novel = if known.contains(&sig.fingerprint()) {
                0.0
            } else {
                1.0
            };
        }

        let w = &self.weights;
        b.total = w.connectivity * b.connectivity
            + w.richness * b.richness
            + w.tension * b.tension
            + w.economy * b.economy
            + w.fertility * b.fertility
            + w.axiom_synergy * b.axiom_synergy
            + w.has_models * b.has_models
            + w.model_diversity * b.model_diversity
            + w.spectrum_pattern * b.spectrum_pattern
            + w.solver_difficulty * b.solver_difficulty
            + w.is_novel * b.is_novel
            + w.distance * b.distance;

        b
    }
}

// ============================================================================
// STRUCTURAL DIMENSIONS
// ============================================================================

/// Single-sorted signatures sit at the neutral 0.5. Multi-sorted: mean of
/// sort coverage by operations and the fraction of cross-sort operations.
fn connectivity(sig: &Signature) -> f64 {
    if sig.sorts.len() <= 1 {
        return 0.5;
    }

    let declared: HashSet<&str> = sig.sorts.iter().map(|s| s.name.as_str()).collect();
    let mut touched: HashSet<&str> = HashSet::new();
    let mut cross_sort_ops = 0usize;
    for op in &sig.operations {
        let mut sorts_in_op: HashSet<&str> = op.domain.iter().map(String::as_str).collect();
        sorts_in_op.insert(op.codomain.as_str());
        if sorts_in_op.len() > 1 {
            cross_sort_ops += 1;
        }
        touched.extend(sorts_in_op);
    }

    let coverage = touched.intersection(&declared).count() as f64 / declared.len() as f64;
    let cross_ratio = if sig.operations.is_empty() {
        0.0
    } else {
        cross_sort_ops as f64 / sig.operations.len() as f64
    };
    (coverage + cross_ratio) / 2.0
}

/// Axiom/operation ratio, peaking at 1: too few axioms is underconstrained,
/// too many is likely trivial.
fn richness(sig: &Signature) -> f64 {
    let n_ops = sig.operations.len().max(1) as f64;
    let ratio = sig.axioms.len() as f64 / n_ops;
    (-(ratio - 1.0).powi(2)).exp()
}

/// Diversity of axiom kinds, capped at six.
fn tension(sig: &Signature) -> f64 {
    if sig.axioms.is_empty() {
        return 0.0;
    }
    let kinds: BTreeSet<AxiomKind> = sig.axioms.iter().map(|a| a.kind).collect();
    (kinds.len() as f64 / 6.0).min(1.0)
}

/// Occam's razor over the component count.
fn economy(sig: &Signature) -> f64 {
    let s = sig.sorts.len() + sig.operations.len() + sig.axioms.len();
    if s <= 2 {
        0.4
    } else if s <= 12 {
        1.0 - 0.08 * s.saturating_sub(5) as f64
    } else {
        (1.0 - 0.06 * s as f64).max(0.1)
    }
}

/// Room for further constructions: sorts and binary operations feed moves.
fn fertility(sig: &Signature) -> f64 {
    let sort_score = (sig.sorts.len() as f64 / 3.0).min(1.0);
    let op_score = (sig.ops_by_arity(2).len() as f64 / 3.0).min(1.0);
    (sort_score + op_score) / 2.0
}

/// Known-good axiom pairings on a single operation: both self-distributivity
/// laws score 1.0 (shelf-like), idempotence plus left self-distributivity
/// 0.9 (quandle-like). Best binary operation wins.
fn axiom_synergy(sig: &Signature) -> f64 {
    let mut best: f64 = 0.0;
    for op in sig.ops_by_arity(2) {
        let kinds: BTreeSet<AxiomKind> = sig
            .axioms
            .iter()
            .filter(|a| a.mentions(&op.name))
            .map(|a| a.kind)
            .collect();
        let op_score = if kinds.contains(&AxiomKind::SelfDistributivity)
            && kinds.contains(&AxiomKind::RightSelfDistributivity)
        {
            1.0
        } else if kinds.contains(&AxiomKind::Idempotence)
            && kinds.contains(&AxiomKind::SelfDistributivity)
        {
            0.9
        } else {
            0.0
        };
        best = best.max(op_score);
    }
    best
}

// ============================================================================
// MODEL-THEORETIC DIMENSIONS
// ============================================================================

/// 1.0 with any model, 0.5 when empty but inconclusive (some size timed
/// out), 0.0 when proven empty everywhere.
fn has_models(spectrum: &ModelSpectrum) -> f64 {
    if !spectrum.is_empty() {
        1.0
    } else if spectrum.any_timed_out() {
        0.5
    } else {
        0.0
    }
}

fn model_diversity(spectrum: &ModelSpectrum) -> f64 {
    let sizes = spectrum.sizes_with_models();
    if sizes.is_empty() {
        return 0.0;
    }
    let span = (sizes[sizes.len() - 1] - sizes[0] + 1) as f64;
    let coverage = sizes.len() as f64 / span;
    let avg = spectrum.total_models() as f64 / sizes.len() as f64;
    let count_score = 1.0 - (-avg / 3.0).exp();
    (coverage + count_score) / 2.0
}

/// Structure in the set of sizes admitting models: prime-only 0.9, powers of
/// two 0.8, arithmetic or geometric progression 0.7, strictly growing model
/// counts 0.5.
fn spectrum_pattern(spectrum: &ModelSpectrum) -> f64 {
    let sizes = spectrum.sizes_with_models();
    if sizes.len() < 2 {
        return 0.0;
    }

    let mut score: f64 = 0.0;

    const PRIMES: [usize; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];
    if sizes.iter().all(|s| PRIMES.contains(s)) {
        score = score.max(0.9);
    }

    const POW2: [usize; 6] = [1, 2, 4, 8, 16, 32];
    if sizes.iter().all(|s| POW2.contains(s)) {
        score = score.max(0.8);
    }

    let diffs: Vec<usize> = sizes.windows(2).map(|w| w[1] - w[0]).collect();
    if diffs.windows(2).all(|w| w[0] == w[1]) {
        score = score.max(0.7);
    }

    if sizes.len() >= 3 {
        let ratios: Vec<f64> = sizes
            .windows(2)
            .map(|w| w[1] as f64 / w[0] as f64)
            .collect();
        let spread = ratios.iter().cloned().fold(f64::MIN, f64::max)
            - ratios.iter().cloned().fold(f64::MAX, f64::min);
        if spread < 0.1 {
            score = score.max(0.7);
        }
    }

    let counts: Vec<usize> = sizes.iter().map(|s| spectrum.counts[s]).collect();
    if counts.windows(2).all(|w| w[0] < w[1]) {
        score = score.max(0.5);
    }

    score
}

/// Penalizes timeout-heavy spectra and trivially flat ones (the same
/// non-zero count at three or more sizes).
fn solver_difficulty(spectrum: &ModelSpectrum) -> f64 {
    let sizes_checked = spectrum.counts.len();
    if sizes_checked == 0 {
        return 0.0;
    }
    let timeout_ratio = spectrum.timed_out_sizes.len() as f64 / sizes_checked as f64;
    let penalty_timeout = 1.0 - timeout_ratio;

    let nonzero: Vec<usize> = spectrum.counts.values().copied().filter(|&c| c > 0).collect();
    let penalty_flat = if nonzero.len() >= 3 && nonzero.iter().all(|&c| c == nonzero[0]) {
        0.7
    } else {
        1.0
    };

    penalty_timeout * penalty_flat
}

// ============================================================================
// NOVELTY DIMENSIONS
// ============================================================================

/// Distance from the seed library along the derivation chain: length plus
/// move diversity.
fn distance(sig: &Signature) -> f64 {
    let chain = &sig.derivation_chain;
    if chain.is_empty() {
        return 0.0;
    }
    let length_score = (chain.len() as f64 / 5.0).min(1.0);
    let distinct_moves = MoveKind::ALL
        .iter()
        .filter(|kind| chain.iter().any(|step| step.contains(kind.chain_tag())))
        .count();
    let diversity_score = distinct_moves as f64 / 8.0;
    (length_score + diversity_score) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{make_assoc, make_idempotent, make_right_self_distrib, make_self_distrib};
    use crate::catalog;
    use crate::signature::{Axiom, Operation, Sort};

    fn scorer() -> ScoringEngine {
        ScoringEngine::new()
    }

    fn spectrum_with(counts: &[(usize, usize)], timed_out: &[usize]) -> ModelSpectrum {
        let mut spectrum = ModelSpectrum::new("Test");
        for &(size, count) in counts {
            spectrum.counts.insert(size, count);
        }
        spectrum.timed_out_sizes = timed_out.to_vec();
        spectrum
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((Weights::default().sum() - 1.0).abs() < 1e-12);
        assert!(ScoringEngine::with_weights(Weights::default()).is_ok());

        let mut bad = Weights::default();
        bad.economy += 0.1;
        assert!(ScoringEngine::with_weights(bad).is_err());
    }

    #[test]
    fn economy_slopes() {
        // Semigroup: 1 sort + 1 op + 1 axiom = 3 components → 1.0.
        let small = scorer().score(&catalog::semigroup(), None, None);
        assert!((small.economy - 1.0).abs() < 1e-9);

        // 2 sorts + 5 ops + 4 axioms = 11 components → 1.0 - 6·0.08 = 0.52.
        let mut bloated = Signature::new("Bloated");
        bloated.sorts.push(Sort::new("S", ""));
        bloated.sorts.push(Sort::new("T", ""));
        for i in 0..5 {
            bloated.operations.push(Operation::new(
                format!("op{}", i),
                vec!["S", "S"],
                "S",
                "",
            ));
        }
        for i in 0..4 {
            let name = format!("op{}", i);
            bloated.axioms.push(Axiom::new(
                AxiomKind::Associativity,
                make_assoc(&name),
                vec![&name],
            ));
        }
        let b = scorer().score(&bloated, None, None);
        assert!((b.economy - 0.52).abs() < 0.01);
    }

    #[test]
    fn tension_grows_with_kind_diversity() {
        let single = scorer().score(&catalog::semigroup(), None, None);
        let diverse = scorer().score(&catalog::group(), None, None);
        assert!(diverse.tension > single.tension);
        assert!((single.tension - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn connectivity_neutral_when_single_sorted() {
        let b = scorer().score(&catalog::group(), None, None);
        assert!((b.connectivity - 0.5).abs() < 1e-9);
        // VectorSpace: both sorts touched, 1 of 4 ops crosses sorts.
        let vs = scorer().score(&catalog::vector_space(), None, None);
        assert!((vs.connectivity - (1.0 + 0.25) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn axiom_synergy_tiers() {
        let mut shelf = catalog::magma();
        shelf.axioms.push(Axiom::new(
            AxiomKind::SelfDistributivity,
            make_self_distrib("mul"),
            vec!["mul"],
        ));
        shelf.axioms.push(Axiom::new(
            AxiomKind::RightSelfDistributivity,
            make_right_self_distrib("mul"),
            vec!["mul"],
        ));
        assert_eq!(scorer().score(&shelf, None, None).axiom_synergy, 1.0);

        let mut quandle = catalog::magma();
        quandle.axioms.push(Axiom::new(
            AxiomKind::Idempotence,
            make_idempotent("mul"),
            vec!["mul"],
        ));
        quandle.axioms.push(Axiom::new(
            AxiomKind::SelfDistributivity,
            make_self_distrib("mul"),
            vec!["mul"],
        ));
        assert_eq!(scorer().score(&quandle, None, None).axiom_synergy, 0.9);

        assert_eq!(scorer().score(&catalog::semigroup(), None, None).axiom_synergy, 0.0);
    }

    #[test]
    fn has_models_trichotomy() {
        let sig = catalog::semigroup();
        let full = spectrum_with(&[(2, 1), (3, 2)], &[]);
        assert_eq!(scorer().score(&sig, Some(&full), None).has_models, 1.0);

        let inconclusive = spectrum_with(&[(2, 0), (3, 0)], &[3]);
        assert_eq!(scorer().score(&sig, Some(&inconclusive), None).has_models, 0.5);

        let empty = spectrum_with(&[(2, 0), (3, 0)], &[]);
        assert_eq!(scorer().score(&sig, Some(&empty), None).has_models, 0.0);

        assert_eq!(scorer().score(&sig, None, None).has_models, 0.0);
    }

    #[test]
    fn spectrum_pattern_tiers() {
        let sig = catalog::semigroup();
        let primes = spectrum_with(&[(2, 1), (3, 1), (4, 0), (5, 1), (7, 1)], &[]);
        assert_eq!(scorer().score(&sig, Some(&primes), None).spectrum_pattern, 0.9);

        let pow2 = spectrum_with(&[(2, 1), (4, 1), (8, 1)], &[]);
        assert_eq!(scorer().score(&sig, Some(&pow2), None).spectrum_pattern, 0.8);

        let arithmetic = spectrum_with(&[(2, 1), (5, 1), (8, 1)], &[]);
        assert_eq!(scorer().score(&sig, Some(&arithmetic), None).spectrum_pattern, 0.7);

        let monotone = spectrum_with(&[(2, 1), (3, 2), (6, 5)], &[]);
        assert_eq!(scorer().score(&sig, Some(&monotone), None).spectrum_pattern, 0.5);

        let lone = spectrum_with(&[(4, 3)], &[]);
        assert_eq!(scorer().score(&sig, Some(&lone), None).spectrum_pattern, 0.0);
    }

    #[test]
    fn solver_difficulty_penalties() {
        let sig = catalog::semigroup();
        let clean = spectrum_with(&[(2, 1), (3, 2), (4, 5)], &[]);
        assert_eq!(scorer().score(&sig, Some(&clean), None).solver_difficulty, 1.0);

        let all_timed_out = spectrum_with(&[(2, 0), (3, 0)], &[2, 3]);
        assert_eq!(
            scorer().score(&sig, Some(&all_timed_out), None).solver_difficulty,
            0.0
        );

        let flat = spectrum_with(&[(2, 5), (3, 5), (4, 5)], &[]);
        assert!((scorer().score(&sig, Some(&flat), None).solver_difficulty - 0.7).abs() < 1e-9);

        let partial = spectrum_with(&[(2, 1), (3, 2), (4, 0), (5, 0)], &[4, 5]);
        let d = scorer().score(&sig, Some(&partial), None).solver_difficulty;
        assert!(d > 0.0 && d < 1.0);
    }

    #[test]
    fn novelty_against_known_set() {
        let sig = catalog::group();
        let empty: HashSet<String> = HashSet::new();
        assert_eq!(scorer().score(&sig, None, Some(&empty)).is_novel, 1.0);

        let known: HashSet<String> = [sig.fingerprint()].into_iter().collect();
        assert_eq!(scorer().score(&sig, None, Some(&known)).is_novel, 0.0);
    }

    #[test]
    fn distance_reads_the_chain() {
        let mut sig = catalog::group();
        assert_eq!(scorer().score(&sig, None, None).distance, 0.0);

        sig.derivation_chain = vec![
            "Dualize(mul)".to_string(),
            "Quotient(IDEM on mul)".to_string(),
        ];
        let d = scorer().score(&sig, None, None).distance;
        // length 2/5 = 0.4, diversity 2/8 = 0.25 → 0.325
        assert!((d - 0.325).abs() < 1e-9);
    }

    #[test]
    fn total_is_the_weighted_sum() {
        let sig = catalog::ring();
        let spectrum = spectrum_with(&[(2, 1), (3, 1), (4, 2)], &[]);
        let known: HashSet<String> = HashSet::new();
        let b = scorer().score(&sig, Some(&spectrum), Some(&known));

        let w = Weights::default();
        let expected = w.connectivity * b.connectivity
            + w.richness * b.richness
            + w.tension * b.tension
            + w.economy * b.economy
            + w.fertility * b.fertility
            + w.axiom_synergy * b.axiom_synergy
            + w.has_models * b.has_models
            + w.model_diversity * b.model_diversity
            + w.spectrum_pattern * b.spectrum_pattern
            + w.solver_difficulty * b.solver_difficulty
            + w.is_novel * b.is_novel
            + w.distance * b.distance;
        assert!((b.total - expected).abs() < 1e-12);
        assert!(b.total >= 0.0 && b.total <= 1.0);
    }
}
