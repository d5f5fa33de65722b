//! Scoring behavior over real pipeline artifacts.

use std::collections::HashSet;
use std::time::Duration;

use noether::catalog;
use noether::moves::MoveEngine;
use noether::score::{ScoringEngine, Weights};
use noether::solver::ModelFinder;

/// Without a spectrum the four model-theoretic dimensions are exactly zero,
/// capping the total near 0.60 even for a perfect structural+novelty
/// candidate.
#[test]
fn structural_ceiling_without_spectrum() {
    let scorer = ScoringEngine::new();
    let known: HashSet<String> = HashSet::new();
    let engine = MoveEngine::new();

    let mut seeds = catalog::all();
    seeds.extend(
        engine
            .apply_all(&catalog::all())
            .into_iter()
            .map(|r| r.signature),
    );

    for sig in &seeds {
        let b = scorer.score(sig, None, Some(&known));
        assert_eq!(b.has_models, 0.0);
        assert_eq!(b.model_diversity, 0.0);
        assert_eq!(b.spectrum_pattern, 0.0);
        assert_eq!(b.solver_difficulty, 0.0);
        assert!(
            b.total <= 0.60 + 1e-9,
            "{} exceeded the structural ceiling: {}",
            sig.name,
            b.total
        );
    }
}

/// A spectrum lifts the score of a structure with models.
#[test]
fn spectrum_lifts_the_score() {
    let scorer = ScoringEngine::new();
    let finder = ModelFinder::new();
    let sig = catalog::semigroup();
    let spectrum = finder.compute_spectrum(&sig, 2, 4, 5, Duration::from_secs(30));

    let without = scorer.score(&sig, None, None);
    let with = scorer.score(&sig, Some(&spectrum), None);
    assert!(with.total > without.total);
    assert_eq!(with.has_models, 1.0);
}

/// Seeds are not novel against the seed fingerprint set; a freshly derived
/// candidate with a new shape is.
#[test]
fn novelty_against_the_catalog() {
    let scorer = ScoringEngine::new();
    let known: HashSet<String> = catalog::all().iter().map(|s| s.fingerprint()).collect();

    for seed in catalog::all() {
        let b = scorer.score(&seed, None, Some(&known));
        assert_eq!(b.is_novel, 0.0, "{} should be known", seed.name);
    }

    let engine = MoveEngine::new();
    let internalized = &engine.internalize(&catalog::semigroup())[0].signature;
    let b = scorer.score(internalized, None, Some(&known));
    assert_eq!(b.is_novel, 1.0);
}

/// Rediscoveries collide with their seed: the monoid produced by COMPLETE
/// scores 0 on novelty.
#[test]
fn rediscovery_is_not_novel() {
    let scorer = ScoringEngine::new();
    let known: HashSet<String> = catalog::all().iter().map(|s| s.fingerprint()).collect();
    let engine = MoveEngine::new();

    let monoid_again = engine
        .complete(&catalog::semigroup())
        .into_iter()
        .find(|r| r.signature.fingerprint() == catalog::monoid().fingerprint())
        .expect("monoid rediscovery");
    let b = scorer.score(&monoid_again.signature, None, Some(&known));
    assert_eq!(b.is_novel, 0.0);
}

/// Custom weights change the total but every dimension stays put.
#[test]
fn custom_weights_reweight_the_total() {
    let mut weights = Weights::default();
    weights.is_novel = 0.0;
    weights.economy = 0.25;
    assert!((weights.sum() - 1.0).abs() < 1e-12);

    let default_scorer = ScoringEngine::new();
    let custom_scorer = ScoringEngine::with_weights(weights).unwrap();

    let sig = catalog::ring();
    let known: HashSet<String> = HashSet::new();
    let a = default_scorer.score(&sig, None, Some(&known));
    let b = custom_scorer.score(&sig, None, Some(&known));

    assert_eq!(a.economy, b.economy);
    assert_eq!(a.is_novel, b.is_novel);
    assert_ne!(a.total, b.total);
}
