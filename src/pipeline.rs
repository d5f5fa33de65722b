//! The exploration pipeline: iterative deepening plus two-phase scoring.
//!
//! Depth-2 over the full seed catalog yields on the order of 10⁵
//! candidates, while model checking a single candidate is exponential in
//! the domain size. Scoring therefore happens in two phases: a cheap
//! structural pass over everything, then model checking only the top-N
//! survivors and re-scoring them with their spectra.
//!
//! The driver is deterministic for a given input ordering. Model checking
//! over the top-N is embarrassingly parallel; a worker pool runs only when
//! the caller supplies a worker count.

use std::collections::HashSet;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::moves::{MoveEngine, MoveKind, MoveResult};
use crate::score::{ScoreBreakdown, ScoringEngine};
use crate::signature::Signature;
use crate::solver::router::SolverRouter;
use crate::solver::{CancelToken, ModelSpectrum};

/// Knobs for one exploration run.
#[derive(Clone, Debug)]
pub struct ExploreConfig {
    /// Iterative-deepening depth.
    pub depth: usize,
    /// Restrict to these moves; `None` applies all eight.
    pub allowed_moves: Option<Vec<MoveKind>>,
    /// Drop candidates whose structural score falls below this.
    pub threshold: f64,
    /// How many candidates (by structural score) get model-checked.
    pub top_n: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub max_models_per_size: usize,
    pub timeout_per_call: Duration,
    /// Skip the model-checking phase entirely when false.
    pub check_models: bool,
    /// Worker pool size for the model-checking phase; `None` or `Some(1)`
    /// runs sequentially.
    pub workers: Option<usize>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            allowed_moves: None,
            threshold: 0.0,
            top_n: 20,
            min_size: 2,
            max_size: 6,
            max_models_per_size: 10,
            timeout_per_call: Duration::from_secs(30),
            check_models: true,
            workers: None,
        }
    }
}

/// One explored candidate with both scoring phases.
#[derive(Clone, Debug)]
pub struct RankedCandidate {
    pub result: MoveResult,
    /// Phase-one score (no spectrum).
    pub structural: ScoreBreakdown,
    /// Present only for candidates that reached the model-checking phase.
    pub spectrum: Option<ModelSpectrum>,
    /// The score the ranking uses: spectrum-augmented when available,
    /// otherwise the structural score.
    pub score: ScoreBreakdown,
}

/// The exploration driver.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    engine: MoveEngine,
    scorer: ScoringEngine,
    cancel: CancelToken,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            engine: MoveEngine::new(),
            scorer: ScoringEngine::new(),
            cancel,
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Iterative deepening: apply the (allowed) moves to the frontier,
    /// emit every result, and feed the produced signatures back in.
    pub fn enumerate(
        &self,
        seeds: &[Signature],
        depth: usize,
        allowed_moves: Option<&[MoveKind]>,
    ) -> Vec<MoveResult> {
        let mut frontier: Vec<Signature> = seeds.to_vec();
        let mut all = Vec::new();

        for d in 0..depth {
            if self.cancel.is_cancelled() {
                warn!("enumeration cancelled at depth {}", d + 1);
                break;
            }
            let results = match allowed_moves {
                Some(kinds) => kinds
                    .iter()
                    .flat_map(|&kind| self.engine.apply_move(kind, &frontier))
                    .collect::<Vec<_>>(),
                None => self.engine.apply_all(&frontier),
            };
            debug!(depth = d + 1, candidates = results.len(), "depth complete");
            frontier = results.iter().map(|r| r.signature.clone()).collect();
            all.extend(results);
        }

        all
    }

    /// Full two-phase exploration over the seeds.
    pub fn explore(
        &self,
        seeds: &[Signature],
        config: &ExploreConfig,
        known_fingerprints: &HashSet<String>,
    ) -> Vec<RankedCandidate> {
        let results = self.enumerate(seeds, config.depth, config.allowed_moves.as_deref());
        debug!(total = results.len(), "enumeration finished");

        // Phase one: structural scores, threshold, rank.
        let mut ranked: Vec<RankedCandidate> = results
            .into_iter()
            .map(|result| {
                let structural =
                    self.scorer
                        .score(&result.signature, None, Some(known_fingerprints));
                RankedCandidate {
                    score: structural.clone(),
                    structural,
                    spectrum: None,
                    result,
                }
            })
            .filter(|c| c.structural.total >= config.threshold)
            .collect();
        sort_ranked(&mut ranked);
        debug!(surviving = ranked.len(), "structural phase complete");

        // Phase two: model-check the top-N and re-score with spectra.
        if config.check_models {
            let check_count = ranked.len().min(config.top_n);
            let spectra = self.compute_spectra(&ranked[..check_count], config);
            for (candidate, spectrum) in ranked.iter_mut().zip(spectra) {
                let Some(spectrum) = spectrum else { continue };
                candidate.score = self.scorer.score(
                    &candidate.result.signature,
                    Some(&spectrum),
                    Some(known_fingerprints),
                );
                candidate.spectrum = Some(spectrum);
            }
            sort_ranked(&mut ranked);
        }

        ranked
    }

    fn compute_spectra(
        &self,
        candidates: &[RankedCandidate],
        config: &ExploreConfig,
    ) -> Vec<Option<ModelSpectrum>> {
        let spectrum_of = |candidate: &RankedCandidate| -> Option<ModelSpectrum> {
            if self.cancel.is_cancelled() {
                return None;
            }
            // Each worker owns its router (and thereby its solver state).
            let router = SolverRouter::with_cancel(self.cancel.clone());
            Some(router.compute_spectrum(
                &candidate.result.signature,
                config.min_size,
                config.max_size,
                config.max_models_per_size,
                config.timeout_per_call,
            ))
        };

        match config.workers {
            Some(workers) if workers > 1 && candidates.len() > 1 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers.min(candidates.len()))
                    .build();
                match pool {
                    Ok(pool) => {
                        debug!(workers, "model-checking in parallel");
                        pool.install(|| candidates.par_iter().map(spectrum_of).collect())
                    }
                    Err(err) => {
                        warn!(%err, "worker pool unavailable, falling back to sequential");
                        candidates.iter().map(spectrum_of).collect()
                    }
                }
            }
            _ => candidates.iter().map(spectrum_of).collect(),
        }
    }
}

/// Descending by score; candidate name breaks ties so runs are reproducible.
fn sort_ranked(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.result.signature.name.cmp(&b.result.signature.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn quick_config() -> ExploreConfig {
        ExploreConfig {
            depth: 1,
            top_n: 3,
            min_size: 2,
            max_size: 3,
            max_models_per_size: 3,
            timeout_per_call: Duration::from_secs(5),
            ..Default::default()
        }
    }

    #[test]
    fn enumerate_deepens() {
        let pipeline = Pipeline::new();
        let seeds = vec![catalog::magma()];
        let depth1 = pipeline.enumerate(&seeds, 1, None);
        let depth2 = pipeline.enumerate(&seeds, 2, None);
        assert!(!depth1.is_empty());
        assert!(depth2.len() > depth1.len());
    }

    #[test]
    fn enumerate_respects_allowed_moves() {
        let pipeline = Pipeline::new();
        let seeds = vec![catalog::semigroup(), catalog::monoid()];
        let only_quotient = pipeline.enumerate(&seeds, 1, Some(&[MoveKind::Quotient]));
        assert!(!only_quotient.is_empty());
        assert!(only_quotient.iter().all(|r| r.kind == MoveKind::Quotient));
    }

    #[test]
    fn explore_ranks_and_checks_top_candidates() {
        let pipeline = Pipeline::new();
        let seeds = vec![catalog::semigroup()];
        let known: HashSet<String> =
            catalog::all().iter().map(|s| s.fingerprint()).collect();
        let ranked = pipeline.explore(&seeds, &quick_config(), &known);

        assert!(!ranked.is_empty());
        let with_spectra = ranked.iter().filter(|c| c.spectrum.is_some()).count();
        assert!(with_spectra > 0 && with_spectra <= 3);
        for window in ranked.windows(2) {
            assert!(window[0].score.total >= window[1].score.total);
        }
        for candidate in &ranked {
            if candidate.spectrum.is_none() {
                assert_eq!(candidate.score.has_models, 0.0);
            }
        }
    }

    #[test]
    fn explore_is_deterministic() {
        let pipeline = Pipeline::new();
        let seeds = vec![catalog::semigroup(), catalog::monoid()];
        let known = HashSet::new();
        let config = ExploreConfig {
            check_models: false,
            ..quick_config()
        };
        let a = pipeline.explore(&seeds, &config, &known);
        let b = pipeline.explore(&seeds, &config, &known);
        let names = |ranked: &[RankedCandidate]| -> Vec<String> {
            ranked
                .iter()
                .map(|c| c.result.signature.name.clone())
                .collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn cancelled_pipeline_stops_early() {
        let pipeline = Pipeline::new();
        pipeline.cancel_token().cancel();
        let ranked = pipeline.explore(
            &[catalog::semigroup()],
            &quick_config(),
            &HashSet::new(),
        );
        assert!(ranked.is_empty());
    }
}
