//! Backend routing for model finding.
//!
//! Heavy signatures, those whose equational axioms expand to O(n³) ground
//! constraints, get special treatment: a stronger external backend when one
//! is registered, otherwise the symmetry-broken native search with an
//! extended timeout. Everything else goes straight to the native search.

use std::time::Duration;

use tracing::debug;

use crate::signature::{AxiomKind, Signature};

use super::{CancelToken, FinderResult, ModelFinder, ModelSpectrum};

/// Axiom kinds whose ground expansion is cubic in the domain size.
pub const HEAVY_AXIOM_KINDS: [AxiomKind; 4] = [
    AxiomKind::SelfDistributivity,
    AxiomKind::RightSelfDistributivity,
    AxiomKind::Distributivity,
    AxiomKind::Jacobi,
];

/// A signature is heavy iff it is single-sorted, carries no CUSTOM axioms,
/// and has at least one cubic axiom kind.
///
/// The no-CUSTOM rule keeps lex-leader symmetry breaking off quasigroup-like
/// signatures, whose Latin-square axioms it would contradict.
pub fn is_heavy(sig: &Signature) -> bool {
    sig.sorts.len() <= 1
        && !sig.axioms.iter().any(|a| a.kind == AxiomKind::Custom)
        && sig
            .axioms
            .iter()
            .any(|a| HEAVY_AXIOM_KINDS.contains(&a.kind))
}

/// The capability a model-finding backend must provide.
pub trait ModelBackend: Send + Sync {
    fn find_models(
        &self,
        sig: &Signature,
        domain_size: usize,
        max_models: usize,
        timeout: Duration,
    ) -> FinderResult;

    fn is_available(&self) -> bool;

    fn name(&self) -> &str;
}

impl ModelBackend for ModelFinder {
    fn find_models(
        &self,
        sig: &Signature,
        domain_size: usize,
        max_models: usize,
        timeout: Duration,
    ) -> FinderResult {
        ModelFinder::find_models(self, sig, domain_size, max_models, timeout)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "ground"
    }
}

/// Where a signature was routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Heavy signature, dedicated backend registered.
    HeavyBackend,
    /// Heavy signature, native search with extended timeout.
    HeavyExtended,
    /// Everything else.
    Standard,
}

/// Routes model-finding calls to the best available backend.
pub struct SolverRouter {
    standard: ModelFinder,
    heavy: Option<Box<dyn ModelBackend>>,
    heavy_timeout_multiplier: f64,
    cancel: CancelToken,
}

impl Default for SolverRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverRouter {
    pub fn new() -> Self {
        Self {
            standard: ModelFinder::new(),
            heavy: None,
            heavy_timeout_multiplier: 2.0,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            standard: ModelFinder::with_cancel(cancel.clone()),
            heavy: None,
            heavy_timeout_multiplier: 2.0,
            cancel,
        }
    }

    /// Register a dedicated backend for heavy signatures.
    pub fn with_heavy_backend(mut self, backend: Box<dyn ModelBackend>) -> Self {
        self.heavy = Some(backend);
        self
    }

    pub fn with_heavy_timeout_multiplier(mut self, multiplier: f64) -> Self {
        self.heavy_timeout_multiplier = multiplier;
        self
    }

    /// At least one backend must answer.
    pub fn is_available(&self) -> bool {
        self.standard.is_available()
            || self.heavy.as_ref().map(|b| b.is_available()).unwrap_or(false)
    }

    pub fn classify(&self, sig: &Signature) -> Route {
        if is_heavy(sig) {
            if self.heavy.as_ref().map(|b| b.is_available()).unwrap_or(false) {
                Route::HeavyBackend
            } else {
                Route::HeavyExtended
            }
        } else {
            Route::Standard
        }
    }

    pub fn find_models(
        &self,
        sig: &Signature,
        domain_size: usize,
        max_models: usize,
        timeout: Duration,
    ) -> FinderResult {
        match self.classify(sig) {
            Route::HeavyBackend => {
                let backend = self.heavy.as_ref().expect("classified HeavyBackend");
                debug!(
                    signature = %sig.name,
                    size = domain_size,
                    backend = backend.name(),
                    "routing heavy signature to dedicated backend"
                );
                backend.find_models(sig, domain_size, max_models, timeout)
            }
            Route::HeavyExtended => {
                let extended = timeout.mul_f64(self.heavy_timeout_multiplier);
                debug!(
                    signature = %sig.name,
                    size = domain_size,
                    timeout_ms = extended.as_millis() as u64,
                    "routing heavy signature to symmetry-broken search with extended timeout"
                );
                self.standard
                    .find_models(sig, domain_size, max_models, extended)
            }
            Route::Standard => {
                debug!(signature = %sig.name, size = domain_size, "routing to standard search");
                self.standard
                    .find_models(sig, domain_size, max_models, timeout)
            }
        }
    }

    /// Spectrum assembly through the router, one routed call per size.
    pub fn compute_spectrum(
        &self,
        sig: &Signature,
        min_size: usize,
        max_size: usize,
        max_models_per_size: usize,
        timeout_per_call: Duration,
    ) -> ModelSpectrum {
        let mut spectrum = ModelSpectrum::new(sig.name.clone());

        for size in min_size..=max_size {
            if self.cancel.is_cancelled() {
                break;
            }
            let result = self.find_models(sig, size, max_models_per_size, timeout_per_call);
            spectrum.counts.insert(size, result.models.len());
            spectrum.models_by_size.insert(size, result.models);
            if result.timed_out {
                spectrum.timed_out_sizes.push(size);
            }
            if let Some(err) = result.error {
                spectrum.errors.insert(size, err);
            }
        }

        spectrum
    }
}
