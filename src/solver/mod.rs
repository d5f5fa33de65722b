//! Finite-model finding for algebraic signatures.
//!
//! The finder collapses every sort to the integer domain `[0, n)`, encodes
//! each operation as a table of bounded cell variables, grounds every
//! universally closed axiom over all `n^k` variable assignments, and runs a
//! bounded backtracking search over the resulting constraint system. Found
//! models come back as [`CayleyTable`]s; a spectrum aggregates results over
//! a size range, distinguishing "proven empty" from "timed out".
//!
//! The search never leaves the process: there is no external solver to
//! install or babysit. The encoding layer is kept separate so that a
//! stronger backend can be routed to behind [`router::ModelBackend`].

pub mod encode;
pub mod router;
pub mod search;
pub mod verify;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cayley::CayleyTable;
use crate::signature::Signature;

use encode::Encoding;
use search::{SearchOutcome, Searcher};

/// Cooperative cancellation flag, checked between solver calls and between
/// search nodes. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a single-size model search.
#[derive(Clone, Debug)]
pub struct FinderResult {
    pub domain_size: usize,
    pub models: Vec<CayleyTable>,
    /// The search hit its deadline (or was cancelled) before exhausting the
    /// space; any models already collected are still present.
    pub timed_out: bool,
    /// Set when the signature could not be encoded or solved at all.
    pub error: Option<String>,
}

impl FinderResult {
    fn errored(domain_size: usize, error: String) -> Self {
        Self {
            domain_size,
            models: Vec::new(),
            timed_out: false,
            error: Some(error),
        }
    }
}

/// The model spectrum of a signature over a size range: how many models were
/// found at each size, the tables themselves, and which sizes are
/// inconclusive (timed out) rather than proven empty.
#[derive(Clone, Debug, Default)]
pub struct ModelSpectrum {
    pub signature_name: String,
    /// Size → number of models found. Iteration is ascending by size.
    pub counts: BTreeMap<usize, usize>,
    pub models_by_size: BTreeMap<usize, Vec<CayleyTable>>,
    pub timed_out_sizes: Vec<usize>,
    /// Size → error string for sizes where encoding/solving failed.
    pub errors: BTreeMap<usize, String>,
}

impl ModelSpectrum {
    pub fn new(signature_name: impl Into<String>) -> Self {
        Self {
            signature_name: signature_name.into(),
            ..Default::default()
        }
    }

    /// Sizes with at least one model, ascending.
    pub fn sizes_with_models(&self) -> Vec<usize> {
        self.counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&size, _)| size)
            .collect()
    }

    pub fn total_models(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_models() == 0
    }

    pub fn any_timed_out(&self) -> bool {
        !self.timed_out_sizes.is_empty()
    }
}

impl std::fmt::Display for ModelSpectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spectrum({}: {{", self.signature_name)?;
        for (i, size) in self.sizes_with_models().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", size, self.counts[size])?;
        }
        write!(f, "}})")
    }
}

/// The native finite-model finder.
#[derive(Clone, Debug, Default)]
pub struct ModelFinder {
    cancel: CancelToken,
}

impl ModelFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Search for up to `max_models` distinct models of `sig` at
    /// `domain_size`, within `timeout`.
    pub fn find_models(
        &self,
        sig: &Signature,
        domain_size: usize,
        max_models: usize,
        timeout: Duration,
    ) -> FinderResult {
        if let Err(err) = sig.validate() {
            return FinderResult::errored(domain_size, format!("malformed signature: {}", err));
        }
        let symmetry_break = router::is_heavy(sig);
        let encoding = match Encoding::build(sig, domain_size, symmetry_break) {
            Ok(encoding) => encoding,
            Err(err) => return FinderResult::errored(domain_size, err.to_string()),
        };

        let deadline = Instant::now() + timeout;
        let outcome = Searcher::new(&encoding)
            .with_deadline(deadline)
            .with_cancel(self.cancel.clone())
            .enumerate(max_models);

        let (assignments, timed_out) = match outcome {
            SearchOutcome::Exhausted(models) => (models, false),
            SearchOutcome::Capped(models) => (models, false),
            SearchOutcome::TimedOut(models) => (models, true),
        };
        if timed_out {
            debug!(
                signature = %sig.name,
                size = domain_size,
                collected = assignments.len(),
                "model search timed out"
            );
        }

        FinderResult {
            domain_size,
            models: assignments
                .iter()
                .map(|a| encoding.extract(a))
                .collect(),
            timed_out,
            error: None,
        }
    }

    /// Assemble the model spectrum over `[min_size, max_size]`, with a
    /// per-call timeout. Cancellation stops between sizes; results gathered
    /// so far are returned.
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
