//! The proving boundary.
//!
//! Equational conjectures about a signature ("do these axioms imply
//! commutativity?") are delegated to an external first-order prover. The
//! core fixes only the interface: a status taxonomy, a [`Prover`] trait, and
//! the LADR-format rendering such tools consume. `Disproved` means the
//! prover exhausted its search space, not that a counter-model exists; a
//! counter-model requires running the model finder on the negated conjecture.

use std::fmt;
use std::time::Duration;

use crate::ast::{Equation, Expr};
use crate::signature::Signature;

/// Outcome of a proof attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofStatus {
    Proved,
    Disproved,
    Timeout,
    Error,
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProofStatus::Proved => "proved",
            ProofStatus::Disproved => "disproved",
            ProofStatus::Timeout => "timeout",
            ProofStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Result of a proof attempt, with whatever text the backend produced.
#[derive(Clone, Debug)]
pub struct ProofResult {
    pub status: ProofStatus,
    /// Rendering of the conjecture that was attempted.
    pub conjecture: String,
    pub proof_text: String,
    pub elapsed: Duration,
}

impl ProofResult {
    pub fn error(conjecture: &Equation, message: impl Into<String>) -> Self {
        Self {
            status: ProofStatus::Error,
            conjecture: conjecture.to_string(),
            proof_text: message.into(),
            elapsed: Duration::ZERO,
        }
    }
}

/// An external theorem-proving backend.
pub trait Prover {
    /// Attempt to prove that the axioms of `sig` imply `conjecture`.
    fn prove(&self, sig: &Signature, conjecture: &Equation, timeout: Duration) -> ProofResult;

    fn is_available(&self) -> bool;
}

/// The default backend when no prover is configured: every attempt reports
/// `Error`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProver;

impl Prover for NullProver {
    fn prove(&self, _sig: &Signature, conjecture: &Equation, _timeout: Duration) -> ProofResult {
        ProofResult::error(conjecture, "no prover configured")
    }

    fn is_available(&self) -> bool {
        false
    }
}

// ============================================================================
// LADR RENDERING
// ============================================================================

/// Render a signature's axioms (and an optional goal) as an LADR input file,
/// the format the Prover9/Mace4 tool family reads.
pub fn ladr_input(sig: &Signature, goal: Option<&Equation>) -> String {
    let mut lines = vec![format!("% Signature: {}", sig.name), String::new()];

    lines.push("formulas(assumptions).".to_string());
    lines.push(String::new());
    for axiom in &sig.axioms {
        let comment = if axiom.description.is_empty() {
            axiom.kind.as_str().to_string()
        } else {
            axiom.description.clone()
        };
        lines.push(format!("  % {}", comment));
        lines.push(format!("  {}.", ladr_equation(&axiom.equation)));
        lines.push(String::new());
    }
    lines.push("end_of_list.".to_string());

    if let Some(goal) = goal {
        lines.push(String::new());
        lines.push("formulas(goals).".to_string());
        lines.push(String::new());
        lines.push(format!("  {}.", ladr_equation(goal)));
        lines.push(String::new());
        lines.push("end_of_list.".to_string());
    }

    lines.join("\n")
}

fn ladr_equation(eq: &Equation) -> String {
    format!("{} = {}", ladr_expr(&eq.lhs), ladr_expr(&eq.rhs))
}

/// LADR terms are uniformly prefix: `mul(x,y)`, constants bare.
fn ladr_expr(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) | Expr::Const(name) => name.clone(),
        Expr::App { op, args } => {
            if args.is_empty() {
                op.clone()
            } else {
                let rendered: Vec<String> = args.iter().map(ladr_expr).collect();
                format!("{}({})", op, rendered.join(","))
            }
        }
    }
}
