//! Post-hoc verification of found models.
//!
//! Re-evaluates every axiom's ground instantiation directly against a
//! model's tables, independently of the constraint encoding. A model
//! reported by the finder must come back clean here.

use std::collections::HashMap;
use std::fmt;

use crate::ast::Expr;
use crate::cayley::CayleyTable;
use crate::signature::Signature;

use super::ModelSpectrum;

/// A ground instance on which an axiom failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Index into the signature's axiom list.
    pub axiom: usize,
    /// Variable assignment of the failing instance.
    pub assignment: Vec<(String, usize)>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axiom #{} fails at [", self.axiom)?;
        for (i, (name, value)) in self.assignment.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "]")
    }
}

/// Check every axiom of `sig` over all ground instances of `model`.
///
/// Axioms outside the encodable fragment (touching operations of arity
/// three or more) are skipped, mirroring the encoder.
pub fn verify_model(sig: &Signature, model: &CayleyTable) -> Vec<Violation> {
    let n = model.size;
    let mut violations = Vec::new();

    for (axiom_idx, axiom) in sig.axioms.iter().enumerate() {
        let vars: Vec<String> = axiom.equation.variables().into_iter().collect();
        let k = vars.len();
        let instances = n.pow(k as u32);
        let mut env: HashMap<&str, usize> = HashMap::with_capacity(k);
        for instance in 0..instances {
            let mut rest = instance;
            for name in &vars {
                env.insert(name.as_str(), rest % n);
                rest /= n;
            }
            let lhs = eval_ground(&axiom.equation.lhs, &env, model);
            let rhs = eval_ground(&axiom.equation.rhs, &env, model);
            if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
                if lhs != rhs {
                    violations.push(Violation {
                        axiom: axiom_idx,
                        assignment: vars
                            .iter()
                            .map(|name| (name.clone(), env[name.as_str()]))
                            .collect(),
                    });
                }
            }
        }
    }

    violations
}

/// Does the model satisfy every (encodable) axiom of the signature?
pub fn model_satisfies(sig: &Signature, model: &CayleyTable) -> bool {
    verify_model(sig, model).is_empty()
}

/// Verify every model of a spectrum; returns `(size, model_index, violation)`
/// triples, empty when the whole spectrum checks out.
pub fn verify_spectrum(sig: &Signature, spectrum: &ModelSpectrum) -> Vec<(usize, usize, Violation)> {
    let mut failures = Vec::new();
    for (&size, models) in &spectrum.models_by_size {
        for (model_idx, model) in models.iter().enumerate() {
            for violation in verify_model(sig, model) {
                failures.push((size, model_idx, violation));
            }
        }
    }
    failures
}

fn eval_ground(expr: &Expr, env: &HashMap<&str, usize>, model: &CayleyTable) -> Option<usize> {
    match expr {
        Expr::Var(name) => env.get(name.as_str()).copied(),
        Expr::Const(name) => model.constants.get(name).copied(),
        Expr::App { op, args } => match args.as_slice() {
            [] => model.constants.get(op).copied(),
            [arg] => {
                let i = eval_ground(arg, env, model)?;
                model.unary.get(op).map(|t| t[i])
            }
            [row, col] => {
                let i = eval_ground(row, env, model)?;
                let j = eval_ground(col, env, model)?;
                model.binary.get(op).map(|t| t[i][j])
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::solver::ModelFinder;
    use std::time::Duration;

    #[test]
    fn found_group_models_verify() {
        let sig = catalog::group();
        let finder = ModelFinder::new();
        let spectrum = finder.compute_spectrum(&sig, 2, 3, 5, Duration::from_secs(10));
        assert!(!spectrum.is_empty());
        assert!(verify_spectrum(&sig, &spectrum).is_empty());
    }

    #[test]
    fn corrupted_model_is_rejected() {
        let sig = catalog::group();
        let finder = ModelFinder::new();
        let result = finder.find_models(&sig, 3, 1, Duration::from_secs(10));
        let mut model = result.models[0].clone();
        // Break one cell of the multiplication table.
        let table = model.binary.get_mut("mul").unwrap();
        table[0][0] = (table[0][0] + 1) % 3;
        assert!(!model_satisfies(&sig, &model));
    }
}
