//! Ground-constraint encoding of a signature at a fixed domain size.
//!
//! Every sort collapses to `[0, n)`. Operations become tables of bounded
//! cell variables: one variable for a constant, `n` for a unary operation,
//! `n × n` for a binary one. Each axiom, universally closed over its free
//! variables, expands into `n^k` ground equations between [`Term`]s.
//!
//! A ground term indexes a table either with concrete values (a direct cell
//! reference) or with the value of another term (a symbolic lookup, the
//! conditional-chain of SMT encodings): `lookup(t, i)` branches over every
//! cell of `t` on the yet-unknown value of `i`.

use std::collections::HashMap;
use std::fmt;

use crate::ast::Expr;
use crate::cayley::CayleyTable;
use crate::signature::Signature;

/// Index of a table-cell variable in the flat variable space.
pub type VarId = usize;

/// A ground term over the cell variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    /// A concrete domain element.
    Lit(usize),
    /// A table cell (or constant variable) addressed directly.
    Cell(VarId),
    /// Unary-table lookup with a symbolic index: resolves to the cell
    /// `base + i` once the index term evaluates to `i`.
    Lookup1 { base: VarId, idx: Box<Term> },
    /// Binary-table lookup with at least one symbolic index: resolves to
    /// `base + row * n + col`.
    Lookup2 {
        base: VarId,
        row: Box<Term>,
        col: Box<Term>,
    },
}

/// A ground equation `lhs = rhs` asserted over the cell variables.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub lhs: Term,
    pub rhs: Term,
    /// Index of the axiom this instance came from.
    pub axiom: usize,
}

/// An operation's slice of the variable space.
#[derive(Clone, Debug)]
pub struct EncodedOp {
    pub name: String,
    pub arity: usize,
    pub base: VarId,
}

/// The complete ground encoding of one (signature, size) pair.
#[derive(Clone, Debug)]
pub struct Encoding {
    pub n: usize,
    pub num_vars: usize,
    pub ops: Vec<EncodedOp>,
    pub constraints: Vec<Constraint>,
    /// Lex-leader pairs `(a, b)` asserting `value(a) ≤ value(b)`, used for
    /// symmetry breaking on heavy signatures.
    pub lex_pairs: Vec<(VarId, VarId)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The domain must have at least one element.
    EmptyDomain,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EmptyDomain => write!(f, "domain size must be at least 1"),
        }
    }
}

impl std::error::Error for EncodeError {}

impl Encoding {
    /// Encode `sig` at domain size `n`. With `symmetry_break`, the first row
    /// of the first binary operation's table is constrained non-decreasing,
    /// canonicalizing one representative per element-permutation class.
    ///
    /// Operations of arity greater than two get no table; axioms touching
    /// them contribute no constraints (they are beyond the encodable
    /// fragment and are treated as unconstrained).
    pub fn build(sig: &Signature, n: usize, symmetry_break: bool) -> Result<Self, EncodeError> {
        if n == 0 {
            return Err(EncodeError::EmptyDomain);
        }

        // Constants first, then binary tables, then unary: identity and
        // inverse constraints bite earliest this way during search.
        let mut ops = Vec::new();
        let mut next_var = 0;
        for wanted_arity in [0usize, 2, 1] {
            for op in &sig.operations {
                if op.arity() != wanted_arity {
                    continue;
                }
                let cells = match wanted_arity {
                    0 => 1,
                    1 => n,
                    2 => n * n,
                    _ => unreachable!(),
                };
                ops.push(EncodedOp {
                    name: op.name.clone(),
                    arity: wanted_arity,
                    base: next_var,
                });
                next_var += cells;
            }
        }

        let bases: HashMap<&str, (usize, VarId)> = ops
            .iter()
            .map(|op| (op.name.as_str(), (op.arity, op.base)))
            .collect();

        let mut constraints = Vec::new();
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
                let lhs = encode_term(&axiom.equation.lhs, &env, &bases, n);
                let rhs = encode_term(&axiom.equation.rhs, &env, &bases, n);
                if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
                    constraints.push(Constraint {
                        lhs,
                        rhs,
                        axiom: axiom_idx,
                    });
                }
            }
        }

        let mut lex_pairs = Vec::new();
        if symmetry_break {
            if let Some(first_binary) = ops.iter().find(|op| op.arity == 2) {
                // t[0][0] ≤ t[0][1] ≤ ... ≤ t[0][n-1]
                for j in 0..n.saturating_sub(1) {
                    lex_pairs.push((first_binary.base + j, first_binary.base + j + 1));
                }
            }
        }

        Ok(Encoding {
            n,
            num_vars: next_var,
            ops,
            constraints,
            lex_pairs,
        })
    }

    /// Read a complete assignment back into a Cayley table.
    pub fn extract(&self, assignment: &[usize]) -> CayleyTable {
        let n = self.n;
        let mut table = CayleyTable::new(n);
        for op in &self.ops {
            match op.arity {
                0 => {
                    table.constants.insert(op.name.clone(), assignment[op.base]);
                }
                1 => {
                    table
                        .unary
                        .insert(op.name.clone(), assignment[op.base..op.base + n].to_vec());
                }
                2 => {
                    let rows: Vec<Vec<usize>> = (0..n)
                        .map(|i| assignment[op.base + i * n..op.base + (i + 1) * n].to_vec())
                        .collect();
                    table.binary.insert(op.name.clone(), rows);
                }
                _ => {}
            }
        }
        table
    }
}

fn encode_term(
    expr: &Expr,
    env: &HashMap<&str, usize>,
    bases: &HashMap<&str, (usize, VarId)>,
    n: usize,
) -> Option<Term> {
    match expr {
        Expr::Var(name) => env.get(name.as_str()).map(|&v| Term::Lit(v)),
        Expr::Const(name) => bases
            .get(name.as_str())
            .filter(|(arity, _)| *arity == 0)
            .map(|&(_, base)| Term::Cell(base)),
        Expr::App { op, args } => {
            let &(arity, base) = bases.get(op.as_str())?;
            if arity != args.len() {
                return None;
            }
            match args.as_slice() {
                [] => Some(Term::Cell(base)),
                [arg] => {
                    let idx = encode_term(arg, env, bases, n)?;
                    Some(match idx {
                        Term::Lit(i) => Term::Cell(base + i),
                        symbolic => Term::Lookup1 {
                            base,
                            idx: Box::new(symbolic),
                        },
                    })
                }
                [row, col] => {
                    let row = encode_term(row, env, bases, n)?;
                    let col = encode_term(col, env, bases, n)?;
                    Some(match (row, col) {
                        (Term::Lit(i), Term::Lit(j)) => Term::Cell(base + i * n + j),
                        (row, col) => Term::Lookup2 {
                            base,
                            row: Box::new(row),
                            col: Box::new(col),
                        },
                    })
                }
                _ => None,
            }
        }
    }
}

/// Collect every variable a term can touch: direct cells, plus every cell
/// of a table addressed through a symbolic lookup (the chain branches over
/// the whole table until the index is known).
pub fn term_support(term: &Term, n: usize, out: &mut Vec<VarId>) {
    match term {
        Term::Lit(_) => {}
        Term::Cell(id) => out.push(*id),
        Term::Lookup1 { base, idx } => {
            out.extend(*base..*base + n);
            term_support(idx, n, out);
        }
        Term::Lookup2 { base, row, col } => {
            out.extend(*base..*base + n * n);
            term_support(row, n, out);
            term_support(col, n, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn variable_counts_per_arity() {
        let enc = Encoding::build(&catalog::group(), 3, false).unwrap();
        // e (1) + mul (9) + inv (3)
        assert_eq!(enc.num_vars, 13);
        assert_eq!(enc.ops.len(), 3);
        assert_eq!(enc.ops[0].name, "e");
        assert_eq!(enc.ops[1].name, "mul");
        assert_eq!(enc.ops[2].name, "inv");
    }

    #[test]
    fn associativity_grounds_to_n_cubed_instances() {
        let enc = Encoding::build(&catalog::semigroup(), 3, false).unwrap();
        assert_eq!(enc.constraints.len(), 27);
    }

    #[test]
    fn nested_application_becomes_symbolic_lookup() {
        let enc = Encoding::build(&catalog::semigroup(), 2, false).unwrap();
        // (x mul y) mul z: the outer application's row index is the inner
        // cell, which is never a literal.
        assert!(enc
            .constraints
            .iter()
            .any(|c| matches!(c.lhs, Term::Lookup2 { .. })));
    }

    #[test]
    fn zero_size_domain_is_rejected() {
        assert_eq!(
            Encoding::build(&catalog::magma(), 0, false).unwrap_err(),
            EncodeError::EmptyDomain
        );
    }

    #[test]
    fn lex_pairs_only_when_requested() {
        let plain = Encoding::build(&catalog::semigroup(), 4, false).unwrap();
        assert!(plain.lex_pairs.is_empty());
        let broken = Encoding::build(&catalog::semigroup(), 4, true).unwrap();
        assert_eq!(broken.lex_pairs.len(), 3);
    }
}
