//! Expression trees for equational axioms.
//!
//! Expressions are immutable: every transformation returns a fresh tree.
//! Variables carry no binders (axioms are implicitly universally closed),
//! so substitution is capture-free by construction.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;

/// A term over a signature: variables, named constants, and applications.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A universally quantified variable: `x`, `y`, `z`, ...
    Var(String),
    /// A named constant symbol: `e`, `zero`, ...
    Const(String),
    /// An operation applied to arguments: `mul(x, y)`, `inv(x)`, ...
    App { op: String, args: Vec<Expr> },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Expr::Const(name.into())
    }

    pub fn app(op: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::App {
            op: op.into(),
            args,
        }
    }

    /// Number of AST nodes in this expression.
    pub fn size(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 1,
            Expr::App { args, .. } => 1 + args.iter().map(Expr::size).sum::<usize>(),
        }
    }

    /// The set of free variable names, in sorted order.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::App { args, .. } => {
                for a in args {
                    a.collect_variables(out);
                }
            }
        }
    }

    /// Rewrite variables whose names appear in `mapping` to the mapped
    /// expression, recursing structurally through applications.
    pub fn substitute(&self, mapping: &HashMap<String, Expr>) -> Expr {
        match self {
            Expr::Var(name) => mapping.get(name).cloned().unwrap_or_else(|| self.clone()),
            Expr::Const(_) => self.clone(),
            Expr::App { op, args } => Expr::App {
                op: op.clone(),
                args: args.iter().map(|a| a.substitute(mapping)).collect(),
            },
        }
    }

    /// Rewrite operation and constant names through `renames`.
    ///
    /// Used when axioms are copied between signatures whose operations were
    /// renamed (e.g. the transfer move's `a_`/`b_` prefixes).
    pub fn rename_ops(&self, renames: &HashMap<String, String>) -> Expr {
        match self {
            Expr::Var(_) => self.clone(),
            Expr::Const(name) => match renames.get(name) {
                Some(new) => Expr::Const(new.clone()),
                None => self.clone(),
            },
            Expr::App { op, args } => Expr::App {
                op: renames.get(op).cloned().unwrap_or_else(|| op.clone()),
                args: args.iter().map(|a| a.rename_ops(renames)).collect(),
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) | Expr::Const(name) => write!(f, "{}", name),
            Expr::App { op, args } => match args.as_slice() {
                [lhs, rhs] => write!(f, "({} {} {})", lhs, op, rhs),
                [arg] => write!(f, "{}({})", op, arg),
                _ => {
                    write!(f, "{}(", op)?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ")")
                }
            },
        }
    }
}

/// An equation `lhs = rhs` between two terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    pub fn size(&self) -> usize {
        self.lhs.size() + self.rhs.size()
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = self.lhs.variables();
        out.extend(self.rhs.variables());
        out
    }

    pub fn substitute(&self, mapping: &HashMap<String, Expr>) -> Equation {
        Equation {
            lhs: self.lhs.substitute(mapping),
            rhs: self.rhs.substitute(mapping),
        }
    }

    pub fn rename_ops(&self, renames: &HashMap<String, String>) -> Equation {
        Equation {
            lhs: self.lhs.rename_ops(renames),
            rhs: self.rhs.rename_ops(renames),
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

// ============================================================================
// CANONICAL EQUATION BUILDERS
// ============================================================================

/// `(x op y) op z = x op (y op z)`
pub fn make_assoc(op: &str) -> Equation {
    let (x, y, z) = (Expr::var("x"), Expr::var("y"), Expr::var("z"));
    Equation::new(
        Expr::app(op, vec![Expr::app(op, vec![x.clone(), y.clone()]), z.clone()]),
        Expr::app(op, vec![x, Expr::app(op, vec![y, z])]),
    )
}

/// `x op y = y op x`
pub fn make_comm(op: &str) -> Equation {
    let (x, y) = (Expr::var("x"), Expr::var("y"));
    Equation::new(
        Expr::app(op, vec![x.clone(), y.clone()]),
        Expr::app(op, vec![y, x]),
    )
}

/// Right identity: `x op e = x`
pub fn make_identity(op: &str, id_name: &str) -> Equation {
    let x = Expr::var("x");
    Equation::new(
        Expr::app(op, vec![x.clone(), Expr::constant(id_name)]),
        x,
    )
}

/// Right inverse: `x op inv(x) = e`
pub fn make_inverse(op: &str, inv_name: &str, id_name: &str) -> Equation {
    let x = Expr::var("x");
    Equation::new(
        Expr::app(op, vec![x.clone(), Expr::app(inv_name, vec![x])]),
        Expr::constant(id_name),
    )
}

/// `x op x = x`
pub fn make_idempotent(op: &str) -> Equation {
    let x = Expr::var("x");
    Equation::new(Expr::app(op, vec![x.clone(), x.clone()]), x)
}

/// `x op y = neg(y op x)`. Requires a `neg` operation in the signature.
pub fn make_anticomm(op: &str) -> Equation {
    let (x, y) = (Expr::var("x"), Expr::var("y"));
    Equation::new(
        Expr::app(op, vec![x.clone(), y.clone()]),
        Expr::app("neg", vec![Expr::app(op, vec![y, x])]),
    )
}

/// Left distributivity: `a mul (b add c) = (a mul b) add (a mul c)`
pub fn make_distrib(mul: &str, add: &str) -> Equation {
    let (a, b, c) = (Expr::var("a"), Expr::var("b"), Expr::var("c"));
    Equation::new(
        Expr::app(mul, vec![a.clone(), Expr::app(add, vec![b.clone(), c.clone()])]),
        Expr::app(
            add,
            vec![
                Expr::app(mul, vec![a.clone(), b]),
                Expr::app(mul, vec![a, c]),
            ],
        ),
    )
}

/// Left self-distributivity: `a op (b op c) = (a op b) op (a op c)`
pub fn make_self_distrib(op: &str) -> Equation {
    let (a, b, c) = (Expr::var("a"), Expr::var("b"), Expr::var("c"));
    Equation::new(
        Expr::app(op, vec![a.clone(), Expr::app(op, vec![b.clone(), c.clone()])]),
        Expr::app(
            op,
            vec![
                Expr::app(op, vec![a.clone(), b]),
                Expr::app(op, vec![a, c]),
            ],
        ),
    )
}

/// Right self-distributivity: `(a op b) op c = (a op c) op (b op c)`
pub fn make_right_self_distrib(op: &str) -> Equation {
    let (a, b, c) = (Expr::var("a"), Expr::var("b"), Expr::var("c"));
    Equation::new(
        Expr::app(op, vec![Expr::app(op, vec![a.clone(), b.clone()]), c.clone()]),
        Expr::app(
            op,
            vec![
                Expr::app(op, vec![a, c.clone()]),
                Expr::app(op, vec![b, c]),
            ],
        ),
    )
}

/// Jacobi identity, written without a zero constant:
/// `[x,[y,z]] add [y,[z,x]] = neg([z,[x,y]])`.
pub fn make_jacobi(bracket: &str) -> Equation {
    let (x, y, z) = (Expr::var("x"), Expr::var("y"), Expr::var("z"));
    let t1 = Expr::app(
        bracket,
        vec![x.clone(), Expr::app(bracket, vec![y.clone(), z.clone()])],
    );
    let t2 = Expr::app(
        bracket,
        vec![y.clone(), Expr::app(bracket, vec![z.clone(), x.clone()])],
    );
    let t3 = Expr::app(bracket, vec![z, Expr::app(bracket, vec![x, y])]);
    Equation::new(
        Expr::app("add", vec![t1, t2]),
        Expr::app("neg", vec![t3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_and_variables() {
        let x = Expr::var("x");
        assert_eq!(x.size(), 1);
        assert_eq!(x.variables().len(), 1);

        let e = Expr::constant("e");
        assert_eq!(e.size(), 1);
        assert!(e.variables().is_empty());

        let nested = Expr::app(
            "mul",
            vec![Expr::app("mul", vec![Expr::var("x"), Expr::var("y")]), Expr::var("z")],
        );
        assert_eq!(nested.size(), 5);
        assert_eq!(nested.variables().len(), 3);
    }

    #[test]
    fn substitute_leaves_unmapped_variables() {
        let expr = Expr::app("mul", vec![Expr::var("x"), Expr::var("y")]);
        let mut mapping = HashMap::new();
        mapping.insert("x".to_string(), Expr::var("a"));
        let out = expr.substitute(&mapping);
        assert_eq!(
            out,
            Expr::app("mul", vec![Expr::var("a"), Expr::var("y")])
        );
    }

    #[test]
    fn rendering_forms() {
        let binary = Expr::app("mul", vec![Expr::var("x"), Expr::var("y")]);
        assert_eq!(binary.to_string(), "(x mul y)");

        let unary = Expr::app("inv", vec![Expr::var("x")]);
        assert_eq!(unary.to_string(), "inv(x)");

        let ternary = Expr::app(
            "f",
            vec![Expr::var("a"), Expr::var("b"), Expr::var("c")],
        );
        assert_eq!(ternary.to_string(), "f(a, b, c)");

        let eq = make_comm("mul");
        assert_eq!(eq.to_string(), "(x mul y) = (y mul x)");
    }

    #[test]
    fn builders_have_expected_variables() {
        assert_eq!(make_assoc("mul").variables().len(), 3);
        assert_eq!(make_comm("mul").variables().len(), 2);
        assert_eq!(make_identity("mul", "e").variables().len(), 1);
        assert_eq!(make_self_distrib("mul").variables().len(), 3);
        assert_eq!(make_jacobi("bracket").variables().len(), 3);
    }

    #[test]
    fn rename_ops_rewrites_nested_applications() {
        let eq = make_distrib("mul", "add");
        let mut renames = HashMap::new();
        renames.insert("mul".to_string(), "a_mul".to_string());
        renames.insert("add".to_string(), "a_add".to_string());
        let out = eq.rename_ops(&renames);
        let rendered = out.to_string();
        assert!(rendered.contains("a_mul"));
        assert!(rendered.contains("a_add"));
        assert!(!rendered.contains("(a mul"));
    }
}
