//! Property tests for expression trees.


use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;

use generators::{arb_expr, VAR_NAMES};
use noether::ast::Expr;
use noether::parser::parse_equation;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Substitution never invents variables:
    /// vars(e[σ]) ⊆ vars(e) ∪ ⋃ vars(σ(v)).
    #[test]
    fn substitution_bounds_variables(
        expr in arb_expr(),
        replacement in arb_expr(),
        target in proptest::sample::select(&VAR_NAMES[..]),
    ) {
        let mut mapping = HashMap::new();
        mapping.insert(target.to_string(), replacement.clone());

        let out = expr.substitute(&mapping);
        let mut bound: BTreeSet<String> = expr.variables();
        bound.extend(replacement.variables());
        prop_assert!(out.variables().is_subset(&bound));
    }

    /// Substituting a variable for itself is the identity.
    #[test]
    fn identity_substitution(expr in arb_expr()) {
        let mapping: HashMap<String, Expr> = VAR_NAMES
            .iter()
            .map(|v| (v.to_string(), Expr::var(*v)))
            .collect();
        prop_assert_eq!(expr.substitute(&mapping), expr);
    }

    /// Substitution removes the substituted variable when the replacement
    /// does not mention it.
    #[test]
    fn substituted_variable_disappears(expr in arb_expr()) {
        let mut mapping = HashMap::new();
        mapping.insert("x".to_string(), Expr::constant("e"));
        let out = expr.substitute(&mapping);
        prop_assert!(!out.variables().contains("x"));
    }

    /// Size is positive and substitution with leaves never grows a tree's
    /// variable count.
    #[test]
    fn size_is_node_count(expr in arb_expr()) {
        prop_assert!(expr.size() >= 1);
        prop_assert!(expr.variables().len() <= expr.size());
    }

    /// Rendering any generated equation and parsing it back is the
    /// identity, under the generator's vocabulary.
    #[test]
    fn render_parse_round_trip(lhs in arb_expr(), rhs in arb_expr()) {
        let eq = noether::ast::Equation::new(lhs, rhs);
        let constants: HashSet<String> = ["e".to_string()].into_iter().collect();
        let ops: HashSet<String> =
            ["mul", "add", "inv", "e"].iter().map(|s| s.to_string()).collect();

        let parsed = parse_equation(&eq.to_string(), &constants, &ops)
            .expect("rendered equation must parse");
        prop_assert_eq!(parsed, eq);
    }
}
