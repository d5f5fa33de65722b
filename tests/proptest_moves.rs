//! Property tests for the move engine.


use proptest::prelude::*;

use generators::arb_signature;
use noether::moves::{MoveEngine, MoveKind};
use noether::signature::AxiomKind;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every child extends the parent's derivation chain by exactly one
    /// entry naming the applied move, and stays well-formed.
    #[test]
    fn children_extend_chain_and_validate(sig in arb_signature()) {
        let engine = MoveEngine::new();
        for result in engine.apply_all(std::slice::from_ref(&sig)) {
            prop_assert_eq!(
                result.signature.derivation_chain.len(),
                sig.derivation_chain.len() + 1
            );
            let last = result.signature.derivation_chain.last().unwrap();
            prop_assert!(
                last.contains(result.kind.chain_tag()),
                "chain entry '{}' does not name {}",
                last,
                result.kind
            );
            prop_assert!(result.signature.validate().is_ok());
        }
    }

    /// DUALIZE never produces a child for an operation that is already
    /// commutative, and never duplicates an axiom.
    #[test]
    fn dualize_skips_commutative(sig in arb_signature()) {
        let engine = MoveEngine::new();
        for result in engine.dualize(&sig) {
            let comm_count = result
                .signature
                .axioms
                .iter()
                .filter(|a| a.kind == AxiomKind::Commutativity)
                .count();
            let parent_count = sig
                .axioms
                .iter()
                .filter(|a| a.kind == AxiomKind::Commutativity)
                .count();
            prop_assert_eq!(comm_count, parent_count + 1);
        }
    }

    /// QUOTIENT never reintroduces an axiom kind already present on the
    /// same operation.
    #[test]
    fn quotient_never_duplicates(sig in arb_signature()) {
        let engine = MoveEngine::new();
        for result in engine.quotient(&sig) {
            for op in result.signature.ops_by_arity(2) {
                for kind in [AxiomKind::Commutativity, AxiomKind::Idempotence] {
                    let count = result
                        .signature
                        .axioms
                        .iter()
                        .filter(|a| a.kind == kind && a.mentions(&op.name))
                        .count();
                    prop_assert!(count <= 1, "{} duplicated on {}", kind, op.name);
                }
            }
        }
    }

    /// Move application is deterministic: two runs over the same input
    /// produce the same children in the same order.
    #[test]
    fn moves_are_deterministic(sig in arb_signature()) {
        let engine = MoveEngine::new();
        let a = engine.apply_all(std::slice::from_ref(&sig));
        let b = engine.apply_all(std::slice::from_ref(&sig));
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(&x.signature, &y.signature);
            prop_assert_eq!(x.kind, y.kind);
        }
    }

    /// SELF_DISTRIB children carry the exact laws they promise.
    #[test]
    fn self_distrib_children_carry_the_laws(sig in arb_signature()) {
        let engine = MoveEngine::new();
        for result in engine.apply_move(MoveKind::SelfDistrib, std::slice::from_ref(&sig)) {
            let name = &result.signature.name;
            if name.contains("_fsd(") {
                let op = result.signature.ops_by_arity(2).iter()
                    .find(|op| name.ends_with(&format!("({})", op.name)))
                    .map(|op| op.name.clone());
                if let Some(op) = op {
                    prop_assert!(result
                        .signature
                        .has_axiom_on(AxiomKind::SelfDistributivity, &op));
                    prop_assert!(result
                        .signature
                        .has_axiom_on(AxiomKind::RightSelfDistributivity, &op));
                }
            }
        }
    }
}
