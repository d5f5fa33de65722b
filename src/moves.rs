//! The eight structural moves that generate candidate signatures.
//!
//! Each move is a pure function from one or two signatures to a list of
//! [`MoveResult`]. Every produced child deep-copies its parent, takes a new
//! name, appends exactly one entry to the derivation chain, and keeps the
//! signature invariants intact. These moves are the only way the system
//! generates new mathematics: the search space is whatever they reach.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::warn;

use crate::ast::{
    make_assoc, make_comm, make_distrib, make_idempotent, make_identity, make_inverse,
    make_right_self_distrib, make_self_distrib, Equation, Expr,
};
use crate::signature::{Axiom, AxiomKind, Operation, Signature, Sort};

/// The closed set of structural moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveKind {
    Abstract,
    Dualize,
    Complete,
    Quotient,
    Internalize,
    Transfer,
    Deform,
    SelfDistrib,
}

impl MoveKind {
    pub const ALL: [MoveKind; 8] = [
        MoveKind::Abstract,
        MoveKind::Dualize,
        MoveKind::Complete,
        MoveKind::Quotient,
        MoveKind::Internalize,
        MoveKind::Transfer,
        MoveKind::Deform,
        MoveKind::SelfDistrib,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Abstract => "ABSTRACT",
            MoveKind::Dualize => "DUALIZE",
            MoveKind::Complete => "COMPLETE",
            MoveKind::Quotient => "QUOTIENT",
            MoveKind::Internalize => "INTERNALIZE",
            MoveKind::Transfer => "TRANSFER",
            MoveKind::Deform => "DEFORM",
            MoveKind::SelfDistrib => "SELF_DISTRIB",
        }
    }

    /// The substring this move leaves in derivation-chain entries.
    pub fn chain_tag(&self) -> &'static str {
        match self {
            MoveKind::Abstract => "Abstract",
            MoveKind::Dualize => "Dualize",
            MoveKind::Complete => "Complete",
            MoveKind::Quotient => "Quotient",
            MoveKind::Internalize => "Internalize",
            MoveKind::Transfer => "Transfer",
            MoveKind::Deform => "Deform",
            MoveKind::SelfDistrib => "SelfDistrib",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate produced by a move, with provenance.
#[derive(Clone, Debug)]
pub struct MoveResult {
    pub signature: Signature,
    pub kind: MoveKind,
    /// Names of the one or two parent signatures.
    pub parents: Vec<String>,
    pub description: String,
}

/// Applies the structural moves to generate candidate signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveEngine;

impl MoveEngine {
    pub fn new() -> Self {
        MoveEngine
    }

    /// Apply every move to a list of signatures: single moves in a fixed
    /// order per signature, then the pairwise moves over ordered pairs
    /// `i < j`. Malformed inputs are logged and skipped.
    pub fn apply_all(&self, sigs: &[Signature]) -> Vec<MoveResult> {
        let valid = self.validated(sigs);
        let mut results = Vec::new();

        for &sig in &valid {
            results.extend(self.dualize(sig));
            results.extend(self.complete(sig));
            results.extend(self.quotient(sig));
            results.extend(self.internalize(sig));
            results.extend(self.deform(sig));
            results.extend(self.self_distrib(sig));
        }

        for (i, &a) in valid.iter().enumerate() {
            for &b in valid.iter().skip(i + 1) {
                results.extend(self.abstract_shared(a, b));
                results.extend(self.transfer(a, b));
            }
        }

        results
    }

    /// Apply one specific move kind across the inputs.
    pub fn apply_move(&self, kind: MoveKind, sigs: &[Signature]) -> Vec<MoveResult> {
        let valid = self.validated(sigs);
        match kind {
            MoveKind::Dualize => self.each(&valid, |s| self.dualize(s)),
            MoveKind::Complete => self.each(&valid, |s| self.complete(s)),
            MoveKind::Quotient => self.each(&valid, |s| self.quotient(s)),
            MoveKind::Internalize => self.each(&valid, |s| self.internalize(s)),
            MoveKind::Deform => self.each(&valid, |s| self.deform(s)),
            MoveKind::SelfDistrib => self.each(&valid, |s| self.self_distrib(s)),
            MoveKind::Abstract => self.pairs(&valid, |a, b| self.abstract_shared(a, b)),
            MoveKind::Transfer => self.pairs(&valid, |a, b| self.transfer(a, b)),
        }
    }

    fn validated<'a>(&self, sigs: &'a [Signature]) -> Vec<&'a Signature> {
        sigs.iter()
            .filter(|sig| match sig.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(signature = %sig.name, %err, "skipping malformed signature");
                    false
                }
            })
            .collect()
    }

    fn each(
        &self,
        sigs: &[&Signature],
        f: impl Fn(&Signature) -> Vec<MoveResult>,
    ) -> Vec<MoveResult> {
        sigs.iter().flat_map(|s| f(s)).collect()
    }

    fn pairs(
        &self,
        sigs: &[&Signature],
        f: impl Fn(&Signature, &Signature) -> Vec<MoveResult>,
    ) -> Vec<MoveResult> {
        let mut out = Vec::new();
        for (i, &a) in sigs.iter().enumerate() {
            for &b in sigs.iter().skip(i + 1) {
                out.extend(f(a, b));
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // ABSTRACT: extract shared structure from two signatures
    // ------------------------------------------------------------------

    /// For each axiom kind present in both parents that has a canonical
    /// single-operation equation, emit the canonical axiom over one abstract
    /// binary operation on one sort. No shared kinds (or none expressible
    /// with a single operation) → no result.
    pub fn abstract_shared(&self, sig_a: &Signature, sig_b: &Signature) -> Vec<MoveResult> {
        let kinds_a: BTreeSet<AxiomKind> = sig_a.axioms.iter().map(|a| a.kind).collect();
        let kinds_b: BTreeSet<AxiomKind> = sig_b.axioms.iter().map(|a| a.kind).collect();
        let shared: Vec<AxiomKind> = kinds_a.intersection(&kinds_b).copied().collect();

        if shared.is_empty() {
            return Vec::new();
        }

        let mut child = Signature::new(format!("Abstract({},{})", sig_a.name, sig_b.name));
        child.sorts.push(Sort::new("S", "abstract carrier"));
        child
            .operations
            .push(Operation::new("op", vec!["S", "S"], "S", "abstract binary operation"));
        child.derivation_chain = sig_a.derivation_chain.clone();
        child
            .derivation_chain
            .push(format!("Abstract with {}", sig_b.name));

        for kind in &shared {
            if let Some(eq) = single_op_equation(*kind, "op") {
                child.axioms.push(Axiom::new(*kind, eq, vec!["op"]));
            }
        }

        if child.axioms.is_empty() {
            return Vec::new();
        }

        let kind_names: Vec<&str> = shared.iter().map(AxiomKind::as_str).collect();
        vec![MoveResult {
            signature: child,
            kind: MoveKind::Abstract,
            parents: vec![sig_a.name.clone(), sig_b.name.clone()],
            description: format!(
                "Shared structure of {} and {}: [{}]",
                sig_a.name,
                sig_b.name,
                kind_names.join(", ")
            ),
        }]
    }

    // ------------------------------------------------------------------
    // DUALIZE: add commutativity to non-commutative binary operations
    // ------------------------------------------------------------------

    pub fn dualize(&self, sig: &Signature) -> Vec<MoveResult> {
        let mut results = Vec::new();

        for op in binary_op_names(sig) {
            if sig.has_axiom_on(AxiomKind::Commutativity, &op) {
                // Dualizing a commutative operation is the identity.
                continue;
            }

            let mut child = child_of(sig, format!("{}_dual({})", sig.name, op));
            child.derivation_chain.push(format!("Dualize({})", op));
            child.axioms.push(
                Axiom::new(AxiomKind::Commutativity, make_comm(&op), vec![&op])
                    .with_description(format!("dualization of {}", op)),
            );

            results.push(MoveResult {
                signature: child,
                kind: MoveKind::Dualize,
                parents: vec![sig.name.clone()],
                description: format!("Dualize {} in {} (add commutativity)", op, sig.name),
            });
        }

        results
    }

    // ------------------------------------------------------------------
    // COMPLETE: add missing structure. Identities, inverses, a second
    // operation, a norm
    // ------------------------------------------------------------------

    pub fn complete(&self, sig: &Signature) -> Vec<MoveResult> {
        let mut results = Vec::new();
        let binary = binary_op_names(sig);

        for op in &binary {
            let sort = match sig.get_op(op) {
                Some(decl) => decl.codomain.clone(),
                None => continue,
            };

            let has_identity = sig.has_axiom_on(AxiomKind::Identity, op);
            if !has_identity {
                let id_name = format!("e_{}", op);
                let mut child = child_of(sig, format!("{}+id({})", sig.name, op));
                child
                    .derivation_chain
                    .push(format!("Complete(identity for {})", op));
                child.operations.push(Operation::new(
                    id_name.clone(),
                    vec![],
                    sort.clone(),
                    format!("identity for {}", op),
                ));
                child.axioms.push(Axiom::new(
                    AxiomKind::Identity,
                    make_identity(op, &id_name),
                    vec![op, &id_name],
                ));
                results.push(MoveResult {
                    signature: child,
                    kind: MoveKind::Complete,
                    parents: vec![sig.name.clone()],
                    description: format!("Add identity element for {}", op),
                });
            }

            let has_inverse = sig.has_axiom_on(AxiomKind::Inverse, op);
            if has_identity && !has_inverse {
                // The identity constant's name comes from the identity
                // axiom's operation list (the entry that is not the op).
                let id_const = sig
                    .axioms
                    .iter()
                    .find(|a| a.kind == AxiomKind::Identity && a.mentions(op))
                    .and_then(|a| a.operations.iter().find(|o| *o != op).cloned());
                if let Some(id_const) = id_const {
                    let inv_name = format!("inv_{}", op);
                    let mut child = child_of(sig, format!("{}+inv({})", sig.name, op));
                    child
                        .derivation_chain
                        .push(format!("Complete(inverse for {})", op));
                    child.operations.push(Operation::new(
                        inv_name.clone(),
                        vec![&sort],
                        sort.clone(),
                        format!("inverse for {}", op),
                    ));
                    child.axioms.push(Axiom::new(
                        AxiomKind::Inverse,
                        make_inverse(op, &inv_name, &id_const),
                        vec![op, &inv_name, &id_const],
                    ));
                    results.push(MoveResult {
                        signature: child,
                        kind: MoveKind::Complete,
                        parents: vec![sig.name.clone()],
                        description: format!("Add inverse for {}", op),
                    });
                }
            }
        }

        // A single binary operation invites a distributive companion.
        if binary.len() == 1 {
            let op = &binary[0];
            if let Some(decl) = sig.get_op(op) {
                let sort = decl.codomain.clone();
                let mut child = child_of(sig, format!("{}+op2", sig.name));
                child
                    .derivation_chain
                    .push("Complete(second operation)".to_string());
                child.operations.push(Operation::new(
                    "op2",
                    vec![&sort, &sort],
                    sort.clone(),
                    "second binary operation",
                ));
                child.axioms.push(
                    Axiom::new(
                        AxiomKind::Distributivity,
                        make_distrib("op2", op),
                        vec!["op2", op],
                    )
                    .with_description("op2 distributes over original op"),
                );
                results.push(MoveResult {
                    signature: child,
                    kind: MoveKind::Complete,
                    parents: vec![sig.name.clone()],
                    description: format!("Add second operation distributing over {}", op),
                });
            }
        }

        // Norm: unary map to a scalar sort, with the symbolic positivity
        // marker (first-order equational logic has no inequalities, so the
        // tautology stands in for `norm(x) ≥ 0`).
        let wants_norm = !sig.sorts.is_empty()
            && (sig.sorts.len() >= 2 || !binary.is_empty())
            && sig.get_op("norm").is_none();
        if wants_norm {
            let sort = sig.sorts[0].name.clone();
            let scalar = if sig.sorts.len() >= 2 {
                sig.sorts[1].name.clone()
            } else {
                sort.clone()
            };
            let mut child = child_of(sig, format!("{}+norm", sig.name));
            child.derivation_chain.push("Complete(norm)".to_string());
            child
                .operations
                .push(Operation::new("norm", vec![&sort], scalar, "norm function"));
            let x = Expr::var("x");
            child.axioms.push(
                Axiom::new(
                    AxiomKind::Positivity,
                    Equation::new(
                        Expr::app("norm", vec![x.clone()]),
                        Expr::app("norm", vec![x]),
                    ),
                    vec!["norm"],
                )
                .with_description("norm(x) ≥ 0 (positivity, encoded symbolically)"),
            );
            results.push(MoveResult {
                signature: child,
                kind: MoveKind::Complete,
                parents: vec![sig.name.clone()],
                description: format!("Add norm to {}", sig.name),
            });
        }

        results
    }

    // ------------------------------------------------------------------
    // QUOTIENT: force additional equations
    // ------------------------------------------------------------------

    pub fn quotient(&self, sig: &Signature) -> Vec<MoveResult> {
        let quotients: [(AxiomKind, &str, fn(&str) -> Equation); 2] = [
            (AxiomKind::Commutativity, "COMM", make_comm),
            (AxiomKind::Idempotence, "IDEM", make_idempotent),
        ];

        let mut results = Vec::new();
        for op in binary_op_names(sig) {
            for (kind, label, builder) in &quotients {
                if sig.has_axiom_on(*kind, &op) {
                    continue;
                }
                let mut child = child_of(sig, format!("{}_q({},{})", sig.name, label, op));
                child
                    .derivation_chain
                    .push(format!("Quotient({} on {})", label, op));
                child.axioms.push(Axiom::new(*kind, builder(&op), vec![&op]));
                results.push(MoveResult {
                    signature: child,
                    kind: MoveKind::Quotient,
                    parents: vec![sig.name.clone()],
                    description: format!("Quotient {} by {} on {}", sig.name, label, op),
                });
            }
        }
        results
    }

    // ------------------------------------------------------------------
    // INTERNALIZE: turn a binary operation into a Hom-object
    // ------------------------------------------------------------------

    pub fn internalize(&self, sig: &Signature) -> Vec<MoveResult> {
        let mut results = Vec::new();

        for op in binary_op_names(sig) {
            let sort = match sig.get_op(&op) {
                Some(decl) => decl.codomain.clone(),
                None => continue,
            };
            let hom_sort = format!("Hom_{}", op);
            let eval_name = format!("eval_{}", op);
            let curry_name = format!("curry_{}", op);

            let mut child = child_of(sig, format!("{}_int({})", sig.name, op));
            child.derivation_chain.push(format!("Internalize({})", op));
            child
                .sorts
                .push(Sort::new(hom_sort.clone(), format!("internalized {}", op)));
            child.operations.push(Operation::new(
                eval_name.clone(),
                vec![&hom_sort, &sort],
                sort.clone(),
                format!("evaluate internalized {}", op),
            ));
            child.operations.push(Operation::new(
                curry_name.clone(),
                vec![&sort],
                hom_sort.clone(),
                format!("curry {} to Hom", op),
            ));

            let (a, b) = (Expr::var("a"), Expr::var("b"));
            child.axioms.push(
                Axiom::new(
                    AxiomKind::Custom,
                    Equation::new(
                        Expr::app(
                            eval_name.clone(),
                            vec![Expr::app(curry_name.clone(), vec![a.clone()]), b.clone()],
                        ),
                        Expr::app(op.clone(), vec![a, b]),
                    ),
                    vec![&eval_name, &curry_name, &op],
                )
                .with_description("curry-eval adjunction"),
            );

            results.push(MoveResult {
                signature: child,
                kind: MoveKind::Internalize,
                parents: vec![sig.name.clone()],
                description: format!("Internalize {} as Hom-object in {}", op, sig.name),
            });
        }

        results
    }

    // ------------------------------------------------------------------
    // TRANSFER: combine two structures through a morphism
    // ------------------------------------------------------------------

    /// Produce exactly one child holding both parents' operations (prefixed
    /// `a_`/`b_`), their axioms with equations rewritten to the prefixes, a
    /// fresh `transfer` morphism between the principal carriers, and a
    /// functoriality axiom when both parents have a binary operation.
    pub fn transfer(&self, sig_a: &Signature, sig_b: &Signature) -> Vec<MoveResult> {
        let (Some(first_a), Some(first_b)) = (sig_a.sorts.first(), sig_b.sorts.first()) else {
            return Vec::new();
        };
        let sort_a = first_a.name.clone();
        let mut sort_b = first_b.name.clone();
        if sort_a == sort_b {
            sort_b = format!("{}_2", sort_b);
        }

        let mut child = Signature::new(format!("Transfer({},{})", sig_a.name, sig_b.name));
        child
            .sorts
            .push(Sort::new(sort_a.clone(), format!("from {}", sig_a.name)));
        child
            .sorts
            .push(Sort::new(sort_b.clone(), format!("from {}", sig_b.name)));
        child.derivation_chain = sig_a.derivation_chain.clone();
        child
            .derivation_chain
            .push(format!("Transfer to {}", sig_b.name));

        // Auxiliary sorts of multi-sorted parents ride along unrenamed so
        // copied operations still typecheck.
        let declare_sort = |child: &mut Signature, name: &str, origin: &str| {
            if !child.sorts.iter().any(|s| s.name == name) {
                child
                    .sorts
                    .push(Sort::new(name.to_string(), format!("from {}", origin)));
            }
        };

        let mut renames_a = HashMap::new();
        for op in &sig_a.operations {
            renames_a.insert(op.name.clone(), format!("a_{}", op.name));
        }
        let mut renames_b = HashMap::new();
        for op in &sig_b.operations {
            renames_b.insert(op.name.clone(), format!("b_{}", op.name));
        }

        for op in &sig_a.operations {
            let domain: Vec<String> = op
                .domain
                .iter()
                .map(|s| {
                    if *s == first_a.name {
                        sort_a.clone()
                    } else {
                        s.clone()
                    }
                })
                .collect();
            let codomain = if op.codomain == first_a.name {
                sort_a.clone()
            } else {
                op.codomain.clone()
            };
            for s in domain.iter().chain(std::iter::once(&codomain)) {
                declare_sort(&mut child, s, &sig_a.name);
            }
            child.operations.push(Operation {
                name: format!("a_{}", op.name),
                domain,
                codomain,
                description: format!("{} from {}", op.name, sig_a.name),
            });
        }

        for op in &sig_b.operations {
            let domain: Vec<String> = op
                .domain
                .iter()
                .map(|s| {
                    if *s == first_b.name {
                        sort_b.clone()
                    } else {
                        s.clone()
                    }
                })
                .collect();
            let codomain = if op.codomain == first_b.name {
                sort_b.clone()
            } else {
                op.codomain.clone()
            };
            for s in domain.iter().chain(std::iter::once(&codomain)) {
                declare_sort(&mut child, s, &sig_b.name);
            }
            child.operations.push(Operation {
                name: format!("b_{}", op.name),
                domain,
                codomain,
                description: format!("{} from {}", op.name, sig_b.name),
            });
        }

        for ax in &sig_a.axioms {
            child.axioms.push(Axiom {
                kind: ax.kind,
                equation: ax.equation.rename_ops(&renames_a),
                operations: ax.operations.iter().map(|o| format!("a_{}", o)).collect(),
                description: ax.description.clone(),
            });
        }
        for ax in &sig_b.axioms {
            child.axioms.push(Axiom {
                kind: ax.kind,
                equation: ax.equation.rename_ops(&renames_b),
                operations: ax.operations.iter().map(|o| format!("b_{}", o)).collect(),
                description: ax.description.clone(),
            });
        }

        child.operations.push(Operation::new(
            "transfer",
            vec![&sort_a],
            sort_b.clone(),
            format!("morphism from {} to {}", sort_a, sort_b),
        ));

        let bin_a = sig_a.ops_by_arity(2);
        let bin_b = sig_b.ops_by_arity(2);
        if let (Some(op_a), Some(op_b)) = (bin_a.first(), bin_b.first()) {
            let a_op = format!("a_{}", op_a.name);
            let b_op = format!("b_{}", op_b.name);
            let (x, y) = (Expr::var("x"), Expr::var("y"));
            child.axioms.push(
                Axiom::new(
                    AxiomKind::Functoriality,
                    Equation::new(
                        Expr::app(
                            "transfer",
                            vec![Expr::app(a_op.clone(), vec![x.clone(), y.clone()])],
                        ),
                        Expr::app(
                            b_op.clone(),
                            vec![
                                Expr::app("transfer", vec![x]),
                                Expr::app("transfer", vec![y]),
                            ],
                        ),
                    ),
                    vec!["transfer", &a_op, &b_op],
                )
                .with_description("transfer is a homomorphism"),
            );
        }

        vec![MoveResult {
            signature: child,
            kind: MoveKind::Transfer,
            parents: vec![sig_a.name.clone(), sig_b.name.clone()],
            description: format!(
                "Transfer structure from {} to {}",
                sig_a.name, sig_b.name
            ),
        }]
    }

    // ------------------------------------------------------------------
    // DEFORM: relax one axiom with a deformation parameter
    // ------------------------------------------------------------------

    pub fn deform(&self, sig: &Signature) -> Vec<MoveResult> {
        let mut results = Vec::new();

        for (i, axiom) in sig.axioms.iter().enumerate() {
            if matches!(axiom.kind, AxiomKind::Custom | AxiomKind::Positivity) {
                continue;
            }
            let Some(first_sort) = sig.sorts.first() else {
                continue;
            };

            let mut child = child_of(sig, format!("{}_deform({})", sig.name, axiom.kind));
            child
                .derivation_chain
                .push(format!("Deform({})", axiom.kind));

            if !child.sorts.iter().any(|s| s.name == "Param") {
                child
                    .sorts
                    .push(Sort::new("Param", "deformation parameter"));
            }
            child.axioms.remove(i);

            match axiom.kind {
                AxiomKind::Associativity | AxiomKind::Commutativity => {
                    let op_name = axiom
                        .operations
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "op".to_string());
                    let sort = first_sort.name.clone();
                    let deform_op = format!("q_{}", op_name);
                    if child.get_op("q").is_none() {
                        child.operations.push(Operation::new(
                            "q",
                            vec![],
                            "Param",
                            "deformation parameter",
                        ));
                    }
                    if child.get_op(&deform_op).is_none() {
                        child.operations.push(Operation::new(
                            deform_op.clone(),
                            vec!["Param", &sort],
                            sort.clone(),
                            "deformation scaling",
                        ));
                    }

                    let q = Expr::constant("q");
                    let equation = if axiom.kind == AxiomKind::Associativity {
                        // (x op y) op z = q_op(q, x op (y op z))
                        let (x, y, z) = (Expr::var("x"), Expr::var("y"), Expr::var("z"));
                        Equation::new(
                            Expr::app(
                                op_name.clone(),
                                vec![
                                    Expr::app(op_name.clone(), vec![x.clone(), y.clone()]),
                                    z.clone(),
                                ],
                            ),
                            Expr::app(
                                deform_op.clone(),
                                vec![
                                    q,
                                    Expr::app(
                                        op_name.clone(),
                                        vec![x, Expr::app(op_name.clone(), vec![y, z])],
                                    ),
                                ],
                            ),
                        )
                    } else {
                        // x op y = q_op(q, y op x)
                        let (x, y) = (Expr::var("x"), Expr::var("y"));
                        Equation::new(
                            Expr::app(op_name.clone(), vec![x.clone(), y.clone()]),
                            Expr::app(
                                deform_op.clone(),
                                vec![q, Expr::app(op_name.clone(), vec![y, x])],
                            ),
                        )
                    };

                    child.axioms.push(
                        Axiom::new(AxiomKind::Custom, equation, vec![&op_name, &deform_op])
                            .with_description(format!("q-deformed {}", axiom.kind)),
                    );
                }
                _ => {
                    // No generic parameterized form: keep the equation, mark
                    // the law as deformed.
                    child.axioms.push(
                        Axiom {
                            kind: AxiomKind::Custom,
                            equation: axiom.equation.clone(),
                            operations: axiom.operations.clone(),
                            description: format!("deformed-{}", axiom.kind),
                        },
                    );
                }
            }

            results.push(MoveResult {
                signature: child,
                kind: MoveKind::Deform,
                parents: vec![sig.name.clone()],
                description: format!("Deform {} in {}", axiom.kind, sig.name),
            });
        }

        results
    }

    // ------------------------------------------------------------------
    // SELF_DISTRIB: rack/quandle-style distributivity over itself
    // ------------------------------------------------------------------

    pub fn self_distrib(&self, sig: &Signature) -> Vec<MoveResult> {
        let mut results = Vec::new();

        for op in binary_op_names(sig) {
            let has_left = sig.has_axiom_on(AxiomKind::SelfDistributivity, &op);
            let has_right = sig.has_axiom_on(AxiomKind::RightSelfDistributivity, &op);

            if !has_left {
                let mut child = child_of(sig, format!("{}_sd({})", sig.name, op));
                child.derivation_chain.push(format!("SelfDistrib({})", op));
                child.axioms.push(Axiom::new(
                    AxiomKind::SelfDistributivity,
                    make_self_distrib(&op),
                    vec![&op],
                ));
                results.push(MoveResult {
                    signature: child,
                    kind: MoveKind::SelfDistrib,
                    parents: vec![sig.name.clone()],
                    description: format!("Add self-distributivity to {} in {}", op, sig.name),
                });
            }

            // The "full" child: both laws, adding whichever are missing.
            if !(has_left && has_right) {
                let mut child = child_of(sig, format!("{}_fsd({})", sig.name, op));
                child
                    .derivation_chain
                    .push(format!("SelfDistrib(full {})", op));
                if !has_left {
                    child.axioms.push(Axiom::new(
                        AxiomKind::SelfDistributivity,
                        make_self_distrib(&op),
                        vec![&op],
                    ));
                }
                if !has_right {
                    child.axioms.push(Axiom::new(
                        AxiomKind::RightSelfDistributivity,
                        make_right_self_distrib(&op),
                        vec![&op],
                    ));
                }
                results.push(MoveResult {
                    signature: child,
                    kind: MoveKind::SelfDistrib,
                    parents: vec![sig.name.clone()],
                    description: format!(
                        "Add full self-distributivity to {} in {}",
                        op, sig.name
                    ),
                });
            }
        }

        results
    }
}

/// Deep copy with a new name (everything else, chain included, carries over).
fn child_of(sig: &Signature, name: String) -> Signature {
    let mut child = sig.clone();
    child.name = name;
    child
}

fn binary_op_names(sig: &Signature) -> Vec<String> {
    sig.ops_by_arity(2)
        .into_iter()
        .map(|op| op.name.clone())
        .collect()
}

/// The canonical equation for kinds expressible over a single binary
/// operation; kinds whose canonical form needs extra operations (identity
/// needs a constant, inverse a unary, ...) have none.
fn single_op_equation(kind: AxiomKind, op: &str) -> Option<Equation> {
    match kind {
        AxiomKind::Associativity => Some(make_assoc(op)),
        AxiomKind::Commutativity => Some(make_comm(op)),
        AxiomKind::Idempotence => Some(make_idempotent(op)),
        AxiomKind::SelfDistributivity => Some(make_self_distrib(op)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn every_child_validates_and_extends_the_chain() {
        let engine = MoveEngine::new();
        let seeds = catalog::all();
        for result in engine.apply_all(&seeds) {
            let parent = seeds
                .iter()
                .find(|s| s.name == result.parents[0])
                .expect("parent in seed set");
            assert_eq!(
                result.signature.derivation_chain.len(),
                parent.derivation_chain.len() + 1,
                "chain of {} grew by one",
                result.signature.name
            );
            result
                .signature
                .validate()
                .unwrap_or_else(|e| panic!("{} is malformed: {}", result.signature.name, e));
        }
    }

    #[test]
    fn dualize_skips_commutative_operations() {
        let engine = MoveEngine::new();
        let results = engine.dualize(&catalog::abelian_group());
        assert!(results.is_empty());
    }

    #[test]
    fn quotient_never_reintroduces_kinds() {
        // Lattice already has COMM and IDEM on both operations.
        let engine = MoveEngine::new();
        assert!(engine.quotient(&catalog::lattice()).is_empty());

        let semigroup_children = engine.quotient(&catalog::semigroup());
        assert_eq!(semigroup_children.len(), 2);
    }

    #[test]
    fn internalize_semigroup() {
        let engine = MoveEngine::new();
        let results = engine.internalize(&catalog::semigroup());
        assert_eq!(results.len(), 1);
        let sig = &results[0].signature;
        assert!(sig.sorts.iter().any(|s| s.name == "Hom_mul"));
        assert!(sig.get_op("eval_mul").is_some());
        assert!(sig.get_op("curry_mul").is_some());
        assert!(sig.axioms.iter().any(|a| a.kind == AxiomKind::Custom));
    }

    #[test]
    fn abstract_with_no_shared_kinds_is_empty() {
        let engine = MoveEngine::new();
        assert!(engine
            .abstract_shared(&catalog::magma(), &catalog::group())
            .is_empty());
    }

    #[test]
    fn deform_replaces_the_axiom() {
        let engine = MoveEngine::new();
        let results = engine.deform(&catalog::semigroup());
        assert_eq!(results.len(), 1);
        let sig = &results[0].signature;
        assert!(sig.sorts.iter().any(|s| s.name == "Param"));
        assert!(!sig.axioms.iter().any(|a| a.kind == AxiomKind::Associativity));
        assert!(sig.axioms.iter().any(|a| a.kind == AxiomKind::Custom));
        assert!(sig.get_op("q_mul").is_some());
        sig.validate().unwrap();
    }

    #[test]
    fn self_distrib_emits_left_and_full_children() {
        let engine = MoveEngine::new();
        let results = engine.self_distrib(&catalog::ring());
        // Two binary operations (add, mul), two children each.
        assert_eq!(results.len(), 4);
        let names: Vec<&str> = results
            .iter()
            .map(|r| r.signature.name.as_str())
            .collect();
        assert!(names.iter().any(|n| n.contains("_sd(add)")));
        assert!(names.iter().any(|n| n.contains("_fsd(add)")));
        assert!(names.iter().any(|n| n.contains("_sd(mul)")));
        assert!(names.iter().any(|n| n.contains("_fsd(mul)")));
    }
}
