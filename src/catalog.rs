//! The seed library of classical algebraic structures.
//!
//! These fourteen signatures are the starting points for exploration. Their
//! fingerprints form the baseline known-set for novelty scoring: a candidate
//! that collapses back onto one of these is a rediscovery, not a discovery.

use crate::ast::{
    make_anticomm, make_assoc, make_comm, make_distrib, make_idempotent, make_identity,
    make_inverse, make_jacobi, Equation, Expr,
};
use crate::signature::{Axiom, AxiomKind, Operation, Signature, Sort};

/// A set with a binary operation and no axioms.
pub fn magma() -> Signature {
    let mut sig = Signature::new("Magma");
    sig.description = "A set with a single binary operation and no axioms.".to_string();
    sig.sorts.push(Sort::new("S", "carrier set"));
    sig.operations
        .push(Operation::new("mul", vec!["S", "S"], "S", "binary operation"));
    sig
}

pub fn semigroup() -> Signature {
    let mut sig = Signature::new("Semigroup");
    sig.description = "A set with an associative binary operation.".to_string();
    sig.sorts.push(Sort::new("S", "carrier set"));
    sig.operations.push(Operation::new(
        "mul",
        vec!["S", "S"],
        "S",
        "associative binary operation",
    ));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("mul"), vec!["mul"]));
    sig
}

pub fn monoid() -> Signature {
    let mut sig = Signature::new("Monoid");
    sig.description = "A semigroup with an identity element.".to_string();
    sig.sorts.push(Sort::new("S", "carrier set"));
    sig.operations.push(Operation::new(
        "mul",
        vec!["S", "S"],
        "S",
        "associative binary operation",
    ));
    sig.operations
        .push(Operation::new("e", vec![], "S", "identity element"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("mul"), vec!["mul"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("mul", "e"),
        vec!["mul", "e"],
    ));
    sig
}

pub fn group() -> Signature {
    let mut sig = Signature::new("Group");
    sig.description =
        "A set with associative operation, identity, and inverses.".to_string();
    sig.sorts.push(Sort::new("G", "group elements"));
    sig.operations
        .push(Operation::new("mul", vec!["G", "G"], "G", "group multiplication"));
    sig.operations
        .push(Operation::new("e", vec![], "G", "identity element"));
    sig.operations
        .push(Operation::new("inv", vec!["G"], "G", "group inverse"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("mul"), vec!["mul"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("mul", "e"),
        vec!["mul", "e"],
    ));
    sig.axioms.push(Axiom::new(
        AxiomKind::Inverse,
        make_inverse("mul", "inv", "e"),
        vec!["mul", "inv", "e"],
    ));
    sig
}

pub fn abelian_group() -> Signature {
    let mut sig = group();
    sig.name = "AbelianGroup".to_string();
    sig.description = "A group where the operation is commutative.".to_string();
    sig.axioms
        .push(Axiom::new(AxiomKind::Commutativity, make_comm("mul"), vec!["mul"]));
    sig
}

pub fn ring() -> Signature {
    let mut sig = Signature::new("Ring");
    sig.description =
        "Abelian group under addition with associative, distributive multiplication."
            .to_string();
    sig.sorts.push(Sort::new("R", "ring elements"));
    sig.operations
        .push(Operation::new("add", vec!["R", "R"], "R", "addition"));
    sig.operations
        .push(Operation::new("mul", vec!["R", "R"], "R", "multiplication"));
    sig.operations
        .push(Operation::new("zero", vec![], "R", "additive identity"));
    sig.operations
        .push(Operation::new("neg", vec!["R"], "R", "additive inverse"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("add"), vec!["add"]));
    sig.axioms
        .push(Axiom::new(AxiomKind::Commutativity, make_comm("add"), vec!["add"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("add", "zero"),
        vec!["add", "zero"],
    ));
    sig.axioms.push(Axiom::new(
        AxiomKind::Inverse,
        make_inverse("add", "neg", "zero"),
        vec!["add", "neg"],
    ));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("mul"), vec!["mul"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Distributivity,
        make_distrib("mul", "add"),
        vec!["mul", "add"],
    ));
    sig
}

pub fn field() -> Signature {
    let mut sig = ring();
    sig.name = "Field".to_string();
    sig.description =
        "A commutative ring where every nonzero element has a multiplicative inverse."
            .to_string();
    sig.operations
        .push(Operation::new("one", vec![], "R", "multiplicative identity"));
    sig.operations.push(Operation::new(
        "recip",
        vec!["R"],
        "R",
        "multiplicative inverse (nonzero)",
    ));
    sig.axioms
        .push(Axiom::new(AxiomKind::Commutativity, make_comm("mul"), vec!["mul"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("mul", "one"),
        vec!["mul", "one"],
    ));
    sig
}

pub fn lattice() -> Signature {
    let (x, y) = (Expr::var("x"), Expr::var("y"));

    let mut sig = Signature::new("Lattice");
    sig.description = "A set with meet and join satisfying absorption laws.".to_string();
    sig.sorts.push(Sort::new("L", "lattice elements"));
    sig.operations
        .push(Operation::new("meet", vec!["L", "L"], "L", "greatest lower bound"));
    sig.operations
        .push(Operation::new("join", vec!["L", "L"], "L", "least upper bound"));
    for op in ["meet", "join"] {
        sig.axioms
            .push(Axiom::new(AxiomKind::Associativity, make_assoc(op), vec![op]));
        sig.axioms
            .push(Axiom::new(AxiomKind::Commutativity, make_comm(op), vec![op]));
        sig.axioms
            .push(Axiom::new(AxiomKind::Idempotence, make_idempotent(op), vec![op]));
    }
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Absorption,
            Equation::new(
                Expr::app(
                    "meet",
                    vec![x.clone(), Expr::app("join", vec![x.clone(), y.clone()])],
                ),
                x.clone(),
            ),
            vec!["meet", "join"],
        )
        .with_description("meet absorbs join"),
    );
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Absorption,
            Equation::new(
                Expr::app(
                    "join",
                    vec![x.clone(), Expr::app("meet", vec![x.clone(), y])],
                ),
                x,
            ),
            vec!["meet", "join"],
        )
        .with_description("join absorbs meet"),
    );
    sig
}

/// A Latin square: unique solutions to `a*x = b` and `y*a = b`.
pub fn quasigroup() -> Signature {
    let (x, y) = (Expr::var("x"), Expr::var("y"));

    let mut sig = Signature::new("Quasigroup");
    sig.description =
        "A Latin square: binary operation with unique solutions to a*x=b and y*a=b."
            .to_string();
    sig.sorts.push(Sort::new("Q", "quasigroup elements"));
    sig.operations
        .push(Operation::new("mul", vec!["Q", "Q"], "Q", "binary operation"));
    sig.operations
        .push(Operation::new("ldiv", vec!["Q", "Q"], "Q", "left division: a\\b"));
    sig.operations
        .push(Operation::new("rdiv", vec!["Q", "Q"], "Q", "right division: a/b"));

    // a * (a \ b) = b
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Custom,
            Equation::new(
                Expr::app(
                    "mul",
                    vec![x.clone(), Expr::app("ldiv", vec![x.clone(), y.clone()])],
                ),
                y.clone(),
            ),
            vec!["mul", "ldiv"],
        )
        .with_description("left cancellation"),
    );
    // (a / b) * b = a
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Custom,
            Equation::new(
                Expr::app(
                    "mul",
                    vec![Expr::app("rdiv", vec![x.clone(), y.clone()]), y.clone()],
                ),
                x.clone(),
            ),
            vec!["mul", "rdiv"],
        )
        .with_description("right cancellation"),
    );
    // a \ (a * b) = b
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Custom,
            Equation::new(
                Expr::app(
                    "ldiv",
                    vec![x.clone(), Expr::app("mul", vec![x.clone(), y.clone()])],
                ),
                y.clone(),
            ),
            vec!["mul", "ldiv"],
        )
        .with_description("left division cancellation"),
    );
    // (a * b) / b = a
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Custom,
            Equation::new(
                Expr::app(
                    "rdiv",
                    vec![Expr::app("mul", vec![x.clone(), y.clone()]), y],
                ),
                x,
            ),
            vec!["mul", "rdiv"],
        )
        .with_description("right division cancellation"),
    );
    sig
}

/// A quasigroup with a two-sided identity element.
pub fn loop_structure() -> Signature {
    let mut sig = quasigroup();
    sig.name = "Loop".to_string();
    sig.description = "A quasigroup with a two-sided identity element.".to_string();
    sig.operations
        .push(Operation::new("e", vec![], "Q", "identity element"));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("mul", "e"),
        vec!["mul", "e"],
    ));
    sig
}

pub fn lie_algebra() -> Signature {
    let mut sig = Signature::new("LieAlgebra");
    sig.description =
        "A vector space with an antisymmetric bracket satisfying the Jacobi identity."
            .to_string();
    sig.sorts.push(Sort::new("L", "Lie algebra elements"));
    sig.sorts.push(Sort::new("K", "scalar field"));
    sig.operations
        .push(Operation::new("add", vec!["L", "L"], "L", "vector addition"));
    sig.operations
        .push(Operation::new("scale", vec!["K", "L"], "L", "scalar multiplication"));
    sig.operations
        .push(Operation::new("bracket", vec!["L", "L"], "L", "Lie bracket"));
    sig.operations
        .push(Operation::new("neg", vec!["L"], "L", "additive inverse"));
    sig.operations
        .push(Operation::new("zero", vec![], "L", "zero vector"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("add"), vec!["add"]));
    sig.axioms
        .push(Axiom::new(AxiomKind::Commutativity, make_comm("add"), vec!["add"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("add", "zero"),
        vec!["add", "zero"],
    ));
    sig.axioms.push(Axiom::new(
        AxiomKind::Inverse,
        make_inverse("add", "neg", "zero"),
        vec!["add", "neg"],
    ));
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Anticommutativity,
            make_anticomm("bracket"),
            vec!["bracket", "neg"],
        )
        .with_description("antisymmetry of bracket"),
    );
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Jacobi,
            make_jacobi("bracket"),
            vec!["bracket", "add", "neg"],
        )
        .with_description("Jacobi identity"),
    );
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Bilinearity,
            make_distrib("bracket", "add"),
            vec!["bracket", "add"],
        )
        .with_description("bracket is bilinear (left)"),
    );
    sig
}

pub fn vector_space() -> Signature {
    let mut sig = Signature::new("VectorSpace");
    sig.description =
        "A module over a field with vector addition and scalar multiplication.".to_string();
    sig.sorts.push(Sort::new("V", "vectors"));
    sig.sorts.push(Sort::new("K", "scalars"));
    sig.operations
        .push(Operation::new("add", vec!["V", "V"], "V", "vector addition"));
    sig.operations
        .push(Operation::new("scale", vec!["K", "V"], "V", "scalar multiplication"));
    sig.operations
        .push(Operation::new("neg", vec!["V"], "V", "additive inverse"));
    sig.operations
        .push(Operation::new("zero", vec![], "V", "zero vector"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("add"), vec!["add"]));
    sig.axioms
        .push(Axiom::new(AxiomKind::Commutativity, make_comm("add"), vec!["add"]));
    sig.axioms.push(Axiom::new(
        AxiomKind::Identity,
        make_identity("add", "zero"),
        vec!["add", "zero"],
    ));
    sig.axioms.push(Axiom::new(
        AxiomKind::Inverse,
        make_inverse("add", "neg", "zero"),
        vec!["add", "neg"],
    ));
    sig
}

pub fn inner_product_space() -> Signature {
    let x = Expr::var("x");

    let mut sig = vector_space();
    sig.name = "InnerProductSpace".to_string();
    sig.description =
        "A vector space with a symmetric, positive-definite inner product.".to_string();
    sig.operations
        .push(Operation::new("inner", vec!["V", "V"], "K", "inner product ⟨·,·⟩"));
    sig.axioms.push(
        Axiom::new(AxiomKind::Commutativity, make_comm("inner"), vec!["inner"])
            .with_description("symmetry of inner product"),
    );
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Positivity,
            Equation::new(
                Expr::app("inner", vec![x.clone(), x.clone()]),
                Expr::app("inner", vec![x.clone(), x]),
            ),
            vec!["inner"],
        )
        .with_description("⟨x,x⟩ ≥ 0 (positivity, encoded symbolically)"),
    );
    sig
}

/// The signature of a category (objects, morphisms, composition).
pub fn category() -> Signature {
    let f = Expr::var("f");

    let mut sig = Signature::new("Category");
    sig.description =
        "Objects and morphisms with associative composition and identities.".to_string();
    sig.sorts.push(Sort::new("Ob", "objects"));
    sig.sorts.push(Sort::new("Mor", "morphisms"));
    sig.operations.push(Operation::new(
        "comp",
        vec!["Mor", "Mor"],
        "Mor",
        "morphism composition",
    ));
    sig.operations
        .push(Operation::new("id", vec!["Ob"], "Mor", "identity morphism"));
    sig.operations
        .push(Operation::new("dom", vec!["Mor"], "Ob", "domain of a morphism"));
    sig.operations
        .push(Operation::new("cod", vec!["Mor"], "Ob", "codomain of a morphism"));
    sig.axioms
        .push(Axiom::new(AxiomKind::Associativity, make_assoc("comp"), vec!["comp"]));
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Identity,
            Equation::new(
                Expr::app(
                    "comp",
                    vec![
                        f.clone(),
                        Expr::app("id", vec![Expr::app("dom", vec![f.clone()])]),
                    ],
                ),
                f.clone(),
            ),
            vec!["comp", "id", "dom"],
        )
        .with_description("right identity"),
    );
    sig.axioms.push(
        Axiom::new(
            AxiomKind::Identity,
            Equation::new(
                Expr::app(
                    "comp",
                    vec![
                        Expr::app("id", vec![Expr::app("cod", vec![f.clone()])]),
                        f.clone(),
                    ],
                ),
                f,
            ),
            vec!["comp", "id", "cod"],
        )
        .with_description("left identity"),
    );
    sig
}

/// All fourteen seed structures, in catalog order.
pub fn all() -> Vec<Signature> {
    vec![
        magma(),
        semigroup(),
        monoid(),
        group(),
        abelian_group(),
        ring(),
        field(),
        lattice(),
        quasigroup(),
        loop_structure(),
        lie_algebra(),
        vector_space(),
        inner_product_space(),
        category(),
    ]
}

/// Look up a seed structure by its catalog name.
pub fn by_name(name: &str) -> Option<Signature> {
    all().into_iter().find(|sig| sig.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_seeds_validate() {
        for sig in all() {
            sig.validate()
                .unwrap_or_else(|e| panic!("{} is malformed: {}", sig.name, e));
        }
    }

    #[test]
    fn fourteen_seeds_with_distinct_names() {
        let seeds = all();
        assert_eq!(seeds.len(), 14);
        let mut names: Vec<&str> = seeds.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn lookup_by_name() {
        assert!(by_name("Group").is_some());
        assert!(by_name("Loop").is_some());
        assert!(by_name("Nope").is_none());
    }
}
