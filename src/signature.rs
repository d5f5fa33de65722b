//! Algebraic signatures: sorts, typed operations, equational axioms.
//!
//! A signature is the symbolic skeleton of an algebraic structure. Moves
//! produce new signatures from old ones; the model finder searches for finite
//! models of a signature; the scorer ranks signatures. The serialization
//! documents at the bottom of this module are the JSON boundary shared with
//! the library collaborator.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ast::{Equation, Expr};
use crate::parser::{parse_equation, ParseError};

/// The closed set of standard axiom shapes in universal algebra.
///
/// `Custom` covers axioms with no canonical shape (internalization
/// adjunctions, deformed laws, quasigroup cancellation, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxiomKind {
    Associativity,
    Commutativity,
    Identity,
    Inverse,
    Distributivity,
    Anticommutativity,
    Idempotence,
    Nilpotence,
    Jacobi,
    Positivity,
    Bilinearity,
    Homomorphism,
    Functoriality,
    Absorption,
    Modularity,
    SelfDistributivity,
    RightSelfDistributivity,
    Custom,
}

impl AxiomKind {
    /// The canonical SCREAMING_SNAKE name, as used in serialized documents
    /// and fingerprints.
    pub fn as_str(&self) -> &'static str {
        match self {
            AxiomKind::Associativity => "ASSOCIATIVITY",
            AxiomKind::Commutativity => "COMMUTATIVITY",
            AxiomKind::Identity => "IDENTITY",
            AxiomKind::Inverse => "INVERSE",
            AxiomKind::Distributivity => "DISTRIBUTIVITY",
            AxiomKind::Anticommutativity => "ANTICOMMUTATIVITY",
            AxiomKind::Idempotence => "IDEMPOTENCE",
            AxiomKind::Nilpotence => "NILPOTENCE",
            AxiomKind::Jacobi => "JACOBI",
            AxiomKind::Positivity => "POSITIVITY",
            AxiomKind::Bilinearity => "BILINEARITY",
            AxiomKind::Homomorphism => "HOMOMORPHISM",
            AxiomKind::Functoriality => "FUNCTORIALITY",
            AxiomKind::Absorption => "ABSORPTION",
            AxiomKind::Modularity => "MODULARITY",
            AxiomKind::SelfDistributivity => "SELF_DISTRIBUTIVITY",
            AxiomKind::RightSelfDistributivity => "RIGHT_SELF_DISTRIBUTIVITY",
            AxiomKind::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for AxiomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sort (type) in the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub name: String,
    pub description: String,
}

impl Sort {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A typed operation: `name : domain_0 × ... × domain_{k-1} → codomain`.
///
/// Nullary operations model constants, unary operations map one sort to
/// another (or to itself), binary operations take two arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub domain: Vec<String>,
    pub codomain: String,
    pub description: String,
}

impl Operation {
    pub fn new(
        name: impl Into<String>,
        domain: Vec<&str>,
        codomain: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into_iter().map(String::from).collect(),
            codomain: codomain.into(),
            description: description.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.domain.len()
    }
}

/// An equational law, tagged with its canonical shape and the operations it
/// constrains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Axiom {
    pub kind: AxiomKind,
    pub equation: Equation,
    pub operations: Vec<String>,
    pub description: String,
}

impl Axiom {
    pub fn new(kind: AxiomKind, equation: Equation, operations: Vec<&str>) -> Self {
        Self {
            kind,
            equation,
            operations: operations.into_iter().map(String::from).collect(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Does this axiom constrain the named operation?
    pub fn mentions(&self, op_name: &str) -> bool {
        self.operations.iter().any(|o| o == op_name)
    }
}

/// A complete algebraic signature: sorts + operations + axioms, with
/// provenance (`derivation_chain`) and free-form metadata.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Signature {
    pub name: String,
    pub sorts: Vec<Sort>,
    pub operations: Vec<Operation>,
    pub axioms: Vec<Axiom>,
    pub description: String,
    /// One entry per move that produced this signature from a seed.
    pub derivation_chain: Vec<String>,
    pub metadata: HashMap<String, String>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn sort_names(&self) -> Vec<&str> {
        self.sorts.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn op_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }

    pub fn get_op(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn ops_by_arity(&self, arity: usize) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| op.arity() == arity)
            .collect()
    }

    /// Is there an axiom of `kind` whose operation list mentions `op_name`?
    pub fn has_axiom_on(&self, kind: AxiomKind, op_name: &str) -> bool {
        self.axioms
            .iter()
            .any(|a| a.kind == kind && a.mentions(op_name))
    }

    /// Check the signature invariants:
    ///
    /// 1. every sort referenced by operations resolves to a declared sort;
    /// 2. every operation referenced inside axiom equations resolves to a
    ///    declared operation with matching arity (constants resolve to
    ///    nullary operations);
    /// 3. operation names and sort names are unique, and every axiom
    ///    constrains a non-empty operation list that resolves.
    pub fn validate(&self) -> SignatureResult<()> {
        let mut sort_names = HashSet::new();
        for sort in &self.sorts {
            if !sort_names.insert(sort.name.as_str()) {
                return Err(SignatureError::DuplicateSort(sort.name.clone()));
            }
        }

        let mut op_names = HashSet::new();
        for op in &self.operations {
            if !op_names.insert(op.name.as_str()) {
                return Err(SignatureError::DuplicateOperation(op.name.clone()));
            }
            for domain_sort in &op.domain {
                if !sort_names.contains(domain_sort.as_str()) {
                    return Err(SignatureError::UnknownSort {
                        sort: domain_sort.clone(),
                        context: format!("domain of operation '{}'", op.name),
                    });
                }
            }
            if !sort_names.contains(op.codomain.as_str()) {
                return Err(SignatureError::UnknownSort {
                    sort: op.codomain.clone(),
                    context: format!("codomain of operation '{}'", op.name),
                });
            }
        }

        for axiom in &self.axioms {
            if axiom.operations.is_empty() {
                return Err(SignatureError::EmptyAxiomOperations { kind: axiom.kind });
            }
            for op_name in &axiom.operations {
                if !op_names.contains(op_name.as_str()) {
                    return Err(SignatureError::UnknownOperation {
                        op: op_name.clone(),
                        context: format!("operation list of {} axiom", axiom.kind),
                    });
                }
            }
            self.check_expr(&axiom.equation.lhs, axiom.kind)?;
            self.check_expr(&axiom.equation.rhs, axiom.kind)?;
        }

        Ok(())
    }

    fn check_expr(&self, expr: &Expr, kind: AxiomKind) -> SignatureResult<()> {
        match expr {
            Expr::Var(_) => Ok(()),
            Expr::Const(name) => match self.get_op(name) {
                Some(op) if op.arity() == 0 => Ok(()),
                Some(op) => Err(SignatureError::ArityMismatch {
                    op: name.clone(),
                    expected: op.arity(),
                    got: 0,
                }),
                None => Err(SignatureError::UnknownOperation {
                    op: name.clone(),
                    context: format!("equation of {} axiom", kind),
                }),
            },
            Expr::App { op, args } => {
                match self.get_op(op) {
                    Some(decl) if decl.arity() == args.len() => {}
                    Some(decl) => {
                        return Err(SignatureError::ArityMismatch {
                            op: op.clone(),
                            expected: decl.arity(),
                            got: args.len(),
                        })
                    }
                    None => {
                        return Err(SignatureError::UnknownOperation {
                            op: op.clone(),
                            context: format!("equation of {} axiom", kind),
                        })
                    }
                }
                for a in args {
                    self.check_expr(a, kind)?;
                }
                Ok(())
            }
        }
    }

    /// Canonical fingerprint for novelty checks.
    ///
    /// A pure function of (sort count, sorted operation arities, sorted axiom
    /// kind names): two signatures that differ only in the naming of sorts,
    /// operations, or variables fingerprint identically. This is a fast
    /// filter, not an isomorphism test; distinct equations sharing a kind
    /// set collide deliberately.
    pub fn fingerprint(&self) -> String {
        let mut op_arities: Vec<usize> = self.operations.iter().map(Operation::arity).collect();
        op_arities.sort_unstable();
        let mut axiom_kinds: Vec<&str> = self.axioms.iter().map(|a| a.kind.as_str()).collect();
        axiom_kinds.sort_unstable();

        let canon = serde_json::json!({
            "sorts": self.sorts.len(),
            "op_arities": op_arities,
            "axiom_kinds": axiom_kinds,
        });
        // serde_json maps are sorted by key, so the blob is canonical.
        let blob = canon.to_string();
        let digest = Sha256::digest(blob.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        hex[..16].to_string()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorts: Vec<&str> = self.sort_names();
        let ops: Vec<String> = self
            .operations
            .iter()
            .map(|op| format!("{}/{}", op.name, op.arity()))
            .collect();
        write!(
            f,
            "Sig({}: sorts=[{}], ops=[{}], axioms={})",
            self.name,
            sorts.join(", "),
            ops.join(", "),
            self.axioms.len()
        )
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Violations of the signature invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureError {
    UnknownSort { sort: String, context: String },
    UnknownOperation { op: String, context: String },
    ArityMismatch { op: String, expected: usize, got: usize },
    DuplicateSort(String),
    DuplicateOperation(String),
    EmptyAxiomOperations { kind: AxiomKind },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::UnknownSort { sort, context } => {
                write!(f, "unknown sort '{}' in {}", sort, context)
            }
            SignatureError::UnknownOperation { op, context } => {
                write!(f, "unknown operation '{}' in {}", op, context)
            }
            SignatureError::ArityMismatch { op, expected, got } => {
                write!(
                    f,
                    "operation '{}' has arity {} but is applied to {} argument(s)",
                    op, expected, got
                )
            }
            SignatureError::DuplicateSort(name) => write!(f, "duplicate sort name '{}'", name),
            SignatureError::DuplicateOperation(name) => {
                write!(f, "duplicate operation name '{}'", name)
            }
            SignatureError::EmptyAxiomOperations { kind } => {
                write!(f, "{} axiom constrains no operations", kind)
            }
        }
    }
}

impl std::error::Error for SignatureError {}

pub type SignatureResult<T> = Result<T, SignatureError>;

/// Errors while reconstructing a signature from its serialized document.
#[derive(Debug)]
pub enum DocError {
    /// An equation string failed to parse back into an AST.
    Equation { axiom_kind: AxiomKind, error: ParseError },
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocError::Equation { axiom_kind, error } => {
                write!(f, "bad equation in {} axiom: {}", axiom_kind, error)
            }
        }
    }
}

impl std::error::Error for DocError {}

// ============================================================================
// SERIALIZATION DOCUMENTS
// ============================================================================

/// Serialized form of a [`Sort`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SortDoc {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Serialized form of an [`Operation`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationDoc {
    pub name: String,
    pub domain: Vec<String>,
    pub codomain: String,
    #[serde(default)]
    pub description: String,
}

/// Serialized form of an [`Axiom`]; the equation is its rendered string.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AxiomDoc {
    pub kind: AxiomKind,
    pub equation: String,
    pub operations: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Serialized form of a [`Signature`], as persisted inside discovery
/// documents. The fingerprint is recorded for readers but recomputed on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureDoc {
    pub name: String,
    pub sorts: Vec<SortDoc>,
    pub operations: Vec<OperationDoc>,
    pub axioms: Vec<AxiomDoc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub derivation_chain: Vec<String>,
    pub fingerprint: String,
}

impl Signature {
    pub fn to_doc(&self) -> SignatureDoc {
        SignatureDoc {
            name: self.name.clone(),
            sorts: self
                .sorts
                .iter()
                .map(|s| SortDoc {
                    name: s.name.clone(),
                    description: s.description.clone(),
                })
                .collect(),
            operations: self
                .operations
                .iter()
                .map(|op| OperationDoc {
                    name: op.name.clone(),
                    domain: op.domain.clone(),
                    codomain: op.codomain.clone(),
                    description: op.description.clone(),
                })
                .collect(),
            axioms: self
                .axioms
                .iter()
                .map(|a| AxiomDoc {
                    kind: a.kind,
                    equation: a.equation.to_string(),
                    operations: a.operations.clone(),
                    description: a.description.clone(),
                })
                .collect(),
            description: self.description.clone(),
            derivation_chain: self.derivation_chain.clone(),
            fingerprint: self.fingerprint(),
        }
    }

    /// Reconstruct a signature from its document form, re-parsing the
    /// rendered equation strings against the document's own operation set.
    pub fn from_doc(doc: &SignatureDoc) -> Result<Signature, DocError> {
        let constants: HashSet<String> = doc
            .operations
            .iter()
            .filter(|op| op.domain.is_empty())
            .map(|op| op.name.clone())
            .collect();
        let op_names: HashSet<String> =
            doc.operations.iter().map(|op| op.name.clone()).collect();

        let mut axioms = Vec::with_capacity(doc.axioms.len());
        for ax in &doc.axioms {
            let equation =
                parse_equation(&ax.equation, &constants, &op_names).map_err(|error| {
                    DocError::Equation {
                        axiom_kind: ax.kind,
                        error,
                    }
                })?;
            axioms.push(Axiom {
                kind: ax.kind,
                equation,
                operations: ax.operations.clone(),
                description: ax.description.clone(),
            });
        }

        Ok(Signature {
            name: doc.name.clone(),
            sorts: doc
                .sorts
                .iter()
                .map(|s| Sort::new(s.name.clone(), s.description.clone()))
                .collect(),
            operations: doc
                .operations
                .iter()
                .map(|op| Operation {
                    name: op.name.clone(),
                    domain: op.domain.clone(),
                    codomain: op.codomain.clone(),
                    description: op.description.clone(),
                })
                .collect(),
            axioms,
            description: doc.description.clone(),
            derivation_chain: doc.derivation_chain.clone(),
            metadata: HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{make_assoc, make_comm};

    fn semigroup_like(sort: &str, op: &str) -> Signature {
        let mut sig = Signature::new("Test");
        sig.sorts.push(Sort::new(sort, "carrier"));
        sig.operations
            .push(Operation::new(op, vec![sort, sort], sort, ""));
        sig.axioms
            .push(Axiom::new(AxiomKind::Associativity, make_assoc(op), vec![op]));
        sig
    }

    #[test]
    fn fingerprint_invariant_under_renaming() {
        let a = semigroup_like("S", "mul");
        let b = semigroup_like("T", "op");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn fingerprint_sensitive_to_axiom_kinds() {
        let a = semigroup_like("S", "mul");
        let mut b = semigroup_like("S", "mul");
        b.axioms.push(Axiom::new(
            AxiomKind::Commutativity,
            make_comm("mul"),
            vec!["mul"],
        ));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(semigroup_like("S", "mul").validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_operation_in_equation() {
        let mut sig = semigroup_like("S", "mul");
        sig.axioms
            .push(Axiom::new(AxiomKind::Commutativity, make_comm("bogus"), vec!["mul"]));
        match sig.validate() {
            Err(SignatureError::UnknownOperation { op, .. }) => assert_eq!(op, "bogus"),
            other => panic!("expected UnknownOperation, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_unknown_sort() {
        let mut sig = semigroup_like("S", "mul");
        sig.operations
            .push(Operation::new("f", vec!["S"], "Missing", ""));
        assert!(matches!(
            sig.validate(),
            Err(SignatureError::UnknownSort { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_axiom_operations() {
        let mut sig = semigroup_like("S", "mul");
        sig.axioms
            .push(Axiom::new(AxiomKind::Commutativity, make_comm("mul"), vec![]));
        assert!(matches!(
            sig.validate(),
            Err(SignatureError::EmptyAxiomOperations { .. })
        ));
    }

    #[test]
    fn axiom_kind_doc_names() {
        assert_eq!(AxiomKind::SelfDistributivity.as_str(), "SELF_DISTRIBUTIVITY");
        let json = serde_json::to_string(&AxiomKind::RightSelfDistributivity).unwrap();
        assert_eq!(json, "\"RIGHT_SELF_DISTRIBUTIVITY\"");
    }
}
