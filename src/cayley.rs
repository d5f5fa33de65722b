//! Finite models as Cayley tables, with per-model analysis.
//!
//! A model over domain `[0, n)` stores an `n × n` matrix per binary
//! operation, a length-`n` vector per unary operation, and an element index
//! per constant. The predicates here feed scoring and reporting; none of
//! them are used by the solver itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A finite model of a signature over the integer domain `[0, n)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CayleyTable {
    pub size: usize,
    /// Binary operation name → `n × n` matrix, row-major.
    pub binary: IndexMap<String, Vec<Vec<usize>>>,
    /// Unary operation name → length-`n` vector.
    pub unary: IndexMap<String, Vec<usize>>,
    /// Constant name → element index.
    pub constants: IndexMap<String, usize>,
}

impl CayleyTable {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            binary: IndexMap::new(),
            unary: IndexMap::new(),
            constants: IndexMap::new(),
        }
    }

    /// Every row and every column of the table is a permutation of the
    /// domain (the quasigroup property).
    pub fn is_latin_square(&self, op: &str) -> bool {
        let Some(table) = self.binary.get(op) else {
            return false;
        };
        let n = self.size;
        for i in 0..n {
            let mut row_seen = vec![false; n];
            let mut col_seen = vec![false; n];
            for j in 0..n {
                row_seen[table[i][j]] = true;
                col_seen[table[j][i]] = true;
            }
            if row_seen.iter().any(|seen| !seen) || col_seen.iter().any(|seen| !seen) {
                return false;
            }
        }
        true
    }

    /// `T = Tᵀ`.
    pub fn is_commutative(&self, op: &str) -> bool {
        let Some(table) = self.binary.get(op) else {
            return false;
        };
        let n = self.size;
        for i in 0..n {
            for j in 0..i {
                if table[i][j] != table[j][i] {
                    return false;
                }
            }
        }
        true
    }

    /// Two-sided identity element index, if one exists.
    pub fn identity(&self, op: &str) -> Option<usize> {
        let table = self.binary.get(op)?;
        let n = self.size;
        (0..n).find(|&e| (0..n).all(|x| table[e][x] == x && table[x][e] == x))
    }

    /// `T[T[a][b]][c] = T[a][T[b][c]]` for all triples.
    pub fn is_associative(&self, op: &str) -> bool {
        let Some(table) = self.binary.get(op) else {
            return false;
        };
        let n = self.size;
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    if table[table[a][b]][c] != table[a][table[b][c]] {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Mean Shannon entropy (base 2) of the row value-distributions.
    pub fn row_entropy(&self, op: &str) -> f64 {
        let Some(table) = self.binary.get(op) else {
            return 0.0;
        };
        let n = self.size;
        let mut total = 0.0;
        for row in table {
            total += distribution_entropy(row, n);
        }
        total / n as f64
    }

    /// Mean Shannon entropy (base 2) of the column value-distributions.
    pub fn column_entropy(&self, op: &str) -> f64 {
        let Some(table) = self.binary.get(op) else {
            return 0.0;
        };
        let n = self.size;
        let mut total = 0.0;
        for j in 0..n {
            let col: Vec<usize> = (0..n).map(|i| table[i][j]).collect();
            total += distribution_entropy(&col, n);
        }
        total / n as f64
    }

    /// Maximum possible entropy for this domain size.
    pub fn max_entropy(&self) -> f64 {
        if self.size <= 1 {
            0.0
        } else {
            (self.size as f64).log2()
        }
    }

    /// Average of distinct-elements-per-row and distinct-elements-per-column,
    /// normalized by `n`. 1.0 for a Latin square.
    pub fn symmetry_score(&self, op: &str) -> f64 {
        let Some(table) = self.binary.get(op) else {
            return 0.0;
        };
        let n = self.size;
        let mut score = 0.0;
        for i in 0..n {
            let mut row_seen = vec![false; n];
            let mut col_seen = vec![false; n];
            for j in 0..n {
                row_seen[table[i][j]] = true;
                col_seen[table[j][i]] = true;
            }
            let row_unique = row_seen.iter().filter(|&&seen| seen).count();
            let col_unique = col_seen.iter().filter(|&&seen| seen).count();
            score += (row_unique + col_unique) as f64 / (2 * n) as f64;
        }
        score / n as f64
    }

    /// Count permutations `π` with `π(T[a][b]) = T[π(a)][π(b)]` for all
    /// `a, b`, by brute force. Returns 0 for `n > 8` (too expensive).
    pub fn automorphism_count(&self, op: &str) -> usize {
        let Some(table) = self.binary.get(op) else {
            return 0;
        };
        if self.size > 8 {
            return 0;
        }
        let n = self.size;
        let mut count = 0;
        for_each_permutation(n, |perm| {
            let is_auto = (0..n).all(|a| {
                (0..n).all(|b| perm[table[a][b]] == table[perm[a]][perm[b]])
            });
            if is_auto {
                count += 1;
            }
        });
        count
    }
}

fn distribution_entropy(values: &[usize], n: usize) -> f64 {
    let mut counts = vec![0usize; n];
    for &v in values {
        counts[v] += 1;
    }
    let mut h = 0.0;
    for &c in &counts {
        if c > 0 {
            let p = c as f64 / n as f64;
            h -= p * p.log2();
        }
    }
    h
}

/// Brute-force isomorphism check between two models for a shared binary
/// operation. Returns `false` for `n > 10` (too expensive).
pub fn models_are_isomorphic(m1: &CayleyTable, m2: &CayleyTable, op: &str) -> bool {
    if m1.size != m2.size || m1.size > 10 {
        return false;
    }
    let (Some(t1), Some(t2)) = (m1.binary.get(op), m2.binary.get(op)) else {
        return false;
    };
    let n = m1.size;
    let mut found = false;
    for_each_permutation(n, |perm| {
        if found {
            return;
        }
        let matches = (0..n).all(|a| {
            (0..n).all(|b| perm[t1[a][b]] == t2[perm[a]][perm[b]])
        });
        if matches {
            found = true;
        }
    });
    found
}

/// Visit every permutation of `{0, ..., n-1}` (Heap's algorithm).
fn for_each_permutation(n: usize, mut visit: impl FnMut(&[usize])) {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut stack = vec![0usize; n];
    visit(&perm);
    let mut i = 1;
    while i < n {
        if stack[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(stack[i], i);
            }
            visit(&perm);
            stack[i] += 1;
            i = 1;
        } else {
            stack[i] = 0;
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(rows: Vec<Vec<usize>>) -> CayleyTable {
        let mut ct = CayleyTable::new(rows.len());
        ct.binary.insert("mul".to_string(), rows);
        ct
    }

    /// Z3: addition mod 3.
    fn z3_add() -> CayleyTable {
        table_of(vec![vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]])
    }

    #[test]
    fn latin_square_detection() {
        assert!(z3_add().is_latin_square("mul"));
        let constant = table_of(vec![vec![0, 0], vec![0, 0]]);
        assert!(!constant.is_latin_square("mul"));
    }

    #[test]
    fn commutativity_and_identity() {
        let ct = z3_add();
        assert!(ct.is_commutative("mul"));
        assert_eq!(ct.identity("mul"), Some(0));

        let no_id = table_of(vec![vec![1, 1], vec![1, 1]]);
        assert_eq!(no_id.identity("mul"), None);
    }

    #[test]
    fn associativity() {
        assert!(z3_add().is_associative("mul"));
        // Fails (0*0)*1 = 0*(0*1): lhs = t[1][1] = 0, rhs = t[0][1] = 1.
        let bad = table_of(vec![vec![1, 1], vec![1, 0]]);
        assert!(!bad.is_associative("mul"));
    }

    #[test]
    fn entropy_of_latin_square_is_maximal() {
        let ct = z3_add();
        let h = ct.row_entropy("mul");
        assert!((h - ct.max_entropy()).abs() < 1e-9);
        assert!((ct.column_entropy("mul") - h).abs() < 1e-9);

        let constant = table_of(vec![vec![0, 0], vec![0, 0]]);
        assert_eq!(constant.row_entropy("mul"), 0.0);
    }

    #[test]
    fn symmetry_score_bounds() {
        assert!((z3_add().symmetry_score("mul") - 1.0).abs() < 1e-9);
        let constant = table_of(vec![vec![0, 0], vec![0, 0]]);
        assert!((constant.symmetry_score("mul") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn automorphisms_of_z3() {
        // Aut(Z/3) has order 2 (identity and negation).
        assert_eq!(z3_add().automorphism_count("mul"), 2);
    }

    #[test]
    fn isomorphism_by_relabeling() {
        let m1 = z3_add();
        // Relabel via the permutation swapping 1 and 2 (negation mod 3).
        let perm = [0usize, 2, 1];
        let mut rows = vec![vec![0usize; 3]; 3];
        let src = &m1.binary["mul"];
        for a in 0..3 {
            for b in 0..3 {
                rows[perm[a]][perm[b]] = perm[src[a][b]];
            }
        }
        let m2 = table_of(rows);
        assert!(models_are_isomorphic(&m1, &m2, "mul"));

        let other = table_of(vec![vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        assert!(!models_are_isomorphic(&m1, &other, "mul"));
    }

    #[test]
    fn doc_round_trip() {
        let mut ct = z3_add();
        ct.unary.insert("inv".to_string(), vec![0, 2, 1]);
        ct.constants.insert("e".to_string(), 0);
        let json = serde_json::to_string(&ct).unwrap();
        let back: CayleyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(ct, back);
    }
}
