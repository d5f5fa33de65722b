//! Bounded backtracking search over a ground constraint system.
//!
//! Chronological depth-first search over the cell variables in allocation
//! order. After each assignment, every constraint whose support touches the
//! assigned variable is re-evaluated; a constraint with both sides known and
//! unequal prunes the branch. Found models are excluded from further
//! enumeration by blocking clauses requiring at least one cell to differ.
//!
//! The search respects a wall-clock deadline and a cooperative cancellation
//! flag, both checked between nodes; models collected before an interruption
//! are kept.

use std::time::Instant;

use super::encode::{term_support, Encoding, Term, VarId};
use super::CancelToken;

/// How an enumeration ended.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// The whole space was explored; the models listed are all of them.
    Exhausted(Vec<Vec<usize>>),
    /// Stopped after collecting the requested number of models.
    Capped(Vec<Vec<usize>>),
    /// Deadline or cancellation hit first; the listing is partial.
    TimedOut(Vec<Vec<usize>>),
}

/// One enumeration run over an [`Encoding`].
pub struct Searcher<'a> {
    encoding: &'a Encoding,
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl<'a> Searcher<'a> {
    pub fn new(encoding: &'a Encoding) -> Self {
        Self {
            encoding,
            deadline: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Enumerate up to `max_models` satisfying assignments.
    pub fn enumerate(self, max_models: usize) -> SearchOutcome {
        let enc = self.encoding;

        if max_models == 0 {
            return SearchOutcome::Capped(Vec::new());
        }

        // Constraints with no variable support are decided up front.
        let mut var_constraints: Vec<Vec<usize>> = vec![Vec::new(); enc.num_vars];
        let mut support = Vec::new();
        for (ci, constraint) in enc.constraints.iter().enumerate() {
            support.clear();
            term_support(&constraint.lhs, enc.n, &mut support);
            term_support(&constraint.rhs, enc.n, &mut support);
            if support.is_empty() {
                let empty: Vec<Option<usize>> = Vec::new();
                let lhs = eval_term(&constraint.lhs, &empty, enc.n);
                let rhs = eval_term(&constraint.rhs, &empty, enc.n);
                if lhs != rhs {
                    return SearchOutcome::Exhausted(Vec::new());
                }
                continue;
            }
            support.sort_unstable();
            support.dedup();
            for &v in &support {
                var_constraints[v].push(ci);
            }
        }

        let mut lex_by_var: Vec<Vec<usize>> = vec![Vec::new(); enc.num_vars];
        for (pi, &(a, b)) in enc.lex_pairs.iter().enumerate() {
            lex_by_var[a].push(pi);
            lex_by_var[b].push(pi);
        }

        let mut state = State {
            encoding: enc,
            var_constraints,
            lex_by_var,
            assignment: vec![None; enc.num_vars],
            models: Vec::new(),
            blocking: Vec::new(),
            max_models,
            deadline: self.deadline,
            cancel: self.cancel,
            nodes: 0,
            stop: Stop::Running,
        };
        state.dfs(0);

        match state.stop {
            Stop::Running => SearchOutcome::Exhausted(state.models),
            Stop::Capped => SearchOutcome::Capped(state.models),
            Stop::TimedOut => SearchOutcome::TimedOut(state.models),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stop {
    Running,
    Capped,
    TimedOut,
}

struct State<'a> {
    encoding: &'a Encoding,
    var_constraints: Vec<Vec<usize>>,
    lex_by_var: Vec<Vec<usize>>,
    assignment: Vec<Option<usize>>,
    models: Vec<Vec<usize>>,
    blocking: Vec<Vec<usize>>,
    max_models: usize,
    deadline: Option<Instant>,
    cancel: CancelToken,
    nodes: u64,
    stop: Stop,
}

impl State<'_> {
    fn dfs(&mut self, var: VarId) {
        if self.stop != Stop::Running {
            return;
        }

        self.nodes += 1;
        if self.nodes & 0x3f == 0 {
            let deadline_hit = self
                .deadline
                .map(|d| Instant::now() >= d)
                .unwrap_or(false);
            if deadline_hit || self.cancel.is_cancelled() {
                self.stop = Stop::TimedOut;
                return;
            }
        }

        if var == self.encoding.num_vars {
            self.record_leaf();
            return;
        }

        for val in 0..self.encoding.n {
            self.assignment[var] = Some(val);
            if self.consistent_after(var) {
                self.dfs(var + 1);
                if self.stop != Stop::Running {
                    self.assignment[var] = None;
                    return;
                }
            }
        }
        self.assignment[var] = None;
    }

    fn record_leaf(&mut self) {
        // Every blocking clause must be satisfied: some cell differs from
        // each already-recorded model.
        let complete: Vec<usize> = self
            .assignment
            .iter()
            .map(|v| v.unwrap_or_default())
            .collect();
        for blocked in &self.blocking {
            if blocked == &complete {
                return;
            }
        }
        self.blocking.push(complete.clone());
        self.models.push(complete);
        if self.models.len() >= self.max_models {
            self.stop = Stop::Capped;
        }
    }

    fn consistent_after(&self, var: VarId) -> bool {
        for &ci in &self.var_constraints[var] {
            let constraint = &self.encoding.constraints[ci];
            let lhs = eval_term(&constraint.lhs, &self.assignment, self.encoding.n);
            let rhs = eval_term(&constraint.rhs, &self.assignment, self.encoding.n);
            if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
                if lhs != rhs {
                    return false;
                }
            }
        }
        for &pi in &self.lex_by_var[var] {
            let (a, b) = self.encoding.lex_pairs[pi];
            if let (Some(a_val), Some(b_val)) = (self.assignment[a], self.assignment[b]) {
                if a_val > b_val {
                    return false;
                }
            }
        }
        true
    }
}

/// Evaluate a ground term under a partial assignment; `None` while any cell
/// it depends on is still unassigned.
fn eval_term(term: &Term, assignment: &[Option<usize>], n: usize) -> Option<usize> {
    match term {
        Term::Lit(v) => Some(*v),
        Term::Cell(id) => assignment.get(*id).copied().flatten(),
        Term::Lookup1 { base, idx } => {
            let i = eval_term(idx, assignment, n)?;
            assignment.get(base + i).copied().flatten()
        }
        Term::Lookup2 { base, row, col } => {
            let i = eval_term(row, assignment, n)?;
            let j = eval_term(col, assignment, n)?;
            assignment.get(base + i * n + j).copied().flatten()
        }
    }
}
