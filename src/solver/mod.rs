mod analyze;
mod assignment;
mod clause;
mod data;
mod decide;
mod log;
mod propagate;
mod trail;
mod watch;

use tracing::debug;

use crate::dimacs::{Dimacs, DimacsError};
use analyze::{AnalyzeResult, AnalyzeState};
pub use clause::resolve;
use clause::{ClauseDB, ClauseFlags};
use data::LitVec;
pub use data::{Lit, Var};
use decide::Brancher;
use propagate::PropagationResult;
use trail::{Trail, TrailReason};
use watch::Watch;

const DEFAULT_SEED: u64 = 0;

/// Counters over a whole solve, surfaced through [`Solver::stats`].
#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub learnt_clauses: u64,
}

pub struct Solver {
    clause_db: ClauseDB,

    watches: LitVec<Vec<Watch>>,

    trail: Trail,

    // Where on the trail unit propagation has to continue.
    unpropagated_pos: usize,

    // The input formula is trivially unsat because of an empty clause or
    // contradictory unit clauses.
    trivially_unsat: bool,

    /// Scratch state for conflict analysis, reset for each conflict.
    analyze_state: AnalyzeState,

    brancher: Brancher,

    stats: Stats,
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

pub struct Model<'a> {
    assignment: &'a Trail,
}

impl<'a> Model<'a> {
    /// Get truth assignment of a literal.
    pub fn lit(&self, l: i32) -> bool {
        self.assignment.is_lit_satisfied(Lit::new(l))
    }

    /// The model in signed DIMACS form, one entry per variable.
    pub fn as_vec(&self) -> Vec<i32> {
        (1..=self.assignment.total_vars() as i32)
            .map(|i| if self.lit(i) { i } else { -i })
            .collect()
    }
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Model").field(&self.as_vec()).finish()
    }
}

#[derive(Debug)]
pub enum Verdict<'a> {
    Sat(Model<'a>),
    Unsat,
}

impl<'a> Verdict<'a> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Verdict::Unsat)
    }

    pub fn unwrap_sat(self) -> Model<'a> {
        match self {
            Verdict::Sat(model) => model,
            Verdict::Unsat => panic!("Verdict is not SAT."),
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver whose branching RNG starts from `seed`. Two solvers with
    /// the same seed and the same clause sequence behave identically.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clause_db: ClauseDB::default(),
            watches: LitVec::new(),
            trail: Trail::default(),
            unpropagated_pos: 0,
            trivially_unsat: false,
            analyze_state: AnalyzeState::default(),
            brancher: Brancher::new(seed),
            stats: Stats::default(),
        }
    }

    pub fn from_dimacs(input: &str) -> Result<Solver, DimacsError> {
        Self::from_dimacs_with_seed(input, DEFAULT_SEED)
    }

    pub fn from_dimacs_with_seed(input: &str, seed: u64) -> Result<Solver, DimacsError> {
        let clauses = Dimacs::parse(input)?;

        let mut solver = Solver::with_seed(seed);
        for clause in clauses {
            solver.add_clause(clause);
        }

        Ok(solver)
    }

    /// Remove duplicated literals.
    /// Returns true if the clause is a tautology, i.e. contains a positive
    /// and negative literal of the same variable.
    fn normalise_clause(cls: &mut Vec<Lit>) -> bool {
        cls.sort_by_key(|lit| lit.get());
        cls.dedup();

        cls.windows(2).any(|w| w[0].var() == w[1].var())
    }

    pub fn add_clause<I>(&mut self, cls: I)
    where
        I: IntoIterator<Item = i32>,
    {
        let mut cls: Vec<Lit> = cls.into_iter().map(Lit::new).collect();

        // The variable set derives from the input formula, so variables
        // are registered even when their clause is dropped below.
        if let Some(&max_lit) = cls.iter().max_by_key(|l| l.var().get()) {
            self.trail.expand(max_lit.var());
            self.watches.expand(Lit::from(max_lit.var()), Vec::new());
        }

        if Self::normalise_clause(&mut cls) {
            // Tautologies hold under every assignment.
            return;
        }

        match cls.len() {
            0 => {
                self.trivially_unsat = true;
            }
            1 => {
                if self.trail.is_lit_unsatisfied(cls[0]) {
                    self.trivially_unsat = true;
                } else if self.trail.is_lit_unassigned(cls[0]) {
                    self.trail.assign_lit(cls[0], TrailReason::Axiom);
                }
            }
            _ => {
                let cls_idx = self.clause_db.insert_clause(&cls, ClauseFlags::empty());
                self.watch_clause(cls_idx);
            }
        }
    }

    pub fn solve(&mut self) -> Verdict<'_> {
        if self.trivially_unsat {
            return Verdict::Unsat;
        }

        loop {
            self.log_state();
            let result = self.propagate();

            if let PropagationResult::Contradiction(conflicting_clause) = result {
                self.stats.conflicts += 1;
                if self.analyze_contradiction(conflicting_clause) == AnalyzeResult::Unsat {
                    debug!("formula is unsat");
                    return Verdict::Unsat;
                }
                // Analysis asserted the learnt clause's literal; unit
                // propagation has to run again from the backjump point.
                continue;
            }

            debug_assert!(self.check_watches());

            if self.trail.assignment_complete() {
                // With every variable assigned and propagation quiet the
                // assignment has to be a model; anything else is a bug.
                assert!(
                    self.check_assignment(),
                    "assignment does not satisfy the input formula"
                );
                let model = Model {
                    assignment: &self.trail,
                };
                debug!("satisfying assignment found: {:?}", model.as_vec());
                return Verdict::Sat(model);
            }

            match self.brancher.pick(&self.trail) {
                Some(lit) => {
                    debug!("deciding {lit}");
                    self.stats.decisions += 1;
                    self.trail.assign_lit(lit, TrailReason::Decision);
                }
                None => {
                    unreachable!("unassigned variables remain, so the brancher must find one")
                }
            }
        }
    }

    /// Check that the current assignment satisfies every stored clause.
    /// Unit input clauses sit on the trail as root assignments and are
    /// satisfied by construction.
    fn check_assignment(&self) -> bool {
        self.clause_db
            .iter()
            .all(|clause| self.trail.is_clause_satisfied(clause))
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn solve_all(clauses: &[Vec<i32>], seed: u64) -> Option<Vec<i32>> {
        let mut solver = Solver::with_seed(seed);
        for cls in clauses {
            solver.add_clause(cls.iter().copied());
        }
        match solver.solve() {
            Verdict::Sat(model) => Some(model.as_vec()),
            Verdict::Unsat => None,
        }
    }

    #[test]
    fn empty_formula_is_sat() {
        let mut solver = Solver::new();
        let model = solver.solve().unwrap_sat();
        assert_eq!(model.as_vec(), Vec::<i32>::new());
    }

    #[test]
    fn empty_clause_is_unsat() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2]);
        solver.add_clause([]);
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn contradicting_units_are_unsat() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1]);
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn single_unit_is_sat() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        let model = solver.solve().unwrap_sat();
        assert!(model.lit(1));
    }

    #[test]
    fn repeated_unit_is_accepted() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([1]);
        assert!(solver.solve().is_sat());
    }

    #[test]
    fn simple_sat_forces_two() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2]);
        solver.add_clause([-1, 2]);
        let model = solver.solve().unwrap_sat();
        assert!(model.lit(2));
    }

    #[test]
    fn backjump_unsat() {
        // Either polarity of 1 forces a conflict on 3.
        let mut solver = Solver::new();
        solver.add_clause([1, 2]);
        solver.add_clause([1, -2]);
        solver.add_clause([-1, 3]);
        solver.add_clause([-1, -3]);
        assert!(solver.solve().is_unsat());
    }

    #[test]
    fn same_seed_gives_same_model() {
        let clauses: Vec<Vec<i32>> = vec![
            vec![1, 2, -3],
            vec![-2, 4],
            vec![3, -4, 5],
            vec![-1, -5, 6],
            vec![2, 5, -6],
        ];
        assert_eq!(solve_all(&clauses, 7), solve_all(&clauses, 7));
    }

    fn dimacs_lit(index: usize, positive: bool) -> i32 {
        let v = (index + 1) as i32;
        if positive {
            v
        } else {
            -v
        }
    }

    /// A random formula together with the assignment it was planted
    /// around: every clause contains one literal the planted assignment
    /// satisfies.
    fn planted_formula() -> impl Strategy<Value = (Vec<bool>, Vec<Vec<i32>>)> {
        prop::collection::vec(any::<bool>(), 1..12).prop_flat_map(|polarity| {
            let n = polarity.len();
            let clause = (0..n, prop::collection::vec((0..n, any::<bool>()), 0..3));
            prop::collection::vec(clause, 1..40).prop_map(move |raw| {
                let formula = raw
                    .into_iter()
                    .map(|(anchor, extra)| {
                        let mut cls = vec![dimacs_lit(anchor, polarity[anchor])];
                        cls.extend(
                            extra
                                .into_iter()
                                .map(|(var, positive)| dimacs_lit(var, positive)),
                        );
                        cls
                    })
                    .collect();
                (polarity.clone(), formula)
            })
        })
    }

    fn planted_satisfies(polarity: &[bool], lit: Lit) -> bool {
        polarity[(lit.var().get() - 1) as usize] == lit.is_pos()
    }

    proptest! {
        #[test]
        fn planted_formulas_solve_sat((polarity, formula) in planted_formula()) {
            let mut solver = Solver::with_seed(1);
            for cls in &formula {
                solver.add_clause(cls.iter().copied());
            }

            let model_satisfies_input = {
                let verdict = solver.solve();
                prop_assert!(verdict.is_sat());
                let model = verdict.unwrap_sat();
                formula
                    .iter()
                    .all(|cls| cls.iter().any(|&l| model.lit(l)))
            };
            prop_assert!(model_satisfies_input);

            // Learnt clauses are consequences of the input, so the
            // planted assignment has to satisfy them as well.
            for learnt in solver.clause_db.iter_learnt() {
                prop_assert!(learnt.iter().any(|&lit| planted_satisfies(&polarity, lit)));
            }
        }
    }
}
