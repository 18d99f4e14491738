use tracing::debug;

use super::{
    clause::{Clause, ClauseFlags, ClauseIdx},
    data::VarVec,
    trail::{Trail, TrailReason},
    Lit, Solver, Var,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnalyzeResult {
    Unsat,
    Done,
}

/// Scratch state for conflict analysis, reset for every conflict.
#[derive(Default)]
pub(crate) struct AnalyzeState {
    seen: VarVec<bool>,

    /// Learnt 1UIP clause under construction. Holds the literals below
    /// the conflict level; the asserting literal is added last.
    learnt: Vec<Lit>,

    /// Literals at the conflict level whose antecedents are still pending.
    open: u32,
}

impl AnalyzeState {
    fn reset(&mut self, num_vars: usize) {
        self.seen.fill(false);
        self.seen.resize(num_vars, false);
        self.learnt.clear();
        self.open = 0;
    }

    fn analyze_reason(&mut self, skip: Option<Lit>, reason: Clause, trail: &Trail, conflict_level: u32) {
        debug!("analyzing reason clause {reason:?}");
        for &lit in reason {
            if skip == Some(lit) {
                continue;
            }
            self.analyze_literal(lit, trail, conflict_level);
        }
    }

    fn analyze_literal(&mut self, lit: Lit, trail: &Trail, conflict_level: u32) {
        if self.has_seen(lit.var()) {
            return;
        }

        let lit_level = trail
            .decision_level_of(lit)
            .expect("literals reached by analysis are assigned");

        debug_assert!(trail.is_lit_unsatisfied(lit));
        debug_assert!(lit_level <= conflict_level);

        if lit_level == 0 {
            // Root-false literals can never become true again; they do
            // not belong in the learnt clause.
            return;
        }

        self.seen[lit.var()] = true;

        if lit_level < conflict_level {
            debug!("literal {lit} is below the conflict level, goes into the learnt clause");
            self.learnt.push(lit);
        } else {
            self.open += 1;
        }
    }

    fn has_seen(&self, var: Var) -> bool {
        self.seen[var]
    }
}

impl Solver {
    /// First-UIP conflict analysis.
    ///
    /// Learns a clause from the conflict, backjumps, and asserts the UIP
    /// literal with the learnt clause as its antecedent. Returns `Unsat`
    /// iff the conflict arose at decision level 0.
    pub(crate) fn analyze_contradiction(&mut self, clause: ClauseIdx) -> AnalyzeResult {
        debug!("analyzing contradiction, trail: {}", self.trail.fmt_trail());

        let conflict_clause = self.clause_db.get(clause);
        debug_assert!(conflict_clause
            .iter()
            .all(|&lit| self.trail.is_lit_unsatisfied(lit)));

        let conflict_level = self.trail.current_decision_level();
        if conflict_level == 0 {
            return AnalyzeResult::Unsat;
        }

        self.analyze_state.reset(self.trail.total_vars());

        let mut trail_pos = self.trail.assigned_vars();
        let mut reason = conflict_clause;
        let mut maybe_uip = None;

        // Resolve the conflict clause against antecedents of conflict
        // level literals, most recently assigned first, until a single
        // conflict level literal remains. That literal is the first UIP.
        loop {
            self.analyze_state
                .analyze_reason(maybe_uip, reason, &self.trail, conflict_level);

            let uip = loop {
                debug_assert!(trail_pos > 0);

                trail_pos -= 1;
                let lit = self.trail.get(trail_pos).unwrap().lit;

                if !self.analyze_state.has_seen(lit.var()) {
                    continue;
                }
                if self.trail.decision_level_of(lit).unwrap() == conflict_level {
                    break lit;
                }
            };
            maybe_uip = Some(uip);

            if self.analyze_state.open == 1 {
                break;
            }
            self.analyze_state.open -= 1;

            reason = self.clause_db.get(self.trail.reason_cls(uip));
        }

        let uip = maybe_uip.expect("a conflict involves at least one conflict level literal");
        self.analyze_state.learnt.push(-uip);

        // Order the clause for watching: the asserting literal goes in
        // front, the highest-level remaining literal next to it. After
        // the backjump those two are the last to become unassigned, which
        // is exactly what the watch invariant needs.
        let learnt = &mut self.analyze_state.learnt;
        let len = learnt.len();
        learnt.swap(0, len - 1);

        let backjump_level = if len == 1 {
            0
        } else {
            let mut max_i = 1;
            for i in 2..len {
                let level_i = self.trail.decision_level_of(learnt[i]).unwrap();
                if level_i > self.trail.decision_level_of(learnt[max_i]).unwrap() {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            self.trail.decision_level_of(learnt[1]).unwrap()
        };
        debug_assert!(backjump_level < conflict_level);

        debug!(
            "learnt 1UIP clause {:?}, backjumping to level {backjump_level}",
            self.analyze_state.learnt
        );

        self.unpropagated_pos = self.trail.backtrack(backjump_level);
        self.stats.learnt_clauses += 1;

        let learnt = &self.analyze_state.learnt;
        if learnt.len() == 1 {
            debug_assert_eq!(backjump_level, 0);
            self.trail.assign_lit(-uip, TrailReason::Axiom);
        } else {
            debug_assert!(self.trail.is_lit_unassigned(learnt[0]));
            debug_assert!(learnt[1..]
                .iter()
                .all(|&lit| self.trail.is_lit_unsatisfied(lit)));

            let learnt_idx = self
                .clause_db
                .insert_clause(learnt, ClauseFlags::LEARNT);
            self.watch_clause(learnt_idx);

            debug!("asserting flipped uip {} with the learnt clause as antecedent", -uip);
            self.trail
                .assign_lit(-uip, TrailReason::Propagated { cls: learnt_idx });
        }

        AnalyzeResult::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::propagate::PropagationResult;

    #[test]
    fn root_conflict_is_unsat() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([2]);
        solver.add_clause([-1, -2]);

        let conflict = match solver.propagate() {
            PropagationResult::Contradiction(cls) => cls,
            PropagationResult::Done => panic!("expected a root conflict"),
        };
        assert_eq!(solver.analyze_contradiction(conflict), AnalyzeResult::Unsat);
    }

    // The classic implication graph example: with x21 and x31 decided
    // false on early levels and x1 decided false afterwards, propagation
    // forces x4 and runs into a conflict whose first UIP is x4.
    #[test]
    fn first_uip_learning() {
        let mut solver = Solver::new();
        solver.add_clause([1, 31, -2]);
        solver.add_clause([1, -3]);
        solver.add_clause([2, 3, 4]);
        solver.add_clause([-4, -5]);
        solver.add_clause([21, -4, -6]);
        solver.add_clause([5, 6]);
        solver.add_clause([7, 9]);

        for decision in [7, -21, -31, 9, -1] {
            solver.trail.assign_lit(Lit::new(decision), TrailReason::Decision);
        }
        assert_eq!(solver.trail.current_decision_level(), 5);

        let conflict = match solver.propagate() {
            PropagationResult::Contradiction(cls) => cls,
            PropagationResult::Done => panic!("expected a conflict at level 5"),
        };

        assert_eq!(solver.analyze_contradiction(conflict), AnalyzeResult::Done);

        let learnt = solver
            .clause_db
            .iter_learnt()
            .last()
            .expect("analysis stores the learnt clause");

        // The first UIP is x4, so the learnt clause asserts -4 and
        // carries at least one literal from a lower decision level.
        assert!(learnt.contains(&Lit::new(-4)));
        assert!(learnt
            .iter()
            .any(|&lit| lit != Lit::new(-4)
                && solver.trail.decision_level_of(lit).unwrap() < 5));

        // Non-chronological backjump below the conflict level, with the
        // asserted literal driving propagation again.
        assert!(solver.trail.current_decision_level() < 5);
        assert!(solver.trail.is_lit_satisfied(Lit::new(-4)));
    }
}
