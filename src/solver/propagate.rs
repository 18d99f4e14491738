/// Implementation of the unit propagation algorithm for two watched literals.
use tracing::trace;

use super::{clause::ClauseIdx, trail::TrailReason, watch::Watch, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropagationResult {
    Contradiction(ClauseIdx),
    Done,
}

impl Solver {
    /// Propagate every trail literal the cursor has not visited yet.
    ///
    /// Either returns a conflicting clause or quiesces with the cursor
    /// caught up to the trail.
    pub(crate) fn propagate(&mut self) -> PropagationResult {
        let mut trail_pos = self.unpropagated_pos;

        while let Some(&trail_elem) = self.trail.get(trail_pos) {
            let lit = trail_elem.lit;
            debug_assert!(self.trail.is_lit_satisfied(lit));
            trace!("propagating {lit}");

            let mut contradiction = None;

            // `lit` just became true, so `-lit` is the newly falsified
            // literal whose watchers have to be scanned.
            let (watch_list, mut rest) = self.watches.split_one(-lit);
            watch_list.retain(|watch| {
                // After a contradiction the remaining watches are left
                // alone; `retain` keeps them as they are.
                if contradiction.is_some() {
                    return true;
                }

                let cls_idx = watch.clause;
                let cls = self.clause_db.get_mut(cls_idx);

                let false_idx = if cls[0] == -lit {
                    0
                } else {
                    debug_assert!(cls[1] == -lit);
                    1
                };

                // Look for a replacement watch: any non-watched literal
                // of the clause that is not false.
                for (candidate_idx, &candidate) in cls.iter().enumerate().skip(2) {
                    if !self.trail.is_lit_unsatisfied(candidate) {
                        rest[candidate].push(Watch { clause: cls_idx });
                        cls.swap(false_idx, candidate_idx);

                        // Returning false drops the stale watch from this list.
                        return false;
                    }
                }

                // Every non-watched literal is false, so the clause state
                // hinges on the other watched literal.
                let other_idx = (false_idx + 1) & 1;
                let other = cls[other_idx];

                if self.trail.is_lit_satisfied(other) {
                    // Satisfied through the other watch; nothing to do.
                } else if self.trail.is_lit_unassigned(other) {
                    self.trail
                        .assign_lit(other, TrailReason::Propagated { cls: cls_idx });
                    self.stats.propagations += 1;
                    // Keep the implied literal in front.
                    cls.swap(0, other_idx);
                } else {
                    debug_assert!(self.trail.is_lit_unsatisfied(other));
                    contradiction = Some(cls_idx);
                }
                true
            });

            if let Some(conflicting_clause) = contradiction {
                return PropagationResult::Contradiction(conflicting_clause);
            }

            trail_pos += 1;
        }

        self.unpropagated_pos = trail_pos;
        debug_assert!(self.unpropagated_pos == self.trail.assigned_vars());
        PropagationResult::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Lit;

    #[test]
    fn forced_chain_at_root() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1, 2]);
        solver.add_clause([-2, 3]);

        assert_eq!(solver.propagate(), PropagationResult::Done);

        for i in [1, 2, 3] {
            let lit = Lit::new(i);
            assert!(solver.trail.is_lit_satisfied(lit));
            assert_eq!(solver.trail.decision_level_of(lit), Some(0));
        }
        assert!(solver.check_watches());
    }

    #[test]
    fn conflict_is_reported() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([2]);
        solver.add_clause([-1, -2]);

        assert!(matches!(
            solver.propagate(),
            PropagationResult::Contradiction(_)
        ));
    }

    #[test]
    fn antecedents_are_sound() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1, 2, 3]);
        solver.add_clause([-1, -2]);
        solver.add_clause([-2, -3, 4]);

        assert_eq!(solver.propagate(), PropagationResult::Done);

        // Every propagated literal is true and all other literals of its
        // antecedent were false when it was forced.
        for elem in solver.trail.trail() {
            if let TrailReason::Propagated { cls } = elem.reason {
                assert!(solver.trail.is_lit_satisfied(elem.lit));
                for &other in solver.clause_db.get(cls) {
                    if other != elem.lit {
                        assert!(solver.trail.is_lit_unsatisfied(other));
                    }
                }
            }
        }
    }
}
