use super::{clause::ClauseIdx, Solver};

/// Entry of a literal's watcher list.
///
/// A stored clause keeps its two watched literals in its first two slots,
/// so the watch itself only has to name the clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Watch {
    pub(crate) clause: ClauseIdx,
}

impl Solver {
    /// Register the first two literals of `cls_idx` as its watches.
    pub(crate) fn watch_clause(&mut self, cls_idx: ClauseIdx) {
        let cls = self.clause_db.get(cls_idx);
        debug_assert!(cls.len() >= 2, "unit clauses are never watched");

        let (fst, snd) = (cls[0], cls[1]);
        debug_assert_ne!(fst.var(), snd.var());

        self.watches[fst].push(Watch { clause: cls_idx });
        self.watches[snd].push(Watch { clause: cls_idx });
    }

    /// Watch lists and clauses mirror each other: every stored clause is
    /// watched by exactly its first two literals, each exactly once.
    pub(crate) fn check_watches(&self) -> bool {
        let mut total_watches = 0;

        for cls_idx in self.clause_db.iter_idx() {
            let cls = self.clause_db.get(cls_idx);
            for &lit in &cls[..2] {
                let occurrences = self.watches[lit]
                    .iter()
                    .filter(|watch| watch.clause == cls_idx)
                    .count();
                if occurrences != 1 {
                    return false;
                }
                total_watches += occurrences;
            }
        }

        // No watch may point anywhere but a clause's first two slots.
        let list_entries: usize = self.watches.iter().map(Vec::len).sum();
        total_watches == list_entries
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::Solver;

    #[test]
    fn initial_watches_mirror_clauses() {
        let mut solver = Solver::new();
        solver.add_clause([1, 2, 3]);
        solver.add_clause([-1, -2]);
        solver.add_clause([2, -3]);

        assert!(solver.check_watches());
    }

    #[test]
    fn watches_survive_propagation() {
        let mut solver = Solver::new();
        solver.add_clause([1]);
        solver.add_clause([-1, 2, 3]);
        solver.add_clause([-1, -2]);

        solver.solve();
        assert!(solver.check_watches());
    }
}
