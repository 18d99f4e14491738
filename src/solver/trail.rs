use super::{
    assignment::Assignment,
    clause::{Clause, ClauseIdx},
    Lit, Var,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrailReason {
    /// Literal was decided.
    Decision,

    /// Literal was forced during unit propagation. `cls` is the antecedent
    /// clause; all of its other literals were false at the time.
    Propagated { cls: ClauseIdx },

    /// Root literal from a unit clause. Unit clauses never enter the
    /// clause database, so there is no antecedent handle to record.
    Axiom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrailElement {
    pub(crate) lit: Lit,
    pub(crate) reason: TrailReason,
}

#[derive(Default)]
pub(crate) struct Trail {
    trail: Vec<TrailElement>,
    decision_positions: Vec<usize>,
    assignment: Assignment,
}

impl Trail {
    pub fn assigned_vars(&self) -> usize {
        self.trail.len()
    }

    pub fn total_vars(&self) -> usize {
        self.assignment.len()
    }

    pub fn get(&self, idx: usize) -> Option<&TrailElement> {
        self.trail.get(idx)
    }

    pub fn trail(&self) -> &[TrailElement] {
        &self.trail
    }

    pub fn value_of(&self, lit: Lit) -> Option<bool> {
        self.assignment.get(lit)
    }

    pub fn current_decision_level(&self) -> u32 {
        self.decision_positions.len() as u32
    }

    /// Expands internal assignment for new max variable.
    pub fn expand(&mut self, var: Var) {
        self.assignment.expand(var)
    }

    pub fn assignment_complete(&self) -> bool {
        self.trail.len() == self.assignment.len()
    }

    #[allow(unused)]
    pub fn is_lit_assigned(&self, lit: Lit) -> bool {
        self.assignment.is_lit_assigned(lit)
    }

    pub fn is_lit_unassigned(&self, lit: Lit) -> bool {
        self.assignment.is_lit_unassigned(lit)
    }

    pub fn is_lit_satisfied(&self, lit: Lit) -> bool {
        self.assignment.is_lit_satisfied(lit)
    }

    pub fn is_lit_unsatisfied(&self, lit: Lit) -> bool {
        self.assignment.is_lit_unsatisfied(lit)
    }

    pub fn unassigned_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.assignment.unassigned_vars()
    }

    pub fn decision_level_of(&self, lit: Lit) -> Option<u32> {
        self.assignment.decision_level(lit.var())
    }

    /// Antecedent clause of a propagated literal.
    pub fn reason_cls(&self, lit: Lit) -> ClauseIdx {
        let pos = self
            .assignment
            .trail_pos(lit.var())
            .expect("literal is not assigned");

        match self.trail[pos as usize].reason {
            TrailReason::Propagated { cls } => cls,
            _ => unreachable!("only propagated literals have an antecedent clause"),
        }
    }

    pub fn assign_lit(&mut self, lit: Lit, reason: TrailReason) {
        debug_assert!(self.is_lit_unassigned(lit));
        debug_assert!(
            !matches!(reason, TrailReason::Axiom) || self.current_decision_level() == 0,
            "axioms are root assignments"
        );

        if reason == TrailReason::Decision {
            self.decision_positions.push(self.trail.len());
        }

        let decision_level = self.decision_positions.len() as u32;
        self.assignment
            .assign_lit(lit, decision_level, self.trail.len() as u32);
        self.trail.push(TrailElement { lit, reason });
    }

    /// Remove every trail element above `level`. Returns the new trail
    /// length, which is where unit propagation has to resume.
    pub fn backtrack(&mut self, level: u32) -> usize {
        if self.current_decision_level() <= level {
            return self.trail.len();
        }

        let cut = self.decision_positions[level as usize];
        for elem in self.trail.drain(cut..) {
            self.assignment.unassign_lit(elem.lit);
        }
        self.decision_positions.truncate(level as usize);

        self.trail.len()
    }

    pub fn is_clause_satisfied(&self, clause: Clause) -> bool {
        clause.iter().copied().any(|lit| self.is_lit_satisfied(lit))
    }
}
