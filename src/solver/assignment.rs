use super::{data::VarVec, Lit, Var};

#[derive(Clone, Copy, Debug)]
struct AssignData {
    status: bool,
    decision_level: u32,
    /// Position of the corresponding element on the trail. Conflict
    /// analysis follows it to the antecedent clause.
    trail_pos: u32,
}

#[derive(Default)]
pub(crate) struct Assignment {
    assignment: VarVec<Option<AssignData>>,
}

impl Assignment {
    pub fn expand(&mut self, v: Var) {
        self.assignment.expand(v, None);
    }

    pub fn get(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var()].map(|data| data.status == lit.is_pos())
    }

    pub fn decision_level(&self, v: Var) -> Option<u32> {
        self.assignment[v].map(|data| data.decision_level)
    }

    pub fn trail_pos(&self, v: Var) -> Option<u32> {
        self.assignment[v].map(|data| data.trail_pos)
    }

    pub fn is_lit_satisfied(&self, lit: Lit) -> bool {
        self.get(lit) == Some(true)
    }

    pub fn is_lit_unsatisfied(&self, lit: Lit) -> bool {
        self.get(lit) == Some(false)
    }

    pub fn is_lit_assigned(&self, lit: Lit) -> bool {
        self.assignment[lit.var()].is_some()
    }

    pub fn is_lit_unassigned(&self, lit: Lit) -> bool {
        self.assignment[lit.var()].is_none()
    }

    pub fn assign_lit(&mut self, lit: Lit, decision_level: u32, trail_pos: u32) {
        debug_assert!(self.is_lit_unassigned(lit));

        self.assignment[lit.var()] = Some(AssignData {
            status: lit.is_pos(),
            decision_level,
            trail_pos,
        });
    }

    pub fn unassign_lit(&mut self, lit: Lit) {
        debug_assert!(self.is_lit_assigned(lit));

        self.assignment[lit.var()] = None;
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn unassigned_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.assignment
            .iter_with_var()
            .filter(|(_, data)| data.is_none())
            .map(|(var, _)| var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_query() {
        let mut assignment = Assignment::default();
        assignment.expand(Var::new(2));

        let lit = Lit::new(-2);
        assert!(assignment.is_lit_unassigned(lit));
        assert_eq!(assignment.get(lit), None);

        assignment.assign_lit(lit, 1, 0);
        assert!(assignment.is_lit_satisfied(lit));
        assert!(assignment.is_lit_unsatisfied(-lit));
        assert_eq!(assignment.get(lit), Some(true));
        assert_eq!(assignment.get(-lit), Some(false));
        assert_eq!(assignment.decision_level(lit.var()), Some(1));

        assignment.unassign_lit(lit);
        assert!(assignment.is_lit_unassigned(lit));
    }

    #[test]
    fn unassigned_vars_iteration() {
        let mut assignment = Assignment::default();
        assignment.expand(Var::new(3));
        assignment.assign_lit(Lit::new(2), 0, 0);

        let unassigned: Vec<_> = assignment.unassigned_vars().map(Var::get).collect();
        assert_eq!(unassigned, vec![1, 3]);
    }
}
