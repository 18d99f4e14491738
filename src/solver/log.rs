use itertools::Itertools;
use tracing::debug;

use super::{
    trail::{Trail, TrailReason},
    Lit, Solver,
};

const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const END: &str = "\u{1b}[0m";

#[allow(unused)]
impl Solver {
    /// Dump the clause database with assignment coloring. Only compiled
    /// into debug builds; the trace would drown real instances.
    pub(crate) fn log_state(&self) {
        #[cfg(debug_assertions)]
        for cls in self.clause_db.iter() {
            debug!("{}", self.trail.fmt_clause(cls));
        }
    }
}

impl Trail {
    pub(crate) fn fmt_lit(&self, lit: Lit) -> String {
        match self.value_of(lit) {
            Some(true) => format!("{GREEN}{lit}{END}"),
            Some(false) => format!("{RED}{lit}{END}"),
            None => format!("{lit}"),
        }
    }

    pub(crate) fn fmt_clause(&self, clause: &[Lit]) -> String {
        clause.iter().map(|&lit| self.fmt_lit(lit)).join(", ")
    }

    pub(crate) fn fmt_trail(&self) -> String {
        let lst = self
            .trail()
            .iter()
            .map(|elem| {
                let lit = elem.lit;
                match elem.reason {
                    TrailReason::Decision => format!("{lit}D"),
                    TrailReason::Propagated { .. } => format!("{lit}P"),
                    TrailReason::Axiom => format!("{lit}A"),
                }
            })
            .join(", ");

        format!("[{lst}]")
    }
}
