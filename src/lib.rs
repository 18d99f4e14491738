//! A conflict driven clause learning SAT solver.

mod dimacs;
mod solver;
mod util;

pub use dimacs::{Dimacs, DimacsError};
pub use solver::{resolve, Lit, Model, Solver, Stats, Var, Verdict};
