use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quarrel::{Solver, Verdict};

/// A conflict driven clause learning SAT solver.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// DIMACS CNF file to solve.
    input: PathBuf,

    /// Seed for the branching RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let mut solver = Solver::from_dimacs_with_seed(&input, args.seed)
        .context("malformed DIMACS input")?;

    match solver.solve() {
        Verdict::Sat(model) => {
            println!("s SATISFIABLE");
            for lit in model.as_vec() {
                println!("{} = {}", lit.abs(), lit > 0);
            }
        }
        Verdict::Unsat => {
            println!("s UNSATISFIABLE");
        }
    }

    let stats = solver.stats();
    info!(
        decisions = stats.decisions,
        propagations = stats.propagations,
        conflicts = stats.conflicts,
        learnt_clauses = stats.learnt_clauses,
        "finished"
    );

    Ok(())
}
