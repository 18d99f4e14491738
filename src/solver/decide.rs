use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};

use super::{trail::Trail, Lit};

/// Minimal branching heuristic: a uniformly random unassigned variable
/// with a uniformly random polarity, drawn from a seeded RNG so runs are
/// reproducible.
pub(crate) struct Brancher {
    rng: StdRng,
}

impl Brancher {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self, trail: &Trail) -> Option<Lit> {
        let var = trail.unassigned_vars().choose(&mut self.rng)?;
        let lit = Lit::from(var);

        Some(if self.rng.gen_bool(0.5) { lit } else { -lit })
    }
}
