use super::Lit;
use crate::util;

/// Wrapper over Vec which is indexed by [`Lit`]
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct LitVec<T>(Vec<T>);

impl<T> LitVec<T> {
    pub fn new() -> Self {
        Self(Default::default())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    /// Get the element stored for `l` together with a view that can still
    /// index every other literal. This is what lets the propagator edit the
    /// watch list of the falsified literal while pushing new watches onto
    /// the lists of other literals.
    pub fn split_one(&mut self, l: Lit) -> (&mut T, RestLits<'_, T>) {
        let (val, rest) =
            util::split_one(&mut self.0, lit_to_idx(l)).expect("litvec is too small for lit");
        (val, RestLits(rest))
    }
}

pub struct RestLits<'a, T>(util::Rest<'a, T>);

impl<'a, T> std::ops::Index<Lit> for RestLits<'a, T> {
    type Output = T;

    fn index(&self, index: Lit) -> &Self::Output {
        self.0
            .get(lit_to_idx(index))
            .expect("index out of bounds or split off")
    }
}

impl<'a, T> std::ops::IndexMut<Lit> for RestLits<'a, T> {
    fn index_mut(&mut self, index: Lit) -> &mut Self::Output {
        self.0
            .get_mut(lit_to_idx(index))
            .expect("index out of bounds or split off")
    }
}

impl<T: Clone> LitVec<T> {
    /// Resize so that `l` and its negation are valid indices.
    pub fn expand(&mut self, l: Lit, val: T) {
        let len = lit_to_idx(l).max(lit_to_idx(-l)) + 1;

        if len >= self.0.len() {
            self.0.resize(len, val)
        }
    }
}

impl<T> Default for LitVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

// The two literals of a variable sit next to each other. Subtracting two
// accounts for the unused 0 and -0 slots.
fn lit_to_idx(lit: Lit) -> usize {
    (lit.get() - 2) as usize
}

impl<T> std::ops::Index<Lit> for LitVec<T> {
    type Output = T;

    fn index(&self, index: Lit) -> &Self::Output {
        &self.0[lit_to_idx(index)]
    }
}

impl<T> std::ops::IndexMut<Lit> for LitVec<T> {
    fn index_mut(&mut self, index: Lit) -> &mut Self::Output {
        &mut self.0[lit_to_idx(index)]
    }
}
