/// Clauses are stored contiguously in memory.
/// Each stored clause has atleast two literals; unit clauses go straight
/// onto the trail and never reach the database.
/// The first two literals of a stored clause are its watched literals.
/// A variable can only appear once in a clause.
use std::{num::NonZeroU32, ops::Range};

use bitflags::bitflags;

use super::{Lit, Var};

pub type Clause<'db> = &'db [Lit];
pub type ClauseMut<'db> = &'db mut [Lit];

bitflags! {
    pub struct ClauseFlags: u8 {
        const LEARNT = 0b0000_0001;
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ClauseIdx {
    start: u32,
    size: NonZeroU32,
}

#[derive(Debug, Clone)]
struct ClauseMeta {
    range: Range<u32>,
    flags: ClauseFlags,
}

#[derive(Clone, Default)]
pub struct ClauseDB {
    clause_data: Vec<Lit>,
    clause_meta: Vec<ClauseMeta>,
}

impl ClauseDB {
    pub fn insert_clause(&mut self, cls: Clause, flags: ClauseFlags) -> ClauseIdx {
        let start = self.clause_data.len();
        self.clause_data.extend(cls);
        let end = self.clause_data.len();

        debug_assert!(u32::try_from(end).is_ok(), "clause arena overflow");
        let start = start as u32;
        let end = end as u32;

        self.clause_meta.push(ClauseMeta {
            range: start..end,
            flags,
        });

        ClauseIdx {
            start,
            size: NonZeroU32::new(end - start).expect("Insertion of empty clause."),
        }
    }

    pub fn get(&self, r: ClauseIdx) -> Clause {
        debug_assert!(self.is_valid_clause_idx(r));

        let start = r.start as usize;
        let end = (r.start + r.size.get()) as usize;

        &self.clause_data[start..end]
    }

    pub fn get_mut(&mut self, r: ClauseIdx) -> ClauseMut {
        debug_assert!(self.is_valid_clause_idx(r));

        let start = r.start as usize;
        let end = (r.start + r.size.get()) as usize;

        &mut self.clause_data[start..end]
    }

    fn is_valid_clause_idx(&self, r: ClauseIdx) -> bool {
        let entry = self
            .clause_meta
            .binary_search_by_key(&r.start, |meta| meta.range.start);

        match entry {
            Ok(e) => {
                let range = self.clause_meta[e].range.clone();
                range.start == r.start && range.end == r.start + r.size.get()
            }
            Err(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Clause<'_>> {
        self.clause_meta
            .iter()
            .map(move |meta| &self.clause_data[meta.range.start as usize..meta.range.end as usize])
    }

    pub fn iter_idx(&self) -> impl Iterator<Item = ClauseIdx> + '_ {
        self.clause_meta.iter().map(|meta| ClauseIdx {
            start: meta.range.start,
            size: NonZeroU32::new(meta.range.end - meta.range.start)
                .expect("empty clause in database"),
        })
    }

    /// Iterate over the clauses learned during conflict analysis.
    #[allow(unused)]
    pub fn iter_learnt(&self) -> impl Iterator<Item = Clause<'_>> {
        self.clause_meta
            .iter()
            .filter(|meta| meta.flags.contains(ClauseFlags::LEARNT))
            .map(move |meta| &self.clause_data[meta.range.start as usize..meta.range.end as usize])
    }

    #[allow(unused)]
    pub fn is_learnt(&self, r: ClauseIdx) -> bool {
        let entry = self
            .clause_meta
            .binary_search_by_key(&r.start, |meta| meta.range.start);
        matches!(entry, Ok(e) if self.clause_meta[e].flags.contains(ClauseFlags::LEARNT))
    }
}

/// Resolve clauses `a` and `b` over `pivot`.
///
/// `pivot` has to occur positively in one clause and negatively in the
/// other; the result is the union of the remaining literals with
/// duplicates collapsed.
pub fn resolve(a: Clause, b: Clause, pivot: Var) -> Vec<Lit> {
    let pos = Lit::from(pivot);
    debug_assert!(
        (a.contains(&pos) && b.contains(&-pos)) || (a.contains(&-pos) && b.contains(&pos)),
        "resolution pivot {pivot} does not occur with complementary polarity"
    );

    let mut resolvent: Vec<Lit> = a
        .iter()
        .chain(b.iter())
        .copied()
        .filter(|lit| lit.var() != pivot)
        .collect();
    resolvent.sort_by_key(|lit| lit.get());
    resolvent.dedup();
    resolvent
}
