/*!
A set-simulation matcher.

Instead of following one path through the automaton at a time, the PikeVM
keeps the set of every state that is live after consuming a prefix of the
input. Each input character advances the whole set at once, so no work is
ever repeated and the search never backtracks. Its cost is
`O(input length * NFA size)` and its memory is bounded by the NFA's size,
independent of the input.
*/

use core::mem;

use crate::{
    nfa::{State, StateId, NFA},
    sparse_set::SparseSet,
};

/// A matcher that simulates an NFA over the set of live states.
#[derive(Clone, Copy, Debug)]
pub struct PikeVM<'a> {
    nfa: &'a NFA,
}

impl<'a> PikeVM<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a NFA) -> Self {
        Self { nfa }
    }

    pub fn nfa(&self) -> &'a NFA {
        self.nfa
    }

    /// Create scratch space for searching with this matcher.
    pub fn create_cache(&self) -> Cache {
        Cache::new(self.nfa)
    }

    /// Check if the entire input matches. This allocates a fresh cache; use
    /// [`PikeVM::is_match_with`] to reuse one across searches.
    pub fn is_match(&self, input: &str) -> bool {
        let mut cache = self.create_cache();
        self.is_match_with(&mut cache, input)
    }

    /// Check if the entire input matches, using `cache` for scratch space.
    ///
    /// The cache may have been used with any NFA before; it is grown if it
    /// is too small for this one.
    pub fn is_match_with(&self, cache: &mut Cache, input: &str) -> bool {
        cache.reset(self.nfa);
        let Cache { ref mut clist, ref mut nlist, ref mut seen, ref mut stack } =
            *cache;

        seen.clear();
        self.epsilon_closure(self.nfa.start(), clist, seen, stack);
        for ch in input.chars() {
            if clist.is_empty() {
                return false;
            }
            nlist.clear();
            seen.clear();
            for id in clist.iter() {
                // End states are dropped here: they have nowhere to go.
                if let State::Char { ch: want, next } = *self.nfa.state(id) {
                    if want != ch {
                        continue;
                    }
                    if let Some(next) = next.get() {
                        self.epsilon_closure(next, nlist, seen, stack);
                    }
                }
            }
            mem::swap(clist, nlist);
        }
        clist.iter().any(|id| self.nfa.state(id).is_end())
    }

    /// Add to `set` every character and end state reachable from `start`
    /// through epsilon transitions alone.
    ///
    /// `seen` records every state visited during the current step, so each
    /// state is expanded at most once and the work stack never holds more
    /// than one entry per state.
    fn epsilon_closure(
        &self,
        start: StateId,
        set: &mut SparseSet,
        seen: &mut SparseSet,
        stack: &mut Vec<StateId>,
    ) {
        if !seen.insert(start) {
            return;
        }
        stack.push(start);
        while let Some(id) = stack.pop() {
            match *self.nfa.state(id) {
                State::End | State::Char { .. } => {
                    set.insert(id);
                }
                State::Branch { next, alt } => {
                    // Pushed in reverse so that `next` is expanded first.
                    for to in [alt.get(), next.get()].into_iter().flatten() {
                        if seen.insert(to) {
                            stack.push(to);
                        }
                    }
                }
                State::Union { ref alternates } => {
                    for &to in alternates.iter().rev() {
                        if seen.insert(to) {
                            stack.push(to);
                        }
                    }
                }
            }
        }
    }
}

/// Scratch space for the set-simulation matcher.
///
/// All of its storage is sized by the NFA it was last used with, so running
/// a search never grows it, no matter how long the input is.
#[derive(Clone, Debug)]
pub struct Cache {
    /// The live states before consuming the current character.
    clist: SparseSet,
    /// The live states after consuming it.
    nlist: SparseSet,
    /// States visited by the epsilon closures of the current step.
    seen: SparseSet,
    stack: Vec<StateId>,
}

impl Cache {
    pub fn new(nfa: &NFA) -> Cache {
        Cache {
            clist: SparseSet::new(nfa.len()),
            nlist: SparseSet::new(nfa.len()),
            seen: SparseSet::new(nfa.len()),
            stack: Vec::with_capacity(nfa.len()),
        }
    }

    /// Prepare this cache for a search over `nfa`.
    pub fn reset(&mut self, nfa: &NFA) {
        if self.clist.capacity() < nfa.len() {
            self.clist.resize(nfa.len());
            self.nlist.resize(nfa.len());
            self.seen.resize(nfa.len());
            self.stack.reserve(nfa.len());
        }
        self.clist.clear();
        self.nlist.clear();
        self.seen.clear();
        self.stack.clear();
    }

    /// Returns the heap memory, in bytes, used by this cache.
    pub fn memory_usage(&self) -> usize {
        self.clist.memory_usage()
            + self.nlist.memory_usage()
            + self.seen.memory_usage()
            + self.stack.capacity() * mem::size_of::<StateId>()
    }
}
