use core::{
    mem,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::{BuildError, BuildResult},
    nfa::{Slot, SlotKind, State, StateId, NFA},
};

/// An open transition slot of a fragment, waiting to be patched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hole {
    pub state: StateId,
    pub slot: SlotKind,
}

/// The ID handed to the next builder that is created.
static NEXT_BUILDER_ID: AtomicUsize = AtomicUsize::new(0);

/// A partially built sub-graph of an NFA.
///
/// A fragment has a single entry state and a list of holes: transition slots
/// that lead out of the fragment but have no target yet. Composing fragments
/// patches the holes of one into the entry of another. The states themselves
/// live in the [`Builder`] that created the fragment, so a fragment is only
/// meaningful together with that builder. Handing it to any other builder
/// fails with [`BuildError::ForeignFragment`].
///
/// Fragments are consumed by composition. Cloning one and using both copies
/// links the same holes twice, which the builder reports as
/// [`BuildError::SlotAlreadySet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragment {
    /// The ID of the builder that owns this fragment's states.
    owner: usize,
    start: StateId,
    holes: Vec<Hole>,
    /// Set when one of this fragment's exits already reaches an end state.
    /// The ID is that end state.
    ending: Option<StateId>,
}

impl Fragment {
    /// The entry state of this fragment.
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Returns true if some exit of this fragment already reaches an end
    /// state. Such a fragment cannot be patched.
    pub fn is_finished(&self) -> bool {
        self.ending.is_some()
    }
}

/// An arena of NFA states along with the fragment algebra over it.
///
/// Every constructor adds states to the arena and returns a [`Fragment`]
/// describing the new sub-graph. Once a complete fragment has been
/// assembled, [`Builder::build`] patches its holes to a fresh end state and
/// returns the finalized [`NFA`].
///
/// A cloned builder shares its ID with the original, so fragments created
/// before the clone may be finished in either copy.
#[derive(Clone, Debug)]
pub struct Builder {
    /// Unique among builders created by this process.
    id: usize,
    /// The states added so far.
    states: Vec<State>,
    /// Heap memory owned by states, not counting the states themselves.
    memory_states: usize,
    /// The heap budget, in bytes, for the states in this builder.
    size_limit: Option<usize>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed),
            states: vec![],
            memory_states: 0,
            size_limit: None,
        }
    }
}

impl Builder {
    /// Create a new builder with no states and no size limit.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// A fragment matching exactly the character `ch`.
    pub fn char(&mut self, ch: char) -> BuildResult<Fragment> {
        let id = self.add(State::Char { ch, next: Slot::OPEN })?;
        Ok(Fragment {
            owner: self.id,
            start: id,
            holes: vec![Hole { state: id, slot: SlotKind::Next }],
            ending: None,
        })
    }

    /// A fragment matching the characters of `string` in order.
    ///
    /// An empty string is rejected with [`BuildError::EmptyConcat`].
    pub fn string(&mut self, string: &str) -> BuildResult<Fragment> {
        let mut frags = Vec::with_capacity(string.len());
        for ch in string.chars() {
            frags.push(self.char(ch)?);
        }
        self.concat(frags)
    }

    /// Link the given fragments one after the other.
    ///
    /// The holes of each fragment are patched to the entry of the next one
    /// right away. The result enters at the first fragment and exposes the
    /// holes of the last.
    pub fn concat<I>(&mut self, frags: I) -> BuildResult<Fragment>
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut frags = frags.into_iter();
        let first = frags.next().ok_or(BuildError::EmptyConcat)?;
        self.check_owner(&first)?;
        let start = first.start;
        let mut last = first;
        for frag in frags {
            self.check_owner(&frag)?;
            self.patch(&last, frag.start)?;
            last = frag;
        }
        Ok(Fragment {
            owner: self.id,
            start,
            holes: last.holes,
            ending: last.ending,
        })
    }

    /// A fragment matching either `first` or `second`.
    ///
    /// Patching the result patches the holes of both operands to the same
    /// continuation.
    pub fn alternate(
        &mut self,
        first: Fragment,
        second: Fragment,
    ) -> BuildResult<Fragment> {
        self.check_owner(&first)?;
        self.check_owner(&second)?;
        let start = self.add(State::Branch {
            next: Slot::to(first.start),
            alt: Slot::to(second.start),
        })?;
        let ending = first.ending.or(second.ending);
        let mut holes = first.holes;
        holes.extend(second.holes);
        Ok(Fragment { owner: self.id, start, holes, ending })
    }

    /// A fragment matching `frag` zero or one times.
    pub fn optional(&mut self, frag: Fragment) -> BuildResult<Fragment> {
        self.check_owner(&frag)?;
        let start = self.add(State::Branch {
            next: Slot::to(frag.start),
            alt: Slot::OPEN,
        })?;
        let mut holes = frag.holes;
        holes.push(Hole { state: start, slot: SlotKind::Alt });
        Ok(Fragment { owner: self.id, start, holes, ending: frag.ending })
    }

    /// A fragment matching `frag` any number of times, including zero.
    ///
    /// The holes of `frag` are patched back to a new branch state, so the
    /// only hole left is the branch's exit.
    pub fn zero_or_more(&mut self, frag: Fragment) -> BuildResult<Fragment> {
        let branch = self.add_loop(&frag)?;
        Ok(Fragment {
            owner: self.id,
            start: branch,
            holes: vec![Hole { state: branch, slot: SlotKind::Alt }],
            ending: None,
        })
    }

    /// A fragment matching `frag` one or more times.
    ///
    /// This is the same loop as [`Builder::zero_or_more`], except that it is
    /// entered through `frag` instead of through the branch.
    pub fn one_or_more(&mut self, frag: Fragment) -> BuildResult<Fragment> {
        let branch = self.add_loop(&frag)?;
        Ok(Fragment {
            owner: self.id,
            start: frag.start,
            holes: vec![Hole { state: branch, slot: SlotKind::Alt }],
            ending: None,
        })
    }

    /// A fragment matching any single character of `chars`.
    ///
    /// Repeated characters are only added once.
    pub fn choice<I>(&mut self, chars: I) -> BuildResult<Fragment>
    where
        I: IntoIterator<Item = char>,
    {
        let mut members: Vec<char> = vec![];
        for ch in chars {
            if !members.contains(&ch) {
                members.push(ch);
            }
        }
        if members.is_empty() {
            return Err(BuildError::EmptyChoice);
        }
        let mut alternates = Vec::with_capacity(members.len());
        let mut holes = Vec::with_capacity(members.len());
        for ch in members {
            let id = self.add(State::Char { ch, next: Slot::OPEN })?;
            alternates.push(id);
            holes.push(Hole { state: id, slot: SlotKind::Next });
        }
        let start =
            self.add(State::Union { alternates: alternates.into_boxed_slice() })?;
        Ok(Fragment { owner: self.id, start, holes, ending: None })
    }

    /// A fragment consisting of a single end state.
    ///
    /// It has no holes, and patching it (or anything whose exit leads to it)
    /// fails with [`BuildError::AppendToEnd`].
    pub fn end(&mut self) -> BuildResult<Fragment> {
        let id = self.add(State::End)?;
        Ok(Fragment {
            owner: self.id,
            start: id,
            holes: vec![],
            ending: Some(id),
        })
    }

    /// Patch every hole of `frag` to the state `to`.
    ///
    /// `to` must be a state of this builder, otherwise this fails with
    /// [`BuildError::UnknownState`].
    pub fn patch(&mut self, frag: &Fragment, to: StateId) -> BuildResult<()> {
        self.check_owner(frag)?;
        if to >= self.states.len() {
            return Err(BuildError::UnknownState { state: to });
        }
        if let Some(state) = frag.ending {
            return Err(BuildError::AppendToEnd { state });
        }
        for &hole in frag.holes.iter() {
            self.set_slot(hole, to)?;
        }
        Ok(())
    }

    /// Finalize `frag` into an NFA by patching its holes to a new end state.
    ///
    /// Every state reachable from the fragment's entry must have all of its
    /// transitions assigned after patching, otherwise this returns
    /// [`BuildError::Unpatched`].
    pub fn build(mut self, frag: Fragment) -> BuildResult<NFA> {
        self.check_owner(&frag)?;
        let end = self.end()?;
        self.patch(&frag, end.start)?;
        self.check_reachable(frag.start)?;
        debug!(
            "fragment graph finalized, NFA size: {} states, {} bytes on heap",
            self.states.len(),
            self.memory_usage(),
        );
        Ok(NFA::new(self.states, frag.start))
    }

    /// Set the size limit on this builder.
    ///
    /// Setting the size limit also checks whether the states added so far
    /// fit within it. If they don't, then an error is returned.
    ///
    /// By default, there is no configured size limit.
    pub fn set_size_limit(&mut self, limit: Option<usize>) -> BuildResult<()> {
        self.size_limit = limit;
        self.check_size_limit()
    }

    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit
    }

    /// The number of states added so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the heap memory usage, in bytes, of the states added so far.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * mem::size_of::<State>() + self.memory_states
    }

    /// Add the branch of a repetition loop and patch the body back into it.
    fn add_loop(&mut self, body: &Fragment) -> BuildResult<StateId> {
        self.check_owner(body)?;
        if let Some(state) = body.ending {
            return Err(BuildError::AppendToEnd { state });
        }
        let branch = self.add(State::Branch {
            next: Slot::to(body.start),
            alt: Slot::OPEN,
        })?;
        self.patch(body, branch)?;
        Ok(branch)
    }

    fn add(&mut self, state: State) -> BuildResult<StateId> {
        let id = self.states.len();
        self.memory_states += state.memory_usage();
        self.states.push(state);
        self.check_size_limit()?;
        Ok(id)
    }

    fn set_slot(&mut self, hole: Hole, to: StateId) -> BuildResult<()> {
        trace!("patching {}.{} -> {}", hole.state, hole.slot, to);
        let slot = match self.states[hole.state].slot_mut(hole.slot) {
            Some(slot) => slot,
            None => return Err(BuildError::AppendToEnd { state: hole.state }),
        };
        slot.set(to).map_err(|_| BuildError::SlotAlreadySet {
            state: hole.state,
            slot: hole.slot,
        })
    }

    fn check_owner(&self, frag: &Fragment) -> BuildResult<()> {
        if frag.owner != self.id {
            return Err(BuildError::ForeignFragment { state: frag.start });
        }
        Ok(())
    }

    fn check_reachable(&self, start: StateId) -> BuildResult<()> {
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if mem::replace(&mut seen[id], true) {
                continue;
            }
            match self.states[id] {
                State::End => {}
                State::Char { next, .. } => {
                    let to = next.get().ok_or(BuildError::Unpatched {
                        state: id,
                        slot: SlotKind::Next,
                    })?;
                    stack.push(to);
                }
                State::Branch { next, alt } => {
                    let next = next.get().ok_or(BuildError::Unpatched {
                        state: id,
                        slot: SlotKind::Next,
                    })?;
                    let alt = alt.get().ok_or(BuildError::Unpatched {
                        state: id,
                        slot: SlotKind::Alt,
                    })?;
                    stack.push(next);
                    stack.push(alt);
                }
                State::Union { ref alternates } => {
                    stack.extend(alternates.iter().copied());
                }
            }
        }
        Ok(())
    }

    fn check_size_limit(&self) -> BuildResult<()> {
        if let Some(limit) = self.size_limit {
            if self.memory_usage() > limit {
                return Err(BuildError::ExceededSizeLimit { limit });
            }
        }
        Ok(())
    }
}
