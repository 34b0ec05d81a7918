use core::fmt;
use core::mem;

/// A state ID in the NFA. It indexes the state arena owned by a
/// [`Builder`](crate::Builder) or a finalized [`NFA`].
pub type StateId = usize;

/// A transition slot that may be assigned exactly once.
///
/// Fragments are linked by patching their open slots in place. A slot that
/// is assigned a second time means some fragment was linked into more than
/// one place, so [`Slot::set`] refuses instead of overwriting the edge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Slot(Option<StateId>);

impl Slot {
    /// An unassigned slot.
    pub const OPEN: Slot = Slot(None);

    pub(crate) fn to(id: StateId) -> Slot {
        Slot(Some(id))
    }

    /// Returns the target of this slot, if it has been assigned.
    pub fn get(self) -> Option<StateId> {
        self.0
    }

    pub fn is_set(self) -> bool {
        self.0.is_some()
    }

    /// Assign this slot. Returns the existing target if it was already set.
    pub(crate) fn set(&mut self, to: StateId) -> Result<(), StateId> {
        match self.0 {
            Some(existing) => Err(existing),
            None => {
                self.0 = Some(to);
                Ok(())
            }
        }
    }
}

/// Names one of the two transition slots a state may carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SlotKind {
    /// The `next` transition of a character or branch state.
    Next,
    /// The `alt` transition of a branch state.
    Alt,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SlotKind::Next => write!(f, "next"),
            SlotKind::Alt => write!(f, "alt"),
        }
    }
}

/// A single state in a Thompson NFA.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// The terminal state. It has no outgoing transitions, and a search
    /// succeeds when it is live at the moment the input runs out.
    End,
    /// Consumes exactly one input character equal to `ch`, then moves to
    /// `next`.
    Char { ch: char, next: Slot },
    /// A two-way choice taken without consuming input. `next` is explored
    /// before `alt`.
    Branch { next: Slot, alt: Slot },
    /// A many-way choice taken without consuming input. Its alternates are
    /// fixed when the state is created.
    Union { alternates: Box<[StateId]> },
}

impl State {
    /// Returns true if this state only has epsilon transitions.
    pub fn is_epsilon(&self) -> bool {
        matches!(*self, State::Branch { .. } | State::Union { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(*self, State::End)
    }

    pub(crate) fn slot_mut(&mut self, kind: SlotKind) -> Option<&mut Slot> {
        match (self, kind) {
            (State::Char { next, .. }, SlotKind::Next) => Some(next),
            (State::Branch { next, .. }, SlotKind::Next) => Some(next),
            (State::Branch { alt, .. }, SlotKind::Alt) => Some(alt),
            _ => None,
        }
    }

    /// Heap memory held by this state, not counting the state itself.
    pub(crate) fn memory_usage(&self) -> usize {
        match *self {
            State::Union { ref alternates } => {
                alternates.len() * mem::size_of::<StateId>()
            }
            _ => 0,
        }
    }
}

/// A finalized Thompson NFA.
///
/// An `NFA` is produced by [`Builder::build`](crate::Builder::build) once a
/// fragment's open exits have been patched to an end state. It is never
/// mutated afterwards, so it may be searched any number of times.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NFA {
    /// All states in the NFA.
    states: Box<[State]>,
    /// Starting state.
    start: StateId,
}

impl NFA {
    pub(crate) fn new(states: Vec<State>, start: StateId) -> NFA {
        NFA { states: states.into_boxed_slice(), start }
    }

    /// The state every search begins in.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Returns the state with the given ID.
    ///
    /// # Panics
    ///
    /// This panics when `id` is not a state of this NFA.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The total number of states, including any that are unreachable from
    /// the start state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the heap memory, in bytes, used by this NFA.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * mem::size_of::<State>()
            + self.states.iter().map(State::memory_usage).sum::<usize>()
    }
}
