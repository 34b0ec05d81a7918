use thiserror::Error;

use crate::nfa::{SlotKind, StateId};

/// An error that occurs while composing fragments or finalizing an NFA.
///
/// Every variant is a contract violation on the part of the caller. None of
/// them are recoverable: the builder that reported one should be discarded.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuildError {
    /// A fragment whose exit already leads to an end state was patched.
    #[error("cannot append to a finished automaton (state {state} is an end state)")]
    AppendToEnd { state: StateId },
    /// A transition slot was assigned twice. This happens when the same
    /// fragment is used as more than one operand.
    #[error("transition `{slot}` of state {state} is already assigned")]
    SlotAlreadySet { state: StateId, slot: SlotKind },
    /// A bounded repetition was given a maximum not above its minimum.
    #[error("invalid repetition bounds: max ({max}) must be greater than min ({min})")]
    InvalidRepetition { min: u32, max: u32 },
    #[error("concatenation requires at least one operand")]
    EmptyConcat,
    #[error("choice set requires at least one character")]
    EmptyChoice,
    /// A state reachable from the start of a finalized automaton still has
    /// an open transition.
    #[error("transition `{slot}` of state {state} was never patched")]
    Unpatched { state: StateId, slot: SlotKind },
    #[error("fragment builder exceeded its size limit of {limit} bytes")]
    ExceededSizeLimit { limit: usize },
    /// A fragment created by one builder was handed to another.
    #[error("fragment entered at state {state} belongs to a different builder")]
    ForeignFragment { state: StateId },
    /// A patch target is not a state of the builder.
    #[error("state {state} does not exist in this builder")]
    UnknownState { state: StateId },
    #[error("pattern nesting exceeds the limit of {limit}")]
    NestLimitExceeded { limit: u32 },
}

/// An error returned by the fallible backtracking search.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MatchError {
    #[error("backtracking exceeded its limit of {limit} steps")]
    StepLimitExceeded { limit: usize },
}

/// An error that occurs while lowering pattern text into a pattern tree.
#[cfg(feature = "syntax")]
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Parse(#[from] regex_syntax::Error),
    #[error("unsupported pattern feature: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Build(#[from] BuildError),
}

pub type BuildResult<T> = Result<T, BuildError>;
