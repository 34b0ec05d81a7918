//! Thompson NFA construction from composable fragments.
//!
//! Patterns are built programmatically, either as a [`Pattern`] tree or
//! directly as [`Fragment`]s in a [`Builder`]. A fragment is a piece of an
//! automaton with one entry state and some still-open exits. Fragments are
//! linked bottom-up by patching those exits, and each transition slot may be
//! patched only once, so linking a fragment into two places is reported as
//! an error rather than silently corrupting the graph. Finalizing a fragment
//! patches its exits to an end state and yields an immutable [`NFA`].
//!
//! Two matchers decide whether an NFA accepts an entire input string:
//!
//! - [`Backtracker`] explores one path at a time, depth first.
//! - [`PikeVM`] advances the set of all live states at once and never
//!   backtracks.
//!
//! Both give the same answer on every input. A [`Matcher`] bundles an NFA
//! with a choice of [`Strategy`].
//!
//! # Example
//!
//! ```
//! use thompson_fragments::{compile, Pattern};
//!
//! // (abc|def)*
//! let pattern = Pattern::star(Pattern::string("abc").or(Pattern::string("def")));
//! let matcher = compile(&pattern)?;
//!
//! assert!(matcher.is_match(""));
//! assert!(matcher.is_match("abcdefabc"));
//! assert!(!matcher.is_match("abcde"));
//! # Ok::<(), thompson_fragments::BuildError>(())
//! ```
//!
//! Fragments may also be composed by hand:
//!
//! ```
//! use thompson_fragments::{compile_fragment, Builder};
//!
//! let mut b = Builder::new();
//! let a = b.char('a')?;
//! let bs = b.string("bb")?;
//! let frag = b.one_or_more(a)?;
//! let frag = b.concat(vec![frag, bs])?;
//! let matcher = compile_fragment(b, frag)?;
//!
//! assert!(matcher.is_match("aaabb"));
//! assert!(!matcher.is_match("bb"));
//! # Ok::<(), thompson_fragments::BuildError>(())
//! ```
//!
//! # Crate features
//!
//! * **syntax** (enabled by default) - Adds the [`syntax`] module, which
//!   parses pattern text with `regex-syntax` and lowers it into a
//!   [`Pattern`].
//! * **logging** - Emits construction messages through the `log` crate.

#![deny(missing_debug_implementations)]

#[macro_use]
mod macros;

pub mod backtrack;
pub mod compiler;
pub mod error;
pub mod fragment;
pub mod matcher;
pub mod nfa;
pub mod pattern;
pub mod pikevm;
mod sparse_set;
#[cfg(feature = "syntax")]
pub mod syntax;

pub use backtrack::Backtracker;
pub use compiler::{Compiler, Config};
#[cfg(feature = "syntax")]
pub use error::SyntaxError;
pub use error::{BuildError, BuildResult, MatchError};
pub use fragment::{Builder, Fragment, Hole};
pub use matcher::{Matcher, Strategy};
pub use nfa::{Slot, SlotKind, State, StateId, NFA};
pub use pattern::{Pattern, Repetition};
pub use pikevm::PikeVM;

/// Compile `pattern` into a matcher with the default configuration.
pub fn compile(pattern: &Pattern) -> BuildResult<Matcher> {
    Compiler::new().compile(pattern)
}

/// Finalize `frag`, built in `builder`, into a matcher with the default
/// configuration.
pub fn compile_fragment(
    builder: Builder,
    frag: Fragment,
) -> BuildResult<Matcher> {
    Ok(Matcher::new(builder.build(frag)?))
}
