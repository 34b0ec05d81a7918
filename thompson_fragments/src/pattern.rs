use crate::error::{BuildError, BuildResult};

/// A pattern tree describing the language to match.
///
/// A `Pattern` is plain data. It owns no automaton state until a
/// [`Compiler`](crate::Compiler) lowers it into fragments, so the same
/// pattern may be compiled any number of times.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Pattern {
    /// A single character.
    Char(char),
    /// A literal string, matched character by character. Must not be empty.
    Str(String),
    /// Each sub-pattern in order. Must not be empty.
    Concat(Vec<Pattern>),
    /// Either of two sub-patterns.
    Alternate(Box<Pattern>, Box<Pattern>),
    /// The sub-pattern zero or one times.
    Optional(Box<Pattern>),
    /// The sub-pattern zero or more times.
    Star(Box<Pattern>),
    /// The sub-pattern one or more times.
    Plus(Box<Pattern>),
    /// Any single character from the set. Must not be empty.
    Choice(Vec<char>),
    /// The sub-pattern repeated within bounds.
    Repeat(Repetition),
}

impl Pattern {
    pub fn char(ch: char) -> Pattern {
        Pattern::Char(ch)
    }

    pub fn string<S: Into<String>>(string: S) -> Pattern {
        Pattern::Str(string.into())
    }

    pub fn concat<I>(subs: I) -> Pattern
    where
        I: IntoIterator<Item = Pattern>,
    {
        Pattern::Concat(subs.into_iter().collect())
    }

    pub fn alternate(first: Pattern, second: Pattern) -> Pattern {
        Pattern::Alternate(Box::new(first), Box::new(second))
    }

    pub fn optional(sub: Pattern) -> Pattern {
        Pattern::Optional(Box::new(sub))
    }

    pub fn star(sub: Pattern) -> Pattern {
        Pattern::Star(Box::new(sub))
    }

    pub fn plus(sub: Pattern) -> Pattern {
        Pattern::Plus(Box::new(sub))
    }

    pub fn choice<I>(chars: I) -> Pattern
    where
        I: IntoIterator<Item = char>,
    {
        Pattern::Choice(chars.into_iter().collect())
    }

    /// `sub` repeated at least `min` times and, if given, at most `max`
    /// times.
    ///
    /// This fails with [`BuildError::InvalidRepetition`] when `max` is given
    /// and is not greater than `min`.
    pub fn repeat(
        sub: Pattern,
        min: u32,
        max: Option<u32>,
    ) -> BuildResult<Pattern> {
        Repetition::new(sub, min, max).map(Pattern::Repeat)
    }

    /// This pattern followed by `next`.
    ///
    /// Chaining several calls extends a single concatenation rather than
    /// nesting them.
    pub fn then(self, next: Pattern) -> Pattern {
        match self {
            Pattern::Concat(mut subs) => {
                subs.push(next);
                Pattern::Concat(subs)
            }
            first => Pattern::Concat(vec![first, next]),
        }
    }

    /// This pattern or `other`.
    pub fn or(self, other: Pattern) -> Pattern {
        Pattern::alternate(self, other)
    }

    /// Returns true when this pattern accepts the empty string.
    ///
    /// A loop whose body accepts the empty string can send the backtracking
    /// matcher around the loop forever without consuming input.
    ///
    /// This recurses once per level of nesting. The compiler only calls it
    /// on patterns that passed its [nest limit](crate::Config::nest_limit).
    pub fn matches_empty(&self) -> bool {
        match *self {
            Pattern::Char(_) | Pattern::Choice(_) => false,
            Pattern::Str(ref s) => s.is_empty(),
            Pattern::Concat(ref subs) => subs.iter().all(Pattern::matches_empty),
            Pattern::Alternate(ref a, ref b) => {
                a.matches_empty() || b.matches_empty()
            }
            Pattern::Optional(_) | Pattern::Star(_) => true,
            Pattern::Plus(ref sub) => sub.matches_empty(),
            Pattern::Repeat(ref rep) => {
                rep.min() == 0 || rep.sub().matches_empty()
            }
        }
    }
}

impl From<char> for Pattern {
    fn from(ch: char) -> Pattern {
        Pattern::Char(ch)
    }
}

impl From<&str> for Pattern {
    fn from(string: &str) -> Pattern {
        Pattern::string(string)
    }
}

/// A bounded repetition of a sub-pattern.
///
/// The bounds are checked when the repetition is created, so every
/// `Repetition` that exists has `max > min` whenever `max` is present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repetition {
    sub: Box<Pattern>,
    min: u32,
    max: Option<u32>,
}

impl Repetition {
    pub fn new(
        sub: Pattern,
        min: u32,
        max: Option<u32>,
    ) -> BuildResult<Repetition> {
        if let Some(max) = max {
            if max <= min {
                return Err(BuildError::InvalidRepetition { min, max });
            }
        }
        Ok(Repetition { sub: Box::new(sub), min, max })
    }

    pub fn sub(&self) -> &Pattern {
        &self.sub
    }

    /// The number of mandatory copies.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The upper bound, or `None` for an unbounded repetition.
    pub fn max(&self) -> Option<u32> {
        self.max
    }
}
