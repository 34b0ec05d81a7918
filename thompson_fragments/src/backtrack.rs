/*!
A backtracking matcher.

The backtracker explores one path through the automaton at a time, depth
first, and stops at the first path that consumes the whole input and lands on
an end state. Branches are tried `next` before `alt`, and union alternates in
the order they were declared.

Rather than recursing, the search keeps an explicit work-stack of
`(input offset, state)` pairs, so its depth is bounded by heap memory instead
of the call stack.

# Divergence

A loop whose body can match the empty string, for example `(a?)*`, lets the
search go around the loop forever without consuming input. The backtracker
does not detect this. [`Backtracker::is_match`] will not return on such a
pattern, while [`Backtracker::try_is_match`] with a step limit reports
[`MatchError::StepLimitExceeded`]. The set-simulation matcher in
[`pikevm`](crate::pikevm) has no such problem.
*/

use crate::{
    error::MatchError,
    nfa::{State, StateId, NFA},
};

/// A depth-first matcher over an NFA.
#[derive(Clone, Copy, Debug)]
pub struct Backtracker<'a> {
    nfa: &'a NFA,
    step_limit: Option<usize>,
}

impl<'a> Backtracker<'a> {
    /// Create a new matcher for the given NFA with no step limit.
    pub fn new(nfa: &'a NFA) -> Self {
        Self { nfa, step_limit: None }
    }

    /// Bound the number of states [`Backtracker::try_is_match`] may visit.
    pub fn with_step_limit(mut self, limit: Option<usize>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn get_step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    /// Check if the entire input matches.
    ///
    /// This ignores any configured step limit. See the
    /// [module documentation](self) for patterns on which it never returns.
    pub fn is_match(&self, input: &str) -> bool {
        match self.search(input, None) {
            Ok(matched) => matched,
            Err(MatchError::StepLimitExceeded { .. }) => unreachable!(),
        }
    }

    /// Check if the entire input matches, giving up once the step limit is
    /// exhausted. Without a step limit this is the same as
    /// [`Backtracker::is_match`].
    pub fn try_is_match(&self, input: &str) -> Result<bool, MatchError> {
        self.search(input, self.step_limit)
    }

    fn search(
        &self,
        input: &str,
        limit: Option<usize>,
    ) -> Result<bool, MatchError> {
        let mut stack: Vec<(usize, StateId)> = vec![(0, self.nfa.start())];
        let mut steps = 0usize;
        while let Some((at, id)) = stack.pop() {
            if let Some(limit) = limit {
                if steps == limit {
                    return Err(MatchError::StepLimitExceeded { limit });
                }
                steps += 1;
            }
            match *self.nfa.state(id) {
                State::End => {
                    if at == input.len() {
                        return Ok(true);
                    }
                }
                State::Char { ch, next } => {
                    let got = match input[at..].chars().next() {
                        Some(got) => got,
                        None => continue,
                    };
                    if got != ch {
                        continue;
                    }
                    if let Some(next) = next.get() {
                        stack.push((at + got.len_utf8(), next));
                    }
                }
                State::Branch { next, alt } => {
                    if let Some(alt) = alt.get() {
                        stack.push((at, alt));
                    }
                    if let Some(next) = next.get() {
                        stack.push((at, next));
                    }
                }
                State::Union { ref alternates } => {
                    stack.extend(alternates.iter().rev().map(|&to| (at, to)));
                }
            }
        }
        Ok(false)
    }
}
