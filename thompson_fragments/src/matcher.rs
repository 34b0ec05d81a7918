use crate::{
    backtrack::Backtracker,
    compiler::Config,
    error::MatchError,
    nfa::NFA,
    pikevm::PikeVM,
};

/// Which matcher a [`Matcher`] runs.
///
/// Both matchers accept exactly the same inputs. They differ only in cost.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// Depth-first search with backtracking. See [`Backtracker`].
    Backtrack,
    /// Simulation over the set of live states. See [`PikeVM`].
    #[default]
    SetSimulation,
}

/// A compiled automaton bound to a matching strategy.
///
/// A `Matcher` owns its [`NFA`] and keeps no state between searches, so it
/// gives the same answer for the same input every time.
#[derive(Clone, Debug)]
pub struct Matcher {
    nfa: NFA,
    strategy: Strategy,
    backtrack_limit: Option<usize>,
}

impl Matcher {
    /// Create a matcher over `nfa` with the default configuration.
    pub fn new(nfa: NFA) -> Matcher {
        Matcher::with_config(nfa, &Config::default())
    }

    pub fn with_config(nfa: NFA, config: &Config) -> Matcher {
        Matcher {
            nfa,
            strategy: config.get_strategy(),
            backtrack_limit: config.get_backtrack_limit(),
        }
    }

    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Check if the entire input matches.
    ///
    /// With [`Strategy::Backtrack`] and a backtrack limit, a search that
    /// exhausts the limit is answered by the set-simulation matcher.
    pub fn is_match(&self, input: &str) -> bool {
        match self.strategy {
            Strategy::SetSimulation => self.pikevm().is_match(input),
            Strategy::Backtrack => match self.backtracker().try_is_match(input) {
                Ok(matched) => matched,
                Err(MatchError::StepLimitExceeded { .. }) => {
                    trace!(
                        "backtracker exhausted its limit of {:?} steps, \
                         falling back to set simulation",
                        self.backtrack_limit,
                    );
                    self.pikevm().is_match(input)
                }
            },
        }
    }

    /// The backtracking matcher over this automaton, carrying the configured
    /// backtrack limit.
    pub fn backtracker(&self) -> Backtracker<'_> {
        Backtracker::new(&self.nfa).with_step_limit(self.backtrack_limit)
    }

    /// The set-simulation matcher over this automaton.
    pub fn pikevm(&self) -> PikeVM<'_> {
        PikeVM::new(&self.nfa)
    }
}
