use crate::{
    error::{BuildError, BuildResult},
    fragment::{Builder, Fragment},
    matcher::{Matcher, Strategy},
    nfa::NFA,
    pattern::{Pattern, Repetition},
};

/// The configuration used by a [`Compiler`] and the [`Matcher`] it builds.
#[derive(Clone, Debug)]
pub struct Config {
    strategy: Strategy,
    size_limit: Option<usize>,
    nest_limit: u32,
    backtrack_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            strategy: Strategy::default(),
            size_limit: Some(10 * (1 << 20)),
            nest_limit: 250,
            backtrack_limit: None,
        }
    }
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Choose which matcher [`Matcher::is_match`] runs.
    ///
    /// The default is [`Strategy::SetSimulation`].
    pub fn strategy(mut self, strategy: Strategy) -> Config {
        self.strategy = strategy;
        self
    }

    /// Set a heap budget, in bytes, for the states built from a pattern.
    ///
    /// Bounded repetitions copy their sub-pattern, so nesting them grows the
    /// automaton multiplicatively. Exceeding the limit fails compilation
    /// with [`BuildError::ExceededSizeLimit`](crate::BuildError).
    ///
    /// The default is 10 MiB. `None` removes the limit.
    pub fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = limit;
        self
    }

    /// Set how deeply a pattern tree may nest.
    ///
    /// Lowering walks the pattern recursively, so this bounds the stack it
    /// uses. A leaf such as a character or a string has depth 0, and every
    /// other node is one deeper than its deepest sub-pattern. A deeper
    /// pattern fails compilation with
    /// [`BuildError::NestLimitExceeded`](crate::BuildError).
    ///
    /// The default is 250.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = limit;
        self
    }

    /// Bound the number of steps the backtracking matcher may take when it
    /// is run through a [`Matcher`].
    ///
    /// When the budget runs out, the matcher answers with the set-simulation
    /// matcher instead. By default there is no limit.
    pub fn backtrack_limit(mut self, limit: Option<usize>) -> Config {
        self.backtrack_limit = limit;
        self
    }

    pub fn get_strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit
    }

    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit
    }

    pub fn get_backtrack_limit(&self) -> Option<usize> {
        self.backtrack_limit
    }
}

/// Compiler that lowers a [`Pattern`] into a Thompson NFA.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Compile `pattern` into a matcher.
    ///
    /// Patterns nested deeper than the configured
    /// [nest limit](Config::nest_limit) are rejected before any state is
    /// built.
    pub fn compile(&self, pattern: &Pattern) -> BuildResult<Matcher> {
        let nfa = self.build_nfa(pattern)?;
        Ok(Matcher::with_config(nfa, &self.config))
    }

    /// Compile `pattern` into a finalized NFA.
    pub fn build_nfa(&self, pattern: &Pattern) -> BuildResult<NFA> {
        check_nesting(pattern, self.config.nest_limit)?;
        let mut builder = Builder::new();
        builder.set_size_limit(self.config.size_limit)?;
        let fragment = self.compile_pattern(&mut builder, pattern)?;
        let nfa = builder.build(fragment)?;
        debug!("compiled {:?} into {} states", pattern, nfa.len());
        Ok(nfa)
    }

    /// Lower a pattern node to an NFA fragment
    fn compile_pattern(
        &self,
        builder: &mut Builder,
        pattern: &Pattern,
    ) -> BuildResult<Fragment> {
        match *pattern {
            Pattern::Char(ch) => builder.char(ch),
            Pattern::Str(ref string) => builder.string(string),
            Pattern::Concat(ref subs) => self.compile_concat(builder, subs),
            Pattern::Alternate(ref first, ref second) => {
                let first = self.compile_pattern(builder, first)?;
                let second = self.compile_pattern(builder, second)?;
                builder.alternate(first, second)
            }
            Pattern::Optional(ref sub) => {
                let sub = self.compile_pattern(builder, sub)?;
                builder.optional(sub)
            }
            Pattern::Star(ref sub) => {
                warn_empty_loop(sub);
                let sub = self.compile_pattern(builder, sub)?;
                builder.zero_or_more(sub)
            }
            Pattern::Plus(ref sub) => {
                warn_empty_loop(sub);
                let sub = self.compile_pattern(builder, sub)?;
                builder.one_or_more(sub)
            }
            Pattern::Choice(ref chars) => builder.choice(chars.iter().copied()),
            Pattern::Repeat(ref rep) => self.compile_repetition(builder, rep),
        }
    }

    fn compile_concat(
        &self,
        builder: &mut Builder,
        subs: &[Pattern],
    ) -> BuildResult<Fragment> {
        let mut frags = Vec::with_capacity(subs.len());
        for sub in subs {
            frags.push(self.compile_pattern(builder, sub)?);
        }
        builder.concat(frags)
    }

    /// Expand `sub{min,max}` into `min` mandatory copies followed by either
    /// `max - min` optional copies or, when unbounded, a single starred copy.
    ///
    /// Every copy is lowered separately so that no fragment is linked twice.
    fn compile_repetition(
        &self,
        builder: &mut Builder,
        rep: &Repetition,
    ) -> BuildResult<Fragment> {
        let sub = rep.sub();
        let mut frags = vec![];
        for _ in 0..rep.min() {
            frags.push(self.compile_pattern(builder, sub)?);
        }
        match rep.max() {
            Some(max) => {
                for _ in rep.min()..max {
                    let copy = self.compile_pattern(builder, sub)?;
                    frags.push(builder.optional(copy)?);
                }
            }
            None => {
                warn_empty_loop(sub);
                let copy = self.compile_pattern(builder, sub)?;
                frags.push(builder.zero_or_more(copy)?);
            }
        }
        builder.concat(frags)
    }
}

/// Fail if any path from `pattern` down to a leaf is longer than `limit`.
fn check_nesting(pattern: &Pattern, limit: u32) -> BuildResult<()> {
    let mut stack = vec![(pattern, 0u32)];
    while let Some((pattern, depth)) = stack.pop() {
        if depth > limit {
            return Err(BuildError::NestLimitExceeded { limit });
        }
        let depth = depth + 1;
        match *pattern {
            Pattern::Char(_) | Pattern::Str(_) | Pattern::Choice(_) => {}
            Pattern::Concat(ref subs) => {
                stack.extend(subs.iter().map(|sub| (sub, depth)));
            }
            Pattern::Alternate(ref first, ref second) => {
                stack.push((&**first, depth));
                stack.push((&**second, depth));
            }
            Pattern::Optional(ref sub)
            | Pattern::Star(ref sub)
            | Pattern::Plus(ref sub) => stack.push((&**sub, depth)),
            Pattern::Repeat(ref rep) => stack.push((rep.sub(), depth)),
        }
    }
    Ok(())
}

fn warn_empty_loop(body: &Pattern) {
    if body.matches_empty() {
        debug!(
            "loop body {:?} matches the empty string; the backtracking \
             matcher may not terminate on this pattern",
            body,
        );
    }
}
