use thompson_fragments::{
    compile, compile_fragment, BuildError, Builder, Compiler, Config, Matcher,
    Pattern, SlotKind, Strategy,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs both matchers and checks that they agree.
fn is_match(matcher: &Matcher, input: &str) -> bool {
    let backtracked = matcher.backtracker().is_match(input);
    let simulated = matcher.pikevm().is_match(input);
    assert_eq!(
        backtracked, simulated,
        "matchers disagree on {:?} for {:?}",
        input,
        matcher.nfa()
    );
    simulated
}

fn complex_n(n: usize) -> Pattern {
    let optional = (0..n).map(|_| Pattern::optional('a'.into()));
    let mandatory = (0..n).map(|_| Pattern::char('a'));
    Pattern::concat(optional.chain(mandatory))
}

#[test]
fn literal() -> anyhow::Result<()> {
    init_logger();
    let matcher = compile(&Pattern::char('a'))?;
    assert!(is_match(&matcher, "a"));
    assert!(!is_match(&matcher, "b"));
    assert!(!is_match(&matcher, ""));
    assert!(!is_match(&matcher, "aa"));
    Ok(())
}

#[test]
fn optional_prefix() -> anyhow::Result<()> {
    let pattern = Pattern::concat(vec![
        Pattern::optional('b'.into()),
        Pattern::optional('a'.into()),
        'b'.into(),
        'a'.into(),
    ]);
    let matcher = compile(&pattern)?;
    assert!(is_match(&matcher, "ba"));
    assert!(is_match(&matcher, "bba"));
    assert!(is_match(&matcher, "baba"));
    assert!(!is_match(&matcher, "b"));
    assert!(!is_match(&matcher, "bab"));
    Ok(())
}

#[test]
fn star_over_alternation() -> anyhow::Result<()> {
    let pattern = Pattern::star(Pattern::string("abc").or(Pattern::string("def")));
    let matcher = compile(&pattern)?;
    for accepted in ["", "abc", "def", "defabc"] {
        assert!(is_match(&matcher, accepted), "{:?}", accepted);
    }
    for k in 1..6 {
        assert!(is_match(&matcher, &"abcdef".repeat(k)));
    }
    for rejected in ["abc def", "abcde", "ab", "abcabcd"] {
        assert!(!is_match(&matcher, rejected), "{:?}", rejected);
    }
    Ok(())
}

#[test]
fn plus_over_alternation() -> anyhow::Result<()> {
    let abc = || Pattern::string("abc");
    let def = || Pattern::string("def");
    let pattern = Pattern::plus(abc().then(def()).or(def().then(abc())));
    let matcher = compile(&pattern)?;
    for accepted in ["abcdef", "defabc", "abcdefdefabc", "defabcdefabc"] {
        assert!(is_match(&matcher, accepted), "{:?}", accepted);
    }
    assert!(is_match(&matcher, &"abcdef".repeat(4)));
    for rejected in ["", "abcde", "abc", "abcabc", "abcdefabc"] {
        assert!(!is_match(&matcher, rejected), "{:?}", rejected);
    }
    Ok(())
}

#[test]
fn choice_set() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::choice('a'..='f'))?;
    for ch in 'a'..='f' {
        assert!(is_match(&matcher, &ch.to_string()));
    }
    assert!(!is_match(&matcher, "g"));
    assert!(!is_match(&matcher, ""));
    assert!(!is_match(&matcher, "aa"));
    Ok(())
}

#[test]
fn bounded_repetition() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::repeat('a'.into(), 5, Some(8))?)?;
    for n in 5..=8 {
        assert!(is_match(&matcher, &"a".repeat(n)), "{} a's", n);
    }
    assert!(!is_match(&matcher, &"a".repeat(4)));
    assert!(!is_match(&matcher, &"a".repeat(9)));
    assert!(!is_match(&matcher, "aaaaba"));
    assert!(!is_match(&matcher, "aaaaab"));
    Ok(())
}

#[test]
fn unbounded_repetition() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::repeat("ab".into(), 2, None)?)?;
    assert!(!is_match(&matcher, "ab"));
    assert!(is_match(&matcher, "abab"));
    assert!(is_match(&matcher, &"ab".repeat(7)));
    assert!(!is_match(&matcher, "ababa"));

    let matcher = compile(&Pattern::repeat('a'.into(), 0, Some(2))?)?;
    assert!(is_match(&matcher, ""));
    assert!(is_match(&matcher, "aa"));
    assert!(!is_match(&matcher, "aaa"));
    Ok(())
}

#[test]
fn nested_repetition() -> anyhow::Result<()> {
    let inner = Pattern::repeat(Pattern::choice("xy".chars()), 1, Some(2))?;
    let matcher = compile(&Pattern::repeat(inner.then('-'.into()), 2, Some(3))?)?;
    assert!(is_match(&matcher, "x-yx-"));
    assert!(is_match(&matcher, "xy-y-yy-"));
    assert!(!is_match(&matcher, "x-"));
    assert!(!is_match(&matcher, "x-y-y-y-"));
    assert!(!is_match(&matcher, "xyx-y-"));
    Ok(())
}

#[test]
fn invalid_repetition_bounds() {
    assert_eq!(
        Err(BuildError::InvalidRepetition { min: 2, max: 2 }),
        Pattern::repeat('a'.into(), 2, Some(2))
    );
    assert_eq!(
        Err(BuildError::InvalidRepetition { min: 3, max: 1 }),
        Pattern::repeat('a'.into(), 3, Some(1))
    );
}

#[test]
fn many_optionals() -> anyhow::Result<()> {
    let matcher = compile(&complex_n(12))?;
    assert!(is_match(&matcher, &"a".repeat(12)));
    assert!(is_match(&matcher, &"a".repeat(24)));
    assert!(!is_match(&matcher, &"a".repeat(11)));

    // Too slow to backtrack through, but linear for set simulation.
    let matcher = compile(&complex_n(40))?;
    assert!(matcher.pikevm().is_match(&"a".repeat(40)));
    assert!(!matcher.pikevm().is_match(&"a".repeat(81)));
    Ok(())
}

#[test]
fn reused_fragment_is_rejected() -> anyhow::Result<()> {
    let mut b = Builder::new();
    let a = b.char('a')?;
    let err = b.concat(vec![a.clone(), a.clone(), a.clone(), a]).unwrap_err();
    assert_eq!(BuildError::SlotAlreadySet { state: 0, slot: SlotKind::Next }, err);
    Ok(())
}

#[test]
fn reused_fragment_in_alternation_is_rejected() -> anyhow::Result<()> {
    let mut b = Builder::new();
    let a = b.char('a')?;
    let alt = b.alternate(a.clone(), a)?;
    let err = compile_fragment(b, alt).unwrap_err();
    assert_eq!(BuildError::SlotAlreadySet { state: 0, slot: SlotKind::Next }, err);
    Ok(())
}

#[test]
fn finished_automaton_cannot_be_extended() -> anyhow::Result<()> {
    let mut b = Builder::new();
    let end = b.end()?;
    let end_state = end.start();
    let a = b.char('a')?;
    let err = b.concat(vec![end, a]).unwrap_err();
    assert_eq!(BuildError::AppendToEnd { state: end_state }, err);
    Ok(())
}

#[test]
fn handwritten_fragments() -> anyhow::Result<()> {
    let mut b = Builder::new();
    let digits = b.choice('0'..='9')?;
    let number = b.one_or_more(digits)?;
    let dot = b.char('.')?;
    let frac_digits = b.choice('0'..='9')?;
    let frac_digits = b.zero_or_more(frac_digits)?;
    let frac = b.concat(vec![dot, frac_digits])?;
    let frac = b.optional(frac)?;
    let frag = b.concat(vec![number, frac])?;
    let matcher = compile_fragment(b, frag)?;

    for accepted in ["0", "42", "3.", "3.14"] {
        assert!(is_match(&matcher, accepted), "{:?}", accepted);
    }
    for rejected in ["", ".5", "1.2.3", "1a"] {
        assert!(!is_match(&matcher, rejected), "{:?}", rejected);
    }
    Ok(())
}

#[test]
fn non_ascii_input() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::plus(Pattern::choice("αβ☃".chars())))?;
    assert!(is_match(&matcher, "αβ☃α"));
    assert!(!is_match(&matcher, "αβγ"));
    Ok(())
}

#[test]
fn repeated_matches_are_identical() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::star(Pattern::string("ab").or('c'.into())))?;
    let inputs = ["", "ab", "cab", "abcc", "a", "abca"];
    let first: Vec<bool> = inputs.iter().map(|s| is_match(&matcher, s)).collect();
    for _ in 0..10 {
        let again: Vec<bool> = inputs.iter().map(|s| is_match(&matcher, s)).collect();
        assert_eq!(first, again);
    }
    Ok(())
}

#[test]
fn set_simulation_memory_is_input_independent() -> anyhow::Result<()> {
    let matcher = compile(&Pattern::star(Pattern::choice("ab".chars())))?;
    let vm = matcher.pikevm();
    let mut cache = vm.create_cache();
    let before = cache.memory_usage();
    assert!(vm.is_match_with(&mut cache, "ab"));
    assert!(vm.is_match_with(&mut cache, &"ab".repeat(100_000)));
    assert!(!vm.is_match_with(&mut cache, &"abc".repeat(1_000)));
    assert_eq!(before, cache.memory_usage());
    Ok(())
}

#[test]
fn backtrack_strategy_with_limit() -> anyhow::Result<()> {
    init_logger();
    let config = Config::new()
        .strategy(Strategy::Backtrack)
        .backtrack_limit(Some(1_000));
    let compiler = Compiler::new().configure(config);

    // (a?)* diverges when backtracked; the limit hands it to set simulation.
    let matcher = compiler.compile(&Pattern::star(Pattern::optional('a'.into())))?;
    assert!(matcher.is_match(""));
    assert!(matcher.is_match("aaaa"));
    assert!(!matcher.is_match("aab"));

    let matcher = compiler.compile(&Pattern::string("abc"))?;
    assert_eq!(Ok(true), matcher.backtracker().try_is_match("abc"));
    Ok(())
}

#[test]
fn fragment_from_another_builder() -> anyhow::Result<()> {
    let mut big = Builder::new();
    big.string("abcdef")?;
    let foreign = big.char('z')?;

    let mut small = Builder::new();
    let x = small.char('x')?;
    assert_eq!(
        Err(BuildError::ForeignFragment { state: foreign.start() }),
        small.alternate(x.clone(), foreign)
    );
    let y = small.char('y')?;
    let alt = small.alternate(x, y)?;
    let matcher = compile_fragment(small, alt)?;
    assert!(is_match(&matcher, "x"));
    assert!(!is_match(&matcher, "z"));
    Ok(())
}

#[test]
fn default_limits_reject_runaway_patterns() {
    let wide = Pattern::repeat(Pattern::string("abcd"), 0, Some(1_000_000));
    assert!(matches!(
        compile(&wide.unwrap()),
        Err(BuildError::ExceededSizeLimit { .. })
    ));

    let deep = (0..300).fold(Pattern::char('a'), |p, _| Pattern::optional(p));
    assert_eq!(
        BuildError::NestLimitExceeded { limit: 250 },
        compile(&deep).unwrap_err()
    );
}
