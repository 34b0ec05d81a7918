use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use thompson_fragments::{compile, MatchError, Pattern};

const ALPHABET: &[char] = &['a', 'b', 'c'];

/// The most steps the backtracker may take before a case is discarded.
const STEP_LIMIT: usize = 200_000;

#[derive(Clone, Debug)]
struct ArbPattern(Pattern);

#[derive(Clone, Debug)]
struct ArbInput(String);

fn any_char(g: &mut Gen) -> char {
    *g.choose(ALPHABET).unwrap()
}

/// A body for a loop. Loops over bodies that match the empty string never
/// terminate under backtracking, so such bodies get a mandatory character.
fn loop_body(g: &mut Gen, depth: usize) -> Pattern {
    let body = gen_pattern(g, depth);
    if body.matches_empty() {
        body.then(Pattern::char(any_char(g)))
    } else {
        body
    }
}

fn gen_pattern(g: &mut Gen, depth: usize) -> Pattern {
    let choice = if depth == 0 { u8::arbitrary(g) % 3 } else { u8::arbitrary(g) % 10 };
    match choice {
        0 => Pattern::char(any_char(g)),
        1 => {
            let len = 2 + usize::arbitrary(g) % 2;
            Pattern::string((0..len).map(|_| any_char(g)).collect::<String>())
        }
        2 => {
            let len = 1 + usize::arbitrary(g) % 3;
            Pattern::choice((0..len).map(|_| any_char(g)))
        }
        3 => {
            let len = 1 + usize::arbitrary(g) % 3;
            Pattern::concat((0..len).map(|_| gen_pattern(g, depth - 1)))
        }
        4 | 5 => gen_pattern(g, depth - 1).or(gen_pattern(g, depth - 1)),
        6 => Pattern::optional(gen_pattern(g, depth - 1)),
        7 => Pattern::star(loop_body(g, depth - 1)),
        8 => Pattern::plus(loop_body(g, depth - 1)),
        _ => {
            let min = u32::arbitrary(g) % 3;
            if bool::arbitrary(g) {
                let max = min + 1 + u32::arbitrary(g) % 2;
                Pattern::repeat(gen_pattern(g, depth - 1), min, Some(max)).unwrap()
            } else {
                Pattern::repeat(loop_body(g, depth - 1), min, None).unwrap()
            }
        }
    }
}

impl Arbitrary for ArbPattern {
    fn arbitrary(g: &mut Gen) -> ArbPattern {
        ArbPattern(gen_pattern(g, 3))
    }
}

impl Arbitrary for ArbInput {
    fn arbitrary(g: &mut Gen) -> ArbInput {
        let len = usize::arbitrary(g) % 9;
        ArbInput((0..len).map(|_| any_char(g)).collect())
    }
}

fn matchers_agree(pattern: ArbPattern, inputs: Vec<ArbInput>) -> TestResult {
    let matcher = match compile(&pattern.0) {
        Ok(matcher) => matcher,
        Err(err) => return TestResult::error(err.to_string()),
    };
    let backtracker = matcher.backtracker().with_step_limit(Some(STEP_LIMIT));
    let pikevm = matcher.pikevm();
    let mut cache = pikevm.create_cache();
    for ArbInput(input) in inputs.iter().take(8) {
        let backtracked = match backtracker.try_is_match(input) {
            Ok(matched) => matched,
            Err(MatchError::StepLimitExceeded { .. }) => return TestResult::discard(),
        };
        if backtracked != pikevm.is_match_with(&mut cache, input) {
            return TestResult::failed();
        }
    }
    TestResult::passed()
}

#[test]
fn backtracking_and_set_simulation_agree() {
    let _ = env_logger::builder().is_test(true).try_init();
    QuickCheck::new()
        .tests(1_000)
        .max_tests(10_000)
        .gen(Gen::new(16))
        .quickcheck(matchers_agree as fn(ArbPattern, Vec<ArbInput>) -> TestResult);
}
