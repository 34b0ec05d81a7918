/*!
Lowering of pattern text into a [`Pattern`].

This crate does not parse pattern syntax itself. The functions here hand the
text to [`regex_syntax`] and translate the resulting [`Hir`] into a pattern
tree. Only the constructs a [`Pattern`] can express are accepted: literals,
small character classes, concatenation, alternation, groups and the `?`, `*`,
`+` and `{m,n}` repetitions. Anything else, such as anchors, word boundaries
and negated or very large classes, is rejected with
[`SyntaxError::Unsupported`].
*/

use regex_syntax::hir::{Class, Hir, HirKind};

use crate::{
    compiler::Compiler,
    error::SyntaxError,
    matcher::Matcher,
    pattern::Pattern,
};

/// The most characters a class may contain before it is rejected.
const MAX_CLASS_CHARS: usize = 256;

/// Parse `pattern` into a pattern tree.
pub fn parse(pattern: &str) -> Result<Pattern, SyntaxError> {
    let hir = regex_syntax::parse(pattern)?;
    from_hir(&hir)
}

/// Parse and compile `pattern` with the default configuration.
pub fn compile_str(pattern: &str) -> Result<Matcher, SyntaxError> {
    let pattern = parse(pattern)?;
    Ok(Compiler::new().compile(&pattern)?)
}

/// Translate a `regex-syntax` HIR into a pattern tree.
pub fn from_hir(hir: &Hir) -> Result<Pattern, SyntaxError> {
    match *hir.kind() {
        HirKind::Empty => Err(unsupported("empty pattern")),
        HirKind::Literal(ref literal) => {
            let string = core::str::from_utf8(&literal.0)
                .map_err(|_| unsupported("literal is not valid UTF-8"))?;
            let mut chars = string.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(Pattern::Char(ch)),
                (Some(_), Some(_)) => Ok(Pattern::string(string)),
                (None, _) => Err(unsupported("empty literal")),
            }
        }
        HirKind::Class(ref class) => from_class(class),
        HirKind::Look(ref look) => {
            Err(SyntaxError::Unsupported(format!("look-around {:?}", look)))
        }
        HirKind::Repetition(ref rep) => {
            let sub = from_hir(&rep.sub)?;
            match (rep.min, rep.max) {
                (0, Some(1)) => Ok(Pattern::optional(sub)),
                (0, None) => Ok(Pattern::star(sub)),
                (1, None) => Ok(Pattern::plus(sub)),
                (0, Some(0)) => Err(unsupported("empty repetition")),
                (1, Some(1)) => Ok(sub),
                (min, Some(max)) if min == max => {
                    Ok(Pattern::concat((0..min).map(|_| sub.clone())))
                }
                (min, max) => Ok(Pattern::repeat(sub, min, max)?),
            }
        }
        // Groups only group; there are no captures to record.
        HirKind::Capture(ref capture) => from_hir(&capture.sub),
        HirKind::Concat(ref subs) => {
            let subs = subs.iter().map(from_hir).collect::<Result<Vec<_>, _>>()?;
            Ok(Pattern::Concat(subs))
        }
        HirKind::Alternation(ref subs) => {
            let mut subs = subs.iter().rev();
            let last = match subs.next() {
                Some(last) => from_hir(last)?,
                None => return Err(unsupported("empty alternation")),
            };
            subs.try_fold(last, |rest, sub| -> Result<Pattern, SyntaxError> {
                Ok(Pattern::alternate(from_hir(sub)?, rest))
            })
        }
    }
}

fn from_class(class: &Class) -> Result<Pattern, SyntaxError> {
    let mut chars = vec![];
    match *class {
        Class::Unicode(ref class) => {
            for range in class.iter() {
                let start = u32::from(range.start());
                let end = u32::from(range.end());
                if chars.len() + (end - start) as usize >= MAX_CLASS_CHARS {
                    return Err(too_large());
                }
                chars.extend((start..=end).filter_map(char::from_u32));
            }
        }
        Class::Bytes(ref class) => {
            for range in class.iter() {
                if !range.end().is_ascii() {
                    return Err(unsupported("byte class outside of ASCII"));
                }
                let width = usize::from(range.end() - range.start());
                if chars.len() + width >= MAX_CLASS_CHARS {
                    return Err(too_large());
                }
                chars.extend((range.start()..=range.end()).map(char::from));
            }
        }
    }
    match chars.len() {
        0 => Err(unsupported("class that matches nothing")),
        1 => Ok(Pattern::Char(chars[0])),
        _ => Ok(Pattern::Choice(chars)),
    }
}

fn too_large() -> SyntaxError {
    SyntaxError::Unsupported(format!(
        "character class with more than {} characters",
        MAX_CLASS_CHARS
    ))
}

fn unsupported(what: &str) -> SyntaxError {
    SyntaxError::Unsupported(what.to_string())
}
