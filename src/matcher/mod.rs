//! Matching of compiled patterns against single lines of input
mod accept;
mod resolve;
pub mod splits;
mod state;

pub use accept::accepts;
pub use resolve::{resolve, WHETHER_PATTERN};
pub use state::{MatchEnv, MatchState, Matched, ParseResult, RegexCapture};

use self::splits::starts_with_ci;
use crate::pattern::PatternElement;

/// Match the whole of `line` against `pattern`. Whitespace around the line
/// is ignored. Failure is not an error, the caller is expected to try other
/// patterns.
#[must_use]
pub fn match_pattern<'a>(
  pattern: &'a PatternElement,
  line: &str,
  env: &'a MatchEnv<'a>,
) -> Option<Matched<'a>> {
  let mut state = MatchState::new(pattern, env);
  let end = match_seq(line, skip_ws(line, 0), &mut state)?;
  if !line[end..].trim().is_empty() {
    env.logger.debug(format!("{pattern}: unmatched input {:?}", &line[end..]));
    return None;
  }
  Some(state.finish())
}

/// Match the rest of the state's sequence from `index`
fn match_seq<'a>(s: &str, index: usize, state: &mut MatchState<'a>) -> Option<usize> {
  let mut i = index;
  while let Some(item) = state.current() {
    i = match_element(s, i, item, state)?;
    state.advance();
  }
  Some(i)
}

fn match_element<'a>(
  s: &str,
  index: usize,
  item: &'a PatternElement,
  state: &mut MatchState<'a>,
) -> Option<usize> {
  match item {
    PatternElement::Text(text) => match_text(s, index, text),
    PatternElement::Regex(re) => {
      let caps = re.regex().captures_at(s, index)?;
      let whole = caps.get(0)?;
      if whole.start() != index {
        return None;
      }
      state.record_capture(RegexCapture::from_captures(&caps));
      Some(whole.end())
    },
    PatternElement::Placeholder(ph) => resolve(s, index, ph, state),
    PatternElement::Group(_) => unreachable!("groups are flattened into the enclosing sequence"),
    PatternElement::Optional(inner) => {
      let mut branch = state.branch(inner);
      match match_seq(s, index, &mut branch) {
        Some(end) => {
          state.merge(branch);
          Some(end)
        },
        None => Some(index),
      }
    },
    PatternElement::Choice(alts) => {
      for alt in alts {
        let mut branch = state.branch(&alt.element);
        if let Some(end) = match_seq(s, index, &mut branch) {
          state.merge(branch);
          state.add_mark(alt.mark);
          return Some(end);
        }
      }
      None
    },
  }
}

fn skip_ws(s: &str, index: usize) -> usize { s.len() - s[index..].trim_start().len() }

/// Blank text matches any run of whitespace. Otherwise the body must be
/// found at the index, with blanks around it standing for any amount of
/// whitespace.
fn match_text(s: &str, index: usize, text: &str) -> Option<usize> {
  let body = text.trim();
  if body.is_empty() {
    return Some(skip_ws(s, index));
  }
  let mut i = index;
  if text.starts_with(char::is_whitespace) {
    i = skip_ws(s, i);
  }
  if !starts_with_ci(s, body, i) {
    return None;
  }
  i += body.len();
  if text.ends_with(char::is_whitespace) {
    if i < s.len() && !s[i..].starts_with(char::is_whitespace) {
      return None;
    }
    i = skip_ws(s, i);
  }
  Some(i)
}
