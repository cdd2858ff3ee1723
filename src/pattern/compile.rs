//! Turn pattern source into a [PatternElement] tree.
//!
//! ```text
//! text        literal, `\x` escapes any character
//! [...]       optional
//! (a|2¦b)     choice, an alternative may start with a parse mark
//! <regex>     regex span
//! %-~t1/t2%   placeholder: `-` nullable, then one of `~ * ^`, then types
//! ```

use std::ops::Range;

use itertools::Itertools;
use regex::Regex;

use super::{ChoiceAlt, PatternElement, PatternRegex, Placeholder};
use crate::error::{PatternError, PatternResult};
use crate::types::{Acceptance, Type};

/// Separates a parse mark from the alternative it belongs to
const MARK_SEP: char = '¦';

/// A bracket, placeholder or regex was opened but never closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnclosedDelimiter {
  pub open: char,
  pub at: usize,
}
impl PatternError for UnclosedDelimiter {
  const DESCRIPTION: &'static str = "A delimiter was never closed";
  fn message(&self) -> String { format!("{} opened at {} is never closed", self.open, self.at) }
  fn one_position(&self) -> Range<usize> { self.at..self.at + self.open.len_utf8() }
}

/// A closing bracket or choice separator without a matching opener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnexpectedCloser {
  pub closer: char,
  pub at: usize,
}
impl PatternError for UnexpectedCloser {
  const DESCRIPTION: &'static str = "Closing delimiter without an opener";
  fn message(&self) -> String {
    format!("{} at {} does not close anything, escape it as \\{}", self.closer, self.at, self.closer)
  }
  fn one_position(&self) -> Range<usize> { self.at..self.at + self.closer.len_utf8() }
}

/// A placeholder that accepts no types, or has an empty type name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyPlaceholder {
  pub range: Range<usize>,
}
impl PatternError for EmptyPlaceholder {
  const DESCRIPTION: &'static str = "Placeholder without a type";
  fn message(&self) -> String {
    "Every placeholder must name at least one type and type names cannot be empty".to_string()
  }
  fn one_position(&self) -> Range<usize> { self.range.clone() }
}

/// A nullability or acceptance flag in the wrong place
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MisplacedSigil {
  pub sigil: char,
  pub at: usize,
}
impl PatternError for MisplacedSigil {
  const DESCRIPTION: &'static str = "Placeholder flags out of order";
  fn message(&self) -> String {
    format!("{} at {} is misplaced, flags are written as %-~type%", self.sigil, self.at)
  }
  fn one_position(&self) -> Range<usize> { self.at..self.at + self.sigil.len_utf8() }
}

/// The source of a regex span failed to compile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadRegex {
  pub range: Range<usize>,
  pub reason: String,
}
impl PatternError for BadRegex {
  const DESCRIPTION: &'static str = "Invalid regular expression";
  fn message(&self) -> String { self.reason.clone() }
  fn one_position(&self) -> Range<usize> { self.range.clone() }
}

/// A parse mark that doesn't fit the mark type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadMark {
  pub range: Range<usize>,
}
impl PatternError for BadMark {
  const DESCRIPTION: &'static str = "Invalid parse mark";
  fn message(&self) -> String { "Parse marks must be decimal numbers below 2^32".to_string() }
  fn one_position(&self) -> Range<usize> { self.range.clone() }
}

/// Compile a pattern. Fails fast on malformed source so that matching never
/// has to deal with broken trees.
pub fn compile_pattern(src: &str) -> PatternResult<PatternElement> {
  let mut c = Compiler { src, pos: 0 };
  let tree = c.sequence()?;
  match c.peek() {
    None => Ok(tree),
    Some(closer) => Err(UnexpectedCloser { closer, at: c.pos }.pack()),
  }
}

struct Compiler<'a> {
  src: &'a str,
  pos: usize,
}
impl<'a> Compiler<'a> {
  fn rest(&self) -> &'a str { &self.src[self.pos..] }
  fn peek(&self) -> Option<char> { self.rest().chars().next() }
  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.pos += c.len_utf8();
    Some(c)
  }

  /// Parse until the end of the source or an unescaped `]`, `)` or `|`,
  /// which is left for the caller
  fn sequence(&mut self) -> PatternResult<PatternElement> {
    let mut items = Vec::new();
    let mut text = String::new();
    let flush = |text: &mut String, items: &mut Vec<PatternElement>| {
      if !text.is_empty() {
        items.push(PatternElement::Text(std::mem::take(text)))
      }
    };
    while let Some(c) = self.peek() {
      match c {
        ']' | ')' | '|' => break,
        '\\' => {
          self.bump();
          text.push(self.bump().unwrap_or('\\'));
        },
        '[' => {
          flush(&mut text, &mut items);
          items.push(self.optional()?);
        },
        '(' => {
          flush(&mut text, &mut items);
          items.push(self.choice()?);
        },
        '%' => {
          flush(&mut text, &mut items);
          items.push(self.placeholder()?);
        },
        '<' => {
          flush(&mut text, &mut items);
          items.push(self.regex()?);
        },
        _ => {
          text.push(c);
          self.bump();
        },
      }
    }
    flush(&mut text, &mut items);
    Ok(match <[_; 1]>::try_from(items) {
      Ok([single]) => single,
      Err(items) => PatternElement::Group(items),
    })
  }

  /// `[a]`, or `[a|b]` as a shorthand for `[(a|b)]`
  fn optional(&mut self) -> PatternResult<PatternElement> {
    let inner = match <[_; 1]>::try_from(self.alternatives('[', ']')?) {
      Ok([ChoiceAlt { mark: 0, element }]) => element,
      Ok([alt]) => PatternElement::Choice(vec![alt]),
      Err(alts) => PatternElement::Choice(alts),
    };
    Ok(PatternElement::Optional(Box::new(inner)))
  }

  fn choice(&mut self) -> PatternResult<PatternElement> {
    Ok(PatternElement::Choice(self.alternatives('(', ')')?))
  }

  /// `|`-separated alternatives between `open` and `close`
  fn alternatives(&mut self, open: char, close: char) -> PatternResult<Vec<ChoiceAlt>> {
    let at = self.pos;
    self.bump();
    let mut alts = Vec::new();
    loop {
      let mark = self.mark()?;
      let element = self.sequence()?;
      alts.push(ChoiceAlt { mark, element });
      match self.bump() {
        Some('|') => continue,
        Some(c) if c == close => return Ok(alts),
        Some(closer) =>
          return Err(UnexpectedCloser { closer, at: self.pos - closer.len_utf8() }.pack()),
        None => return Err(UnclosedDelimiter { open, at }.pack()),
      }
    }
  }

  /// An optional `123¦` prefix on a choice alternative
  fn mark(&mut self) -> PatternResult<u32> {
    let rest = self.rest();
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if !rest[digits..].starts_with(MARK_SEP) {
      return Ok(0);
    }
    let range = self.pos..self.pos + digits;
    let mark = rest[..digits].parse::<u32>().map_err(|_| BadMark { range }.pack())?;
    self.pos += digits + MARK_SEP.len_utf8();
    Ok(mark)
  }

  fn placeholder(&mut self) -> PatternResult<PatternElement> {
    let at = self.pos;
    self.bump();
    let len = self.rest().find('%').ok_or_else(|| UnclosedDelimiter { open: '%', at }.pack())?;
    let body_start = self.pos;
    let mut body = &self.rest()[..len];
    self.pos += len + 1;
    let range = at..self.pos;
    let nullable = match body.strip_prefix('-') {
      Some(tail) => {
        body = tail;
        true
      },
      None => false,
    };
    let mut acceptance = Acceptance::All;
    if let Some(acc) = body.chars().next().and_then(Acceptance::from_sigil) {
      acceptance = acc;
      body = &body[1..];
    }
    let is_flag = |c: &char| *c == '-' || Acceptance::from_sigil(*c).is_some();
    if let Some(sigil) = body.chars().next().filter(is_flag) {
      return Err(MisplacedSigil { sigil, at: body_start + len - body.len() }.pack());
    }
    let names = body.split('/').map(str::trim).collect_vec();
    if names.iter().any(|n| n.is_empty()) {
      return Err(EmptyPlaceholder { range }.pack());
    }
    let types = names.into_iter().map(Type::new).collect_vec();
    Ok(PatternElement::Placeholder(Placeholder::new(types, acceptance, nullable)))
  }

  fn regex(&mut self) -> PatternResult<PatternElement> {
    let at = self.pos;
    self.bump();
    let rest = self.rest();
    let mut escaped = false;
    let len = (rest.char_indices())
      .find(|(_, c)| {
        let close = *c == '>' && !escaped;
        escaped = *c == '\\' && !escaped;
        close
      })
      .map(|(i, _)| i)
      .ok_or_else(|| UnclosedDelimiter { open: '<', at }.pack())?;
    let source = &rest[..len];
    self.pos += len + 1;
    let regex =
      Regex::new(source).map_err(|e| BadRegex { range: at..self.pos, reason: e.to_string() }.pack())?;
    Ok(PatternElement::Regex(PatternRegex::new(regex)))
  }
}

#[cfg(test)]
mod test {
  use super::{
    compile_pattern, BadMark, BadRegex, EmptyPlaceholder, MisplacedSigil, UnclosedDelimiter,
    UnexpectedCloser,
  };
  use crate::error::PatternErrorObj;
  use crate::pattern::{ChoiceAlt, PatternElement};
  use crate::types::{Acceptance, Type};

  fn err_of<T: 'static + Clone>(src: &str) -> T {
    let err: PatternErrorObj = compile_pattern(src).expect_err(src);
    err.as_any().downcast_ref::<T>().cloned().unwrap_or_else(|| panic!("{src}: {err}"))
  }

  #[test]
  fn sequence_structure() {
    let tree = compile_pattern("give %player% [the ](1¦one|2¦two)").unwrap();
    let PatternElement::Group(items) = tree else { panic!("expected a group") };
    assert_eq!(items.len(), 5);
    assert_eq!(items[0], PatternElement::text("give "));
    assert_eq!(items[1], PatternElement::placeholder(&["player"], Acceptance::All));
    assert_eq!(items[2], PatternElement::text(" "));
    assert_eq!(items[3], PatternElement::Optional(Box::new(PatternElement::text("the "))));
    assert_eq!(
      items[4],
      PatternElement::Choice(vec![
        ChoiceAlt { mark: 1, element: PatternElement::text("one") },
        ChoiceAlt { mark: 2, element: PatternElement::text("two") },
      ])
    );
  }

  #[test]
  fn placeholder_flags() {
    let PatternElement::Placeholder(ph) = compile_pattern("%-^a/ b %").unwrap() else {
      panic!("expected a placeholder")
    };
    assert!(ph.nullable);
    assert_eq!(ph.acceptance, Acceptance::VariablesOnly);
    assert_eq!(ph.types, vec![Type::new("a"), Type::new("b")]);
  }

  #[test]
  fn digits_without_mark_are_text() {
    assert_eq!(
      compile_pattern("(12 apples|x)").unwrap(),
      PatternElement::Choice(vec![
        ChoiceAlt { mark: 0, element: PatternElement::text("12 apples") },
        ChoiceAlt { mark: 0, element: PatternElement::text("x") },
      ])
    );
  }

  #[test]
  fn optional_alternatives() {
    let choice = PatternElement::Choice(vec![
      ChoiceAlt { mark: 0, element: PatternElement::text("to") },
      ChoiceAlt { mark: 0, element: PatternElement::text("from") },
    ]);
    assert_eq!(compile_pattern("[to|from]").unwrap(), PatternElement::Optional(Box::new(choice.clone())));
    assert_eq!(compile_pattern("[(to|from)]").unwrap(), PatternElement::Optional(Box::new(choice)));
    let PatternElement::Optional(marked) = compile_pattern("[4¦x]").unwrap() else { panic!() };
    assert!(matches!(*marked, PatternElement::Choice(ref alts) if alts[0].mark == 4));
  }

  #[test]
  fn errors() {
    assert_eq!(err_of::<UnclosedDelimiter>("a [b"), UnclosedDelimiter { open: '[', at: 2 });
    assert_eq!(err_of::<UnclosedDelimiter>("(a|b"), UnclosedDelimiter { open: '(', at: 0 });
    assert_eq!(err_of::<UnclosedDelimiter>("x %num"), UnclosedDelimiter { open: '%', at: 2 });
    assert_eq!(err_of::<UnclosedDelimiter>("<\\d+"), UnclosedDelimiter { open: '<', at: 0 });
    assert_eq!(err_of::<UnexpectedCloser>("a]"), UnexpectedCloser { closer: ']', at: 1 });
    assert_eq!(err_of::<UnexpectedCloser>("a|b"), UnexpectedCloser { closer: '|', at: 1 });
    assert_eq!(err_of::<UnexpectedCloser>("[a)"), UnexpectedCloser { closer: ')', at: 2 });
    assert_eq!(err_of::<EmptyPlaceholder>("%%"), EmptyPlaceholder { range: 0..2 });
    assert_eq!(err_of::<EmptyPlaceholder>("%a//b%"), EmptyPlaceholder { range: 0..6 });
    assert_eq!(err_of::<MisplacedSigil>("%*-a%"), MisplacedSigil { sigil: '-', at: 2 });
    assert_eq!(err_of::<BadMark>("(99999999999¦a)").range, 1..12);
    assert_eq!(err_of::<BadRegex>("<(>").range, 0..3);
  }
}
