//! Compiled patterns. A pattern is an immutable tree which is matched against
//! many lines, possibly from several threads at once.
mod compile;
pub mod lookahead;

use std::fmt;

use itertools::Itertools;
use regex::Regex;

pub use compile::{
  compile_pattern, BadMark, BadRegex, EmptyPlaceholder, MisplacedSigil, UnclosedDelimiter,
  UnexpectedCloser,
};
pub use lookahead::{flatten, possible_next, Follower};

use crate::types::{Acceptance, Type};

/// Characters that must be escaped in literal pattern text
pub const METACHARS: &str = "[]()%<>|¦\\";

/// A typed slot in a pattern, `%type%` in source
#[derive(Clone, Debug)]
pub struct Placeholder {
  /// Tried in this order, the first type that parses and passes the
  /// acceptance filter wins
  pub types: Vec<Type>,
  pub acceptance: Acceptance,
  /// Whether the slot may be left empty by an enclosing optional
  pub nullable: bool,
}
impl Placeholder {
  pub fn new(types: Vec<Type>, acceptance: Acceptance, nullable: bool) -> Self {
    Self { types, acceptance, nullable }
  }
}
impl PartialEq for Placeholder {
  fn eq(&self, other: &Self) -> bool {
    self.types == other.types && self.acceptance == other.acceptance
  }
}
impl Eq for Placeholder {}
impl fmt::Display for Placeholder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let nullable = if self.nullable { "-" } else { "" };
    let sigil = self.acceptance.sigil().map(String::from).unwrap_or_default();
    write!(f, "%{nullable}{sigil}{}%", self.types.iter().join("/"))
  }
}

/// A compiled regular expression span, `<regex>` in source
#[derive(Clone, Debug)]
pub struct PatternRegex(Regex);
impl PatternRegex {
  pub fn new(regex: Regex) -> Self { Self(regex) }
  pub fn regex(&self) -> &Regex { &self.0 }
  pub fn source(&self) -> &str { self.0.as_str() }
}
impl PartialEq for PatternRegex {
  fn eq(&self, other: &Self) -> bool { self.source() == other.source() }
}
impl Eq for PatternRegex {}

/// One alternative of a [PatternElement::Choice]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceAlt {
  /// OR'd into the parse mark when this alternative matches
  pub mark: u32,
  pub element: PatternElement,
}

/// A node of a compiled pattern
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternElement {
  /// Literal text. Compared ignoring ASCII case, whitespace is flexible
  Text(String),
  Regex(PatternRegex),
  Placeholder(Placeholder),
  /// A sequence
  Group(Vec<PatternElement>),
  /// `[...]`, matched if possible and skipped otherwise
  Optional(Box<PatternElement>),
  /// `(a|b)`, the first matching alternative wins
  Choice(Vec<ChoiceAlt>),
}
impl PatternElement {
  pub fn text(text: impl Into<String>) -> Self { Self::Text(text.into()) }
  pub fn placeholder(types: &[&str], acceptance: Acceptance) -> Self {
    let types = types.iter().map(|t| Type::new(t)).collect_vec();
    Self::Placeholder(Placeholder::new(types, acceptance, false))
  }
}

fn escape_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
  for c in text.chars() {
    if METACHARS.contains(c) {
      write!(f, "\\")?;
    }
    write!(f, "{c}")?;
  }
  Ok(())
}

impl fmt::Display for PatternElement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(text) => escape_text(f, text),
      Self::Regex(r) => write!(f, "<{}>", r.source()),
      Self::Placeholder(ph) => write!(f, "{ph}"),
      Self::Group(items) => items.iter().try_for_each(|e| write!(f, "{e}")),
      Self::Optional(inner) => write!(f, "[{inner}]"),
      Self::Choice(alts) => {
        let body = (alts.iter())
          .map(|ChoiceAlt { mark, element }| match mark {
            0 => element.to_string(),
            m => format!("{m}¦{element}"),
          })
          .join("|");
        write!(f, "({body})")
      },
    }
  }
}

#[cfg(test)]
mod test {
  use super::{compile_pattern, PatternElement, Placeholder};
  use crate::types::{Acceptance, Type};

  #[test]
  fn placeholder_rendering() {
    let ph = Placeholder::new(vec![Type::new("T1"), Type::new("T2")], Acceptance::LiteralsOnly, true);
    assert_eq!(ph.to_string(), "%-*T1/T2%");
    let plain = Placeholder::new(vec![Type::new("number")], Acceptance::All, false);
    assert_eq!(plain.to_string(), "%number%");
    let vars = Placeholder::new(vec![Type::new("object")], Acceptance::VariablesOnly, false);
    assert_eq!(vars.to_string(), "%^object%");
    let exprs = Placeholder::new(vec![Type::new("text")], Acceptance::ExpressionsOnly, true);
    assert_eq!(exprs.to_string(), "%-~text%");
  }

  #[test]
  fn placeholder_equality_ignores_nullable() {
    let types = vec![Type::new("number"), Type::new("text")];
    let a = Placeholder::new(types.clone(), Acceptance::All, true);
    let b = Placeholder::new(types.clone(), Acceptance::All, false);
    assert_eq!(a, b);
    assert_ne!(a, Placeholder::new(types.clone(), Acceptance::LiteralsOnly, true));
    assert_ne!(a, Placeholder::new(types.into_iter().rev().collect(), Acceptance::All, true));
  }

  #[test]
  fn text_is_escaped() {
    assert_eq!(PatternElement::text("50% [off]").to_string(), "50\\% \\[off\\]");
  }

  #[test]
  fn rendering_recompiles_to_same_tree() {
    for src in [
      "give %player% %number% of %item%",
      "[the ](1¦first|2¦second) <\\d+> %-~text/number%",
      "set %^object% to %*string%",
      "a \\[literal\\] \\% sign",
    ] {
      let tree = compile_pattern(src).unwrap();
      let rendered = tree.to_string();
      assert_eq!(compile_pattern(&rendered).unwrap(), tree, "{src} -> {rendered}");
    }
  }
}
