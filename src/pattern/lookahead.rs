//! Linearisation of pattern trees and prediction of what may follow a
//! position in them

use itertools::Itertools;

use super::{PatternElement, PatternRegex, Placeholder};

/// Expand nested groups into a linear sequence. Optionals and choices cannot
/// be linearised so they remain single items.
#[must_use]
pub fn flatten(node: &PatternElement) -> Vec<&PatternElement> {
  match node {
    PatternElement::Group(items) => items.iter().flat_map(flatten).collect(),
    _ => vec![node],
  }
}

/// A leaf that may be matched next
#[derive(Clone, Debug)]
pub enum Follower<'a> {
  /// Literal text, never blank
  Text(&'a str),
  Regex(&'a PatternRegex),
  /// A placeholder, and everything that would come after it
  Placeholder { ph: &'a Placeholder, rest: Vec<&'a PatternElement> },
  /// The sequence can be exhausted, so the line may end here
  End,
}
impl<'a> Follower<'a> {
  fn same_as(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Text(a), Self::Text(b)) => std::ptr::eq(*a, *b),
      (Self::Regex(a), Self::Regex(b)) => std::ptr::eq(*a, *b),
      (Self::Placeholder { ph: a, .. }, Self::Placeholder { ph: b, .. }) => std::ptr::eq(*a, *b),
      (Self::End, Self::End) => true,
      _ => false,
    }
  }
  /// Whether this follower is bounded by fixed text
  pub fn is_literal(&self) -> bool { matches!(self, Self::Text(_) | Self::End) }
}

/// Every leaf that could legally be matched first in the sequence, in
/// pattern order, across all alternatives still reachable. Blank text is
/// skipped since the matcher treats whitespace as flexible.
#[must_use]
pub fn possible_next<'a>(seq: &[&'a PatternElement]) -> Vec<Follower<'a>> {
  let mut found = Vec::new();
  if collect_next(seq, &mut found) {
    found.push(Follower::End);
  }
  let mut unique: Vec<Follower<'a>> = Vec::with_capacity(found.len());
  for f in found {
    if !unique.iter().any(|u| u.same_as(&f)) {
      unique.push(f)
    }
  }
  unique
}

/// Returns whether the sequence may be exhausted without finding a leaf
fn collect_next<'a>(seq: &[&'a PatternElement], out: &mut Vec<Follower<'a>>) -> bool {
  for (idx, &item) in seq.iter().enumerate() {
    let rest = &seq[idx + 1..];
    match item {
      PatternElement::Text(t) if t.trim().is_empty() => continue,
      PatternElement::Text(t) => out.push(Follower::Text(t)),
      PatternElement::Regex(r) => out.push(Follower::Regex(r)),
      PatternElement::Placeholder(ph) => out.push(Follower::Placeholder { ph, rest: rest.to_vec() }),
      PatternElement::Group(_) => return collect_next(&splice(item, rest), out),
      PatternElement::Optional(inner) => {
        if collect_next(&splice(inner, rest), out) {
          return true;
        }
        continue;
      },
      PatternElement::Choice(alts) => {
        let mut exhausted = false;
        for alt in alts {
          exhausted |= collect_next(&splice(&alt.element, rest), out);
        }
        return exhausted;
      },
    }
    return false;
  }
  true
}

fn splice<'a>(head: &'a PatternElement, rest: &[&'a PatternElement]) -> Vec<&'a PatternElement> {
  flatten(head).into_iter().chain(rest.iter().copied()).collect_vec()
}

#[cfg(test)]
mod test {
  use itertools::Itertools;

  use super::{flatten, possible_next, Follower};
  use crate::pattern::{compile_pattern, PatternElement};

  fn describe(f: &Follower) -> String {
    match f {
      Follower::Text(t) => format!("'{t}'"),
      Follower::Regex(r) => format!("<{}>", r.source()),
      Follower::Placeholder { ph, rest } => format!("{ph}+{}", rest.len()),
      Follower::End => "$".to_string(),
    }
  }

  fn next_of(src: &str, skip: usize) -> Vec<String> {
    let tree = compile_pattern(src).unwrap();
    let flat = flatten(&tree);
    possible_next(&flat[skip..]).iter().map(describe).collect_vec()
  }

  #[test]
  fn flatten_nested_groups() {
    let tree = compile_pattern("a [b %x%] (c|d) %y%").unwrap();
    let flat = flatten(&tree);
    assert_eq!(flat.iter().map(|e| e.to_string()).collect_vec(), vec![
      "a ", "[b %x%]", " ", "(c|d)", " ", "%y%"
    ]);
    let nested = compile_pattern("a (b (c %x%))").unwrap();
    assert!(flatten(&nested).iter().all(|e| !matches!(e, PatternElement::Group(_))));
  }

  #[test]
  fn blank_text_is_skipped() {
    assert_eq!(next_of("%a% %b%", 1), vec!["%b%+0"]);
    assert_eq!(next_of("%a% of %b%", 1), vec!["' of '"]);
  }

  #[test]
  fn end_of_sequence() {
    assert_eq!(next_of("say %text%", 2), vec!["$"]);
    assert_eq!(next_of("say %text% ", 2), vec!["$"]);
  }

  #[test]
  fn optional_adds_both_paths() {
    assert_eq!(next_of("%a%[ with %b%] to <\\d+>", 1), vec!["' with '", "' to '"]);
    assert_eq!(next_of("%a%[ %b%]", 1), vec!["%b%+0", "$"]);
  }

  #[test]
  fn choice_unions_alternatives() {
    assert_eq!(next_of("%a% (to|into|%b%) x", 1), vec!["'to'", "'into'", "%b%+1"]);
    assert_eq!(next_of("%a% (to|) x", 1), vec!["'to'", "' x'"]);
  }

  #[test]
  fn duplicates_are_removed() {
    assert_eq!(next_of("%a%[ big][ red] end", 1), vec!["' big'", "' red'", "' end'"]);
    assert_eq!(next_of("%a%[[ big]] end", 1), vec!["' big'", "' end'"]);
  }
}
