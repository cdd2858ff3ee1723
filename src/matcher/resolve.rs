//! Boundary inference for placeholders. A placeholder has no extent of its
//! own, so the span it covers is guessed from whatever may follow it and
//! confirmed by the grammar.

use super::accept::accepts;
use super::splits::{enclosed, find_text, token_splits};
use super::state::MatchState;
use crate::expr::Expr;
use crate::pattern::{possible_next, Follower, Placeholder};
use crate::types::TypeClass;
use crate::utils::unwrap_or;

/// Rendering of the one pattern whose boolean argument may be negated
pub const WHETHER_PATTERN: &str = "[whether ]%boolean%";

/// Bind a value to `ph` starting at `index` of `s`. On success the value is
/// recorded in `state` and the offset where matching resumes is returned.
pub fn resolve(s: &str, index: usize, ph: &Placeholder, state: &mut MatchState) -> Option<usize> {
  if let Some(end) = paren_shortcut(s, index, ph, state) {
    return Some(end);
  }
  for follower in possible_next(&state.lookahead()) {
    match follower {
      Follower::End => {
        if let Some(expr) = parse_typed(&s[index..], ph, state) {
          state.record_value(expr);
          return Some(s.len());
        }
      },
      Follower::Text(text) => {
        let found = unwrap_or!(find_text(s, text, index); continue);
        if let Some(expr) = parse_typed(s[index..found].trim(), ph, state) {
          state.record_value(expr);
          return Some(found);
        }
      },
      Follower::Regex(re) => {
        let mut from = index;
        while let Some(found) = re.regex().find_at(s, from) {
          let span = &s[index..found.start()];
          if !span.trim().is_empty() {
            if let Some(expr) = parse_typed(span, ph, state) {
              state.record_value(expr);
              return Some(found.start());
            }
          }
          from = match s[found.start()..].chars().next() {
            _ if found.end() > found.start() => found.end(),
            Some(c) => found.start() + c.len_utf8(),
            None => break,
          };
        }
      },
      Follower::Placeholder { rest, .. } => {
        let next = possible_next(&rest);
        if !next.iter().all(Follower::is_literal) {
          continue;
        }
        for bound in next {
          let region = match bound {
            Follower::End => {
              let end = split_candidates(s, index, &s[index..], ph, state);
              return end.or_else(|| fail(state, ph, "no split before the end of line"));
            },
            Follower::Text(text) => &s[index..unwrap_or!(find_text(s, text, index); continue)],
            Follower::Regex(_) | Follower::Placeholder { .. } => continue,
          };
          if let Some(end) = split_candidates(s, index, region, ph, state) {
            return Some(end);
          }
        }
      },
    }
  }
  None
}

fn paren_shortcut(s: &str, index: usize, ph: &Placeholder, state: &mut MatchState) -> Option<usize> {
  let (inner, end) = enclosed(s, index)?;
  let expr = parse_typed(inner, ph, state)?;
  state.record_value(expr);
  Some(end)
}

/// Try every token boundary in `region`, which starts at `index`, shortest
/// span first
fn split_candidates(
  s: &str,
  index: usize,
  region: &str,
  ph: &Placeholder,
  state: &mut MatchState,
) -> Option<usize> {
  for (offset, _) in token_splits(region) {
    let boundary = index + offset;
    let candidate = s[index..boundary].trim_end();
    if candidate.is_empty() {
      continue;
    }
    if let Some(expr) = parse_typed(candidate, ph, state) {
      state.record_value(expr);
      return Some(boundary);
    }
  }
  None
}

fn fail<T>(state: &MatchState, ph: &Placeholder, why: &str) -> Option<T> {
  state.env().logger.debug(format!("{ph}: {why}"));
  None
}

/// Parse `text` as the first of the placeholder's types that both parses and
/// passes the acceptance filter
fn parse_typed(text: &str, ph: &Placeholder, state: &MatchState) -> Option<Expr> {
  let env = state.env();
  for ty in &ph.types {
    if !env.spend() {
      return None;
    }
    let parsed = match ty.class() {
      TypeClass::Boolean => {
        let negated = state.origin().to_string() == WHETHER_PATTERN;
        env.grammar.parse_boolean_expression(text, negated, env)
      },
      TypeClass::Value => env.grammar.parse_expression(text, ty, env),
    };
    let expr = unwrap_or!(parsed; {
      env.logger.debug(format!("{text:?} is not a {ty}"));
      continue
    });
    if accepts(ph.acceptance, &expr) {
      return Some(expr);
    }
    env.logger.debug(format!("{expr} does not fit {ph}"));
  }
  None
}
