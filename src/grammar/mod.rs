//! The seam between pattern matching and the expression language. The
//! matcher only decides where a placeholder's text begins and ends, turning
//! that text into a value is up to a [Grammar].
mod simple;

pub use simple::{LiteralParser, SimpleGrammar};

use crate::expr::Expr;
use crate::matcher::MatchEnv;
use crate::types::Type;

/// Parses placeholder text into typed values. Implementors may re-enter
/// [crate::matcher::match_pattern] with the same environment to match
/// nested syntaxes, which keeps them under the same candidate budget.
pub trait Grammar {
  /// Parse `text` as a value of type `ty`
  fn parse_expression(&self, text: &str, ty: &Type, env: &MatchEnv<'_>) -> Option<Expr>;
  /// Parse `text` as a condition. Leading negation is only recognized if
  /// `negated` is set.
  fn parse_boolean_expression(&self, text: &str, negated: bool, env: &MatchEnv<'_>)
  -> Option<Expr>;
}

/// Wraps a grammar to record every text it is asked to parse
#[cfg(test)]
pub(crate) struct Recording<G> {
  inner: G,
  seen: std::cell::RefCell<Vec<String>>,
}
#[cfg(test)]
impl<G> Recording<G> {
  pub fn new(inner: G) -> Self { Self { inner, seen: Default::default() } }
  pub fn take(&self) -> Vec<String> { self.seen.take() }
}
#[cfg(test)]
impl<G: Grammar> Grammar for Recording<G> {
  fn parse_expression(&self, text: &str, ty: &Type, env: &MatchEnv<'_>) -> Option<Expr> {
    self.seen.borrow_mut().push(text.to_string());
    self.inner.parse_expression(text, ty, env)
  }
  fn parse_boolean_expression(&self, text: &str, negated: bool, env: &MatchEnv<'_>)
  -> Option<Expr> {
    self.seen.borrow_mut().push(text.to_string());
    self.inner.parse_boolean_expression(text, negated, env)
  }
}
