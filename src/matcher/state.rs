use std::cell::Cell;

use itertools::Itertools;

use crate::config::MatchConfig;
use crate::expr::Expr;
use crate::grammar::Grammar;
use crate::logging::Logger;
use crate::pattern::{flatten, PatternElement};
use crate::types::ContextType;

/// The fixed part of a match attempt. Shared by reference between the root
/// state, its branches and any nested attempt the grammar starts.
pub struct MatchEnv<'a> {
  pub grammar: &'a dyn Grammar,
  pub contexts: &'a [ContextType],
  pub logger: &'a Logger,
  pub config: MatchConfig,
  budget: Cell<usize>,
  exhausted: Cell<bool>,
  depth: Cell<usize>,
}
impl<'a> MatchEnv<'a> {
  pub fn new(
    grammar: &'a dyn Grammar,
    contexts: &'a [ContextType],
    logger: &'a Logger,
    config: MatchConfig,
  ) -> Self {
    let budget = Cell::new(config.candidate_limit);
    let (exhausted, depth) = (Cell::new(false), Cell::new(0));
    Self { grammar, contexts, logger, config, budget, exhausted, depth }
  }
  /// Take one unit of the candidate budget. Warns the first time it is
  /// found empty.
  pub fn spend(&self) -> bool {
    match self.budget.get() {
      0 => {
        if !self.exhausted.replace(true) {
          self.logger.warn(format!(
            "candidate limit of {} reached, giving up on further spans",
            self.config.candidate_limit
          ));
        }
        false
      },
      n => {
        self.budget.set(n - 1);
        true
      },
    }
  }
  pub fn remaining(&self) -> usize { self.budget.get() }
  /// Run a nested match one level deeper, or fail if that would exceed
  /// [MatchConfig::max_depth]
  pub fn nested<T>(&self, f: impl FnOnce() -> Option<T>) -> Option<T> {
    let depth = self.depth.get();
    if depth >= self.config.max_depth {
      self.logger.debug(format!("nesting deeper than {depth} syntaxes"));
      return None;
    }
    self.depth.set(depth + 1);
    let res = f();
    self.depth.set(depth);
    res
  }
}

/// A successful regex span
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexCapture {
  /// The whole matched text
  pub text: String,
  /// Capture groups in order, excluding the implicit whole-match group
  pub groups: Vec<Option<String>>,
}
impl RegexCapture {
  pub fn from_captures(caps: &regex::Captures) -> Self {
    Self {
      text: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
      groups: caps.iter().skip(1).map(|g| g.map(|m| m.as_str().to_string())).collect_vec(),
    }
  }
}

/// Matching progress over one pattern. A root state exists per attempt, and
/// speculative alternatives run on [MatchState::branch]es which are either
/// merged back or dropped, so a failed alternative never leaves a trace on
/// its parent.
pub struct MatchState<'a> {
  env: &'a MatchEnv<'a>,
  /// The pattern of the whole attempt, shared by every branch
  origin: &'a PatternElement,
  flat: Vec<&'a PatternElement>,
  /// Whatever follows this state's sub-pattern in the enclosing states; only used for
  /// lookahead
  tail: Vec<&'a PatternElement>,
  cursor: usize,
  exprs: Vec<Expr>,
  captures: Vec<RegexCapture>,
  mark: u32,
}
impl<'a> MatchState<'a> {
  pub fn new(root: &'a PatternElement, env: &'a MatchEnv<'a>) -> Self {
    Self::with_tail(root, root, env, Vec::new())
  }
  fn with_tail(
    origin: &'a PatternElement,
    root: &'a PatternElement,
    env: &'a MatchEnv<'a>,
    tail: Vec<&'a PatternElement>,
  ) -> Self {
    Self {
      env,
      origin,
      flat: flatten(root),
      tail,
      cursor: 0,
      exprs: Vec::new(),
      captures: Vec::new(),
      mark: 0,
    }
  }

  pub fn env(&self) -> &'a MatchEnv<'a> { self.env }
  pub fn origin(&self) -> &'a PatternElement { self.origin }
  pub fn cursor(&self) -> usize { self.cursor }
  pub fn exprs(&self) -> &[Expr] { &self.exprs }
  pub fn captures(&self) -> &[RegexCapture] { &self.captures }
  pub fn mark(&self) -> u32 { self.mark }

  /// The item under the cursor
  pub fn current(&self) -> Option<&'a PatternElement> { self.flat.get(self.cursor).copied() }
  /// Everything that may still be matched after the item under the cursor,
  /// including what follows this state in its ancestors
  pub fn lookahead(&self) -> Vec<&'a PatternElement> {
    let after = self.flat.get(self.cursor + 1..).unwrap_or_default();
    after.iter().chain(&self.tail).copied().collect_vec()
  }

  /// Must be called exactly once for every item consumed
  pub fn advance(&mut self) { self.cursor += 1 }
  pub fn record_value(&mut self, expr: Expr) { self.exprs.push(expr) }
  pub fn record_capture(&mut self, capture: RegexCapture) { self.captures.push(capture) }
  pub fn add_mark(&mut self, bits: u32) { self.mark |= bits }

  /// Fresh state over `sub`, sharing this state's environment. The branch
  /// sees what follows the current item as lookahead.
  #[must_use]
  pub fn branch(&self, sub: &'a PatternElement) -> MatchState<'a> {
    Self::with_tail(self.origin, sub, self.env, self.lookahead())
  }
  /// Fold a successful branch into this state. The cursor is left alone.
  pub fn merge(&mut self, branch: MatchState<'a>) {
    self.exprs.extend(branch.exprs);
    self.captures.extend(branch.captures);
    self.add_mark(branch.mark);
  }
  /// Freeze a fully matched root state
  #[must_use]
  pub fn finish(self) -> Matched<'a> {
    Matched {
      exprs: self.exprs,
      result: ParseResult {
        pattern: self.origin,
        contexts: self.env.contexts,
        captures: self.captures,
        mark: self.mark,
        logger: self.env.logger,
      },
    }
  }
}

/// The immutable outcome of a successful match, as seen by whoever builds a
/// syntax element from it
#[derive(Debug)]
pub struct ParseResult<'a> {
  pub pattern: &'a PatternElement,
  pub contexts: &'a [ContextType],
  pub captures: Vec<RegexCapture>,
  pub mark: u32,
  pub logger: &'a Logger,
}

/// Values bound to the placeholders of a matched pattern, in order
#[derive(Debug)]
pub struct Matched<'a> {
  pub exprs: Vec<Expr>,
  pub result: ParseResult<'a>,
}

#[cfg(test)]
mod test {
  use ordered_float::NotNan;
  use proptest::prelude::*;

  use super::{MatchEnv, MatchState, RegexCapture};
  use crate::config::MatchConfig;
  use crate::expr::{Expr, ExprKind, Value};
  use crate::grammar::SimpleGrammar;
  use crate::logging::{LogStrategy, Logger};
  use crate::pattern::{compile_pattern, PatternElement};
  use crate::types::{ContextType, Type};

  fn num(n: f64) -> Expr {
    Expr::new(Type::new("number"), ExprKind::Literal(Value::Number(NotNan::new(n).unwrap())))
  }

  #[test]
  fn branch_starts_empty_and_sees_tail() {
    let grammar = SimpleGrammar::standard();
    let logger = Logger::default();
    let contexts = [ContextType::new("on load")];
    let env = MatchEnv::new(&grammar, &contexts, &logger, MatchConfig::default());
    let pattern = compile_pattern("a [b %number%] c").unwrap();
    let mut root = MatchState::new(&pattern, &env);
    root.record_value(num(1.0));
    root.add_mark(4);
    root.advance();
    let Some(PatternElement::Optional(inner)) = root.current() else { panic!("expected [b %number%]") };
    let branch = root.branch(inner);
    assert_eq!(branch.cursor(), 0);
    assert!(branch.exprs().is_empty() && branch.captures().is_empty());
    assert_eq!(branch.mark(), 0);
    assert_eq!(branch.lookahead().iter().map(|e| e.to_string()).collect::<Vec<_>>(), vec![
      "%number%", " c"
    ]);
    assert_eq!(branch.env().contexts, &contexts);
    assert!(std::ptr::eq(branch.origin(), &pattern));
  }

  #[test]
  fn finish_freezes_fields() {
    let grammar = SimpleGrammar::standard();
    let logger = Logger::new(LogStrategy::Collect);
    let no_contexts = Vec::new();
    let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default());
    let pattern = compile_pattern("x").unwrap();
    let mut state = MatchState::new(&pattern, &env);
    state.record_capture(RegexCapture { text: "x".into(), groups: vec![] });
    state.add_mark(2);
    let done = state.finish();
    assert!(std::ptr::eq(done.result.pattern, &pattern));
    assert_eq!(done.result.mark, 2);
    assert_eq!(done.result.captures.len(), 1);
    assert!(done.exprs.is_empty());
  }

  #[test]
  fn budget_runs_out_once() {
    let grammar = SimpleGrammar::standard();
    let logger = Logger::new(LogStrategy::Collect);
    let no_contexts = Vec::new();
    let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default().with_candidate_limit(2));
    assert!(env.spend());
    assert!(env.spend());
    assert!(!env.spend());
    assert!(!env.spend());
    assert_eq!(env.remaining(), 0);
    assert_eq!(logger.entries().len(), 1, "the limit is reported exactly once");
  }

  #[test]
  fn nesting_is_bounded() {
    let grammar = SimpleGrammar::standard();
    let logger = Logger::default();
    let no_contexts = Vec::new();
    let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default().with_max_depth(2));
    assert_eq!(env.nested(|| env.nested(|| Some(1))), Some(1));
    assert_eq!(env.nested(|| env.nested(|| env.nested(|| Some(1)))), None);
    assert_eq!(env.nested(|| env.nested(|| Some(2))), Some(2), "depth is restored on the way out");
  }

  proptest! {
    #[test]
    fn merge_appends_and_ors(
      parent_vals in prop::collection::vec(-1e6f64..1e6, 0..5),
      child_vals in prop::collection::vec(-1e6f64..1e6, 0..5),
      parent_mark in any::<u32>(),
      child_mark in any::<u32>(),
    ) {
      let grammar = SimpleGrammar::standard();
      let logger = Logger::default();
      let no_contexts = Vec::new();
      let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default());
      let pattern = compile_pattern("[x]").unwrap();
      let mut parent = MatchState::new(&pattern, &env);
      parent_vals.iter().for_each(|v| parent.record_value(num(*v)));
      parent.add_mark(parent_mark);
      let mut child = parent.branch(&pattern);
      child_vals.iter().for_each(|v| child.record_value(num(*v)));
      child.add_mark(child_mark);
      parent.merge(child);
      let expected = parent_vals.iter().chain(&child_vals).map(|v| num(*v)).collect::<Vec<_>>();
      prop_assert_eq!(parent.exprs(), &expected[..]);
      prop_assert_eq!(parent.mark(), parent_mark | child_mark);
      prop_assert_eq!(parent.cursor(), 0);
      let mut twice = parent.branch(&pattern);
      twice.add_mark(child_mark);
      parent.merge(twice);
      prop_assert_eq!(parent.mark(), parent_mark | child_mark);
    }
  }
}
