use hashbrown::HashMap;
use itertools::Itertools;
use ordered_float::NotNan;
use trait_set::trait_set;

use super::Grammar;
use crate::error::PatternResult;
use crate::expr::{Expr, ExprKind, Template, Value};
use crate::matcher::splits::starts_with_ci;
use crate::matcher::{match_pattern, MatchEnv};
use crate::pattern::{compile_pattern, PatternElement};
use crate::types::{Type, BOOLEAN};

trait_set! {
  /// Recognizes the literal form of a type. Receives trimmed, non-empty text.
  pub trait LiteralParser = Fn(&str) -> Option<Value> + Send + Sync;
}

/// Types whose values may be written as quoted templates
const TEXT_TYPES: [&str; 2] = ["string", "text"];

/// A small table-driven grammar. Literals are recognized by per-type
/// parsers, `{name}` refers to a variable and everything else is matched
/// against the registered expression syntaxes.
#[derive(Default)]
pub struct SimpleGrammar {
  literals: HashMap<Type, Box<dyn LiteralParser>>,
  syntaxes: Vec<(Type, PatternElement)>,
}
impl SimpleGrammar {
  /// A grammar that recognizes nothing but variables
  pub fn new() -> Self { Self::default() }

  /// Numbers, integers, texts and booleans
  pub fn standard() -> Self {
    let text = |s: &str| Some(Value::Text(s.to_string()));
    (Self::new())
      .with_literal(Type::new("number"), parse_number)
      .with_literal(Type::new("integer"), |s: &str| {
        let n = s.parse::<i64>().ok()?;
        NotNan::new(n as f64).ok().map(Value::Number)
      })
      .with_literal(Type::new("string"), text)
      .with_literal(Type::new("text"), text)
      .with_literal(Type::new(BOOLEAN), parse_bool)
  }

  /// Register the literal form of a type, replacing any earlier one
  pub fn with_literal(mut self, ty: Type, parser: impl LiteralParser + 'static) -> Self {
    self.literals.insert(ty, Box::new(parser));
    self
  }

  /// Register a type whose literals are single bare words, such as player or
  /// item names
  pub fn with_named(self, ty: Type) -> Self {
    self.with_literal(ty, |s: &str| {
      let bare = !s.contains(char::is_whitespace) && !s.starts_with(['(', '"', '{']);
      bare.then(|| Value::Named(s.to_string()))
    })
  }

  /// Register an expression syntax producing values of `ty`
  pub fn with_syntax(mut self, ty: Type, pattern: &str) -> PatternResult<Self> {
    self.syntaxes.push((ty, compile_pattern(pattern)?));
    Ok(self)
  }

  /// Try the syntaxes registered for `ty` in order
  fn dynamic(&self, text: &str, ty: &Type, env: &MatchEnv<'_>) -> Option<Expr> {
    let candidates = self.syntaxes.iter().filter(|(t, _)| t == ty).map(|(_, p)| p).collect_vec();
    if candidates.is_empty() {
      return None;
    }
    env.nested(|| {
      candidates.into_iter().find_map(|pattern| {
        let matched = match_pattern(pattern, text, env)?;
        let kind = ExprKind::Dynamic { syntax: pattern.to_string(), args: matched.exprs };
        Some(Expr::new(ty.clone(), kind))
      })
    })
  }
}

fn parse_number(s: &str) -> Option<Value> {
  if !s.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) {
    return None;
  }
  NotNan::new(s.parse::<f64>().ok()?).ok().map(Value::Number)
}

fn parse_bool(s: &str) -> Option<Value> {
  match s.to_ascii_lowercase().as_str() {
    "true" => Some(Value::Bool(true)),
    "false" => Some(Value::Bool(false)),
    _ => None,
  }
}

/// The name inside `{name}`
fn variable_name(s: &str) -> Option<&str> {
  let name = s.strip_prefix('{')?.strip_suffix('}')?;
  let valid = !name.trim().is_empty() && !name.contains(['{', '}']);
  valid.then_some(name)
}

/// The inside of `"..."`
fn quoted(s: &str) -> Option<&str> { s.strip_prefix('"')?.strip_suffix('"') }

impl Grammar for SimpleGrammar {
  fn parse_expression(&self, text: &str, ty: &Type, env: &MatchEnv<'_>) -> Option<Expr> {
    let text = text.trim();
    if text.is_empty() {
      return None;
    }
    if let Some(name) = variable_name(text) {
      return Some(Expr::new(ty.clone(), ExprKind::Variable(name.to_string())));
    }
    if TEXT_TYPES.contains(&ty.name()) && text.len() >= 2 {
      if let Some(body) = quoted(text) {
        return Template::parse(body).map(|t| Expr::new(ty.clone(), ExprKind::Template(t)));
      }
    }
    if let Some(value) = self.literals.get(ty).and_then(|parse| parse(text)) {
      return Some(Expr::new(ty.clone(), ExprKind::Literal(value)));
    }
    self.dynamic(text, ty, env)
  }

  fn parse_boolean_expression(&self, text: &str, negated: bool, env: &MatchEnv<'_>)
  -> Option<Expr> {
    let text = text.trim();
    let ty = Type::new(BOOLEAN);
    if text.is_empty() {
      return None;
    }
    if let Some(value) = parse_bool(text) {
      return Some(Expr::new(ty, ExprKind::Literal(value)));
    }
    if let Some(name) = variable_name(text) {
      return Some(Expr::new(ty, ExprKind::Variable(name.to_string())));
    }
    if negated && starts_with_ci(text, "not ", 0) {
      let inner = self.parse_boolean_expression(&text[4..], false, env)?;
      let kind = match inner.kind {
        ExprKind::Literal(Value::Bool(b)) => ExprKind::Literal(Value::Bool(!b)),
        _ => ExprKind::Dynamic { syntax: "not %boolean%".to_string(), args: vec![inner] },
      };
      return Some(Expr::new(ty, kind));
    }
    self.dynamic(text, &ty, env)
  }
}
