//! Typed values the grammar produces for placeholders

use std::fmt;

use itertools::Itertools;
use ordered_float::NotNan;

use crate::types::Type;

/// A constant known at compile time
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
  Text(String),
  Number(NotNan<f64>),
  Bool(bool),
  /// A bare word naming an instance of some registered type, eg. a player or
  /// an item
  Named(String),
}
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) | Self::Named(s) => f.write_str(s),
      Self::Number(n) => write!(f, "{n}"),
      Self::Bool(b) => write!(f, "{b}"),
    }
  }
}

/// One segment of a [Template]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplatePart {
  Text(String),
  /// Source of an embedded sub-expression, evaluated at runtime
  Embedded(String),
}

/// A quoted text which may embed sub-expressions between `%` signs
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Template(pub Vec<TemplatePart>);
impl Template {
  /// Split the inside of a quoted text. `%%` stands for a literal percent
  /// sign, an unpaired `%` makes the whole template invalid.
  pub fn parse(body: &str) -> Option<Self> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = body;
    while let Some(pos) = rest.find('%') {
      text.push_str(&rest[..pos]);
      rest = &rest[pos + 1..];
      if let Some(tail) = rest.strip_prefix('%') {
        text.push('%');
        rest = tail;
        continue;
      }
      let end = rest.find('%')?;
      if !text.is_empty() {
        parts.push(TemplatePart::Text(std::mem::take(&mut text)));
      }
      parts.push(TemplatePart::Embedded(rest[..end].trim().to_string()));
      rest = &rest[end + 1..];
    }
    text.push_str(rest);
    if !text.is_empty() || parts.is_empty() {
      parts.push(TemplatePart::Text(text));
    }
    Some(Self(parts))
  }
  /// A template is simple if it is pure text
  pub fn is_simple(&self) -> bool {
    self.0.iter().all(|p| matches!(p, TemplatePart::Text(_)))
  }
}
impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let body = (self.0.iter())
      .map(|p| match p {
        TemplatePart::Text(t) => t.replace('%', "%%"),
        TemplatePart::Embedded(e) => format!("%{e}%"),
      })
      .join("");
    write!(f, "\"{body}\"")
  }
}

/// The shape of a resolved placeholder value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
  Literal(Value),
  /// Nominally literal, but only a real literal if [Template::is_simple]
  Template(Template),
  Variable(String),
  /// Computed by a nested syntax at runtime
  Dynamic { syntax: String, args: Vec<Expr> },
}

/// A typed value bound to a placeholder
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
  pub ty: Type,
  pub kind: ExprKind,
}
impl Expr {
  pub fn new(ty: Type, kind: ExprKind) -> Self { Self { ty, kind } }
  /// Known at compile time. Templates only count if they embed nothing.
  pub fn is_literal(&self) -> bool {
    match &self.kind {
      ExprKind::Literal(_) => true,
      ExprKind::Template(t) => t.is_simple(),
      ExprKind::Variable(_) | ExprKind::Dynamic { .. } => false,
    }
  }
  pub fn is_variable(&self) -> bool { matches!(self.kind, ExprKind::Variable(_)) }
}
impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      ExprKind::Literal(v) => write!(f, "{}:{v}", self.ty),
      ExprKind::Template(t) => write!(f, "{t}"),
      ExprKind::Variable(name) => write!(f, "{{{name}}}"),
      ExprKind::Dynamic { syntax, args } => write!(f, "{syntax}({})", args.iter().join(", ")),
    }
  }
}
