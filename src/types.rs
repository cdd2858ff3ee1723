//! Placeholder types, execution contexts and acceptance modes

use std::fmt;

use intern_all::{i, Tok};

/// Name of the only type dispatched to the boolean grammar
pub const BOOLEAN: &str = "boolean";

/// A type a placeholder may accept, identified by its interned name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type(Tok<String>);
impl Type {
  pub fn new(name: &str) -> Self { Self(i(name)) }
  pub fn name(&self) -> &str { self.0.as_str() }
  /// Which grammar entry point handles values of this type
  pub fn class(&self) -> TypeClass {
    match self.name() {
      BOOLEAN => TypeClass::Boolean,
      _ => TypeClass::Value,
    }
  }
}
impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
impl fmt::Debug for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Type({})", self.name()) }
}

/// Grammar entry point selection for a [Type]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeClass {
  /// Conditions, parsed with the boolean grammar
  Boolean,
  /// Everything else, parsed with the expression grammar
  Value,
}

/// An execution context a syntax may run under. The matcher only threads
/// these through to the [crate::matcher::ParseResult].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextType(Tok<String>);
impl ContextType {
  pub fn new(name: &str) -> Self { Self(i(name)) }
  pub fn name(&self) -> &str { self.0.as_str() }
}
impl fmt::Debug for ContextType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ContextType({})", self.name())
  }
}

/// What kind of value a placeholder may bind to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Acceptance {
  /// Anything the grammar produces
  #[default]
  All,
  /// Values not known at compile time; `%~type%`
  ExpressionsOnly,
  /// Compile-time literals only; `%*type%`
  LiteralsOnly,
  /// Variable references only; `%^type%`
  VariablesOnly,
}
impl Acceptance {
  /// The sigil that selects this mode in pattern source
  pub fn sigil(self) -> Option<char> {
    match self {
      Self::All => None,
      Self::ExpressionsOnly => Some('~'),
      Self::LiteralsOnly => Some('*'),
      Self::VariablesOnly => Some('^'),
    }
  }
  pub fn from_sigil(c: char) -> Option<Self> {
    match c {
      '~' => Some(Self::ExpressionsOnly),
      '*' => Some(Self::LiteralsOnly),
      '^' => Some(Self::VariablesOnly),
      _ => None,
    }
  }
}
