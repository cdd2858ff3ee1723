//! Abstractions for handling pattern compilation errors under a common trait
//! object.

use std::any::Any;
use std::fmt::{Debug, Display};
use std::ops::Range;
use std::sync::Arc;

use itertools::Itertools;

/// A point of interest in resolving the error, such as the character where
/// the compiler got stuck, or the bracket that was never closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorPosition {
  /// Byte range within the pattern source
  pub range: Range<usize>,
  /// Any information about the role of this position
  pub message: Option<String>,
}
impl From<Range<usize>> for ErrorPosition {
  fn from(range: Range<usize>) -> Self { Self { range, message: None } }
}

/// Errors addressed to the author of a pattern, which are to be resolved by
/// changing the pattern source
pub trait PatternError: Sized + Send + Sync + 'static {
  /// A general description of this type of error
  const DESCRIPTION: &'static str;
  /// A formatted message that includes specific parameters
  #[must_use]
  fn message(&self) -> String { Self::DESCRIPTION.to_string() }
  /// Source positions relevant to this error. If you don't implement this,
  /// you must implement [PatternError::one_position]
  #[must_use]
  fn positions(&self) -> impl IntoIterator<Item = ErrorPosition> {
    [ErrorPosition::from(self.one_position())]
  }
  /// Short way to provide a single position. If you don't implement this, you
  /// must implement [PatternError::positions]
  #[must_use]
  fn one_position(&self) -> Range<usize> { unimplemented!() }
  /// Convert the error into an `Arc<dyn DynPatternError>` to be able to
  /// handle various errors together
  #[must_use]
  fn pack(self) -> PatternErrorObj { Arc::new(self) }
}

/// Object-safe version of [PatternError]. Implement that instead of this.
pub trait DynPatternError: Send + Sync {
  /// Access type information about this error
  #[must_use]
  fn as_any(&self) -> &dyn Any;
  /// A general description of this type of error
  #[must_use]
  fn description(&self) -> &str;
  /// A formatted message that includes specific parameters
  #[must_use]
  fn message(&self) -> String { self.description().to_string() }
  /// Source positions relevant to this error
  #[must_use]
  fn positions(&self) -> Vec<ErrorPosition>;
}

impl<T> DynPatternError for T
where T: PatternError
{
  fn as_any(&self) -> &dyn Any { self }
  fn description(&self) -> &str { T::DESCRIPTION }
  fn message(&self) -> String { PatternError::message(self) }
  fn positions(&self) -> Vec<ErrorPosition> {
    PatternError::positions(self).into_iter().collect_vec()
  }
}

impl Display for dyn DynPatternError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let description = self.description();
    let message = self.message();
    writeln!(f, "Pattern error: {description}\n{message}")?;
    for ErrorPosition { range, message } in self.positions() {
      match message {
        None => writeln!(f, "@{}..{}", range.start, range.end),
        Some(msg) => writeln!(f, "@{}..{}: {msg}", range.start, range.end),
      }?
    }
    Ok(())
  }
}

impl Debug for dyn DynPatternError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{self}")
  }
}

/// Type-erased [PatternError] implementor through the [DynPatternError]
/// object-trait
pub type PatternErrorObj = Arc<dyn DynPatternError>;
/// Alias for a result with an error of [Arc] of [PatternError] trait object.
/// This is the type of result returned by the pattern compiler.
pub type PatternResult<T> = Result<T, PatternErrorObj>;
