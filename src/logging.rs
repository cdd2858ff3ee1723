//! The diagnostic sink threaded through every match attempt

use std::cell::RefCell;
use std::fmt;

/// Whether diagnostics are only forwarded to [tracing] or also kept around
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogStrategy {
  /// Emit a tracing event and forget
  #[default]
  Trace,
  /// Emit a tracing event and keep the entry for [Logger::entries]
  Collect,
}

/// Importance of a diagnostic
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
  /// Candidate spans and types that were rejected
  Debug,
  /// Conditions that cut matching short, such as the candidate budget
  Warning,
}

/// A single recorded diagnostic
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  /// How important this is
  pub severity: Severity,
  /// Human-readable description
  pub message: String,
}
impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.severity {
      Severity::Debug => write!(f, "debug: {}", self.message),
      Severity::Warning => write!(f, "warning: {}", self.message),
    }
  }
}

/// Diagnostic sink. Shared by reference between a root match state and all
/// of its branches; never owned by them.
#[derive(Debug, Default)]
pub struct Logger {
  strat: LogStrategy,
  entries: RefCell<Vec<Diagnostic>>,
}
impl Logger {
  pub fn new(strat: LogStrategy) -> Self { Self { strat, entries: RefCell::default() } }
  pub fn strat(&self) -> LogStrategy { self.strat }
  pub fn log(&self, severity: Severity, message: String) {
    match severity {
      Severity::Debug => tracing::debug!(target: "syntaxmatch", "{message}"),
      Severity::Warning => tracing::warn!(target: "syntaxmatch", "{message}"),
    }
    if self.strat == LogStrategy::Collect {
      self.entries.borrow_mut().push(Diagnostic { severity, message })
    }
  }
  pub fn debug(&self, message: impl Into<String>) { self.log(Severity::Debug, message.into()) }
  pub fn warn(&self, message: impl Into<String>) { self.log(Severity::Warning, message.into()) }
  /// Collected entries so far. Always empty under [LogStrategy::Trace]
  pub fn entries(&self) -> Vec<Diagnostic> { self.entries.borrow().clone() }
  /// Remove and return the collected entries
  pub fn take(&self) -> Vec<Diagnostic> { self.entries.take() }
}

#[cfg(test)]
mod test {
  use super::{LogStrategy, Logger, Severity};

  #[test]
  fn collects_only_when_asked() {
    let quiet = Logger::new(LogStrategy::Trace);
    quiet.warn("dropped");
    assert!(quiet.entries().is_empty());
    assert_eq!(quiet.strat(), LogStrategy::Trace);
    let loud = Logger::new(LogStrategy::Collect);
    loud.debug("first");
    loud.warn("second");
    let entries = loud.take();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].severity, Severity::Warning);
    assert_eq!(entries[0].to_string(), "debug: first");
    assert!(loud.entries().is_empty(), "take drains the sink");
  }
}
