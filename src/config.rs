//! Tunables of a match attempt

/// Default number of grammar calls a single top-level attempt may make
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10_000;
/// Default nesting limit for syntaxes matched inside placeholders
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings shared by every match attempt made through one
/// [crate::matcher::MatchEnv]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
  /// Maximum number of candidate spans handed to the grammar during one
  /// top-level attempt, nested re-entries included. Boundary inference over
  /// adjacent placeholders is super-linear in the worst case, this caps it.
  pub candidate_limit: usize,
  /// How many nested syntaxes may be open at once. A syntax that starts
  /// with a placeholder of its own type would otherwise recurse on the same
  /// text until the candidate limit runs out.
  pub max_depth: usize,
}
impl MatchConfig {
  pub fn with_candidate_limit(self, candidate_limit: usize) -> Self {
    Self { candidate_limit, ..self }
  }
  pub fn with_max_depth(self, max_depth: usize) -> Self { Self { max_depth, ..self } }
}
impl Default for MatchConfig {
  fn default() -> Self {
    Self { candidate_limit: DEFAULT_CANDIDATE_LIMIT, max_depth: DEFAULT_MAX_DEPTH }
  }
}
