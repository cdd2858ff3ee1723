use crate::expr::Expr;
use crate::types::Acceptance;

/// Whether a placeholder with the given acceptance may bind this value
#[must_use]
pub fn accepts(acceptance: Acceptance, expr: &Expr) -> bool {
  match acceptance {
    Acceptance::All => true,
    Acceptance::ExpressionsOnly => !expr.is_literal(),
    Acceptance::LiteralsOnly => expr.is_literal(),
    Acceptance::VariablesOnly => expr.is_variable(),
  }
}

#[cfg(test)]
mod test {
  use proptest::prelude::*;

  use super::accepts;
  use crate::config::MatchConfig;
  use crate::expr::{ExprKind, Template, TemplatePart};
  use crate::grammar::{Grammar, SimpleGrammar};
  use crate::logging::Logger;
  use crate::matcher::MatchEnv;
  use crate::types::{Acceptance, Type};

  #[test]
  fn templates_with_embeds_are_not_literal() {
    let grammar = SimpleGrammar::standard();
    let logger = Logger::default();
    let no_contexts = Vec::new();
    let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default());
    let text = Type::new("text");
    let simple = grammar.parse_expression("\"plain\"", &text, &env).unwrap();
    let embedding = grammar.parse_expression("\"hi %{name}%\"", &text, &env).unwrap();
    assert!(matches!(&embedding.kind, ExprKind::Template(Template(parts))
      if parts.contains(&TemplatePart::Embedded("{name}".to_string()))));
    assert!(accepts(Acceptance::LiteralsOnly, &simple));
    assert!(!accepts(Acceptance::ExpressionsOnly, &simple));
    assert!(!accepts(Acceptance::LiteralsOnly, &embedding));
    assert!(accepts(Acceptance::ExpressionsOnly, &embedding));
    assert!(!accepts(Acceptance::VariablesOnly, &embedding));
  }

  fn source() -> impl Strategy<Value = String> {
    prop_oneof![
      (-1000i64..1000).prop_map(|n| n.to_string()),
      "[a-z]{1,8}".prop_map(|w| format!("{{{w}}}")),
      "[a-z ]{0,8}".prop_map(|w| format!("\"{w}\"")),
      ("[a-z]{1,4}", "[a-z]{1,4}").prop_map(|(a, b)| format!("\"{a} %{{{b}}}%\"")),
      "[a-z]{1,8}",
      Just("true".to_string()),
      Just("not {flag}".to_string()),
    ]
  }

  proptest! {
    #[test]
    fn filter_holds_for_grammar_values(
      src in source(),
      ty in prop::sample::select(vec!["number", "integer", "text", "string", "boolean"]),
    ) {
      let grammar = SimpleGrammar::standard();
      let logger = Logger::default();
      let no_contexts = Vec::new();
      let env = MatchEnv::new(&grammar, &no_contexts, &logger, MatchConfig::default());
      let ty = Type::new(ty);
      let parsed = match ty.name() {
        "boolean" => grammar.parse_boolean_expression(&src, true, &env),
        _ => grammar.parse_expression(&src, &ty, &env),
      };
      if let Some(expr) = parsed {
        prop_assert!(accepts(Acceptance::All, &expr));
        if expr.is_literal() {
          prop_assert!(!accepts(Acceptance::ExpressionsOnly, &expr));
        }
        if expr.is_variable() {
          prop_assert!(!accepts(Acceptance::LiteralsOnly, &expr));
        }
        if let ExprKind::Template(t) = &expr.kind {
          prop_assert_eq!(accepts(Acceptance::LiteralsOnly, &expr), t.is_simple());
        }
        prop_assert_eq!(accepts(Acceptance::VariablesOnly, &expr), matches!(expr.kind, ExprKind::Variable(_)));
      }
    }
  }
}
