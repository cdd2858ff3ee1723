use std::io::{self, BufRead};
use std::process;

use clap::Parser;
use itertools::Itertools;
use rayon::prelude::*;
use syntaxmatch::config::{MatchConfig, DEFAULT_CANDIDATE_LIMIT, DEFAULT_MAX_DEPTH};
use syntaxmatch::error::PatternResult;
use syntaxmatch::grammar::SimpleGrammar;
use syntaxmatch::logging::{LogStrategy, Logger};
use syntaxmatch::matcher::{match_pattern, MatchEnv};
use syntaxmatch::pattern::{compile_pattern, PatternElement};
use syntaxmatch::types::{ContextType, Type};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Match lines read from stdin against a syntax pattern
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// The pattern, eg. `give %player% %number% of %item%`
  #[arg(short, long)]
  pub pattern: String,
  /// Types whose values are single bare words
  #[arg(long)]
  pub named: Vec<String>,
  /// Expression syntaxes in the form `type=pattern`
  #[arg(long, value_parser = parse_syntax)]
  pub syntax: Vec<(String, String)>,
  /// Context types recorded on every match
  #[arg(long)]
  pub context: Vec<String>,
  /// Maximum number of grammar calls per line
  #[arg(long, default_value_t = DEFAULT_CANDIDATE_LIMIT)]
  pub candidate_limit: usize,
  /// Maximum number of nested syntaxes
  #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
  pub max_depth: usize,
  /// Explain failed lines, repeat for more detail on stderr
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,
}

fn parse_syntax(arg: &str) -> Result<(String, String), String> {
  let (ty, pattern) = arg.split_once('=').ok_or_else(|| format!("expected type=pattern, got {arg}"))?;
  Ok((ty.trim().to_string(), pattern.to_string()))
}

fn build_grammar(args: &Args) -> PatternResult<SimpleGrammar> {
  let named = (args.named.iter()).fold(SimpleGrammar::standard(), |g, n| g.with_named(Type::new(n)));
  (args.syntax.iter()).try_fold(named, |g, (ty, pattern)| g.with_syntax(Type::new(ty), pattern))
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("syntaxmatch={level}")));
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact().with_writer(io::stderr))
    .init();
}

/// Match one line and describe the outcome
fn report(
  line: &str,
  pattern: &PatternElement,
  grammar: &SimpleGrammar,
  contexts: &[ContextType],
  config: MatchConfig,
  strat: LogStrategy,
) -> String {
  let logger = Logger::new(strat);
  let env = MatchEnv::new(grammar, contexts, &logger, config);
  match match_pattern(pattern, line, &env) {
    Some(m) => {
      let captures = (m.result.captures.iter()).map(|c| c.text.as_str()).join(" ");
      format!("match [{}] mark={} captures=[{captures}]", m.exprs.iter().join(", "), m.result.mark)
    },
    None if logger.strat() == LogStrategy::Collect => {
      let why = logger.take().into_iter().map(|d| format!("\n  {d}")).join("");
      format!("no match{why}")
    },
    None => "no match".to_string(),
  }
}

pub fn main() {
  let args = Args::parse();
  init_tracing(args.verbose);
  let pattern = compile_pattern(&args.pattern).unwrap_or_else(|e| {
    eprintln!("{e}");
    process::exit(2)
  });
  let grammar = build_grammar(&args).unwrap_or_else(|e| {
    eprintln!("{e}");
    process::exit(2)
  });
  let contexts = args.context.iter().map(|c| ContextType::new(c)).collect_vec();
  let config =
    (MatchConfig::default()).with_candidate_limit(args.candidate_limit).with_max_depth(args.max_depth);
  let lines = io::stdin().lock().lines().collect::<Result<Vec<_>, _>>().unwrap_or_else(|e| {
    eprintln!("Failed to read stdin: {e}");
    process::exit(1)
  });
  let strat = if args.verbose > 0 { LogStrategy::Collect } else { LogStrategy::Trace };
  let reports = (lines.par_iter())
    .map(|line| report(line, &pattern, &grammar, &contexts, config, strat))
    .collect::<Vec<_>>();
  let mut failed = false;
  for (line, rep) in lines.iter().zip(reports) {
    failed |= rep.starts_with("no match");
    println!("{line}\t{rep}");
  }
  if failed {
    process::exit(1)
  }
}
