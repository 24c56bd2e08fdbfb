//! Method-contract engine CLI.
//!
//! Provides the `mcontract` binary with subcommands for working with contract
//! specifications:
//! - `parse`: parse a specification and print the contracts as JSON
//! - `lint`: check a specification against a callable's signature
//! - `eval`: evaluate a specification at a call site with given argument facts
//!
//! Reads configuration from environment variables:
//! - `MCONTRACT_TRACE`: when set to `1` or `true`, `eval` records a trace
//!   even without `--trace`

use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use mcontract_check::{
    format_contracts, lint_contracts, parse_contracts, BranchOrigin, BranchOutcome,
    ContractDiagnostic, ContractEvaluator, EvaluatorConfig, Signature, TraceEntry, ValueConstraint,
    ValueKind,
};
use mcontract_core::{CallSite, FactState, InternedValueFactory, MemoryState, ValueFactory, ValueId};

/// Method-contract parser, linter and evaluator.
#[derive(Parser)]
#[command(name = "mcontract", about = "Method-contract parser, linter and evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse a contract specification.
    Parse {
        /// Contract specification, e.g. "_, null -> true; !null, _ -> false".
        #[arg(short, long)]
        spec: String,

        /// Number of parameters of the callable.
        #[arg(short, long)]
        arity: usize,
    },

    /// Check a contract specification against a signature.
    Lint {
        /// Contract specification.
        #[arg(short, long)]
        spec: String,

        /// Comma-separated parameter kinds: reference, boolean, primitive.
        #[arg(short, long, default_value = "")]
        params: String,

        /// Return kind: reference, boolean, primitive, void.
        #[arg(short, long, default_value = "reference")]
        returns: String,
    },

    /// Evaluate a contract specification at a call site.
    Eval {
        /// Contract specification.
        #[arg(short, long)]
        spec: String,

        /// Comma-separated facts about each argument: _, null, !null, true, false.
        #[arg(short = 'A', long, default_value = "")]
        args: String,

        /// Record the evaluation state machine trace.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Parse { spec, arity } => run_parse(&spec, arity),
        Commands::Lint {
            spec,
            params,
            returns,
        } => run_lint(&spec, &params, &returns),
        Commands::Eval { spec, args, trace } => run_eval(&spec, &args, trace || trace_from_env()),
    };
    process::exit(exit_code);
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 = success, 1 = parse error.
fn run_parse(spec: &str, arity: usize) -> i32 {
    match parse_contracts(spec, arity) {
        Ok(contracts) => {
            print_json(&contracts);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[derive(Serialize)]
struct LintReport {
    #[serde(flatten)]
    diagnostic: ContractDiagnostic,
    message: String,
}

/// Execute the lint subcommand.
///
/// Returns exit code: 0 = clean, 1 = parse or input error, 2 = diagnostics.
fn run_lint(spec: &str, params: &str, returns: &str) -> i32 {
    let signature = match parse_signature(params, returns) {
        Ok(signature) => signature,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 1;
        }
    };

    let contracts = match parse_contracts(spec, signature.arity()) {
        Ok(contracts) => contracts,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let reports: Vec<LintReport> = lint_contracts(&contracts, &signature)
        .into_iter()
        .map(|diagnostic| LintReport {
            message: diagnostic.to_string(),
            diagnostic,
        })
        .collect();
    print_json(&reports);

    if reports.is_empty() {
        0
    } else {
        2
    }
}

#[derive(Serialize)]
struct BranchReport {
    origin: BranchOrigin,
    outcome: BranchOutcome,
    facts: Vec<String>,
}

#[derive(Serialize)]
struct EvalReport {
    contracts: String,
    arguments: Vec<ValueId>,
    branches: Vec<BranchReport>,
    diagnostics: Vec<ContractDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceEntry>>,
}

/// Execute the eval subcommand.
///
/// Returns exit code: 0 = success, 1 = parse, input or usage error.
fn run_eval(spec: &str, args: &str, trace_enabled: bool) -> i32 {
    let facts = match parse_argument_facts(args) {
        Ok(facts) => facts,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 1;
        }
    };

    let contracts = match parse_contracts(spec, facts.len()) {
        Ok(contracts) => contracts,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut factory = InternedValueFactory::new();
    let mut state = FactState::new();
    let arguments: Vec<ValueId> = facts
        .iter()
        .map(|fact| seed_argument(*fact, &mut factory, &mut state))
        .collect();

    let evaluator = ContractEvaluator::new(EvaluatorConfig {
        trace_enabled,
        ..EvaluatorConfig::default()
    });
    let evaluation = match evaluator.evaluate(
        &contracts,
        &CallSite::static_call(arguments.iter().copied()),
        &state,
        &mut factory,
    ) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let report = EvalReport {
        contracts: format_contracts(&contracts),
        arguments,
        branches: evaluation
            .branches
            .iter()
            .map(|b| BranchReport {
                origin: b.origin,
                outcome: b.outcome,
                facts: b.state.describe(),
            })
            .collect(),
        diagnostics: evaluation.diagnostics,
        trace: evaluation.trace,
    };
    print_json(&report);
    0
}

/// Creates the symbolic value for one argument and records what is known
/// about it in the caller's state.
fn seed_argument(fact: ValueConstraint, factory: &mut InternedValueFactory, state: &mut FactState) -> ValueId {
    match fact {
        ValueConstraint::Null => factory.const_null(),
        ValueConstraint::True => factory.const_true(),
        ValueConstraint::False => factory.const_false(),
        ValueConstraint::NotNull => {
            let value = factory.fresh_value();
            let condition = fact.condition(factory, value);
            let consistent = state.impose(&condition);
            debug_assert!(consistent, "a fresh value cannot contradict {}", condition);
            value
        }
        ValueConstraint::Any | ValueConstraint::Throws => factory.fresh_value(),
    }
}

/// Parse comma-separated argument facts. An empty string means no arguments.
fn parse_argument_facts(s: &str) -> Result<Vec<ValueConstraint>, String> {
    split_list(s)
        .map(|token| match token.parse::<ValueConstraint>() {
            Ok(ValueConstraint::Throws) => Err("'fail' is not an argument fact".to_string()),
            Ok(fact) => Ok(fact),
            Err(e) => Err(e.to_string()),
        })
        .collect()
}

/// Parse a signature from kind lists.
fn parse_signature(params: &str, returns: &str) -> Result<Signature, String> {
    let parse_kind = |name: &str| {
        ValueKind::from_name(name).ok_or_else(|| {
            format!(
                "invalid kind '{}', expected reference/boolean/primitive/void",
                name
            )
        })
    };
    let params = split_list(params)
        .map(parse_kind)
        .collect::<Result<Vec<_>, _>>()?;
    if params.contains(&ValueKind::Void) {
        return Err("a parameter cannot be void".to_string());
    }
    Ok(Signature::new(params, parse_kind(returns.trim())?))
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn trace_from_env() -> bool {
    std::env::var("MCONTRACT_TRACE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}
