//! Method-contract engine for a path-sensitive dataflow analysis.
//!
//! Contracts such as `"_, null -> true; !null, _ -> false"` summarize what a
//! callable returns (or whether it throws) depending on its arguments. This
//! crate parses them, lints them against the callable's signature, compiles
//! them into conditions over symbolic values, and evaluates them at call
//! sites by forking the caller's memory state once per applicable contract.

pub mod compile;
pub mod contracts;
pub mod database;
pub mod evaluate;

pub use compile::{compile, CompiledContract, ContractOutcome, ContractUsageError};
pub use contracts::lint::{lint_contracts, Signature, ValueKind};
pub use contracts::parse::{parse_contracts, ParseError};
pub use contracts::{format_contracts, Contract, ContractDiagnostic, ContractError, ValueConstraint};
pub use database::{ContractDatabase, ContractSummary};
pub use evaluate::{
    evaluate, Branch, BranchOrigin, BranchOutcome, ContractEvaluator, EvalPhase, Evaluation,
    EvaluatorConfig, TraceEntry,
};
