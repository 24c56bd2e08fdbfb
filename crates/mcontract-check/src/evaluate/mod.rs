//! Contract evaluator: applies a callable's contracts at one call site.
//!
//! # Architecture
//!
//! Evaluation is a small state machine per call site (see [`EvalPhase`]):
//!
//! - `Pending`: nothing tried yet.
//! - `Testing(i)`: contract `i` is compiled against the call-site arguments
//!   and its conditions are imposed on a fork of the caller's state.
//! - `Split(i)`: every condition was satisfiable; the fork becomes a branch
//!   with the contract's outcome bound.
//! - `Skip(i)`: some condition contradicted the state; the fork is dropped.
//! - `Exhausted`: no contract left; a default "no contract matched" branch
//!   with a fresh return value is forked. It carries the negation of every
//!   tried contract that compiled to a single condition, and is dropped when
//!   those negations contradict the state.
//!
//! Contracts are tried strictly in declaration order. Every satisfiable
//! contract forks its own branch, independently of the others. A trivial
//! contract absorbs: once it splits, later contracts are reported as
//! unreachable and no default branch is forked.
//!
//! # Usage
//!
//! ```ignore
//! let contracts = parse_contracts("_, null -> true; !null, _ -> false", 2)?;
//! let evaluator = ContractEvaluator::new(EvaluatorConfig::default());
//! let evaluation = evaluator.evaluate(&contracts, &call_site, &state, &mut factory)?;
//! for branch in &evaluation.branches { /* continue analysis in branch.state */ }
//! ```

pub mod trace;

use serde::{Deserialize, Serialize};

use mcontract_core::call_site::CallSiteValues;
use mcontract_core::condition::Condition;
use mcontract_core::factory::ValueFactory;
use mcontract_core::id::ValueId;
use mcontract_core::memory::MemoryState;

use crate::compile::{compile, ContractOutcome, ContractUsageError};
use crate::contracts::{Contract, ContractDiagnostic};

pub use trace::{EvalPhase, TraceEntry};

use trace::TraceRecorder;

/// Configuration for the contract evaluator.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Whether to record state-machine traces.
    pub trace_enabled: bool,
    /// Whether skipped contracts produce
    /// [`ContractDiagnostic::NeverSatisfied`]. Default: true.
    pub report_skipped: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            trace_enabled: false,
            report_skipped: true,
        }
    }
}

/// Where a branch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchOrigin {
    /// Contract at this index in the list.
    Contract(usize),
    /// No contract matched.
    Default,
}

/// How a branch leaves the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchOutcome {
    /// The call returns this value.
    Returns(ValueId),
    /// The call throws; the state was routed to the exceptional exit.
    Throws,
}

/// One live analysis branch after the call.
#[derive(Debug, Clone)]
pub struct Branch<S> {
    pub state: S,
    pub origin: BranchOrigin,
    pub outcome: BranchOutcome,
}

/// Everything evaluation produced at one call site.
#[derive(Debug, Clone)]
pub struct Evaluation<S> {
    /// Live branches in the order they were forked; the default branch, when
    /// present, is last.
    pub branches: Vec<Branch<S>>,
    /// Non-fatal findings about the contract list at this call site.
    pub diagnostics: Vec<ContractDiagnostic>,
    /// Index of the trivial contract that ended evaluation, if any.
    pub absorbed_by: Option<usize>,
    /// State-machine trace, when enabled.
    pub trace: Option<Vec<TraceEntry>>,
}

impl<S> Evaluation<S> {
    /// Drops everything but the branch states.
    pub fn into_states(self) -> Vec<S> {
        self.branches.into_iter().map(|b| b.state).collect()
    }
}

/// Applies contract lists at call sites.
///
/// The evaluator holds no per-call state, so one instance can serve any
/// number of call sites (and threads), each owning its own memory state.
#[derive(Debug, Clone, Default)]
pub struct ContractEvaluator {
    config: EvaluatorConfig,
}

impl ContractEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        ContractEvaluator { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates `contracts` at `call_site` starting from `state`.
    ///
    /// `state` itself is never modified; every branch works on a fork.
    /// Returns [`ContractUsageError`] if the call site's argument count does
    /// not match the contracts.
    pub fn evaluate<S, C, F>(
        &self,
        contracts: &[Contract],
        call_site: &C,
        state: &S,
        factory: &mut F,
    ) -> Result<Evaluation<S>, ContractUsageError>
    where
        S: MemoryState,
        C: CallSiteValues + ?Sized,
        F: ValueFactory + ?Sized,
    {
        let mut recorder = TraceRecorder::new(self.config.trace_enabled);
        let mut branches = Vec::new();
        let mut diagnostics = Vec::new();
        // Negations of single-condition contracts tried so far; the default
        // branch only covers calls none of them matched.
        let mut unmatched: Vec<Condition> = Vec::new();
        let arguments = call_site.arguments();

        recorder.record(EvalPhase::Pending, || format!("{} contract(s)", contracts.len()));

        for (index, contract) in contracts.iter().enumerate() {
            recorder.record(EvalPhase::Testing(index), || contract.to_string());

            let compiled = compile(contract, arguments, factory)?;
            if let [condition] = compiled.conditions.as_slice() {
                unmatched.push(condition.negated());
            }
            let mut fork = state.fork();

            let result_constraints: &[Condition] = match &compiled.outcome {
                ContractOutcome::Returns { constraints, .. } => constraints.as_slice(),
                ContractOutcome::Throws => &[],
            };
            let failed = compiled
                .conditions
                .iter()
                .chain(result_constraints)
                .find(|condition| !fork.impose(condition));

            if let Some(condition) = failed {
                tracing::debug!(index, %contract, %condition, "contract skipped");
                recorder.record(EvalPhase::Skip(index), || condition.to_string());
                if self.config.report_skipped {
                    diagnostics.push(ContractDiagnostic::NeverSatisfied { index });
                }
                continue;
            }

            let outcome = match compiled.outcome {
                ContractOutcome::Returns { value, .. } => {
                    fork.bind_return(value);
                    BranchOutcome::Returns(value)
                }
                ContractOutcome::Throws => {
                    fork.enter_exceptional_exit();
                    BranchOutcome::Throws
                }
            };
            tracing::debug!(index, %contract, ?outcome, "contract split");
            recorder.record(EvalPhase::Split(index), || format!("{:?}", outcome));
            branches.push(Branch {
                state: fork,
                origin: BranchOrigin::Contract(index),
                outcome,
            });

            if compiled.unconditional {
                for later in index + 1..contracts.len() {
                    tracing::warn!(
                        index = later,
                        shadowed_by = index,
                        contract = %contracts[later],
                        "unreachable contract after trivial contract"
                    );
                    diagnostics.push(ContractDiagnostic::Unreachable {
                        index: later,
                        shadowed_by: index,
                    });
                }
                recorder.record(EvalPhase::Exhausted, || {
                    format!("absorbed by trivial contract {}", index)
                });
                return Ok(Evaluation {
                    branches,
                    diagnostics,
                    absorbed_by: Some(index),
                    trace: recorder.finish(),
                });
            }
        }

        let mut fallback = state.fork();
        if let Some(condition) = unmatched.iter().find(|c| !fallback.impose(c)) {
            tracing::debug!(%condition, "default branch dropped, contracts cover the call");
            recorder.record(EvalPhase::Exhausted, || {
                format!("contracts cover the call, {} holds", condition.negated())
            });
        } else {
            let value = factory.fresh_value();
            fallback.bind_return(value);
            branches.push(Branch {
                state: fallback,
                origin: BranchOrigin::Default,
                outcome: BranchOutcome::Returns(value),
            });
            recorder.record(EvalPhase::Exhausted, || "no contract matched".to_string());
        }

        Ok(Evaluation {
            branches,
            diagnostics,
            absorbed_by: None,
            trace: recorder.finish(),
        })
    }
}

/// Evaluates with the default configuration and returns only the branch
/// states, one per live branch.
pub fn evaluate<S, C, F>(
    contracts: &[Contract],
    call_site: &C,
    state: &S,
    factory: &mut F,
) -> Result<Vec<S>, ContractUsageError>
where
    S: MemoryState,
    C: CallSiteValues + ?Sized,
    F: ValueFactory + ?Sized,
{
    ContractEvaluator::default()
        .evaluate(contracts, call_site, state, factory)
        .map(Evaluation::into_states)
}
