//! Evaluation trace recording for the contract evaluator.
//!
//! When tracing is enabled via [`EvaluatorConfig::trace_enabled`], the
//! evaluator records a [`TraceEntry`] for every state-machine transition at a
//! call site.
//!
//! [`EvaluatorConfig::trace_enabled`]: super::EvaluatorConfig::trace_enabled

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the per-call-site evaluation state machine.
///
/// `Pending -> (Testing(i) -> (Split(i) | Skip(i)))* -> Exhausted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "contract", rename_all = "snake_case")]
pub enum EvalPhase {
    /// No contract tried yet.
    Pending,
    /// Compiling and imposing contract `i`.
    Testing(usize),
    /// Contract `i` was satisfiable and forked a branch.
    Split(usize),
    /// Contract `i` contradicted the state; no branch.
    Skip(usize),
    /// No more contracts to try.
    Exhausted,
}

impl fmt::Display for EvalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalPhase::Pending => write!(f, "PENDING"),
            EvalPhase::Testing(i) => write!(f, "TESTING({})", i),
            EvalPhase::Split(i) => write!(f, "SPLIT({})", i),
            EvalPhase::Skip(i) => write!(f, "SKIP({})", i),
            EvalPhase::Exhausted => write!(f, "EXHAUSTED"),
        }
    }
}

/// A single entry in the evaluation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    #[serde(flatten)]
    pub phase: EvalPhase,
    /// Human-readable detail: the contract under test, the condition that
    /// failed, or the reason evaluation stopped.
    pub detail: String,
}

/// Collects trace entries when enabled; a no-op otherwise.
#[derive(Debug, Default)]
pub(crate) struct TraceRecorder {
    entries: Option<Vec<TraceEntry>>,
}

impl TraceRecorder {
    pub(crate) fn new(enabled: bool) -> Self {
        TraceRecorder {
            entries: enabled.then(Vec::new),
        }
    }

    pub(crate) fn record(&mut self, phase: EvalPhase, detail: impl FnOnce() -> String) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(TraceEntry {
                phase,
                detail: detail(),
            });
        }
    }

    pub(crate) fn finish(self) -> Option<Vec<TraceEntry>> {
        self.entries
    }
}
