//! Non-fatal findings about a contract list.
//!
//! Diagnostics never stop analysis. The evaluator reports contracts shadowed
//! by an absorbing trivial contract and contracts whose conditions could not
//! hold at a call site. The signature lint reports the rest.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constraint::ValueConstraint;
use super::lint::ValueKind;

/// A finding about one contract in a list, identified by its clause index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractDiagnostic {
    /// An earlier trivial contract absorbs every call, so this one is never
    /// tested.
    Unreachable {
        index: usize,
        /// The earlier contract that absorbs this one.
        shadowed_by: usize,
    },

    /// An earlier non-trivial contract matches every call this one matches.
    /// Both still fork a branch, so the later clause only adds an overlapping
    /// outcome.
    Redundant {
        index: usize,
        covered_by: usize,
    },

    /// The contract's conditions contradict what is known at the call site.
    NeverSatisfied { index: usize },

    /// The contract's argument count differs from the declared parameters.
    ArityMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// An argument constraint cannot apply to the parameter's kind.
    IncompatibleArgument {
        index: usize,
        position: usize,
        constraint: ValueConstraint,
        param: ValueKind,
    },

    /// The return constraint cannot apply to the declared return kind.
    IncompatibleReturn {
        index: usize,
        constraint: ValueConstraint,
        returns: ValueKind,
    },
}

impl ContractDiagnostic {
    /// Index of the clause this diagnostic is about.
    pub fn index(&self) -> usize {
        match self {
            ContractDiagnostic::Unreachable { index, .. }
            | ContractDiagnostic::Redundant { index, .. }
            | ContractDiagnostic::NeverSatisfied { index }
            | ContractDiagnostic::ArityMismatch { index, .. }
            | ContractDiagnostic::IncompatibleArgument { index, .. }
            | ContractDiagnostic::IncompatibleReturn { index, .. } => *index,
        }
    }
}

impl fmt::Display for ContractDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractDiagnostic::Unreachable { index, shadowed_by } => write!(
                f,
                "contract clause #{} is unreachable: clause #{} always applies first",
                index + 1,
                shadowed_by + 1
            ),
            ContractDiagnostic::Redundant { index, covered_by } => write!(
                f,
                "contract clause #{} is redundant: clause #{} matches every call it matches",
                index + 1,
                covered_by + 1
            ),
            ContractDiagnostic::NeverSatisfied { index } => {
                write!(f, "contract clause #{} can never be satisfied here", index + 1)
            }
            ContractDiagnostic::ArityMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "contract clause #{} has {} argument(s), but the method has {} parameter(s)",
                index + 1,
                actual,
                expected
            ),
            ContractDiagnostic::IncompatibleArgument {
                index,
                position,
                constraint,
                param,
            } => write!(
                f,
                "contract clause #{}: '{}' cannot apply to {} parameter #{}",
                index + 1,
                constraint,
                param,
                position + 1
            ),
            ContractDiagnostic::IncompatibleReturn {
                index,
                constraint,
                returns,
            } => write!(
                f,
                "contract clause #{}: '{}' cannot describe a {} return",
                index + 1,
                constraint,
                returns
            ),
        }
    }
}
