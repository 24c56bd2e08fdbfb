//! Method contracts: declarative summaries of a callable's behavior.
//!
//! A [`Contract`] states that when every argument satisfies its
//! [`ValueConstraint`], the call returns a value satisfying the return
//! constraint (or throws, for [`ValueConstraint::Throws`]). A callable's
//! contracts form an ordered list; order matters because a contract whose
//! arguments are all unconstrained absorbs every call that reaches it.

pub mod constraint;
pub mod diagnostics;
pub mod lint;
pub mod parse;

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use constraint::ValueConstraint;
pub use diagnostics::ContractDiagnostic;

/// Errors raised when constructing a [`Contract`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ContractError {
    /// `fail` constrains control flow and cannot describe an argument.
    #[error("'fail' cannot constrain argument {position}")]
    ThrowsAsArgument { position: usize },
}

/// One contract clause: argument constraints plus the return behavior.
///
/// Immutable once built. The argument count always equals the arity of the
/// callable the contract was parsed for, and no argument is
/// [`ValueConstraint::Throws`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawContract")]
pub struct Contract {
    arguments: SmallVec<[ValueConstraint; 4]>,
    return_value: ValueConstraint,
}

/// Unvalidated serde shape of a [`Contract`].
#[derive(Deserialize)]
struct RawContract {
    arguments: Vec<ValueConstraint>,
    return_value: ValueConstraint,
}

impl TryFrom<RawContract> for Contract {
    type Error = ContractError;

    fn try_from(raw: RawContract) -> Result<Self, Self::Error> {
        Contract::new(raw.arguments, raw.return_value)
    }
}

impl Contract {
    /// Builds a contract, rejecting `fail` in argument position.
    pub fn new(
        arguments: impl IntoIterator<Item = ValueConstraint>,
        return_value: ValueConstraint,
    ) -> Result<Self, ContractError> {
        let arguments: SmallVec<[ValueConstraint; 4]> = arguments.into_iter().collect();
        if let Some(position) = arguments.iter().position(|c| !c.is_argument_constraint()) {
            return Err(ContractError::ThrowsAsArgument { position });
        }
        Ok(Contract {
            arguments,
            return_value,
        })
    }

    /// A contract with `arity` unconstrained arguments.
    pub fn trivial(arity: usize, return_value: ValueConstraint) -> Self {
        Contract {
            arguments: SmallVec::from_elem(ValueConstraint::Any, arity),
            return_value,
        }
    }

    /// Argument constraints in parameter order.
    pub fn arguments(&self) -> &[ValueConstraint] {
        &self.arguments
    }

    /// The value the call produces when the contract applies.
    pub fn return_value(&self) -> ValueConstraint {
        self.return_value
    }

    /// Number of argument constraints.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// True if the result does not depend on the arguments.
    pub fn is_trivial(&self) -> bool {
        self.arguments.iter().all(|c| *c == ValueConstraint::Any)
    }

    /// True if the contract describes an exceptional exit.
    pub fn throws(&self) -> bool {
        self.return_value == ValueConstraint::Throws
    }

    /// True if every call matching `other` also matches `self`.
    ///
    /// Both contracts must have the same arity; contracts of different arity
    /// never subsume each other.
    pub fn subsumes(&self, other: &Contract) -> bool {
        self.arity() == other.arity()
            && self
                .arguments
                .iter()
                .zip(other.arguments.iter())
                .all(|(mine, theirs)| *mine == ValueConstraint::Any || mine == theirs)
    }

    /// The comma-separated argument tokens, e.g. `"_, null"`.
    pub fn arguments_presentation(&self) -> String {
        self.arguments
            .iter()
            .map(|c| c.token())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "-> {}", self.return_value)
        } else {
            write!(f, "{} -> {}", self.arguments_presentation(), self.return_value)
        }
    }
}

/// Renders contracts back into specification text, e.g.
/// `"_, null -> true; !null, _ -> false"`.
pub fn format_contracts(contracts: &[Contract]) -> String {
    contracts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
