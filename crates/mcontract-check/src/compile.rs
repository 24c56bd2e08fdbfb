//! Condition compiler: materializes one contract at one call site.
//!
//! Compiling produces the conjoined conditions under which the contract's
//! branch applies and the outcome of that branch. All constraint semantics are
//! taken from [`ValueConstraint::condition`]; nothing here re-derives
//! equality or inequality on its own.

use smallvec::SmallVec;

use mcontract_core::condition::Condition;
use mcontract_core::factory::ValueFactory;
use mcontract_core::id::ValueId;

use crate::contracts::{Contract, ValueConstraint};

/// A contract was applied to a call with the wrong number of arguments.
///
/// This is a caller bug (e.g. the contracts of one callable evaluated at a
/// call to another), never a property of the analyzed source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractUsageError {
    #[error("contract expects {expected} argument(s) but the call site supplies {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },
}

/// How a contract's branch leaves the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractOutcome {
    /// Normal return of `value`, which must additionally satisfy
    /// `constraints` (e.g. `value != null` for a `!null` return).
    Returns {
        value: ValueId,
        constraints: SmallVec<[Condition; 1]>,
    },
    /// Exceptional exit; there is no return value to bind.
    Throws,
}

/// The result of compiling one contract against one call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContract {
    /// Conditions on the arguments; the branch applies only if all hold.
    pub conditions: SmallVec<[Condition; 4]>,
    pub outcome: ContractOutcome,
    /// True for trivial contracts: the branch applies whenever reached.
    pub unconditional: bool,
}

/// Compiles `contract` against the symbolic `arguments` of a call.
///
/// Positions constrained by `_` contribute no condition. Conditions already
/// decided by the factory are kept as [`Condition::Always`] /
/// [`Condition::Never`] so the evaluator can skip a branch without touching
/// the memory state.
pub fn compile<F: ValueFactory + ?Sized>(
    contract: &Contract,
    arguments: &[ValueId],
    factory: &mut F,
) -> Result<CompiledContract, ContractUsageError> {
    if arguments.len() != contract.arity() {
        return Err(ContractUsageError::ArgumentCountMismatch {
            expected: contract.arity(),
            actual: arguments.len(),
        });
    }

    let conditions = contract
        .arguments()
        .iter()
        .zip(arguments.iter())
        .filter(|(constraint, _)| **constraint != ValueConstraint::Any)
        .map(|(constraint, value)| constraint.condition(&mut *factory, *value))
        .collect();

    Ok(CompiledContract {
        conditions,
        outcome: compile_outcome(contract.return_value(), factory),
        unconditional: contract.is_trivial(),
    })
}

/// Equivalence constraints bind their comparison value directly; the others
/// bind a fresh value constrained through the vocabulary.
fn compile_outcome<F: ValueFactory + ?Sized>(
    return_value: ValueConstraint,
    factory: &mut F,
) -> ContractOutcome {
    if return_value == ValueConstraint::Throws {
        return ContractOutcome::Throws;
    }

    match return_value.comparison_value(&*factory) {
        Some(value) if !return_value.uses_non_equivalence() => ContractOutcome::Returns {
            value,
            constraints: SmallVec::new(),
        },
        _ => {
            let value = factory.fresh_value();
            let mut constraints = SmallVec::new();
            let condition = return_value.condition(factory, value);
            if !condition.is_always() {
                constraints.push(condition);
            }
            ContractOutcome::Returns { value, constraints }
        }
    }
}
