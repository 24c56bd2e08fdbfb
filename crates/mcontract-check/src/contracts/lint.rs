//! Static checks of a contract list against the callable's signature.
//!
//! The parser only knows the parameter count. The lint additionally knows what
//! kind of value each parameter and the return slot hold, so it can flag
//! clauses like `null` on a primitive parameter or `true` on a reference
//! return. It also flags clauses an earlier clause covers: unreachable when
//! the earlier clause is trivial and absorbs the call, redundant otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constraint::ValueConstraint;
use super::diagnostics::ContractDiagnostic;
use super::Contract;

/// The kind of value a parameter or return slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// An object reference; may be null.
    Reference,
    /// A primitive boolean.
    Boolean,
    /// Any other primitive; never null, never a boolean.
    Primitive,
    /// No value (only meaningful for returns).
    Void,
}

impl ValueKind {
    /// Parses the lowercase kind name used by the CLI.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reference" | "ref" => Some(ValueKind::Reference),
            "boolean" | "bool" => Some(ValueKind::Boolean),
            "primitive" | "prim" => Some(ValueKind::Primitive),
            "void" => Some(ValueKind::Void),
            _ => None,
        }
    }

    /// Whether a constraint is meaningful for a value of this kind.
    pub fn admits(self, constraint: ValueConstraint) -> bool {
        match constraint {
            ValueConstraint::Any | ValueConstraint::Throws => true,
            ValueConstraint::Null | ValueConstraint::NotNull => self == ValueKind::Reference,
            ValueConstraint::True | ValueConstraint::False => self == ValueKind::Boolean,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Reference => "reference",
            ValueKind::Boolean => "boolean",
            ValueKind::Primitive => "primitive",
            ValueKind::Void => "void",
        };
        f.write_str(name)
    }
}

/// Parameter and return kinds of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<ValueKind>,
    pub returns: ValueKind,
}

impl Signature {
    pub fn new(params: impl IntoIterator<Item = ValueKind>, returns: ValueKind) -> Self {
        Signature {
            params: params.into_iter().collect(),
            returns,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Checks every clause against `signature` and against the clauses before
/// it. Diagnostics are ordered by clause index.
pub fn lint_contracts(contracts: &[Contract], signature: &Signature) -> Vec<ContractDiagnostic> {
    let mut diagnostics = Vec::new();

    for (index, contract) in contracts.iter().enumerate() {
        if contract.arity() != signature.arity() {
            diagnostics.push(ContractDiagnostic::ArityMismatch {
                index,
                expected: signature.arity(),
                actual: contract.arity(),
            });
        } else {
            for (position, (constraint, param)) in contract
                .arguments()
                .iter()
                .zip(signature.params.iter())
                .enumerate()
            {
                if !param.admits(*constraint) {
                    diagnostics.push(ContractDiagnostic::IncompatibleArgument {
                        index,
                        position,
                        constraint: *constraint,
                        param: *param,
                    });
                }
            }
        }

        let returns_ok = match signature.returns {
            ValueKind::Void => matches!(
                contract.return_value(),
                ValueConstraint::Any | ValueConstraint::Throws
            ),
            kind => kind.admits(contract.return_value()),
        };
        if !returns_ok {
            diagnostics.push(ContractDiagnostic::IncompatibleReturn {
                index,
                constraint: contract.return_value(),
                returns: signature.returns,
            });
        }

        let earlier = &contracts[..index];
        if let Some(shadowed_by) = earlier
            .iter()
            .position(|c| c.is_trivial() && c.subsumes(contract))
        {
            diagnostics.push(ContractDiagnostic::Unreachable { index, shadowed_by });
        } else if let Some(covered_by) = earlier.iter().position(|c| c.subsumes(contract)) {
            diagnostics.push(ContractDiagnostic::Redundant { index, covered_by });
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::parse::parse_contracts;

    fn sig(params: &[ValueKind], returns: ValueKind) -> Signature {
        Signature::new(params.iter().copied(), returns)
    }

    #[test]
    fn test_clean_contracts_have_no_diagnostics() {
        let contracts = parse_contracts("null -> false; !null -> true", 1).unwrap();
        let d = lint_contracts(&contracts, &sig(&[ValueKind::Reference], ValueKind::Boolean));
        assert!(d.is_empty(), "unexpected diagnostics: {:?}", d);
    }

    #[test]
    fn test_null_on_primitive_parameter() {
        let contracts = parse_contracts("_, null -> fail", 2).unwrap();
        let d = lint_contracts(
            &contracts,
            &sig(&[ValueKind::Reference, ValueKind::Primitive], ValueKind::Void),
        );
        assert_eq!(
            d,
            vec![ContractDiagnostic::IncompatibleArgument {
                index: 0,
                position: 1,
                constraint: ValueConstraint::Null,
                param: ValueKind::Primitive,
            }]
        );
    }

    #[test]
    fn test_value_return_on_void_method() {
        let contracts = parse_contracts("null -> null", 1).unwrap();
        let d = lint_contracts(&contracts, &sig(&[ValueKind::Reference], ValueKind::Void));
        assert_eq!(
            d,
            vec![ContractDiagnostic::IncompatibleReturn {
                index: 0,
                constraint: ValueConstraint::Null,
                returns: ValueKind::Void,
            }]
        );
    }

    #[test]
    fn test_boolean_return_on_reference_method() {
        let contracts = parse_contracts("null -> true", 1).unwrap();
        let d = lint_contracts(&contracts, &sig(&[ValueKind::Reference], ValueKind::Reference));
        assert_eq!(d.len(), 1);
        assert!(matches!(d[0], ContractDiagnostic::IncompatibleReturn { .. }));
    }

    #[test]
    fn test_arity_mismatch_against_signature() {
        let contracts = parse_contracts("_, _ -> fail", 2).unwrap();
        let d = lint_contracts(&contracts, &sig(&[ValueKind::Reference], ValueKind::Void));
        assert_eq!(
            d,
            vec![ContractDiagnostic::ArityMismatch {
                index: 0,
                expected: 1,
                actual: 2,
            }]
        );
    }

    #[test]
    fn test_covered_clauses_are_redundant_or_unreachable() {
        let contracts = parse_contracts("null, _ -> fail; null, !null -> true; _ -> false", 2);
        assert!(contracts.is_err(), "last clause has the wrong arity");

        let contracts =
            parse_contracts("null, _ -> fail; null, !null -> true; _, _ -> false; !null, _ -> true", 2)
                .unwrap();
        let d = lint_contracts(
            &contracts,
            &sig(&[ValueKind::Reference, ValueKind::Reference], ValueKind::Boolean),
        );
        assert_eq!(
            d,
            vec![
                ContractDiagnostic::Redundant {
                    index: 1,
                    covered_by: 0
                },
                ContractDiagnostic::Unreachable {
                    index: 3,
                    shadowed_by: 2
                },
            ]
        );
    }

    #[test]
    fn test_trivial_clause_wins_over_earlier_overlap() {
        let contracts = parse_contracts("null -> true; _ -> false; null -> false", 1).unwrap();
        let d = lint_contracts(&contracts, &sig(&[ValueKind::Reference], ValueKind::Boolean));
        assert_eq!(
            d,
            vec![ContractDiagnostic::Unreachable {
                index: 2,
                shadowed_by: 1
            }]
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::from_name("bool"), Some(ValueKind::Boolean));
        assert_eq!(ValueKind::from_name("reference"), Some(ValueKind::Reference));
        assert_eq!(ValueKind::from_name("int"), None);
        assert_eq!(ValueKind::Primitive.to_string(), "primitive");
    }
}
