//! The constraint vocabulary: what a contract may say about one value.
//!
//! Every other component derives its (in)equality semantics from
//! [`ValueConstraint::condition`], so the token a contract is displayed with
//! and the condition it is enforced with cannot drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mcontract_core::condition::Condition;
use mcontract_core::factory::ValueFactory;
use mcontract_core::id::ValueId;

/// A constraint on an argument or on the return behavior of a callable.
///
/// Serializes as its presentation token, so serde, [`Display`](fmt::Display)
/// and [`FromStr`] all share the one token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueConstraint {
    #[serde(rename = "_")]
    Any,
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "!null")]
    NotNull,
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    /// The exceptional exit. Only valid as a return constraint.
    #[serde(rename = "fail")]
    Throws,
}

impl ValueConstraint {
    /// All variants, in token-table order.
    pub const ALL: [ValueConstraint; 6] = [
        ValueConstraint::Any,
        ValueConstraint::Null,
        ValueConstraint::NotNull,
        ValueConstraint::True,
        ValueConstraint::False,
        ValueConstraint::Throws,
    ];

    /// The presentation token used for parsing and display.
    pub fn token(self) -> &'static str {
        match self {
            ValueConstraint::Any => "_",
            ValueConstraint::Null => "null",
            ValueConstraint::NotNull => "!null",
            ValueConstraint::True => "true",
            ValueConstraint::False => "false",
            ValueConstraint::Throws => "fail",
        }
    }

    /// Inverse of [`token`](Self::token).
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.token() == token)
    }

    /// False only for [`Throws`](Self::Throws), which constrains control flow.
    pub fn is_argument_constraint(self) -> bool {
        self != ValueConstraint::Throws
    }

    /// The constant the subject is compared against, if any.
    pub fn comparison_value<F: ValueFactory + ?Sized>(self, factory: &F) -> Option<ValueId> {
        match self {
            ValueConstraint::Null | ValueConstraint::NotNull => Some(factory.const_null()),
            ValueConstraint::True | ValueConstraint::False => Some(factory.const_true()),
            ValueConstraint::Any | ValueConstraint::Throws => None,
        }
    }

    /// True when the constraint holds by *inequality* to the comparison value.
    pub fn uses_non_equivalence(self) -> bool {
        matches!(self, ValueConstraint::NotNull | ValueConstraint::False)
    }

    /// Returns the condition `subject` must satisfy for this constraint.
    ///
    /// `Any` and `Throws` impose nothing on the subject's value and yield the
    /// factory's unconditional-true condition.
    pub fn condition<F: ValueFactory + ?Sized>(self, factory: &mut F, subject: ValueId) -> Condition {
        match self.comparison_value(&*factory) {
            Some(expected) => factory.equivalence(subject, expected, self.uses_non_equivalence()),
            None => factory.always(),
        }
    }
}

impl fmt::Display for ValueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a string is not a constraint token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown constraint token '{0}'")]
pub struct UnknownConstraint(pub String);

impl FromStr for ValueConstraint {
    type Err = UnknownConstraint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownConstraint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcontract_core::condition::{Relation, RelationType};
    use mcontract_core::factory::InternedValueFactory;
    use proptest::prelude::*;

    fn any_constraint() -> impl Strategy<Value = ValueConstraint> {
        proptest::sample::select(ValueConstraint::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn token_roundtrip(c in any_constraint()) {
            prop_assert_eq!(ValueConstraint::from_token(c.token()), Some(c));
            prop_assert_eq!(c.to_string().parse::<ValueConstraint>(), Ok(c));
        }

        #[test]
        fn serde_uses_token(c in any_constraint()) {
            let json = serde_json::to_string(&c).unwrap();
            prop_assert_eq!(json, format!("\"{}\"", c.token()));
            let back: ValueConstraint = serde_json::from_str(&format!("\"{}\"", c.token())).unwrap();
            prop_assert_eq!(back, c);
        }
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(ValueConstraint::from_token("NULL"), None);
        assert_eq!(
            "nil".parse::<ValueConstraint>(),
            Err(UnknownConstraint("nil".into()))
        );
    }

    #[test]
    fn test_comparison_values() {
        let factory = InternedValueFactory::new();
        assert_eq!(ValueConstraint::Null.comparison_value(&factory), Some(ValueId::NULL));
        assert_eq!(ValueConstraint::NotNull.comparison_value(&factory), Some(ValueId::NULL));
        assert_eq!(ValueConstraint::True.comparison_value(&factory), Some(ValueId::TRUE));
        assert_eq!(ValueConstraint::False.comparison_value(&factory), Some(ValueId::TRUE));
        assert_eq!(ValueConstraint::Any.comparison_value(&factory), None);
        assert_eq!(ValueConstraint::Throws.comparison_value(&factory), None);
    }

    #[test]
    fn test_non_equivalence_variants() {
        let non_eq: Vec<_> = ValueConstraint::ALL
            .into_iter()
            .filter(|c| c.uses_non_equivalence())
            .collect();
        assert_eq!(non_eq, vec![ValueConstraint::NotNull, ValueConstraint::False]);
    }

    #[test]
    fn test_any_and_throws_are_unconditional() {
        let mut factory = InternedValueFactory::new();
        let x = factory.fresh_value();
        assert_eq!(ValueConstraint::Any.condition(&mut factory, x), Condition::Always);
        assert_eq!(ValueConstraint::Throws.condition(&mut factory, x), Condition::Always);
    }

    #[test]
    fn test_conditions_on_fresh_subject() {
        let mut factory = InternedValueFactory::new();
        let x = factory.fresh_value();

        let expect = |other, relation| Condition::Relation(Relation::new(x, other, relation));
        assert_eq!(
            ValueConstraint::Null.condition(&mut factory, x),
            expect(ValueId::NULL, RelationType::Equivalent)
        );
        assert_eq!(
            ValueConstraint::NotNull.condition(&mut factory, x),
            expect(ValueId::NULL, RelationType::NotEquivalent)
        );
        assert_eq!(
            ValueConstraint::True.condition(&mut factory, x),
            expect(ValueId::TRUE, RelationType::Equivalent)
        );
        assert_eq!(
            ValueConstraint::False.condition(&mut factory, x),
            expect(ValueId::TRUE, RelationType::NotEquivalent)
        );
    }

    #[test]
    fn test_conditions_on_null_subject_fold() {
        let mut factory = InternedValueFactory::new();
        let null = factory.const_null();
        assert_eq!(ValueConstraint::Null.condition(&mut factory, null), Condition::Always);
        assert_eq!(ValueConstraint::NotNull.condition(&mut factory, null), Condition::Never);
    }

    #[test]
    fn test_only_throws_is_not_an_argument_constraint() {
        for c in ValueConstraint::ALL {
            assert_eq!(c.is_argument_constraint(), c != ValueConstraint::Throws);
        }
    }
}
