//! Boolean conditions over symbolic values.
//!
//! A [`Condition`] is what a memory state is asked to impose. Conditions whose
//! outcome is already known from value identity are folded by the factory
//! into [`Condition::Always`] / [`Condition::Never`], so a memory state only
//! ever sees a [`Relation`] when the answer actually depends on its facts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ValueId;

/// The relation between the two sides of a [`Relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Equivalent,
    NotEquivalent,
}

impl RelationType {
    /// `Equivalent` when `equal` is true, `NotEquivalent` otherwise.
    pub fn equivalence(equal: bool) -> Self {
        if equal {
            RelationType::Equivalent
        } else {
            RelationType::NotEquivalent
        }
    }

    /// The opposite relation.
    pub fn negated(self) -> Self {
        match self {
            RelationType::Equivalent => RelationType::NotEquivalent,
            RelationType::NotEquivalent => RelationType::Equivalent,
        }
    }

    /// Evaluates the relation for two sides already known equal or distinct.
    pub fn holds(self, sides_equal: bool) -> bool {
        match self {
            RelationType::Equivalent => sides_equal,
            RelationType::NotEquivalent => !sides_equal,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::Equivalent => write!(f, "=="),
            RelationType::NotEquivalent => write!(f, "!="),
        }
    }
}

/// An (in)equivalence between two values, normalized so `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub left: ValueId,
    pub right: ValueId,
    pub relation: RelationType,
}

impl Relation {
    /// Builds a normalized relation. Operand order does not matter for
    /// (in)equivalence, so `a == b` and `b == a` compare equal.
    pub fn new(a: ValueId, b: ValueId, relation: RelationType) -> Self {
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        Relation {
            left,
            right,
            relation,
        }
    }
}

/// A boolean-valued condition to impose on a memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Holds in every state.
    Always,
    /// Holds in no state.
    Never,
    /// Holds iff the relation holds in the state.
    Relation(Relation),
}

impl Condition {
    pub fn is_always(&self) -> bool {
        matches!(self, Condition::Always)
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Condition::Never)
    }

    /// The logical negation of this condition.
    pub fn negated(self) -> Self {
        match self {
            Condition::Always => Condition::Never,
            Condition::Never => Condition::Always,
            Condition::Relation(r) => Condition::Relation(Relation {
                relation: r.relation.negated(),
                ..r
            }),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "true"),
            Condition::Never => write!(f, "false"),
            Condition::Relation(r) => write!(f, "{} {} {}", r.left, r.relation, r.right),
        }
    }
}
