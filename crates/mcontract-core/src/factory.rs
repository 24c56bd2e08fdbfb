//! The value factory collaborator and its interning implementation.
//!
//! [`ValueFactory`] is the only shared mutable service the contract engine
//! touches. It is passed explicitly into every compiling and evaluating call;
//! callers that share one factory between analysis workers synchronize it
//! themselves.
//!
//! [`InternedValueFactory`] pre-registers the `null`, `true` and `false`
//! constants at [`ValueId::NULL`], [`ValueId::TRUE`] and [`ValueId::FALSE`],
//! so every constant has exactly one id. It folds relations whose outcome
//! follows from value identity alone into `Always` / `Never`. Other relations
//! are built fresh on each request; they are normalized, so equal requests
//! compare equal, but they are not interned.

use crate::condition::{Condition, Relation, RelationType};
use crate::error::CoreError;
use crate::id::ValueId;
use crate::value::{ConstValue, SymbolicValue};

/// Manufactures symbolic values and the conditions relating them.
pub trait ValueFactory {
    /// The `null` constant.
    fn const_null(&self) -> ValueId;

    /// The boolean `true` constant.
    fn const_true(&self) -> ValueId;

    /// A new value about which nothing is known.
    fn fresh_value(&mut self) -> ValueId;

    /// `left == right`, or `left != right` when `negate` is set.
    fn equivalence(&mut self, left: ValueId, right: ValueId, negate: bool) -> Condition;

    /// The unconditional-true condition.
    fn always(&self) -> Condition {
        Condition::Always
    }
}

/// Registry of symbolic values with fixed slots for the constants.
#[derive(Debug, Clone)]
pub struct InternedValueFactory {
    /// Values indexed by ValueId.0
    values: Vec<SymbolicValue>,
    /// Number of fresh values handed out so far
    fresh_count: u32,
}

impl InternedValueFactory {
    /// Creates a factory with the built-in constants pre-registered.
    pub fn new() -> Self {
        // Order matches ValueId::NULL, ValueId::TRUE and ValueId::FALSE.
        let values = [
            ConstValue::Null,
            ConstValue::Bool(true),
            ConstValue::Bool(false),
        ]
        .into_iter()
        .map(SymbolicValue::Const)
        .collect();

        InternedValueFactory {
            values,
            fresh_count: 0,
        }
    }

    /// Returns the pre-registered id of a constant.
    pub fn constant(&self, value: ConstValue) -> ValueId {
        match value {
            ConstValue::Null => ValueId::NULL,
            ConstValue::Bool(true) => ValueId::TRUE,
            ConstValue::Bool(false) => ValueId::FALSE,
        }
    }

    /// The boolean `false` constant.
    pub fn const_false(&self) -> ValueId {
        ValueId::FALSE
    }

    /// Looks up a value by id.
    pub fn get(&self, id: ValueId) -> Result<&SymbolicValue, CoreError> {
        self.values
            .get(id.0 as usize)
            .ok_or(CoreError::ValueNotFound { id })
    }

    /// Returns the constant `id` stands for, or `None` for fresh values and
    /// ids this factory never produced.
    pub fn const_of(&self, id: ValueId) -> Option<ConstValue> {
        self.get(id).ok().and_then(SymbolicValue::as_const)
    }

    /// Total number of values, constants included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A factory always holds the built-in constants, so it is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for InternedValueFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueFactory for InternedValueFactory {
    fn const_null(&self) -> ValueId {
        self.constant(ConstValue::Null)
    }

    fn const_true(&self) -> ValueId {
        self.constant(ConstValue::Bool(true))
    }

    fn fresh_value(&mut self) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(SymbolicValue::Fresh {
            ordinal: self.fresh_count,
        });
        self.fresh_count += 1;
        id
    }

    fn equivalence(&mut self, left: ValueId, right: ValueId, negate: bool) -> Condition {
        let relation = RelationType::equivalence(!negate);

        if left == right {
            tracing::trace!(%left, %relation, "folded relation on identical values");
            return if relation.holds(true) {
                Condition::Always
            } else {
                Condition::Never
            };
        }

        if let (Some(_), Some(_)) = (self.const_of(left), self.const_of(right)) {
            // Each constant has one slot, so distinct ids are distinct constants.
            tracing::trace!(%left, %right, %relation, "folded relation on constants");
            return if relation.holds(false) {
                Condition::Always
            } else {
                Condition::Never
            };
        }

        Condition::Relation(Relation::new(left, right, relation))
    }
}
