//! Symbolic values manufactured by a value factory.
//!
//! The contract engine only ever compares values against the `null`
//! constant and the boolean constants, so [`ConstValue`] is deliberately
//! narrow. Everything else is an opaque [`SymbolicValue::Fresh`] placeholder
//! whose facts live in a memory state, not in the value itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant known to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstValue {
    Null,
    Bool(bool),
}

/// A value stored in the factory, addressed by [`ValueId`](crate::id::ValueId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicValue {
    /// A constant in its pre-registered slot.
    Const(ConstValue),
    /// An unconstrained value; `ordinal` counts fresh values in creation order.
    Fresh { ordinal: u32 },
}

impl SymbolicValue {
    /// Returns the constant this value stands for, if any.
    pub fn as_const(&self) -> Option<ConstValue> {
        match self {
            SymbolicValue::Const(c) => Some(*c),
            SymbolicValue::Fresh { .. } => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Null => write!(f, "null"),
            ConstValue::Bool(b) => write!(f, "{}", b),
        }
    }
}
