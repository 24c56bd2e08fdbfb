//! Stable ID newtype for symbolic values.
//!
//! A [`ValueId`] is a handle into the value factory that produced it. The
//! three constants every analysis needs (`null`, `true`, `false`) occupy the
//! first slots so that any factory and any memory state agree on them without
//! a lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable symbolic value identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

/// Pre-registered ValueId constants for the built-in constants.
impl ValueId {
    pub const NULL: ValueId = ValueId(0);
    pub const TRUE: ValueId = ValueId(1);
    pub const FALSE: ValueId = ValueId(2);

    /// Number of pre-registered constant slots.
    pub const BUILTIN_COUNT: u32 = 3;

    /// Returns true if this id names one of the pre-registered constants.
    pub fn is_constant(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValueId::NULL => write!(f, "null"),
            ValueId::TRUE => write!(f, "true"),
            ValueId::FALSE => write!(f, "false"),
            ValueId(n) => write!(f, "v{}", n),
        }
    }
}
