//! Core error types for mcontract-core.
//!
//! Uses `thiserror` for structured, matchable error variants.

use crate::id::ValueId;
use thiserror::Error;

/// Core errors produced by the mcontract-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A ValueId was not allocated by the factory it was looked up in.
    #[error("value not found: ValueId({id})", id = id.0)]
    ValueNotFound { id: ValueId },
}
