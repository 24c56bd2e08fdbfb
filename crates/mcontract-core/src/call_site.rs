//! Call-site value provider.
//!
//! The dataflow engine evaluates the receiver and argument expressions of a
//! call before the contract evaluator runs; [`CallSiteValues`] is the seam
//! through which it hands those symbolic values over. [`CallSite`] is the
//! plain owned implementation used by tests and the CLI.

use smallvec::SmallVec;

use crate::id::ValueId;

/// Supplies the symbolic values at one call site.
pub trait CallSiteValues {
    /// The receiver (`this`) value, or `None` for static calls.
    fn receiver(&self) -> Option<ValueId>;

    /// Argument values in declaration order.
    fn arguments(&self) -> &[ValueId];
}

/// Owned receiver and argument values for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    receiver: Option<ValueId>,
    arguments: SmallVec<[ValueId; 4]>,
}

impl CallSite {
    /// Creates a call site with an explicit receiver.
    pub fn new(receiver: Option<ValueId>, arguments: impl IntoIterator<Item = ValueId>) -> Self {
        CallSite {
            receiver,
            arguments: arguments.into_iter().collect(),
        }
    }

    /// Creates a call site without a receiver.
    pub fn static_call(arguments: impl IntoIterator<Item = ValueId>) -> Self {
        Self::new(None, arguments)
    }
}

impl CallSiteValues for CallSite {
    fn receiver(&self) -> Option<ValueId> {
        self.receiver
    }

    fn arguments(&self) -> &[ValueId] {
        &self.arguments
    }
}
