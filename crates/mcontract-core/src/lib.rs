pub mod call_site;
pub mod condition;
pub mod error;
pub mod factory;
pub mod id;
pub mod memory;
pub mod value;

// Re-export commonly used types
pub use call_site::{CallSite, CallSiteValues};
pub use condition::{Condition, Relation, RelationType};
pub use error::CoreError;
pub use factory::{InternedValueFactory, ValueFactory};
pub use id::ValueId;
pub use memory::{ExitKind, FactState, MemoryState};
pub use value::{ConstValue, SymbolicValue};
