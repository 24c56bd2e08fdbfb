//! The memory-state collaborator and a small fact-tracking implementation.
//!
//! A [`MemoryState`] is one path-sensitive snapshot. The contract evaluator
//! forks it once per live branch, imposes that branch's conditions, and then
//! either binds the call's return value or routes the branch to the
//! exceptional exit.
//!
//! [`FactState`] is the reference implementation used by tests and the CLI.
//! It only tracks facts of the form `v == c` and `v != c` where `c` is one of
//! the built-in constants. Anything it cannot decide (relations between two
//! unconstrained values, for instance) is answered as satisfiable, so a
//! consumer sees spurious branches rather than missing ones.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::condition::{Condition, Relation, RelationType};
use crate::id::ValueId;

/// One path-sensitive analysis snapshot.
pub trait MemoryState: Sized {
    /// Returns an independent copy of this state.
    fn fork(&self) -> Self;

    /// Adds `condition` to the state's facts. Returns `false` when the
    /// condition contradicts what is already known; the state must then be
    /// discarded. Undecidable conditions must return `true`.
    fn impose(&mut self, condition: &Condition) -> bool;

    /// Binds the result of the call being evaluated.
    fn bind_return(&mut self, value: ValueId);

    /// Marks this branch as leaving the call exceptionally.
    fn enter_exceptional_exit(&mut self);
}

/// How a branch leaves the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitKind {
    /// No call outcome has been recorded yet.
    #[default]
    Open,
    /// The call returned the given value.
    Returns(ValueId),
    /// The call threw.
    Throws,
}

/// A memory state tracking equalities and disequalities with constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactState {
    /// value -> the constant it is known to equal
    equal: IndexMap<ValueId, ValueId>,
    /// value -> constants it is known to differ from
    distinct: IndexMap<ValueId, SmallVec<[ValueId; 2]>>,
    /// Relations imposed on this state, in order.
    imposed: Vec<Relation>,
    exit: ExitKind,
}

impl FactState {
    /// Creates a state with no facts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the constant `value` is known to equal, if any. Constants are
    /// known to equal themselves.
    pub fn known_constant(&self, value: ValueId) -> Option<ValueId> {
        if value.is_constant() {
            Some(value)
        } else {
            self.equal.get(&value).copied()
        }
    }

    /// Returns true if `value` is known to differ from `constant`.
    pub fn is_known_distinct(&self, value: ValueId, constant: ValueId) -> bool {
        match self.known_constant(value) {
            Some(c) => c != constant,
            None => self
                .distinct
                .get(&value)
                .is_some_and(|cs| cs.contains(&constant)),
        }
    }

    /// Relations successfully imposed on this state, in order.
    pub fn imposed(&self) -> &[Relation] {
        &self.imposed
    }

    /// How this branch leaves the call.
    pub fn exit(&self) -> ExitKind {
        self.exit
    }

    /// The bound return value, if the branch returns normally.
    pub fn return_value(&self) -> Option<ValueId> {
        match self.exit {
            ExitKind::Returns(v) => Some(v),
            _ => None,
        }
    }

    /// Human-readable list of known facts, equalities first.
    pub fn describe(&self) -> Vec<String> {
        let mut facts: Vec<String> = self
            .equal
            .iter()
            .map(|(v, c)| format!("{} == {}", v, c))
            .collect();
        for (v, cs) in &self.distinct {
            for c in cs {
                facts.push(format!("{} != {}", v, c));
            }
        }
        facts
    }

    /// Resolves a value to its known constant when there is one.
    fn resolve(&self, value: ValueId) -> ValueId {
        self.known_constant(value).unwrap_or(value)
    }

    fn impose_relation(&mut self, relation: Relation) -> bool {
        let left = self.resolve(relation.left);
        let right = self.resolve(relation.right);

        if left == right {
            return relation.relation.holds(true);
        }
        if left.is_constant() && right.is_constant() {
            return relation.relation.holds(false);
        }

        let (value, constant) = match (left.is_constant(), right.is_constant()) {
            (false, true) => (left, right),
            (true, false) => (right, left),
            // Two unconstrained values: not tracked, so not refutable.
            _ => {
                self.imposed.push(relation);
                return true;
            }
        };

        match relation.relation {
            RelationType::Equivalent => {
                if self.is_known_distinct(value, constant) {
                    return false;
                }
                self.distinct.shift_remove(&value);
                self.equal.insert(value, constant);
            }
            RelationType::NotEquivalent => {
                let known = self.distinct.entry(value).or_default();
                if !known.contains(&constant) {
                    known.push(constant);
                }
            }
        }
        self.imposed.push(relation);
        true
    }
}

impl MemoryState for FactState {
    fn fork(&self) -> Self {
        self.clone()
    }

    fn impose(&mut self, condition: &Condition) -> bool {
        match condition {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Relation(relation) => self.impose_relation(*relation),
        }
    }

    fn bind_return(&mut self, value: ValueId) {
        self.exit = ExitKind::Returns(value);
    }

    fn enter_exceptional_exit(&mut self) {
        self.exit = ExitKind::Throws;
    }
}
