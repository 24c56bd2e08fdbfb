//! Database of callable contract summaries.
//!
//! The analysis looks up a callee's summary here at every call site instead of
//! re-analyzing the callee. Summaries are parsed once when registered and then
//! shared read-only until the callable is invalidated (its source changed) and
//! registered again.
//!
//! A specification that fails to parse does not take the callable out of the
//! database: it is stored as contract-free, so analysis proceeds as if the
//! callable had no contract at all.

use indexmap::IndexMap;

use crate::contracts::parse::{parse_contracts, ParseError};
use crate::contracts::Contract;

/// The parsed contracts of one callable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractSummary {
    /// Declared parameter count the contracts were parsed against.
    pub arity: usize,
    /// Contracts in declaration order.
    pub contracts: Vec<Contract>,
}

impl ContractSummary {
    /// True when the callable has no contract information.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Index of the first trivial contract, which absorbs all later ones.
    pub fn first_trivial(&self) -> Option<usize> {
        self.contracts.iter().position(Contract::is_trivial)
    }

    /// The contracts that can actually apply: everything up to and including
    /// the first trivial contract.
    pub fn reachable(&self) -> &[Contract] {
        match self.first_trivial() {
            Some(i) => &self.contracts[..=i],
            None => &self.contracts,
        }
    }
}

/// Maps callable names to their contract summaries, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ContractDatabase {
    summaries: IndexMap<String, ContractSummary>,
}

impl ContractDatabase {
    /// Create an empty contract database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `spec` and stores the result under `name`, replacing any
    /// previous summary.
    ///
    /// On a parse error the callable is stored with an empty summary and the
    /// error is returned for reporting.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        spec: &str,
        arity: usize,
    ) -> Result<&ContractSummary, ParseError> {
        let name = name.into();
        match parse_contracts(spec, arity) {
            Ok(contracts) => {
                let entry = self.summaries.entry(name).or_default();
                *entry = ContractSummary { arity, contracts };
                Ok(&*entry)
            }
            Err(err) => {
                tracing::warn!(callable = %name, error = %err, "ignoring malformed contract");
                self.summaries.insert(
                    name,
                    ContractSummary {
                        arity,
                        contracts: Vec::new(),
                    },
                );
                Err(err)
            }
        }
    }

    /// Look up a callable's summary by name.
    pub fn get(&self, name: &str) -> Option<&ContractSummary> {
        self.summaries.get(name)
    }

    /// Check if a callable has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.summaries.contains_key(name)
    }

    /// Drops a callable's summary; it must be registered again before use.
    pub fn invalidate(&mut self, name: &str) -> Option<ContractSummary> {
        self.summaries.shift_remove(name)
    }

    /// Return the number of registered callables.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Iterates summaries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContractSummary)> {
        self.summaries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
