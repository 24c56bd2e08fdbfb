//! Parser for contract specification text.
//!
//! Grammar:
//!
//! ```text
//! spec    := clause (';' clause)*
//! clause  := argList '->' return
//! argList := token (',' token)*
//! ```
//!
//! Tokens are the presentation tokens of [`ValueConstraint`]; whitespace
//! around tokens and separators is ignored. A callable without parameters
//! writes its clauses with an empty argument list (`"-> true"`).
//!
//! Parsing is all-or-nothing: the first malformed clause aborts with a
//! [`ParseError`] and no partial contract list is returned.

use serde::{Deserialize, Serialize};

use super::constraint::ValueConstraint;
use super::Contract;

/// A malformed contract specification. Clause indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ParseError {
    #[error("clause {clause}: expected {expected} argument(s), found {actual}")]
    ArityMismatch {
        clause: usize,
        expected: usize,
        actual: usize,
    },

    /// `position` is the argument position, or `None` for the return token.
    #[error("clause {clause}: unknown token '{token}' {}", token_location(.position))]
    UnknownToken {
        clause: usize,
        position: Option<usize>,
        token: String,
    },

    #[error("clause {clause}: 'fail' is only valid as a return value (argument {position})")]
    ThrowsAsArgument { clause: usize, position: usize },

    #[error("clause {clause}: missing '->'")]
    MissingArrow { clause: usize },

    #[error("clause {clause}: empty clause")]
    EmptyClause { clause: usize },
}

impl ParseError {
    /// Index of the offending clause.
    pub fn clause(&self) -> usize {
        match self {
            ParseError::ArityMismatch { clause, .. }
            | ParseError::UnknownToken { clause, .. }
            | ParseError::ThrowsAsArgument { clause, .. }
            | ParseError::MissingArrow { clause }
            | ParseError::EmptyClause { clause } => *clause,
        }
    }
}

fn token_location(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!("at argument {}", p),
        None => "in return position".to_string(),
    }
}

/// Parses `spec` into contracts for a callable with `arity` parameters.
///
/// An empty (or whitespace-only) specification yields an empty list, meaning
/// "no contract information".
pub fn parse_contracts(spec: &str, arity: usize) -> Result<Vec<Contract>, ParseError> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }

    let contracts = spec
        .split(';')
        .enumerate()
        .map(|(clause, text)| parse_clause(clause, text, arity))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = contracts.len(), arity, "parsed contracts");
    Ok(contracts)
}

fn parse_clause(clause: usize, text: &str, arity: usize) -> Result<Contract, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyClause { clause });
    }

    let (args_text, return_text) = text
        .split_once("->")
        .ok_or(ParseError::MissingArrow { clause })?;

    let args_text = args_text.trim();
    let arg_tokens: Vec<&str> = if args_text.is_empty() {
        Vec::new()
    } else {
        args_text.split(',').map(str::trim).collect()
    };

    if arg_tokens.len() != arity {
        return Err(ParseError::ArityMismatch {
            clause,
            expected: arity,
            actual: arg_tokens.len(),
        });
    }

    let mut arguments = Vec::with_capacity(arity);
    for (position, token) in arg_tokens.into_iter().enumerate() {
        let constraint =
            ValueConstraint::from_token(token).ok_or_else(|| ParseError::UnknownToken {
                clause,
                position: Some(position),
                token: token.to_string(),
            })?;
        if !constraint.is_argument_constraint() {
            return Err(ParseError::ThrowsAsArgument { clause, position });
        }
        arguments.push(constraint);
    }

    let return_token = return_text.trim();
    let return_value =
        ValueConstraint::from_token(return_token).ok_or_else(|| ParseError::UnknownToken {
            clause,
            position: None,
            token: return_token.to_string(),
        })?;

    Contract::new(arguments, return_value).map_err(|e| match e {
        super::ContractError::ThrowsAsArgument { position } => {
            ParseError::ThrowsAsArgument { clause, position }
        }
    })
}
