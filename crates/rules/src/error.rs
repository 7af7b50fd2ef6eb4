// SPDX-License-Identifier: MIT

//! Error kinds raised while parsing or evaluating a playbook.

use crate::executor::ExecutorError;

/// Structural or bound violation, surfaced at submission time.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidPlaybook {
    #[error("rule nesting depth {actual} exceeds max_nesting_depth {limit}")]
    NestingTooDeep { actual: u32, limit: u32 },
    #[error("condition count {actual} exceeds max_conditions_per_rule {limit}")]
    TooManyConditions { actual: u32, limit: u32 },
    #[error("context variable count {actual} exceeds max_variables_per_context {limit}")]
    TooManyVariables { actual: usize, limit: usize },
    #[error("unrecognized rule shape: {0}")]
    UnrecognizedRule(String),
    #[error("unknown comparison operator {0:?}")]
    UnknownOperator(String),
    #[error("playbook must contain at least one rule")]
    EmptyPlaybook,
}

/// Runtime failure of a single rule: aborts the remaining rules in its
/// enclosing branch. The job ends `failed` with this error's message.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("rule timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("condition evaluation error: {0}")]
    Condition(String),
    #[error("playbook {0:?} not found")]
    PlaybookNotFound(String),
    #[error(transparent)]
    InvalidPlaybook(#[from] InvalidPlaybook),
}
