// SPDX-License-Identifier: MIT

//! Condition evaluation for `If` rules.
//!
//! `{"var": "path"}` operands are the typed half of the template-vs-var
//! distinction: resolved directly against the context, never stringified.
//! A literal operand (including a template string the caller already
//! substituted) is used as-is.

use secauto_core::{resolve_path_owned, Condition, Logic, Operand, Operator};
use serde_json::Value;

use crate::error::RuleError;

fn resolve_operand(operand: &Operand, ctx: &Value) -> Value {
    match operand {
        Operand::Var { var } => resolve_path_owned(ctx, var).unwrap_or(Value::Null),
        Operand::Literal(value) => value.clone(),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(_), Value::Number(_)) => as_f64(lhs) == as_f64(rhs),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        // Mismatched types compare unequal for equality operators.
        _ => lhs == rhs,
    }
}

/// Natural order between two same-typed operands; `None` when the types
/// don't support ordering (or differ).
fn natural_order(lhs: &Value, rhs: &Value) -> Option<std::cmp::Ordering> {
    match (lhs, rhs) {
        (Value::Number(_), Value::Number(_)) => as_f64(lhs)?.partial_cmp(&as_f64(rhs)?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Evaluate a single `[operator, operand_a, operand_b]` condition.
pub fn evaluate_condition(condition: &Condition, ctx: &Value, strict_mode: bool) -> Result<bool, RuleError> {
    let lhs = resolve_operand(&condition.lhs, ctx);
    let rhs = resolve_operand(&condition.rhs, ctx);

    if !condition.operator.is_ordering() {
        let equal = values_equal(&lhs, &rhs);
        return Ok(if condition.operator == Operator::Eq { equal } else { !equal });
    }

    match natural_order(&lhs, &rhs) {
        Some(ordering) => Ok(match condition.operator {
            Operator::Lt => ordering.is_lt(),
            Operator::Gt => ordering.is_gt(),
            Operator::Le => ordering.is_le(),
            Operator::Ge => ordering.is_ge(),
            Operator::Eq | Operator::Ne => unreachable!("handled above"),
        }),
        None if strict_mode => Err(RuleError::Condition(format!(
            "cannot order {lhs:?} {op:?} {rhs:?} in strict mode",
            op = condition.operator,
        ))),
        None => Ok(false),
    }
}

/// Combine a set of conditions with `and`/`or` logic.
pub fn evaluate_conditions(conditions: &[Condition], logic: Logic, ctx: &Value, strict_mode: bool) -> Result<bool, RuleError> {
    match logic {
        Logic::And => {
            let mut result = true;
            for condition in conditions {
                result &= evaluate_condition(condition, ctx, strict_mode)?;
            }
            Ok(result)
        }
        Logic::Or => {
            let mut result = false;
            for condition in conditions {
                result |= evaluate_condition(condition, ctx, strict_mode)?;
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
