// SPDX-License-Identifier: MIT

//! Parses the playbook-author-facing shorthand JSON into the canonical
//! [`Rule`] tree, enforcing `max_nesting_depth` and `max_conditions_per_rule`
//! as it goes.
//!
//! Shorthand shapes: `{"run": "name", "params": {...}}`, `{"plugin": "name",
//! "params": {...}}`, `{"play": "name"}`, `{"var": "path"}`,
//! `{"if": {"conditions": [[op, a, b], ...], "logic": "and"|"or", "true":
//! rule, "false": rule?}}`. Anything else is a raw [`Rule::Value`].

use secauto_core::{Condition, Logic, Operand, Operator, Rule};
use serde_json::{Map, Value};

use crate::error::InvalidPlaybook;

/// Structural bounds enforced while parsing, mirroring the matching
/// `Config` fields.
#[derive(Debug, Clone, Copy)]
pub struct ParseBounds {
    pub max_nesting_depth: u32,
    pub max_conditions_per_rule: u32,
}

/// Parse a whole playbook (a JSON array of rule shorthand objects).
pub fn parse_playbook(playbook: &Value, bounds: ParseBounds) -> Result<Vec<Rule>, InvalidPlaybook> {
    let items = playbook
        .as_array()
        .ok_or_else(|| InvalidPlaybook::UnrecognizedRule("playbook must be a JSON array".to_string()))?;
    if items.is_empty() {
        return Err(InvalidPlaybook::EmptyPlaybook);
    }
    items.iter().map(|rule| parse_rule(rule, 0, bounds)).collect()
}

/// Parse a single rule shorthand object at the given nesting `depth`.
pub fn parse_rule(value: &Value, depth: u32, bounds: ParseBounds) -> Result<Rule, InvalidPlaybook> {
    if depth > bounds.max_nesting_depth {
        return Err(InvalidPlaybook::NestingTooDeep { actual: depth, limit: bounds.max_nesting_depth });
    }

    let Some(map) = value.as_object() else {
        return Ok(Rule::Value(value.clone()));
    };

    if let Some(name) = map.get("run").and_then(Value::as_str) {
        return Ok(Rule::Run { name: name.to_string(), params: parse_params(map) });
    }
    if let Some(name) = map.get("plugin").and_then(Value::as_str) {
        return Ok(Rule::Plugin { name: name.to_string(), params: parse_params(map) });
    }
    if let Some(name) = map.get("play").and_then(Value::as_str) {
        return Ok(Rule::Play { name: name.to_string() });
    }
    if let Some(path) = map.get("var").and_then(Value::as_str) {
        return Ok(Rule::Var { path: path.to_string() });
    }
    if let Some(body) = map.get("if") {
        return parse_if(body, depth, bounds);
    }

    Ok(Rule::Value(value.clone()))
}

fn parse_params(map: &Map<String, Value>) -> Map<String, Value> {
    match map.get("params") {
        Some(Value::Object(params)) => params.clone(),
        _ => Map::new(),
    }
}

fn parse_if(body: &Value, depth: u32, bounds: ParseBounds) -> Result<Rule, InvalidPlaybook> {
    let obj = body
        .as_object()
        .ok_or_else(|| InvalidPlaybook::UnrecognizedRule("if body must be an object".to_string()))?;

    let raw_conditions = obj
        .get("conditions")
        .and_then(Value::as_array)
        .ok_or_else(|| InvalidPlaybook::UnrecognizedRule("if.conditions must be an array".to_string()))?;

    let actual = raw_conditions.len() as u32;
    if actual > bounds.max_conditions_per_rule {
        return Err(InvalidPlaybook::TooManyConditions { actual, limit: bounds.max_conditions_per_rule });
    }

    let conditions = raw_conditions.iter().map(parse_condition).collect::<Result<Vec<_>, _>>()?;

    let logic = match obj.get("logic").and_then(Value::as_str) {
        Some("or") => Logic::Or,
        _ => Logic::And,
    };

    let true_body = obj
        .get("true")
        .ok_or_else(|| InvalidPlaybook::UnrecognizedRule("if.true is required".to_string()))?;
    let when_true = Box::new(parse_rule(true_body, depth + 1, bounds)?);

    let when_false = obj.get("false").map(|body| parse_rule(body, depth + 1, bounds)).transpose()?.map(Box::new);

    Ok(Rule::If { conditions, logic, when_true, when_false })
}

fn parse_condition(value: &Value) -> Result<Condition, InvalidPlaybook> {
    let items = value
        .as_array()
        .filter(|items| items.len() == 3)
        .ok_or_else(|| InvalidPlaybook::UnrecognizedRule(format!("condition must be [operator, a, b]: {value}")))?;

    let operator_str = items[0]
        .as_str()
        .ok_or_else(|| InvalidPlaybook::UnknownOperator(items[0].to_string()))?;
    let operator = Operator::parse(operator_str).ok_or_else(|| InvalidPlaybook::UnknownOperator(operator_str.to_string()))?;
    let lhs = parse_operand(&items[1])?;
    let rhs = parse_operand(&items[2])?;
    Ok(Condition { operator, lhs, rhs })
}

fn parse_operand(value: &Value) -> Result<Operand, InvalidPlaybook> {
    serde_json::from_value(value.clone())
        .map_err(|err| InvalidPlaybook::UnrecognizedRule(format!("invalid condition operand {value}: {err}")))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
