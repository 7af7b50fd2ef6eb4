use super::*;
use secauto_core::{Condition, Logic, Operand, Operator};
use serde_json::json;

fn cond(operator: Operator, lhs: Operand, rhs: Operand) -> Condition {
    Condition { operator, lhs, rhs }
}

fn var(path: &str) -> Operand {
    Operand::Var { var: path.to_string() }
}

fn lit(value: serde_json::Value) -> Operand {
    Operand::Literal(value)
}

#[test]
fn greater_than_on_resolved_var_scenario_from_readme() {
    let ctx = json!({"v": 3});
    let c = cond(Operator::Gt, var("v"), lit(json!(2)));
    assert!(evaluate_condition(&c, &ctx, false).unwrap());
}

#[test]
fn equality_on_template_substituted_literal_fails_against_numeric_zero() {
    // Mirrors the template-vs-var divergence scenario: comparing the
    // substituted string "0" against the numeric literal 0 is unequal.
    let ctx = json!({});
    let c = cond(Operator::Eq, lit(json!("0")), lit(json!(0)));
    assert!(!evaluate_condition(&c, &ctx, false).unwrap());
}

#[test]
fn equality_on_var_resolved_numeric_matches() {
    let ctx = json!({"n": 0});
    let c = cond(Operator::Eq, var("n"), lit(json!(0)));
    assert!(evaluate_condition(&c, &ctx, false).unwrap());
}

#[test]
fn mismatched_types_are_unequal_not_an_error() {
    let ctx = json!({});
    let c = cond(Operator::Eq, lit(json!("1")), lit(json!(1)));
    assert!(!evaluate_condition(&c, &ctx, true).unwrap());
}

#[test]
fn ordering_on_mismatched_types_errors_in_strict_mode() {
    let ctx = json!({});
    let c = cond(Operator::Lt, lit(json!("1")), lit(json!(1)));
    assert!(evaluate_condition(&c, &ctx, true).is_err());
}

#[test]
fn ordering_on_mismatched_types_is_false_in_permissive_mode() {
    let ctx = json!({});
    let c = cond(Operator::Lt, lit(json!("1")), lit(json!(1)));
    assert!(!evaluate_condition(&c, &ctx, false).unwrap());
}

#[test]
fn missing_var_resolves_to_null() {
    let ctx = json!({});
    let c = cond(Operator::Eq, var("missing"), lit(serde_json::Value::Null));
    assert!(evaluate_condition(&c, &ctx, false).unwrap());
}

#[test]
fn evaluate_conditions_and_requires_all_true() {
    let ctx = json!({"v": 3});
    let conditions = vec![
        cond(Operator::Gt, var("v"), lit(json!(0))),
        cond(Operator::Lt, var("v"), lit(json!(10))),
    ];
    assert!(evaluate_conditions(&conditions, Logic::And, &ctx, false).unwrap());
}

#[test]
fn evaluate_conditions_or_requires_one_true() {
    let ctx = json!({"v": 3});
    let conditions = vec![
        cond(Operator::Gt, var("v"), lit(json!(100))),
        cond(Operator::Lt, var("v"), lit(json!(10))),
    ];
    assert!(evaluate_conditions(&conditions, Logic::Or, &ctx, false).unwrap());
}

#[test]
fn evaluate_conditions_empty_and_is_vacuously_true() {
    let ctx = json!({});
    assert!(evaluate_conditions(&[], Logic::And, &ctx, false).unwrap());
}

#[test]
fn evaluate_conditions_empty_or_is_vacuously_false() {
    let ctx = json!({});
    assert!(!evaluate_conditions(&[], Logic::Or, &ctx, false).unwrap());
}

#[yare::parameterized(
    eq = { Operator::Eq, 3, 3, true },
    eq_mismatch = { Operator::Eq, 3, 4, false },
    ne = { Operator::Ne, 3, 4, true },
    ne_mismatch = { Operator::Ne, 3, 3, false },
    lt = { Operator::Lt, 2, 3, true },
    lt_false = { Operator::Lt, 3, 2, false },
    gt = { Operator::Gt, 3, 2, true },
    gt_false = { Operator::Gt, 2, 3, false },
    le_equal = { Operator::Le, 3, 3, true },
    le_less = { Operator::Le, 2, 3, true },
    le_false = { Operator::Le, 4, 3, false },
    ge_equal = { Operator::Ge, 3, 3, true },
    ge_greater = { Operator::Ge, 4, 3, true },
    ge_false = { Operator::Ge, 2, 3, false },
)]
fn operator_truth_table_over_numeric_literals(operator: Operator, a: i64, b: i64, expected: bool) {
    let ctx = json!({});
    let c = cond(operator, lit(json!(a)), lit(json!(b)));
    assert_eq!(evaluate_condition(&c, &ctx, false).unwrap(), expected);
}

#[yare::parameterized(
    double_equals = { "==" },
    eq_word = { "eq" },
    triple_equals = { "===" },
)]
fn all_equality_aliases_parse_to_eq(alias: &str) {
    assert_eq!(Operator::parse(alias), Some(Operator::Eq));
}
