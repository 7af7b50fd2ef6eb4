// SPDX-License-Identifier: MIT

//! `EvaluatePlaybook(rules, ctx) -> (results, error)`.
//!
//! Walks the canonical [`Rule`] tree in declaration order, mutating the
//! context in place and collecting one result per top-level rule. A rule
//! error aborts the remaining rules in its enclosing branch; the partial
//! result list and the error are both returned.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use secauto_core::{Config, Rule};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::condition::evaluate_conditions;
use crate::error::{InvalidPlaybook, RuleError};
use crate::executor::{merge_executor_result, Executor, PluginExecutor};
use crate::template::substitute_params;

/// Resolves a `Play(name)` rule to the named playbook's canonical rule tree.
#[async_trait::async_trait]
pub trait PlaybookSource: Send + Sync {
    async fn load(&self, name: &str) -> Option<Vec<Rule>>;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The rules-engine interpreter.
pub struct Engine {
    executor: Arc<dyn Executor>,
    plugin_executor: Arc<dyn PluginExecutor>,
    playbooks: Arc<dyn PlaybookSource>,
    max_nesting_depth: u32,
    max_execution_time: Duration,
    max_variables_per_context: usize,
    strict_mode: bool,
}

impl Engine {
    pub fn new(
        executor: Arc<dyn Executor>,
        plugin_executor: Arc<dyn PluginExecutor>,
        playbooks: Arc<dyn PlaybookSource>,
        config: &Config,
    ) -> Self {
        Self {
            executor,
            plugin_executor,
            playbooks,
            max_nesting_depth: config.max_nesting_depth,
            max_execution_time: Duration::from_secs(config.max_execution_time_secs),
            max_variables_per_context: config.max_variables_per_context,
            strict_mode: config.strict_mode,
        }
    }

    /// Evaluate a playbook against `ctx`, mutating it as a side effect.
    /// Returns the per-rule results produced before any error, plus the
    /// error itself if one was hit.
    pub async fn evaluate(
        &self,
        rules: &[Rule],
        ctx: &mut Value,
        cancel: &CancellationToken,
    ) -> (Vec<Value>, Option<RuleError>) {
        let variable_count = secauto_core::variable_count(ctx);
        if variable_count > self.max_variables_per_context {
            return (
                Vec::new(),
                Some(RuleError::InvalidPlaybook(InvalidPlaybook::TooManyVariables {
                    actual: variable_count,
                    limit: self.max_variables_per_context,
                })),
            );
        }
        self.evaluate_at_depth(rules, ctx, 0, cancel).await
    }

    async fn evaluate_at_depth(
        &self,
        rules: &[Rule],
        ctx: &mut Value,
        depth: u32,
        cancel: &CancellationToken,
    ) -> (Vec<Value>, Option<RuleError>) {
        let mut results = Vec::with_capacity(rules.len());
        for rule in rules {
            if cancel.is_cancelled() {
                break;
            }
            match self.evaluate_rule(rule, ctx, depth, cancel).await {
                Ok(value) => results.push(value),
                Err(err) => return (results, Some(err)),
            }
        }
        (results, None)
    }

    fn evaluate_rule<'a>(
        &'a self,
        rule: &'a Rule,
        ctx: &'a mut Value,
        depth: u32,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Value, RuleError>> {
        Box::pin(async move {
            if depth > self.max_nesting_depth {
                return Err(RuleError::InvalidPlaybook(InvalidPlaybook::NestingTooDeep {
                    actual: depth,
                    limit: self.max_nesting_depth,
                }));
            }

            match rule {
                Rule::Run { name, params } => self.invoke(name, params, ctx, false).await,
                Rule::Plugin { name, params } => self.invoke(name, params, ctx, true).await,
                Rule::Var { path } => Ok(secauto_core::resolve_path_owned(ctx, path).unwrap_or(Value::Null)),
                Rule::Value(value) => Ok(value.clone()),
                Rule::Play { name } => {
                    let sub_rules = self
                        .playbooks
                        .load(name)
                        .await
                        .ok_or_else(|| RuleError::PlaybookNotFound(name.clone()))?;
                    let (results, err) = self.evaluate_at_depth(&sub_rules, ctx, depth + 1, cancel).await;
                    match err {
                        Some(err) => Err(err),
                        None => Ok(Value::Array(results)),
                    }
                }
                Rule::If { conditions, logic, when_true, when_false } => {
                    let matched = evaluate_conditions(conditions, *logic, ctx, self.strict_mode)?;
                    if matched {
                        self.evaluate_rule(when_true, ctx, depth + 1, cancel).await
                    } else if let Some(branch) = when_false {
                        self.evaluate_rule(branch, ctx, depth + 1, cancel).await
                    } else {
                        Ok(Value::Null)
                    }
                }
            }
        })
    }

    async fn invoke(
        &self,
        name: &str,
        params: &serde_json::Map<String, Value>,
        ctx: &mut Value,
        plugin: bool,
    ) -> Result<Value, RuleError> {
        let substituted = substitute_params(&Value::Object(params.clone()), ctx);

        // `Executor.Run(name, merged_params_and_ctx)`: the automation sees the
        // whole context, with the rule's own (template-substituted) params
        // taking precedence on key collisions.
        let mut payload = ctx.clone();
        secauto_core::deep_merge(&mut payload, &substituted);
        let Value::Object(payload) = payload else {
            unreachable!("ctx and substituted params are both objects")
        };

        let result = if plugin {
            tokio::time::timeout(self.max_execution_time, self.plugin_executor.run(name, payload)).await
        } else {
            tokio::time::timeout(self.max_execution_time, self.executor.run(name, payload)).await
        };

        let result = result.map_err(|_| RuleError::Timeout(self.max_execution_time))??;
        merge_executor_result(ctx, name, &result);
        Ok(Value::Object(result))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
