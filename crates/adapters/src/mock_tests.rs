use serde_json::json;

use super::*;

#[tokio::test]
async fn unconfigured_name_returns_empty_context() {
    let executor = MockExecutor::new();
    let result = Executor::run(&executor, "whatever", Map::new()).await.expect("run succeeds");
    assert!(result.is_empty());
}

#[tokio::test]
async fn configured_response_is_returned() {
    let body = json!({"blocked": true}).as_object().unwrap().clone();
    let executor = MockExecutor::new().with_response("block_ip", body.clone());

    let result = Executor::run(&executor, "block_ip", Map::new()).await.expect("run succeeds");
    assert_eq!(result, body);
}

#[tokio::test]
async fn configured_failure_surfaces_as_executor_error() {
    let executor = MockExecutor::new().with_failure("lookup_ip", "upstream timed out");

    let err = Executor::run(&executor, "lookup_ip", Map::new()).await.unwrap_err();
    assert_eq!(err.message, "upstream timed out");
}

#[tokio::test]
async fn records_calls_in_order() {
    let executor = MockExecutor::new();
    let p1 = json!({"n": 1}).as_object().unwrap().clone();
    let p2 = json!({"n": 2}).as_object().unwrap().clone();

    Executor::run(&executor, "first", p1.clone()).await.expect("run succeeds");
    Executor::run(&executor, "second", p2.clone()).await.expect("run succeeds");

    let calls = executor.calls().await;
    assert_eq!(calls, vec![("first".to_string(), p1), ("second".to_string(), p2)]);
}

#[tokio::test]
async fn implements_both_executor_traits() {
    let body = json!({"scanned": true}).as_object().unwrap().clone();
    let executor = MockExecutor::new().with_response("scan", body.clone());

    let result = PluginExecutor::run(&executor, "scan", Map::new()).await.expect("run succeeds");
    assert_eq!(result, body);
}
