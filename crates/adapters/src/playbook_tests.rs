use secauto_core::Rule;

use super::*;

fn bounds() -> ParseBounds {
    ParseBounds { max_nesting_depth: 10, max_conditions_per_rule: 20 }
}

#[tokio::test]
async fn loads_and_parses_a_playbook_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("enrich.json"), r#"[{"run":"enrich"}]"#).expect("write");

    let source = FilesystemPlaybookSource::new(dir.path(), bounds());
    let rules = source.load("enrich").await.expect("playbook loads");
    assert_eq!(rules, vec![Rule::Run { name: "enrich".to_string(), params: Default::default() }]);
}

#[tokio::test]
async fn missing_file_returns_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FilesystemPlaybookSource::new(dir.path(), bounds());
    assert!(source.load("absent").await.is_none());
}

#[tokio::test]
async fn invalid_json_returns_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("broken.json"), "not json").expect("write");

    let source = FilesystemPlaybookSource::new(dir.path(), bounds());
    assert!(source.load("broken").await.is_none());
}

#[tokio::test]
async fn rejects_path_traversal_in_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FilesystemPlaybookSource::new(dir.path(), bounds());
    assert!(source.load("../evil").await.is_none());
    assert!(source.load("nested/name").await.is_none());
}

#[tokio::test]
async fn no_playbooks_source_always_returns_none() {
    let source = NoPlaybooks;
    assert!(source.load("anything").await.is_none());
}
