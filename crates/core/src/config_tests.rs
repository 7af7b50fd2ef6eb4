use super::*;

#[test]
fn default_config_matches_field_defaults() {
    let config = Config::default();
    assert_eq!(config.worker_pool_size, 8);
    assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
}

#[test]
fn load_falls_back_to_defaults_when_file_absent() {
    let config = Config::load(Path::new("/nonexistent/secauto.toml")).unwrap();
    assert_eq!(config.worker_pool_size, default_worker_pool_size());
}

#[test]
fn load_parses_partial_toml_and_fills_remaining_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secauto.toml");
    std::fs::write(&path, "worker_pool_size = 3\nstrict_mode = true\n").unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.worker_pool_size, 3);
    assert!(config.strict_mode);
    assert_eq!(config.job_queue_size, default_job_queue_size());
}

#[test]
fn failed_and_successful_retention_fall_back_to_retention_days() {
    let mut config = Config::default();
    config.retention_days = 5;
    assert_eq!(config.failed_job_retention(), 5);
    assert_eq!(config.successful_job_retention(), 5);
    config.failed_job_retention_days = Some(1);
    assert_eq!(config.failed_job_retention(), 1);
    assert_eq!(config.successful_job_retention(), 5);
}
