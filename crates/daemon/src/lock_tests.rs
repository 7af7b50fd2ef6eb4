use super::*;

#[test]
fn acquires_and_writes_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secauto.lock");
    let lock = acquire(&path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
    drop(lock);
}

#[test]
fn second_acquire_fails_while_first_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secauto.lock");
    let _first = acquire(&path).unwrap();
    let second = acquire(&path);
    assert!(matches!(second, Err(LockError::AlreadyLocked(_))));
}

#[test]
fn lock_is_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secauto.lock");
    {
        let _lock = acquire(&path).unwrap();
    }
    let reacquired = acquire(&path);
    assert!(reacquired.is_ok());
}
