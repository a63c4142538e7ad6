//! Unit Tests for the Audit Log

use chrono::NaiveDateTime;
use scriptdeck::AuditLog;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_session_file_name() {
    let temp = TempDir::new().unwrap();
    let log = AuditLog::open(temp.path().join("logs"));

    assert_eq!(log.log_folder(), temp.path().join("logs"));
    let name = log.current_log_file().file_name().unwrap().to_string_lossy().into_owned();
    let stamp = name
        .strip_prefix("log_")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .unwrap();
    assert!(NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").is_ok());
}

#[test]
fn test_lines_are_appended_in_order() {
    let temp = TempDir::new().unwrap();
    let log = AuditLog::open(temp.path());
    log.log("Starting: /s/a.sh");
    log.log("Completed: /s/a.sh - ExitCode 0");

    let content = fs::read_to_string(log.current_log_file()).unwrap();
    let messages: Vec<&str> = content
        .lines()
        .map(|line| line.split_once(" - ").unwrap().1)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Logger initialized.",
            "Starting: /s/a.sh",
            "Completed: /s/a.sh - ExitCode 0"
        ]
    );
    for line in content.lines() {
        assert!(NaiveDateTime::parse_from_str(&line[..19], "%Y-%m-%d %H:%M:%S").is_ok());
    }
}

#[test]
fn test_existing_content_is_kept() {
    let temp = TempDir::new().unwrap();
    let log = AuditLog::open(temp.path());
    let before = fs::read_to_string(log.current_log_file()).unwrap();
    log.log("more");
    let after = fs::read_to_string(log.current_log_file()).unwrap();
    assert!(after.starts_with(&before));
}

#[test]
fn test_removed_folder_does_not_panic() {
    let temp = TempDir::new().unwrap();
    let folder = temp.path().join("logs");
    let log = AuditLog::open(&folder);
    fs::remove_dir_all(&folder).unwrap();

    log.log("lost line");
    assert!(!log.current_log_file().exists());
}

#[tokio::test]
async fn test_concurrent_tasks_write_whole_lines() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(AuditLog::open(temp.path()));

    let tasks: Vec<_> = (0..4)
        .map(|t| {
            let log = Arc::clone(&log);
            tokio::task::spawn_blocking(move || {
                for i in 0..100 {
                    log.log(format!("task{}-{}-end", t, i));
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let content = fs::read_to_string(log.current_log_file()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 401);
    assert!(lines[1..].iter().all(|l| l.ends_with("-end") && l.contains(" - task")));
}
