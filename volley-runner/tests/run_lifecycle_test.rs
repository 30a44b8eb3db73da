//! End-to-end lifecycle tests for the run supervisor
//!
//! Fixture shell scripts stand in for the real generator binary. Each
//! script emits its whole stdout in a single `printf` so the first read
//! observes one complete block.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use volley_runner::{ResultPersister, RunStatus, RunSupervisor, RunnerError, EXIT_CODE_PENDING};

const CSV_HEADER: &str =
    "response-time,DNS+dialup,DNS,Request-write,Response-delay,Response-read,status-code,offset";
const CSV_ROW: &str = "0.0012,0.0001,0.0000,0.0000,0.0000,0.0010,200,0.0000";

fn good_script_body() -> String {
    format!("#!/bin/sh\nprintf '{CSV_HEADER}\\n{CSV_ROW}\\n'\n")
}

fn expected_csv() -> String {
    format!("{CSV_HEADER}\n{CSV_ROW}\n")
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn csv_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".csv"))
        .collect()
}

async fn wait_until_idle(sup: &RunSupervisor) -> RunStatus {
    for _ in 0..200 {
        let status = sup.status().await;
        if !status.running {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("run did not complete in time");
}

#[tokio::test]
async fn test_successful_run_persists_output() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let script = write_script(bin_dir.path(), "hey-ok.sh", &good_script_body());
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("-c 10 -z 5s", "http://alpha.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;
    assert_eq!(status, RunStatus { running: false, code: 0 });

    let files = csv_files(data_dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("alpha.test "), "unexpected name: {}", files[0]);

    let content = std::fs::read_to_string(data_dir.path().join(&files[0])).unwrap();
    assert_eq!(content, expected_csv());
}

#[tokio::test]
async fn test_summary_output_forces_bad_output_code() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    // Text the generator prints when invoked without a CSV output flag
    let body = "#!/bin/sh\nprintf 'Summary:\\n  Total:\\t0.1764 secs\\n  Requests/sec:\\t56.6832\\n\\nStatus code distribution:\\n  [200] 10 responses\\n'\n";
    let script = write_script(bin_dir.path(), "hey-summary.sh", body);
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;

    assert_eq!(status, RunStatus { running: false, code: 70 });
    assert!(csv_files(data_dir.path()).is_empty());
}

#[tokio::test]
async fn test_nonzero_exit_keeps_code_and_skips_persistence() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let body = format!("#!/bin/sh\nprintf '{CSV_HEADER}\\n{CSV_ROW}\\n'\nexit 3\n");
    let script = write_script(bin_dir.path(), "hey-fail.sh", &body);
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;

    assert_eq!(status, RunStatus { running: false, code: 3 });
    assert!(csv_files(data_dir.path()).is_empty());
}

#[tokio::test]
async fn test_silent_success_persists_nothing() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let script = write_script(bin_dir.path(), "hey-silent.sh", "#!/bin/sh\nexit 0\n");
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;

    assert_eq!(status, RunStatus { running: false, code: 0 });
    assert!(csv_files(data_dir.path()).is_empty());
}

#[tokio::test]
async fn test_concurrent_start_is_rejected() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let body = format!("#!/bin/sh\nsleep 0.4\nprintf '{CSV_HEADER}\\n{CSV_ROW}\\n'\n");
    let script = write_script(bin_dir.path(), "hey-slow.sh", &body);
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();

    assert_eq!(
        sup.start("", "http://beta.test/").await,
        Err(RunnerError::AlreadyRunning)
    );
    assert_eq!(
        sup.status().await,
        RunStatus { running: true, code: EXIT_CODE_PENDING }
    );

    let status = wait_until_idle(&sup).await;
    assert_eq!(status, RunStatus { running: false, code: 0 });
}

#[tokio::test]
async fn test_completed_code_resets_when_next_run_is_accepted() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let body = format!("#!/bin/sh\nsleep 0.4\nprintf '{CSV_HEADER}\\n{CSV_ROW}\\n'\n");
    let script = write_script(bin_dir.path(), "hey-slow.sh", &body);
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();
    assert_eq!(wait_until_idle(&sup).await, RunStatus { running: false, code: 0 });

    // Accepting the next run replaces the recorded code with the sentinel
    sup.start("", "http://beta.test/").await.unwrap();
    assert_eq!(
        sup.status().await,
        RunStatus { running: true, code: EXIT_CODE_PENDING }
    );
    assert_eq!(wait_until_idle(&sup).await, RunStatus { running: false, code: 0 });

    let mut files = csv_files(data_dir.path());
    files.sort();
    assert_eq!(files.len(), 2);
    assert!(files[0].starts_with("alpha.test "));
    assert!(files[1].starts_with("beta.test "));
}

#[tokio::test]
async fn test_missing_binary_completes_with_failure_code() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let missing = bin_dir.path().join("no-such-binary");
    let sup = RunSupervisor::new(&missing, ResultPersister::new(data_dir.path()));

    sup.start("", "http://alpha.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;

    assert!(!status.running);
    assert_ne!(status.code, 0);
    assert_ne!(status.code, EXIT_CODE_PENDING);
    assert!(csv_files(data_dir.path()).is_empty());
}

#[tokio::test]
async fn test_command_line_reaches_generator() {
    let bin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    // Echo the received arguments, padded past the error-text length floor
    let padding = "x".repeat(120);
    let body = format!("#!/bin/sh\nprintf '%s {padding}\\n' \"$*\"\n");
    let script = write_script(bin_dir.path(), "hey-args.sh", &body);
    let sup = RunSupervisor::new(&script, ResultPersister::new(data_dir.path()));

    sup.start("-c 50 -z 10s", "http://args.test/").await.unwrap();
    let status = wait_until_idle(&sup).await;
    assert_eq!(status, RunStatus { running: false, code: 0 });

    let files = csv_files(data_dir.path());
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(data_dir.path().join(&files[0])).unwrap();
    assert!(
        content.starts_with("-c 50 -z 10s -o csv http://args.test/ "),
        "unexpected argv echo: {}",
        content
    );
}
