//! The run supervisor state machine
//!
//! Owns the single in-flight run. `start` performs the conflict check and
//! URL validation synchronously, reserves the run slot, and hands the rest
//! to a monitor task; everything after acceptance (launch failures, output
//! classification, persistence, the terminal exit code) is observable only
//! through `status` polls. One monitor task per run consumes the ordered
//! event stream from the launcher, so output handling and exit handling
//! never interleave.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};
use url::Url;

use crate::classifier::OutputClassifier;
use crate::error::{RunnerError, RunnerResult};
use crate::launcher::{self, RunEvent};
use crate::persister::ResultPersister;

/// Exit code reported before any run has completed, and while one is active
pub const EXIT_CODE_PENDING: i32 = -1;

/// Exit code forced when output classification failed, distinguishing
/// "ran but produced garbage" from both success and process failure
pub const EXIT_CODE_BAD_OUTPUT: i32 = 70;

/// Fallback when a launch failure carries no OS error number
const EXIT_CODE_LAUNCH_FAILED: i32 = 127;

/// Lifecycle of the supervised run slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Idle,
    Running,
    Completed(i32),
}

/// Snapshot answered to status polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub running: bool,
    pub code: i32,
}

/// Supervises the single load-generator run
pub struct RunSupervisor {
    binary: PathBuf,
    persister: ResultPersister,
    phase: Arc<Mutex<RunPhase>>,
}

impl RunSupervisor {
    pub fn new(binary: impl Into<PathBuf>, persister: ResultPersister) -> Self {
        Self {
            binary: binary.into(),
            persister,
            phase: Arc::new(Mutex::new(RunPhase::Idle)),
        }
    }

    /// Accept a run if none is active.
    ///
    /// Rejections leave all state untouched and issue no process. On
    /// acceptance the reported exit code resets to the pending sentinel and
    /// the spawn proceeds on the monitor task; this call never waits for
    /// the child.
    pub async fn start(&self, params: &str, url: &str) -> RunnerResult<()> {
        let mut phase = self.phase.lock().await;
        if *phase == RunPhase::Running {
            return Err(RunnerError::AlreadyRunning);
        }

        let target = parse_target(url)?;
        let started_at = Local::now();
        *phase = RunPhase::Running;
        drop(phase);

        let args = launcher::build_args(params, url);
        info!("Running: {} {}", self.binary.display(), args.join(" "));

        let binary = self.binary.clone();
        let persister = self.persister.clone();
        let phase = Arc::clone(&self.phase);
        tokio::spawn(async move {
            drive_run(phase, binary, args, target, started_at, persister).await;
        });

        Ok(())
    }

    /// Current `{running, code}` snapshot; pure read, no side effects
    pub async fn status(&self) -> RunStatus {
        match *self.phase.lock().await {
            RunPhase::Idle => RunStatus {
                running: false,
                code: EXIT_CODE_PENDING,
            },
            RunPhase::Running => RunStatus {
                running: true,
                code: EXIT_CODE_PENDING,
            },
            RunPhase::Completed(code) => RunStatus {
                running: false,
                code,
            },
        }
    }
}

/// Validate the target: must parse as a URL and carry a host
fn parse_target(url: &str) -> RunnerResult<Url> {
    let parsed = Url::parse(url).map_err(|_| RunnerError::InvalidUrl)?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(RunnerError::InvalidUrl);
    }
    Ok(parsed)
}

/// Map an exit status to the reported code
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    // Terminated by a signal; report the shell convention
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    EXIT_CODE_PENDING
}

/// Monitor task for one run: launch, consume events, record the outcome
async fn drive_run(
    phase: Arc<Mutex<RunPhase>>,
    binary: PathBuf,
    args: Vec<String>,
    target: Url,
    started_at: DateTime<Local>,
    persister: ResultPersister,
) {
    let mut rx = match launcher::launch(&binary, &args).await {
        Ok(rx) => rx,
        Err(e) => {
            error!("Failed to launch {}: {}", binary.display(), e);
            let code = e.raw_os_error().unwrap_or(EXIT_CODE_LAUNCH_FAILED);
            complete(&phase, code).await;
            return;
        }
    };

    let mut classifier = OutputClassifier::new();
    let mut output = String::new();
    let mut exit_code = EXIT_CODE_PENDING;

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::Output(chunk) => {
                if classifier.admit(&chunk) {
                    output.push_str(&chunk);
                }
            }
            RunEvent::Stderr(line) => {
                error!("Generator stderr: {}", line);
            }
            RunEvent::Exited(status) => {
                exit_code = exit_code_of(status);
                break;
            }
            RunEvent::Failed(e) => {
                error!("Failed to reap generator: {}", e);
                exit_code = e.raw_os_error().unwrap_or(EXIT_CODE_LAUNCH_FAILED);
                break;
            }
        }
    }

    drain_stderr(&mut rx);

    info!(
        "Generator completed: code={} invalid={}",
        exit_code,
        classifier.invalid()
    );

    if classifier.invalid() {
        complete(&phase, EXIT_CODE_BAD_OUTPUT).await;
        return;
    }

    if exit_code == 0 && !output.is_empty() {
        if let Err(e) = persister.persist(&target, &started_at, output.as_bytes()).await {
            // Operational fault: the buffer is dropped, nothing is retried
            error!("Failed to persist results: {}", e);
        }
    }

    complete(&phase, exit_code).await;
}

/// Log any stderr lines that arrived before the exit event
fn drain_stderr(rx: &mut mpsc::UnboundedReceiver<RunEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let RunEvent::Stderr(line) = event {
            error!("Generator stderr: {}", line);
        }
    }
}

async fn complete(phase: &Mutex<RunPhase>, code: i32) {
    let mut phase = phase.lock().await;
    *phase = RunPhase::Completed(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor() -> RunSupervisor {
        RunSupervisor::new("bin/hey", ResultPersister::new("/tmp/volley-test-results"))
    }

    #[tokio::test]
    async fn test_initial_status_is_idle_with_sentinel() {
        let sup = supervisor();
        let status = sup.status().await;
        assert_eq!(
            status,
            RunStatus {
                running: false,
                code: EXIT_CODE_PENDING
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_without_side_effects() {
        let sup = supervisor();
        let before = sup.status().await;

        assert_eq!(sup.start("", "not-a-url").await, Err(RunnerError::InvalidUrl));
        assert_eq!(sup.status().await, before);
    }

    #[tokio::test]
    async fn test_status_is_idempotent() {
        let sup = supervisor();
        let first = sup.status().await;
        let second = sup.status().await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_target() {
        assert!(parse_target("http://example.com").is_ok());
        assert!(parse_target("https://example.com:8080/path?q=1").is_ok());
        assert!(parse_target("not-a-url").is_err());
        assert!(parse_target("/relative/path").is_err());
        // Parses, but carries no host
        assert!(parse_target("file:///tmp/data.csv").is_err());
        assert!(parse_target("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_of_normal_exit() {
        use std::os::unix::process::ExitStatusExt;
        // Wait status encodes the exit code in the high byte
        let status = std::process::ExitStatus::from_raw(3 << 8);
        assert_eq!(exit_code_of(status), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_of_signal_termination() {
        use std::os::unix::process::ExitStatusExt;
        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(exit_code_of(status), 128 + 9);
    }

    #[test]
    fn test_status_serialization_keys() {
        let status = RunStatus {
            running: true,
            code: EXIT_CODE_PENDING,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["running"], true);
        assert_eq!(json["code"], -1);
    }
}
