//! Child process launching and stream pumping
//!
//! The launcher spawns the generator with piped stdio and wires the
//! streams into a single ordered event channel. Exit is reported by the
//! stdout pump only after the stream has drained, so a consumer never
//! observes output events after the exit event.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Flag pair selecting CSV-formatted generator output
const OUTPUT_FORMAT_FLAGS: [&str; 2] = ["-o", "csv"];

/// Read size for stdout; one read corresponds to one classified chunk
const STDOUT_CHUNK_BYTES: usize = 8192;

/// Events produced by a launched generator
#[derive(Debug)]
pub enum RunEvent {
    /// A chunk of stdout data
    Output(String),
    /// A line of stderr data
    Stderr(String),
    /// The process terminated
    Exited(std::process::ExitStatus),
    /// The process could not be reaped
    Failed(io::Error),
}

/// Build the generator argument list: user parameters split on whitespace,
/// the CSV output flags, then the target URL as the final positional
pub fn build_args(params: &str, target_url: &str) -> Vec<String> {
    let mut args: Vec<String> = params.split_whitespace().map(str::to_string).collect();
    args.extend(OUTPUT_FORMAT_FLAGS.iter().map(|s| s.to_string()));
    args.push(target_url.to_string());
    args
}

/// Spawn the generator and register its stream observers.
///
/// Returns the event receiver immediately; nothing here waits for the
/// child. A spawn failure is returned synchronously and the caller records
/// it as the run's terminal code.
pub async fn launch(binary: &Path, args: &[String]) -> io::Result<mpsc::UnboundedReceiver<RunEvent>> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    debug!("spawned {} (pid {:?})", binary.display(), child.id());

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr not captured"))?;

    let (tx, rx) = mpsc::unbounded_channel();

    let stderr_tx = tx.clone();
    tokio::spawn(async move {
        stderr_pump(stderr, stderr_tx).await;
    });

    tokio::spawn(async move {
        stdout_pump(child, stdout, tx).await;
    });

    Ok(rx)
}

/// Pump stdout chunks, then reap the child and report its exit status
async fn stdout_pump(mut child: Child, mut stdout: ChildStdout, tx: mpsc::UnboundedSender<RunEvent>) {
    let mut buf = [0u8; STDOUT_CHUNK_BYTES];

    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(RunEvent::Output(chunk)).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read generator stdout: {}", e);
                break;
            }
        }
    }

    let event = match child.wait().await {
        Ok(status) => RunEvent::Exited(status),
        Err(e) => RunEvent::Failed(e),
    };

    if tx.send(event).is_err() {
        debug!("Run monitor gone before exit was reported");
    }
}

/// Pump stderr lines so the monitor can log them
async fn stderr_pump(stderr: ChildStderr, tx: mpsc::UnboundedSender<RunEvent>) {
    let mut reader = BufReader::new(stderr);
    let mut line = String::new();

    loop {
        line.clear();

        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim_end().to_string();
                if tx.send(RunEvent::Stderr(trimmed)).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read generator stderr: {}", e);
                break;
            }
        }
    }
}
