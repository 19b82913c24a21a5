// src/exec/task_runner.rs

//! Shell process runner for a single node.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::exec::backend::ActionOutcome;
use crate::exec::cancel::CancelToken;

/// Run `command` through the shell with `dir` as working directory.
///
/// stdout and stderr are captured line by line into one transcript, in the
/// order the lines arrive. If `cancel` fires while the process runs, the
/// child is killed and a `Cancelled` outcome is returned. Spawn and wait
/// errors become a failed outcome; they are also logged.
pub async fn run_shell_action(
    command: &str,
    shell: Option<&str>,
    dir: &Path,
    cancel: CancelToken,
) -> ActionOutcome {
    match run_shell_action_inner(command, shell, dir, cancel).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(dir = %dir.display(), error = %err, "action execution error");
            ActionOutcome::failed(format!("{err:#}"), String::new())
        }
    }
}

async fn run_shell_action_inner(
    command: &str,
    shell: Option<&str>,
    dir: &Path,
    cancel: CancelToken,
) -> Result<ActionOutcome> {
    if cancel.is_cancelled() {
        debug!(dir = %dir.display(), "cancelled before start; not spawning");
        return Ok(ActionOutcome::cancelled(String::new()));
    }

    info!(dir = %dir.display(), cmd = %command, "starting action process");

    let mut cmd = shell_command(command, shell);
    cmd.current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{command}` in {}", dir.display()))?;

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    if let Some(stdout) = child.stdout.take() {
        spawn_line_reader(stdout, line_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_line_reader(stderr, line_tx.clone());
    }
    drop(line_tx);

    // Either the process exits on its own, or the run is cancelled.
    let status: Option<ExitStatus> = tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for `{command}` in {}", dir.display()))?;
            Some(status)
        }

        _ = cancel.cancelled() => {
            info!(dir = %dir.display(), "cancellation requested; killing action process");
            if let Err(e) = child.kill().await {
                warn!(dir = %dir.display(), error = %e, "failed to kill action process");
            }
            None
        }
    };

    let mut output = String::new();
    match status {
        Some(status) => {
            // Readers finish at EOF once the process is gone.
            while let Some(line) = line_rx.recv().await {
                push_line(&mut output, line);
            }

            let code = status.code().unwrap_or(-1);
            info!(
                dir = %dir.display(),
                exit_code = code,
                success = status.success(),
                "action process exited"
            );

            if status.success() {
                Ok(ActionOutcome::success(output))
            } else {
                Ok(ActionOutcome::failed(describe_exit(status), output))
            }
        }
        None => {
            // A killed shell may leave grandchildren holding the pipes open;
            // only take what has already been read.
            while let Ok(line) = line_rx.try_recv() {
                push_line(&mut output, line);
            }
            Ok(ActionOutcome::cancelled(output))
        }
    }
}

/// Build a shell command appropriate for the platform, or for the
/// configured shell program.
fn shell_command(command: &str, shell: Option<&str>) -> Command {
    match shell {
        Some(program) => {
            let mut c = Command::new(program);
            c.arg("-c").arg(command);
            c
        }
        None if cfg!(windows) => {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        }
        None => {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        }
    }
}

/// Forward every line of `stream` until EOF.
///
/// Lines are read as raw bytes and decoded lossily, so output that is not
/// valid UTF-8 never stops the reader (which would close the pipe under the
/// child).
fn spawn_line_reader<R>(stream: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut forwarding = true;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if forwarding && tx.send(decode_line(&buf)).is_err() {
                        // Nobody collects any more; keep draining the pipe.
                        forwarding = false;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "output reader stopped");
                    break;
                }
            }
        }
    });
}

fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

fn push_line(output: &mut String, line: String) {
    output.push_str(&line);
    output.push('\n');
}

fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_line_strips_terminators_and_replaces_invalid_bytes() {
        assert_eq!(decode_line(b"plan ok\n"), "plan ok");
        assert_eq!(decode_line(b"crlf\r\n"), "crlf");
        assert_eq!(decode_line(b"no newline"), "no newline");
        assert_eq!(decode_line(b"caf\xe9\n"), "caf\u{FFFD}");
    }
}
