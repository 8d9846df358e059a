// src/system/supervisor.rs

use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::broadcast;

use crate::models::{RunHandle, RunOutcome};

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Run '{0}' ended without a completion signal.")]
    SignalsClosed(RunHandle),
}

/// A completion signal for one tagged run.
///
/// Two independent kinds may arrive: the process-level end event carrying the
/// exit code (which may itself be absent, e.g. a signal-killed process), and
/// the broader end-of-lifecycle event carrying none. Either one, whichever
/// lands first, settles the run.
#[derive(Debug, Clone)]
pub enum RunSignal {
    ProcessEnd {
        handle: RunHandle,
        exit_code: Option<i32>,
    },
    RunEnded { handle: RunHandle },
}

impl RunSignal {
    fn handle(&self) -> &RunHandle {
        match self {
            Self::ProcessEnd { handle, .. } | Self::RunEnded { handle } => handle,
        }
    }
}

/// Supervises script executions.
///
/// Runs are correlated by [`RunHandle`]: any number of scripts may be in
/// flight at once, each awaiting only the signals tagged with its own handle.
/// There is no cancellation and no timeout; a hung script blocks nothing but
/// its own caller.
#[derive(Debug)]
pub struct RunSupervisor {
    signals: broadcast::Sender<RunSignal>,
}

impl Default for RunSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSupervisor {
    pub fn new() -> Self {
        let (signals, _) = broadcast::channel(64);
        Self { signals }
    }

    /// A sender onto the signal bus, for host integrations (and tests) that
    /// report run lifecycle events of their own.
    pub fn signal_sender(&self) -> broadcast::Sender<RunSignal> {
        self.signals.clone()
    }

    /// Launches `command` through the platform shell in `dir` and suspends the
    /// caller until the run settles.
    ///
    /// The subscription is opened before the process is spawned so no signal
    /// can slip past, and it is released exactly once: the first matching
    /// signal resolves the outcome, after which this run hears nothing more.
    /// A launch failure rejects immediately, releasing the subscription the
    /// same way.
    pub async fn execute(
        &self,
        command: &str,
        dir: &Path,
        handle: RunHandle,
    ) -> Result<RunOutcome, SupervisorError> {
        let subscription = self.signals.subscribe();

        let mut child = shell_command(command)
            .current_dir(dir)
            .spawn()
            .map_err(|source| SupervisorError::Launch {
                command: command.to_string(),
                source,
            })?;
        log::debug!("Run {handle} launched: {command}");

        let signals = self.signals.clone();
        let tag = handle.clone();
        tokio::spawn(async move {
            let exit_code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    log::warn!("Could not await process for run {tag}: {e}");
                    None
                }
            };
            // Both lifecycle events fire, tagged with the run handle. The
            // awaiting side only honors the first one it sees.
            let _ = signals.send(RunSignal::ProcessEnd {
                handle: tag.clone(),
                exit_code,
            });
            let _ = signals.send(RunSignal::RunEnded { handle: tag });
        });

        await_outcome(subscription, &handle).await
    }
}

/// Waits for the first signal matching `handle` and maps it to an outcome.
///
/// Signals for other runs are skipped; duplicate or late signals for this run
/// are unobservable because the receiver is dropped on return.
async fn await_outcome(
    mut subscription: broadcast::Receiver<RunSignal>,
    handle: &RunHandle,
) -> Result<RunOutcome, SupervisorError> {
    loop {
        match subscription.recv().await {
            Ok(signal) if signal.handle() != handle => continue,
            Ok(RunSignal::ProcessEnd { exit_code, .. }) => {
                return Ok(exit_code.map_or(RunOutcome::Unknown, RunOutcome::Exited));
            }
            Ok(RunSignal::RunEnded { .. }) => return Ok(RunOutcome::Unknown),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                log::warn!("Run {handle} missed {missed} signals; still listening");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(SupervisorError::SignalsClosed(handle.clone()));
            }
        }
    }
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(tx: &broadcast::Sender<RunSignal>, signal: RunSignal) {
        tx.send(signal).unwrap();
    }

    #[tokio::test]
    async fn test_process_end_with_zero_resolves_success() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let handle = RunHandle::new();
        let rx = tx.subscribe();

        send(&tx, RunSignal::ProcessEnd { handle: handle.clone(), exit_code: Some(0) });
        let outcome = await_outcome(rx, &handle).await.unwrap();
        assert_eq!(outcome, RunOutcome::Exited(0));
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_nonzero_exit_code_is_reported() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let handle = RunHandle::new();
        let rx = tx.subscribe();

        send(&tx, RunSignal::ProcessEnd { handle: handle.clone(), exit_code: Some(3) });
        let outcome = await_outcome(rx, &handle).await.unwrap();
        assert_eq!(outcome, RunOutcome::Exited(3));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_generic_end_without_code_resolves_unknown() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let handle = RunHandle::new();
        let rx = tx.subscribe();

        send(&tx, RunSignal::RunEnded { handle: handle.clone() });
        let outcome = await_outcome(rx, &handle).await.unwrap();
        assert_eq!(outcome, RunOutcome::Unknown);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_first_signal_wins_over_duplicates() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let handle = RunHandle::new();
        let rx = tx.subscribe();

        // The generic end arrives first, then a (late) process end with a
        // nonzero code. Only the first signal may be honored.
        send(&tx, RunSignal::RunEnded { handle: handle.clone() });
        send(&tx, RunSignal::ProcessEnd { handle: handle.clone(), exit_code: Some(9) });

        let outcome = await_outcome(rx, &handle).await.unwrap();
        assert_eq!(outcome, RunOutcome::Unknown);
    }

    #[tokio::test]
    async fn test_signals_for_other_runs_are_ignored() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let mine = RunHandle::new();
        let other = RunHandle::new();
        let rx = tx.subscribe();

        send(&tx, RunSignal::ProcessEnd { handle: other.clone(), exit_code: Some(7) });
        send(&tx, RunSignal::RunEnded { handle: other });
        send(&tx, RunSignal::ProcessEnd { handle: mine.clone(), exit_code: Some(0) });

        let outcome = await_outcome(rx, &mine).await.unwrap();
        assert_eq!(outcome, RunOutcome::Exited(0));
    }

    #[tokio::test]
    async fn test_missing_exit_code_maps_to_unknown() {
        let supervisor = RunSupervisor::new();
        let tx = supervisor.signal_sender();
        let handle = RunHandle::new();
        let rx = tx.subscribe();

        send(&tx, RunSignal::ProcessEnd { handle: handle.clone(), exit_code: None });
        assert_eq!(await_outcome(rx, &handle).await.unwrap(), RunOutcome::Unknown);
    }

    #[tokio::test]
    async fn test_execute_reports_real_exit_codes() {
        let supervisor = RunSupervisor::new();
        let dir = std::env::temp_dir();

        let ok = supervisor.execute("exit 0", &dir, RunHandle::new()).await.unwrap();
        assert_eq!(ok, RunOutcome::Exited(0));

        let failed = supervisor.execute("exit 3", &dir, RunHandle::new()).await.unwrap();
        assert_eq!(failed, RunOutcome::Exited(3));
    }

    #[tokio::test]
    async fn test_concurrent_runs_settle_independently() {
        let supervisor = RunSupervisor::new();
        let dir = std::env::temp_dir();

        let (slow, fast) = tokio::join!(
            supervisor.execute("sleep 0.2; exit 4", &dir, RunHandle::new()),
            supervisor.execute("exit 0", &dir, RunHandle::new()),
        );
        assert_eq!(slow.unwrap(), RunOutcome::Exited(4));
        assert_eq!(fast.unwrap(), RunOutcome::Exited(0));
    }

    #[tokio::test]
    async fn test_launch_failure_rejects() {
        let supervisor = RunSupervisor::new();
        let missing_dir = Path::new("/no/such/dir/for/scriptorium");
        let result = supervisor
            .execute("exit 0", missing_dir, RunHandle::new())
            .await;
        assert!(matches!(result, Err(SupervisorError::Launch { .. })));
    }
}
