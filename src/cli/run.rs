//! Run command - spawn a command with the latest remote env injected.
//!
//! Nothing is written to disk: the fetched version is decrypted in
//! memory, injected as environment variables, and wiped when the child
//! exits. Termination signals are forwarded to the child so it can shut
//! down cleanly.

use std::process::Command;

use tracing::info;
use zeroize::Zeroizing;

use crate::cli::prompt::Prompt;
use crate::core::env::EnvFile;
use crate::core::workspace::Workspace;
use crate::error::{Result, ValidationError};

/// Run a command with the stage's latest env as environment variables.
pub fn execute(stage: &str, command: &[String]) -> Result<()> {
    let workspace = Workspace::open()?;
    let exit_code = run_with_env(&workspace, stage, command)?;
    std::process::exit(exit_code);
}

fn run_with_env(workspace: &Workspace, stage: &str, command: &[String]) -> Result<i32> {
    if command.is_empty() {
        return Err(ValidationError::EmptyCommand.into());
    }

    let (meta, plaintext) = workspace.fetch(stage, None, &Prompt)?;
    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| ValidationError::BinaryPayload(stage.to_string()))?;
    let env = EnvFile::parse(text, stage.into());

    info!(
        stage,
        sequence = meta.sequence,
        vars = env.len(),
        command = %command[0],
        "running with injected env"
    );

    let mut cmd = Command::new(&command[0]);
    cmd.args(&command[1..]);

    // Zeroizing wipes each value once handed to the child's env table.
    for (key, value) in env.entries() {
        let value = Zeroizing::new(value.clone());
        cmd.env(key, value.as_str());
    }

    wait_forwarding_signals(cmd)
}

/// Spawn the child and wait, forwarding termination signals to it.
///
/// If the child dies to a signal, exit with the shell convention of
/// 128 + signal number.
#[cfg(unix)]
fn wait_forwarding_signals(mut cmd: Command) -> Result<i32> {
    use std::os::unix::process::ExitStatusExt;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::low_level;

    let mut child = cmd.spawn()?;

    // Handlers read the pid from an atomic that is cleared once the
    // child has been reaped, so a late signal never hits a reused pid.
    let child_pid = Arc::new(AtomicI32::new(child.id() as libc::pid_t));

    let mut registered = Vec::new();
    for sig in [SIGINT, SIGTERM, SIGHUP, SIGQUIT] {
        let child_pid = Arc::clone(&child_pid);
        let forward = move || {
            let pid = child_pid.load(Ordering::SeqCst);
            if pid > 0 {
                unsafe {
                    libc::kill(pid, sig);
                }
            }
        };
        // Safety: the handler only calls kill, which is
        // async-signal-safe.
        let id = unsafe { low_level::register(sig, forward) }?;
        registered.push(id);
    }

    let status = child.wait();
    child_pid.store(0, Ordering::SeqCst);
    for id in registered {
        low_level::unregister(id);
    }
    let status = status?;

    Ok(status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(1)))
}

#[cfg(not(unix))]
fn wait_forwarding_signals(mut cmd: Command) -> Result<i32> {
    let status = cmd.status()?;
    Ok(status.code().unwrap_or(1))
}
