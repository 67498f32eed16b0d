use super::SshInvocation;
use crate::error::{OnegoError, Result};
use crate::utils::shell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Find the `ssh` client on `PATH`
pub fn locate() -> Result<PathBuf> {
    let path = which::which("ssh").map_err(|_| OnegoError::SshNotFound)?;
    debug!(path = %path.display(), "found ssh client");
    Ok(path)
}

/// Replace this process with an interactive `ssh` session.
///
/// Only returns on failure. On non-Unix targets the session runs as a child
/// with inherited stdio and this process exits with its status.
pub fn handoff(program: &Path, invocation: &SshInvocation) -> Result<()> {
    let args = invocation.interactive_args();

    eprintln!("ssh {}", shell::join_args(&args));
    debug!(path = %program.display(), "handing terminal over to ssh");

    let mut cmd = Command::new(program);
    cmd.args(&args);
    exec(cmd)
}

#[cfg(unix)]
fn exec(mut cmd: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;

    // exec() only returns on error
    let error = cmd.exec();
    Err(OnegoError::SshExec(error.to_string()))
}

#[cfg(not(unix))]
fn exec(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .map_err(|e| OnegoError::SshExec(e.to_string()))?;
    std::process::exit(status.code().unwrap_or(1));
}
