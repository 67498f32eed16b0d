use super::SshInvocation;
use crate::error::{OnegoError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::debug;
use wait_timeout::ChildExt;

/// Runs the system `ssh` client as a readiness probe
pub struct SystemProbe {
    program: PathBuf,
    timeout: Duration,
    verbose: bool,
}

impl SystemProbe {
    pub fn new(timeout: Duration, verbose: bool) -> Self {
        Self {
            program: PathBuf::from("ssh"),
            timeout,
            verbose,
        }
    }

    /// Use a different client binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// One connection attempt; `Ok(false)` means "not reachable yet".
    ///
    /// A client that outlives the timeout is killed and counts as a failed
    /// attempt. Failing to spawn the client at all is an error.
    pub fn attempt(&self, invocation: &SshInvocation) -> Result<bool> {
        let mut cmd = Command::new(&self.program);
        cmd.args(invocation.probe_args()).stdin(Stdio::null());

        // Suppress output unless in verbose mode
        if !self.verbose {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let mut child = cmd.spawn().map_err(|e| {
            OnegoError::SshExec(format!("{}: {}", self.program.display(), e))
        })?;

        match child.wait_timeout(self.timeout)? {
            Some(status) => {
                debug!(address = %invocation.address, %status, "probe finished");
                Ok(status.success())
            }
            None => {
                debug!(address = %invocation.address, timeout = ?self.timeout, "probe timed out");
                let _ = child.kill();
                let _ = child.wait();
                Ok(false)
            }
        }
    }
}
