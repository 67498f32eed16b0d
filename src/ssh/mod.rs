//! SSH invocation, readiness polling and terminal handoff.

pub mod handoff;
pub mod poller;
pub mod probe;

pub use handoff::{handoff, locate};
pub use poller::{PollState, Poller};
pub use probe::SystemProbe;

/// Options forcing a quick, non-interactive connection check
pub const PROBE_OPTIONS: &[&str] = &[
    "PasswordAuthentication=no",
    "IdentitiesOnly=yes",
    "StrictHostKeyChecking=no",
    "UserKnownHostsFile=/dev/null",
    "LogLevel=quiet",
    "ConnectionAttempts=3",
    "ConnectTimeout=10",
    "ControlMaster=no",
    "ControlPath=no",
    "BatchMode=yes",
];

/// Everything needed to run `ssh` against a resolved VM address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshInvocation {
    pub address: String,
    pub user: String,
    /// Configured arguments placed before the host
    pub options: Vec<String>,
    /// Arguments given after `--` on the command line
    pub extra_args: Vec<String>,
}

impl SshInvocation {
    pub fn new(address: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user: user.into(),
            options: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: &[String]) -> Self {
        self.options = options.to_vec();
        self
    }

    pub fn with_extra_args(mut self, args: &[String]) -> Self {
        self.extra_args = args.to_vec();
        self
    }

    /// Arguments for the interactive session
    pub fn interactive_args(&self) -> Vec<String> {
        let mut args = self.options.clone();
        args.push(self.address.clone());
        args.push("-l".to_string());
        args.push(self.user.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Arguments for a probe that connects and runs `exit 0`.
    ///
    /// Trailing user arguments are left out since they usually name a
    /// remote command.
    pub fn probe_args(&self) -> Vec<String> {
        let mut args = self.options.clone();
        for option in PROBE_OPTIONS {
            args.push("-o".to_string());
            args.push(option.to_string());
        }
        args.push("-l".to_string());
        args.push(self.user.clone());
        args.push(self.address.clone());
        args.push("exit".to_string());
        args.push("0".to_string());
        args
    }
}
