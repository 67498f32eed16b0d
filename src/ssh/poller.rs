use crate::error::{OnegoError, Result};
use crate::one::LifecycleState;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Ready,
    Failed,
    Exhausted,
}

/// Bounded SSH readiness loop.
///
/// Each attempt re-reads the VM lifecycle state first; a failed VM aborts
/// the loop before any connection is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    pub retries: u32,
    pub interval: Duration,
}

impl Poller {
    pub fn new(retries: u32, interval: Duration) -> Self {
        Self { retries, interval }
    }

    /// Run until the probe succeeds, the VM fails or retries run out.
    ///
    /// Returns the number of attempts it took to reach [`PollState::Ready`].
    /// Sleeps only between attempts, never after the last one.
    pub fn run<L, P, S>(&self, mut lifecycle: L, mut probe: P, mut sleep: S) -> Result<u32>
    where
        L: FnMut() -> Result<LifecycleState>,
        P: FnMut() -> Result<bool>,
        S: FnMut(Duration),
    {
        let mut state = PollState::Polling;
        let mut attempt = 0;
        let mut last_seen = None;

        while state == PollState::Polling {
            if attempt == self.retries {
                state = PollState::Exhausted;
                continue;
            }
            attempt += 1;

            let current = lifecycle()?;
            if current.is_failed() {
                state = PollState::Failed;
            } else if probe()? {
                state = PollState::Ready;
            } else {
                debug!(attempt, retries = self.retries, state = %current, "ssh not ready yet");
                if attempt < self.retries {
                    sleep(self.interval);
                }
            }
            last_seen = Some(current);
        }

        debug!(?state, attempt, "polling finished");
        match state {
            PollState::Ready => Ok(attempt),
            PollState::Failed => Err(OnegoError::VmFailed {
                state: last_seen.map(|s| s.to_string()).unwrap_or_default(),
            }),
            _ => Err(OnegoError::SshNotReady { attempts: attempt }),
        }
    }
}
