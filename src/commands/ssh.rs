use crate::cli::SshCmd;
use crate::config::Config;
use crate::error::Result;
use crate::one::OneApi;
use crate::resolve::{self, VmTarget};
use crate::ssh::{self, Poller, SshInvocation, SystemProbe};
use std::time::Duration;

pub fn execute(api: &dyn OneApi, config: &Config, target: &VmTarget, cmd: &SshCmd) -> Result<()> {
    let id = resolve::resolve_id(api, &target.vm)?;
    let vm = api.vm_info(id)?;
    let address = resolve::first_address(&vm, &target.selector)?;

    let invocation = SshInvocation::new(address, config.ssh.user.as_str())
        .with_options(&config.ssh.options)
        .with_extra_args(&cmd.ssh_args);

    let program = ssh::locate()?;
    let wait = cmd.wait.then(|| build_poller(config, cmd));
    let probe = SystemProbe::new(Duration::from_secs(config.ssh.probe_timeout), config.verbose)
        .with_program(&program);

    connect(
        api,
        id,
        &invocation,
        wait,
        |inv| probe.attempt(inv),
        std::thread::sleep,
        |inv| ssh::handoff(&program, inv),
    )
}

/// Poller settings from flags, falling back to the configured defaults
pub fn build_poller(config: &Config, cmd: &SshCmd) -> Poller {
    Poller::new(
        cmd.retries.unwrap_or(config.ssh.retries),
        Duration::from_secs(cmd.interval.unwrap_or(config.ssh.interval)),
    )
}

/// Optionally wait for SSH to come up, then hand the terminal over.
///
/// Without a poller the VM state is never fetched and nothing sleeps.
pub fn connect<P, S, H>(
    api: &dyn OneApi,
    id: u32,
    invocation: &SshInvocation,
    poller: Option<Poller>,
    mut probe: P,
    sleep: S,
    handoff: H,
) -> Result<()>
where
    P: FnMut(&SshInvocation) -> Result<bool>,
    S: FnMut(Duration),
    H: FnOnce(&SshInvocation) -> Result<()>,
{
    if let Some(poller) = poller {
        eprintln!(
            "Waiting for ssh on {} (up to {} attempts)...",
            invocation.address, poller.retries
        );
        poller.run(|| api.vm_state(id), || probe(invocation), sleep)?;
        eprintln!("ssh ready");
    }

    handoff(invocation)
}
