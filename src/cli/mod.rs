use clap::{Args, Parser, Subcommand};

pub mod flags;
pub use flags::VmFlags;

#[derive(Parser, Debug)]
#[command(name = "onego")]
#[command(about = "OpenNebula utility belt for CLI ninjas", long_about = None)]
#[command(version = env!("ONEGO_VERSION"))]
#[command(after_help = "\
EXAMPLES:
  onego ip --name web-01                 First IP of VM 'web-01'
  onego ip --id 42 --all                 Every IP of VM 42, one per line
  onego ip --id 42 --network private     IP on the 'private' network
  onego ssh --name web-01 --wait         Wait for SSH, then log in
  onego ssh --id 42 -- -A uptime         Pass extra arguments to ssh

Credentials are read from $ONE_AUTH (default ~/.one/one_auth) and the
endpoint from $ONE_XMLRPC (default http://localhost:2633/RPC2).")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output, including ssh probe output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// OpenNebula XML-RPC endpoint (overrides ONE_XMLRPC and config)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get IP of a VM
    Ip(IpCmd),

    /// SSH to a VM
    Ssh(SshCmd),
}

#[derive(Args, Debug, Clone)]
pub struct IpCmd {
    #[command(flatten)]
    pub vm: VmFlags,

    /// Get all the IPs instead of just the first one
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SshCmd {
    #[command(flatten)]
    pub vm: VmFlags,

    /// Wait until SSH is ready
    #[arg(long)]
    pub wait: bool,

    /// When using --wait, try this many times [default: 100]
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// When using --wait, seconds to wait between retries [default: 1]
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Extra arguments passed to ssh
    #[arg(last = true, value_name = "SSH_ARGS")]
    pub ssh_args: Vec<String>,
}
