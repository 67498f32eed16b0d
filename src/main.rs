#![forbid(unsafe_code)]

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use onego::cli::{Cli, Commands};
use onego::config::Config;
use onego::one::OneClient;
use onego::{commands, logging};

fn main() -> Result<()> {
    let cli = parse_args();
    logging::init(cli.verbose);

    // Flag combinations are validated before touching config or the network
    match &cli.command {
        Commands::Ip(cmd) => {
            let target = cmd.vm.target()?;
            let config = load_config(&cli)?;
            let client = OneClient::from_config(&config)?;
            commands::ip::execute(&client, &target, cmd.all)?;
        }
        Commands::Ssh(cmd) => {
            let target = cmd.vm.target()?;
            let config = load_config(&cli)?;
            let client = OneClient::from_config(&config)?;
            commands::ssh::execute(&client, &config, &target, cmd)?;
        }
    }

    Ok(())
}

/// Parse the command line; malformed flags exit with status 1 like every other
/// usage error, help and version keep clap's behavior.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    Ok(Config::load()?.with_cli_overrides(cli.endpoint.as_deref(), cli.verbose))
}
