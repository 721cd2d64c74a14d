mod cli;
mod config;
mod error;
mod service;
mod supervisor;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{parse_env_entry, Config, DEFAULT_UNIT_DIR};
use service::{install_service, report_status, uninstall_service, ServiceDescriptor, SERVICE_NAME};
use supervisor::{Supervisor, Systemctl};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the systemd unit for the daemon, enable and start it
    Install {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        #[arg(long, default_value = DEFAULT_UNIT_DIR)]
        unit_dir: PathBuf,
        /// Extra environment for the daemon, as KEY=VALUE
        #[arg(long = "env", value_parser = parse_env_arg)]
        env: Vec<(String, String)>,
    },
    /// Stop and disable the daemon, then delete its unit file
    Uninstall {
        #[arg(long, default_value = DEFAULT_UNIT_DIR)]
        unit_dir: PathBuf,
    },
    /// Print the unit file that install would write
    Render {
        #[arg(long = "env", value_parser = parse_env_arg)]
        env: Vec<(String, String)>,
    },
    /// Show the live status of the installed unit
    Status {},
}

fn parse_env_arg(entry: &str) -> Result<(String, String), String> {
    parse_env_entry(entry).map_err(|e| e.to_string())
}

fn build_descriptor(config: Config) -> anyhow::Result<ServiceDescriptor> {
    ServiceDescriptor::build(config)
        .context("Run this from the project root, in the graphical session the daemon should attach to")
}

fn assume_yes(_unit: &str) -> bool {
    true
}

fn confirmation(yes: bool) -> fn(&str) -> bool {
    if yes {
        assume_yes
    } else {
        cli::prompt_confirmation
    }
}

fn render_unit(config: Config) -> anyhow::Result<String> {
    Ok(build_descriptor(config)?.render())
}

fn show_status<S: Supervisor + ?Sized>(supervisor: &S) -> bool {
    report_status(supervisor, &service::descriptor::unit_name(SERVICE_NAME))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let systemctl = Systemctl::default();

    match cli.command {
        Commands::Install { yes, unit_dir, env } => {
            let config = Config::from_env(Some(unit_dir), env)?;
            let unit_dir = config.unit_dir.clone();
            let descriptor = build_descriptor(config)?;
            install_service(&descriptor, &unit_dir, &systemctl, confirmation(yes))?;
        }
        Commands::Uninstall { unit_dir } => {
            uninstall_service(SERVICE_NAME, &unit_dir, &systemctl)?;
        }
        Commands::Render { env } => {
            let config = Config::from_env(None, env)?;
            println!("{}", render_unit(config)?);
        }
        Commands::Status {} => {
            show_status(&systemctl);
        }
    }

    Ok(())
}
