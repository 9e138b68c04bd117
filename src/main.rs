//! vnfsctl - VNFS image synchronization for diskless cluster nodes.
//!
//! Regenerates node image trees when their source changed, and exposes the
//! value helpers (export list splitting, DHCP lease arithmetic) used by the
//! provisioning configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vnfsctl::commands::{self, service::ServiceTarget, show::ShowTarget, sync::SyncMode};
use vnfsctl::config::{self, ControllerConf};

#[derive(Parser)]
#[command(name = "vnfsctl")]
#[command(about = "VNFS image synchronization and provisioning helpers")]
#[command(
    after_help = "QUICK START:\n  vnfsctl sync /srv/chroots/rocky /srv/vnfs/rocky  Rebuild if stale\n  vnfsctl status /srv/vnfs/rocky /srv/chroots/rocky  Check staleness\n  vnfsctl show config                               Print configuration"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: $VNFSCTL_CONFIG or /etc/warewulf/warewulf.conf)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate DEST from SOURCE if DEST is missing or older
    Sync {
        source: PathBuf,
        dest: PathBuf,
        /// Copy even if DEST is up to date
        #[arg(long)]
        force: bool,
        /// Build into a sibling directory and swap it into place
        #[arg(long, conflicts_with = "force")]
        atomic: bool,
    },

    /// Report whether ARTIFACT is older than SOURCE
    Status { artifact: PathBuf, source: PathBuf },

    /// Split a delimited value, honoring an escape character
    Split {
        input: String,
        #[arg(short, long, default_value = ",")]
        delim: String,
        #[arg(short, long, default_value = "\\")]
        escape: String,
        /// Only split where the text so far is an existing path
        #[arg(long)]
        paths: bool,
    },

    /// Add an offset to an IPv4 address
    Ip { base: String, offset: u32 },

    /// List the configured DHCP lease range
    Leases {
        /// Print at most this many addresses
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowCommand,
    },

    /// Restart and enable a provisioning service
    Service {
        #[command(subcommand)]
        what: ServiceCommand,
    },
}

#[derive(Subcommand)]
enum ShowCommand {
    /// Show current configuration
    Config {
        #[arg(long)]
        json: bool,
    },
    /// Show resolved NFS export paths
    Exports,
}

#[derive(Subcommand)]
enum ServiceCommand {
    Dhcp,
    Tftp,
    Nfs,
    /// Any systemd unit by name
    Unit { name: String },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "vnfsctl=debug,info" } else { "vnfsctl=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let config_file = cli.config.clone().unwrap_or_else(config::config_path);
    let load_config = || ControllerConf::load(&config_file);

    match cli.command {
        Commands::Sync {
            source,
            dest,
            force,
            atomic,
        } => {
            let mode = if atomic {
                SyncMode::Atomic
            } else {
                SyncMode::InPlace
            };
            commands::cmd_sync(&source, &dest, force, mode)?;
        }

        Commands::Status { artifact, source } => {
            commands::cmd_status(&artifact, &source)?;
        }

        Commands::Split {
            input,
            delim,
            escape,
            paths,
        } => {
            commands::cmd_split(&input, &delim, &escape, paths)?;
        }

        Commands::Ip { base, offset } => {
            commands::cmd_ip(&base, offset)?;
        }

        Commands::Leases { limit } => {
            let config = load_config()?;
            commands::cmd_leases(&config, limit)?;
        }

        Commands::Show { what } => {
            let config = load_config()?;
            let target = match what {
                ShowCommand::Config { json: false } => ShowTarget::Config,
                ShowCommand::Config { json: true } => ShowTarget::ConfigJson,
                ShowCommand::Exports => ShowTarget::Exports,
            };
            commands::cmd_show(target, &config)?;
        }

        Commands::Service { what } => {
            let config = match what {
                // A unit named on the command line works without a config file.
                ServiceCommand::Unit { .. } => {
                    ControllerConf::load_optional(&config_file).unwrap_or_default()
                }
                _ => load_config()?,
            };
            let target = match what {
                ServiceCommand::Dhcp => ServiceTarget::Dhcp,
                ServiceCommand::Tftp => ServiceTarget::Tftp,
                ServiceCommand::Nfs => ServiceTarget::Nfs,
                ServiceCommand::Unit { name } => ServiceTarget::Named(name),
            };
            commands::cmd_service(target, &config)?;
        }
    }

    Ok(())
}
