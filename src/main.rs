use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use tracing::{error, info};

use crate::config::ConnectionConfig;
use crate::integrations::data_transfer_objects::PowerAction;
use crate::integrations::providers::proxmox::ProxmoxInterface;

mod commands;
mod config;
mod errors;
mod integrations;
mod models;
mod utils;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/pvetool/config.yaml)
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cluster node commands
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Virtual machine management commands
    Vm {
        #[command(subcommand)]
        command: VmCommands,
    },
}

#[derive(Subcommand, Debug)]
enum NodeCommands {
    /// List cluster nodes
    List {},

    /// Check whether a node is a reachable cluster member
    Alive {
        /// Name of the node to probe
        #[arg(required = true)]
        node: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LinkAction {
    Connect,
    Disconnect,
}

#[derive(Subcommand, Debug)]
enum VmCommands {
    /// List QEMU virtual machines
    List {
        /// Only list VMs hosted on this node
        #[arg(long)]
        node: Option<String>,
    },

    /// Show details of a VM
    Show {
        #[arg(required = true)]
        vmid: u32,
    },

    /// Rename a VM (the name is converted to a valid DNS name)
    Rename {
        #[arg(required = true)]
        vmid: u32,

        #[arg(required = true)]
        name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Move a VM into a resource pool
    Pool {
        #[arg(required = true)]
        vmid: u32,

        #[arg(required = true)]
        pool: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Change the CPU and/or memory of a VM
    Resize {
        #[arg(required = true)]
        vmid: u32,

        /// Cores per socket
        #[arg(long)]
        cores: Option<u32>,

        /// Number of sockets (default: 1)
        #[arg(long)]
        sockets: Option<u32>,

        /// Memory in GB
        #[arg(long)]
        memory_gb: Option<u64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Start a VM
    Start {
        #[arg(required = true)]
        vmid: u32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Stop a VM immediately
    Stop {
        #[arg(required = true)]
        vmid: u32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Hard-reset a running VM
    Reset {
        #[arg(required = true)]
        vmid: u32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Connect or disconnect network adapters
    Network {
        #[arg(required = true)]
        vmid: u32,

        #[arg(value_enum)]
        action: LinkAction,

        /// Adapter index, repeatable (e.g. -a 0 -a 1 for net0 and net1)
        #[arg(short = 'a', long = "adapter", required = true)]
        adapters: Vec<u8>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// High-availability group commands
    Ha {
        #[command(subcommand)]
        command: HaCommands,
    },

    /// Live-migrate a VM to another node
    Migrate {
        #[arg(required = true)]
        vmid: u32,

        /// Destination node
        #[arg(long)]
        target: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HaCommands {
    /// Show the HA registration of a VM
    Show {
        #[arg(required = true)]
        vmid: u32,
    },

    /// Register a VM in an HA group
    Add {
        #[arg(required = true)]
        vmid: u32,

        #[arg(required = true)]
        group: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Remove the HA registration of a VM
    Remove {
        #[arg(required = true)]
        vmid: u32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Read environment variables
    dotenvy::dotenv().ok();

    // Setup logging
    let log_file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("pvetool.log")
    {
        Ok(file) => file,
        Err(e) => bail!("Failed to open log file: {}", e),
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = match ConnectionConfig::load(cli.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{:?}", e);
            bail!("{}", e);
        }
    };
    info!("Using {}", config);

    let api = match ProxmoxInterface::new(config) {
        Ok(api) => api,
        Err(e) => {
            error!("{:?}", e);
            bail!("Couldn't set up the Proxmox API client");
        }
    };

    match &cli.command {
        Commands::Node { command } => match command {
            NodeCommands::List {} => {
                commands::node::list(&api).await?;
            }
            NodeCommands::Alive { node } => {
                commands::node::alive(&api, node).await?;
            }
        },
        Commands::Vm { command } => match command {
            VmCommands::List { node } => {
                commands::vm::list(&api, node.as_deref()).await?;
            }
            VmCommands::Show { vmid } => {
                commands::vm::show(&api, *vmid).await?;
            }
            VmCommands::Rename { vmid, name, yes } => {
                commands::vm::rename(&api, *vmid, name, *yes).await?;
            }
            VmCommands::Pool { vmid, pool, yes } => {
                commands::vm::pool(&api, *vmid, pool, *yes).await?;
            }
            VmCommands::Resize {
                vmid,
                cores,
                sockets,
                memory_gb,
                yes,
            } => {
                commands::vm::resize(&api, *vmid, *cores, *sockets, *memory_gb, *yes).await?;
            }
            VmCommands::Start { vmid, yes } => {
                commands::vm::power(&api, *vmid, PowerAction::Start, *yes).await?;
            }
            VmCommands::Stop { vmid, yes } => {
                commands::vm::power(&api, *vmid, PowerAction::Stop, *yes).await?;
            }
            VmCommands::Reset { vmid, yes } => {
                commands::vm::power(&api, *vmid, PowerAction::Reset, *yes).await?;
            }
            VmCommands::Network {
                vmid,
                action,
                adapters,
                yes,
            } => {
                let connect = matches!(action, LinkAction::Connect);
                commands::vm::network(&api, *vmid, connect, adapters, *yes).await?;
            }
            VmCommands::Ha { command } => match command {
                HaCommands::Show { vmid } => {
                    commands::vm::ha_show(&api, *vmid).await?;
                }
                HaCommands::Add { vmid, group, yes } => {
                    commands::vm::ha_add(&api, *vmid, group, *yes).await?;
                }
                HaCommands::Remove { vmid, yes } => {
                    commands::vm::ha_remove(&api, *vmid, *yes).await?;
                }
            },
            VmCommands::Migrate { vmid, target, yes } => {
                commands::vm::migrate(&api, *vmid, target, *yes).await?;
            }
        },
    }

    Ok(())
}
