mod ha;
mod list;
mod migrate;
mod network;
mod pool;
mod power;
mod rename;
mod resize;
mod show;

pub use ha::*;
pub use list::*;
pub use migrate::*;
pub use network::*;
pub use pool::*;
pub use power::*;
pub use rename::*;
pub use resize::*;
pub use show::*;

use crate::integrations::ClusterInterface;
use crate::models::VirtualMachine;

use anyhow::{Result, bail};
use tracing::error;

async fn fetch_vm<C: ClusterInterface>(api: &C, vmid: u32) -> Result<VirtualMachine<'_, C>> {
    match VirtualMachine::fetch(api, vmid).await {
        Ok(vm) => Ok(vm),
        Err(e) if e.is_not_found() => bail!("VM {} not found in the cluster", vmid),
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to load VM {}: {}", vmid, e);
        }
    }
}

fn print_vm_header<C: ClusterInterface>(vm: &VirtualMachine<'_, C>) {
    println!("\n{:<20}: {}", "VM", vm.vmid());
    println!("{:<20}: {}", "Name", vm.name().unwrap_or("-"));
    println!("{:<20}: {}", "Node", vm.node());
    println!("{:<20}: {}\n", "Status", vm.status());
}
