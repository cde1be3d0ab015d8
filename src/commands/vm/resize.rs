use crate::integrations::ClusterInterface;
use crate::models::VmStatus;
use crate::utils;

use anyhow::{Result, bail};

use super::{fetch_vm, print_vm_header};

pub async fn resize(
    api: &impl ClusterInterface,
    vmid: u32,
    cores: Option<u32>,
    sockets: Option<u32>,
    memory_gb: Option<u64>,
    skip_confirmation: bool,
) -> Result<()> {
    if cores.is_none() && sockets.is_some() {
        bail!("--sockets requires --cores");
    }
    if cores.is_none() && memory_gb.is_none() {
        bail!("Nothing to change, pass --cores and/or --memory-gb");
    }

    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if let Some(cores) = cores {
        println!(
            "{:<20}: {} -> {} x {}",
            "vCPUs",
            vm.num_cpus().await?,
            sockets.unwrap_or(1),
            cores
        );
    }
    if let Some(memory_gb) = memory_gb {
        println!(
            "{:<20}: {} GB -> {} GB",
            "Memory",
            vm.memory_gb().await?,
            memory_gb
        );
    }

    if !(utils::user_confirmation(skip_confirmation, &format!("Resize VM {}?", vmid))?) {
        return Ok(());
    }

    if let Some(cores) = cores {
        let sockets = sockets.unwrap_or(1);
        vm.set_cpu(cores, sockets).await?;
        println!("CPU of VM {} set to {} x {}.", vmid, sockets, cores);
    }
    if let Some(memory_gb) = memory_gb {
        vm.set_memory(memory_gb).await?;
        println!("Memory of VM {} set to {} GB.", vmid, memory_gb);
    }

    if vm.status() == VmStatus::Running {
        println!("VM {} updated. Some changes apply after the next reboot.", vmid);
    } else {
        println!("VM {} updated.", vmid);
    }
    Ok(())
}
