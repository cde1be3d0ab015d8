use crate::integrations::ClusterInterface;
use crate::utils;

use anyhow::Result;
use tracing::warn;

use super::{colored_status, fetch_vm};

pub async fn show(api: &impl ClusterInterface, vmid: u32) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    let usage = vm.resource_usage();

    println!("\n{:<20}: {}", "VM", vm.vmid());
    println!("{:<20}: {}", "Name", vm.name().unwrap_or("-"));
    println!("{:<20}: {}", "Node", vm.node());
    println!("{:<20}: {}", "Status", colored_status(vm.status()));
    println!("{:<20}: {}", "Uptime", utils::format_uptime(vm.uptime()));
    println!("{:<20}: {}", "Tags", vm.tags().join(", "));

    match vm.pool().await {
        Ok(pool) => println!("{:<20}: {}", "Pool", pool.unwrap_or_else(|| "-".to_string())),
        Err(e) => warn!("Could not read pool of VM {}: {}", vmid, e),
    }

    println!(
        "{:<20}: {} ({} used)",
        "vCPUs",
        vm.max_cpu().map_or("-".to_string(), |cpu| cpu.to_string()),
        utils::format_cpu_usage(usage.cpu)
    );
    println!(
        "{:<20}: {} ({} used)",
        "Memory",
        utils::format_memory(vm.max_memory()),
        usage.memory.map_or("-".to_string(), utils::format_bytes)
    );
    println!(
        "{:<20}: {} ({} used)",
        "Disk",
        vm.max_disk().map_or("-".to_string(), utils::format_bytes),
        usage.disk.map_or("-".to_string(), utils::format_bytes)
    );
    if let Some(storage) = vm.storage() {
        println!("{:<20}: {}", "Storage", storage);
    }

    match vm.ha_registration().await {
        Ok(Some(registration)) => println!(
            "{:<20}: {} ({})",
            "HA Group",
            registration.group.unwrap_or_else(|| "-".to_string()),
            registration.state.unwrap_or_else(|| "-".to_string())
        ),
        Ok(None) => println!("{:<20}: -", "HA Group"),
        Err(e) => warn!("Could not read HA registration of VM {}: {}", vmid, e),
    }

    Ok(())
}
