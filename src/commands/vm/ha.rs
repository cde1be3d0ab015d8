use crate::integrations::ClusterInterface;
use crate::utils;

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::error;

use super::{fetch_vm, print_vm_header};

pub async fn ha_show(api: &impl ClusterInterface, vmid: u32) -> Result<()> {
    let vm = fetch_vm(api, vmid).await?;

    match vm.ha_registration().await? {
        Some(registration) => {
            println!("\n{:<20}: {}", "Resource", registration.sid);
            println!(
                "{:<20}: {}",
                "Group",
                registration.group.as_deref().unwrap_or("-")
            );
            println!(
                "{:<20}: {}",
                "Requested State",
                registration.state.as_deref().unwrap_or("-")
            );
            let status = registration.status.as_deref().unwrap_or("-");
            if registration.is_error() {
                println!("{:<20}: {}", "Status", status.red());
            } else {
                println!("{:<20}: {}", "Status", status);
            }
        }
        None => println!("\nVM {} is not managed by HA.", vmid),
    }
    Ok(())
}

pub async fn ha_add(
    api: &impl ClusterInterface,
    vmid: u32,
    group: &str,
    skip_confirmation: bool,
) -> Result<()> {
    let vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Add VM {} to HA group '{}'?", vmid, group),
    )?) {
        return Ok(());
    }

    if let Err(e) = vm.add_to_ha_group(group).await {
        error!("{:?}", e);
        bail!("Failed to add VM {} to HA group '{}': {}", vmid, group, e);
    }
    println!("VM {} added to HA group '{}'.", vmid, group);
    Ok(())
}

pub async fn ha_remove(api: &impl ClusterInterface, vmid: u32, skip_confirmation: bool) -> Result<()> {
    let vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Remove VM {} from HA?", vmid),
    )?) {
        return Ok(());
    }

    match vm.remove_from_ha_group().await {
        Ok(true) => println!("VM {} removed from HA.", vmid),
        Ok(false) => println!("VM {} is not managed by HA, nothing to do.", vmid),
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to remove VM {} from HA: {}", vmid, e);
        }
    }
    Ok(())
}
