use crate::integrations::ClusterInterface;
use crate::models::sanitize_dns_name;
use crate::utils;

use anyhow::Result;

use super::{fetch_vm, print_vm_header};

pub async fn rename(
    api: &impl ClusterInterface,
    vmid: u32,
    new_name: &str,
    skip_confirmation: bool,
) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    let sanitized_name = sanitize_dns_name(new_name);
    if sanitized_name != new_name {
        println!("'{}' will be stored as '{}'", new_name, sanitized_name);
    }

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Rename VM {} to '{}'?", vmid, sanitized_name),
    )?) {
        return Ok(());
    }

    let name = vm.set_name(new_name).await?;
    println!("VM {} renamed to '{}'.", vmid, name);
    Ok(())
}
