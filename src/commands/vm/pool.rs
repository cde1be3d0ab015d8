use crate::integrations::ClusterInterface;
use crate::utils;

use anyhow::Result;

use super::{fetch_vm, print_vm_header};

pub async fn pool(
    api: &impl ClusterInterface,
    vmid: u32,
    resource_pool_name: &str,
    skip_confirmation: bool,
) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Move VM {} to pool '{}'?", vmid, resource_pool_name),
    )?) {
        return Ok(());
    }

    vm.set_pool(resource_pool_name).await?;
    println!("VM {} moved to pool '{}'.", vmid, resource_pool_name);
    Ok(())
}
