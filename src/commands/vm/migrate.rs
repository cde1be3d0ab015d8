use crate::integrations::ClusterInterface;
use crate::models::{Migration, is_node_alive};
use crate::utils::{self, ProgressTracker};

use anyhow::{Result, bail};

use super::{fetch_vm, print_vm_header};

pub async fn migrate(
    api: &impl ClusterInterface,
    vmid: u32,
    target_node: &str,
    skip_confirmation: bool,
) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if vm.node() == target_node {
        println!("VM {} already runs on '{}'.", vmid, target_node);
        return Ok(());
    }
    if !is_node_alive(api, target_node).await {
        bail!("Target node '{}' is not alive", target_node);
    }

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Migrate VM {} from '{}' to '{}'?", vmid, vm.node(), target_node),
    )?) {
        return Ok(());
    }

    let tracker = ProgressTracker::new_spinner(&format!("Requesting migration of VM {}", vmid));
    let migration = vm.migrate(target_node).await;
    tracker.finish_and_clear();

    match migration? {
        Migration::AlreadyOnTarget => {
            println!("VM {} already runs on '{}'.", vmid, target_node);
        }
        Migration::Requested { task } => {
            println!("Migration of VM {} to '{}' started (task {}).", vmid, target_node, task);
        }
        Migration::Rejected { status, message } => {
            bail!("Migration rejected by the cluster ({}): {}", status, message);
        }
    }
    Ok(())
}
