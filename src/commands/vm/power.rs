use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::PowerAction;
use crate::models::PowerTransition;
use crate::utils::{self, ProgressTracker};

use anyhow::{Result, bail};
use tracing::error;

use super::{fetch_vm, print_vm_header};

pub async fn power(
    api: &impl ClusterInterface,
    vmid: u32,
    action: PowerAction,
    skip_confirmation: bool,
) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("Confirm {} of VM {}?", action, vmid),
    )?) {
        return Ok(());
    }

    let tracker = ProgressTracker::new_spinner(&format!("Requesting {} of VM {}", action, vmid));
    let result = match action {
        PowerAction::Start => vm.start().await,
        PowerAction::Stop => vm.stop().await,
        PowerAction::Reset => vm.reset().await,
    };
    tracker.finish_and_clear();

    match result {
        Ok(PowerTransition::Requested { task }) => {
            println!("VM {} {} requested (task {}).", vmid, action, task);
        }
        Ok(PowerTransition::Skipped { status }) => {
            println!("VM {} is {}, nothing to do.", vmid, status);
        }
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to {} VM {}: {}", action, vmid, e);
        }
    }
    Ok(())
}
