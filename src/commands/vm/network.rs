use crate::integrations::ClusterInterface;
use crate::utils;

use anyhow::Result;

use super::{fetch_vm, print_vm_header};

pub async fn network(
    api: &impl ClusterInterface,
    vmid: u32,
    connect: bool,
    adapters: &[u8],
    skip_confirmation: bool,
) -> Result<()> {
    let mut vm = fetch_vm(api, vmid).await?;
    print_vm_header(&vm);

    let verb = if connect { "Connect" } else { "Disconnect" };
    let adapter_list = adapters
        .iter()
        .map(|index| format!("net{}", index))
        .collect::<Vec<_>>()
        .join(", ");
    if !(utils::user_confirmation(
        skip_confirmation,
        &format!("{} {} of VM {}?", verb, adapter_list, vmid),
    )?) {
        return Ok(());
    }

    if connect {
        for &index in adapters {
            vm.connect_network_adapter(index).await?;
            println!("net{} connected.", index);
        }
    } else if let [index] = adapters {
        vm.disconnect_network_adapter(*index).await?;
        println!("net{} disconnected.", index);
    } else {
        let disconnected = vm.disconnect_network_adapters(adapters).await?;
        for index in adapters {
            if disconnected.contains(index) {
                println!("net{} disconnected.", index);
            } else {
                println!("net{} does not exist, skipped.", index);
            }
        }
    }

    Ok(())
}
