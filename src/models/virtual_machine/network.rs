use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::models::network_adapter::{adapter_key, with_link_state};

use tracing::{info, warn};

use super::VirtualMachine;

impl<C: ClusterInterface> VirtualMachine<'_, C> {
    pub async fn connect_network_adapter(&mut self, index: u8) -> ProxmoxResult<()> {
        self.set_link_state(&[index], false, true).await?;
        Ok(())
    }

    pub async fn disconnect_network_adapter(&mut self, index: u8) -> ProxmoxResult<()> {
        self.set_link_state(&[index], true, true).await?;
        Ok(())
    }

    /// Disconnects every listed adapter the VM has in one config write.
    /// Adapters missing from the config are skipped; returns the indices written.
    pub async fn disconnect_network_adapters(&mut self, indices: &[u8]) -> ProxmoxResult<Vec<u8>> {
        self.set_link_state(indices, true, false).await
    }

    async fn set_link_state(
        &mut self,
        indices: &[u8],
        link_down: bool,
        require_present: bool,
    ) -> ProxmoxResult<Vec<u8>> {
        let keys = indices
            .iter()
            .map(|&index| adapter_key(index).map(|key| (index, key)))
            .collect::<ProxmoxResult<Vec<(u8, String)>>>()?;

        let node = self.current_node().await?;
        let config = self.api.fetch_vm_config(&node, self.vmid).await?;

        let mut updates: Vec<(String, String)> = vec![];
        let mut written: Vec<u8> = vec![];
        for (index, key) in keys {
            match config.network_adapter(index) {
                Some(adapter) => {
                    updates.push((key, with_link_state(adapter, link_down)));
                    written.push(index);
                }
                None if require_present => {
                    return Err(ProxmoxError::validation(
                        "network adapter",
                        format!("VM {} has no {} adapter", self.vmid, key),
                    ));
                }
                None => warn!("VM {} has no {} adapter, skipping", self.vmid, key),
            }
        }

        if updates.is_empty() {
            return Ok(written);
        }

        let params: Vec<(&str, String)> = updates
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        self.api
            .update_vm_config(&node, self.vmid, &params)
            .await?;
        info!(
            "VM {} adapters {:?} {}",
            self.vmid,
            written,
            if link_down { "disconnected" } else { "connected" }
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ProxmoxError;
    use crate::integrations::providers::mock::{ApiCall, MockCluster, vm_resource};
    use crate::models::VirtualMachine;
    use serde_json::json;

    fn cluster() -> MockCluster {
        MockCluster::new()
            .with_resource(vm_resource(300, "pve1", "running"))
            .with_config(
                300,
                json!({
                    "net0": "virtio=BC:24:11:00:00:01,bridge=vmbr0,firewall=1",
                    "net1": "virtio=BC:24:11:00:00:02,bridge=vmbr1,link_down=1",
                }),
            )
    }

    #[tokio::test]
    async fn test_disconnect_keeps_adapter_options() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 300).await.unwrap();

        vm.disconnect_network_adapter(0).await.unwrap();
        assert_eq!(
            api.writes(),
            vec![ApiCall::UpdateVmConfig {
                node: "pve1".to_string(),
                vmid: 300,
                params: vec![(
                    "net0".to_string(),
                    "virtio=BC:24:11:00:00:01,bridge=vmbr0,firewall=1,link_down=1".to_string()
                )],
            }]
        );
    }

    #[tokio::test]
    async fn test_connect_clears_link_down() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 300).await.unwrap();

        vm.connect_network_adapter(1).await.unwrap();
        assert_eq!(
            api.writes(),
            vec![ApiCall::UpdateVmConfig {
                node: "pve1".to_string(),
                vmid: 300,
                params: vec![(
                    "net1".to_string(),
                    "virtio=BC:24:11:00:00:02,bridge=vmbr1,link_down=0".to_string()
                )],
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_adapter_is_validation_error() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 300).await.unwrap();

        let err = vm.connect_network_adapter(2).await.unwrap_err();
        assert!(matches!(err, ProxmoxError::Validation { .. }));
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_index_checked_before_any_call() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 300).await.unwrap();
        api.clear_calls();

        assert!(vm.disconnect_network_adapter(40).await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_disconnect_single_write_skips_missing() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 300).await.unwrap();

        let written = vm.disconnect_network_adapters(&[0, 1, 2]).await.unwrap();
        assert_eq!(written, vec![0, 1]);

        let writes = api.writes();
        assert_eq!(writes.len(), 1);
        match &writes[0] {
            ApiCall::UpdateVmConfig { params, .. } => {
                assert_eq!(params.len(), 2);
                assert!(params.iter().all(|(_, value)| value.ends_with("link_down=1")));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }
}
