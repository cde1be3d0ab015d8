use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::{HaResource, HaState};

use tracing::{info, warn};

use super::VirtualMachine;

impl<C: ClusterInterface> VirtualMachine<'_, C> {
    pub fn ha_sid(&self) -> String {
        HaResource::sid_for_vm(self.vmid)
    }

    pub async fn ha_registration(&self) -> ProxmoxResult<Option<HaResource>> {
        let sid = self.ha_sid();
        let ha_resources = self.api.fetch_ha_resources().await?;
        Ok(ha_resources.into_iter().find(|resource| resource.sid == sid))
    }

    pub async fn ha_group(&self) -> ProxmoxResult<Option<String>> {
        Ok(self.ha_registration().await?.and_then(|r| r.group))
    }

    pub async fn ha_state(&self) -> ProxmoxResult<Option<String>> {
        Ok(self.ha_registration().await?.and_then(|r| r.state))
    }

    /// Registers the VM in `group` with the `started` request state.
    /// A registration stuck in the error state is removed first.
    pub async fn add_to_ha_group(&self, group: &str) -> ProxmoxResult<()> {
        if group.trim().is_empty() {
            return Err(ProxmoxError::validation("ha group", "name must not be empty"));
        }

        if let Some(registration) = self.ha_registration().await? {
            if registration.is_error() {
                warn!(
                    "HA resource '{}' is in error state, re-registering",
                    registration.sid
                );
                self.remove_from_ha_group().await?;
            }
        }

        let sid = self.ha_sid();
        self.api
            .create_ha_resource(&sid, group, HaState::Started)
            .await?;
        info!("HA resource '{}' added to group '{}'", sid, group);
        Ok(())
    }

    /// Disables, then deletes the VM's HA registration so the manager does not
    /// act on it mid-removal. Returns false when there was nothing to remove.
    pub async fn remove_from_ha_group(&self) -> ProxmoxResult<bool> {
        if self.ha_registration().await?.is_none() {
            return Ok(false);
        }

        let sid = self.ha_sid();
        self.api.update_ha_resource(&sid, HaState::Disabled).await?;
        self.api.delete_ha_resource(&sid).await?;
        info!("HA resource '{}' removed", sid);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::integrations::data_transfer_objects::HaState;
    use crate::integrations::providers::mock::{ApiCall, MockCluster, vm_resource};
    use crate::models::VirtualMachine;
    use serde_json::json;

    fn cluster() -> MockCluster {
        MockCluster::new()
            .with_resource(vm_resource(400, "pve1", "running"))
            .with_resource(vm_resource(401, "pve2", "running"))
            .with_ha_resource(json!({
                "sid": "vm:401",
                "group": "critical",
                "state": "started",
                "status": "started",
            }))
    }

    #[tokio::test]
    async fn test_ha_accessors() {
        let api = cluster();
        let registered = VirtualMachine::fetch(&api, 401).await.unwrap();
        assert_eq!(registered.ha_group().await.unwrap(), Some("critical".to_string()));
        assert_eq!(registered.ha_state().await.unwrap(), Some("started".to_string()));

        let unregistered = VirtualMachine::fetch(&api, 400).await.unwrap();
        assert_eq!(unregistered.ha_group().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_creates_started_registration() {
        let api = cluster();
        let vm = VirtualMachine::fetch(&api, 400).await.unwrap();

        vm.add_to_ha_group("critical").await.unwrap();
        assert_eq!(
            api.writes(),
            vec![ApiCall::CreateHaResource {
                sid: "vm:400".to_string(),
                group: "critical".to_string(),
                state: HaState::Started,
            }]
        );
    }

    #[tokio::test]
    async fn test_add_removes_errored_registration_first() {
        let api = MockCluster::new()
            .with_resource(vm_resource(402, "pve1", "stopped"))
            .with_ha_resource(json!({
                "sid": "vm:402",
                "group": "old",
                "state": "started",
                "status": "error",
            }));
        let vm = VirtualMachine::fetch(&api, 402).await.unwrap();

        vm.add_to_ha_group("critical").await.unwrap();
        assert_eq!(
            api.writes(),
            vec![
                ApiCall::UpdateHaResource {
                    sid: "vm:402".to_string(),
                    state: HaState::Disabled,
                },
                ApiCall::DeleteHaResource {
                    sid: "vm:402".to_string(),
                },
                ApiCall::CreateHaResource {
                    sid: "vm:402".to_string(),
                    group: "critical".to_string(),
                    state: HaState::Started,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_disables_before_delete() {
        let api = cluster();
        let vm = VirtualMachine::fetch(&api, 401).await.unwrap();

        assert!(vm.remove_from_ha_group().await.unwrap());
        assert_eq!(
            api.writes(),
            vec![
                ApiCall::UpdateHaResource {
                    sid: "vm:401".to_string(),
                    state: HaState::Disabled,
                },
                ApiCall::DeleteHaResource {
                    sid: "vm:401".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_without_registration_is_noop() {
        let api = cluster();
        let vm = VirtualMachine::fetch(&api, 400).await.unwrap();

        assert!(!vm.remove_from_ha_group().await.unwrap());
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_empty_group() {
        let api = cluster();
        let vm = VirtualMachine::fetch(&api, 400).await.unwrap();
        assert!(vm.add_to_ha_group("").await.is_err());
        assert!(api.writes().is_empty());
    }
}
