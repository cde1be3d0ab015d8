use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::PowerAction;
use crate::models::VmStatus;

use tracing::{info, warn};

use super::VirtualMachine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerTransition {
    /// The API accepted the action and started task `task`.
    Requested { task: String },
    /// The cached status made the action pointless, nothing was sent.
    Skipped { status: VmStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Migration {
    AlreadyOnTarget,
    Requested { task: String },
    /// The API refused the migration (e.g. local disks or a missing target storage).
    Rejected { status: u16, message: String },
}

impl<C: ClusterInterface> VirtualMachine<'_, C> {
    /// Starts the VM unless it is already running.
    pub async fn start(&mut self) -> ProxmoxResult<PowerTransition> {
        if self.status == VmStatus::Running {
            info!("VM {} is already running", self.vmid);
            return Ok(PowerTransition::Skipped {
                status: self.status,
            });
        }
        self.power_action(PowerAction::Start, VmStatus::Running)
            .await
    }

    /// Stops the VM unless it is already stopped.
    pub async fn stop(&mut self) -> ProxmoxResult<PowerTransition> {
        if self.status == VmStatus::Stopped {
            info!("VM {} is already stopped", self.vmid);
            return Ok(PowerTransition::Skipped {
                status: self.status,
            });
        }
        self.power_action(PowerAction::Stop, VmStatus::Stopped)
            .await
    }

    /// Hard-resets the VM; only a running VM can be reset.
    pub async fn reset(&mut self) -> ProxmoxResult<PowerTransition> {
        if self.status != VmStatus::Running {
            info!("VM {} is {}, not resetting", self.vmid, self.status);
            return Ok(PowerTransition::Skipped {
                status: self.status,
            });
        }
        self.power_action(PowerAction::Reset, VmStatus::Running)
            .await
    }

    async fn power_action(
        &mut self,
        action: PowerAction,
        assumed_status: VmStatus,
    ) -> ProxmoxResult<PowerTransition> {
        let node = self.current_node().await?;
        let task = self.api.post_power_action(&node, self.vmid, action).await?;
        info!("VM {} {} requested (task {})", self.vmid, action, task);

        self.status = assumed_status;
        self.stale = true;
        Ok(PowerTransition::Requested { task })
    }

    /// Live-migrates the VM to `target_node`.
    ///
    /// A fresh handle is compared against its cached node, so a VM already on the
    /// target costs no request at all. A stale handle re-confirms its node first.
    /// The cached node is left alone on success: the move only completes when the
    /// migration task does, and the next write re-locates the VM.
    pub async fn migrate(&mut self, target_node: &str) -> ProxmoxResult<Migration> {
        if target_node.trim().is_empty() {
            return Err(ProxmoxError::validation("target node", "must not be empty"));
        }
        let node = self.current_node().await?;
        if node == target_node {
            info!("VM {} already runs on '{}'", self.vmid, target_node);
            return Ok(Migration::AlreadyOnTarget);
        }

        match self
            .api
            .post_migration(&node, self.vmid, target_node, true)
            .await
        {
            Ok(task) => {
                info!(
                    "VM {} migration '{}' -> '{}' requested (task {})",
                    self.vmid, node, target_node, task
                );
                self.stale = true;
                Ok(Migration::Requested { task })
            }
            Err(ProxmoxError::Api { status, message }) => {
                warn!(
                    "Migration of VM {} to '{}' rejected ({}): {}",
                    self.vmid, target_node, status, message
                );
                Ok(Migration::Rejected { status, message })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ProxmoxError;
    use crate::integrations::data_transfer_objects::PowerAction;
    use crate::integrations::providers::mock::{ApiCall, MockCluster, vm_resource};
    use crate::models::{Migration, PowerTransition, VirtualMachine, VmStatus};

    fn cluster() -> MockCluster {
        MockCluster::new()
            .with_node("pve1")
            .with_node("pve2")
            .with_resource(vm_resource(200, "pve1", "running"))
            .with_resource(vm_resource(201, "pve1", "stopped"))
    }

    #[tokio::test]
    async fn test_start_skips_running_vm() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();

        let transition = vm.start().await.unwrap();
        assert_eq!(
            transition,
            PowerTransition::Skipped {
                status: VmStatus::Running
            }
        );
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn test_start_stopped_vm() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 201).await.unwrap();

        let transition = vm.start().await.unwrap();
        assert!(matches!(transition, PowerTransition::Requested { .. }));
        assert_eq!(vm.status(), VmStatus::Running);
        assert!(vm.is_stale());
        assert_eq!(
            api.writes(),
            vec![ApiCall::PowerAction {
                node: "pve1".to_string(),
                vmid: 201,
                action: PowerAction::Start,
            }]
        );
    }

    #[tokio::test]
    async fn test_stop_then_stop_again_is_skipped() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();

        vm.stop().await.unwrap();
        assert_eq!(vm.status(), VmStatus::Stopped);
        assert!(matches!(
            vm.stop().await.unwrap(),
            PowerTransition::Skipped { .. }
        ));
        assert_eq!(api.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_requires_running_vm() {
        let api = cluster();
        let mut stopped = VirtualMachine::fetch(&api, 201).await.unwrap();
        assert!(matches!(
            stopped.reset().await.unwrap(),
            PowerTransition::Skipped {
                status: VmStatus::Stopped
            }
        ));

        let mut running = VirtualMachine::fetch(&api, 200).await.unwrap();
        assert!(matches!(
            running.reset().await.unwrap(),
            PowerTransition::Requested { .. }
        ));
        assert_eq!(api.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_migrate_to_current_node_makes_no_call() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();
        api.clear_calls();

        assert_eq!(vm.migrate("pve1").await.unwrap(), Migration::AlreadyOnTarget);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_migrate_requests_online_migration() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();

        let migration = vm.migrate("pve2").await.unwrap();
        assert!(matches!(migration, Migration::Requested { .. }));
        assert_eq!(vm.node(), "pve1");
        assert!(vm.is_stale());
        assert_eq!(
            api.writes(),
            vec![ApiCall::Migration {
                node: "pve1".to_string(),
                vmid: 200,
                target: "pve2".to_string(),
                online: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_unfinished_migration_is_retried_and_writes_follow_cluster() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();

        vm.migrate("pve2").await.unwrap();
        // The resource list still places the VM on pve1.
        let retry = vm.migrate("pve2").await.unwrap();
        assert!(matches!(retry, Migration::Requested { .. }));

        api.clear_calls();
        vm.set_memory(4).await.unwrap();
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::FetchVmResources,
                ApiCall::UpdateVmConfig {
                    node: "pve1".to_string(),
                    vmid: 200,
                    params: vec![("memory".to_string(), "4096".to_string())],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stale_handle_on_target_skips_migration() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 201).await.unwrap();
        vm.set_name("batch-01").await.unwrap();
        assert!(vm.is_stale());
        api.clear_calls();

        assert_eq!(vm.migrate("pve1").await.unwrap(), Migration::AlreadyOnTarget);
        assert!(api.writes().is_empty());
        assert_eq!(api.calls(), vec![ApiCall::FetchVmResources]);
    }

    #[tokio::test]
    async fn test_migrate_rejection_is_reported_not_raised() {
        let mut api = cluster();
        api.reject_writes = Some(500);
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();

        let migration = vm.migrate("pve2").await.unwrap();
        assert!(matches!(migration, Migration::Rejected { status: 500, .. }));
        assert_eq!(vm.node(), "pve1");
        assert!(!vm.is_stale());
    }

    #[tokio::test]
    async fn test_migrate_rejects_empty_target() {
        let api = cluster();
        let mut vm = VirtualMachine::fetch(&api, 200).await.unwrap();
        let err = vm.migrate(" ").await.unwrap_err();
        assert!(matches!(err, ProxmoxError::Validation { .. }));
    }
}
