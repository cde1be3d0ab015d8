use crate::errors::ProxmoxResult;
use crate::integrations::data_transfer_objects::{
    ClusterResource, HaResource, HaState, NodeListItem, PowerAction, VmConfig,
};

use serde_json::Value as JsonValue;

/// Remote operations of a Proxmox VE cluster consumed by this tool.
///
/// Every method maps to a single API request. Writes return once the API has
/// accepted the request; long-running actions return the task UPID.
pub trait ClusterInterface {
    async fn fetch_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>>;

    async fn fetch_node_status(&self, node: &str) -> ProxmoxResult<JsonValue>;

    async fn fetch_vm_resources(&self) -> ProxmoxResult<Vec<ClusterResource>>;

    async fn fetch_vm_config(&self, node: &str, vmid: u32) -> ProxmoxResult<VmConfig>;

    async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        params: &[(&str, String)],
    ) -> ProxmoxResult<()>;

    async fn post_power_action(
        &self,
        node: &str,
        vmid: u32,
        action: PowerAction,
    ) -> ProxmoxResult<String>;

    async fn post_migration(
        &self,
        node: &str,
        vmid: u32,
        target: &str,
        online: bool,
    ) -> ProxmoxResult<String>;

    async fn fetch_ha_resources(&self) -> ProxmoxResult<Vec<HaResource>>;

    async fn create_ha_resource(&self, sid: &str, group: &str, state: HaState)
    -> ProxmoxResult<()>;

    async fn update_ha_resource(&self, sid: &str, state: HaState) -> ProxmoxResult<()>;

    async fn delete_ha_resource(&self, sid: &str) -> ProxmoxResult<()>;

    async fn update_pool_members(
        &self,
        pool: &str,
        vmid: u32,
        allow_move: bool,
    ) -> ProxmoxResult<()>;
}
