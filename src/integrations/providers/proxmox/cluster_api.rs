use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::{
    ClusterResource, HaResource, HaState, NodeListItem, PowerAction, VmConfig,
};

use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::info;

use super::interface::{ProxmoxInterface, decode};

impl ProxmoxInterface {
    fn qemu_endpoint(node: &str, vmid: u32, suffix: &str) -> String {
        format!("/nodes/{}/qemu/{}{}", node, vmid, suffix)
    }

    // Task-starting endpoints answer with the task UPID as a bare string.
    fn task_id(data: JsonValue, endpoint: &str) -> ProxmoxResult<String> {
        match data.as_str() {
            Some(upid) => Ok(upid.to_string()),
            None => Err(ProxmoxError::Response(format!(
                "Missing task UPID in response from {}",
                endpoint
            ))),
        }
    }
}

impl ClusterInterface for ProxmoxInterface {
    async fn fetch_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.get("/nodes").await
    }

    async fn fetch_node_status(&self, node: &str) -> ProxmoxResult<JsonValue> {
        self.get(&format!("/nodes/{}/status", node)).await
    }

    async fn fetch_vm_resources(&self) -> ProxmoxResult<Vec<ClusterResource>> {
        let endpoint = "/cluster/resources";
        let data = self
            .make_api_request(Method::GET, endpoint, &[("type", "vm".to_string())])
            .await?;
        decode(data, endpoint)
    }

    async fn fetch_vm_config(&self, node: &str, vmid: u32) -> ProxmoxResult<VmConfig> {
        self.get(&Self::qemu_endpoint(node, vmid, "/config")).await
    }

    async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        params: &[(&str, String)],
    ) -> ProxmoxResult<()> {
        let endpoint = Self::qemu_endpoint(node, vmid, "/config");
        self.make_api_request(Method::PUT, &endpoint, params).await?;
        info!("Updated config of VM {} on '{}'", vmid, node);
        Ok(())
    }

    async fn post_power_action(
        &self,
        node: &str,
        vmid: u32,
        action: PowerAction,
    ) -> ProxmoxResult<String> {
        let endpoint = Self::qemu_endpoint(node, vmid, &format!("/status/{}", action));
        let data = self.make_api_request(Method::POST, &endpoint, &[]).await?;
        Self::task_id(data, &endpoint)
    }

    async fn post_migration(
        &self,
        node: &str,
        vmid: u32,
        target: &str,
        online: bool,
    ) -> ProxmoxResult<String> {
        let endpoint = Self::qemu_endpoint(node, vmid, "/migrate");
        let params = [
            ("target", target.to_string()),
            ("online", u8::from(online).to_string()),
        ];
        let data = self
            .make_api_request(Method::POST, &endpoint, &params)
            .await?;
        Self::task_id(data, &endpoint)
    }

    async fn fetch_ha_resources(&self) -> ProxmoxResult<Vec<HaResource>> {
        self.get("/cluster/ha/resources").await
    }

    async fn create_ha_resource(
        &self,
        sid: &str,
        group: &str,
        state: HaState,
    ) -> ProxmoxResult<()> {
        let params = [
            ("sid", sid.to_string()),
            ("group", group.to_string()),
            ("state", state.to_string()),
        ];
        self.make_api_request(Method::POST, "/cluster/ha/resources", &params)
            .await?;
        Ok(())
    }

    async fn update_ha_resource(&self, sid: &str, state: HaState) -> ProxmoxResult<()> {
        let endpoint = format!("/cluster/ha/resources/{}", sid);
        self.make_api_request(Method::PUT, &endpoint, &[("state", state.to_string())])
            .await?;
        Ok(())
    }

    async fn delete_ha_resource(&self, sid: &str) -> ProxmoxResult<()> {
        let endpoint = format!("/cluster/ha/resources/{}", sid);
        self.make_api_request(Method::DELETE, &endpoint, &[]).await?;
        Ok(())
    }

    async fn update_pool_members(
        &self,
        pool: &str,
        vmid: u32,
        allow_move: bool,
    ) -> ProxmoxResult<()> {
        let endpoint = format!("/pools/{}", pool);
        let params = [
            ("vms", vmid.to_string()),
            ("allow-move", u8::from(allow_move).to_string()),
        ];
        self.make_api_request(Method::PUT, &endpoint, &params).await?;
        Ok(())
    }
}

#[test]
fn test_qemu_endpoint() {
    assert_eq!(
        ProxmoxInterface::qemu_endpoint("pve1", 101, "/status/start"),
        "/nodes/pve1/qemu/101/status/start"
    );
}

#[test]
fn test_task_id_requires_string_payload() {
    let upid = "UPID:pve1:0001A2B3:0C4D5E6F:65000000:qmstart:101:root@pam:";
    assert_eq!(
        ProxmoxInterface::task_id(JsonValue::from(upid), "/x").unwrap(),
        upid
    );
    assert!(ProxmoxInterface::task_id(JsonValue::Null, "/x").is_err());
}
