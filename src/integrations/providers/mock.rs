use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::{
    ClusterResource, HaResource, HaState, NodeListItem, PowerAction, VmConfig,
};

use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchNodes,
    FetchNodeStatus(String),
    FetchVmResources,
    FetchVmConfig {
        node: String,
        vmid: u32,
    },
    UpdateVmConfig {
        node: String,
        vmid: u32,
        params: Vec<(String, String)>,
    },
    PowerAction {
        node: String,
        vmid: u32,
        action: PowerAction,
    },
    Migration {
        node: String,
        vmid: u32,
        target: String,
        online: bool,
    },
    FetchHaResources,
    CreateHaResource {
        sid: String,
        group: String,
        state: HaState,
    },
    UpdateHaResource {
        sid: String,
        state: HaState,
    },
    DeleteHaResource {
        sid: String,
    },
    UpdatePool {
        pool: String,
        vmid: u32,
        allow_move: bool,
    },
}

impl ApiCall {
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            ApiCall::FetchNodes
                | ApiCall::FetchNodeStatus(_)
                | ApiCall::FetchVmResources
                | ApiCall::FetchVmConfig { .. }
                | ApiCall::FetchHaResources
        )
    }
}

/// In-memory cluster serving canned records and recording every request.
#[derive(Default)]
pub struct MockCluster {
    pub nodes: Vec<NodeListItem>,
    pub resources: Vec<ClusterResource>,
    pub configs: HashMap<u32, VmConfig>,
    pub ha_resources: Vec<HaResource>,
    /// Nodes whose status probe fails before an HTTP response arrives.
    pub unreachable_nodes: Vec<String>,
    /// Nodes whose status probe is answered with this API error status.
    pub failing_node_status: Option<u16>,
    /// When set, every write is rejected by the API with this status.
    pub reject_writes: Option<u16>,
    calls: RefCell<Vec<ApiCall>>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: &str) -> Self {
        self.nodes.push(NodeListItem {
            node: node.to_string(),
            status: Some("online".to_string()),
            ..Default::default()
        });
        self
    }

    pub fn with_resource(mut self, resource: JsonValue) -> Self {
        let resource: ClusterResource =
            serde_json::from_value(resource).expect("invalid cluster resource fixture");
        self.resources.push(resource);
        self
    }

    pub fn with_config(mut self, vmid: u32, config: JsonValue) -> Self {
        let config: VmConfig = serde_json::from_value(config).expect("invalid config fixture");
        self.configs.insert(vmid, config);
        self
    }

    pub fn with_ha_resource(mut self, resource: JsonValue) -> Self {
        let resource: HaResource =
            serde_json::from_value(resource).expect("invalid ha resource fixture");
        self.ha_resources.push(resource);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: ApiCall) -> ProxmoxResult<()> {
        let is_write = call.is_write();
        self.calls.borrow_mut().push(call);
        match self.reject_writes {
            Some(status) if is_write => Err(ProxmoxError::Api {
                status,
                message: "rejected by mock".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn upid(kind: &str, vmid: u32) -> String {
        format!("UPID:mock:00000001:00000001:00000001:{}:{}:root@pam:", kind, vmid)
    }
}

/// Minimal `/cluster/resources` entry for a QEMU VM.
pub fn vm_resource(vmid: u32, node: &str, status: &str) -> JsonValue {
    serde_json::json!({
        "id": format!("qemu/{}", vmid),
        "type": "qemu",
        "vmid": vmid,
        "node": node,
        "name": format!("vm-{}", vmid),
        "status": status,
        "maxcpu": 2,
        "maxmem": 2147483648u64,
    })
}

impl ClusterInterface for MockCluster {
    async fn fetch_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.record(ApiCall::FetchNodes)?;
        Ok(self.nodes.clone())
    }

    async fn fetch_node_status(&self, node: &str) -> ProxmoxResult<JsonValue> {
        self.record(ApiCall::FetchNodeStatus(node.to_string()))?;
        if self.unreachable_nodes.iter().any(|n| n == node) {
            return Err(ProxmoxError::Connection(format!(
                "error trying to connect to {}",
                node
            )));
        }
        if let Some(status) = self.failing_node_status {
            return Err(ProxmoxError::Api {
                status,
                message: "probe failed".to_string(),
            });
        }
        Ok(serde_json::json!({"uptime": 1000, "cpu": 0.05}))
    }

    async fn fetch_vm_resources(&self) -> ProxmoxResult<Vec<ClusterResource>> {
        self.record(ApiCall::FetchVmResources)?;
        Ok(self.resources.clone())
    }

    async fn fetch_vm_config(&self, node: &str, vmid: u32) -> ProxmoxResult<VmConfig> {
        self.record(ApiCall::FetchVmConfig {
            node: node.to_string(),
            vmid,
        })?;
        match self.configs.get(&vmid) {
            Some(config) => Ok(config.clone()),
            None => Err(ProxmoxError::Api {
                status: 500,
                message: format!("Configuration file 'nodes/{}/qemu-server/{}.conf' does not exist", node, vmid),
            }),
        }
    }

    async fn update_vm_config(
        &self,
        node: &str,
        vmid: u32,
        params: &[(&str, String)],
    ) -> ProxmoxResult<()> {
        self.record(ApiCall::UpdateVmConfig {
            node: node.to_string(),
            vmid,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        })
    }

    async fn post_power_action(
        &self,
        node: &str,
        vmid: u32,
        action: PowerAction,
    ) -> ProxmoxResult<String> {
        self.record(ApiCall::PowerAction {
            node: node.to_string(),
            vmid,
            action,
        })?;
        Ok(Self::upid(&format!("qm{}", action), vmid))
    }

    async fn post_migration(
        &self,
        node: &str,
        vmid: u32,
        target: &str,
        online: bool,
    ) -> ProxmoxResult<String> {
        self.record(ApiCall::Migration {
            node: node.to_string(),
            vmid,
            target: target.to_string(),
            online,
        })?;
        Ok(Self::upid("qmigrate", vmid))
    }

    async fn fetch_ha_resources(&self) -> ProxmoxResult<Vec<HaResource>> {
        self.record(ApiCall::FetchHaResources)?;
        Ok(self.ha_resources.clone())
    }

    async fn create_ha_resource(
        &self,
        sid: &str,
        group: &str,
        state: HaState,
    ) -> ProxmoxResult<()> {
        self.record(ApiCall::CreateHaResource {
            sid: sid.to_string(),
            group: group.to_string(),
            state,
        })
    }

    async fn update_ha_resource(&self, sid: &str, state: HaState) -> ProxmoxResult<()> {
        self.record(ApiCall::UpdateHaResource {
            sid: sid.to_string(),
            state,
        })
    }

    async fn delete_ha_resource(&self, sid: &str) -> ProxmoxResult<()> {
        self.record(ApiCall::DeleteHaResource {
            sid: sid.to_string(),
        })
    }

    async fn update_pool_members(
        &self,
        pool: &str,
        vmid: u32,
        allow_move: bool,
    ) -> ProxmoxResult<()> {
        self.record(ApiCall::UpdatePool {
            pool: pool.to_string(),
            vmid,
            allow_move,
        })
    }
}
