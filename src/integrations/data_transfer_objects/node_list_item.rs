use serde::{Deserialize, Serialize};

/// One entry of `GET /nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeListItem {
    pub node: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub maxcpu: Option<f64>,
    #[serde(default)]
    pub mem: Option<u64>,
    #[serde(default)]
    pub maxmem: Option<u64>,
    #[serde(default)]
    pub uptime: Option<u64>,
}

impl NodeListItem {
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}

#[test]
fn test_node_list_item_decodes_partial_entry() {
    let item: NodeListItem =
        serde_json::from_value(serde_json::json!({"node": "pve2", "status": "offline"})).unwrap();
    assert_eq!(item.node, "pve2");
    assert!(!item.is_online());
    assert_eq!(item.uptime, None);
}
