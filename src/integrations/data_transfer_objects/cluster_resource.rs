use serde::{Deserialize, Serialize};

/// One entry of `GET /cluster/resources?type=vm`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterResource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub vmid: Option<u32>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Semicolon separated tag list.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub disk: Option<u64>,
    #[serde(default)]
    pub mem: Option<u64>,
    #[serde(default)]
    pub maxcpu: Option<f64>,
    #[serde(default)]
    pub maxdisk: Option<u64>,
    #[serde(default)]
    pub maxmem: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub uptime: Option<u64>,
}

impl ClusterResource {
    pub fn is_qemu(&self) -> bool {
        self.resource_type == "qemu"
    }

    pub fn tag_list(&self) -> Vec<String> {
        match &self.tags {
            Some(tags) => tags
                .split([';', ',', ' '])
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .map(String::from)
                .collect(),
            None => vec![],
        }
    }
}

#[test]
fn test_tag_list_accepts_all_separators() {
    let resource = ClusterResource {
        tags: Some("prod;web, dmz ".to_string()),
        ..Default::default()
    };
    assert_eq!(resource.tag_list(), vec!["prod", "web", "dmz"]);
}

#[test]
fn test_cluster_resource_decodes_api_entry() {
    let resource: ClusterResource = serde_json::from_value(serde_json::json!({
        "id": "qemu/101",
        "type": "qemu",
        "vmid": 101,
        "node": "pve1",
        "status": "running",
        "maxcpu": 4,
        "maxmem": 4294967296u64,
    }))
    .unwrap();
    assert!(resource.is_qemu());
    assert_eq!(resource.maxcpu, Some(4.0));
    assert_eq!(resource.pool, None);
}
