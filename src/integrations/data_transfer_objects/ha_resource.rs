use serde::{Deserialize, Serialize};

/// One entry of `GET /cluster/ha/resources`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaResource {
    pub sid: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl HaResource {
    pub fn sid_for_vm(vmid: u32) -> String {
        format!("vm:{}", vmid)
    }

    /// The manager reports failures through `status`; older setups only expose `state`.
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error") || self.state.as_deref() == Some("error")
    }
}

#[test]
fn test_ha_resource_error_detection() {
    let ok = HaResource {
        sid: HaResource::sid_for_vm(100),
        state: Some("started".to_string()),
        ..Default::default()
    };
    let failed = HaResource {
        status: Some("error".to_string()),
        ..ok.clone()
    };
    assert_eq!(ok.sid, "vm:100");
    assert!(!ok.is_error());
    assert!(failed.is_error());
}
