use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Key/value configuration of a single QEMU VM.
///
/// The API is inconsistent about numbers (`"memory": "4096"` and `"memory": 4096`
/// both occur), so numeric getters accept either form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmConfig(pub Map<String, JsonValue>);

impl VmConfig {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            JsonValue::Number(n) => n.as_u64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn network_adapter(&self, index: u8) -> Option<&str> {
        self.get_str(&format!("net{}", index))
    }
}

#[test]
fn test_vm_config_numeric_strings() {
    let config: VmConfig = serde_json::from_value(serde_json::json!({
        "memory": "8192",
        "cores": 2,
        "net0": "virtio=BC:24:11:00:00:01,bridge=vmbr0",
    }))
    .unwrap();
    assert_eq!(config.get_u64("memory"), Some(8192));
    assert_eq!(config.get_u64("cores"), Some(2));
    assert_eq!(config.get_u64("sockets"), None);
    assert!(config.network_adapter(0).unwrap().contains("bridge=vmbr0"));
    assert_eq!(config.network_adapter(1), None);
}
