use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VmStatus {
    Running,
    Stopped,
    Paused,
    #[default]
    Unknown,
}

impl std::fmt::Display for VmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            VmStatus::Running => "running",
            VmStatus::Stopped => "stopped",
            VmStatus::Paused => "paused",
            VmStatus::Unknown => "unknown",
        };
        write!(f, "{}", status_str)
    }
}

impl From<&str> for VmStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "running" => VmStatus::Running,
            "stopped" => VmStatus::Stopped,
            "paused" => VmStatus::Paused,
            _ => VmStatus::Unknown,
        }
    }
}

#[test]
fn test_vm_status_from_api_string() {
    assert_eq!(VmStatus::from("running"), VmStatus::Running);
    assert_eq!(VmStatus::from("STOPPED"), VmStatus::Stopped);
    assert_eq!(VmStatus::from("prelaunch"), VmStatus::Unknown);
    assert_eq!(VmStatus::Paused.to_string(), "paused");
}
