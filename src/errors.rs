use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxmoxError {
    #[error("VM with ID {vmid} not found in the Proxmox cluster")]
    VmNotFound { vmid: u32 },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Failed communicating with the Proxmox API: {0}")]
    Connection(String),

    #[error("Proxmox API returned error status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Proxmox API response: {0}")]
    Response(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProxmoxError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ProxmoxError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ProxmoxError::Connection(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProxmoxError::VmNotFound { .. })
    }
}

impl From<reqwest::Error> for ProxmoxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProxmoxError::Response(err.to_string())
        } else if let Some(status) = err.status() {
            ProxmoxError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ProxmoxError::Connection(err.to_string())
        }
    }
}

pub type ProxmoxResult<T> = Result<T, ProxmoxError>;

#[test]
fn test_validation_error_display() {
    let err = ProxmoxError::validation("memory", "must be at least 1 GB");
    assert_eq!(err.to_string(), "Invalid memory: must be at least 1 GB");
    assert!(!err.is_connection());
}

#[test]
fn test_not_found_error_display() {
    let err = ProxmoxError::VmNotFound { vmid: 404 };
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "VM with ID 404 not found in the Proxmox cluster"
    );
}
