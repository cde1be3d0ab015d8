use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::utils::expand_tilde;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const DEFAULT_PORT: u16 = 8006;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_KEYS: [&str; 6] = [
    "PROXMOX_HOST",
    "PROXMOX_PORT",
    "PROXMOX_TOKEN_ID",
    "PROXMOX_TOKEN_SECRET",
    "PROXMOX_VERIFY_TLS",
    "PROXMOX_TIMEOUT_SECS",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigVar {
    pub key: String,
    pub value: String,
}

impl ConfigVar {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_suffix = match self.value.char_indices().rev().nth(3) {
            Some((start, _)) => &self.value[start..],
            None => &self.value[..],
        };

        write!(f, "{}: \"****{}\"", self.key, masked_suffix)
    }
}

pub trait ConfigVarFinder {
    /// Returns a reference to the ConfigVar with the given key, if found.
    fn get_var(&self, key: &str) -> Option<&ConfigVar>;

    /// Returns the value associated with the given key, if found.
    fn get_value(&self, key: &str) -> Option<&str>;
}

impl ConfigVarFinder for [ConfigVar] {
    // Later entries win, so environment values pushed after file values override them.
    fn get_var(&self, key: &str) -> Option<&ConfigVar> {
        self.iter().rev().find(|cv| cv.key == key)
    }

    fn get_value(&self, key: &str) -> Option<&str> {
        self.get_var(key).map(|cv| cv.value.as_str())
    }
}

/// Optional connection settings read from the YAML config file.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub token_id: Option<String>,
    pub token_secret: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> ProxmoxResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                error!("{:?}", e);
                return Err(ProxmoxError::Config(format!(
                    "Unable to read config file '{}'",
                    path.display()
                )));
            }
        };

        match serde_yaml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                error!("{:?}", e);
                Err(ProxmoxError::Config(format!(
                    "Invalid YAML in config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    fn into_config_vars(self) -> Vec<ConfigVar> {
        let mut config_vars = vec![];
        let entries = [
            ("PROXMOX_HOST", self.host),
            ("PROXMOX_PORT", self.port.map(|p| p.to_string())),
            ("PROXMOX_TOKEN_ID", self.token_id),
            ("PROXMOX_TOKEN_SECRET", self.token_secret),
            ("PROXMOX_VERIFY_TLS", self.verify_tls.map(|v| v.to_string())),
            ("PROXMOX_TIMEOUT_SECS", self.timeout_secs.map(|t| t.to_string())),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                config_vars.push(ConfigVar::new(key, &value));
            }
        }
        config_vars
    }
}

/// Everything needed to open a connection to one Proxmox VE API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// API token identifier, `user@realm!token-name`.
    pub token_id: String,
    pub token_secret: String,
    pub verify_tls: bool,
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    /// Loads settings from the config file (if any) and the process environment.
    /// Environment variables override values from the file.
    pub fn load(config_path: Option<&str>) -> ProxmoxResult<Self> {
        let mut config_vars = match Self::resolve_config_path(config_path) {
            Some(path) => {
                info!("Loading configuration from '{}'", path.display());
                ConfigFile::read(&path)?.into_config_vars()
            }
            None => vec![],
        };

        for key in ENV_KEYS {
            if let Ok(value) = std::env::var(key) {
                config_vars.push(ConfigVar::new(key, &value));
            }
        }

        Self::from_config_vars(&config_vars)
    }

    fn resolve_config_path(config_path: Option<&str>) -> Option<PathBuf> {
        match config_path {
            Some(path) => Some(PathBuf::from(expand_tilde(path))),
            None => {
                let default_path = dirs::config_dir()?.join("pvetool").join("config.yaml");
                default_path.exists().then_some(default_path)
            }
        }
    }

    pub fn from_config_vars(config_vars: &[ConfigVar]) -> ProxmoxResult<Self> {
        let host = match config_vars.get_value("PROXMOX_HOST") {
            Some(host) if !host.trim().is_empty() => host.trim().to_string(),
            _ => {
                return Err(ProxmoxError::Config(
                    "Key 'PROXMOX_HOST' not found in config".to_string(),
                ));
            }
        };
        let token_id = match config_vars.get_value("PROXMOX_TOKEN_ID") {
            Some(token_id) => token_id.to_string(),
            None => {
                return Err(ProxmoxError::Config(
                    "Key 'PROXMOX_TOKEN_ID' not found in config".to_string(),
                ));
            }
        };
        let token_secret = match config_vars.get_value("PROXMOX_TOKEN_SECRET") {
            Some(token_secret) => token_secret.to_string(),
            None => {
                return Err(ProxmoxError::Config(
                    "Key 'PROXMOX_TOKEN_SECRET' not found in config".to_string(),
                ));
            }
        };

        let port = parse_or_default(config_vars, "PROXMOX_PORT", DEFAULT_PORT)?;
        let verify_tls = parse_or_default(config_vars, "PROXMOX_VERIFY_TLS", true)?;
        let timeout_secs =
            parse_or_default(config_vars, "PROXMOX_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            host,
            port,
            token_id,
            token_secret,
            verify_tls,
            timeout_secs,
        })
    }

    pub fn authorization_header(&self) -> String {
        format!("PVEAPIToken={}={}", self.token_id, self.token_secret)
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = ConfigVar::new("secret", &self.token_secret);
        write!(
            f,
            "{}@{}:{} ({})",
            self.token_id, self.host, self.port, secret
        )
    }
}

fn parse_or_default<T: std::str::FromStr>(
    config_vars: &[ConfigVar],
    key: &str,
    default: T,
) -> ProxmoxResult<T> {
    match config_vars.get_value(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            ProxmoxError::Config(format!("Invalid value '{}' for key '{}'", raw, key))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_vars() -> Vec<ConfigVar> {
        vec![
            ConfigVar::new("PROXMOX_HOST", "pve.example.org"),
            ConfigVar::new("PROXMOX_TOKEN_ID", "automation@pve!ops"),
            ConfigVar::new("PROXMOX_TOKEN_SECRET", "6f1c2d3e-aaaa-bbbb-cccc-0123456789ab"),
        ]
    }

    #[test]
    fn test_defaults_applied_when_optional_keys_missing() {
        let config = ConnectionConfig::from_config_vars(&required_vars()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.verify_tls);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_later_values_override_earlier_ones() {
        let mut vars = required_vars();
        vars.push(ConfigVar::new("PROXMOX_PORT", "8443"));
        vars.push(ConfigVar::new("PROXMOX_HOST", "pve2.example.org"));

        let config = ConnectionConfig::from_config_vars(&vars).unwrap();
        assert_eq!(config.host, "pve2.example.org");
        assert_eq!(config.port, 8443);
    }

    #[test]
    fn test_missing_token_secret_is_config_error() {
        let vars = &required_vars()[..2];
        let err = ConnectionConfig::from_config_vars(vars).unwrap_err();
        assert!(matches!(err, ProxmoxError::Config(_)));
        assert!(err.to_string().contains("PROXMOX_TOKEN_SECRET"));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut vars = required_vars();
        vars.push(ConfigVar::new("PROXMOX_PORT", "eighty"));
        assert!(ConnectionConfig::from_config_vars(&vars).is_err());
    }

    #[test]
    fn test_config_file_values_become_vars() {
        let file: ConfigFile = serde_yaml::from_str(
            "host: pve.lab\ntoken_id: root@pam!cli\ntoken_secret: abcdef\nverify_tls: false\n",
        )
        .unwrap();
        let config = ConnectionConfig::from_config_vars(&file.into_config_vars()).unwrap();
        assert_eq!(config.host, "pve.lab");
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_display_masks_non_ascii_secret() {
        let var = ConfigVar::new("PROXMOX_TOKEN_SECRET", "geheimnis-äöüß");
        assert_eq!(var.to_string(), "PROXMOX_TOKEN_SECRET: \"****äöüß\"");
        assert_eq!(ConfigVar::new("k", "äb").to_string(), "k: \"****äb\"");
    }

    #[test]
    fn test_display_masks_secret() {
        let config = ConnectionConfig::from_config_vars(&required_vars()).unwrap();
        let shown = config.to_string();
        assert!(shown.contains("****89ab"));
        assert!(!shown.contains("6f1c2d3e"));
        assert_eq!(
            config.authorization_header(),
            "PVEAPIToken=automation@pve!ops=6f1c2d3e-aaaa-bbbb-cccc-0123456789ab"
        );
    }
}
