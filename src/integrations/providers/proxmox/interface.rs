use crate::config::ConnectionConfig;
use crate::errors::{ProxmoxError, ProxmoxResult};

use reqwest::{Client as HttpClient, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, error};

pub struct ProxmoxInterface {
    pub config: ConnectionConfig,
    http_client: HttpClient,
}

impl ProxmoxInterface {
    pub const API_PATH: &'static str = "/api2/json";

    pub fn new(config: ConnectionConfig) -> ProxmoxResult<Self> {
        let http_client = Self::get_http_client(&config)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn get_http_client(config: &ConnectionConfig) -> ProxmoxResult<HttpClient> {
        let mut headers = header::HeaderMap::new();
        let auth_header = match header::HeaderValue::from_str(&config.authorization_header()) {
            Ok(header) => header,
            Err(e) => {
                error!("{:?}", e);
                return Err(ProxmoxError::Config(
                    "Failed to create Proxmox authorization header".to_string(),
                ));
            }
        };
        headers.insert(header::AUTHORIZATION, auth_header);

        match HttpClient::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => Ok(client),
            Err(e) => {
                error!("{:?}", e);
                Err(ProxmoxError::Config(
                    "Failed building Proxmox HTTP client".to_string(),
                ))
            }
        }
    }

    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "https://{}:{}{}{}",
            self.config.host,
            self.config.port,
            Self::API_PATH,
            endpoint
        )
    }

    /// Sends one request and returns the contents of the `data` envelope.
    /// GET and DELETE carry `params` in the query string, PUT and POST as a form body.
    pub async fn make_api_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ProxmoxResult<JsonValue> {
        let url = self.api_url(endpoint);
        debug!("{} {}", method, url);

        let request = if method == Method::GET || method == Method::DELETE {
            self.http_client.request(method, &url).query(params)
        } else {
            self.http_client.request(method, &url).form(params)
        };

        let response = match request.send().await {
            Ok(result) => result,
            Err(e) => {
                error!("{:?}", e);
                return Err(e.into());
            }
        };

        let response_status = response.status();
        if !response_status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    error!("Unable to read HTTP response body: {:?}", e);
                    String::new()
                }
            };
            let message = error_message(response_status, &body);
            error!(
                "Proxmox API returned error status {} for {}: {}",
                response_status, endpoint, message
            );
            return Err(ProxmoxError::Api {
                status: response_status.as_u16(),
                message,
            });
        }

        let json_response: JsonValue = match response.json().await {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to parse Proxmox API response: {:?}", e);
                return Err(ProxmoxError::Response(e.to_string()));
            }
        };

        Ok(unwrap_data(json_response))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ProxmoxResult<T> {
        let data = self.make_api_request(Method::GET, endpoint, &[]).await?;
        decode(data, endpoint)
    }
}

pub(super) fn decode<T: DeserializeOwned>(data: JsonValue, endpoint: &str) -> ProxmoxResult<T> {
    match serde_json::from_value(data) {
        Ok(result) => Ok(result),
        Err(e) => {
            error!("Unexpected payload from {}: {:?}", endpoint, e);
            Err(ProxmoxError::Response(format!(
                "Unexpected payload from {}: {}",
                endpoint, e
            )))
        }
    }
}

fn unwrap_data(mut json_response: JsonValue) -> JsonValue {
    match json_response.get_mut("data") {
        Some(data) => data.take(),
        None => JsonValue::Null,
    }
}

/// Proxmox reports parameter failures as `{"errors": {"param": "reason"}}` and
/// everything else through the status line, so fall back to the body text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<JsonValue>(body) {
        if let Some(errors) = json["errors"].as_object() {
            let details = errors
                .iter()
                .map(|(param, reason)| match reason.as_str() {
                    Some(reason) => format!("{}: {}", param, reason.trim()),
                    None => format!("{}: {}", param, reason),
                })
                .collect::<Vec<String>>()
                .join("; ");
            if !details.is_empty() {
                return details;
            }
        }
        if let Some(message) = json["message"].as_str() {
            return message.trim().to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
