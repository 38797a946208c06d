//! HTTP transport for the gateway.
//!
//! Each call is `POST {base_url}/invoke/{command}` with the argument object
//! as JSON body. A 2xx response body is the result; anything else is a
//! rejection carrying the response text.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::Gateway;
use crate::error::{ConfigError, GatewayError};

pub struct HttpGateway {
    base_url: Url,
    http_client: Client,
}

impl HttpGateway {
    /// Create a gateway rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the URL does not parse or
    /// cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "gateway.base_url".into(),
            message: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "gateway.base_url".into(),
                message: format!("'{base_url}' cannot be used as a base URL"),
            });
        }
        // Url::join drops the last segment unless the path ends in a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            http_client: Client::new(),
        })
    }

    fn endpoint(&self, command: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(&format!("invoke/{command}"))
            .map_err(|e| GatewayError::transport(command, e.to_string()))
    }
}

/// Backends usually send their error as a bare JSON string; unwrap it.
fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status.to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(obj)) => obj
            .get("error")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn invoke(&self, command: &str, args: Option<Value>) -> Result<Value, GatewayError> {
        let url = self.endpoint(command)?;
        let body = args.unwrap_or_else(|| Value::Object(Default::default()));

        tracing::trace!(%url, "invoking backend");

        let resp = self
            .http_client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(command, e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GatewayError::transport(command, e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::rejected(
                command,
                rejection_message(status, &text),
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::decode(command, e.to_string()))
    }
}
