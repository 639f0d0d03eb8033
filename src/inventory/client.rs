use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::config::credentials::redact_credentials;
use crate::config::InventorySettings;
use crate::errors::{with_retry, ConnectorError, RetryConfig};
use super::api::InventoryApi;
use tracing::debug;

const API_KEY_HEADER: &str = "Censys-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the attack surface management inventory API.
pub struct AsmClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryConfig,
}

impl AsmClient {
    pub fn new(settings: &InventorySettings) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConnectorError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: settings.retry_config(),
        })
    }

    fn seeds_url(&self) -> String {
        format!("{}/v1/seeds", self.base_url)
    }

    fn add_cloud_assets_url(&self) -> String {
        format!("{}/beta/cloudConnector/addCloudAssets", self.base_url)
    }

    async fn read_response(&self, resp: reqwest::Response) -> Result<Value, ConnectorError> {
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| ConnectorError::Network(format!("Failed to read inventory response: {}", e)))?;
        let text = redact_credentials(&text, &[&self.api_key]);
        interpret_response(status, &text)
    }
}

fn transport_error(e: reqwest::Error) -> ConnectorError {
    if e.is_timeout() {
        ConnectorError::Timeout(format!("Inventory request timed out: {}", e))
    } else {
        ConnectorError::Network(format!("Inventory request failed: {}", e))
    }
}

/// Map a status code and body to the decoded JSON or the matching error.
/// The inventory reports some failures as a 200 with an `error` field; a
/// null or empty `error` is not a failure.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<Value, ConnectorError> {
    if status == 429 {
        return Err(ConnectorError::RateLimit("Inventory API rate limit".into()));
    }
    if status == 401 || status == 403 {
        return Err(ConnectorError::Authentication(format!("Inventory API rejected credentials ({})", status)));
    }

    let data: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) if (200..300).contains(&status) => {
                return Err(ConnectorError::api(status, format!("Invalid JSON in inventory response: {}", e)));
            }
            Err(_) => return Err(ConnectorError::api(status, body.to_string())),
        }
    };

    let error = data
        .get("error")
        .filter(|e| !e.is_null() && e.as_str() != Some(""));
    if let Some(error) = error {
        return Err(ConnectorError::Api {
            status,
            message: error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()),
            code: data.get("errorCode").and_then(Value::as_i64),
        });
    }
    if !(200..300).contains(&status) {
        return Err(ConnectorError::api(status, body.to_string()));
    }
    Ok(data)
}

#[async_trait]
impl InventoryApi for AsmClient {
    async fn replace_seeds_by_label(
        &self,
        label: &str,
        seeds: &[Value],
        force: bool,
    ) -> Result<(), ConnectorError> {
        let body = json!({ "seeds": seeds });
        let force = if force { "true" } else { "false" };

        with_retry("replace_seeds_by_label", &self.retry, || async {
            let resp = self.client
                .put(self.seeds_url())
                .query(&[("label", label), ("force", force)])
                .header(API_KEY_HEADER, &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(transport_error)?;
            self.read_response(resp).await
        }).await?;

        debug!(label, count = seeds.len(), "Replaced seeds by label");
        Ok(())
    }

    async fn add_cloud_assets(&self, uid: &str, assets: &[Value]) -> Result<(), ConnectorError> {
        let body = json!({
            "cloudConnectorUid": uid,
            "cloudAssets": assets,
        });

        with_retry("add_cloud_assets", &self.retry, || async {
            let resp = self.client
                .post(self.add_cloud_assets_url())
                .header(API_KEY_HEADER, &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(transport_error)?;
            self.read_response(resp).await
        }).await?;

        debug!(uid, count = assets.len(), "Added cloud assets");
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
