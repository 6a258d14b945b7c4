use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::DataSource;
use crate::config::CmsSettings;
use crate::error::FetchError;

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// HTTP client for the headless CMS query endpoint.
pub struct CmsClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(settings: &CmsSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: query_endpoint(settings),
            token: settings.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn query_endpoint(settings: &CmsSettings) -> String {
    format!(
        "{}/v{}/data/query/{}",
        settings.base_url.trim_end_matches('/'),
        settings.api_version.trim_start_matches('v'),
        settings.dataset
    )
}

#[async_trait]
impl DataSource for CmsClient {
    #[instrument(skip(self, query), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, query: &str) -> Result<Vec<Value>, FetchError> {
        debug!("Sending query");
        let mut request = self.client.get(&self.endpoint).query(&[("query", query)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, "CMS query rejected");
            return Err(FetchError::Status { status, body });
        }

        let body: QueryResponse = response.json().await?;
        records_from_result(body.result)
    }
}

/// Queries in this dashboard always select arrays; a single document or
/// `null` is normalised so callers only ever see a list.
fn records_from_result(result: Value) -> Result<Vec<Value>, FetchError> {
    match result {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => Ok(vec![result]),
        other => Err(FetchError::Decode(format!(
            "expected an array of records, got {}",
            other
        ))),
    }
}
