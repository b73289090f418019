use crate::domain::model::{Volume, VolumeIssue, UNKNOWN};
use crate::domain::ports::MetadataService;
use crate::utils::error::LookupError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// ComicVine-style metadata API client. The caller is responsible for rate
/// limiting; this client only shapes requests and responses.
#[derive(Debug, Clone)]
pub struct ComicVineClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ComicVineClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_results<T: DeserializeOwned>(
        &self,
        resource: &str,
        filter: String,
    ) -> Result<Vec<T>, LookupError> {
        let url = format!("{}/{}/", self.base_url, resource);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("filter", filter.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            if e.is_decode() {
                LookupError::Malformed(e.to_string())
            } else {
                LookupError::Transport(e)
            }
        })?;
        Ok(envelope.results)
    }
}

#[async_trait]
impl MetadataService for ComicVineClient {
    async fn search_volumes(&self, name: &str) -> Result<Vec<Volume>, LookupError> {
        let results: Vec<VolumeResult> = self
            .fetch_results("volumes", format!("name:{}", name))
            .await?;
        Ok(results.into_iter().map(VolumeResult::into_volume).collect())
    }

    async fn list_issues(&self, volume_id: u64) -> Result<Vec<VolumeIssue>, LookupError> {
        let results: Vec<IssueResult> = self
            .fetch_results("issues", format!("volume:{}", volume_id))
            .await?;
        Ok(results
            .into_iter()
            .map(|issue| VolumeIssue {
                id: issue.id,
                number: issue.issue_number.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VolumeResult {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    start_year: Option<String>,
    publisher: Option<PublisherRef>,
    #[serde(default)]
    count_of_issues: u64,
}

impl VolumeResult {
    fn into_volume(self) -> Volume {
        Volume {
            id: self.id,
            name: self.name,
            start_year: self.start_year.unwrap_or_default(),
            publisher: self
                .publisher
                .and_then(|p| p.name)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            issue_count: self.count_of_issues,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PublisherRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueResult {
    id: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    issue_number: Option<String>,
}

/// The API is inconsistent about numeric fields (`start_year`,
/// `issue_number` arrive as either strings or numbers).
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
