use crate::domain::ports::LibraryManager;
use crate::utils::error::LookupError;
use async_trait::async_trait;
use reqwest::Client;

/// Mylar-style library-manager API client. One `api` endpoint, command
/// dispatch through query parameters.
#[derive(Debug, Clone)]
pub struct MylarClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MylarClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn command(&self, cmd: &str, comic_id: u64) -> Result<serde_json::Value, LookupError> {
        let url = format!("{}/api", self.base_url);
        let id = comic_id.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("cmd", cmd),
                ("id", id.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        response.json().await.map_err(|e| {
            if e.is_decode() {
                LookupError::Malformed(e.to_string())
            } else {
                LookupError::Transport(e)
            }
        })
    }
}

#[async_trait]
impl LibraryManager for MylarClient {
    async fn has_series(&self, comic_id: u64) -> Result<bool, LookupError> {
        let body = self.command("getComic", comic_id).await?;
        match body.pointer("/data/comic") {
            Some(serde_json::Value::Array(items)) => Ok(!items.is_empty()),
            Some(_) | None => Err(LookupError::Malformed(
                "getComic response missing data.comic array".to_string(),
            )),
        }
    }

    async fn add_series(&self, comic_id: u64) -> Result<bool, LookupError> {
        let body = self.command("addComic", comic_id).await?;
        match body.get("success") {
            Some(serde_json::Value::Bool(success)) => Ok(*success),
            Some(serde_json::Value::String(s)) => Ok(s == "true"),
            Some(_) | None => Err(LookupError::Malformed(
                "addComic response missing success field".to_string(),
            )),
        }
    }
}
