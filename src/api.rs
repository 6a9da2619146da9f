mod error;

pub use error::ApiError;

use crate::config::Config;
use crate::models::{Conversation, ConversationsPage, PromptsPage};
use crate::route::PageQuery;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Read-only client for the conversation log backend.
///
/// Every call is a single request; nothing is retried or cached.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(&config.api_url, builder.build()?)
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { base, http })
    }

    /// Prompts with their responses embedded, optionally scoped to one conversation.
    pub async fn list_prompts_and_responses(
        &self,
        conversation_id: Option<&str>,
    ) -> Result<PromptsPage, ApiError> {
        let mut query = vec![("include", "llm_responses".to_string())];
        if let Some(id) = conversation_id {
            query.push(("filter[conversation_id]", id.to_string()));
        }
        self.get(&["prompts"], &query).await
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        self.get(&["conversations", id], &[]).await
    }

    pub async fn list_conversations(&self, page: PageQuery) -> Result<ConversationsPage, ApiError> {
        let query = [
            ("page", page.page.to_string()),
            ("limit", page.limit.to_string()),
        ];
        self.get(&["conversations"], &query).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        debug!("GET {} {:?}", path, query);

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .inspect_err(|e| warn!("GET {} failed: {}", path, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("GET {} returned 404", path);
            return Err(ApiError::NotFound { path });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GET {} returned HTTP {}", path, status);
            return Err(ApiError::Status { path, status, body });
        }

        Ok(response.json().await?)
    }
}
