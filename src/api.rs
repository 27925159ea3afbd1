//! Client for the two suggestion endpoints.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::NetworkError,
    routes::{CREATE_SUGGESTION_PATH, GET_SUGGESTIONS_PATH},
    suggestion::NewSuggestion,
};

#[async_trait]
pub trait SuggestionApi {
    /// Raw records from the retrieval endpoint, normalised by the caller.
    async fn fetch_suggestions(&self) -> Result<Vec<Value>, NetworkError>;

    /// Sends one suggestion. Any non-2xx answer is an error.
    async fn submit_suggestion(&self, suggestion: &NewSuggestion) -> Result<Value, NetworkError>;
}

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| status.to_string());

    Err(NetworkError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SuggestionApi for HttpApi {
    async fn fetch_suggestions(&self) -> Result<Vec<Value>, NetworkError> {
        let response = self.client.get(self.url(GET_SUGGESTIONS_PATH)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn submit_suggestion(&self, suggestion: &NewSuggestion) -> Result<Value, NetworkError> {
        let response = self
            .client
            .post(self.url(CREATE_SUGGESTION_PATH))
            .json(suggestion)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}
