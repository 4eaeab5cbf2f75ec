//! OpenAI Assistants API client (v2 beta surface)

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use crate::domain::config::ApiConfig;
use crate::domain::error::{AssistError, Result};
use crate::domain::traits::AssistantApi;
use crate::domain::types::{
    Assistant, AssistantParams, Run, Thread, ThreadMessage, ToolOutput,
};

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VERSION: &str = "assistants=v2";

/// List envelope used by every `GET` collection endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

/// HTTP implementation of [`AssistantApi`].
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().map_err(AssistError::Config)?;
        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_VERSION)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turns a non-success response into [`AssistError::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    Err(AssistError::Api {
        status: status.as_u16(),
        message: error_message(&error_text),
    })
}

/// Extracts `error.message` from an API error body, or returns the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl AssistantApi for OpenAiClient {
    async fn create_assistant(&self, params: &AssistantParams) -> Result<Assistant> {
        let assistant: Assistant = self
            .send(self.request(Method::POST, "assistants").json(params))
            .await?;
        tracing::info!("Created assistant_id '{}'", assistant.id);
        Ok(assistant)
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        let assistant: Assistant = self
            .send(self.request(Method::GET, &format!("assistants/{}", assistant_id)))
            .await?;
        tracing::info!("Retrieved assistant_id '{}'", assistant.id);
        Ok(assistant)
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        let list: ListResponse<Assistant> = self
            .send(
                self.request(Method::GET, "assistants")
                    .query(&[("limit", "100"), ("order", "desc")]),
            )
            .await?;
        Ok(list.data)
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &format!("assistants/{}", assistant_id)))
            .await?;
        tracing::info!("Deleted assistant_id '{}'", assistant_id);
        Ok(())
    }

    async fn create_thread(&self) -> Result<Thread> {
        let thread: Thread = self
            .send(self.request(Method::POST, "threads").json(&json!({})))
            .await?;
        tracing::info!("Created thread_id '{}'", thread.id);
        Ok(thread)
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        let thread: Thread = self
            .send(self.request(Method::GET, &format!("threads/{}", thread_id)))
            .await?;
        tracing::info!("Retrieved thread_id '{}'", thread.id);
        Ok(thread)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &format!("threads/{}", thread_id)))
            .await?;
        tracing::info!("Deleted thread_id '{}'", thread_id);
        Ok(())
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.send(
            self.request(Method::POST, &format!("threads/{}/messages", thread_id))
                .json(&json!({"role": "user", "content": content})),
        )
        .await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let run: Run = self
            .send(
                self.request(Method::POST, &format!("threads/{}/runs", thread_id))
                    .json(&json!({"assistant_id": assistant_id})),
            )
            .await?;
        tracing::info!("Started run '{}' on thread '{}'", run.id, thread_id);
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.send(self.request(
            Method::GET,
            &format!("threads/{}/runs/{}", thread_id, run_id),
        ))
        .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        self.send(
            self.request(
                Method::POST,
                &format!("threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            )
            .json(&json!({"tool_outputs": outputs})),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>> {
        let list: ListResponse<ThreadMessage> = self
            .send(
                self.request(Method::GET, &format!("threads/{}/messages", thread_id))
                    .query(&[("limit", limit.to_string()), ("order", "desc".to_string())]),
            )
            .await?;
        Ok(list.data)
    }
}
