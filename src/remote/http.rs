use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::AppError;
use crate::models::{Todo, TodoDraft, TodoId};
use crate::remote::{ApiConfig, TodoApi};

pub struct HttpTodoApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTodoApi {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

/// Turn a non-2xx response into `Transport`, keeping the body for the log.
async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Transport {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let body_text = response.text().await?;
    serde_json::from_str::<T>(&body_text).map_err(|e| AppError::Decode(e.to_string()))
}

fn log_failure(operation: &str, err: &AppError) {
    error!("Error {}: {}", operation, err);
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let url = self.config.base_url.clone();
        debug!("GET {}", url);

        let result: Result<Vec<Todo>, AppError> = async {
            let response = self.client.get(url).send().await?;
            decode(ensure_success(response).await?).await
        }
        .await;

        result.inspect_err(|e| log_failure("fetching todos", e))
    }

    async fn create(&self, draft: &TodoDraft) -> Result<Todo, AppError> {
        let url = self.config.base_url.clone();
        debug!("POST {}", url);

        let result: Result<Todo, AppError> = async {
            let response = self.client.post(url).json(draft).send().await?;
            decode(ensure_success(response).await?).await
        }
        .await;

        result.inspect_err(|e| log_failure("creating todo", e))
    }

    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, AppError> {
        let url = self.config.item_url(id);
        debug!("PUT {}", url);

        let result: Result<Todo, AppError> = async {
            let response = self.client.put(url).json(draft).send().await?;
            decode(ensure_success(response).await?).await
        }
        .await;

        result.inspect_err(|e| log_failure("updating todo", e))
    }

    async fn delete(&self, id: &TodoId) -> Result<(), AppError> {
        let url = self.config.item_url(id);
        debug!("DELETE {}", url);

        let result: Result<(), AppError> = async {
            let response = self.client.delete(url).send().await?;
            // Whatever the server sends back on delete is not interpreted.
            ensure_success(response).await.map(|_| ())
        }
        .await;

        result.inspect_err(|e| log_failure("deleting todo", e))
    }
}
