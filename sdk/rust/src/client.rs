use reqwest::{Client, RequestBuilder, Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("proxy returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Talks to one proxy instance.
#[derive(Debug, Clone)]
pub struct SprayClient {
    client: Client,
    proxy_url: String,
    api_key: Option<String>,
}

impl SprayClient {
    pub fn new(proxy_url: &str) -> Self {
        Self::with_client(Client::new(), proxy_url)
    }

    pub fn with_client(client: Client, proxy_url: &str) -> Self {
        Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` on admin calls.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Register `server`; returns the backend list after the change.
    pub async fn register(&self, server: &str) -> Result<Vec<String>, SdkError> {
        let req = self
            .client
            .post(self.backends_url())
            .query(&[("server", server)]);
        let body = self.send(req).await?;
        Ok(split_list(&body))
    }

    /// Unregister `server`; returns the backend list after the change.
    pub async fn unregister(&self, server: &str) -> Result<Vec<String>, SdkError> {
        let req = self
            .client
            .delete(self.backends_url())
            .query(&[("server", server)]);
        let body = self.send(req).await?;
        Ok(split_list(&body))
    }

    pub async fn list(&self) -> Result<Vec<String>, SdkError> {
        let body = self.send(self.client.get(self.backends_url())).await?;
        Ok(split_list(&body))
    }

    /// True when `/healthz` answers 200.
    pub async fn health(&self) -> Result<bool, SdkError> {
        let res = self
            .client
            .get(format!("{}/healthz", self.proxy_url))
            .send()
            .await?;
        Ok(res.status().is_success())
    }

    fn backends_url(&self) -> String {
        format!("{}/backends", self.proxy_url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<String, SdkError> {
        let req = match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        };
        let res: Response = req.send().await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(SdkError::Status { status, body });
        }
        Ok(body)
    }
}

fn split_list(body: &str) -> Vec<String> {
    body.split_whitespace().map(str::to_string).collect()
}
