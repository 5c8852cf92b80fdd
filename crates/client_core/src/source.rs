use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use shared::{domain::Post, protocol::decode_post_list};
use url::Url;

use crate::error::SyncError;

/// Where a sync gets its posts from.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Human-readable origin, used in logs and events.
    fn describe(&self) -> String;
    async fn fetch_posts(&self) -> Result<Vec<Post>, SyncError>;
}

/// Plain `GET` against a posts collection endpoint. No query, no auth.
pub struct HttpPostSource {
    http: Client,
    endpoint: Url,
    request_timeout: Option<Duration>,
}

impl HttpPostSource {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    fn describe(&self) -> String {
        self.endpoint.to_string()
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, SyncError> {
        let network = |source: reqwest::Error| SyncError::Network {
            endpoint: self.describe(),
            source,
        };

        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                endpoint: self.describe(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        decode_post_list(&body).map_err(|err| SyncError::Parse {
            endpoint: self.describe(),
            reason: err.to_string(),
        })
    }
}

/// Serves a fixed list. The reader syncs the bundled posts through it in
/// offline mode.
pub struct StaticPostSource {
    posts: Vec<Post>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, SyncError> {
        Ok(self.posts.clone())
    }
}
