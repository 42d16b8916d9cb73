use crate::{config::FetchConfig, error::FetchError};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Client,
};
use tracing::{debug, warn};

/// One request, no retries. A non-success status is an error like any transport failure.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
    /// Posts an url-encoded form to an endpoint answering JSON.
    async fn post_form(&self, url: &str, body: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&config.user_agent) {
            Ok(v) => {
                headers.insert(USER_AGENT, v);
            }
            Err(_) => warn!("Ignoring invalid user agent {:?}", config.user_agent),
        }
        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Ignoring invalid header {}: {}", name, value),
            }
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("Visit {}", url);
        let response = self.client.get(url).send().await?;
        read_body(url, response).await
    }

    async fn post_form(&self, url: &str, body: &str) -> Result<String, FetchError> {
        debug!("Post {}", url);
        let response = self
            .client
            .post(url)
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .header(ACCEPT, "application/json")
            .body(body.to_string())
            .send()
            .await?;
        read_body(url, response).await
    }
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response.text().await?)
}
