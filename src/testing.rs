use crate::{error::FetchError, fetch::Fetch};
use std::{collections::HashMap, fs};

/// Serves canned bodies by url. Unknown urls answer 404, `None` bodies never answer.
#[derive(Default)]
pub(crate) struct StubFetcher {
    pub pages: HashMap<String, Option<String>>,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), Some(body.into()));
        self
    }

    pub fn with_fixture(self, url: &str, fixture: &str) -> Self {
        let body = fs::read_to_string(format!("tests/htmls/{}", fixture))
            .expect("Invalid file path");
        self.with_page(url, body)
    }

    pub fn with_hanging(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), None);
        self
    }
}

#[async_trait::async_trait]
impl Fetch for StubFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        match self.pages.get(url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => futures::future::pending().await,
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }

    async fn post_form(&self, url: &str, _body: &str) -> Result<String, FetchError> {
        self.get(url).await
    }
}
