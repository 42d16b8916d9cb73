use crate::{
    data::{FailedUrl, Record},
    fetch::Fetch,
    Source,
};
use futures::{stream, StreamExt};
use scraper::Html;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatcher {
    /// Input order, one request at a time with a pause in between.
    Sequential { throttle: Duration },
    /// At most `workers` requests in flight, results in completion order.
    Concurrent { workers: usize },
}

#[derive(Debug, Default)]
pub struct Harvest {
    pub records: Vec<Record>,
    pub failed: Vec<FailedUrl>,
    pub interrupted: bool,
}

impl Harvest {
    fn push(&mut self, result: Result<Record, FailedUrl>) {
        match result {
            Ok(record) => {
                self.records.push(record);
                info!("[{}] Extracted record", self.records.len());
            }
            Err(failed) => {
                warn!("Failed {}", failed);
                self.failed.push(failed);
            }
        }
    }

    pub fn visited(&self) -> usize {
        self.records.len() + self.failed.len()
    }
}

/// Fetches `url` and extracts one record from it. Every failure is reported as the failed url.
pub async fn visit<S>(source: &S, fetcher: &dyn Fetch, url: &str) -> Result<Record, FailedUrl>
where
    S: Source + ?Sized,
{
    let html = fetcher
        .get(url)
        .await
        .map_err(|e| FailedUrl::new(url, e))?;

    let doc = Html::parse_document(&html);
    source
        .extract(&doc, url)
        .map_err(|e| FailedUrl::new(url, e))
}

impl Dispatcher {
    pub fn sequential(throttle: Duration) -> Self {
        Dispatcher::Sequential { throttle }
    }

    pub fn concurrent(workers: usize) -> Self {
        Dispatcher::Concurrent {
            workers: workers.max(1),
        }
    }

    /// Visits every url until done or until `shutdown` resolves, whichever comes first.
    /// Requests still in flight at shutdown are left to finish on their own and ignored.
    pub async fn dispatch<S, F>(
        &self,
        source: Arc<S>,
        fetcher: Arc<F>,
        urls: Vec<String>,
        shutdown: impl Future<Output = ()>,
    ) -> Harvest
    where
        S: Source + Send + Sync + 'static,
        F: Fetch + 'static,
    {
        info!("Visiting {} urls", urls.len());
        tokio::pin!(shutdown);
        let mut harvest = Harvest::default();

        match *self {
            Dispatcher::Sequential { throttle } => {
                for (i, url) in urls.iter().enumerate() {
                    let step = async {
                        if i > 0 && !throttle.is_zero() {
                            tokio::time::sleep(throttle).await;
                        }
                        visit(source.as_ref(), fetcher.as_ref(), url).await
                    };

                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            harvest.interrupted = true;
                            break;
                        }
                        result = step => harvest.push(result),
                    }
                }
            }

            Dispatcher::Concurrent { workers } => {
                let mut results = stream::iter(urls)
                    .map(|url| {
                        let source = Arc::clone(&source);
                        let fetcher = Arc::clone(&fetcher);
                        async move {
                            let task = {
                                let url = url.clone();
                                tokio::spawn(async move {
                                    visit(source.as_ref(), fetcher.as_ref(), &url).await
                                })
                            };
                            task.await
                                .unwrap_or_else(|e| Err(FailedUrl::new(url, e)))
                        }
                    })
                    .buffer_unordered(workers);

                loop {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            harvest.interrupted = true;
                            break;
                        }
                        next = results.next() => match next {
                            Some(result) => harvest.push(result),
                            None => break,
                        },
                    }
                }
            }
        }

        if harvest.interrupted {
            warn!(
                "Interrupted after {} records and {} failures",
                harvest.records.len(),
                harvest.failed.len()
            );
        } else {
            debug!("All urls visited");
        }
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ExtractError, testing::StubFetcher};
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;
    use scraper::Selector;

    lazy_static! {
        static ref H1: Selector = Selector::parse("h1").expect("Invalid selector");
    }

    struct TitleSource;

    #[async_trait::async_trait]
    impl Source for TitleSource {
        fn name(&self) -> &str {
            "titles"
        }

        async fn discover(&self, _fetcher: &dyn Fetch) -> Vec<String> {
            vec![]
        }

        fn extract(&self, doc: &Html, url: &str) -> Result<Record, ExtractError> {
            let title = doc
                .select(&H1)
                .next()
                .ok_or(ExtractError::MissingElement("h1"))?;
            Ok(Record::from_iter([
                ("title", title.text().collect::<String>()),
                ("page_url", url.to_string()),
            ]))
        }
    }

    fn fixture() -> (StubFetcher, Vec<String>) {
        let mut fetcher = StubFetcher::default();
        for i in 0..6 {
            fetcher = fetcher.with_page(&format!("ok/{}", i), format!("<h1>Item {}</h1>", i));
        }
        fetcher = fetcher.with_page("broken", "<p>no title</p>");

        let mut urls = (0..6).map(|i| format!("ok/{}", i)).collect::<Vec<_>>();
        urls.insert(2, "missing".to_string());
        urls.insert(5, "broken".to_string());
        (fetcher, urls)
    }

    #[tokio::test]
    async fn test_sequential_keeps_order_and_counts() {
        let (fetcher, urls) = fixture();
        let harvest = Dispatcher::sequential(Duration::ZERO)
            .dispatch(
                Arc::new(TitleSource),
                Arc::new(fetcher),
                urls.clone(),
                futures::future::pending(),
            )
            .await;

        assert!(!harvest.interrupted);
        assert_eq!(harvest.visited(), urls.len());
        let titles = harvest
            .records
            .iter()
            .map(|r| r.get("title").map(ToString::to_string))
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            (0..6)
                .map(|i| Some(format!("Item {}", i)))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            harvest.failed.iter().map(|f| f.url.as_str()).collect::<Vec<_>>(),
            vec!["missing", "broken"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_counts() {
        let (fetcher, urls) = fixture();
        let harvest = Dispatcher::concurrent(3)
            .dispatch(
                Arc::new(TitleSource),
                Arc::new(fetcher),
                urls.clone(),
                futures::future::pending(),
            )
            .await;

        assert!(!harvest.interrupted);
        assert_eq!(harvest.records.len(), 6);
        assert_eq!(harvest.failed.len(), 2);
        assert_eq!(harvest.visited(), urls.len());
    }

    #[tokio::test]
    async fn test_shutdown_keeps_collected_records() {
        let (fetcher, mut urls) = fixture();
        urls.push("hang".to_string());

        let harvest = Dispatcher::concurrent(4)
            .dispatch(
                Arc::new(TitleSource),
                Arc::new(fetcher.with_hanging("hang")),
                urls,
                tokio::time::sleep(Duration::from_millis(200)),
            )
            .await;

        assert!(harvest.interrupted);
        assert_eq!(harvest.records.len(), 6);
        assert_eq!(harvest.failed.len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_before_start() {
        let (fetcher, urls) = fixture();
        let harvest = Dispatcher::sequential(Duration::ZERO)
            .dispatch(Arc::new(TitleSource), Arc::new(fetcher), urls, async {})
            .await;

        assert!(harvest.interrupted);
        assert_eq!(harvest.visited(), 0);
    }
}
