use super::OVERVIEW_URL;
use crate::{
    data::{FailedUrl, Record},
    dispatch::Harvest,
    error::ExtractError,
    extract,
    fetch::Fetch,
    utils,
};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::{collections::HashSet, future::Future, time::Duration};
use tracing::{debug, info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref TABLE: Selector =
        Selector::parse("table.table.table--simple.table--narrow").expect(E);
    static ref NEXT: Selector = Selector::parse("li.next a").expect(E);
}

struct ListingPage {
    rows: Result<Vec<Record>, ExtractError>,
    next: Option<String>,
}

fn parse_page(html: &str) -> ListingPage {
    let doc = Html::parse_document(html);
    let rows = doc
        .select(&TABLE)
        .next()
        .ok_or(ExtractError::MissingElement("table.table--simple"))
        .and_then(extract::header_rows);
    let next = doc
        .select(&NEXT)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| utils::absolute_url(OVERVIEW_URL, href.trim()));
    ListingPage { rows, next }
}

/// Walks the overview table page by page through its "next" links, starting at `start`.
/// A page that cannot be fetched ends the walk since its next link is unknown.
pub async fn crawl(
    fetcher: &dyn Fetch,
    start: &str,
    throttle: Duration,
    shutdown: impl Future<Output = ()>,
) -> Harvest {
    tokio::pin!(shutdown);
    let mut harvest = Harvest::default();
    let mut seen = HashSet::new();
    let mut current = Some(start.to_string());

    while let Some(url) = current.take() {
        if !seen.insert(url.clone()) {
            warn!("Next page loops back to {}", url);
            break;
        }

        let first = seen.len() == 1;
        let step = async {
            if !first && !throttle.is_zero() {
                tokio::time::sleep(throttle).await;
            }
            debug!("processing {}", url);
            fetcher.get(&url).await
        };

        let html = tokio::select! {
            biased;
            _ = &mut shutdown => {
                harvest.interrupted = true;
                warn!("Received interrupt, stopping the scraper");
                break;
            }
            result = step => result,
        };

        let page = match html {
            Ok(html) => parse_page(&html),
            Err(e) => {
                warn!("Unable to get requested page for url {}", url);
                harvest.failed.push(FailedUrl::new(url, e));
                break;
            }
        };

        match page.rows {
            Ok(rows) => {
                info!("{} rows from {}", rows.len(), url);
                harvest.records.extend(rows);
            }
            Err(e) => {
                warn!("Unable to read table at {}: {}", url, e);
                harvest.failed.push(FailedUrl::new(url, e));
            }
        }

        current = page.next;
        if current.is_none() {
            info!("Scraped all the pages");
        }
    }

    harvest
}
