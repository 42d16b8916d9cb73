use super::{DATATABLE_QUERY, DATATABLE_URL, PAGE_URL, PRODUCT_URL_PREFIX};
use crate::{
    data::Record,
    error::{ExtractError, FetchError},
    extract,
    fetch::Fetch,
    Source,
};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref ALERT_TABLE: Selector = Selector::parse("table.table-product-alert").expect(E);
}

#[derive(Debug, Deserialize)]
struct Overview {
    data: Vec<OverviewRow>,
}

#[derive(Debug, Deserialize)]
struct OverviewRow {
    slug: String,
}

/// Product alert urls listed by the data-grid endpoint, in the order it answers.
fn parse_overview(body: &str) -> Result<Vec<String>, FetchError> {
    let overview: Overview = serde_json::from_str(body)?;
    Ok(overview
        .data
        .into_iter()
        .map(|row| format!("{}{}", PRODUCT_URL_PREFIX, row.slug.trim()))
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct AseanSource;

#[async_trait::async_trait]
impl Source for AseanSource {
    fn name(&self) -> &str {
        "asean"
    }

    async fn discover(&self, fetcher: &dyn Fetch) -> Vec<String> {
        let urls = fetcher
            .post_form(DATATABLE_URL, DATATABLE_QUERY)
            .await
            .and_then(|body| parse_overview(&body));

        match urls {
            Ok(urls) => {
                info!("ASEAN lists {} product alerts", urls.len());
                urls
            }
            Err(e) => {
                warn!("Unable to get product alerts overview: {}", e);
                vec![]
            }
        }
    }

    fn extract(&self, doc: &Html, url: &str) -> Result<Record, ExtractError> {
        let mut tables = doc.select(&ALERT_TABLE).peekable();
        if tables.peek().is_none() {
            return Err(ExtractError::MissingElement("table.table-product-alert"));
        }

        let mut record = Record::new();
        for table in tables {
            for (column, value) in extract::alternating_cells(table) {
                record.insert(column, value);
            }
        }
        record.insert(PAGE_URL, url);
        Ok(record)
    }

    fn identity_columns(&self) -> &[&'static str] {
        &[PAGE_URL]
    }

    fn url_column(&self) -> Option<&'static str> {
        Some(PAGE_URL)
    }
}
