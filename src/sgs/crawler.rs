use super::{
    FALLBACK_RECORD_COUNT, NOTICE_URL, OVERVIEW_URL, PAGE_SIZE, PAGE_URL, PRODUCT_NAME,
    PUBLICATION_DATE, RECORD_URL_TEMPLATE,
};
use crate::{
    data::Record, error::ExtractError, export::DateColumn, extract, fetch::Fetch, pagination,
    utils, Source,
};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref RECORD_COUNT: Selector = Selector::parse("div.grid.grid--2").expect(E);
    static ref PAGE_HEADER: Selector = Selector::parse("div.page-header").expect(E);
    static ref PAIRS: Selector =
        Selector::parse("div.table-wrapper.table-wrapper-pairs").expect(E);
    static ref P: Selector = Selector::parse("p").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

/// SGS recall detail pages, addressed by page offset and slot.
#[derive(Debug, Clone)]
pub struct SgsSource {
    pub page_size: usize,
    pub fallback_count: usize,
}

impl Default for SgsSource {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            fallback_count: FALLBACK_RECORD_COUNT,
        }
    }
}

impl SgsSource {
    /// Total number of recalls, as announced by the overview page.
    pub async fn record_count(&self, fetcher: &dyn Fetch) -> usize {
        let count = match fetcher.get(OVERVIEW_URL).await {
            Ok(html) => parse_record_count(&html),
            Err(e) => {
                warn!("Unable to fetch {}: {}", OVERVIEW_URL, e);
                None
            }
        };

        count.unwrap_or_else(|| {
            warn!(
                "Record count not found, assuming {} records",
                self.fallback_count
            );
            self.fallback_count
        })
    }
}

fn parse_record_count(html: &str) -> Option<usize> {
    let doc = Html::parse_document(html);
    let text = utils::element_text(&doc.select(&RECORD_COUNT).next()?);
    utils::first_integer(&text).and_then(|n| usize::try_from(n).ok())
}

#[async_trait::async_trait]
impl Source for SgsSource {
    fn name(&self) -> &str {
        "sgs"
    }

    async fn discover(&self, fetcher: &dyn Fetch) -> Vec<String> {
        let total = self.record_count(fetcher).await;
        info!("SGS lists {} recalls", total);
        pagination::record_urls(RECORD_URL_TEMPLATE, total, self.page_size)
    }

    fn extract(&self, doc: &Html, url: &str) -> Result<Record, ExtractError> {
        let name = doc
            .select(&PAGE_HEADER)
            .next()
            .ok_or(ExtractError::MissingElement("div.page-header"))?;
        let pairs = doc
            .select(&PAIRS)
            .next()
            .ok_or(ExtractError::MissingElement("div.table-wrapper-pairs"))?;

        let mut record = Record::new();
        record.insert(PRODUCT_NAME, utils::element_text(&name));
        for (column, value) in extract::label_rows(pairs)? {
            record.insert(column, value);
        }

        // The notice link lives in the first paragraph of the page.
        let notice = doc
            .select(&P)
            .next()
            .and_then(|p| p.select(&A).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::trim);
        record.insert(NOTICE_URL, notice);
        record.insert(PAGE_URL, url);

        Ok(record)
    }

    fn date_column(&self) -> Option<DateColumn> {
        Some(PUBLICATION_DATE)
    }

    fn identity_columns(&self) -> &[&'static str] {
        &[PRODUCT_NAME, NOTICE_URL]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::Cell, testing::StubFetcher};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn read_html(name: &str) -> Html {
        let html = fs::read_to_string(format!("tests/htmls/{}", name)).expect("Invalid file path");
        Html::parse_document(&html)
    }

    #[test]
    fn test_parsing_record_page() {
        let s = SgsSource::default();
        let url = "https://campaigns.sgs.com/en/vr/product-recalls-light/record?p=0&d=0&id=18CD45C15541&dc=http&lb=&rec=3";
        let record = s
            .extract(&read_html("sgs_record.html"), url)
            .expect("record");

        let expected = Record::from_iter([
            (PRODUCT_NAME, "Children's Hooded Sweatshirt"),
            ("Publication Date", "January 12, 2024"),
            ("Country", "Australia"),
            ("Product Category", "Children's Clothing"),
            ("Hazard", "Strangulation: drawstrings in the hood area."),
            ("Image", "https://campaigns.sgs.com/-/media/recalls/12345.jpg"),
            (
                NOTICE_URL,
                "https://www.productsafety.gov.au/recalls/childrens-hooded-sweatshirt",
            ),
            (PAGE_URL, url),
        ]);
        assert_eq!(record, expected);
    }

    #[test]
    fn test_parsing_page_without_table() {
        let s = SgsSource::default();
        let html = Html::parse_document(
            r#"<div class="page-header">Recall</div><p>Record not found</p>"#,
        );
        assert!(matches!(
            s.extract(&html, "u"),
            Err(ExtractError::MissingElement(_))
        ));
    }

    #[test]
    fn test_missing_notice_link_is_empty() {
        let s = SgsSource::default();
        let html = Html::parse_document(
            r#"<div class="page-header">Lamp</div>
               <p>No link</p>
               <div class="table-wrapper table-wrapper-pairs"><table>
                 <tr><th>Country</th><td>Canada</td></tr>
               </table></div>"#,
        );
        let record = s.extract(&html, "u").expect("record");
        assert_eq!(record.get(NOTICE_URL), Some(&Cell::Empty));
        assert_eq!(record.get("Country"), Some(&Cell::from("Canada")));
    }

    #[tokio::test]
    async fn test_record_count_from_overview() {
        let fetcher = StubFetcher::default().with_fixture(OVERVIEW_URL, "sgs_overview.html");
        assert_eq!(SgsSource::default().record_count(&fetcher).await, 12_987);
    }

    #[tokio::test]
    async fn test_record_count_fallback() {
        let fetcher = StubFetcher::default();
        assert_eq!(
            SgsSource::default().record_count(&fetcher).await,
            FALLBACK_RECORD_COUNT
        );

        let fetcher = StubFetcher::default().with_page(
            OVERVIEW_URL,
            r#"<div class="grid grid--2">No recalls published yet</div>"#,
        );
        let s = SgsSource {
            fallback_count: 7,
            ..Default::default()
        };
        assert_eq!(s.record_count(&fetcher).await, 7);
    }

    #[tokio::test]
    async fn test_discover_generates_record_urls() {
        let fetcher = StubFetcher::default().with_page(
            OVERVIEW_URL,
            r#"<div class="grid grid--2"><p>Showing 25 product recalls</p></div>"#,
        );
        let urls = SgsSource::default().discover(&fetcher).await;
        assert_eq!(urls.len(), 25);
        assert!(urls[0].ends_with("record?p=0&d=0&id=18CD45C15541&dc=http&lb=&rec=0"));
        assert!(urls[24].ends_with("record?p=20&d=0&id=18CD45C15541&dc=http&lb=&rec=4"));
    }
}
