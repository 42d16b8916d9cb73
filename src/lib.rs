use scraper::Html;
use std::{
    collections::HashSet,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

pub mod asean;
pub mod config;
pub mod dispatch;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pagination;
pub mod sgs;

mod data;
mod error;
#[cfg(test)]
mod testing;
mod utils;

pub use config::{FetchConfig, RunOptions};
pub use data::{Cell, FailedUrl, Record, Table};
pub use dispatch::{Dispatcher, Harvest};
pub use error::{ExportError, ExtractError, FetchError, ScrapeError};
pub use export::DateColumn;
pub use fetch::{Fetch, HttpFetcher};

/// A recall site: where its records are and how to read one.
#[async_trait::async_trait]
pub trait Source {
    fn name(&self) -> &str;

    /// Detail page urls, newest record first. Falls back rather than failing.
    async fn discover(&self, fetcher: &dyn Fetch) -> Vec<String>;

    fn extract(&self, doc: &Html, url: &str) -> Result<Record, ExtractError>;

    fn date_column(&self) -> Option<DateColumn> {
        None
    }

    /// Columns that identify a notice across runs. New rows matching a previous row are dropped.
    fn identity_columns(&self) -> &[&'static str] {
        &[]
    }

    /// Column holding the detail page url, for sources whose urls identify a notice.
    /// Those runs visit every listed url missing from the previous export. Without it,
    /// urls are positional and the newest `listed - exported` are visited.
    fn url_column(&self) -> Option<&'static str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub fetched: usize,
    pub failed: Vec<FailedUrl>,
    pub duplicates: usize,
    pub total_rows: usize,
    pub interrupted: bool,
    /// Nothing new was found, the previous export was left untouched.
    pub up_to_date: bool,
}

impl RunSummary {
    fn untouched(output: &Path, total_rows: usize) -> Self {
        Self {
            output: output.to_path_buf(),
            fetched: 0,
            failed: vec![],
            duplicates: 0,
            total_rows,
            interrupted: false,
            up_to_date: true,
        }
    }
}

fn pending_urls(urls: Vec<String>, previous: &Table, url_column: Option<&str>) -> Vec<String> {
    match url_column.and_then(|c| previous.column_index(c)) {
        Some(idx) => {
            let known: HashSet<String> = previous
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|cell| !cell.is_empty())
                .map(ToString::to_string)
                .collect();
            urls.into_iter().filter(|url| !known.contains(url)).collect()
        }
        None => {
            let pending = urls.len().saturating_sub(previous.len());
            urls.into_iter().take(pending).collect()
        }
    }
}

/// Scrapes what `source` lists and merges it into the export at `options.output`.
/// An empty listing never overwrites an existing export.
pub async fn run<S, F>(
    source: Arc<S>,
    fetcher: Arc<F>,
    options: &RunOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<RunSummary, ScrapeError>
where
    S: Source + Send + Sync + 'static,
    F: Fetch + 'static,
{
    let previous = if options.incremental {
        export::read_xlsx(&options.output)?
    } else {
        None
    };
    let known = previous.as_ref().map_or(0, Table::len);

    let urls = source.discover(fetcher.as_ref()).await;
    info!(
        "{}: {} records listed, {} already exported",
        source.name(),
        urls.len(),
        known
    );

    if urls.is_empty() && options.output.exists() {
        warn!(
            "{}: nothing listed, keeping {}",
            source.name(),
            options.output.display()
        );
        return Ok(RunSummary::untouched(&options.output, known));
    }

    let urls = match &previous {
        Some(previous) => pending_urls(urls, previous, source.url_column()),
        None => urls,
    };
    if previous.is_some() && urls.is_empty() {
        info!("All data is up to date, no new data to scrape");
        return Ok(RunSummary::untouched(&options.output, known));
    }
    info!("{} new records found, scraping", urls.len());

    let harvest = options
        .dispatcher
        .dispatch(Arc::clone(&source), fetcher, urls, shutdown)
        .await;

    export_harvest(
        harvest,
        previous,
        source.date_column(),
        source.identity_columns(),
        &options.output,
    )
}

/// New records go above the previous export. The file is rewritten as a whole.
pub fn export_harvest(
    harvest: Harvest,
    previous: Option<Table>,
    date_column: Option<DateColumn>,
    identity_columns: &[&str],
    output: &Path,
) -> Result<RunSummary, ScrapeError> {
    for failed in &harvest.failed {
        warn!("Not scraped: {}", failed);
    }

    let fetched = harvest.records.len();
    let mut table = Table::from_records(&harvest.records);
    let mut duplicates = 0;

    if let Some(previous) = previous {
        duplicates = table.remove_known(&previous, identity_columns);
        if duplicates > 0 {
            info!("Skipping {} records already exported", duplicates);
        }
        table = table.append(previous);
    }

    if let Some(column) = date_column {
        export::normalize_dates(&mut table, &column);
    }

    export::write_xlsx(&table, output)?;

    Ok(RunSummary {
        output: output.to_path_buf(),
        fetched,
        failed: harvest.failed,
        duplicates,
        total_rows: table.len(),
        interrupted: harvest.interrupted,
        up_to_date: false,
    })
}
