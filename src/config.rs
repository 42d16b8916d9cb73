use crate::dispatch::Dispatcher;
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: vec![],
            timeout: None,
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dispatcher: Dispatcher,
    /// Fetch only what is missing from the previous export and merge with it.
    pub incremental: bool,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// SGS recall detail pages, one request per record
    Sgs,
    /// SGS overview table, following the "next" links
    SgsListing,
    /// ASEAN consumer product alerts
    Asean,
}

impl SourceKind {
    pub fn default_workers(self) -> usize {
        match self {
            SourceKind::Sgs => 20,
            SourceKind::SgsListing => 1,
            SourceKind::Asean => 15,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Scrape product recall notices into spreadsheets")]
pub struct Cli {
    #[arg(value_enum)]
    pub source: SourceKind,

    /// Worker pool size. Falls back to the source default when absent or not a number
    pub workers: Option<String>,

    /// Visit one page at a time instead of using the worker pool
    #[arg(long)]
    pub sequential: bool,

    /// Pause between sequential requests
    #[arg(long, default_value_t = 100)]
    pub throttle_ms: u64,

    /// Ignore the previous export and scrape everything again
    #[arg(long)]
    pub full: bool,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Per request timeout. No timeout when omitted
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Extra request header as `name: value`, can be repeated
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value`, got {:?}", s))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

impl Cli {
    pub fn workers(&self) -> usize {
        self.workers
            .as_deref()
            .and_then(|w| w.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or_else(|| self.source.default_workers())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
            ..Default::default()
        }
        .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    pub fn run_options(&self, default_output: &str) -> RunOptions {
        let dispatcher = if self.sequential || self.source == SourceKind::SgsListing {
            Dispatcher::sequential(Duration::from_millis(self.throttle_ms))
        } else {
            Dispatcher::concurrent(self.workers())
        };

        RunOptions {
            dispatcher,
            incremental: !self.full,
            output: self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DATA_DIR).join(default_output)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("recall-scraper").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_workers_fallback() {
        assert_eq!(parse(&["sgs"]).workers(), 20);
        assert_eq!(parse(&["asean"]).workers(), 15);
        assert_eq!(parse(&["asean", "many"]).workers(), 15);
        assert_eq!(parse(&["asean", "0"]).workers(), 15);
        assert_eq!(parse(&["sgs", "4"]).workers(), 4);
    }

    #[test]
    fn test_run_options() {
        let cli = parse(&["sgs", "8"]);
        let options = cli.run_options("sgs_data_extended.xlsx");
        assert!(options.incremental);
        assert_eq!(options.dispatcher, Dispatcher::concurrent(8));
        assert_eq!(
            options.output,
            PathBuf::from("data").join("sgs_data_extended.xlsx")
        );

        let cli = parse(&["asean", "--sequential", "--throttle-ms", "5", "--full"]);
        let options = cli.run_options("asean_consumers.xlsx");
        assert!(!options.incremental);
        assert_eq!(
            options.dispatcher,
            Dispatcher::sequential(Duration::from_millis(5))
        );
    }

    #[test]
    fn test_fetch_config() {
        let cli = parse(&["sgs", "--timeout-secs", "30"]);
        let config = cli.fetch_config();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(parse(&["sgs"]).fetch_config().timeout.is_none());

        let cli = parse(&["asean", "--header", "Accept-Language: en-US", "--header", "DNT:1"]);
        assert_eq!(
            cli.fetch_config().headers,
            vec![
                ("Accept-Language".to_string(), "en-US".to_string()),
                ("DNT".to_string(), "1".to_string()),
            ]
        );
        assert!(Cli::try_parse_from(["recall-scraper", "sgs", "--header", "broken"]).is_err());
    }
}
