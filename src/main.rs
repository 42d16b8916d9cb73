use clap::Parser;
use recall_scraper::{
    asean::{self, AseanSource},
    config::{Cli, SourceKind},
    export_harvest,
    sgs::{self, SgsSource},
    HttpFetcher, RunSummary,
};
use std::{io::BufRead, sync::Arc, time::Duration};
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        futures::future::pending::<()>().await;
    }
    info!("Received interrupt, stopping the scraper");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();
    info!("Script started: {:?}", cli.source);

    let fetcher = Arc::new(HttpFetcher::new(&cli.fetch_config())?);

    let summary: RunSummary = match cli.source {
        SourceKind::Sgs => {
            let options = cli.run_options(sgs::EXTENDED_FILENAME);
            recall_scraper::run(
                Arc::new(SgsSource::default()),
                fetcher,
                &options,
                interrupted(),
            )
            .await?
        }
        SourceKind::Asean => {
            let options = cli.run_options(asean::FILENAME);
            recall_scraper::run(Arc::new(AseanSource), fetcher, &options, interrupted()).await?
        }
        SourceKind::SgsListing => {
            let options = cli.run_options(sgs::LISTING_FILENAME);
            let harvest = sgs::listing::crawl(
                fetcher.as_ref(),
                sgs::OVERVIEW_URL,
                Duration::from_millis(cli.throttle_ms),
                interrupted(),
            )
            .await;
            export_harvest(
                harvest,
                None,
                Some(sgs::PUBLICATION_DATE),
                &[],
                &options.output,
            )?
        }
    };

    if summary.up_to_date {
        println!("All data is up to date in {}", summary.output.display());
    } else {
        println!(
            "Data exported to {} ({} new, {} failed, {} rows){}",
            summary.output.display(),
            summary.fetched,
            summary.failed.len(),
            summary.total_rows,
            if summary.interrupted {
                ", interrupted before finishing"
            } else {
                ""
            }
        );
    }

    if cli.pause {
        println!("Press Enter to exit..");
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
    }

    Ok(())
}
