//! Newsdesk - fetch the latest news and cache article images
//!
//! A command-line front end over the news service and image store: fetches
//! the filtered article list, prints the headlines, and downloads article
//! artwork on background tasks before exiting.

mod cache;
mod cli;
mod data;
mod net;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cache::ImageStore;
use cli::{Cli, NewsSource, RunConfig};
use data::{Article, MockNewsService, NewsApiService, NewsService};

/// Installs the stderr log subscriber for the binary
///
/// Library code only emits events; the subscriber lives here. `RUST_LOG`
/// overrides the default `info` filter.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prints one headline line plus its link, if any
fn print_article(article: &Article) {
    let author = article.author.as_deref().unwrap_or("unknown");
    println!("{} ({author})", article.title);
    if let Some(url) = &article.url {
        println!("    {url}");
    }
}

/// Schedules image downloads for every article and drains them
async fn cache_images(config: &RunConfig, articles: &[Article]) {
    let store = match &config.image_dir {
        Some(dir) => Some(ImageStore::with_dir(dir.clone())),
        None => ImageStore::new(),
    };

    let Some(store) = store else {
        error!("could not determine a cache directory; skipping image downloads");
        return;
    };

    for article in articles {
        store.persist(article);
    }
    store.wait_idle().await;
    info!("image cache directory: {}", store.base_dir().display());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let service: Box<dyn NewsService> = match &config.source {
        NewsSource::Mock => Box::new(MockNewsService),
        NewsSource::Live { query, api_key } => {
            Box::new(NewsApiService::new(query.clone(), api_key.clone()))
        }
    };

    let articles = match service.latest_news().await {
        Ok(articles) => articles,
        Err(err) => {
            error!("fetching latest news failed: {err}");
            return Err(err.into());
        }
    };

    if articles.is_empty() {
        println!("No articles available.");
    }

    let shown = config.limit.unwrap_or(articles.len());
    for article in articles.iter().take(shown) {
        print_article(article);
    }

    if !config.no_images {
        cache_images(&config, &articles).await;
    }

    Ok(())
}
