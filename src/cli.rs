//! Command-line interface parsing for Newsdesk
//!
//! This module handles parsing of CLI arguments using clap and validates
//! them into a runnable configuration, including the choice between the
//! live news API and the built-in mock service.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A live fetch was requested without an API key
    #[error("an API key is required unless --mock is set (pass --api-key <KEY>)")]
    MissingApiKey,
}

/// Newsdesk - fetch the latest news headlines and cache article images
#[derive(Parser, Debug)]
#[command(name = "newsdesk")]
#[command(about = "Fetch the latest news and cache article images locally")]
#[command(version)]
pub struct Cli {
    /// Search term sent to the news API
    #[arg(long, default_value = "apple")]
    pub query: String,

    /// API key for the news API
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Use the built-in mock service instead of the live API
    #[arg(long)]
    pub mock: bool,

    /// Maximum number of headlines to print
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Skip downloading article images
    #[arg(long)]
    pub no_images: bool,

    /// Directory for cached images (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,
}

/// Which news source a run should use
#[derive(Debug, Clone, PartialEq)]
pub enum NewsSource {
    /// Built-in mock service; no network access
    Mock,
    /// Live API with a search query and key
    Live { query: String, api_key: String },
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// News source to fetch from
    pub source: NewsSource,
    /// Cap on the number of headlines printed
    pub limit: Option<usize>,
    /// Whether image downloads are disabled
    pub no_images: bool,
    /// Override for the image cache directory
    pub image_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with the validated settings
    /// * `Err(CliError)` if a live fetch was requested without an API key
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let source = if cli.mock {
            NewsSource::Mock
        } else {
            let api_key = cli.api_key.clone().ok_or(CliError::MissingApiKey)?;
            NewsSource::Live {
                query: cli.query.clone(),
                api_key,
            }
        };

        Ok(Self {
            source,
            limit: cli.limit,
            no_images: cli.no_images,
            image_dir: cli.image_dir.clone(),
        })
    }
}
