use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// OGP preview cards and search for Scraps Doc pages
#[derive(Parser)]
#[command(name = "scraps-ogp")]
#[command(about = "Render OGP preview cards and search results for Scraps Doc pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a card for every autolink in a page fragment and print the page
    Hydrate {
        /// HTML fragment of the page content
        page: PathBuf,
        /// Page title shown above the content
        #[arg(short, long)]
        title: Option<String>,
        /// HTML file rendered into the readme block
        #[arg(short, long)]
        readme: Option<PathBuf>,
    },
    /// Run a single card to completion
    Preview {
        /// Absolute http(s) URL to preview
        url: String,
        /// Print the final card state as JSON instead of markup
        #[arg(long)]
        json: bool,
    },
    /// Query a search index and print the results container
    Search {
        /// Search index JSON file
        index: PathBuf,
        /// Query text
        query: String,
        /// Require every keyword to match
        #[arg(long)]
        and: bool,
        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = scraps_ogp::search::DEFAULT_LIMIT)]
        num: usize,
    },
}
