mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scraps_ogp::render::card::render_card;
use scraps_ogp::render::page::PageShell;
use scraps_ogp::render::search::search_results;
use scraps_ogp::search::{SearchBox, SearchIndex, SearchLogic};
use scraps_ogp::{
    AppResult, CardId, Config, LinkTarget, OgpCard, OgpClient, OgpPage, OgpProvider,
};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // JSON in production, human-readable otherwise. Logs go to stderr;
    // stdout carries the rendered output.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scraps_ogp=info,reqwest=warn"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "scraps-ogp failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env()?;

    match cli.command {
        Commands::Hydrate {
            page,
            title,
            readme,
        } => hydrate(&config, &page, title, readme.as_deref()).await,
        Commands::Preview { url, json } => preview(&config, &url, json).await,
        Commands::Search {
            index,
            query,
            and,
            num,
        } => search(&config, &index, &query, and, num).await,
    }
}

async fn hydrate(
    config: &Config,
    page: &Path,
    title: Option<String>,
    readme: Option<&Path>,
) -> AppResult<()> {
    let html = tokio::fs::read_to_string(page).await?;
    let provider: Arc<dyn OgpProvider> = Arc::new(OgpClient::from_config(config)?);

    let mounted = OgpPage::mount_html(&html, provider, config.fetch_timeout);
    for (target, state) in mounted.settle().await {
        info!(url = %target, state = state.name(), "card settled");
    }

    let mut shell = PageShell::new(&config.site_name);
    if let Some(title) = title {
        shell = shell.with_title(title);
    }
    if let Some(path) = readme {
        shell = shell.with_readme(tokio::fs::read_to_string(path).await?);
    }

    println!("{}", mounted.render(&shell).into_string());
    mounted.unmount();
    Ok(())
}

async fn preview(config: &Config, url: &str, json: bool) -> AppResult<()> {
    let target = LinkTarget::parse(url)?;
    let provider = Arc::new(OgpClient::from_config(config)?);

    let card = OgpCard::new(CardId(0), target, provider, config.fetch_timeout);
    card.start();
    let state = card.settled().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", render_card(card.target(), &state).into_string());
    }
    Ok(())
}

async fn search(
    config: &Config,
    index: &Path,
    query: &str,
    all_keywords: bool,
    limit: usize,
) -> AppResult<()> {
    let index = SearchIndex::load(index, &config.base_url).await?;
    let logic = if all_keywords {
        SearchLogic::And
    } else {
        SearchLogic::Or
    };

    let mut search_box = SearchBox::new(&index).with_logic(logic).with_limit(limit);
    search_box.fill(query);
    search_box.submit();

    println!("{}", search_results(search_box.results()).into_string());
    Ok(())
}
