// The CLI drives the native hosts; browsers use the library's `web` module.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use directories::ProjectDirs;
#[cfg(not(target_arch = "wasm32"))]
use folio::{
    api::GraphClient,
    config::FeedConfig,
    credential::StaticLocation,
    feed::{MediaFeed, MemoryDocument},
    storage::{CredentialStore, FileStore},
};
#[cfg(not(target_arch = "wasm32"))]
use tracing::info;
#[cfg(not(target_arch = "wasm32"))]
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
use cli::{Cli, Commands, TokenAction};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("folio=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let store = match cli.store {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default()?,
    };

    match cli.command {
        Commands::Render { fallback, page_url, token, width } => {
            let mut url = Url::parse(&page_url).with_context(|| format!("invalid page url: {page_url}"))?;
            if let Some(t) = token {
                url.query_pairs_mut().append_pair(&config.token_param, &t);
            }
            let fallback = match fallback {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading fallback markup: {}", path.display()))?,
                None => String::new(),
            };

            let mut location = StaticLocation::new(url.as_str());
            let mut doc = MemoryDocument::new(config.container_selector.as_str(), fallback, width);
            let client = GraphClient::new(&config)?;
            let mut feed = MediaFeed::new(client, config);
            let outcome = feed.run(&mut doc, &mut location, &store).await;
            info!(?outcome, page_url = location.current(), "render finished");

            if let Some(container) = doc.container_ref() {
                println!("{}", container.html());
            }
        }
        Commands::Token { action } => {
            let key = config.storage_key.as_str();
            match action {
                TokenAction::Set { token } => {
                    store.set(key, &token)?;
                    println!("Stored token in {}", store.path().display());
                }
                TokenAction::Show => match store.get(key)? {
                    Some(token) => println!("{token}"),
                    None => println!("No token stored"),
                },
                TokenAction::Clear => {
                    store.remove(key)?;
                    println!("Token cleared");
                }
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config).context("serializing config")?);
        }
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<&Path>) -> Result<FeedConfig> {
    let config = match path {
        Some(p) => FeedConfig::load(p)?,
        None => match ProjectDirs::from("dev", "folio", "folio") {
            Some(proj) => FeedConfig::load(&proj.config_dir().join("folio.toml"))?,
            None => FeedConfig::default(),
        },
    };
    Ok(config.with_env_overrides())
}
