mod cli;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::{OptionExt, ResultExt};
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vitrina_catalog::{CatalogBuilder, ImageMode};
use vitrina_config::{Config, ConfigLoader};
use vitrina_drive::{DriveLister, extract_id, root_folder_id};
use vitrina_fetch::{ImageCache, ResilientFetcher};
use vitrina_transport::TransportHandle;
use vitrina_transport::client::{HttpTransport, TransportOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.default_log_level());
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr so that stdout only ever carries JSON.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let (lister, fetcher) = clients(&config)?;
    match cli.command {
        Command::Catalog { folder, links, pretty } => {
            let root = folder.or_else(|| config.root_folder.clone()).ok_or_raise(|| ErrorKind::MissingFolder)?;
            let image_mode = if links { ImageMode::Link } else { config.image_mode };
            let records = CatalogBuilder::new(lister, fetcher)
                .with_image_mode(image_mode)
                .build(&root)
                .await
                .or_raise(|| ErrorKind::Catalog)?;
            tracing::info!(products = records.len(), "Catalog built");
            print_json(&records, pretty)
        },
        Command::List { folder } => {
            let id = root_folder_id(&folder).or_raise(|| ErrorKind::Listing)?;
            let children = lister.list_children(&id).await.or_raise(|| ErrorKind::Listing)?;
            print_json(&children, true)
        },
        Command::Image { image } => {
            let data_uri = fetcher.fetch_image(&ImageCache::new(), extract_id(&image)).await;
            writeln!(io::stdout(), "{data_uri}").or_raise(|| ErrorKind::Output)
        },
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new().with_default_file(),
    };
    loader
        .or_raise(|| ErrorKind::Config)?
        .with_env()
        .with_api_key(cli.api_key.clone())
        .load()
        .or_raise(|| ErrorKind::Config)
}

fn clients(config: &Config) -> Result<(DriveLister, ResilientFetcher)> {
    let options = TransportOptions { timeout: config.timeout(), user_agent: config.user_agent.clone() };
    let primary: TransportHandle = Arc::new(HttpTransport::primary(&options).or_raise(|| ErrorKind::Transport)?);
    let alternate: TransportHandle = Arc::new(HttpTransport::alternate(&options).or_raise(|| ErrorKind::Transport)?);
    let lister = DriveLister::new(primary.clone(), &config.api_base, &config.api_key);
    let fetcher = ResilientFetcher::new(primary, alternate)
        .with_descriptor_proxies(config.descriptor_proxies.clone())
        .with_image_proxies(config.image_proxies.clone());
    Ok((lister, fetcher))
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let written = match pretty {
        true => serde_json::to_writer_pretty(&mut stdout, value),
        false => serde_json::to_writer(&mut stdout, value),
    };
    written.or_raise(|| ErrorKind::Output)?;
    writeln!(stdout).or_raise(|| ErrorKind::Output)
}
