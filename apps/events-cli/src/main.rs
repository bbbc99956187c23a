//! Events CLI
//!
//! Talks to MongoDB directly through the events domain service, or to a
//! throwaway in-memory store with `--in-memory`.

use clap::Parser;
use core_config::tracing::{init_cli_tracing, install_color_eyre};
use database::RetryConfig;
use domain_events::{EventRepository, EventService, InMemoryEventRepository, MongoEventRepository};
use eyre::Result;
use tracing::info;

mod cli;
mod commands;
mod config;
mod output;

use cli::{Cli, Command, OutputFormat};

async fn execute<R: EventRepository>(
    service: EventService<R>,
    command: Command,
    format: OutputFormat,
) -> Result<()> {
    let outcome = commands::run(&service, command).await?;
    println!("{}", outcome.render(format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    init_cli_tracing(cli.verbose);

    if cli.in_memory {
        info!("Using in-memory event store");
        let service = EventService::new(InMemoryEventRepository::new());
        return execute(service, cli.command, cli.output).await;
    }

    let mongo = config::mongo_config(cli.mongo_url.as_deref(), cli.database.as_deref())?;
    info!(url = %mongo.redacted_url(), database = mongo.database(), "Connecting to MongoDB");

    let client =
        database::mongodb::connect_from_config_with_retry(&mongo, Some(RetryConfig::default()))
            .await
            .map_err(|e| eyre::eyre!("MongoDB connection failed: {}", e))?;
    let repository = MongoEventRepository::new(&client.database(mongo.database()));

    let result = execute(EventService::new(repository), cli.command, cli.output).await;
    client.shutdown().await;
    result
}
