//! hub-cli: query the DataEngineer Hub WordPress backend through the
//! caching data layer.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod print;

use clap::Parser;
use dataengineer_hub::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, Ctx, load_settings};
use handlers::{categories, forms, pages, posts};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::new(&settings, cli.refresh)?;

    match cli.command {
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Categories(cmd) => categories::handle(&ctx, cmd.action).await?,
        Commands::Pages(cmd) => pages::handle(&ctx, cmd.action).await?,
        Commands::Newsletter(cmd) => forms::newsletter(&ctx, cmd.action).await?,
        Commands::Contact(cmd) => forms::contact(&ctx, cmd.action).await?,
    }

    Ok(())
}
