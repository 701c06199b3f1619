mod calendar;
mod cli;
mod cog;
mod constants;
mod download;
mod error;
mod grid;
mod href;
mod naming;
mod pipeline;
mod stac;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gdal = cli.gdal_translate.as_path();

    let result = match &cli.command {
        Commands::CreateCogs {
            source,
            destination,
            start,
            end,
            status,
            monthly,
        } => command::create_cogs(source, destination, start, end, *status, *monthly, gdal)
            .await
            .map(|count| format!("{} COGs written to `{}`", count, destination.display())),
        Commands::CreateDailyCollection {
            destination,
            start,
            end,
            status,
            cog_base,
            source_base,
        } => command::create_daily_collection(
            destination,
            start,
            end,
            *status,
            cog_base,
            source_base.as_deref(),
            gdal,
        )
        .await
        .map(|filename| format!("Collection saved to `{}`", filename)),
        Commands::CreateMonthlyCollection {
            destination,
            start,
            end,
            cog_base,
            source_base,
        } => command::create_monthly_collection(
            destination,
            start,
            end,
            cog_base,
            source_base.as_deref(),
            gdal,
        )
        .await
        .map(|filename| format!("Collection saved to `{}`", filename)),
        Commands::CreateDailyItem {
            destination,
            day,
            status,
            cog_base,
            source_base,
        } => command::create_daily_item(
            destination,
            day,
            *status,
            cog_base,
            source_base.as_deref(),
            gdal,
        )
        .await
        .map(|filename| format!("Item saved to `{}`", filename)),
        Commands::CreateMonthlyItem {
            destination,
            month,
            cog_base,
            source_base,
        } => command::create_monthly_item(destination, month, cog_base, source_base.as_deref(), gdal)
            .await
            .map(|filename| format!("Item saved to `{}`", filename)),
    };

    match result {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
