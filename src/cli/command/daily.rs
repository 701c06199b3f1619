use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use tracing::info;

use crate::{
    calendar::{generate_months, parse_day, Month},
    cli::{create_progress_bar, create_spinner},
    constants::Status,
};

use super::{make_collection_file_name, make_pipeline};

pub async fn create_daily_collection(
    destination: &Path,
    start: &str,
    end: &str,
    status: Status,
    cog_base: &str,
    source_base: Option<&str>,
    gdal_translate: &Path,
) -> Result<String> {
    let months = generate_months(start, end)?;
    let pipeline = make_pipeline(cog_base, source_base, gdal_translate)?;

    let pb = create_progress_bar(months.len() as u64, "Creating daily items...".to_string());
    let collection = pipeline
        .daily_collection(&months, status, &pb)
        .await
        .with_context(|| format!("Cannot create daily collection for {}-{}", start, end))?;
    pb.finish_with_message(format!("{} daily items created", collection.items().len()));

    let file_name = make_collection_file_name(destination);
    collection.save(&file_name)?;
    info!("Saved {} items", collection.items().len());

    Ok(file_name.to_string_lossy().to_string())
}

pub async fn create_daily_item(
    destination: &Path,
    day: &str,
    status: Status,
    cog_base: &str,
    source_base: Option<&str>,
    gdal_translate: &Path,
) -> Result<String> {
    let date = parse_day(day)?;
    let month = Month::from(date);
    let pipeline = make_pipeline(cog_base, source_base, gdal_translate)?;

    let bar = create_spinner(format!("Creating daily item for {}...", day));
    let item = pipeline
        .daily_items(&month, status, Some(date.day()))
        .await
        .with_context(|| format!("Cannot create daily item for {}", day))?
        .pop()
        .ok_or_else(|| anyhow!("No daily item created for {}", day))?;
    bar.finish_with_message(format!("Daily item {} created", item.id));

    item.save(destination)?;

    Ok(destination.to_string_lossy().to_string())
}
