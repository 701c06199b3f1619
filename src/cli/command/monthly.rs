use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::{
    calendar::{generate_months, Month},
    cli::{create_progress_bar, create_spinner},
};

use super::{make_collection_file_name, make_pipeline};

pub async fn create_monthly_collection(
    destination: &Path,
    start: &str,
    end: &str,
    cog_base: &str,
    source_base: Option<&str>,
    gdal_translate: &Path,
) -> Result<String> {
    let months = generate_months(start, end)?;
    let pipeline = make_pipeline(cog_base, source_base, gdal_translate)?;

    let pb = create_progress_bar(months.len() as u64, "Creating monthly items...".to_string());
    let collection = pipeline
        .monthly_collection(&months, &pb)
        .await
        .with_context(|| format!("Cannot create monthly collection for {}-{}", start, end))?;
    pb.finish_with_message(format!("{} monthly items created", collection.items().len()));

    let file_name = make_collection_file_name(destination);
    collection.save(&file_name)?;

    Ok(file_name.to_string_lossy().to_string())
}

pub async fn create_monthly_item(
    destination: &Path,
    month: &str,
    cog_base: &str,
    source_base: Option<&str>,
    gdal_translate: &Path,
) -> Result<String> {
    let month = Month::parse(month, "month")?;
    let pipeline = make_pipeline(cog_base, source_base, gdal_translate)?;

    let bar = create_spinner(format!("Creating monthly item for {}...", month));
    let item = pipeline
        .monthly_items(&[month])
        .await
        .with_context(|| format!("Cannot create monthly item for {}", month))?
        .pop()
        .ok_or_else(|| anyhow!("No monthly item created for {}", month))?;
    bar.finish_with_message(format!("Monthly item {} created", item.id));

    item.save(destination)?;

    Ok(destination.to_string_lossy().to_string())
}
