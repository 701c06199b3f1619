use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::{calendar::generate_months, cli::create_progress_bar, constants::Status};

use super::make_pipeline;

/// Converts every month's NetCDF source under `source` into COGs under
/// `destination`, returning the number of COGs written.
pub async fn create_cogs(
    source: &str,
    destination: &Path,
    start: &str,
    end: &str,
    status: Status,
    monthly: bool,
    gdal_translate: &Path,
) -> Result<usize> {
    let months = generate_months(start, end)?;
    let cog_base = destination.to_string_lossy();
    let pipeline = make_pipeline(&cog_base, Some(source), gdal_translate)?;

    let pb = create_progress_bar(months.len() as u64, "Creating COGs...".to_string());
    let cogs = if monthly {
        pipeline.monthly_cogs(&months, &pb).await
    } else {
        pipeline.daily_cogs(&months, status, &pb).await
    }
    .with_context(|| format!("Cannot create COGs from `{}`", source))?;
    pb.finish_with_message(format!("{} COGs created", cogs.len()));

    info!("Wrote {} COGs to {}", cogs.len(), destination.display());

    Ok(cogs.len())
}
