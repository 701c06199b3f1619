pub mod cogs;
pub mod daily;
pub mod monthly;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    cog::GdalTranslate,
    grid::NetCdfReader,
    href::Href,
    pipeline::Pipeline,
    stac::collection::COLLECTION_FILE,
};

pub use cogs::create_cogs;
pub use daily::{create_daily_collection, create_daily_item};
pub use monthly::{create_monthly_collection, create_monthly_item};

pub type NClimGridPipeline = Pipeline<GdalTranslate, NetCdfReader>;

/// COGs are created from `source_base` when given, else verified under
/// `cog_base`.
pub fn make_pipeline(
    cog_base: &str,
    source_base: Option<&str>,
    gdal_translate: &Path,
) -> Result<NClimGridPipeline> {
    Pipeline::new(
        Href::parse(cog_base),
        source_base.map(Href::parse),
        GdalTranslate::new(gdal_translate),
        NetCdfReader,
    )
    .with_context(|| format!("Cannot create COGs under `{}`", cog_base))
}

pub fn make_collection_file_name(destination: &Path) -> PathBuf {
    destination.join(COLLECTION_FILE)
}

// -- Tests -------------------------------------------------------------------
