//! Date-indexed asset resolution and Item construction.
//!
//! For every requested month the pipeline resolves the NetCDF sources,
//! downloads them if remote, works out how many days (or months) carry data,
//! then creates or verifies one COG per variable and time step before
//! assembling Items. Without a source base only existing COGs are used.

pub mod daily;
pub mod monthly;

use tracing::debug;

use crate::{
    cog::{self, CogJob, Translate},
    constants::Variable,
    error::{Error, Result},
    grid::GridReader,
    href::Href,
    naming::SourceSet,
};


pub struct Pipeline<T, R> {
    cog_base: Href,
    source_base: Option<Href>,
    translator: T,
    reader: R,
}

impl<T: Translate, R: GridReader> Pipeline<T, R> {
    /// COGs are created when `source_base` is given, otherwise they must
    /// already exist under `cog_base`. Creation needs a local `cog_base`.
    pub fn new(cog_base: Href, source_base: Option<Href>, translator: T, reader: R) -> Result<Self> {
        if source_base.is_some() && cog_base.is_remote() {
            return Err(Error::Destination(cog_base.to_string()));
        }

        Ok(Pipeline {
            cog_base,
            source_base,
            translator,
            reader,
        })
    }

    pub fn creates_cogs(&self) -> bool {
        self.source_base.is_some()
    }

    /// Creates the COG from band `band` of the local source when sources are
    /// given, then checks that the COG exists.
    async fn materialize(
        &self,
        sources: Option<&SourceSet>,
        variable: Variable,
        band: u32,
        cog: &Href,
    ) -> Result<()> {
        if let Some(sources) = sources {
            let netcdf = sources
                .get(variable)
                .and_then(Href::local_path)
                .ok_or_else(|| Error::existence(format!("No local NetCDF for {}.", variable)))?;
            let cog_path = cog
                .local_path()
                .ok_or_else(|| Error::Destination(cog.to_string()))?;

            debug!("Creating {} from band {} of {}", cog, band, netcdf.display());
            let job = CogJob {
                netcdf,
                variable,
                band,
                cog: cog_path,
            };
            self.translator.translate(&job).await?;
        }

        cog::verify(cog).await
    }
}
