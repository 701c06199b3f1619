use indicatif::ProgressBar;
use tempfile::TempDir;
use tracing::{debug, info};

use super::Pipeline;
use crate::{
    calendar::Month,
    cog::Translate,
    constants::{Variable, VARIABLES},
    download,
    error::{Error, Result},
    grid::{self, GridReader},
    href::Href,
    naming::{monthly_cog_name, SourceSet},
    stac::{Asset, Collection, Item},
};

#[derive(Debug, Clone)]
pub struct MonthlyAssets {
    pub month: Month,
    pub cogs: Vec<(Variable, Href)>,
}

impl MonthlyAssets {
    pub fn into_item(self) -> Result<Item> {
        let mut item = Item::monthly(&self.month);
        for (var, cog) in &self.cogs {
            item.add_asset(var.as_str(), Asset::cog(cog.to_string(), *var));
        }

        item.validate()?;
        Ok(item)
    }
}

impl<T: Translate, R: GridReader> Pipeline<T, R> {
    /// Creates or verifies the COGs of each month. Every month is cut from
    /// the same per-variable archive, which is fetched once for the run.
    pub async fn monthly_assets(&self, months: &[Month]) -> Result<Vec<MonthlyAssets>> {
        let bands = months
            .iter()
            .map(|month| month.archive_index().map(|band| (*month, band)))
            .collect::<Result<Vec<_>>>()?;

        // the archive is only read as far as the latest requested month
        let last_band = bands.iter().map(|(_, band)| *band).max().unwrap_or(0);

        let temp_dir = TempDir::new()?;
        let local = match &self.source_base {
            Some(base) => {
                let local = download::localize(&SourceSet::monthly(base), temp_dir.path()).await?;
                let available = grid::valid_step_count(&self.reader, &local, last_band as usize)?;
                debug!("Monthly archive holds {} months", available);
                Some((local, available as u32))
            }
            None => None,
        };

        let mut assets = Vec::with_capacity(bands.len());
        for (month, band) in bands {
            if let Some((_, available)) = &local {
                if band > *available {
                    return Err(Error::existence(format!(
                        "Month {} is not in the monthly archive.",
                        month
                    )));
                }
            }

            let mut cogs = Vec::with_capacity(VARIABLES.len());
            for var in VARIABLES {
                let cog = self.cog_base.join(&monthly_cog_name(var, &month));
                self.materialize(local.as_ref().map(|(sources, _)| sources), var, band, &cog)
                    .await?;
                cogs.push((var, cog));
            }

            assets.push(MonthlyAssets { month, cogs });
        }

        Ok(assets)
    }

    pub async fn monthly_items(&self, months: &[Month]) -> Result<Vec<Item>> {
        self.monthly_assets(months)
            .await?
            .into_iter()
            .map(MonthlyAssets::into_item)
            .collect()
    }

    pub async fn monthly_collection(
        &self,
        months: &[Month],
        progress: &ProgressBar,
    ) -> Result<Collection> {
        info!("Creating monthly items for {} months", months.len());
        let items = self.monthly_items(months).await?;
        progress.inc(months.len() as u64);

        let mut collection = Collection::monthly();
        collection.add_items(items)?;
        collection.validate()?;

        Ok(collection)
    }

    pub async fn monthly_cogs(&self, months: &[Month], progress: &ProgressBar) -> Result<Vec<Href>> {
        if !self.creates_cogs() {
            return Err(Error::existence("No NetCDF source given to create COGs from."));
        }

        info!("Creating monthly COGs for {} months", months.len());
        let cogs = self
            .monthly_assets(months)
            .await?
            .into_iter()
            .flat_map(|assets| assets.cogs.into_iter().map(|(_, cog)| cog))
            .collect();
        progress.inc(months.len() as u64);

        Ok(cogs)
    }
}

// -- Tests -------------------------------------------------------------------
