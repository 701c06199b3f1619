use chrono::NaiveDate;
use indicatif::ProgressBar;
use tempfile::TempDir;
use tracing::{debug, info};

use super::Pipeline;
use crate::{
    calendar::Month,
    cog::Translate,
    constants::{Status, Variable, VARIABLES},
    download,
    error::{Error, Result},
    grid::{self, GridReader},
    href::Href,
    naming::{daily_cog_name, SourceSet},
    stac::{Asset, Collection, Item},
};

#[derive(Debug, Clone)]
/// The COGs of one day, and the NetCDF sources they were cut from when they
/// were created in this run.
pub struct DailyAssets {
    pub date: NaiveDate,
    pub cogs: Vec<(Variable, Href)>,
    pub sources: Option<SourceSet>,
}

impl DailyAssets {
    pub fn into_item(self, status: Status) -> Result<Item> {
        let mut item = Item::daily(self.date, status);

        for (var, cog) in &self.cogs {
            item.add_asset(var.as_str(), Asset::cog(cog.to_string(), *var));
        }

        if let Some(sources) = &self.sources {
            if sources.is_shared() {
                if let Some(href) = sources.unique().first() {
                    item.add_asset("netcdf", Asset::netcdf(href.to_string()));
                }
            } else {
                for (var, href) in sources.iter() {
                    item.add_asset(format!("{}-netcdf", var), Asset::netcdf(href.to_string()));
                }
            }
        }

        item.validate()?;
        Ok(item)
    }
}

impl<T: Translate, R: GridReader> Pipeline<T, R> {
    /// Creates or verifies the COGs of every valid day of `month`, or of
    /// `day` alone.
    pub async fn daily_assets(
        &self,
        month: &Month,
        status: Status,
        day: Option<u32>,
    ) -> Result<Vec<DailyAssets>> {
        // downloads live only as long as this month's processing
        let temp_dir = TempDir::new()?;

        let sources = self
            .source_base
            .as_ref()
            .map(|base| SourceSet::daily(base, month, status));
        let local = match &sources {
            Some(sources) => Some(download::localize(sources, temp_dir.path()).await?),
            None => None,
        };

        let num_days = self.daily_count(month, status, local.as_ref()).await?;
        let days = match day {
            Some(day) if day == 0 || day > num_days => {
                return Err(Error::existence(format!(
                    "Data for day {} in month {} does not exist.",
                    day, month
                )))
            }
            Some(day) => day..=day,
            None => 1..=num_days,
        };

        let mut assets = Vec::new();
        for item_day in days {
            let date = month.date(item_day).ok_or_else(|| {
                Error::existence(format!("Day {} is not in month {}.", item_day, month))
            })?;

            let mut cogs = Vec::with_capacity(VARIABLES.len());
            for var in VARIABLES {
                let cog = self.cog_base.join(&daily_cog_name(var, date, status));
                // the day of the month is its 1-based band in the monthly file
                self.materialize(local.as_ref(), var, item_day, &cog).await?;
                cogs.push((var, cog));
            }

            assets.push(DailyAssets {
                date,
                cogs,
                sources: sources.clone(),
            });
        }

        Ok(assets)
    }

    pub async fn daily_items(
        &self,
        month: &Month,
        status: Status,
        day: Option<u32>,
    ) -> Result<Vec<Item>> {
        self.daily_assets(month, status, day)
            .await?
            .into_iter()
            .map(|assets| assets.into_item(status))
            .collect()
    }

    /// A validated Collection holding every day of every month, or an error
    /// if any day fails.
    pub async fn daily_collection(
        &self,
        months: &[Month],
        status: Status,
        progress: &ProgressBar,
    ) -> Result<Collection> {
        let mut items = Vec::new();
        for month in months {
            info!("Creating daily items for {}", month);
            items.extend(self.daily_items(month, status, None).await?);
            progress.inc(1);
        }

        let mut collection = Collection::daily();
        collection.add_items(items)?;
        collection.validate()?;

        Ok(collection)
    }

    /// Creates the COGs of every valid day of every month and returns them.
    pub async fn daily_cogs(
        &self,
        months: &[Month],
        status: Status,
        progress: &ProgressBar,
    ) -> Result<Vec<Href>> {
        if !self.creates_cogs() {
            return Err(Error::existence("No NetCDF source given to create COGs from."));
        }

        let mut cogs = Vec::new();
        for month in months {
            info!("Creating daily COGs for {}", month);
            for assets in self.daily_assets(month, status, None).await? {
                cogs.extend(assets.cogs.into_iter().map(|(_, cog)| cog));
            }
            progress.inc(1);
        }

        Ok(cogs)
    }

    async fn daily_count(
        &self,
        month: &Month,
        status: Status,
        local: Option<&SourceSet>,
    ) -> Result<u32> {
        let count = match (status, local) {
            (Status::Scaled, _) => month.days,
            (Status::Prelim, Some(local)) => {
                let valid = grid::valid_step_count(&self.reader, local, month.days as usize)?;
                (valid as u32).min(month.days)
            }
            (Status::Prelim, None) => self.existing_prelim_days(month).await?,
        };

        if count == 0 {
            return Err(Error::existence(format!(
                "No '{}' days found in month {}.",
                status, month
            )));
        }
        debug!("{} has {} {} days", month, count, status);

        Ok(count)
    }

    /// Leading days of `month` with a preliminary COG for every variable. A
    /// day with only some of its COGs is a [`Error::Consistency`].
    async fn existing_prelim_days(&self, month: &Month) -> Result<u32> {
        for day in 1..=month.days {
            let Some(date) = month.date(day) else {
                return Ok(day - 1);
            };

            let mut present = Vec::with_capacity(VARIABLES.len());
            for var in VARIABLES {
                let cog = self.cog_base.join(&daily_cog_name(var, date, Status::Prelim));
                present.push((var, download::exists(&cog).await?));
            }

            let found = present.iter().filter(|(_, exists)| *exists).count();
            if found == 0 {
                return Ok(day - 1);
            }
            if found < VARIABLES.len() {
                let counts = present
                    .iter()
                    .map(|(var, exists)| format!("{}={}", var, if *exists { day } else { day - 1 }))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::Consistency { counts });
            }
        }

        Ok(month.days)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        naming::daily_nc_path,
        pipeline::testing::{touch, FakeReader, FakeTranslator},
    };

    fn january() -> Month {
        Month::new(2022, 1).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sources_in(root: &Path, month: &Month, status: Status) {
        for var in VARIABLES {
            touch(&root.join(daily_nc_path(month, status, var)));
        }
    }

    fn pipeline(
        cogs: &Path,
        sources: Option<&Path>,
        translator: FakeTranslator,
        reader: FakeReader,
    ) -> Pipeline<FakeTranslator, FakeReader> {
        Pipeline::new(
            Href::Local(cogs.to_path_buf()),
            sources.map(|s| Href::Local(s.to_path_buf())),
            translator,
            reader,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn should_create_collection_for_valid_prelim_days() {
        let nc_dir = TempDir::new().unwrap();
        let cog_dir = TempDir::new().unwrap();
        sources_in(nc_dir.path(), &january(), Status::Prelim);
        let translator = FakeTranslator::default();
        let jobs = translator.jobs.clone();
        let pipeline = pipeline(
            cog_dir.path(),
            Some(nc_dir.path()),
            translator,
            FakeReader::new(5, 31),
        );

        let collection = pipeline
            .daily_collection(&[january()], Status::Prelim, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(collection.items().len(), 5);
        for item in collection.items() {
            for var in VARIABLES {
                assert!(item.assets.contains_key(var.as_str()));
                assert!(item.assets.contains_key(&format!("{}-netcdf", var)));
            }
        }
        assert_eq!(collection.items()[0].id, "202201-grd-prelim-01");

        let [start, end] = collection.extent.temporal.interval[0];
        assert_eq!(start.unwrap().to_rfc3339(), "2022-01-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2022-01-05T23:59:59+00:00");

        let jobs = jobs.lock().unwrap();
        assert_eq!(jobs.len(), 20);
        assert!(jobs.iter().all(|job| (1..=5).contains(&job.band)));
        let tmax_day3 = jobs
            .iter()
            .find(|job| job.variable == Variable::Tmax && job.band == 3)
            .unwrap();
        assert!(tmax_day3.netcdf.ends_with("tmax-202201-grd-prelim.nc"));
        assert!(tmax_day3.cog.ends_with("tmax-20220103-prelim-cog.tif"));
    }

    #[tokio::test]
    async fn should_share_pre1970_source_asset() {
        let nc_dir = TempDir::new().unwrap();
        let cog_dir = TempDir::new().unwrap();
        let month = Month::new(1951, 1).unwrap();
        sources_in(nc_dir.path(), &month, Status::Scaled);
        let translator = FakeTranslator::default();
        let jobs = translator.jobs.clone();
        let pipeline = pipeline(
            cog_dir.path(),
            Some(nc_dir.path()),
            translator,
            FakeReader::new(31, 31),
        );

        let items = pipeline
            .daily_items(&month, Status::Scaled, Some(1))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "195101-grd-scaled-01");
        assert_eq!(items[0].assets.len(), 5);
        assert!(items[0].assets["netcdf"].href.ends_with("ncdd-195101-grd-scaled.nc"));
        assert!(jobs
            .lock()
            .unwrap()
            .iter()
            .all(|job| job.netcdf.ends_with("ncdd-195101-grd-scaled.nc")));
    }

    #[tokio::test]
    async fn should_use_every_calendar_day_for_scaled_data() {
        let nc_dir = TempDir::new().unwrap();
        let cog_dir = TempDir::new().unwrap();
        let month = Month::new(2021, 2).unwrap();
        sources_in(nc_dir.path(), &month, Status::Scaled);
        let pipeline = pipeline(
            cog_dir.path(),
            Some(nc_dir.path()),
            FakeTranslator::default(),
            FakeReader::new(0, 28),
        );

        let cogs = pipeline
            .daily_cogs(&[month], Status::Scaled, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(cogs.len(), 112);
        assert!(cog_dir.path().join("prcp-20210228-scaled-cog.tif").is_file());
    }

    #[tokio::test]
    async fn should_reject_inconsistent_prelim_sources() {
        let nc_dir = TempDir::new().unwrap();
        let cog_dir = TempDir::new().unwrap();
        sources_in(nc_dir.path(), &january(), Status::Prelim);
        let translator = FakeTranslator::default();
        let jobs = translator.jobs.clone();
        let mut reader = FakeReader::new(5, 31);
        reader.overrides.insert(Variable::Tavg, 4);
        let pipeline = pipeline(cog_dir.path(), Some(nc_dir.path()), translator, reader);

        let result = pipeline
            .daily_items(&january(), Status::Prelim, None)
            .await;

        assert!(matches!(result, Err(Error::Consistency { .. })));
        assert!(jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_fail_collection_when_conversion_fails() {
        let nc_dir = TempDir::new().unwrap();
        let cog_dir = TempDir::new().unwrap();
        sources_in(nc_dir.path(), &january(), Status::Prelim);
        let translator = FakeTranslator {
            fail_on: Some((Variable::Tmin, 2)),
            ..FakeTranslator::default()
        };
        let pipeline = pipeline(
            cog_dir.path(),
            Some(nc_dir.path()),
            translator,
            FakeReader::new(5, 31),
        );

        let result = pipeline
            .daily_collection(&[january()], Status::Prelim, &ProgressBar::hidden())
            .await;

        assert!(matches!(result, Err(Error::Cogify { band: 2, .. })));
    }

    #[tokio::test]
    async fn should_fail_for_missing_cog_when_verifying() {
        let cog_dir = TempDir::new().unwrap();
        let day = date(2022, 1, 1);
        for var in [Variable::Prcp, Variable::Tavg, Variable::Tmax] {
            touch(&cog_dir.path().join(daily_cog_name(var, day, Status::Scaled)));
        }
        let pipeline = pipeline(
            cog_dir.path(),
            None,
            FakeTranslator::default(),
            FakeReader::new(0, 0),
        );

        let result = pipeline
            .daily_items(&january(), Status::Scaled, Some(1))
            .await;

        match result {
            Err(Error::Existence(message)) => assert!(message.contains("tmin-20220101-scaled-cog.tif")),
            other => panic!("expected existence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_discover_prelim_days_from_existing_cogs() {
        let cog_dir = TempDir::new().unwrap();
        for day in 1..=3 {
            for var in VARIABLES {
                touch(&cog_dir.path().join(daily_cog_name(var, date(2022, 1, day), Status::Prelim)));
            }
        }
        let pipeline = pipeline(
            cog_dir.path(),
            None,
            FakeTranslator::default(),
            FakeReader::new(0, 0),
        );

        let items = pipeline
            .daily_items(&january(), Status::Prelim, None)
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.assets.len() == 4));

        let beyond = pipeline
            .daily_items(&january(), Status::Prelim, Some(4))
            .await;
        assert!(matches!(beyond, Err(Error::Existence(_))));

        touch(&cog_dir.path().join(daily_cog_name(Variable::Prcp, date(2022, 1, 4), Status::Prelim)));
        let partial = pipeline
            .daily_items(&january(), Status::Prelim, None)
            .await;
        assert!(matches!(partial, Err(Error::Consistency { .. })));
    }

    #[tokio::test]
    async fn should_fail_when_no_prelim_days_exist() {
        let cog_dir = TempDir::new().unwrap();
        let pipeline = pipeline(
            cog_dir.path(),
            None,
            FakeTranslator::default(),
            FakeReader::new(0, 0),
        );

        let result = pipeline
            .daily_items(&january(), Status::Prelim, None)
            .await;

        assert!(matches!(result, Err(Error::Existence(_))));
    }

    #[tokio::test]
    async fn should_require_sources_to_create_cogs() {
        let cog_dir = TempDir::new().unwrap();
        let pipeline = pipeline(
            cog_dir.path(),
            None,
            FakeTranslator::default(),
            FakeReader::new(0, 0),
        );

        let result = pipeline
            .daily_cogs(&[january()], Status::Scaled, &ProgressBar::hidden())
            .await;

        assert!(matches!(result, Err(Error::Existence(_))));
    }

    #[test]
    fn should_refuse_remote_cog_destination_when_creating() {
        let result = Pipeline::new(
            Href::parse("https://example.com/cogs"),
            Some(Href::parse("/data/nclimgrid-daily")),
            FakeTranslator::default(),
            FakeReader::new(0, 0),
        );

        assert!(matches!(result, Err(Error::Destination(_))));
    }
}
