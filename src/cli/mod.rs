//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::Status;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Creates STAC Collections and Cloud-Optimized GeoTIFFs for NClimGrid
pub struct Cli {
    /// gdal_translate executable used to create COGs
    #[arg(
        long,
        global = true,
        env = "NCLIMGRID_GDAL_TRANSLATE",
        default_value = "gdal_translate"
    )]
    pub gdal_translate: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create COGs from NetCDF files for a range of months
    CreateCogs {
        /// Directory or URL holding the NetCDF files
        source: String,
        /// Directory to write the COGs to
        destination: PathBuf,
        /// First month, YYYYMM
        start: String,
        /// Last month, YYYYMM
        end: String,
        /// Daily data status
        #[arg(long, value_enum, default_value_t = Status::Scaled)]
        status: Status,
        /// Convert the monthly archive instead of daily files
        #[arg(long)]
        monthly: bool,
    },
    /// Create a daily Collection for a range of months
    CreateDailyCollection {
        /// Directory to write the Collection to
        destination: PathBuf,
        /// First month, YYYYMM
        start: String,
        /// Last month, YYYYMM
        end: String,
        #[arg(value_enum)]
        status: Status,
        /// Directory or URL of the COGs
        cog_base: String,
        /// Create COGs from the NetCDF files at this directory or URL
        #[arg(long)]
        source_base: Option<String>,
    },
    /// Create a monthly Collection for a range of months
    CreateMonthlyCollection {
        /// Directory to write the Collection to
        destination: PathBuf,
        /// First month, YYYYMM
        start: String,
        /// Last month, YYYYMM
        end: String,
        /// Directory or URL of the COGs
        cog_base: String,
        /// Create COGs from the NetCDF files at this directory or URL
        #[arg(long)]
        source_base: Option<String>,
    },
    /// Create a single daily Item
    CreateDailyItem {
        /// File to write the Item to
        destination: PathBuf,
        /// Day, YYYYMMDD
        day: String,
        #[arg(value_enum)]
        status: Status,
        /// Directory or URL of the COGs
        cog_base: String,
        /// Create COGs from the NetCDF files at this directory or URL
        #[arg(long)]
        source_base: Option<String>,
    },
    /// Create a single monthly Item
    CreateMonthlyItem {
        /// File to write the Item to
        destination: PathBuf,
        /// Month, YYYYMM
        month: String,
        /// Directory or URL of the COGs
        cog_base: String,
        /// Create COGs from the NetCDF files at this directory or URL
        #[arg(long)]
        source_base: Option<String>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------
