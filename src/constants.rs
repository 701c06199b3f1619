//! Dataset-wide constants: variables, data status, grid geometry and
//! collection metadata.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The four gridded climate variables. Every Item carries one COG per variable.
pub enum Variable {
    Prcp,
    Tavg,
    Tmax,
    Tmin,
}

pub const VARIABLES: [Variable; 4] = [
    Variable::Prcp,
    Variable::Tavg,
    Variable::Tmax,
    Variable::Tmin,
];

impl Variable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Prcp => "prcp",
            Variable::Tavg => "tavg",
            Variable::Tmax => "tmax",
            Variable::Tmin => "tmin",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variable::Prcp => "Precipitation (mm)",
            Variable::Tavg => "Average Temperature (degree Celsius)",
            Variable::Tmax => "Maximum Temperature (degree Celsius)",
            Variable::Tmin => "Minimum Temperature (degree Celsius)",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
/// Data maturity. Final ("scaled") months are fully populated; preliminary
/// months only carry data for a leading run of days.
pub enum Status {
    Scaled,
    Prelim,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Scaled => "scaled",
            Status::Prelim => "prelim",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily files switch from one combined file to one file per variable in 1970.
pub const PER_VARIABLE_FROM_YEAR: i32 = 1970;

/// First month of the monthly archive; band 1 of every archive file.
pub const MONTHLY_START: (i32, u32) = (1895, 1);

/// Unpopulated preliminary days are filled with -999.
pub const VALID_MEAN_THRESHOLD: f64 = -900.0;

pub const WGS84_BBOX: [f64; 4] = [-124.6875, 24.5625, -67.020836, 49.354168];

pub const EPSG: u32 = 4326;
pub const SHAPE: [u32; 2] = [596, 1385];
pub const TRANSFORM: [f64; 6] = [
    0.041666666666666664,
    0.0,
    -124.70833333333333,
    0.0,
    -0.041666666666666664,
    49.375,
];

pub const COG_MEDIA_TYPE: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
pub const NETCDF_MEDIA_TYPE: &str = "application/netcdf";
pub const NETCDF_ASSET_TITLE: &str = "NetCDF file";

pub const LICENSE: &str = "proprietary";
pub const LICENSE_HREF: &str = "https://www.ngdc.noaa.gov/ngdcinfo/privacy.html#copyright";
pub const LICENSE_TITLE: &str = "Copyright Notice - NCEI";

pub const PROVIDER_NAME: &str =
    "National Oceanic and Atmospheric Administration, National Centers for Environmental Information";
pub const PROVIDER_URL: &str =
    "https://www.ncei.noaa.gov/access/metadata/landing-page/bin/iso?id=gov.noaa.ncdc:C00332";
pub const PROVIDER_ROLES: [&str; 3] = ["producer", "processor", "host"];

pub const DAILY_COLLECTION_ID: &str = "nclimgrid-daily";
pub const DAILY_COLLECTION_TITLE: &str = "NOAA Daily U.S. Climate Gridded Dataset (NClimGrid-d)";
pub const DAILY_COLLECTION_DESCRIPTION: &str = "The NOAA Daily U.S. Climate Gridded Dataset \
(NClimGrid-d) consists of four climate variables derived from the Global Historical Climatology \
Network Daily dataset (GHCN-D): maximum temperature, minimum temperature, average temperature, \
and precipitation. Daily values in a 1/24 degree lat/lon (nominal 5x5 kilometer) grid are \
provided for the Continental United States. Daily data is available from 1951 to the present.\n\n\
On an annual basis, approximately one year of \"final\" NClimGrid will be submitted to replace \
the initially supplied \"preliminary\" data for the same time period. Users should be sure to \
ascertain which level of data is required for their research.";
pub const DAILY_COLLECTION_KEYWORDS: [&str; 5] = [
    "Air Temperature",
    "Precipitation",
    "Surface Observations",
    "Daily Climatology",
    "CONUS",
];

pub const MONTHLY_COLLECTION_ID: &str = "nclimgrid-monthly";
pub const MONTHLY_COLLECTION_TITLE: &str = "NOAA Monthly U.S. Climate Gridded Dataset (NClimGrid)";
pub const MONTHLY_COLLECTION_DESCRIPTION: &str = "The NOAA Monthly U.S. Climate Gridded Dataset \
(NClimGrid) consists of four climate variables derived from the Global Historical Climatology \
Network Daily dataset (GHCN-D): maximum temperature, minimum temperature, average temperature, \
and precipitation. Monthly values in a 1/24 degree lat/lon (nominal 5x5 kilometer) grid are \
provided for the Continental United States. Monthly data is available from 1895 to the present.\n\n\
On an annual basis, approximately one year of \"final\" NClimGrid will be submitted to replace \
the initially supplied \"preliminary\" data for the same time period. Users should be sure to \
ascertain which level of data is required for their research.";
pub const MONTHLY_COLLECTION_KEYWORDS: [&str; 5] = [
    "Air Temperature",
    "Precipitation",
    "Surface Observations",
    "Monthly Climatology",
    "CONUS",
];

pub const MONTHLY_DATA_DOI: &str = "10.7289/V5SX6B56";
pub const MONTHLY_DATA_CITATION: &str = "Vose, Russell S., Applequist, Scott, Squires, Mike, \
Durre, Imke, Menne, Matthew J., Williams, Claude N. Jr., Fenimore, Chris, Gleason, Karin, and \
Arndt, Derek (2014): NOAA Monthly U.S. Climate Gridded Dataset (NClimGrid), Version 1. \
[indicate subset used]. NOAA National Centers for Environmental Information. \
DOI:10.7289/V5SX6B56 [access date].";
pub const MONTHLY_PUBLICATION_DOI: &str = "10.1175/JAMC-D-13-0248.1";
pub const MONTHLY_PUBLICATION_CITATION: &str = "Vose, R. S., Applequist, S., Squires, M., \
Durre, I., Menne, M. J., Williams, C. N., Jr., Fenimore, C., Gleason, K., & Arndt, D. (2014). \
Improved Historical Temperature and Precipitation Time Series for U.S. Climate Divisions, \
Journal of Applied Meteorology and Climatology, 53(5), 1232-1251.";
