//! Naming conventions of the NOAA source layout and of the derived COGs.
//!
//! Daily NetCDF files live under `beta/by-month/{YYYY}/{MM}/`. Before 1970 a
//! single `ncdd-{YYYY}{MM}-grd-{status}.nc` file holds all four variables;
//! from 1970 each variable has its own `{var}-{YYYY}{MM}-grd-{status}.nc`.
//! The monthly archive is one `nclimgrid_{var}.nc` per variable covering the
//! whole series since 1895.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{
    calendar::Month,
    constants::{Status, Variable, PER_VARIABLE_FROM_YEAR, VARIABLES},
    href::Href,
};

/// Relative location of the daily NetCDF file holding `variable`.
pub fn daily_nc_path(month: &Month, status: Status, variable: Variable) -> String {
    let dir = format!("beta/by-month/{}/{:02}", month.year, month.month);
    if month.year < PER_VARIABLE_FROM_YEAR {
        format!("{}/ncdd-{}-grd-{}.nc", dir, month, status)
    } else {
        format!("{}/{}-{}-grd-{}.nc", dir, variable, month, status)
    }
}

pub fn monthly_nc_path(variable: Variable) -> String {
    format!("nclimgrid_{}.nc", variable)
}

pub fn daily_cog_name(variable: Variable, date: NaiveDate, status: Status) -> String {
    format!(
        "{}-{:04}{:02}{:02}-{}-cog.tif",
        variable,
        date.year(),
        date.month(),
        date.day(),
        status
    )
}

pub fn monthly_cog_name(variable: Variable, month: &Month) -> String {
    format!("{}-{}-cog.tif", variable, month)
}

pub fn daily_item_id(date: NaiveDate, status: Status) -> String {
    format!(
        "{:04}{:02}-grd-{}-{:02}",
        date.year(),
        date.month(),
        status,
        date.day()
    )
}

pub fn monthly_item_id(month: &Month) -> String {
    format!("nclimgrid-{}", month)
}

#[derive(Debug, Clone, PartialEq)]
/// The NetCDF location of each variable for one month. Variables share one
/// location when the file is the pre-1970 combined file.
pub struct SourceSet {
    hrefs: BTreeMap<Variable, Href>,
}

impl SourceSet {
    pub fn daily(base: &Href, month: &Month, status: Status) -> Self {
        let hrefs = VARIABLES
            .iter()
            .map(|&var| (var, base.join(&daily_nc_path(month, status, var))))
            .collect();

        SourceSet { hrefs }
    }

    pub fn monthly(base: &Href) -> Self {
        let hrefs = VARIABLES
            .iter()
            .map(|&var| (var, base.join(&monthly_nc_path(var))))
            .collect();

        SourceSet { hrefs }
    }

    pub fn from_hrefs(hrefs: BTreeMap<Variable, Href>) -> Self {
        SourceSet { hrefs }
    }

    pub fn get(&self, variable: Variable) -> Option<&Href> {
        self.hrefs.get(&variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, &Href)> {
        self.hrefs.iter().map(|(var, href)| (*var, href))
    }

    /// True when one file serves every variable.
    pub fn is_shared(&self) -> bool {
        let mut hrefs = self.hrefs.values();
        match hrefs.next() {
            Some(first) => self.hrefs.len() > 1 && hrefs.all(|href| href == first),
            None => false,
        }
    }

    /// Distinct locations, each listed once, in variable order.
    pub fn unique(&self) -> Vec<&Href> {
        let mut unique: Vec<&Href> = Vec::new();
        for href in self.hrefs.values() {
            if !unique.contains(&href) {
                unique.push(href);
            }
        }

        unique
    }
}

// -- Tests -------------------------------------------------------------------
