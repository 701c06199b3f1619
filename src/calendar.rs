//! Expands a `YYYYMM`-`YYYYMM` range into calendar months.

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::{
    constants::MONTHLY_START,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// One calendar month and its number of days (proleptic Gregorian).
pub struct Month {
    pub year: i32,
    pub month: u32,
    pub days: u32,
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month::starting)
    }

    fn starting(first: NaiveDate) -> Self {
        let days = match first.month() {
            2 if first.leap_year() => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        };

        Month {
            year: first.year(),
            month: first.month(),
            days,
            first,
        }
    }

    /// Parses a strict six-digit `YYYYMM` string.
    pub fn parse(value: &str, which: &'static str) -> Result<Self> {
        let format_error = || Error::Format {
            which,
            value: value.to_string(),
            expected: "YYYYMM",
        };

        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_error());
        }
        let year = value[0..4].parse().map_err(|_| format_error())?;
        let month = value[4..6].parse().map_err(|_| format_error())?;

        Month::new(year, month).ok_or_else(format_error)
    }

    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Month::new(self.year + 1, 1)
        } else {
            Month::new(self.year, self.month + 1)
        }
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first + TimeDelta::days(i64::from(self.days) - 1)
    }

    /// 1-based band of this month in the monthly archive, which starts in
    /// January 1895.
    pub fn archive_index(&self) -> Result<u32> {
        let (start_year, start_month) = MONTHLY_START;
        let offset = (self.year - start_year) * 12 + self.month as i32 - start_month as i32;
        if offset < 0 {
            return Err(Error::Range(format!(
                "Monthly data starts in {}{:02}, {} is out of range",
                start_year, start_month, self
            )));
        }

        Ok(offset as u32 + 1)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Month::starting(date - TimeDelta::days(i64::from(date.day0())))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

/// Parses a `YYYYMMDD` day.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    let format_error = || Error::Format {
        which: "day",
        value: value.to_string(),
        expected: "YYYYMMDD",
    };

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error());
    }

    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| format_error())
}

/// Every month from `start` to `end` inclusive, in calendar order.
pub fn generate_months(start: &str, end: &str) -> Result<Vec<Month>> {
    let start_month = Month::parse(start, "start")?;
    let end_month = Month::parse(end, "end")?;

    if start_month > end_month {
        return Err(Error::Range(format!(
            "End date {} must be >= start date {}",
            end, start
        )));
    }

    let mut months = vec![start_month];
    let mut current = start_month;
    while current < end_month {
        current = match current.next() {
            Some(next) => next,
            None => break,
        };
        months.push(current);
    }

    Ok(months)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_count_leap_year_days() {
        assert_eq!(Month::new(1896, 2).unwrap().days, 29);
        assert_eq!(Month::new(1895, 2).unwrap().days, 28);
        assert_eq!(Month::new(1900, 2).unwrap().days, 28);
        assert_eq!(Month::new(2000, 2).unwrap().days, 29);
        assert_eq!(Month::new(2022, 1).unwrap().days, 31);
        assert_eq!(Month::new(2022, 4).unwrap().days, 30);
    }

    #[test]
    fn should_bound_month_by_first_and_last_day() {
        let february = Month::new(2000, 2).unwrap();
        assert_eq!(february.first_day(), NaiveDate::from_ymd_opt(2000, 2, 1).unwrap());
        assert_eq!(february.last_day(), NaiveDate::from_ymd_opt(2000, 2, 29).unwrap());

        let december = Month::new(1969, 12).unwrap();
        assert_eq!(december.last_day(), NaiveDate::from_ymd_opt(1969, 12, 31).unwrap());
    }

    #[test]
    fn should_make_month_from_any_day() {
        let month = Month::from(NaiveDate::from_ymd_opt(1896, 2, 17).unwrap());

        assert_eq!(month, Month::new(1896, 2).unwrap());
        assert_eq!(month.days, 29);
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(1896, 2, 1).unwrap());
    }

    #[test]
    fn should_generate_months_across_year_boundary() {
        let months = generate_months("201912", "202001").unwrap();

        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2019, 12));
        assert_eq!((months[1].year, months[1].month), (2020, 1));
    }

    #[test]
    fn should_generate_months_across_several_years() {
        let months = generate_months("189511", "189802").unwrap();

        assert_eq!(months.len(), 28);
        assert_eq!(months.first().unwrap().to_string(), "189511");
        assert_eq!(months.last().unwrap().to_string(), "189802");
        assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(months[3].days, 29); // February 1896
    }

    #[test]
    fn should_generate_single_month() {
        let months = generate_months("202201", "202201").unwrap();

        assert_eq!(months, vec![Month::new(2022, 1).unwrap()]);
    }

    #[test]
    fn should_reject_bad_format() {
        assert!(matches!(
            generate_months("2022-1", "202202"),
            Err(Error::Format { which: "start", .. })
        ));
        assert!(matches!(
            generate_months("202201", "202213"),
            Err(Error::Format { which: "end", .. })
        ));
        assert!(matches!(
            generate_months("20220", "202202"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn should_reject_inverted_range() {
        assert!(matches!(
            generate_months("202202", "202201"),
            Err(Error::Range(_))
        ));
    }

    #[test]
    fn should_index_monthly_archive_from_one() {
        assert_eq!(Month::new(1895, 1).unwrap().archive_index().unwrap(), 1);
        assert_eq!(Month::new(1895, 2).unwrap().archive_index().unwrap(), 2);
        assert_eq!(Month::new(1896, 1).unwrap().archive_index().unwrap(), 13);
        assert!(matches!(
            Month::new(1894, 12).unwrap().archive_index(),
            Err(Error::Range(_))
        ));
    }

    #[test]
    fn should_parse_day() {
        let day = parse_day("20220105").unwrap();

        assert_eq!(day, NaiveDate::from_ymd_opt(2022, 1, 5).unwrap());
        assert_eq!(Month::from(day), Month::new(2022, 1).unwrap());
        assert!(parse_day("20220230").is_err());
        assert!(parse_day("2022015").is_err());
    }
}
