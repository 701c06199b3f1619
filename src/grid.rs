//! Inspection of the NetCDF time stacks.
//!
//! Preliminary files are only partially populated: days (or months) after the
//! latest update are filled with -999. The number of usable time steps is the
//! run of leading steps whose spatial mean is above [`VALID_MEAN_THRESHOLD`].

use std::path::Path;

use tracing::debug;

use crate::{
    constants::{Variable, VALID_MEAN_THRESHOLD},
    error::{Error, Result},
    href::Href,
    naming::SourceSet,
};

/// Reads a variable's time stack from a local file.
pub trait GridReader {
    /// Spatial mean of each of the first `limit` time steps, skipping missing
    /// cells. A step with no valid cells has a NaN mean.
    fn time_step_means(&self, path: &Path, variable: Variable, limit: usize) -> Result<Vec<f64>>;
}

/// [`GridReader`] backed by libnetcdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetCdfReader;

#[cfg(feature = "netcdf")]
impl GridReader for NetCdfReader {
    fn time_step_means(&self, path: &Path, variable: Variable, limit: usize) -> Result<Vec<f64>> {
        let read_error = |reason: String| Error::Read {
            path: path.display().to_string(),
            reason,
        };

        let file = netcdf::open(path).map_err(|e| read_error(e.to_string()))?;
        let var = file
            .variable(variable.as_str())
            .ok_or_else(|| read_error(format!("no variable `{}`", variable)))?;

        let dims = var.dimensions();
        if dims.len() != 3 {
            return Err(read_error(format!(
                "expected (time, lat, lon) dimensions, found {}",
                dims.len()
            )));
        }
        let steps = dims[0].len().min(limit);
        let fill = fill_value(&var);

        let mut means = Vec::with_capacity(steps);
        for step in 0..steps {
            let values = var
                .get_values::<f32, _>((step..step + 1, .., ..))
                .map_err(|e| read_error(e.to_string()))?;
            means.push(masked_mean(&values, fill));
        }

        Ok(means)
    }
}

#[cfg(not(feature = "netcdf"))]
impl GridReader for NetCdfReader {
    fn time_step_means(&self, path: &Path, _variable: Variable, _limit: usize) -> Result<Vec<f64>> {
        Err(Error::Read {
            path: path.display().to_string(),
            reason: "built without the `netcdf` feature".to_string(),
        })
    }
}

#[cfg(feature = "netcdf")]
fn fill_value(var: &netcdf::Variable) -> Option<f32> {
    use netcdf::AttributeValue;

    for name in ["_FillValue", "missing_value"] {
        match var.attribute_value(name) {
            Some(Ok(AttributeValue::Float(value))) => return Some(value),
            Some(Ok(AttributeValue::Double(value))) => return Some(value as f32),
            _ => {}
        }
    }

    None
}

/// Mean of the cells that are neither NaN nor the fill value.
pub fn masked_mean(values: &[f32], fill: Option<f32>) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan() && Some(**v) != fill)
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + *v as f64, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Number of leading time steps carrying data.
pub fn count_valid_steps(means: &[f64]) -> usize {
    means
        .iter()
        .take_while(|mean| **mean > VALID_MEAN_THRESHOLD)
        .count()
}

/// Valid leading time steps, up to `limit`, shared by every variable of a
/// local source set. Variables disagreeing on the count is a
/// [`Error::Consistency`].
pub fn valid_step_count<R: GridReader + ?Sized>(
    reader: &R,
    sources: &SourceSet,
    limit: usize,
) -> Result<usize> {
    let mut counts: Vec<(Variable, usize)> = Vec::new();

    for (var, href) in sources.iter() {
        let path = match href {
            Href::Local(path) => path,
            Href::Remote(_) => {
                return Err(Error::Read {
                    path: href.to_string(),
                    reason: "time stacks can only be read from local files".to_string(),
                })
            }
        };
        let means = reader.time_step_means(path, var, limit)?;
        let count = count_valid_steps(&means);
        debug!("{} has {} valid time steps in {}", var, count, href);
        counts.push((var, count));
    }

    let first = match counts.first() {
        Some((_, count)) => *count,
        None => return Ok(0),
    };

    if counts.iter().any(|(_, count)| *count != first) {
        let counts = counts
            .iter()
            .map(|(var, count)| format!("{}={}", var, count))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::Consistency { counts });
    }

    Ok(first)
}

// -- Tests -------------------------------------------------------------------
