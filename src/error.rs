//! Errors raised while resolving, materializing and cataloguing NClimGrid data.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Incorrect {which} date format `{value}`, should be {expected}")]
    Format {
        which: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Range(String),

    #[error("Failed to transfer `{href}`: {reason}")]
    Transfer { href: String, reason: String },

    /// Preliminary files report different numbers of populated time steps,
    /// most likely because they come from different NOAA updates.
    #[error("Preliminary data variables differ in number of valid time steps ({counts})")]
    Consistency { counts: String },

    #[error("{0}")]
    Existence(String),

    #[error("Failed to create `{cog}` from `{netcdf}` (band {band}): {reason}")]
    Cogify {
        cog: String,
        netcdf: String,
        band: u32,
        reason: String,
    },

    #[error("Invalid STAC {kind} `{id}`: {reason}")]
    Validation {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("Failed to read `{path}`: {reason}")]
    Read { path: String, reason: String },

    #[error("COGs can only be created in a local directory, not `{0}`")]
    Destination(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn existence(message: impl Into<String>) -> Self {
        Error::Existence(message.into())
    }

    pub(crate) fn transfer(href: impl ToString, reason: impl ToString) -> Self {
        Error::Transfer {
            href: href.to_string(),
            reason: reason.to_string(),
        }
    }
}
