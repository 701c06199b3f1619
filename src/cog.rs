//! COG creation from NetCDF time slices and COG existence checks.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use tokio::process::Command;
use tracing::{debug, error, warn};

use crate::{
    constants::{Variable, EPSG},
    download,
    error::{Error, Result},
    href::Href,
};

#[derive(Debug, Clone, Copy)]
/// One band of one NetCDF variable to be written as a COG.
pub struct CogJob<'a> {
    pub netcdf: &'a Path,
    pub variable: Variable,
    /// 1-based position in the file's time dimension.
    pub band: u32,
    pub cog: &'a Path,
}

impl CogJob<'_> {
    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Cogify {
            cog: self.cog.display().to_string(),
            netcdf: self.netcdf.display().to_string(),
            band: self.band,
            reason: reason.into(),
        }
    }
}

/// A raster conversion tool. Failing to produce the COG is an
/// [`Error::Cogify`].
#[allow(async_fn_in_trait)]
pub trait Translate {
    async fn translate(&self, job: &CogJob<'_>) -> Result<()>;
}

#[derive(Debug, Clone)]
/// Runs GDAL's `gdal_translate` as a subprocess.
pub struct GdalTranslate {
    program: PathBuf,
}

impl GdalTranslate {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        GdalTranslate {
            program: program.into(),
        }
    }

    pub fn args(job: &CogJob<'_>) -> Vec<OsString> {
        let mut source = OsString::from("netcdf:");
        source.push(job.netcdf.as_os_str());
        source.push(format!(":{}", job.variable));

        vec![
            "-of".into(),
            "COG".into(),
            "-a_srs".into(),
            format!("EPSG:{}", EPSG).into(),
            "-co".into(),
            "compress=deflate".into(),
            "-b".into(),
            job.band.to_string().into(),
            source,
            job.cog.as_os_str().to_owned(),
        ]
    }
}

impl Default for GdalTranslate {
    fn default() -> Self {
        GdalTranslate::new("gdal_translate")
    }
}

impl Translate for GdalTranslate {
    async fn translate(&self, job: &CogJob<'_>) -> Result<()> {
        if let Some(parent) = job.cog.parent() {
            fs::create_dir_all(parent)?;
        }

        // the COG only appears under its final name once complete
        let partial = partial_path(job.cog);
        let staged = CogJob {
            cog: &partial,
            ..*job
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(GdalTranslate::args(&staged));
        debug!("executing {cmd:?}");

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                discard(&partial);
                return Err(job.error(e.to_string()));
            }
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{}", stdout.trim());

        if !output.status.success() {
            error!("{}", stderr.trim());
            discard(&partial);
            return Err(job.error(format!("{} {}", output.status, stderr.trim())));
        }
        debug!("{}", stderr.trim());

        fs::rename(&partial, job.cog).map_err(|e| {
            discard(&partial);
            job.error(format!("cannot move {} into place: {}", partial.display(), e))
        })
    }
}

/// Hidden sibling of `cog` that the conversion tool writes to.
fn partial_path(cog: &Path) -> PathBuf {
    let name = cog
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    cog.with_file_name(format!(".{}.part", name))
}

fn discard(partial: &Path) {
    if partial.exists() {
        if let Err(e) = fs::remove_file(partial) {
            warn!("Cannot remove {}: {}", partial.display(), e);
        }
    }
}

/// Fails with [`Error::Existence`] unless the COG at `href` exists.
pub async fn verify(href: &Href) -> Result<()> {
    if !download::exists(href).await? {
        return Err(Error::existence(format!("'{}' does not exist.", href)));
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------
