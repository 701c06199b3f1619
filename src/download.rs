//! Existence checks and streamed downloads for local and remote hrefs.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::Path,
};

use futures::StreamExt;
use reqwest::Url;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    href::Href,
    naming::SourceSet,
};

/// True if the href resolves. Remote hrefs are probed with a HEAD request.
pub async fn exists(href: &Href) -> Result<bool> {
    match href {
        Href::Local(path) => Ok(path.is_file()),
        Href::Remote(url) => {
            let response = reqwest::Client::new()
                .head(url.clone())
                .send()
                .await
                .map_err(|e| Error::transfer(url, e))?;

            Ok(response.status().is_success())
        }
    }
}

/// Streams the body at `url` into `file_path` chunk by chunk.
pub async fn download(url: &Url, file_path: &Path) -> Result<()> {
    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| Error::transfer(url, e))?;

    if !response.status().is_success() {
        return Err(Error::transfer(url, response.status()));
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(file_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| Error::transfer(url, e))?;
        file.write_all(&chunk)
            .map_err(|e| Error::transfer(url, e))?;
        downloaded += chunk.len() as u64;
    }
    file.flush().map_err(|e| Error::transfer(url, e))?;

    debug!("Downloaded {} bytes from {}", downloaded, url);

    Ok(())
}

/// Makes every source readable from local disk. Remote files are downloaded
/// into `temp_dir` once each, so the shared pre-1970 file is fetched a single
/// time. Local files must already exist.
pub async fn localize(sources: &SourceSet, temp_dir: &Path) -> Result<SourceSet> {
    let mut local: BTreeMap<Href, Href> = BTreeMap::new();

    for href in sources.unique() {
        let resolved = match href {
            Href::Local(path) => {
                if !path.is_file() {
                    return Err(Error::existence(format!("'{}' does not exist.", href)));
                }
                href.clone()
            }
            Href::Remote(url) => {
                let file_name = href
                    .file_name()
                    .ok_or_else(|| Error::transfer(url, "URL has no file name"))?;
                let file_path = temp_dir.join(file_name);

                info!("Downloading {}", url);
                download(url, &file_path).await?;
                Href::Local(file_path)
            }
        };
        local.insert(href.clone(), resolved);
    }

    let hrefs = sources
        .iter()
        .filter_map(|(var, href)| local.get(href).map(|resolved| (var, resolved.clone())))
        .collect();

    Ok(SourceSet::from_hrefs(hrefs))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{calendar::Month, constants::Status, naming::daily_nc_path};
    use crate::constants::VARIABLES;
    use tempfile::TempDir;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Answers every request with `status` and `body`, counting requests.
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    #[tokio::test]
    async fn should_check_local_existence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prcp-189501-cog.tif");

        assert!(!exists(&Href::Local(path.clone())).await.unwrap());
        touch(&path);
        assert!(exists(&Href::Local(path)).await.unwrap());
    }

    #[tokio::test]
    async fn should_localize_existing_local_sources() {
        let temp_dir = TempDir::new().unwrap();
        let base = Href::Local(temp_dir.path().to_path_buf());
        let month = Month::new(2022, 1).unwrap();
        for var in VARIABLES {
            touch(&temp_dir.path().join(daily_nc_path(&month, Status::Prelim, var)));
        }

        let sources = SourceSet::daily(&base, &month, Status::Prelim);
        let local = localize(&sources, temp_dir.path()).await.unwrap();

        assert_eq!(local, sources);
    }

    #[tokio::test]
    async fn should_keep_shared_source_shared() {
        let temp_dir = TempDir::new().unwrap();
        let base = Href::Local(temp_dir.path().to_path_buf());
        let month = Month::new(1951, 1).unwrap();
        touch(&temp_dir.path().join(daily_nc_path(&month, Status::Scaled, VARIABLES[0])));

        let sources = SourceSet::daily(&base, &month, Status::Scaled);
        let local = localize(&sources, temp_dir.path()).await.unwrap();

        assert!(local.is_shared());
    }

    #[tokio::test]
    async fn should_fail_for_missing_local_source() {
        let temp_dir = TempDir::new().unwrap();
        let base = Href::Local(temp_dir.path().to_path_buf());
        let sources = SourceSet::monthly(&base);

        let result = localize(&sources, temp_dir.path()).await;

        assert!(matches!(result, Err(Error::Existence(_))));
    }

    #[tokio::test]
    async fn should_download_shared_pre1970_file_once() {
        let (url, hits) = serve("200 OK", "netcdf").await;
        let temp_dir = TempDir::new().unwrap();
        let base = Href::parse(&format!("{}/nclimgrid-daily", url));
        let sources = SourceSet::daily(&base, &Month::new(1951, 1).unwrap(), Status::Scaled);

        let local = localize(&sources, temp_dir.path()).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(local.is_shared());
        let path = local.get(VARIABLES[0]).and_then(Href::local_path).unwrap();
        assert!(path.ends_with("ncdd-195101-grd-scaled.nc"));
        assert_eq!(fs::read_to_string(path).unwrap(), "netcdf");
    }

    #[tokio::test]
    async fn should_download_each_variable_file() {
        let (url, hits) = serve("200 OK", "netcdf").await;
        let temp_dir = TempDir::new().unwrap();
        let base = Href::parse(&format!("{}/nclimgrid-daily", url));
        let sources = SourceSet::daily(&base, &Month::new(2022, 1).unwrap(), Status::Prelim);

        let local = localize(&sources, temp_dir.path()).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert!(!local.is_shared());
        assert!(local.iter().all(|(_, href)| !href.is_remote()));
    }

    #[tokio::test]
    async fn should_report_http_error_as_transfer_error() {
        let (url, _) = serve("404 Not Found", "").await;
        let temp_dir = TempDir::new().unwrap();
        let href = Href::parse(&format!("{}/nclimgrid_prcp.nc", url));
        let Href::Remote(remote) = &href else {
            panic!("expected remote href");
        };

        let result = download(remote, &temp_dir.path().join("nclimgrid_prcp.nc")).await;

        assert!(matches!(result, Err(Error::Transfer { .. })));
        assert!(!exists(&href).await.unwrap());
    }

    #[tokio::test]
    async fn should_report_refused_connection_as_transfer_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let temp_dir = TempDir::new().unwrap();
        let url = Url::parse(&format!("http://{}/nclimgrid_prcp.nc", addr)).unwrap();

        let result = download(&url, &temp_dir.path().join("nclimgrid_prcp.nc")).await;

        assert!(matches!(result, Err(Error::Transfer { .. })));
    }
}
