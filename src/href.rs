//! Local paths and remote URLs behind a single location type.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Href {
    Local(PathBuf),
    Remote(Url),
}

impl Href {
    /// Anything carrying a URL scheme is remote, except `file://` URLs which
    /// resolve to a local path.
    pub fn parse(value: &str) -> Href {
        match Url::parse(value) {
            // single letter schemes are Windows drive letters
            Ok(url) if url.scheme().len() > 1 => {
                if url.scheme() == "file" {
                    if let Ok(path) = url.to_file_path() {
                        return Href::Local(path);
                    }
                }
                Href::Remote(url)
            }
            _ => Href::Local(PathBuf::from(value)),
        }
    }

    /// Appends a relative `/`-separated suffix. URLs are joined like POSIX
    /// paths, so the last segment of the base is always kept.
    pub fn join(&self, suffix: &str) -> Href {
        match self {
            Href::Local(path) => Href::Local(path.join(suffix)),
            Href::Remote(url) => {
                let mut joined = url.clone();
                let path = format!("{}/{}", url.path().trim_end_matches('/'), suffix);
                joined.set_path(&path);
                Href::Remote(joined)
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Href::Remote(_))
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Href::Local(path) => Some(path),
            Href::Remote(_) => None,
        }
    }

    pub fn file_name(&self) -> Option<String> {
        match self {
            Href::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
            Href::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Href::Local(path) => write!(f, "{}", path.display()),
            Href::Remote(url) => f.write_str(url.as_str()),
        }
    }
}

// -- Tests -------------------------------------------------------------------
