//! Minimal STAC 1.0 object model: Items, Collections and their extents,
//! structural validation and JSON persistence.

pub mod collection;
pub mod extent;
pub mod item;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use collection::Collection;
pub use extent::Extent;
pub use item::{Asset, Item};

pub const STAC_VERSION: &str = "1.0.0";
pub const PROJECTION_EXTENSION: &str =
    "https://stac-extensions.github.io/projection/v1.1.0/schema.json";
pub const ITEM_ASSETS_EXTENSION: &str =
    "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";
pub const SCIENTIFIC_EXTENSION: &str =
    "https://stac-extensions.github.io/scientific/v1.0.0/schema.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(rel: &str, href: impl Into<String>) -> Self {
        Link {
            rel: rel.to_string(),
            href: href.into(),
            media_type: None,
            title: None,
        }
    }

    pub fn json(rel: &str, href: impl Into<String>) -> Self {
        Link {
            media_type: Some("application/json".to_string()),
            ..Link::new(rel, href)
        }
    }
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;

    Ok(())
}
