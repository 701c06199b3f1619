//! STAC Collections of daily or monthly Items.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    extent::{SpatialExtent, TemporalExtent},
    item::validate_bbox,
    write_json, Extent, Item, Link, ITEM_ASSETS_EXTENSION, PROJECTION_EXTENSION,
    SCIENTIFIC_EXTENSION, STAC_VERSION,
};
use crate::{
    constants::{
        DAILY_COLLECTION_DESCRIPTION, DAILY_COLLECTION_ID, DAILY_COLLECTION_KEYWORDS,
        DAILY_COLLECTION_TITLE, EPSG, LICENSE, LICENSE_HREF, LICENSE_TITLE,
        MONTHLY_COLLECTION_DESCRIPTION, MONTHLY_COLLECTION_ID, MONTHLY_COLLECTION_KEYWORDS,
        MONTHLY_COLLECTION_TITLE, MONTHLY_DATA_CITATION, MONTHLY_DATA_DOI,
        MONTHLY_PUBLICATION_CITATION, MONTHLY_PUBLICATION_DOI, PROVIDER_NAME, PROVIDER_ROLES,
        PROVIDER_URL, WGS84_BBOX,
    },
    error::{Error, Result},
};

pub const COLLECTION_FILE: &str = "collection.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub roles: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub doi: String,
    pub citation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// An asset as it appears in every Item, without the href.
pub struct AssetDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub kind: String,
    pub stac_version: String,
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub license: String,
    pub providers: Vec<Provider>,
    pub extent: Extent,
    pub summaries: BTreeMap<String, serde_json::Value>,
    pub item_assets: BTreeMap<String, AssetDefinition>,
    #[serde(rename = "sci:doi", default, skip_serializing_if = "Option::is_none")]
    pub sci_doi: Option<String>,
    #[serde(rename = "sci:citation", default, skip_serializing_if = "Option::is_none")]
    pub sci_citation: Option<String>,
    #[serde(rename = "sci:publications", default, skip_serializing_if = "Vec::is_empty")]
    pub sci_publications: Vec<Publication>,
    pub links: Vec<Link>,
    #[serde(skip)]
    items: Vec<Item>,
}

impl Collection {
    fn new(id: &str, title: &str, description: &str, keywords: &[&str]) -> Self {
        let mut summaries = BTreeMap::new();
        summaries.insert("proj:epsg".to_string(), serde_json::json!([EPSG]));

        Collection {
            kind: "Collection".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: vec![
                ITEM_ASSETS_EXTENSION.to_string(),
                PROJECTION_EXTENSION.to_string(),
            ],
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            license: LICENSE.to_string(),
            providers: vec![Provider {
                name: PROVIDER_NAME.to_string(),
                roles: PROVIDER_ROLES.iter().map(|r| r.to_string()).collect(),
                url: PROVIDER_URL.to_string(),
            }],
            extent: Extent {
                spatial: SpatialExtent {
                    bbox: vec![WGS84_BBOX],
                },
                temporal: TemporalExtent {
                    interval: vec![[None, None]],
                },
            },
            summaries,
            item_assets: BTreeMap::new(),
            sci_doi: None,
            sci_citation: None,
            sci_publications: Vec::new(),
            links: vec![Link {
                title: Some(LICENSE_TITLE.to_string()),
                ..Link::new("license", LICENSE_HREF)
            }],
            items: Vec::new(),
        }
    }

    pub fn daily() -> Self {
        Collection::new(
            DAILY_COLLECTION_ID,
            DAILY_COLLECTION_TITLE,
            DAILY_COLLECTION_DESCRIPTION,
            &DAILY_COLLECTION_KEYWORDS,
        )
    }

    /// The monthly Collection also carries the scientific extension.
    pub fn monthly() -> Self {
        let mut collection = Collection::new(
            MONTHLY_COLLECTION_ID,
            MONTHLY_COLLECTION_TITLE,
            MONTHLY_COLLECTION_DESCRIPTION,
            &MONTHLY_COLLECTION_KEYWORDS,
        );
        collection
            .stac_extensions
            .push(SCIENTIFIC_EXTENSION.to_string());
        collection.sci_doi = Some(MONTHLY_DATA_DOI.to_string());
        collection.sci_citation = Some(MONTHLY_DATA_CITATION.to_string());
        collection.sci_publications = vec![Publication {
            doi: MONTHLY_PUBLICATION_DOI.to_string(),
            citation: MONTHLY_PUBLICATION_CITATION.to_string(),
        }];

        collection
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Validates and appends Items, then recomputes the extent over every
    /// Item held. Nothing is added if any Item is invalid.
    pub fn add_items(&mut self, items: Vec<Item>) -> Result<()> {
        for item in &items {
            item.validate()?;
        }

        for mut item in items {
            item.collection = Some(self.id.clone());
            self.items.push(item);
        }

        if let Some(extent) = Extent::from_items(&self.items) {
            self.extent = extent;
        }
        if self.item_assets.is_empty() {
            if let Some(first) = self.items.first() {
                self.item_assets = first
                    .assets
                    .iter()
                    .map(|(key, asset)| {
                        let definition = AssetDefinition {
                            media_type: asset.media_type.clone(),
                            title: asset.title.clone(),
                            roles: asset.roles.clone(),
                        };
                        (key.clone(), definition)
                    })
                    .collect();
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::Validation {
            kind: "Collection",
            id: self.id.clone(),
            reason,
        };

        if self.kind != "Collection" {
            return Err(invalid(format!("type must be Collection, not {}", self.kind)));
        }
        if self.id.is_empty() || self.description.is_empty() || self.license.is_empty() {
            return Err(invalid("id, description and license are required".to_string()));
        }
        if self.items.is_empty() {
            return Err(invalid("has no items".to_string()));
        }
        for bbox in &self.extent.spatial.bbox {
            validate_bbox(bbox).map_err(&invalid)?;
        }

        let mut ids = HashSet::new();
        for item in &self.items {
            item.validate()?;
            if !ids.insert(item.id.as_str()) {
                return Err(invalid(format!("duplicate item id `{}`", item.id)));
            }
        }

        Ok(())
    }

    /// Writes `collection.json` to `path` and each Item to
    /// `<dir>/<id>/<id>.json`, linked with relative hrefs.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| COLLECTION_FILE.to_string());
        let collection_href = format!("../{}", file_name);

        let mut collection = self.clone();
        collection
            .links
            .retain(|link| !matches!(link.rel.as_str(), "root" | "self" | "item"));
        collection
            .links
            .insert(0, Link::json("root", format!("./{}", file_name)));
        collection
            .links
            .insert(1, Link::json("self", path.display().to_string()));

        for item in &self.items {
            let item_href = format!("./{}/{}.json", item.id, item.id);
            collection.links.push(Link::json("item", item_href.as_str()));

            let mut item = item.clone();
            let item_path = dir.join(&item.id).join(format!("{}.json", item.id));
            item.links = vec![
                Link::json("root", collection_href.as_str()),
                Link::json("parent", collection_href.as_str()),
                Link::json("collection", collection_href.as_str()),
                Link::json("self", item_path.display().to_string()),
            ];
            debug!("Writing {}", item_path.display());
            write_json(&item, &item_path)?;
        }

        write_json(&collection, path)
    }
}

// -- Tests -------------------------------------------------------------------
