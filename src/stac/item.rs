//! STAC Items for single days and single months.

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{write_json, Link, PROJECTION_EXTENSION, STAC_VERSION};
use crate::{
    calendar::Month,
    constants::{
        Status, Variable, COG_MEDIA_TYPE, EPSG, NETCDF_ASSET_TITLE, NETCDF_MEDIA_TYPE, SHAPE,
        TRANSFORM, WGS84_BBOX,
    },
    error::{Error, Result},
    naming::{daily_item_id, monthly_item_id},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Asset {
    pub fn cog(href: impl Into<String>, variable: Variable) -> Self {
        Asset {
            href: href.into(),
            media_type: Some(COG_MEDIA_TYPE.to_string()),
            title: Some(variable.title().to_string()),
            roles: vec!["data".to_string()],
        }
    }

    pub fn netcdf(href: impl Into<String>) -> Self {
        Asset {
            href: href.into(),
            media_type: Some(NETCDF_MEDIA_TYPE.to_string()),
            title: Some(NETCDF_ASSET_TITLE.to_string()),
            roles: vec!["source".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A GeoJSON polygon.
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl Geometry {
    pub fn from_bbox(bbox: [f64; 4]) -> Self {
        let [min_x, min_y, max_x, max_y] = bbox;
        Geometry {
            kind: "Polygon".to_string(),
            coordinates: vec![vec![
                [max_x, min_y],
                [max_x, max_y],
                [min_x, max_y],
                [min_x, min_y],
                [max_x, min_y],
            ]],
        }
    }

    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut positions = self.coordinates.iter().flatten();
        let first = positions.next()?;
        let init = [first[0], first[1], first[0], first[1]];

        Some(positions.fold(init, |b, p| {
            [b[0].min(p[0]), b[1].min(p[1]), b[2].max(p[0]), b[3].max(p[1])]
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Always serialized; `null` when the Item only has a start/end range.
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(rename = "proj:epsg", default, skip_serializing_if = "Option::is_none")]
    pub proj_epsg: Option<u32>,
    #[serde(rename = "proj:shape", default, skip_serializing_if = "Option::is_none")]
    pub proj_shape: Option<[u32; 2]>,
    #[serde(rename = "proj:transform", default, skip_serializing_if = "Option::is_none")]
    pub proj_transform: Option<[f64; 6]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: Geometry,
    pub bbox: [f64; 4],
    pub properties: Properties,
    #[serde(default)]
    pub links: Vec<Link>,
    pub assets: BTreeMap<String, Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Item {
    /// An Item covering `start..=end` over the whole NClimGrid grid, without
    /// assets.
    pub fn new(
        id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        datetime: Option<DateTime<Utc>>,
    ) -> Self {
        Item {
            kind: "Feature".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: vec![PROJECTION_EXTENSION.to_string()],
            id: id.into(),
            geometry: Geometry::from_bbox(WGS84_BBOX),
            bbox: WGS84_BBOX,
            properties: Properties {
                datetime,
                start_datetime: Some(start),
                end_datetime: Some(end),
                proj_epsg: Some(EPSG),
                proj_shape: Some(SHAPE),
                proj_transform: Some(TRANSFORM),
            },
            links: Vec::new(),
            assets: BTreeMap::new(),
            collection: None,
        }
    }

    /// Base Item for one day, 00:00:00 to 23:59:59 UTC. The start of the day
    /// is the nominal datetime.
    pub fn daily(date: NaiveDate, status: Status) -> Self {
        let (start, end) = day_span(date, date);
        Item::new(daily_item_id(date, status), start, end, Some(start))
    }

    /// Base Item for one month, day 1 00:00:00 to the last day 23:59:59 UTC.
    pub fn monthly(month: &Month) -> Self {
        let (start, end) = day_span(month.first_day(), month.last_day());
        Item::new(monthly_item_id(month), start, end, None)
    }

    pub fn add_asset(&mut self, key: impl Into<String>, asset: Asset) {
        self.assets.insert(key.into(), asset);
    }

    /// Start and end of the Item's time window.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let props = &self.properties;
        match (props.start_datetime, props.end_datetime, props.datetime) {
            (Some(start), Some(end), _) => Some((start, end)),
            (_, _, Some(datetime)) => Some((datetime, datetime)),
            _ => None,
        }
    }

    /// Structural checks that a STAC validator would reject an Item for.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::Validation {
            kind: "Item",
            id: self.id.clone(),
            reason,
        };

        if self.kind != "Feature" {
            return Err(invalid(format!("type must be Feature, not {}", self.kind)));
        }
        if self.stac_version.is_empty() {
            return Err(invalid("missing stac_version".to_string()));
        }
        if self.id.is_empty() || self.id.contains('/') {
            return Err(invalid("id must be a non-empty path segment".to_string()));
        }
        validate_bbox(&self.bbox).map_err(invalid)?;
        validate_geometry(&self.geometry, &self.bbox).map_err(invalid)?;

        let props = &self.properties;
        match (props.start_datetime, props.end_datetime) {
            (Some(start), Some(end)) if start > end => {
                return Err(invalid("start_datetime is after end_datetime".to_string()))
            }
            (Some(_), Some(_)) => {}
            (None, None) if props.datetime.is_some() => {}
            _ => {
                return Err(invalid(
                    "needs a datetime or both start_datetime and end_datetime".to_string(),
                ))
            }
        }

        let has_projection = props.proj_epsg.is_some()
            || props.proj_shape.is_some()
            || props.proj_transform.is_some();
        if has_projection && !self.stac_extensions.iter().any(|e| e == PROJECTION_EXTENSION) {
            return Err(invalid("projection fields without the projection extension".to_string()));
        }

        if self.assets.is_empty() {
            return Err(invalid("has no assets".to_string()));
        }
        if let Some((key, _)) = self.assets.iter().find(|(_, asset)| asset.href.is_empty()) {
            return Err(invalid(format!("asset `{}` has an empty href", key)));
        }

        Ok(())
    }

    /// Writes the Item to `path` with a `self` link.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut item = self.clone();
        item.links.retain(|link| link.rel != "self");
        item.links.push(Link::new("self", path.display().to_string()));

        write_json(&item, path)
    }
}

fn day_span(first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = first.and_time(NaiveTime::MIN).and_utc();
    let end = last.and_time(NaiveTime::MIN).and_utc() + TimeDelta::seconds(86_399);

    (start, end)
}

pub(crate) fn validate_bbox(bbox: &[f64; 4]) -> std::result::Result<(), String> {
    if bbox.iter().any(|v| !v.is_finite()) {
        return Err("bbox has non-finite values".to_string());
    }
    if bbox[0] > bbox[2] || bbox[1] > bbox[3] {
        return Err(format!("bbox {:?} is not ordered min to max", bbox));
    }

    Ok(())
}

fn validate_geometry(geometry: &Geometry, bbox: &[f64; 4]) -> std::result::Result<(), String> {
    if geometry.kind != "Polygon" {
        return Err(format!("unsupported geometry type {}", geometry.kind));
    }
    for ring in &geometry.coordinates {
        if ring.len() < 4 || ring.first() != ring.last() {
            return Err("polygon rings must be closed with at least four positions".to_string());
        }
    }
    match geometry.bounds() {
        Some(bounds) if bounds == *bbox => Ok(()),
        Some(bounds) => Err(format!("bbox {:?} does not match geometry {:?}", bbox, bounds)),
        None => Err("geometry has no coordinates".to_string()),
    }
}

// -- Tests -------------------------------------------------------------------
