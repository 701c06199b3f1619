use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

impl Extent {
    /// Union of the Items' bboxes and time windows. Min/max reduction, so the
    /// result does not depend on Item order. `None` for no Items.
    pub fn from_items(items: &[Item]) -> Option<Extent> {
        let first = items.first()?;

        let bbox = items.iter().skip(1).fold(first.bbox, |b, item| {
            [
                b[0].min(item.bbox[0]),
                b[1].min(item.bbox[1]),
                b[2].max(item.bbox[2]),
                b[3].max(item.bbox[3]),
            ]
        });

        let ranges: Vec<(DateTime<Utc>, DateTime<Utc>)> =
            items.iter().filter_map(Item::time_range).collect();
        let start = ranges.iter().map(|(start, _)| *start).min();
        let end = ranges.iter().map(|(_, end)| *end).max();

        Some(Extent {
            spatial: SpatialExtent { bbox: vec![bbox] },
            temporal: TemporalExtent {
                interval: vec![[start, end]],
            },
        })
    }
}

// -- Tests -------------------------------------------------------------------
