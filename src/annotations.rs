use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::read_text;

/// Sentinel the annotation format writes for "not visible in this view".
const NOT_VISIBLE: i32 = -1;

/// One person's box in one view, in native pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub view: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    /// False whenever any coordinate still carries the -1 sentinel.
    pub fn is_visible(&self) -> bool {
        self.xmin != NOT_VISIBLE
            && self.ymin != NOT_VISIBLE
            && self.xmax != NOT_VISIBLE
            && self.ymax != NOT_VISIBLE
    }

    /// Both extents must be strictly ordered; degenerate boxes never draw.
    pub fn is_valid(&self) -> bool {
        self.xmin < self.xmax && self.ymin < self.ymax
    }
}

/// Per-view visibility, tagged at load time so the sentinel never reaches
/// geometry code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible(BoundingBox),
    NotVisible,
}

impl Visibility {
    pub fn as_box(&self) -> Option<&BoundingBox> {
        match self {
            Visibility::Visible(b) => Some(b),
            Visibility::NotVisible => None,
        }
    }
}

/// One multi-view record: the same person at one timestamp, one visibility
/// entry per camera view in canonical order.
#[derive(Debug, Clone)]
pub struct PersonAnnotation {
    pub person_id: i64,
    pub position_id: i64,
    pub views: Vec<Visibility>,
}

#[derive(Debug, Deserialize)]
struct RawView {
    #[serde(default, rename = "viewNum")]
    view_num: Option<i64>,
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    #[serde(default, rename = "personID")]
    person_id: i64,
    #[serde(default, rename = "positionID")]
    position_id: i64,
    views: Vec<RawView>,
}

/// Loads one timestamp's records.
///
/// The file must hold a JSON array of person objects, each with a `views`
/// array of box objects. Non-JSON content is a `Decode` error; valid JSON
/// of the wrong shape is a `TypeMismatch`. `personID`, `positionID` and
/// `viewNum` are optional; the position inside `views` is what aligns a
/// box with its camera.
pub fn load(path: &Path) -> Result<Vec<PersonAnnotation>> {
    let text = read_text(path)?;
    let raw: Vec<RawPerson> = serde_json::from_str(&text).map_err(|e| classify(path, e))?;
    Ok(raw.into_iter().map(ingest).collect())
}

fn classify(path: &Path, e: serde_json::Error) -> Error {
    match e.classify() {
        serde_json::error::Category::Data => Error::TypeMismatch {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
        _ => Error::Decode {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

fn ingest(raw: RawPerson) -> PersonAnnotation {
    let views = raw
        .views
        .into_iter()
        .enumerate()
        .map(|(idx, v)| {
            if let Some(n) = v.view_num {
                if n != idx as i64 {
                    log::debug!("viewNum {} stored at position {}", n, idx);
                }
            }
            let bbox = BoundingBox {
                view: idx,
                xmin: v.xmin,
                ymin: v.ymin,
                xmax: v.xmax,
                ymax: v.ymax,
            };
            if bbox.is_visible() {
                Visibility::Visible(bbox)
            } else {
                Visibility::NotVisible
            }
        })
        .collect();
    PersonAnnotation {
        person_id: raw.person_id,
        position_id: raw.position_id,
        views,
    }
}
