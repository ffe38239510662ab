use std::fs;

use tempfile::TempDir;

use multiview_tools::Error;
use multiview_tools::annotations::{self, BoundingBox, Visibility};

const RECORDS: &str = r#"[
  {"personID": 3, "positionID": 1234, "views": [
    {"viewNum": 0, "xmin": 10, "ymin": 20, "xmax": 50, "ymax": 120},
    {"viewNum": 1, "xmin": -1, "ymin": -1, "xmax": -1, "ymax": -1}
  ]},
  {"personID": 7, "positionID": 99, "views": [
    {"viewNum": 0, "xmin": -1, "ymin": -1, "xmax": -1, "ymax": -1},
    {"viewNum": 1, "xmin": 300, "ymin": 40, "xmax": 340, "ymax": 160}
  ]}
]"#;

#[test]
fn test_load_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("00000000.json");
    fs::write(&path, RECORDS).unwrap();

    let persons = annotations::load(&path).unwrap();
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[0].person_id, 3);
    assert_eq!(persons[0].position_id, 1234);
    assert_eq!(persons[0].views.len(), 2);

    // The sentinel view is tagged out at load time.
    let b = persons[0].views[0].as_box().unwrap();
    assert_eq!(b.view, 0);
    assert_eq!(b.xmin, 10);
    assert_eq!(b.ymax, 120);
    assert_eq!(persons[0].views[1], Visibility::NotVisible);

    assert_eq!(persons[1].views[0], Visibility::NotVisible);
    assert_eq!(persons[1].views[1].as_box().unwrap().view, 1);
}

#[test]
fn test_load_without_optional_fields() {
    // personID, positionID and viewNum are all optional.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");
    fs::write(
        &path,
        r#"[{"views": [{"xmin": 1, "ymin": 2, "xmax": 3, "ymax": 4}]}]"#,
    )
    .unwrap();
    let persons = annotations::load(&path).unwrap();
    assert_eq!(persons[0].person_id, 0);
    assert!(persons[0].views[0].as_box().is_some());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = annotations::load(&dir.path().join("gone.json"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_load_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");
    fs::write(&path, "not json {{{").unwrap();
    let result = annotations::load(&path);
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[test]
fn test_load_wrong_top_level_shape() {
    // Valid JSON, but an object instead of an array of records.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");
    fs::write(&path, r#"{"views": []}"#).unwrap();
    let result = annotations::load(&path);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_load_wrong_element_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");
    fs::write(&path, r#"["just", "strings"]"#).unwrap();
    let result = annotations::load(&path);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_partial_sentinel_is_not_visible() {
    // One -1 is enough to suppress the box.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");
    fs::write(
        &path,
        r#"[{"views": [{"xmin": -1, "ymin": 2, "xmax": 30, "ymax": 40}]}]"#,
    )
    .unwrap();
    let persons = annotations::load(&path).unwrap();
    assert_eq!(persons[0].views[0], Visibility::NotVisible);
}

#[test]
fn test_visibility_predicate() {
    let visible = BoundingBox {
        view: 0,
        xmin: 0,
        ymin: 0,
        xmax: 10,
        ymax: 10,
    };
    assert!(visible.is_visible());
    for field in 0..4 {
        let mut b = visible;
        match field {
            0 => b.xmin = -1,
            1 => b.ymin = -1,
            2 => b.xmax = -1,
            _ => b.ymax = -1,
        }
        assert!(!b.is_visible(), "field {} sentinel must hide the box", field);
    }
}

#[test]
fn test_validity_predicate() {
    let b = BoundingBox {
        view: 0,
        xmin: 10,
        ymin: 20,
        xmax: 50,
        ymax: 120,
    };
    assert!(b.is_valid());

    // Degenerate: zero width.
    let b = BoundingBox {
        view: 0,
        xmin: 10,
        ymin: 20,
        xmax: 10,
        ymax: 120,
    };
    assert!(!b.is_valid());

    // Inverted extents.
    let b = BoundingBox {
        view: 0,
        xmin: 50,
        ymin: 20,
        xmax: 10,
        ymax: 120,
    };
    assert!(!b.is_valid());
}
