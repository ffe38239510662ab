use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use multiview_tools::Error;
use multiview_tools::calibration::{self, load_all};

const INTRINSIC_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<camera_matrix type_id="opencv-matrix">
  <rows>3</rows>
  <cols>3</cols>
  <dt>d</dt>
  <data>
    1000. 0. 640.
    0. 1000. 360.
    0. 0. 1.</data></camera_matrix>
<distortion_coefficients type_id="opencv-matrix">
  <rows>1</rows>
  <cols>5</cols>
  <dt>d</dt>
  <data>
    -0.1 0.05 0. 0. 0.01</data></distortion_coefficients>
</opencv_storage>
"#;

const EXTRINSIC_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<rvec>1.7 0.4 -0.3</rvec>
<tvec>-525. 45. 986.</tvec>
</opencv_storage>
"#;

/// Writes `count` intrinsic/extrinsic pairs plus the two list files.
fn write_dataset(dir: &TempDir, count: usize) -> (PathBuf, PathBuf) {
    let mut intrinsic_lines = String::new();
    let mut extrinsic_lines = String::new();
    for i in 0..count {
        let ipath = dir.path().join(format!("intr{}.xml", i));
        let epath = dir.path().join(format!("extr{}.xml", i));
        fs::write(&ipath, INTRINSIC_XML).unwrap();
        fs::write(&epath, EXTRINSIC_XML).unwrap();
        intrinsic_lines += &format!("{}\n", ipath.display());
        extrinsic_lines += &format!("{}\n", epath.display());
    }
    let intrinsic_list = dir.path().join("intrinsic.list");
    let extrinsic_list = dir.path().join("extrinsic.list");
    fs::write(&intrinsic_list, intrinsic_lines).unwrap();
    fs::write(&extrinsic_list, extrinsic_lines).unwrap();
    (intrinsic_list, extrinsic_list)
}

#[test]
fn test_load_all_two_views() {
    let dir = TempDir::new().unwrap();
    let (intrinsic_list, extrinsic_list) = write_dataset(&dir, 2);
    let models = load_all(&intrinsic_list, &extrinsic_list).unwrap();
    assert_eq!(models.len(), 2);

    let m = &models[0];
    assert!((m.camera_matrix[(0, 0)] - 1000.0).abs() < 1e-9);
    assert!((m.camera_matrix[(0, 2)] - 640.0).abs() < 1e-9);
    assert!((m.camera_matrix[(1, 2)] - 360.0).abs() < 1e-9);
    assert_eq!(m.distortion.len(), 5);
    assert!((m.distortion[0] + 0.1).abs() < 1e-9);
    assert!((m.distortion[4] - 0.01).abs() < 1e-9);
    assert!((m.rvec[0] - 1.7).abs() < 1e-9);
    assert!((m.tvec[0] + 525.0).abs() < 1e-9);
    assert!((m.tvec[2] - 986.0).abs() < 1e-9);
}

#[test]
fn test_load_all_count_mismatch_checked_first() {
    // The referenced files don't even exist: the count check must fire
    // before anything is opened.
    let dir = TempDir::new().unwrap();
    let intrinsic_list = dir.path().join("intrinsic.list");
    let extrinsic_list = dir.path().join("extrinsic.list");
    fs::write(&intrinsic_list, "a.xml\nb.xml\n").unwrap();
    fs::write(&extrinsic_list, "c.xml\nd.xml\ne.xml\n").unwrap();
    let result = load_all(&intrinsic_list, &extrinsic_list);
    assert!(matches!(result, Err(Error::ShapeMismatch(_))));
}

#[test]
fn test_load_all_missing_list() {
    let dir = TempDir::new().unwrap();
    let extrinsic_list = dir.path().join("extrinsic.list");
    fs::write(&extrinsic_list, "a.xml\n").unwrap();
    let result = load_all(&dir.path().join("nope.list"), &extrinsic_list);
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_load_all_blank_list() {
    let dir = TempDir::new().unwrap();
    let intrinsic_list = dir.path().join("intrinsic.list");
    let extrinsic_list = dir.path().join("extrinsic.list");
    fs::write(&intrinsic_list, "\n   \n\n").unwrap();
    fs::write(&extrinsic_list, "a.xml\n").unwrap();
    let result = load_all(&intrinsic_list, &extrinsic_list);
    assert!(matches!(result, Err(Error::EmptyInput { .. })));
}

#[test]
fn test_load_all_missing_calibration_file() {
    let dir = TempDir::new().unwrap();
    let intrinsic_list = dir.path().join("intrinsic.list");
    let extrinsic_list = dir.path().join("extrinsic.list");
    fs::write(&intrinsic_list, format!("{}\n", dir.path().join("gone.xml").display())).unwrap();
    fs::write(&extrinsic_list, format!("{}\n", dir.path().join("gone2.xml").display())).unwrap();
    let result = load_all(&intrinsic_list, &extrinsic_list);
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_intrinsics_payload_length_mismatch() {
    // 3x3 declared but only 8 values present.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    let xml = r#"<opencv_storage>
<camera_matrix><rows>3</rows><cols>3</cols>
<data>1. 0. 640. 0. 1000. 360. 0. 0.</data></camera_matrix>
<distortion_coefficients><rows>1</rows><cols>4</cols>
<data>0. 0. 0. 0.</data></distortion_coefficients>
</opencv_storage>"#;
    fs::write(&path, xml).unwrap();
    let result = calibration::load_intrinsics(&path);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn test_intrinsics_unparseable_number() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    let xml = INTRINSIC_XML.replace("640.", "sixforty");
    fs::write(&path, xml).unwrap();
    let result = calibration::load_intrinsics(&path);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn test_intrinsics_wrong_matrix_shape() {
    // A well-formed 2x2 block is the wrong shape for a camera matrix.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    let xml = r#"<opencv_storage>
<camera_matrix><rows>2</rows><cols>2</cols>
<data>1000. 0. 0. 1000.</data></camera_matrix>
<distortion_coefficients><rows>1</rows><cols>4</cols>
<data>0. 0. 0. 0.</data></distortion_coefficients>
</opencv_storage>"#;
    fs::write(&path, xml).unwrap();
    let result = calibration::load_intrinsics(&path);
    assert!(matches!(result, Err(Error::ShapeMismatch(_))));
}

#[test]
fn test_intrinsics_not_upper_triangular() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    let xml = INTRINSIC_XML.replace(
        "0. 1000. 360.",
        "0.5 1000. 360.",
    );
    fs::write(&path, xml).unwrap();
    let result = calibration::load_intrinsics(&path);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn test_intrinsics_missing_element() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    fs::write(&path, "<opencv_storage></opencv_storage>").unwrap();
    let result = calibration::load_intrinsics(&path);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn test_extrinsics_roundtrip_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extr.xml");
    fs::write(&path, EXTRINSIC_XML).unwrap();
    let (rvec, tvec) = calibration::load_extrinsics(&path).unwrap();
    assert!((rvec[1] - 0.4).abs() < 1e-9);
    assert!((rvec[2] + 0.3).abs() < 1e-9);
    assert!((tvec[1] - 45.0).abs() < 1e-9);
}

#[test]
fn test_extrinsics_wrong_arity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extr.xml");
    let xml = EXTRINSIC_XML.replace("1.7 0.4 -0.3", "1.7 0.4 -0.3 9.9");
    fs::write(&path, xml).unwrap();
    let result = calibration::load_extrinsics(&path);
    assert!(matches!(result, Err(Error::ShapeMismatch(_))));
}

#[test]
fn test_extrinsics_not_xml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extr.xml");
    fs::write(&path, "rvec: 1 2 3").unwrap();
    let result = calibration::load_extrinsics(&path);
    assert!(matches!(result, Err(Error::Malformed { .. })));
}
