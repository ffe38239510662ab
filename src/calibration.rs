use std::path::Path;

use nalgebra as na;

use crate::error::{Error, Result};
use crate::io::{read_path_list, read_text};
use crate::types::CameraModel;

const CAMERA_MATRIX: &str = "camera_matrix";
const DISTORTION: &str = "distortion_coefficients";
const RVEC: &str = "rvec";
const TVEC: &str = "tvec";

/// Loads every camera named by the two list files, in list order.
///
/// Each line of `intrinsic_list` pairs with the same line of
/// `extrinsic_list`; the line counts are compared before any calibration
/// file is opened so a mismatch never yields a half-loaded store. The
/// returned order defines the canonical view index.
pub fn load_all(intrinsic_list: &Path, extrinsic_list: &Path) -> Result<Vec<CameraModel>> {
    let intrinsic_paths = read_path_list(intrinsic_list)?;
    let extrinsic_paths = read_path_list(extrinsic_list)?;
    if intrinsic_paths.len() != extrinsic_paths.len() {
        return Err(Error::ShapeMismatch(format!(
            "{} intrinsic files vs {} extrinsic files",
            intrinsic_paths.len(),
            extrinsic_paths.len()
        )));
    }
    intrinsic_paths
        .iter()
        .zip(extrinsic_paths.iter())
        .map(|(ipath, epath)| {
            log::trace!("loading {} / {}", ipath.display(), epath.display());
            let (camera_matrix, distortion) = load_intrinsics(ipath)?;
            let (rvec, tvec) = load_extrinsics(epath)?;
            Ok(CameraModel::new(camera_matrix, distortion, rvec, tvec))
        })
        .collect()
}

/// Loads one intrinsic file: a 3x3 camera matrix and a 1xK distortion row.
pub fn load_intrinsics(path: &Path) -> Result<(na::Matrix3<f64>, na::DVector<f64>)> {
    let text = read_text(path)?;
    let doc = parse_xml(path, &text)?;

    let (rows, cols, data) = matrix_block(&doc, path, CAMERA_MATRIX)?;
    if rows != 3 || cols != 3 {
        return Err(Error::ShapeMismatch(format!(
            "{}: camera_matrix is {}x{}, expected 3x3",
            path.display(),
            rows,
            cols
        )));
    }
    let camera_matrix = na::Matrix3::from_row_slice(&data);
    validate_camera_matrix(path, &camera_matrix)?;

    let (drows, dcols, ddata) = matrix_block(&doc, path, DISTORTION)?;
    if drows != 1 {
        return Err(Error::ShapeMismatch(format!(
            "{}: distortion_coefficients is {}x{}, expected one row",
            path.display(),
            drows,
            dcols
        )));
    }
    Ok((camera_matrix, na::DVector::from_vec(ddata)))
}

/// Loads one extrinsic file: axis-angle `rvec` and translation `tvec`.
pub fn load_extrinsics(path: &Path) -> Result<(na::Vector3<f64>, na::Vector3<f64>)> {
    let text = read_text(path)?;
    let doc = parse_xml(path, &text)?;
    let rvec = vec3_element(&doc, path, RVEC)?;
    let tvec = vec3_element(&doc, path, TVEC)?;
    Ok((rvec, tvec))
}

fn parse_xml<'i>(path: &Path, text: &'i str) -> Result<roxmltree::Document<'i>> {
    roxmltree::Document::parse(text).map_err(|e| Error::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn find_element<'a, 'i>(
    doc: &'a roxmltree::Document<'i>,
    path: &Path,
    name: &str,
) -> Result<roxmltree::Node<'a, 'i>> {
    doc.descendants()
        .find(|n| n.is_element() && n.has_tag_name(name))
        .ok_or_else(|| Error::Malformed {
            path: path.to_path_buf(),
            reason: format!("missing element <{}>", name),
        })
}

/// Reads one named block with `<rows>`, `<cols>` and a whitespace-separated
/// `<data>` payload whose length must match the declared shape.
fn matrix_block(
    doc: &roxmltree::Document,
    path: &Path,
    name: &str,
) -> Result<(usize, usize, Vec<f64>)> {
    let node = find_element(doc, path, name)?;
    let rows = child_usize(node, path, "rows")?;
    let cols = child_usize(node, path, "cols")?;
    let data_text = child_text(node, path, "data")?;
    let data = parse_floats(path, &data_text)?;
    if data.len() != rows * cols {
        return Err(Error::Malformed {
            path: path.to_path_buf(),
            reason: format!(
                "{} declares {}x{} but carries {} values",
                name,
                rows,
                cols,
                data.len()
            ),
        });
    }
    Ok((rows, cols, data))
}

fn vec3_element(doc: &roxmltree::Document, path: &Path, name: &str) -> Result<na::Vector3<f64>> {
    let node = find_element(doc, path, name)?;
    let values = parse_floats(path, node.text().unwrap_or(""))?;
    if values.len() != 3 {
        return Err(Error::ShapeMismatch(format!(
            "{}: <{}> holds {} values, expected 3",
            path.display(),
            name,
            values.len()
        )));
    }
    Ok(na::Vector3::new(values[0], values[1], values[2]))
}

fn child_text(node: roxmltree::Node<'_, '_>, path: &Path, name: &str) -> Result<String> {
    let child = node
        .children()
        .find(|n| n.is_element() && n.has_tag_name(name))
        .ok_or_else(|| Error::Malformed {
            path: path.to_path_buf(),
            reason: format!("missing element <{}>", name),
        })?;
    Ok(child.text().unwrap_or("").to_string())
}

fn child_usize(node: roxmltree::Node<'_, '_>, path: &Path, name: &str) -> Result<usize> {
    let text = child_text(node, path, name)?;
    text.trim().parse::<usize>().map_err(|_| Error::Malformed {
        path: path.to_path_buf(),
        reason: format!("unparseable <{}> value {:?}", name, text.trim()),
    })
}

fn parse_floats(path: &Path, text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| Error::Malformed {
                path: path.to_path_buf(),
                reason: format!("unparseable number {:?}", tok),
            })
        })
        .collect()
}

fn validate_camera_matrix(path: &Path, m: &na::Matrix3<f64>) -> Result<()> {
    if m[(1, 0)] != 0.0 || m[(2, 0)] != 0.0 || m[(2, 1)] != 0.0 {
        return Err(Error::Malformed {
            path: path.to_path_buf(),
            reason: "camera matrix is not upper-triangular".to_string(),
        });
    }
    if m[(0, 0)] <= 0.0 || m[(1, 1)] <= 0.0 {
        return Err(Error::Malformed {
            path: path.to_path_buf(),
            reason: "focal lengths must be positive".to_string(),
        });
    }
    Ok(())
}
