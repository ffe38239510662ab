use std::path::{Path, PathBuf};

use glob::glob;
use image::{ImageReader, RgbImage};

use crate::error::{Error, Result};

/// Reads a whole file, turning a missing path into `NotFound`.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Reads a list file: one path per line, trimmed, blank lines skipped.
///
/// Paths are used exactly as written; nothing is resolved against the list
/// file's own directory.
pub fn read_path_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = read_text(path)?;
    let lines: Vec<PathBuf> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect();
    if lines.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(lines)
}

fn ext_filter(rp: glob::GlobResult, ext: &str) -> Option<PathBuf> {
    if let Ok(p) = rp {
        if p.as_os_str().to_string_lossy().ends_with(ext) {
            return Some(p);
        }
    }
    None
}

/// Sorted files directly under `dir` whose names end with `ext`.
pub fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    let paths = glob(format!("{}/*", dir.display()).as_str()).map_err(|e| Error::Malformed {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut sorted_paths: Vec<PathBuf> = paths
        .into_iter()
        .filter_map(|rp| ext_filter(rp, ext))
        .collect();
    sorted_paths.sort();
    if sorted_paths.is_empty() {
        return Err(Error::EmptyInput {
            path: dir.to_path_buf(),
        });
    }
    Ok(sorted_paths)
}

/// Sorted immediate subdirectories of `root`, one per camera view.
pub fn list_subdirs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }
    let paths = glob(format!("{}/*", root.display()).as_str()).map_err(|e| Error::Malformed {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut sorted_dirs: Vec<PathBuf> = paths
        .into_iter()
        .filter_map(|rp| rp.ok())
        .filter(|p| p.is_dir())
        .collect();
    sorted_dirs.sort();
    if sorted_dirs.is_empty() {
        return Err(Error::EmptyInput {
            path: root.to_path_buf(),
        });
    }
    Ok(sorted_dirs)
}

/// Decodes an image to RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    Ok(reader.decode()?.to_rgb8())
}

/// Writes an image, creating the parent directory first if needed.
pub fn save_image(path: &Path, img: &RgbImage) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save(path)?;
    Ok(())
}

/// File name without extension; the join key between an annotation file
/// and the per-view frames of the same timestamp.
pub fn timestamp_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
