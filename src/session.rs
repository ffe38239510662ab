use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::annotations::{self, PersonAnnotation};
use crate::error::{Error, Result};
use crate::io;
use crate::overlay;

/// View count of the reference dataset; other counts load with a warning.
pub const EXPECTED_VIEWS: usize = 7;

/// Pixel gap budgeted between tiles when fitting frames to the display.
const TILE_MARGIN: u32 = 5;

/// Everything belonging to one timestamp: the overlaid, display-scaled
/// frame of every view plus the records drawn onto them.
pub struct FrameSet {
    pub stem: String,
    pub frames: Vec<RgbImage>,
    pub persons: Vec<PersonAnnotation>,
}

/// How boxes get painted.
#[derive(Debug, Clone, Copy)]
pub struct DrawStyle {
    pub thickness: u32,
    /// Color each box by its person id instead of the fixed blue.
    pub color_by_id: bool,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            thickness: 2,
            color_by_id: false,
        }
    }
}

/// Bounded navigation over a multi-view dataset.
///
/// Holds the sorted annotation file list and the sorted per-view frame
/// folders, and keeps exactly one `FrameSet` alive. A step commits the new
/// index and frame set only after every view loaded, so a failed step
/// leaves the session exactly where it was.
pub struct MultiViewSession {
    annotation_files: Vec<PathBuf>,
    view_dirs: Vec<PathBuf>,
    frame_ext: String,
    display: (u32, u32),
    rows: u32,
    cols: u32,
    style: DrawStyle,
    scaled_size: Option<(u32, u32)>,
    current_index: usize,
    current: FrameSet,
}

impl MultiViewSession {
    /// Discovers the dataset layout and loads the first timestamp.
    ///
    /// `annotation_dir` holds one JSON file per timestamp; `frame_dir`
    /// holds one subdirectory per camera view with frames named by the
    /// same stems. Either side being empty is an `EmptyInput`.
    pub fn new(
        annotation_dir: &Path,
        annotation_ext: &str,
        frame_dir: &Path,
        frame_ext: &str,
        display: (u32, u32),
        style: DrawStyle,
    ) -> Result<MultiViewSession> {
        let annotation_files = io::list_files(annotation_dir, annotation_ext)?;
        let view_dirs = io::list_subdirs(frame_dir)?;
        if view_dirs.len() != EXPECTED_VIEWS {
            log::warn!(
                "found {} view folders under {}, dataset usually has {}",
                view_dirs.len(),
                frame_dir.display(),
                EXPECTED_VIEWS
            );
        }
        log::info!(
            "{} annotation files, {} views",
            annotation_files.len(),
            view_dirs.len()
        );
        let cols = (view_dirs.len() as u32 + 1).div_ceil(2);
        let mut session = MultiViewSession {
            annotation_files,
            view_dirs,
            frame_ext: frame_ext.to_string(),
            display,
            rows: 2,
            cols,
            style,
            scaled_size: None,
            current_index: 0,
            current: FrameSet {
                stem: String::new(),
                frames: Vec::new(),
                persons: Vec::new(),
            },
        };
        session.current = session.load_frame_set(0)?;
        Ok(session)
    }

    /// Moves the cursor by `delta` timestamps.
    ///
    /// A zero delta or an out-of-range target returns the cached set
    /// unchanged, however extreme the delta; a load failure propagates
    /// without moving the cursor.
    pub fn step(&mut self, delta: i64) -> Result<&FrameSet> {
        let target = match (self.current_index as i64).checked_add(delta) {
            Some(t) if delta != 0 && t >= 0 && t < self.annotation_files.len() as i64 => {
                t as usize
            }
            _ => {
                log::debug!("step {} from {} ignored", delta, self.current_index);
                return Ok(&self.current);
            }
        };
        let loaded = self.load_frame_set(target)?;
        self.current_index = target;
        self.current = loaded;
        Ok(&self.current)
    }

    /// Composites the current frames into a rows x cols sheet in view
    /// order. Cells past the last view stay black, like the spare cell the
    /// on-screen layout reserved for controls.
    pub fn contact_sheet(&self) -> RgbImage {
        let (tile_w, tile_h) = self
            .current
            .frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((1, 1));
        let mut sheet = RgbImage::new(self.cols * tile_w, self.rows * tile_h);
        for (view, frame) in self.current.frames.iter().enumerate() {
            let row = view as u32 / self.cols;
            let col = view as u32 % self.cols;
            imageops::replace(
                &mut sheet,
                frame,
                (col * tile_w) as i64,
                (row * tile_h) as i64,
            );
        }
        sheet
    }

    pub fn len(&self) -> usize {
        self.annotation_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotation_files.is_empty()
    }

    pub fn view_count(&self) -> usize {
        self.view_dirs.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &FrameSet {
        &self.current
    }

    fn load_frame_set(&mut self, index: usize) -> Result<FrameSet> {
        let annotation_path = self.annotation_files[index].clone();
        let stem = io::timestamp_stem(&annotation_path);
        let persons = annotations::load(&annotation_path)?;
        let mut scaled = self.scaled_size;
        let mut frames = Vec::with_capacity(self.view_dirs.len());
        for (view, dir) in self.view_dirs.iter().enumerate() {
            let frame_path = dir.join(format!("{}{}", stem, self.frame_ext));
            if !frame_path.is_file() {
                return Err(Error::NotFound(frame_path));
            }
            log::trace!("view {}: {}", view, frame_path.display());
            let mut img = io::load_image(&frame_path)?;
            for person in &persons {
                if let Some(bbox) = person.views.get(view).and_then(|v| v.as_box()) {
                    let color = if self.style.color_by_id {
                        overlay::id_to_color(person.person_id as usize)
                    } else {
                        overlay::BLUE
                    };
                    overlay::draw_box(&mut img, bbox, color, self.style.thickness);
                }
            }
            let (w, h) = match scaled {
                Some(s) => s,
                None => {
                    let s = fit_to_display(
                        self.display,
                        self.rows,
                        self.cols,
                        img.width(),
                        img.height(),
                    );
                    scaled = Some(s);
                    s
                }
            };
            frames.push(imageops::resize(&img, w, h, FilterType::Lanczos3));
        }
        self.scaled_size = scaled;
        log::info!(
            "frame {} [{:3}/{:3}]: {} multi-view annotations",
            stem,
            index + 1,
            self.annotation_files.len(),
            persons.len()
        );
        Ok(FrameSet {
            stem,
            frames,
            persons,
        })
    }
}

/// One downscale factor for the whole session, from the first frame seen.
///
/// The factor fits `cols` tiles plus margins across the display width and
/// `rows` tiles down its height, keeping aspect ratio by taking the larger
/// of the two requirements. Degenerate display budgets clamp to 1x1.
fn fit_to_display(display: (u32, u32), rows: u32, cols: u32, img_w: u32, img_h: u32) -> (u32, u32) {
    let budget_w = display.0 as f64 - ((cols + 1) * TILE_MARGIN) as f64;
    let budget_h = display.1 as f64 - ((rows + 1) * TILE_MARGIN) as f64;
    let width_factor = img_w as f64 * cols as f64 / budget_w;
    let height_factor = img_h as f64 * rows as f64 / budget_h;
    let factor = width_factor.max(height_factor);
    let w = (img_w as f64 / factor) as i64;
    let h = (img_h as f64 / factor) as i64;
    (w.max(1) as u32, h.max(1) as u32)
}
