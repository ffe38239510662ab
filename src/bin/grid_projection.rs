use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use image::RgbImage;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use multiview_tools::Error;
use multiview_tools::calibration;
use multiview_tools::grid::GridConfig;
use multiview_tools::io::{self, read_path_list};
use multiview_tools::overlay;
use multiview_tools::projection;

/// Project the ground-plane evaluation grid into every camera view.
#[derive(Parser)]
#[command(version, about)]
struct GridCli {
    /// list file naming one frame folder per view
    #[arg(long, default_value = "lists/frames.list")]
    folder_list: String,

    /// list file naming one intrinsic calibration file per view
    #[arg(long, default_value = "lists/intrinsic.list")]
    intrinsic_list: String,

    /// list file naming one extrinsic calibration file per view
    #[arg(long, default_value = "lists/extrinsic.list")]
    extrinsic_list: String,

    /// output prefix, view number and extension get appended
    #[arg(long, default_value = "intersecting/grid")]
    img_prefix: String,

    /// frame file extension
    #[arg(long, default_value = ".png")]
    fr_ext: String,

    /// JSON grid config overriding the dataset default
    #[arg(long)]
    grid_config: Option<String>,

    /// drawn point radius in pixels
    #[arg(long, default_value_t = 3)]
    radius: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = GridCli::parse();

    let folders = read_path_list(Path::new(&cli.folder_list))?;
    let mut images = folders
        .iter()
        .map(|folder| {
            let frame_paths = io::list_files(folder, &cli.fr_ext)?;
            io::load_image(&frame_paths[0])
        })
        .collect::<Result<Vec<RgbImage>, Error>>()?;
    let models = calibration::load_all(
        Path::new(&cli.intrinsic_list),
        Path::new(&cli.extrinsic_list),
    )?;
    if images.len() != models.len() {
        return Err(Box::new(Error::ShapeMismatch(format!(
            "{} frame folders vs {} calibrated views",
            images.len(),
            models.len()
        ))));
    }

    let grid_config = match &cli.grid_config {
        Some(path) => serde_json::from_str::<GridConfig>(&io::read_text(Path::new(path))?)?,
        None => GridConfig::default(),
    };
    let grid = grid_config.points();
    log::info!("{} grid points, {} views", grid.len(), models.len());

    let now = Instant::now();
    let outputs = images
        .par_iter_mut()
        .zip(models.par_iter())
        .enumerate()
        .progress_count(models.len() as u64)
        .map(|(view, (img, model))| {
            let pixels = projection::project_points(model, &grid)?;
            for p in pixels {
                overlay::draw_point(img, p, cli.radius, overlay::BLUE);
            }
            let out_path = PathBuf::from(format!("{}{}{}", cli.img_prefix, view + 1, cli.fr_ext));
            io::save_image(&out_path, img)?;
            Ok(out_path)
        })
        .collect::<Result<Vec<PathBuf>, Error>>()?;
    println!("projection took {:.3} sec", now.elapsed().as_secs_f64());
    for path in &outputs {
        println!("wrote {}", path.display());
    }
    Ok(())
}
