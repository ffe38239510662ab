use std::io::BufRead;
use std::path::{Path, PathBuf};

use clap::Parser;

use multiview_tools::io::save_image;
use multiview_tools::session::{DrawStyle, MultiViewSession};

/// Browse multi-view annotations, one contact sheet per timestamp.
#[derive(Parser)]
#[command(version, about)]
struct ViewerCli {
    /// folder with one annotation JSON per timestamp
    #[arg(long, default_value = "annotations")]
    dir_annotations: String,

    /// folder with one frame subfolder per view
    #[arg(long, default_value = "frames")]
    dir_frames: String,

    /// annotation file extension
    #[arg(long, default_value = ".json")]
    ann_ext: String,

    /// frame file extension
    #[arg(long, default_value = ".png")]
    fr_ext: String,

    /// display width the sheet is sized for
    #[arg(long, default_value_t = 1920)]
    display_width: u32,

    /// display height the sheet is sized for
    #[arg(long, default_value_t = 1080)]
    display_height: u32,

    /// folder the contact sheets are written to
    #[arg(long, default_value = "sheets")]
    out_dir: String,

    /// box outline thickness in pixels
    #[arg(long, default_value_t = 2)]
    thickness: u32,

    /// color boxes by person id instead of the fixed blue
    #[arg(long)]
    color_by_id: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = ViewerCli::parse();

    let mut session = MultiViewSession::new(
        Path::new(&cli.dir_annotations),
        &cli.ann_ext,
        Path::new(&cli.dir_frames),
        &cli.fr_ext,
        (cli.display_width, cli.display_height),
        DrawStyle {
            thickness: cli.thickness,
            color_by_id: cli.color_by_id,
        },
    )?;
    let out_dir = PathBuf::from(&cli.out_dir);
    write_sheet(&session, &out_dir)?;

    println!("commands: n/p step +-1, N/P step +-10, q quit");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let delta = match line.trim() {
            "n" => 1,
            "p" => -1,
            "N" => 10,
            "P" => -10,
            "q" => break,
            "" => continue,
            other => {
                println!("unknown command {:?}", other);
                continue;
            }
        };
        let outcome = session.step(delta).map(|_| ());
        match outcome {
            Ok(()) => write_sheet(&session, &out_dir)?,
            Err(e) => log::error!("step failed: {}", e),
        }
    }
    Ok(())
}

fn write_sheet(session: &MultiViewSession, out_dir: &Path) -> multiview_tools::Result<()> {
    let sheet = session.contact_sheet();
    let path = out_dir.join(format!("{}.png", session.current().stem));
    save_image(&path, &sheet)?;
    println!(
        "[{:3}/{:3}] wrote {}",
        session.current_index() + 1,
        session.len(),
        path.display()
    );
    Ok(())
}
