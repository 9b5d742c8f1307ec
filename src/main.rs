mod load;
mod stats;

use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::{info, warn};

/// Inspect one paired MRI training case: a 4D multi-channel scan volume and
/// its 3D voxel-wise tumor label map, both stored as NIfTI-1 files.
#[derive(Parser, Debug)]
struct Args {
    /// Image volume (.nii or .nii.gz), shaped (x, y, z, channel)
    image_path: PathBuf,
    /// Label volume (.nii or .nii.gz), shaped (x, y, z)
    label_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();

    let (image, labels) = load::load_case(&args.image_path, &args.label_path)?;

    info!("image shape: {:?}", image.shape());
    info!("label shape: {:?}", labels.shape());

    if !stats::spatial_match(&image, &labels) {
        warn!("spatial dimensions of image and label volumes do not match");
    }

    for (c, (lo, hi)) in stats::channel_ranges(&image).iter().enumerate() {
        info!(
            "channel {c} ({}): intensity range [{lo}, {hi}]",
            stats::channel_name(c)
        );
    }

    let counts = stats::label_histogram(&labels);
    for (id, count) in &counts {
        info!("label {id} ({}): {count} voxels", stats::class_name(*id));
    }

    let unknown = stats::unknown_labels(&counts);
    if !unknown.is_empty() {
        warn!("label volume contains ids outside the known class set: {unknown:?}");
    }

    Ok(())
}
