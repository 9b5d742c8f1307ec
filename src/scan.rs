mod dataset;
mod load;
mod stats;

use std::{error::Error, path::PathBuf, time::Instant};

use clap::Parser;
use indicatif::{MultiProgress, ParallelProgressIterator, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use log::{debug, info, warn};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::dataset::Case;

/// Walk a Decathlon-style dataset root and verify every paired case: each
/// pair must load cleanly, agree on its spatial dimensions, and contain only
/// known label ids.
#[derive(Parser, Debug)]
struct Args {
    /// Dataset root containing imagesTr/ and labelsTr/
    data_root: PathBuf,
    /// Fraction of cases assigned to the training split
    #[arg(long, default_value_t = 0.8)]
    train_fraction: f64,
    /// Only check the first N cases
    #[arg(long)]
    limit: Option<usize>,
}

fn check_case(case: &Case) -> Result<(), Box<dyn Error + Sync + Send>> {
    let (image, labels) = load::load_case(&case.image_path, &case.label_path)?;

    if !stats::spatial_match(&image, &labels) {
        return Err(format!(
            "image shape {:?} does not match label shape {:?}",
            image.shape(),
            labels.shape()
        )
        .into());
    }

    let counts = stats::label_histogram(&labels);
    let unknown = stats::unknown_labels(&counts);
    if !unknown.is_empty() {
        return Err(format!("label ids outside the known class set: {unknown:?}").into());
    }

    debug!(
        "case {} ok: image {:?}, label {:?}",
        case.id,
        image.shape(),
        labels.shape()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    let logger = env_logger::Builder::from_env(env).build();
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger).try_init()?;

    let args = Args::parse();
    let t0 = Instant::now();

    let cases = dataset::discover_cases(&args.data_root)?;
    info!("found {} paired cases under {:?}", cases.len(), args.data_root);

    let (train, val) = dataset::split_cases(cases, args.train_fraction);
    info!(
        "split: {} training cases, {} validation cases",
        train.len(),
        val.len()
    );

    let mut cases: Vec<Case> = train.into_iter().chain(val).collect();
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }

    let total = cases.len();
    let progress = multi.add(ProgressBar::new(total as u64));

    let failures: Vec<String> = cases
        .into_par_iter()
        .progress_with(progress.clone())
        .filter_map(|case| {
            check_case(&case)
                .err()
                .map(|err| format!("{}: {err}", case.id))
        })
        .collect();

    progress.finish();
    multi.remove(&progress);

    for failure in &failures {
        warn!("{failure}");
    }
    info!(
        "checked {total} cases in {:?}, {} failed",
        t0.elapsed(),
        failures.len()
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {total} cases failed validation", failures.len()).into())
    }
}
