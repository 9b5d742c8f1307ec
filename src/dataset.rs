use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;

use crate::load::LoadError;

/// Decathlon-style layout: images and labels side by side under the root,
/// paired by identical file names.
pub const IMAGES_DIR: &str = "imagesTr";
pub const LABELS_DIR: &str = "labelsTr";

/// One paired training sample, identified by the shared case id encoded in
/// both file names.
#[derive(Debug, Clone)]
pub struct Case {
    pub id: String,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
}

fn case_id(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(".nii.gz")
        .or_else(|| file_name.strip_suffix(".nii"))
}

/// Walks `root/imagesTr` and pairs every image volume with the label volume
/// of the same name under `root/labelsTr`. Hidden and archive-junk entries
/// (`.` / `_` prefixes) and non-NIfTI files are ignored; images without a
/// label are skipped with a warning. The result is sorted by case id.
pub fn discover_cases(root: &Path) -> Result<Vec<Case>, LoadError> {
    let images_dir = root.join(IMAGES_DIR);
    let labels_dir = root.join(LABELS_DIR);

    let entries = fs::read_dir(&images_dir).map_err(|source| LoadError::FileAccess {
        path: images_dir.clone(),
        source,
    })?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::FileAccess {
            path: images_dir.clone(),
            source,
        })?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        let Some(id) = case_id(&name) else {
            continue;
        };

        let label_path = labels_dir.join(&file_name);
        if !label_path.is_file() {
            warn!("no label volume for case {id}, skipping");
            continue;
        }

        cases.push(Case {
            id: id.to_owned(),
            image_path: entry.path(),
            label_path,
        });
    }

    cases.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(cases)
}

/// Deterministic train/validation split of an already-sorted case list.
pub fn split_cases(mut cases: Vec<Case>, train_fraction: f64) -> (Vec<Case>, Vec<Case>) {
    let fraction = train_fraction.clamp(0.0, 1.0);
    let n_train = ((cases.len() as f64) * fraction).round() as usize;
    let val = cases.split_off(n_train.min(cases.len()));
    (cases, val)
}
