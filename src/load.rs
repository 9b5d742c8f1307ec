use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use ndarray::{Array3, Array4, ArrayD, Ix3, Ix4};
use nifti::{InMemNiftiObject, IntoNdArray, NiftiObject, error::NiftiError};
use thiserror::Error;

/// Failure modes of a single volume load. All variants carry the offending
/// path and propagate unchanged to the caller; the loader performs no retry,
/// no fallback and no logging of its own.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist or could not be read.
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but is not a well-formed NIfTI-1 volume.
    #[error("{path} is not a valid NIfTI volume: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: NiftiError,
    },
    /// The volume parsed, but with an unexpected number of axes.
    #[error("{path}: expected a {expected}-dimensional volume, found shape {found:?}")]
    Shape {
        path: PathBuf,
        expected: usize,
        found: Vec<usize>,
    },
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Reads a NIfTI object fully into memory. Gzip is detected from the magic
/// bytes rather than the file extension.
fn read_object(path: &Path) -> Result<InMemNiftiObject, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::FileAccess {
        path: path.to_owned(),
        source,
    })?;

    let object = if is_gzip(&bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))
    } else {
        InMemNiftiObject::from_reader(Cursor::new(bytes))
    };

    object.map_err(|source| LoadError::Format {
        path: path.to_owned(),
        source,
    })
}

/// Loads the scan volume: three spatial axes plus one channel axis holding
/// the acquisition sequences.
pub fn load_image(path: &Path) -> Result<Array4<f32>, LoadError> {
    let volume: ArrayD<f32> = read_object(path)?
        .into_volume()
        .into_ndarray::<f32>()
        .map_err(|source| LoadError::Format {
            path: path.to_owned(),
            source,
        })?;

    let found = volume.shape().to_vec();
    volume
        .into_dimensionality::<Ix4>()
        .map_err(|_| LoadError::Shape {
            path: path.to_owned(),
            expected: 4,
            found,
        })
}

/// Loads the label map: one categorical class id per voxel.
pub fn load_label(path: &Path) -> Result<Array3<u8>, LoadError> {
    let volume: ArrayD<u8> = read_object(path)?
        .into_volume()
        .into_ndarray::<u8>()
        .map_err(|source| LoadError::Format {
            path: path.to_owned(),
            source,
        })?;

    let found = volume.shape().to_vec();
    volume
        .into_dimensionality::<Ix3>()
        .map_err(|_| LoadError::Shape {
            path: path.to_owned(),
            expected: 3,
            found,
        })
}

/// Loads one paired training case: the multi-channel scan and its voxel-wise
/// label map, both materialized as owned arrays.
///
/// All-or-nothing: if either file fails, nothing is returned. The loader does
/// not check that the two volumes agree spatially; that is a data-integrity
/// concern for the caller.
pub fn load_case(image_path: &Path, label_path: &Path) -> Result<(Array4<f32>, Array3<u8>), LoadError> {
    let image = load_image(image_path)?;
    let labels = load_label(label_path)?;
    Ok((image, labels))
}
