use std::collections::BTreeMap;

use ndarray::{Array3, Array4, Axis};

/// Acquisition sequences along the channel axis, in storage order.
pub const CHANNEL_NAMES: [&str; 4] = ["FLAIR", "T1w", "T1gd", "T2w"];

/// Segmentation classes, indexed by label id.
pub const CLASS_NAMES: [&str; 4] = [
    "background",
    "edema",
    "non-enhancing tumor",
    "enhancing tumor",
];

pub fn channel_name(channel: usize) -> &'static str {
    CHANNEL_NAMES.get(channel).copied().unwrap_or("extra")
}

pub fn class_name(id: u8) -> &'static str {
    CLASS_NAMES.get(id as usize).copied().unwrap_or("unknown")
}

/// True when the spatial axes of the scan match the label map.
pub fn spatial_match(image: &Array4<f32>, labels: &Array3<u8>) -> bool {
    &image.shape()[..3] == labels.shape()
}

/// Voxel count per label id.
pub fn label_histogram(labels: &Array3<u8>) -> BTreeMap<u8, u64> {
    let mut counts = BTreeMap::new();
    for &v in labels.iter() {
        *counts.entry(v).or_insert(0u64) += 1;
    }
    counts
}

/// Label ids present in the histogram but outside the known class set.
pub fn unknown_labels(counts: &BTreeMap<u8, u64>) -> Vec<u8> {
    counts
        .keys()
        .copied()
        .filter(|&id| id as usize >= CLASS_NAMES.len())
        .collect()
}

/// Per-channel (min, max) intensity over the whole volume.
pub fn channel_ranges(image: &Array4<f32>) -> Vec<(f32, f32)> {
    (0..image.len_of(Axis(3)))
        .map(|c| {
            image
                .index_axis(Axis(3), c)
                .iter()
                .fold((f32::MAX, f32::MIN), |acc, &v| {
                    (acc.0.min(v), acc.1.max(v))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn histogram_counts_every_voxel() {
        let labels = Array3::from_shape_vec((2, 2, 2), vec![0u8, 0, 1, 2, 3, 3, 3, 0]).unwrap();
        let counts = label_histogram(&labels);

        assert_eq!(counts.get(&0), Some(&3));
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), Some(&3));
        assert_eq!(counts.values().sum::<u64>(), labels.len() as u64);
    }

    #[test]
    fn unknown_labels_are_reported() {
        let labels = Array3::from_shape_vec((1, 2, 2), vec![0u8, 3, 7, 200]).unwrap();
        let counts = label_histogram(&labels);
        assert_eq!(unknown_labels(&counts), vec![7, 200]);
    }

    #[test]
    fn no_unknown_labels_in_clean_map() {
        let labels = Array3::from_elem((2, 2, 2), 1u8);
        assert!(unknown_labels(&label_histogram(&labels)).is_empty());
    }

    #[test]
    fn spatial_match_compares_first_three_axes() {
        let image = Array4::<f32>::zeros((4, 3, 2, 4));
        assert!(spatial_match(&image, &Array3::<u8>::zeros((4, 3, 2))));
        assert!(!spatial_match(&image, &Array3::<u8>::zeros((4, 3, 5))));
    }

    #[test]
    fn channel_ranges_cover_each_channel() {
        let mut image = Array4::<f32>::zeros((2, 2, 2, 2));
        image[[0, 0, 0, 0]] = -5.0;
        image[[1, 1, 1, 0]] = 9.0;
        image[[0, 1, 0, 1]] = 2.5;

        let ranges = channel_ranges(&image);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], (-5.0, 9.0));
        assert_eq!(ranges[1], (0.0, 2.5));
    }

    #[test]
    fn names_fall_back_for_out_of_range_ids() {
        assert_eq!(class_name(1), "edema");
        assert_eq!(class_name(9), "unknown");
        assert_eq!(channel_name(0), "FLAIR");
        assert_eq!(channel_name(4), "extra");
    }
}
