mod common;

use common::synthetic_image::noise;
use sobel_mapreduce::image::ImageI32;
use sobel_mapreduce::mapreduce::{
    emit, key_groups, Component, Contribution, ImageAssembler, KeyGroup, OrderedAggregator,
    Shuffle,
};
use sobel_mapreduce::source::{Dims, PixelRecord};
use sobel_mapreduce::{sobel_magnitude, SobelError};

fn dims_of(image: &ImageI32) -> Dims {
    Dims {
        rows: image.h,
        cols: image.w,
    }
}

fn contributions(image: &ImageI32) -> Vec<Contribution> {
    let dims = dims_of(image);
    let mut out = Vec::new();
    for row in 0..image.h {
        for col in 0..image.w {
            let px = PixelRecord {
                row,
                col,
                value: image.get(col, row),
            };
            out.extend(emit(px, dims));
        }
    }
    out
}

fn sorted_groups(image: &ImageI32) -> Vec<KeyGroup> {
    let shuffle = Shuffle::new(1, dims_of(image)).unwrap();
    let merged = Shuffle::merge(shuffle.spill(contributions(image)));
    key_groups(merged).collect()
}

fn aggregate(image: &ImageI32, groups: &[KeyGroup]) -> Result<ImageI32, SobelError> {
    let shuffle = Shuffle::new(1, dims_of(image))?;
    let mut aggregator = OrderedAggregator::for_shuffle(&shuffle)?;
    let mut assembler = ImageAssembler::new(dims_of(image));
    aggregator.begin()?;
    for group in groups {
        if let Some(px) = aggregator.reduce(group)? {
            assembler.place(px)?;
        }
    }
    aggregator.finish()?;
    assembler.finish()
}

#[test]
fn hand_driven_pipeline_matches_reference() {
    let image = noise(8, 6, 21);
    let groups = sorted_groups(&image);
    assert_eq!(groups.len(), 2 * 8 * 6);
    assert_eq!(aggregate(&image, &groups).unwrap(), sobel_magnitude(&image));
}

#[test]
fn swapping_a_pixels_components_is_rejected() {
    let image = noise(6, 6, 4);
    let mut groups = sorted_groups(&image);
    let h = groups
        .iter()
        .position(|g| g.key.row == 2 && g.key.col == 3 && g.key.component == Component::Horizontal)
        .unwrap();
    groups.swap(h, h + 1);
    assert_eq!(groups[h].key.component, Component::Vertical);
    match aggregate(&image, &groups) {
        Err(SobelError::OrderingViolation { row, col, .. }) => assert_eq!((row, col), (2, 3)),
        other => panic!("expected ordering violation, got {other:?}"),
    }
}

#[test]
fn unsorted_delivery_is_rejected() {
    let image = noise(5, 5, 8);
    let mut groups = sorted_groups(&image);
    groups.reverse();
    let err = aggregate(&image, &groups).unwrap_err();
    assert!(err.is_ordering_violation(), "{err}");
}

#[test]
fn split_aggregators_never_produce_a_plausible_image() {
    // Two aggregators, one seeing horizontal groups and one vertical groups.
    let image = noise(5, 4, 13);
    let (horizontal, vertical): (Vec<KeyGroup>, Vec<KeyGroup>) = sorted_groups(&image)
        .into_iter()
        .partition(|g| g.key.component == Component::Horizontal);
    assert!(aggregate(&image, &horizontal).unwrap_err().is_ordering_violation());
    assert!(aggregate(&image, &vertical).unwrap_err().is_ordering_violation());
}

#[test]
fn dropped_group_is_reported_not_defaulted() {
    let image = noise(5, 5, 2);
    let mut groups = sorted_groups(&image);
    let v = groups
        .iter()
        .position(|g| g.key.row == 1 && g.key.col == 1 && g.key.component == Component::Vertical)
        .unwrap();
    groups.remove(v);
    match aggregate(&image, &groups) {
        Err(SobelError::OrderingViolation { row, col, .. }) => assert_eq!((row, col), (1, 1)),
        other => panic!("expected ordering violation, got {other:?}"),
    }
}
