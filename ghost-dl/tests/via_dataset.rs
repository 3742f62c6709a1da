use ghost_dl::{FileDataset, GenericDataset, GhostDataset, MaskDataset, Subset};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

const ANNOTATIONS: &str = r#"{
    "ghost_000123.png12345": {
        "filename": "ghost_000123.png",
        "size": 12345,
        "regions": {
            "0": {
                "shape_attributes": {
                    "name": "polygon",
                    "all_points_x": [10, 30, 30, 10],
                    "all_points_y": [5, 5, 20, 20]
                },
                "region_attributes": {"Type": "Bright"}
            },
            "1": {
                "shape_attributes": {"name": "circle", "cx": 48, "cy": 32, "r": 6},
                "region_attributes": {"Type": "Rays"}
            }
        }
    },
    "ghost_000456.png999": {
        "filename": "ghost_000456.png",
        "size": 999,
        "regions": {}
    }
}"#;

fn write_image(path: &Path, width: u32, height: u32) {
    let mut image = RgbImage::new(width, height);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([32, 32, 32]);
    }
    image.save(path).unwrap();
}

fn write_subset(root: &Path, subset: Subset, annotations: &str) {
    let subset_dir = root.join(subset.dir_name());
    fs::create_dir_all(&subset_dir).unwrap();
    fs::write(subset_dir.join("via_region_data.json"), annotations).unwrap();
    write_image(&subset_dir.join("ghost_000123.png"), 64, 48);
    write_image(&subset_dir.join("ghost_000456.png"), 64, 48);
}

#[test]
fn load_and_rasterize_synthetic_subset() {
    let temp = tempfile::tempdir().unwrap();
    write_subset(temp.path(), Subset::Train, ANNOTATIONS);

    let dataset = GhostDataset::load(temp.path(), Subset::Train).unwrap();

    // The unannotated image is skipped.
    assert_eq!(dataset.records().len(), 1);
    assert_eq!(dataset.input_channels(), 3);
    assert_eq!(dataset.classes().len(), 3);

    let record = &dataset.records()[0];
    assert_eq!(record.size.h(), 48);
    assert_eq!(record.size.w(), 64);
    assert_eq!(record.regions.len(), 2);
    assert_eq!(record.regions[0].class, 1);
    assert_eq!(record.regions[1].class, 3);

    // One mask channel per region, sized to the probed image dimensions.
    let masks = dataset.masks(0).unwrap();
    assert_eq!(masks.masks.dim(), (48, 64, 2));
    assert_eq!(masks.class_ids, &[1, 3]);

    // The polygon channel covers its rectangle extent, the circle channel
    // its center.
    assert!(masks.masks[[5, 10, 0]]);
    assert!(masks.masks[[20, 30, 0]]);
    assert!(masks.masks[[32, 48, 1]]);
    assert!(!masks.masks[[32, 48, 0]]);
}

#[test]
fn missing_annotation_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp.path().join(Subset::Val.dir_name())).unwrap();

    let result = GhostDataset::load(temp.path(), Subset::Val);
    assert!(result.is_err());
}

#[test]
fn region_without_type_attribute_is_an_error() {
    let annotations = r#"{
        "ghost_000123.png12345": {
            "filename": "ghost_000123.png",
            "size": 12345,
            "regions": {
                "0": {
                    "shape_attributes": {"name": "circle", "cx": 8, "cy": 8, "r": 2},
                    "region_attributes": {}
                }
            }
        }
    }"#;

    let temp = tempfile::tempdir().unwrap();
    write_subset(temp.path(), Subset::Test, annotations);

    let error = GhostDataset::load(temp.path(), Subset::Test).unwrap_err();
    assert!(error.to_string().contains("Type"), "error: {:#}", error);
}

#[test]
fn unknown_shape_name_is_an_error() {
    let annotations = r#"{
        "ghost_000123.png12345": {
            "filename": "ghost_000123.png",
            "size": 12345,
            "regions": {
                "0": {
                    "shape_attributes": {"name": "point", "cx": 8, "cy": 8},
                    "region_attributes": {"Type": "Faint"}
                }
            }
        }
    }"#;

    let temp = tempfile::tempdir().unwrap();
    write_subset(temp.path(), Subset::Test, annotations);

    assert!(GhostDataset::load(temp.path(), Subset::Test).is_err());
}
