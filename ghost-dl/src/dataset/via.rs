use super::*;
use crate::{
    common::*,
    mask::{InstanceMasks, MaskBuilder},
};
use fov::{Rect, HW};
use region::{Region, Shape};

/// The VIA export file name expected inside each subset directory.
pub const ANNOTATION_FILE: &str = "via_region_data.json";

/// The ghost-artifact dataset annotated with the VGG Image Annotator.
#[derive(Debug, Clone)]
pub struct GhostDataset {
    pub classes: IndexSet<String>,
    pub samples: Vec<ViaSample>,
    pub records: Vec<Arc<FileRecord>>,
}

impl GenericDataset for GhostDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl FileDataset for GhostDataset {
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

impl MaskDataset for GhostDataset {
    fn num_records(&self) -> usize {
        self.records.len()
    }

    fn masks(&self, index: usize) -> Result<InstanceMasks> {
        let record = self
            .records
            .get(index)
            .ok_or_else(|| format_err!("record index {} is out of range", index))?;
        MaskBuilder::new().build(record)
    }
}

impl GhostDataset {
    /// Load one subset of the ghost dataset rooted at `dataset_dir`.
    ///
    /// Images without any annotated region are skipped.
    pub fn load<P>(dataset_dir: P, subset: Subset) -> Result<GhostDataset>
    where
        P: AsRef<Path>,
    {
        let subset_dir = dataset_dir.as_ref().join(subset.dir_name());
        let annotation_file = subset_dir.join(ANNOTATION_FILE);
        let classes = ghost_classes();

        // load annotations
        let text = fs::read_to_string(&annotation_file).with_context(|| {
            format!(
                "failed to read annotation file '{}'",
                annotation_file.display()
            )
        })?;
        let annotations: IndexMap<String, ViaImage> =
            serde_json::from_str(&text).with_context(|| {
                format!(
                    "failed to parse annotation file '{}'",
                    annotation_file.display()
                )
            })?;

        // The VIA tool keeps images in the JSON even if they carry no
        // annotations. Skip unannotated images.
        let samples: Vec<_> = annotations
            .into_iter()
            .filter(|(_key, annotation)| !annotation.regions.is_empty())
            .map(|(_key, annotation)| {
                let image_file = subset_dir.join(&annotation.filename);
                ViaSample {
                    image_file,
                    annotation,
                }
            })
            .collect();

        // build records
        let records: Vec<_> = samples
            .iter()
            .map(|sample| -> Result<_> {
                let ViaSample {
                    image_file,
                    annotation,
                } = sample;

                // VIA does not store image dimensions, so probe the image
                // file itself.
                let size = {
                    let imagesize::ImageSize { height, width } = imagesize::size(image_file)
                        .with_context(|| {
                            format!(
                                "failed to read the size of image '{}'",
                                image_file.display()
                            )
                        })?;
                    HW::try_from_hw([height, width])?
                };

                let regions: Vec<_> = annotation
                    .indexed_regions()?
                    .into_iter()
                    .map(|(index, region)| -> Result<_> {
                        let class_name =
                            region.region_attributes.get("Type").ok_or_else(|| {
                                format_err!(
                                    "region {} of '{}' has no 'Type' attribute",
                                    index,
                                    image_file.display()
                                )
                            })?;
                        let class_index = classes
                            .get_index_of(class_name.as_str())
                            .ok_or_else(|| {
                                format_err!(
                                    "region {} of '{}' has unrecognized class '{}'",
                                    index,
                                    image_file.display(),
                                    class_name
                                )
                            })?;

                        let shape = region.shape_attributes.clone();
                        if let Some(bbox) = shape.bounding_box() {
                            let oversized = bbox.b().raw() > size.h() as f64
                                || bbox.r().raw() > size.w() as f64
                                || bbox.t().raw() < 0.0
                                || bbox.l().raw() < 0.0;
                            if oversized {
                                warn!(
                                    "region {} of '{}' extends beyond the image bounds",
                                    index,
                                    image_file.display()
                                );
                            }
                        }

                        Ok(Region {
                            shape,
                            class: class_id(class_index),
                        })
                    })
                    .try_collect()?;

                Ok(Arc::new(FileRecord {
                    path: image_file.clone(),
                    size,
                    regions,
                }))
            })
            .try_collect()?;

        info!(
            "loaded {} annotated images from '{}'",
            records.len(),
            annotation_file.display()
        );

        Ok(GhostDataset {
            classes,
            samples,
            records,
        })
    }
}

/// One VIA image entry kept with its resolved image path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaSample {
    pub image_file: PathBuf,
    pub annotation: ViaImage,
}

/// One image entry in a VIA JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaImage {
    pub filename: String,
    /// Source file size in bytes, as written by the VIA tool.
    #[serde(default)]
    pub size: Option<u64>,
    pub regions: IndexMap<String, ViaRegion>,
}

/// One region entry in a VIA JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaRegion {
    pub shape_attributes: Shape,
    #[serde(default)]
    pub region_attributes: HashMap<String, String>,
}

impl ViaImage {
    /// Regions ordered by their numeric index key.
    pub fn indexed_regions(&self) -> Result<Vec<(usize, &ViaRegion)>> {
        let mut regions: Vec<_> = self
            .regions
            .iter()
            .map(|(key, region)| -> Result<_> {
                let index: usize = key
                    .parse()
                    .with_context(|| format!("invalid region index '{}'", key))?;
                Ok((index, region))
            })
            .try_collect()?;
        regions.sort_by_key(|(index, _region)| *index);
        Ok(regions)
    }
}

/// Dataset subsets in the on-disk directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subset {
    Train,
    Val,
    Test,
}

impl Subset {
    /// The subset directory name under the dataset root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Train => "Training_set",
            Self::Val => "Validation_set",
            Self::Test => "Test_set",
        }
    }
}

impl FromStr for Subset {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let subset = match text.to_lowercase().as_str() {
            "train" | "training_set" => Self::Train,
            "val" | "validation_set" => Self::Val,
            "test" | "test_set" => Self::Test,
            _ => bail!("unrecognized subset '{}'", text),
        };
        Ok(subset)
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::Test => "test",
        };
        write!(f, "{}", name)
    }
}
