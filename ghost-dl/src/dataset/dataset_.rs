use super::*;
use crate::{common::*, mask::InstanceMasks};

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug + Send,
{
    /// The number of color channels of the dataset.
    fn input_channels(&self) -> usize;

    /// The list of class names of the dataset.
    fn classes(&self) -> &IndexSet<String>;
}

/// The dataset with a list of image paths.
pub trait FileDataset
where
    Self: GenericDataset,
{
    /// Get the list of image paths in the dataset.
    fn records(&self) -> &[Arc<FileRecord>];
}

/// The dataset that generates per-instance masks on demand.
pub trait MaskDataset
where
    Self: GenericDataset,
{
    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Generate instance masks for the nth record in the dataset.
    fn masks(&self, index: usize) -> Result<InstanceMasks>;
}
