use crate::common::*;

/// Ghost artifact class names in class-id order.
///
/// Class ids are 1-based; id 0 denotes the background.
pub const GHOST_CLASSES: [&str; 3] = ["Bright", "Faint", "Rays"];

pub fn ghost_classes() -> IndexSet<String> {
    GHOST_CLASSES.iter().map(|&name| name.to_owned()).collect()
}

/// The class id a class-set index maps to.
pub fn class_id(index: usize) -> usize {
    index + 1
}
