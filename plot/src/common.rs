pub use anyhow::{ensure, format_err, Context as _, Error, Result};
pub use image::{Rgb, RgbImage};
pub use imageproc::{drawing, rect::Rect as StencilRect};
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use serde::Deserialize;
pub use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
pub use structopt::StructOpt;
