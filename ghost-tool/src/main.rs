use anyhow::{format_err, Context, Result};
use clap::Parser;
use ghost_dl::{FileDataset, GenericDataset, GhostDataset, MaskDataset, Subset};
use prettytable::{cell, row, Table};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Print a summary table of one dataset subset
    Info {
        /// dataset root directory
        dataset_dir: PathBuf,
        /// subset name: train, val or test
        subset: Subset,
    },
    /// Rasterize instance masks and write one PNG per instance
    ExportMasks {
        /// dataset root directory
        dataset_dir: PathBuf,
        /// subset name: train, val or test
        subset: Subset,
        /// output directory
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    match Opts::parse() {
        Opts::Info {
            dataset_dir,
            subset,
        } => {
            info(dataset_dir, subset)?;
        }
        Opts::ExportMasks {
            dataset_dir,
            subset,
            output_dir,
        } => {
            export_masks(dataset_dir, subset, output_dir)?;
        }
    }

    Ok(())
}

fn info(dataset_dir: impl AsRef<Path>, subset: Subset) -> Result<()> {
    let dataset = GhostDataset::load(dataset_dir, subset)?;

    // print record information
    {
        let mut table = Table::new();
        table.add_row(row!["image", "width", "height", "regions", "classes"]);

        dataset.records().iter().for_each(|record| {
            let classes: Vec<_> = record
                .regions
                .iter()
                .map(|region| {
                    dataset
                        .classes()
                        .get_index(region.class - 1)
                        .map(|name| name.as_str())
                        .unwrap_or("?")
                })
                .collect();

            table.add_row(row![
                record.path.display(),
                record.size.w(),
                record.size.h(),
                record.regions.len(),
                classes.join(", "),
            ]);
        });

        table.printstd();
    }

    Ok(())
}

fn export_masks(
    dataset_dir: impl AsRef<Path>,
    subset: Subset,
    output_dir: impl AsRef<Path>,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let dataset = GhostDataset::load(dataset_dir, subset)?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            output_dir.display()
        )
    })?;

    for (index, record) in dataset.records().iter().enumerate() {
        let masks = dataset.masks(index)?;
        let stem = record
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format_err!("invalid image file name '{}'", record.path.display()))?;

        for channel in 0..masks.num_instances() {
            let image = masks.channel_image(channel)?;
            let class = masks.class_ids[channel];
            let outfile = output_dir.join(format!("{}_{:02}_c{}.png", stem, channel, class));
            image
                .save(&outfile)
                .with_context(|| format!("failed to write mask '{}'", outfile.display()))?;
        }
    }

    Ok(())
}
