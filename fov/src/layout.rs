use crate::{common::*, Rect, HW, TLBR};
use std::{fmt, str::FromStr};

/// CCD ids occupying each focal-plane row, top to bottom.
pub const CCD_ROWS: [&[u32]; 12] = [
    &[3, 2, 1],
    &[7, 6, 5, 4],
    &[12, 11, 10, 9, 8],
    &[18, 17, 16, 15, 14, 13],
    &[24, 23, 22, 21, 20, 19],
    &[31, 30, 29, 28, 27, 26, 25],
    &[38, 37, 36, 35, 34, 33, 32],
    &[44, 43, 42, 41, 40, 39],
    &[50, 49, 48, 47, 46, 45],
    &[55, 54, 53, 52, 51],
    &[59, 58, 57, 56],
    &[62, 61, 60],
];

/// Data release that names the thumbnail layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Release {
    Sva1,
    Y1a1,
}

impl Default for Release {
    fn default() -> Self {
        Self::Y1a1
    }
}

impl FromStr for Release {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let release = match text.to_lowercase().as_str() {
            "sva1" => Self::Sva1,
            "y1a1" => Self::Y1a1,
            _ => bail!("unrecognized release name '{}'", text),
        };
        Ok(release)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sva1 => "sva1",
            Self::Y1a1 => "y1a1",
        };
        write!(f, "{}", name)
    }
}

/// One CCD footprint in thumbnail pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ccd {
    pub id: u32,
    pub bounds: TLBR<i64>,
}

/// Compute the footprint of every CCD on a focal-plane thumbnail.
///
/// Rows of CCDs span the padded image height and every row is centered
/// under the full image width. The SV-era thumbnails carry no border
/// padding and flip both the row ordering and the ordering within each
/// row. Bounds are truncated to integer pixels and the returned list is
/// sorted by CCD id.
pub fn fov_geometry(release: Release, size: HW<u32>) -> Result<Vec<Ccd>> {
    let width = size.w() as f64;
    let height = size.h() as f64;

    let (rows, pad): (Vec<Vec<u32>>, [f64; 2]) = match release {
        Release::Sva1 => {
            let rows = CCD_ROWS
                .iter()
                .rev()
                .map(|row| row.iter().rev().copied().collect())
                .collect();
            (rows, [0.0, 0.0])
        }
        Release::Y1a1 => {
            let rows = CCD_ROWS.iter().map(|row| row.to_vec()).collect();
            (rows, [0.02 * width, 0.02 * height])
        }
    };

    let n_rows = rows.len();
    let max_ncols = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    ensure!(n_rows > 0 && max_ncols > 0, "the CCD layout table is empty");

    let ccd_w = (width - 2.0 * pad[0]) / max_ncols as f64;
    let ccd_h = (height - 2.0 * pad[1]) / n_rows as f64;

    let mut ccds = Vec::with_capacity(rows.iter().map(|row| row.len()).sum());

    for (i, row) in rows.iter().enumerate() {
        let xpad = (width - row.len() as f64 * ccd_w) / 2.0;
        let ypad = pad[1];

        for (j, &id) in row.iter().enumerate() {
            let l = xpad + j as f64 * ccd_w;
            let r = l + ccd_w;
            let t = ypad + i as f64 * ccd_h;
            let b = t + ccd_h;
            let bounds = TLBR::try_from_tlbr([t, l, b, r])?.cast::<i64>();
            ccds.push(Ccd { id, bounds });
        }
    }

    ccds.sort_by_key(|ccd| ccd.id);
    Ok(ccds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectExt;
    use approx::assert_abs_diff_eq;

    const SIZE: [u32; 2] = [454, 530];

    fn geometry(release: Release) -> Vec<Ccd> {
        fov_geometry(release, crate::HW::from_hw(SIZE)).unwrap()
    }

    #[test]
    fn ccd_count_and_ids() {
        let expect: usize = CCD_ROWS.iter().map(|row| row.len()).sum();

        for release in [Release::Sva1, Release::Y1a1] {
            let ccds = geometry(release);
            assert_eq!(ccds.len(), expect);

            let ids: Vec<_> = ccds.iter().map(|ccd| ccd.id).collect();
            let sorted: Vec<_> = (1..=expect as u32).collect();
            assert_eq!(ids, sorted);
        }
    }

    #[test]
    fn ccds_inside_image_bounds() {
        for release in [Release::Sva1, Release::Y1a1] {
            for ccd in geometry(release) {
                let [t, l, b, r] = ccd.bounds.tlbr();
                assert!(t >= 0 && l >= 0, "ccd {} out of bounds", ccd.id);
                assert!(
                    b <= SIZE[0] as i64 && r <= SIZE[1] as i64,
                    "ccd {} out of bounds",
                    ccd.id
                );
            }
        }
    }

    #[test]
    fn rows_contiguous_and_centered() {
        for release in [Release::Sva1, Release::Y1a1] {
            let ccds = geometry(release);

            let mut tops: Vec<_> = ccds.iter().map(|ccd| ccd.bounds.t()).collect();
            tops.sort_unstable();
            tops.dedup();

            for top in tops {
                let mut row: Vec<_> = ccds
                    .iter()
                    .filter(|ccd| ccd.bounds.t() == top)
                    .collect();
                row.sort_by_key(|ccd| ccd.bounds.l());

                for pair in row.windows(2) {
                    let gap = pair[1].bounds.l() - pair[0].bounds.r();
                    assert!(gap.abs() <= 1, "row not contiguous at ccd {}", pair[1].id);
                }

                let left_margin = row[0].bounds.l();
                let right_margin = SIZE[1] as i64 - row[row.len() - 1].bounds.r();
                assert!((left_margin - right_margin).abs() <= 1, "row not centered");
            }
        }
    }

    #[test]
    fn padded_first_row() {
        let ccds = geometry(Release::Y1a1);

        // The top row holds CCDs 1..=3 below the 2% vertical padding.
        let ypad = (0.02 * SIZE[0] as f64) as i64;
        let top: Vec<_> = ccds
            .iter()
            .filter(|ccd| ccd.bounds.t() == ypad)
            .map(|ccd| ccd.id)
            .collect();
        assert_eq!(top, &[1, 2, 3]);

        // Uniform CCD width spans the padded image width over the widest row.
        let expect_w = (SIZE[1] as f64 - 2.0 * 0.02 * SIZE[1] as f64) / 7.0;
        for ccd in &ccds {
            assert_abs_diff_eq!(ccd.bounds.w() as f64, expect_w, epsilon = 1.0);
        }
    }

    #[test]
    fn sva1_flips_rows() {
        let ccds = geometry(Release::Sva1);

        // No padding: the flipped top row holds CCDs 60..=62 at y = 0.
        let top: Vec<_> = ccds
            .iter()
            .filter(|ccd| ccd.bounds.t() == 0)
            .map(|ccd| ccd.id)
            .collect();
        assert_eq!(top, &[60, 61, 62]);
    }

    #[test]
    fn release_from_str() {
        assert_eq!("SVA1".parse::<Release>().unwrap(), Release::Sva1);
        assert_eq!("y1a1".parse::<Release>().unwrap(), Release::Y1a1);
        assert!("y3a2".parse::<Release>().is_err());
        assert_eq!(Release::default().to_string(), "y1a1");
    }
}
