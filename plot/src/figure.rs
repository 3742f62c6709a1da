use crate::common::*;
use fov::{fov_geometry, prelude::*, Ccd, Release, HW};

/// Pixel gap between the two panels of a composite figure.
const PANEL_GAP: u32 = 4;

const WHITE: Rgb<u8> = Rgb([255u8, 255u8, 255u8]);
const BLACK: Rgb<u8> = Rgb([0u8, 0u8, 0u8]);

/// Downloads exposure thumbnails and renders composite blacklist figures.
#[derive(Debug)]
pub struct FigureRenderer {
    client: reqwest::blocking::Client,
    release: Release,
}

impl FigureRenderer {
    pub fn new(release: Release) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to create the HTTP client")?;
        Ok(Self { client, release })
    }

    /// Download the thumbnail, draw the focal-plane overlay and write the
    /// composite figure to `outfile`.
    pub fn render(&self, url: &str, blacklisted: &[u32], outfile: &Path) -> Result<()> {
        let thumbnail = self.download(url)?;
        let overlay = self.draw_overlay(&thumbnail, blacklisted)?;
        let figure = compose(&thumbnail, &overlay);

        figure
            .save(outfile)
            .with_context(|| format!("failed to write figure '{}'", outfile.display()))?;
        Ok(())
    }

    fn download(&self, url: &str) -> Result<RgbImage> {
        info!("downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("failed to download '{}'", url))?;
        ensure!(
            response.status().is_success(),
            "download of '{}' failed with status {}",
            url,
            response.status()
        );

        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read the response body of '{}'", url))?;
        let image = image::load_from_memory(&bytes)
            .with_context(|| format!("failed to decode the image at '{}'", url))?;
        Ok(image.to_rgb8())
    }

    /// Black canvas with the CCD grid in white outlines and blacklisted
    /// CCDs filled solid.
    fn draw_overlay(&self, thumbnail: &RgbImage, blacklisted: &[u32]) -> Result<RgbImage> {
        let (width, height) = thumbnail.dimensions();
        let ccds = fov_geometry(self.release, HW::from_hw([height, width]))?;

        let mut canvas = RgbImage::from_pixel(width, height, BLACK);

        for ccd in &ccds {
            draw_ccd(&mut canvas, ccd, false)?;
        }

        for &ccdnum in blacklisted {
            let ccd = ccds
                .iter()
                .find(|ccd| ccd.id == ccdnum)
                .ok_or_else(|| format_err!("unknown CCD number {}", ccdnum))?;
            draw_ccd(&mut canvas, ccd, true)?;
        }

        Ok(canvas)
    }
}

fn draw_ccd(canvas: &mut RgbImage, ccd: &Ccd, filled: bool) -> Result<()> {
    let [t, l, h, w] = ccd.bounds.tlhw();
    ensure!(h > 0 && w > 0, "degenerate bounds for CCD {}", ccd.id);

    let rect = StencilRect::at(l as i32, t as i32).of_size(w as u32, h as u32);
    if filled {
        drawing::draw_filled_rect_mut(canvas, rect, WHITE);
    } else {
        drawing::draw_hollow_rect_mut(canvas, rect, WHITE);
    }

    Ok(())
}

/// Lay two equal-height panels side by side with a thin gap.
fn compose(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let (left_w, left_h) = left.dimensions();
    let (right_w, right_h) = right.dimensions();
    let width = left_w + PANEL_GAP + right_w;
    let height = left_h.max(right_h);

    let mut figure = RgbImage::from_pixel(width, height, WHITE);
    image::imageops::replace(&mut figure, left, 0, 0);
    image::imageops::replace(&mut figure, right, left_w + PANEL_GAP, 0);
    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_marks_blacklisted_ccds() {
        let renderer = FigureRenderer::new(Release::Y1a1).unwrap();
        let thumbnail = RgbImage::from_pixel(530, 454, Rgb([64, 64, 64]));

        let overlay = renderer.draw_overlay(&thumbnail, &[1]).unwrap();
        assert_eq!(overlay.dimensions(), (530, 454));

        let ccds = fov_geometry(Release::Y1a1, HW::from_hw([454, 530])).unwrap();
        let blacklisted = &ccds[0];
        assert_eq!(blacklisted.id, 1);

        // The blacklisted CCD is filled solid; its neighbor stays black
        // inside a white outline.
        let center = |ccd: &Ccd| (ccd.bounds.cx() as u32, ccd.bounds.cy() as u32);

        let (cx, cy) = center(blacklisted);
        assert_eq!(*overlay.get_pixel(cx, cy), WHITE);

        let neighbor = &ccds[1];
        let (cx, cy) = center(neighbor);
        assert_eq!(*overlay.get_pixel(cx, cy), BLACK);
        let edge_x = neighbor.bounds.l() as u32;
        assert_eq!(*overlay.get_pixel(edge_x, cy), WHITE);
    }

    #[test]
    fn unknown_ccd_number_is_an_error() {
        let renderer = FigureRenderer::new(Release::Y1a1).unwrap();
        let thumbnail = RgbImage::from_pixel(530, 454, Rgb([64, 64, 64]));

        assert!(renderer.draw_overlay(&thumbnail, &[99]).is_err());
    }

    #[test]
    fn compose_places_panels_side_by_side() {
        let left = RgbImage::from_pixel(8, 6, Rgb([10, 10, 10]));
        let right = RgbImage::from_pixel(8, 6, Rgb([20, 20, 20]));

        let figure = compose(&left, &right);
        assert_eq!(figure.dimensions(), (8 + PANEL_GAP + 8, 6));
        assert_eq!(*figure.get_pixel(0, 0), Rgb([10, 10, 10]));
        assert_eq!(*figure.get_pixel(8 + PANEL_GAP, 0), Rgb([20, 20, 20]));
        assert_eq!(*figure.get_pixel(8, 0), WHITE);
    }
}
