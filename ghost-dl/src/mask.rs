//! Instance-mask rasterization.

use crate::{common::*, dataset::FileRecord};
use fov::{Rect, TLBR};
use image::{GrayImage, Luma};
use imageproc::{drawing, point::Point, rect::Rect as StencilRect};
use ndarray::{s, Array3};
use region::{Region, Shape};

const FG: Luma<u8> = Luma([255u8]);

/// Instance masks for one image: one boolean channel per annotated
/// region plus a parallel list of class ids.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceMasks {
    /// Boolean array of shape (height, width, instance count).
    pub masks: Array3<bool>,
    /// Class id of each instance channel.
    pub class_ids: Vec<u32>,
}

impl InstanceMasks {
    pub fn num_instances(&self) -> usize {
        self.class_ids.len()
    }

    /// Render one instance channel as an 8-bit image.
    pub fn channel_image(&self, channel: usize) -> Result<GrayImage> {
        ensure!(
            channel < self.num_instances(),
            "channel index {} is out of range",
            channel
        );

        let (height, width, _instances) = self.masks.dim();
        let mut image = GrayImage::new(width as u32, height as u32);

        let view = self.masks.slice(s![.., .., channel]);
        for ((y, x), &set) in view.indexed_iter() {
            if set {
                image.put_pixel(x as u32, y as u32, FG);
            }
        }

        Ok(image)
    }
}

/// Rasterizes annotated regions into per-instance boolean masks.
///
/// Rasterized pixels are always confined to the record's declared image
/// dimensions. An additional clip bound may be configured to drop pixels
/// at or beyond a fixed coordinate in either axis, matching the behavior
/// of older exports of this dataset.
#[derive(Debug, Clone, Default)]
pub struct MaskBuilder {
    clip: Option<usize>,
}

impl MaskBuilder {
    pub fn new() -> Self {
        Self { clip: None }
    }

    /// Drop rasterized pixels at or beyond `bound` in either axis.
    pub fn clip(mut self, bound: usize) -> Self {
        self.clip = Some(bound);
        self
    }

    /// Rasterize every region of the record.
    ///
    /// The returned array has one channel per region, in region order.
    pub fn build(&self, record: &FileRecord) -> Result<InstanceMasks> {
        let height = record.size.h();
        let width = record.size.w();

        let mut masks = Array3::from_elem((height, width, record.regions.len()), false);
        let mut class_ids = Vec::with_capacity(record.regions.len());

        for (channel, region) in record.regions.iter().enumerate() {
            let Region { ref shape, class } = *region;

            let stencil = rasterize(shape, height, width).with_context(|| {
                format!(
                    "failed to rasterize region {} of '{}'",
                    channel,
                    record.path.display()
                )
            })?;

            for (x, y, pixel) in stencil.enumerate_pixels() {
                if pixel[0] == 0 {
                    continue;
                }
                let (x, y) = (x as usize, y as usize);
                if let Some(bound) = self.clip {
                    if x >= bound || y >= bound {
                        continue;
                    }
                }
                masks[[y, x, channel]] = true;
            }

            class_ids.push(class as u32);
        }

        Ok(InstanceMasks { masks, class_ids })
    }
}

/// Fill one shape into a fresh stencil image of the given dimensions.
fn rasterize(shape: &Shape, height: usize, width: usize) -> Result<GrayImage> {
    let mut stencil = GrayImage::new(width as u32, height as u32);

    match *shape {
        Shape::Polygon {
            ref all_points_x,
            ref all_points_y,
        }
        | Shape::Polyline {
            ref all_points_x,
            ref all_points_y,
        } => {
            ensure!(
                all_points_x.len() == all_points_y.len(),
                "mismatched point list lengths"
            );

            let mut points: Vec<Point<i32>> = all_points_x
                .iter()
                .zip(all_points_y)
                .map(|(&x, &y)| Point::new(x.raw() as i32, y.raw() as i32))
                .collect();
            points.dedup();

            // The rasterizer closes the outline itself and rejects an
            // explicit duplicate closing vertex.
            if points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            ensure!(
                points.len() >= 3,
                "a polygon needs at least three distinct vertices"
            );

            drawing::draw_polygon_mut(&mut stencil, &points, FG);
        }
        Shape::Rect {
            x,
            y,
            width: w,
            height: h,
        } => {
            let bounds = TLBR::try_from_tlhw([y, x, h, w])?;
            ensure!(
                bounds.h().raw() >= 1.0 && bounds.w().raw() >= 1.0,
                "a rect region must be at least one pixel in each dimension"
            );

            let rect = StencilRect::at(bounds.l().raw() as i32, bounds.t().raw() as i32)
                .of_size(bounds.w().raw() as u32, bounds.h().raw() as u32);
            drawing::draw_filled_rect_mut(&mut stencil, rect, FG);
        }
        Shape::Circle { cx, cy, r } => {
            drawing::draw_filled_circle_mut(
                &mut stencil,
                (cx.raw() as i32, cy.raw() as i32),
                r.raw() as i32,
                FG,
            );
        }
        Shape::Ellipse {
            cx,
            cy,
            rx,
            ry,
            theta,
        } => {
            let outline = ellipse_outline(cx.raw(), cy.raw(), rx.raw(), ry.raw(), theta.raw());
            if theta.raw() == 0.0 || outline.len() < 3 {
                drawing::draw_filled_ellipse_mut(
                    &mut stencil,
                    (cx.raw() as i32, cy.raw() as i32),
                    rx.raw() as i32,
                    ry.raw() as i32,
                    FG,
                );
            } else {
                drawing::draw_polygon_mut(&mut stencil, &outline, FG);
            }
        }
    }

    Ok(stencil)
}

/// Dense polygonal outline of a rotated ellipse.
fn ellipse_outline(cx: f64, cy: f64, rx: f64, ry: f64, theta: f64) -> Vec<Point<i32>> {
    const SAMPLES: usize = 64;

    let (sin_t, cos_t) = theta.sin_cos();
    let mut points: Vec<_> = (0..SAMPLES)
        .map(|step| {
            let phi = std::f64::consts::TAU * step as f64 / SAMPLES as f64;
            let (sin_p, cos_p) = phi.sin_cos();
            let x = cx + rx * cos_p * cos_t - ry * sin_p * sin_t;
            let y = cy + rx * cos_p * sin_t + ry * sin_p * cos_t;
            Point::new(x as i32, y as i32)
        })
        .collect();
    points.dedup();

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}
