//! Annotated-region types in the VIA shape vocabulary.

use fov::{Rect, TLBR};
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

/// One annotated region: a shape descriptor plus its 1-based class id.
///
/// Class id 0 is reserved for the background.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub shape: Shape,
    pub class: usize,
}

/// Shape descriptor in the VIA `shape_attributes` vocabulary.
///
/// The `name` tag and field names follow the VIA export format verbatim,
/// so a `shape_attributes` object deserializes into this type directly.
/// Unrecognized shape names are a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Shape {
    Polygon {
        all_points_x: Vec<R64>,
        all_points_y: Vec<R64>,
    },
    Polyline {
        all_points_x: Vec<R64>,
        all_points_y: Vec<R64>,
    },
    Rect {
        x: R64,
        y: R64,
        width: R64,
        height: R64,
    },
    Circle {
        cx: R64,
        cy: R64,
        r: R64,
    },
    Ellipse {
        cx: R64,
        cy: R64,
        rx: R64,
        ry: R64,
        theta: R64,
    },
}

impl Shape {
    /// The VIA shape name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Polygon { .. } => "polygon",
            Self::Polyline { .. } => "polyline",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
        }
    }

    /// Axis-aligned bounding box of the shape, or `None` for a shape
    /// without vertices.
    pub fn bounding_box(&self) -> Option<TLBR<R64>> {
        let tlbr = match *self {
            Self::Polygon {
                ref all_points_x,
                ref all_points_y,
            }
            | Self::Polyline {
                ref all_points_x,
                ref all_points_y,
            } => {
                let l = all_points_x.iter().copied().min()?;
                let r = all_points_x.iter().copied().max()?;
                let t = all_points_y.iter().copied().min()?;
                let b = all_points_y.iter().copied().max()?;
                [t, l, b, r]
            }
            Self::Rect {
                x,
                y,
                width,
                height,
            } => [y, x, y + height, x + width],
            Self::Circle { cx, cy, r } => [cy - r, cx - r, cy + r, cx + r],
            Self::Ellipse {
                cx,
                cy,
                rx,
                ry,
                theta,
            } => {
                // Extent of the rotated ellipse along each axis.
                let (rx, ry, theta) = (rx.raw(), ry.raw(), theta.raw());
                let ex = r64(((rx * theta.cos()).powi(2) + (ry * theta.sin()).powi(2)).sqrt());
                let ey = r64(((rx * theta.sin()).powi(2) + (ry * theta.cos()).powi(2)).sqrt());
                [cy - ey, cx - ex, cy + ey, cx + ex]
            }
        };

        TLBR::try_from_tlbr(tlbr).ok()
    }
}
