//! Wedge geometry for the radial menu.
//!
//! All coordinates live on a square canvas of side `2 * radius`, y pointing
//! down, angles in degrees. A sector at `index` is the wedge between angle 0
//! and `-span`, rotated by `-index * span` about the canvas center, so sectors
//! tile the circle in index order. The whole canvas is then turned by
//! [`Wheel::rotation`] when drawn.

use crate::wm::Point;
use std::f64::consts::PI;
use std::fmt;
use thiserror::Error;

pub const RADIUS: f64 = 175.0;
pub const ICON_RADIUS_FACTOR: f64 = 0.65;
pub const CANVAS_ROTATION: f64 = 90.0;
pub const FULL_TURN: f64 = 360.0;
pub const FAN_RADIUS: f64 = 60.0; // button orbit in the fan layout
pub const FAN_BUTTON_RADIUS: f64 = 20.0;
/// Side of an item icon drawn at the anchor.
pub const ICON_SIZE: f64 = 25.0;
/// Distance from the anchor down to the label baseline.
pub const LABEL_OFFSET: f64 = 25.0;

const ANGLE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("menu has no items")]
    Empty,
    #[error("sector {index} is out of range for {total} sectors")]
    OutOfRange { index: usize, total: usize },
}

/// Angular span of one sector when the circle is split `total` ways.
pub fn pie_angle(total: usize) -> Result<f64, GeometryError> {
    match total {
        0 => Err(GeometryError::Empty),
        n => Ok(FULL_TURN / n as f64),
    }
}

fn checked_span(index: usize, total: usize) -> Result<f64, GeometryError> {
    let span = pie_angle(total)?;
    if index >= total {
        return Err(GeometryError::OutOfRange { index, total });
    }
    Ok(span)
}

/// Offset of button `index` from the center in the fan layout. Index 0 sits at
/// twelve o'clock and the rest follow clockwise.
pub fn fan_offset(index: usize, total: usize, radius: f64) -> Result<Point, GeometryError> {
    checked_span(index, total)?;
    let turn = 2.0 * PI * (index as f64 / total as f64 - 0.25);
    Ok(Point::new(radius * turn.cos(), radius * turn.sin()))
}

/// Outline of a single wedge before its sector rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgePath {
    pub center: Point,
    pub radius: f64,
    pub span: f64,
}

impl WedgePath {
    /// Rightmost point of the circle, where every wedge starts.
    pub fn start(&self) -> Point {
        self.center.offset(self.radius, 0.0)
    }

    pub fn end(&self) -> Point {
        let angle = (-self.span).to_radians();
        self.center
            .offset(self.radius * angle.cos(), self.radius * angle.sin())
    }

    pub fn is_full_circle(&self) -> bool {
        self.span >= FULL_TURN - ANGLE_EPSILON
    }

    fn is_large_arc(&self) -> bool {
        self.span > FULL_TURN / 2.0 + ANGLE_EPSILON
    }
}

/// Writes the path as SVG path data.
impl fmt::Display for WedgePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (c, s, r) = (self.center, self.start(), Num(self.radius));
        write!(f, "M{},{} L{},{} ", Num(c.x), Num(c.y), Num(s.x), Num(s.y))?;

        // an arc whose endpoints coincide draws nothing, so split the circle
        if self.is_full_circle() {
            let opposite = self.center.offset(-self.radius, 0.0);
            write!(f, "A{r},{r} 0 1,0 {},{} ", Num(opposite.x), Num(opposite.y))?;
            write!(f, "A{r},{r} 0 1,0 {},{} Z", Num(s.x), Num(s.y))
        } else {
            let e = self.end();
            let large = u8::from(self.is_large_arc());
            write!(f, "A{r},{r} 0 {large},0 {},{} Z", Num(e.x), Num(e.y))
        }
    }
}

/// Prints a coordinate rounded to three decimals, never as `-0`.
pub(crate) struct Num(pub(crate) f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{rounded}")
    }
}

/// Placement of one menu item on the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub index: usize,
    /// Angular width in degrees.
    pub span: f64,
    /// Rotation of the whole sector about the wheel center.
    pub rotation: f64,
    pub path: WedgePath,
    /// Icon and label anchor, in the sector's unrotated frame.
    pub anchor: Point,
    /// Rotation about `anchor` that cancels the sector and canvas turns.
    pub anchor_rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wheel {
    pub center: Point,
    pub radius: f64,
    pub icon_radius: f64,
    /// Turn applied to the whole canvas when it is drawn.
    pub rotation: f64,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(RADIUS, ICON_RADIUS_FACTOR)
    }
}

impl Wheel {
    pub fn new(radius: f64, icon_radius_factor: f64) -> Self {
        Self {
            center: Point::new(radius, radius),
            radius,
            icon_radius: radius * icon_radius_factor,
            rotation: CANVAS_ROTATION,
        }
    }

    /// Side of the square canvas the wheel is drawn on.
    pub fn size(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn sector(&self, index: usize, total: usize) -> Result<Sector, GeometryError> {
        let span = checked_span(index, total)?;
        let angle = (span / 2.0 + 90.0).to_radians();
        let anchor = self.center.offset(
            angle.sin() * self.icon_radius,
            angle.cos() * self.icon_radius,
        );

        Ok(Sector {
            index,
            span,
            rotation: -(index as f64) * span,
            path: WedgePath {
                center: self.center,
                radius: self.radius,
                span,
            },
            anchor,
            anchor_rotation: index as f64 * span - self.rotation,
        })
    }

    /// Every sector for a menu of `total` items; empty when there are none.
    pub fn sectors(&self, total: usize) -> Vec<Sector> {
        (0..total)
            .filter_map(|i| self.sector(i, total).ok())
            .collect()
    }

    /// Where a sector's anchor ends up on the canvas once both the sector and
    /// canvas rotations are applied.
    pub fn placed_anchor(&self, sector: &Sector) -> Point {
        sector
            .anchor
            .rotate_about(self.center, sector.rotation)
            .rotate_about(self.center, self.rotation)
    }

    /// Sector under `point` (canvas coordinates), if any.
    pub fn sector_at(&self, point: Point, total: usize) -> Option<usize> {
        let span = pie_angle(total).ok()?;
        if !point.is_finite() || point.distance(self.center) > self.radius {
            return None;
        }

        let local = point.rotate_about(self.center, -self.rotation);
        let theta = (local.y - self.center.y)
            .atan2(local.x - self.center.x)
            .to_degrees();
        // sectors advance in the negative direction from angle 0
        let sweep = (-theta).rem_euclid(FULL_TURN);

        Some(((sweep / span) as usize).min(total - 1))
    }

    /// Center of button `index` in the fan layout.
    pub fn fan_button(&self, index: usize, total: usize) -> Result<Point, GeometryError> {
        fan_offset(index, total, FAN_RADIUS).map(|o| self.center.offset(o.x, o.y))
    }

    pub fn fan_button_at(&self, point: Point, total: usize) -> Option<usize> {
        (0..total).find(|&i| {
            self.fan_button(i, total)
                .is_ok_and(|c| c.distance(point) <= FAN_BUTTON_RADIUS)
        })
    }
}
