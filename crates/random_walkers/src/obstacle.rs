//! Per-walker rectangular obstacles.
//!
//! An [`Obstacle`] is an axis-aligned rectangle derived once from a walker's start
//! point by an [`ObstacleShape`]. Membership uses the open interior: points on an
//! edge or corner are outside.
//!
//! Bounds are `f64` so that every `i32` coordinate and every half-integer offset
//! from it is exact.
use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Horizontal offset of the lower-left corner relative to the start point.
pub const DEFAULT_OFFSET_X: f64 = -20.5;
/// Vertical offset of the lower-left corner relative to the start point.
pub const DEFAULT_OFFSET_Y: f64 = 0.5;
pub const DEFAULT_WIDTH: f64 = 40.0;
pub const DEFAULT_HEIGHT: f64 = 15.0;

/// Axis-aligned rectangle a walk must never enter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Obstacle {
    /// Returns true if `p` lies strictly inside the rectangle.
    #[inline]
    pub fn contains_strict(&self, p: IVec2) -> bool {
        let x = f64::from(p.x);
        let y = f64::from(p.y);
        x > self.xmin && x < self.xmax && y > self.ymin && y < self.ymax
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Corners in counter-clockwise order starting at (xmin, ymin).
    pub fn corners(&self) -> [mint::Point2<f64>; 4] {
        [
            mint::Point2 {
                x: self.xmin,
                y: self.ymin,
            },
            mint::Point2 {
                x: self.xmax,
                y: self.ymin,
            },
            mint::Point2 {
                x: self.xmax,
                y: self.ymax,
            },
            mint::Point2 {
                x: self.xmin,
                y: self.ymax,
            },
        ]
    }
}

/// Rule deriving an [`Obstacle`] from a start point.
///
/// The lower-left corner sits at `start + (offset_x, offset_y)` and the rectangle
/// spans `width` x `height`. A non-negative `offset_y` keeps the start point below
/// the open interior, so the first step always has somewhere to go.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleShape {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ObstacleShape {
    fn default() -> Self {
        Self {
            offset_x: DEFAULT_OFFSET_X,
            offset_y: DEFAULT_OFFSET_Y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ObstacleShape {
    pub fn new(offset_x: f64, offset_y: f64, width: f64, height: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
        }
    }

    /// Validates the shape, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let fields = [self.offset_x, self.offset_y, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidObstacleShape("values must be finite".into()).into());
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidObstacleShape(
                "width and height must be > 0".into(),
            )
            .into());
        }
        if self.offset_y < 0.0 {
            return Err(ConfigError::InvalidObstacleShape(
                "offset_y must be >= 0 so the start point stays outside".into(),
            )
            .into());
        }
        Ok(())
    }

    /// Derives the obstacle for a walk starting at `start`.
    pub fn derive(&self, start: IVec2) -> Obstacle {
        let xmin = f64::from(start.x) + self.offset_x;
        let ymin = f64::from(start.y) + self.offset_y;
        Obstacle {
            xmin,
            xmax: xmin + self.width,
            ymin,
            ymax: ymin + self.height,
        }
    }
}
