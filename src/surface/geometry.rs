//! Geometry and styling values exchanged with the host

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Top/left coordinates in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub top: f64,
    pub left: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { top: 0.0, left: 0.0 };

    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.top + rhs.top, self.left + rhs.left)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.top - rhs.top, self.left - rhs.left)
    }
}

/// Width/height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Transform property of a surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    #[default]
    None,
    TranslateX(f64),
    TranslateY(f64),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::None => Ok(()),
            Transform::TranslateX(px) => write!(f, "translateX({}px)", px),
            Transform::TranslateY(px) => write!(f, "translateY({}px)", px),
        }
    }
}

/// Animated transform transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub duration: Duration,
}

impl TransitionSpec {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform {}s ease", self.duration.as_secs_f64())
    }
}

/// Target of a property animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub position: Point,
    pub opacity: f64,
}

impl Keyframe {
    /// Fully visible at the viewport origin
    pub fn visible() -> Self {
        Self {
            position: Point::ORIGIN,
            opacity: 1.0,
        }
    }
}
