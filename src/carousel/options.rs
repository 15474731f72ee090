//! Construction options for the carousel
//!
//! These mirror the recognised construction keys: selector, mode, speed,
//! fit, muted, poster, width, height and children.

use crate::carousel::playlist::CursorPolicy;
use crate::utils::error::{ReelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the incoming surface is brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Incoming surface slides in from the right edge
    Right,
    /// Incoming surface slides in from the left edge
    Left,
    /// Incoming surface slides in from above
    Top,
    /// Incoming surface slides in from below
    Bottom,
    /// Incoming surface fades in over the outgoing one
    Fade,
    /// Incoming surface snaps into view without animation
    None,
}

impl TransitionMode {
    /// Whether this mode moves the surface with a translation
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            TransitionMode::Right | TransitionMode::Left | TransitionMode::Top | TransitionMode::Bottom
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionMode::Right => "right",
            TransitionMode::Left => "left",
            TransitionMode::Top => "top",
            TransitionMode::Bottom => "bottom",
            TransitionMode::Fade => "fade",
            TransitionMode::None => "none",
        }
    }
}

impl Default for TransitionMode {
    fn default() -> Self {
        TransitionMode::Right
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionMode {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(TransitionMode::Right),
            "left" => Ok(TransitionMode::Left),
            "top" => Ok(TransitionMode::Top),
            "bottom" => Ok(TransitionMode::Bottom),
            "fade" => Ok(TransitionMode::Fade),
            "none" => Ok(TransitionMode::None),
            other => Err(ReelError::InvalidInput(format!("unknown transition mode '{}'", other))),
        }
    }
}

/// Object-fit policy applied to both surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    Fill,
    Contain,
    Cover,
    None,
    ScaleDown,
}

impl ObjectFit {
    /// CSS keyword for this policy
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectFit::Fill => "fill",
            ObjectFit::Contain => "contain",
            ObjectFit::Cover => "cover",
            ObjectFit::None => "none",
            ObjectFit::ScaleDown => "scale-down",
        }
    }
}

impl Default for ObjectFit {
    fn default() -> Self {
        ObjectFit::Cover
    }
}

impl fmt::Display for ObjectFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ObjectFit {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(ObjectFit::Fill),
            "contain" => Ok(ObjectFit::Contain),
            "cover" => Ok(ObjectFit::Cover),
            "none" => Ok(ObjectFit::None),
            "scale-down" => Ok(ObjectFit::ScaleDown),
            other => Err(ReelError::InvalidInput(format!("unknown object-fit '{}'", other))),
        }
    }
}

/// Options recognised at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselOptions {
    /// Selector of the container the viewport is attached to
    pub selector: String,

    /// Transition mode
    pub mode: TransitionMode,

    /// Transition duration in milliseconds
    pub speed: u64,

    /// Object-fit policy for both surfaces
    pub fit: ObjectFit,

    /// Mute both surfaces
    pub muted: bool,

    /// Poster image shown before a surface has a frame
    pub poster: String,

    /// Fixed viewport width, 0 to follow the container
    pub width: f64,

    /// Fixed viewport height, 0 to follow the container
    pub height: f64,

    /// Initial playlist
    pub children: Vec<String>,

    /// Cursor adjustment on playlist edits
    pub cursor_policy: CursorPolicy,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            selector: String::new(),
            mode: TransitionMode::Right,
            speed: 1000,
            fit: ObjectFit::Cover,
            muted: false,
            poster: String::new(),
            width: 0.0,
            height: 0.0,
            children: Vec::new(),
            cursor_policy: CursorPolicy::Preserve,
        }
    }
}

impl CarouselOptions {
    /// Transition duration
    pub fn speed_duration(&self) -> Duration {
        Duration::from_millis(self.speed)
    }
}
