//! Host contracts consumed by the carousel
//!
//! The carousel never touches a document, a decoder or a layout engine
//! directly. It is handed one [`Container`], one [`Viewport`] and two
//! [`Surface`]s, and receives their notifications as [`SurfaceEvent`]s
//! over a channel. Normalising vendor-specific end events into a single
//! notification is the host's job.

pub mod geometry;
pub mod media;
pub mod sim;

pub use geometry::{Keyframe, Point, Size, Transform, TransitionSpec};
pub use media::{MediaError, ReadyState, TimeRanges};

use crate::carousel::ObjectFit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One of the two playback surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Zero,
    One,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::Zero, Slot::One];

    pub fn index(self) -> usize {
        match self {
            Slot::Zero => 0,
            Slot::One => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Slot> {
        match index {
            0 => Some(Slot::Zero),
            1 => Some(Slot::One),
            _ => None,
        }
    }

    /// The opposite slot
    pub fn other(self) -> Slot {
        match self {
            Slot::Zero => Slot::One,
            Slot::One => Slot::Zero,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Notifications a surface can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Media playback reached its end
    Ended,
    /// A transition or animation armed on the surface completed
    AnimationEnd,
}

/// Notification raised by the surface in `slot`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub slot: Slot,
    pub notification: Notification,
}

impl SurfaceEvent {
    pub fn ended(slot: Slot) -> Self {
        Self {
            slot,
            notification: Notification::Ended,
        }
    }

    pub fn animation_end(slot: Slot) -> Self {
        Self {
            slot,
            notification: Notification::AnimationEnd,
        }
    }
}

/// Playback primitive of a surface
pub trait Playback: Send {
    /// Start fetching the current source
    fn load(&mut self);

    /// Start or resume playback
    fn play(&mut self);

    fn pause(&mut self);

    /// Total play time in seconds
    fn duration(&self) -> f64;

    fn ready_state(&self) -> ReadyState;

    fn played(&self) -> TimeRanges;

    /// Current position in seconds
    fn current_time(&self) -> f64;

    fn paused(&self) -> bool;

    fn ended(&self) -> bool;

    fn error(&self) -> Option<MediaError>;

    fn set_muted(&mut self, muted: bool);

    fn set_src(&mut self, src: &str);

    fn src(&self) -> Option<String>;

    fn set_poster(&mut self, poster: &str);

    /// Start delivering `notification` to the carousel's channel
    fn subscribe(&mut self, notification: Notification);

    /// Stop delivering `notification`
    fn unsubscribe(&mut self, notification: Notification);
}

/// Styling and geometry primitive of a surface
pub trait Styled: Send {
    /// Set top/left relative to the viewport
    fn set_position(&mut self, position: Point);

    /// Move the element so its document offset equals `offset`
    fn set_offset(&mut self, offset: Point);

    /// Measured document offset
    fn offset(&self) -> Point;

    fn set_opacity(&mut self, opacity: f64);

    fn set_transform(&mut self, transform: Transform);

    /// Set or clear the transform transition
    fn set_transition(&mut self, transition: Option<TransitionSpec>);

    fn set_object_fit(&mut self, fit: ObjectFit);

    fn set_z_index(&mut self, z_index: i32);

    fn set_width(&mut self, width: f64);

    fn set_height(&mut self, height: f64);

    /// Toggle the host's "no transition" override
    fn set_animations_enabled(&mut self, enabled: bool);

    /// Force a layout read so pending style changes take effect immediately
    fn reflow(&mut self) -> f64;

    /// Apply `transform` through `spec`, then raise [`Notification::AnimationEnd`] once
    ///
    /// # Arguments
    ///
    /// * `transform` - Transform to transition towards
    /// * `spec` - Transition timing
    fn transition_to(&mut self, transform: Transform, spec: TransitionSpec);

    /// Animate position and opacity to `target`, then raise [`Notification::AnimationEnd`] once
    ///
    /// # Arguments
    ///
    /// * `target` - Final position and opacity
    /// * `duration` - Animation length
    fn animate_to(&mut self, target: Keyframe, duration: Duration);

    /// Cancel an in-flight animation without raising its notification
    fn stop_animation(&mut self);
}

/// A playback surface: media primitive plus styling handle
pub trait Surface: Playback + Styled {}

impl<T: Playback + Styled> Surface for T {}

/// The element both surfaces live in
pub trait Viewport: Send {
    fn set_width(&mut self, width: f64);

    fn set_height(&mut self, height: f64);

    /// Attach to `container`
    fn attach(&mut self, container: &dyn Container);

    /// Detach from the current container
    fn detach(&mut self);
}

/// The host element the viewport is placed in
pub trait Container: Send {
    fn selector(&self) -> String;

    /// Measured document offset
    fn offset(&self) -> Point;

    /// Measured size, read at call time
    fn size(&self) -> Size;

    fn adopt_viewport(&mut self);

    fn release_viewport(&mut self);
}
