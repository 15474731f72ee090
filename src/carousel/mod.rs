//! Carousel controller module for reelswap
//!
//! This module owns the playlist, the active/standby slot flag and the
//! configuration, and runs the double-buffer swap protocol: while one
//! surface plays, the other is loaded with the next item and parked
//! where the next transition expects it.

mod controller;
pub mod options;
pub mod playlist;
pub mod positioning;

pub use controller::{Carousel, CarouselBuilder, CarouselStatus};
pub use options::{CarouselOptions, ObjectFit, TransitionMode};
pub use playlist::{CursorPolicy, Playlist};

use crate::surface::Slot;
use serde::{Deserialize, Serialize};

/// Whether finish notifications drive transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not subscribed to finish notifications
    Stopped,

    /// Each finished item triggers a transition step
    Running,
}

/// Carousel event for external observers
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    /// Playback started on the active slot
    Started { active: Slot },

    /// Subscriptions dropped and both surfaces paused
    Stopped,

    /// Active flag flipped and the entry animation began
    TransitionStarted { from: Slot, to: Slot },

    /// Entry finished, standby preloaded and parked
    TransitionCompleted { active: Slot, preloaded: Option<String> },

    /// Viewport moved to a new container
    Reparented { selector: String },

    /// Carousel torn down
    Destroyed,
}

/// Carousel event handler trait
pub trait CarouselEventHandler: Send {
    /// Handle carousel event
    ///
    /// # Arguments
    ///
    /// * `event` - Carousel event
    fn handle_event(&mut self, event: CarouselEvent);
}
