//! reelswap - a two-surface rotating media presenter
//!
//! A [`Carousel`] owns a playlist and two playback surfaces. One surface is
//! visible and playing while the other is preloaded with the next item and
//! parked out of view; when the visible item finishes, the parked surface is
//! animated in and the roles swap.
//!
//! The host (document, decoder, layout engine) is abstracted behind the
//! traits in [`surface`]; [`surface::sim`] provides an in-memory host.

pub mod carousel;
pub mod surface;
pub mod utils;

pub use carousel::{
    Carousel, CarouselBuilder, CarouselEvent, CarouselEventHandler, CarouselOptions, CarouselStatus, CursorPolicy,
    ObjectFit, Playlist, RunState, TransitionMode,
};
pub use surface::{Container, Notification, Slot, Surface, SurfaceEvent, Viewport};
pub use utils::{Config, ReelError, Result};
