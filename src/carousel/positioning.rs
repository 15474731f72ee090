//! Standby placement and entry animation per transition mode
//!
//! Pure functions of the current configuration. The controller re-runs
//! [`park`] whenever mode, size or container offset change and after
//! every completed transition.

use crate::carousel::TransitionMode;
use crate::surface::{Keyframe, Point, Size, Styled, Transform};

/// Where the standby surface waits for the next transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Just outside the viewport, in document coordinates, fully opaque
    Offset(Point),
    /// Inside the viewport, made invisible
    Hidden { position: Point, opacity: f64 },
}

/// How the incoming surface becomes visible
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry {
    /// Transition the transform by one viewport width or height
    Slide(Transform),
    /// Animate opacity in place
    Fade(Keyframe),
    /// Show immediately
    Snap,
}

/// Parked placement for the standby surface
///
/// # Arguments
///
/// * `mode` - Transition mode of the next transition
/// * `viewport` - Measured document offset of the container
/// * `size` - Effective viewport size
pub fn park(mode: TransitionMode, viewport: Point, size: Size) -> Placement {
    match mode {
        TransitionMode::Right => Placement::Offset(Point::new(viewport.top, viewport.left + size.width)),
        TransitionMode::Left => Placement::Offset(Point::new(viewport.top, viewport.left - size.width)),
        TransitionMode::Top => Placement::Offset(Point::new(viewport.top - size.height, viewport.left)),
        TransitionMode::Bottom => Placement::Offset(Point::new(viewport.top + size.height, viewport.left)),
        TransitionMode::Fade | TransitionMode::None => Placement::Hidden {
            position: Point::ORIGIN,
            opacity: 0.0,
        },
    }
}

/// Transform that carries a parked surface onto the viewport
pub fn entry_transform(mode: TransitionMode, size: Size) -> Transform {
    match mode {
        TransitionMode::Right => Transform::TranslateX(-size.width),
        TransitionMode::Left => Transform::TranslateX(size.width),
        TransitionMode::Top => Transform::TranslateY(size.height),
        TransitionMode::Bottom => Transform::TranslateY(-size.height),
        TransitionMode::Fade | TransitionMode::None => Transform::None,
    }
}

/// Entry animation for the newly active surface
pub fn entry(mode: TransitionMode, size: Size) -> Entry {
    match mode {
        TransitionMode::Fade => Entry::Fade(Keyframe::visible()),
        mode if mode.is_directional() => Entry::Slide(entry_transform(mode, size)),
        _ => Entry::Snap,
    }
}

/// Push a placement onto a surface
pub fn apply<S: Styled + ?Sized>(surface: &mut S, placement: Placement) {
    match placement {
        Placement::Offset(offset) => {
            surface.set_offset(offset);
            surface.set_opacity(1.0);
        }
        Placement::Hidden { position, opacity } => {
            surface.set_position(position);
            surface.set_opacity(opacity);
        }
    }
}

/// Put a surface in its visible resting state
pub fn rest<S: Styled + ?Sized>(surface: &mut S) {
    surface.set_position(Point::ORIGIN);
    surface.set_opacity(1.0);
    surface.set_transition(None);
    surface.set_transform(Transform::None);
}
