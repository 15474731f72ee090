//! Carousel controller implementation for reelswap
//!
//! The controller addresses its two surfaces only by [`Slot`]; the active
//! flag is the single piece of state deciding which one is visible. It is
//! flipped exactly once per transition step, and the post-animation work
//! (rest state, play, preload, park) runs only from the one-shot
//! completion notification of the surface that was animated.

use crate::carousel::positioning::{self, Entry};
use crate::carousel::{
    CarouselEvent, CarouselEventHandler, CarouselOptions, CursorPolicy, ObjectFit, Playlist, RunState,
    TransitionMode,
};
use crate::surface::{
    Container, MediaError, Notification, ReadyState, Size, Slot, Surface, SurfaceEvent, TimeRanges, Transform,
    TransitionSpec, Viewport,
};
use crate::utils::error::{ReelError, Result};

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;

/// Z-index of the surface being brought into view
const Z_INCOMING: i32 = 10;

/// Z-index of the surface being covered
const Z_OUTGOING: i32 = 9;

/// Carousel builder wiring the host handles together
pub struct CarouselBuilder {
    options: CarouselOptions,
    container: Option<Box<dyn Container>>,
    viewport: Option<Box<dyn Viewport>>,
    surfaces: Option<[Box<dyn Surface>; 2]>,
    events: Option<Receiver<SurfaceEvent>>,
    event_handlers: Vec<Box<dyn CarouselEventHandler>>,
}

impl CarouselBuilder {
    /// Create a new builder with the given options
    pub fn new(options: CarouselOptions) -> Self {
        Self {
            options,
            container: None,
            viewport: None,
            surfaces: None,
            events: None,
            event_handlers: Vec::new(),
        }
    }

    /// Container the viewport is attached to
    pub fn container(mut self, container: Box<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn viewport(mut self, viewport: Box<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Surfaces bound to slot 0 and slot 1
    pub fn surfaces(mut self, zero: Box<dyn Surface>, one: Box<dyn Surface>) -> Self {
        self.surfaces = Some([zero, one]);
        self
    }

    /// Channel the surfaces raise their notifications on
    pub fn events(mut self, events: Receiver<SurfaceEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Add an event handler
    pub fn with_event_handler(mut self, handler: Box<dyn CarouselEventHandler>) -> Self {
        self.event_handlers.push(handler);
        self
    }

    /// Build the carousel, mounting the viewport and loading both surfaces
    pub fn build(self) -> Result<Carousel> {
        let container = self.container.ok_or(ReelError::MissingComponent("container"))?;
        let viewport = self.viewport.ok_or(ReelError::MissingComponent("viewport"))?;
        let surfaces = self.surfaces.ok_or(ReelError::MissingComponent("surfaces"))?;
        let events = self.events.ok_or(ReelError::MissingComponent("event channel"))?;

        for (name, value) in [("width", self.options.width), ("height", self.options.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ReelError::InvalidInput(format!("{} must be a non-negative number, got {}", name, value)));
            }
        }

        let mut options = self.options;
        let children = std::mem::take(&mut options.children);

        let mut carousel = Carousel {
            playlist: Playlist::new(children, options.cursor_policy),
            config: options,
            container,
            viewport,
            surfaces,
            events,
            active: Slot::Zero,
            state: RunState::Stopped,
            pending: None,
            event_handlers: self.event_handlers,
        };
        carousel.mount();

        Ok(carousel)
    }
}

/// Point-in-time view of the carousel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselStatus {
    pub selector: String,
    pub state: RunState,
    pub active: Slot,
    pub transitioning: bool,
    pub cursor: usize,
    pub cursor_policy: CursorPolicy,
    pub length: usize,
    pub mode: TransitionMode,
    pub speed_ms: u64,
    pub width: f64,
    pub height: f64,
    pub active_src: Option<String>,
    pub standby_src: Option<String>,
}

/// Two-surface rotating presenter
pub struct Carousel {
    /// Current configuration; `children` lives in `playlist`
    config: CarouselOptions,
    playlist: Playlist,

    container: Box<dyn Container>,
    viewport: Box<dyn Viewport>,
    surfaces: [Box<dyn Surface>; 2],
    events: Receiver<SurfaceEvent>,

    active: Slot,
    state: RunState,

    /// Slot whose entry animation has not reported completion yet
    pending: Option<Slot>,

    event_handlers: Vec<Box<dyn CarouselEventHandler>>,
}

impl Carousel {
    fn mount(&mut self) {
        info!(
            "Mounting carousel in '{}' with {} item(s), mode {}",
            self.container.selector(),
            self.playlist.len(),
            self.config.mode
        );

        self.container.adopt_viewport();
        self.viewport.attach(self.container.as_ref());
        self.apply_viewport_size();

        let size = self.size();
        let fit = self.config.fit;
        let muted = self.config.muted;
        let poster = self.config.poster.clone();

        for slot in Slot::BOTH {
            let src = self.playlist.current();
            let surface = self.surface_mut(slot);
            positioning::rest(surface);
            surface.set_width(size.width);
            surface.set_height(size.height);
            surface.set_object_fit(fit);
            surface.set_z_index(Z_INCOMING - slot.index() as i32);
            surface.set_poster(&poster);
            surface.set_muted(muted);
            if let Some(src) = src {
                surface.set_src(&src);
            }
            surface.load();
        }

        self.park_standby();
    }

    fn surface(&self, slot: Slot) -> &dyn Surface {
        self.surfaces[slot.index()].as_ref()
    }

    fn surface_mut(&mut self, slot: Slot) -> &mut dyn Surface {
        self.surfaces[slot.index()].as_mut()
    }

    fn emit(&mut self, event: CarouselEvent) {
        for handler in self.event_handlers.iter_mut() {
            handler.handle_event(event.clone());
        }
    }

    /// Add an event handler
    pub fn add_event_handler(&mut self, handler: Box<dyn CarouselEventHandler>) {
        self.event_handlers.push(handler);
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Begin playback on the active slot and follow finish notifications.
    ///
    /// Does nothing on an empty playlist or when already running.
    pub fn start(&mut self) {
        if self.playlist.is_empty() {
            debug!("Playlist is empty, not starting");
            return;
        }
        if self.state == RunState::Running {
            return;
        }

        let active = self.active;
        info!("Starting carousel on slot {}", active);

        // items added after an empty mount have not been loaded anywhere yet
        if self.surface(active).src().is_none() {
            if let Some(src) = self.playlist.current() {
                debug!("Loading {} into slot {} before first play", src, active);
                let surface = self.surface_mut(active);
                surface.set_src(&src);
                surface.load();
            }
            self.preload_standby();
        }

        self.state = RunState::Running;
        self.surface_mut(active).play();
        for slot in Slot::BOTH {
            self.surface_mut(slot).subscribe(Notification::Ended);
        }

        self.emit(CarouselEvent::Started { active });
    }

    /// Drop finish subscriptions, neutralise any running transition and pause both slots
    pub fn stop(&mut self) {
        if self.state == RunState::Stopped && self.pending.is_none() {
            debug!("Carousel already stopped");
            return;
        }
        info!("Stopping carousel");

        self.halt();
        for slot in Slot::BOTH {
            self.surface_mut(slot).pause();
        }

        self.emit(CarouselEvent::Stopped);
    }

    /// Drop finish subscriptions and put both slots at rest.
    ///
    /// The active slot is snapped into view; the standby slot goes back to
    /// its parked placement.
    pub fn destroy(&mut self) {
        info!("Destroying carousel");

        self.halt();

        self.emit(CarouselEvent::Destroyed);
    }

    fn halt(&mut self) {
        self.state = RunState::Stopped;
        for slot in Slot::BOTH {
            self.surface_mut(slot).unsubscribe(Notification::Ended);
        }

        let interrupted = self.pending.take();
        for slot in Slot::BOTH {
            self.kill_transition(slot);
        }

        // the completion will never arrive, so do its bookkeeping here
        if let Some(slot) = interrupted {
            warn!("Transition into slot {} interrupted", slot);
            self.preload_standby();
        }
    }

    fn kill_transition(&mut self, slot: Slot) {
        let is_active = slot == self.active;

        let surface = self.surface_mut(slot);
        surface.stop_animation();
        surface.set_animations_enabled(false);
        surface.set_transition(None);
        surface.set_transform(Transform::None);
        surface.reflow();
        surface.set_animations_enabled(true);

        if is_active {
            positioning::rest(surface);
        } else {
            self.park_standby();
        }
    }

    // ---------------------------------------------------------------
    // Transition protocol
    // ---------------------------------------------------------------

    /// Resume the active slot, or run a transition step if it has finished.
    ///
    /// While the active media has not ended this only calls play on it, so
    /// an external call during playback never swaps slots.
    pub fn play(&mut self) {
        if let Some(slot) = self.pending {
            warn!("Transition into slot {} still running, ignoring play", slot);
            return;
        }

        let active = self.active;
        if !self.surface(active).ended() {
            self.surface_mut(active).play();
            return;
        }

        self.transition();
    }

    /// Run a transition step regardless of the active slot's playback state
    pub fn advance(&mut self) {
        if let Some(slot) = self.pending {
            warn!("Transition into slot {} still running, ignoring advance", slot);
            return;
        }

        self.transition();
    }

    fn transition(&mut self) {
        if self.playlist.is_empty() {
            debug!("Playlist is empty, no transition");
            return;
        }

        let from = self.active;
        let to = from.other();

        self.surface_mut(from).set_z_index(Z_OUTGOING);
        self.active = to;

        debug!("Transition {} -> {} ({})", from, to, self.config.mode);
        self.emit(CarouselEvent::TransitionStarted { from, to });

        let speed = self.speed();
        let entry = if speed.is_zero() {
            Entry::Snap
        } else {
            positioning::entry(self.config.mode, self.size())
        };

        let surface = self.surface_mut(to);
        surface.set_z_index(Z_INCOMING);
        match entry {
            Entry::Slide(transform) => {
                surface.transition_to(transform, TransitionSpec::new(speed));
                self.pending = Some(to);
            }
            Entry::Fade(target) => {
                surface.animate_to(target, speed);
                self.pending = Some(to);
            }
            Entry::Snap => self.complete_transition(),
        }
    }

    fn complete_transition(&mut self) {
        let active = self.active;

        let surface = self.surface_mut(active);
        positioning::rest(surface);
        surface.play();

        let preloaded = self.preload_standby();
        debug!("Slot {} active, slot {} preloaded with {:?}", active, active.other(), preloaded);

        self.emit(CarouselEvent::TransitionCompleted { active, preloaded });
    }

    fn preload_standby(&mut self) -> Option<String> {
        let standby = self.active.other();
        let next = self.playlist.current();

        if let Some(src) = next.as_deref() {
            let surface = self.surface_mut(standby);
            surface.set_src(src);
            surface.load();
        }
        self.park_standby();

        next
    }

    fn park_standby(&mut self) {
        if let Some(slot) = self.pending {
            debug!("Transition into slot {} pending, parking deferred", slot);
            return;
        }

        let placement = positioning::park(self.config.mode, self.container.offset(), self.size());
        let standby = self.active.other();
        debug!("Parking slot {} at {:?}", standby, placement);

        positioning::apply(self.surface_mut(standby), placement);
    }

    // ---------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------

    /// Handle one surface notification
    pub fn dispatch(&mut self, event: SurfaceEvent) {
        match event.notification {
            Notification::Ended => {
                if self.state != RunState::Running {
                    debug!("Slot {} ended while stopped, ignoring", event.slot);
                    return;
                }
                self.play();
            }
            Notification::AnimationEnd => {
                if self.pending == Some(event.slot) {
                    self.pending = None;
                    self.complete_transition();
                } else {
                    warn!("Stale animation end from slot {}", event.slot);
                }
            }
        }
    }

    /// Handle every queued notification; returns how many were handled
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    // ---------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------

    pub fn selector(&self) -> String {
        self.container.selector()
    }

    /// Move the viewport into another container.
    ///
    /// A running carousel is stopped first and restarted afterwards so no
    /// subscription outlives the move.
    pub fn set_container(&mut self, container: Box<dyn Container>) {
        let was_running = self.state == RunState::Running;
        if was_running {
            self.stop();
        }

        self.container.release_viewport();
        self.viewport.detach();
        self.container = container;
        self.container.adopt_viewport();
        self.viewport.attach(self.container.as_ref());

        let selector = self.container.selector();
        info!("Viewport moved to '{}'", selector);
        self.config.selector = selector.clone();

        if self.config.width == 0.0 && self.config.height == 0.0 {
            self.apply_viewport_size();
        }
        self.park_standby();

        self.emit(CarouselEvent::Reparented { selector });

        if was_running {
            self.start();
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.config.mode
    }

    /// Change the mode; takes effect from the next transition
    pub fn set_mode(&mut self, mode: TransitionMode) {
        self.config.mode = mode;
        self.park_standby();
    }

    /// Transition duration
    pub fn speed(&self) -> Duration {
        self.config.speed_duration()
    }

    pub fn set_speed(&mut self, speed: Duration) {
        self.config.speed = u64::try_from(speed.as_millis()).unwrap_or(u64::MAX);
    }

    pub fn fit(&self) -> ObjectFit {
        self.config.fit
    }

    pub fn set_fit(&mut self, fit: ObjectFit) {
        self.config.fit = fit;
        for slot in Slot::BOTH {
            self.surface_mut(slot).set_object_fit(fit);
        }
    }

    pub fn muted(&self) -> bool {
        self.config.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.config.muted = muted;
        for slot in Slot::BOTH {
            self.surface_mut(slot).set_muted(muted);
        }
    }

    pub fn poster(&self) -> &str {
        &self.config.poster
    }

    pub fn set_poster(&mut self, poster: impl Into<String>) {
        self.config.poster = poster.into();
        let poster = self.config.poster.clone();
        for slot in Slot::BOTH {
            self.surface_mut(slot).set_poster(&poster);
        }
    }

    /// Effective width: the fixed value, or the container's measured width when 0
    pub fn width(&self) -> f64 {
        if self.config.width == 0.0 {
            self.container.size().width
        } else {
            self.config.width
        }
    }

    /// Effective height: the fixed value, or the container's measured height when 0
    pub fn height(&self) -> f64 {
        if self.config.height == 0.0 {
            self.container.size().height
        } else {
            self.config.height
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Fix the width (0 follows the container) and restyle immediately
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            warn!("Ignoring invalid width {}", width);
            return;
        }
        self.config.width = width;

        let width = self.width();
        self.viewport.set_width(width);
        for slot in Slot::BOTH {
            self.surface_mut(slot).set_width(width);
        }
        self.park_standby();
    }

    /// Fix the height (0 follows the container) and restyle immediately
    pub fn set_height(&mut self, height: f64) {
        if !height.is_finite() || height < 0.0 {
            warn!("Ignoring invalid height {}", height);
            return;
        }
        self.config.height = height;

        let height = self.height();
        self.viewport.set_height(height);
        for slot in Slot::BOTH {
            self.surface_mut(slot).set_height(height);
        }
        self.park_standby();
    }

    /// Re-measure the container after a host layout change
    pub fn relayout(&mut self) {
        let size = self.size();
        debug!("Relayout to {}x{}", size.width, size.height);

        self.apply_viewport_size();
        for slot in Slot::BOTH {
            let surface = self.surface_mut(slot);
            surface.set_width(size.width);
            surface.set_height(size.height);
        }
        self.park_standby();
    }

    fn apply_viewport_size(&mut self) {
        let size = self.size();
        self.viewport.set_width(size.width);
        self.viewport.set_height(size.height);
    }

    // ---------------------------------------------------------------
    // Playlist
    // ---------------------------------------------------------------

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.playlist.get(index)
    }

    pub fn set(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        self.playlist.set(index, item)
    }

    pub fn add(&mut self, item: impl Into<String>) {
        self.playlist.add(item);
    }

    pub fn insert(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        self.playlist.insert(index, item)
    }

    pub fn delete(&mut self, index: usize) -> Result<String> {
        self.playlist.delete(index)
    }

    /// Yield the item at the cursor and advance it; see [`Playlist::current`]
    pub fn current(&mut self) -> Option<String> {
        self.playlist.current()
    }

    pub fn set_cursor_policy(&mut self, policy: CursorPolicy) {
        self.config.cursor_policy = policy;
        self.playlist.set_policy(policy);
    }

    // ---------------------------------------------------------------
    // Media state, defaulting to the active slot
    // ---------------------------------------------------------------

    fn target(&self, slot: Option<Slot>) -> &dyn Surface {
        self.surface(slot.unwrap_or(self.active))
    }

    /// Total play time in seconds
    pub fn duration(&self, slot: Option<Slot>) -> f64 {
        self.target(slot).duration()
    }

    pub fn ready_state(&self, slot: Option<Slot>) -> ReadyState {
        self.target(slot).ready_state()
    }

    pub fn played(&self, slot: Option<Slot>) -> TimeRanges {
        self.target(slot).played()
    }

    /// Current position in seconds
    pub fn current_time(&self, slot: Option<Slot>) -> f64 {
        self.target(slot).current_time()
    }

    pub fn paused(&self, slot: Option<Slot>) -> bool {
        self.target(slot).paused()
    }

    pub fn ended(&self, slot: Option<Slot>) -> bool {
        self.target(slot).ended()
    }

    pub fn error(&self, slot: Option<Slot>) -> Option<MediaError> {
        self.target(slot).error()
    }

    pub fn src(&self, slot: Option<Slot>) -> Option<String> {
        self.target(slot).src()
    }

    // ---------------------------------------------------------------
    // State
    // ---------------------------------------------------------------

    pub fn active(&self) -> Slot {
        self.active
    }

    pub fn standby(&self) -> Slot {
        self.active.other()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Whether an entry animation is waiting for its completion
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn status(&self) -> CarouselStatus {
        CarouselStatus {
            selector: self.selector(),
            state: self.state,
            active: self.active,
            transitioning: self.is_transitioning(),
            cursor: self.playlist.cursor(),
            cursor_policy: self.playlist.policy(),
            length: self.playlist.len(),
            mode: self.config.mode,
            speed_ms: self.config.speed,
            width: self.width(),
            height: self.height(),
            active_src: self.surface(self.active).src(),
            standby_src: self.surface(self.active.other()).src(),
        }
    }
}
