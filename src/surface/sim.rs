//! In-memory host for driving a carousel without a real document
//!
//! Every handle shares its state behind a mutex so the same element can be
//! handed to the carousel and inspected or poked from outside. Used by the
//! `reelswap` binary for dry runs and by the test suites.

use crate::carousel::{Carousel, CarouselBuilder, CarouselOptions, ObjectFit};
use crate::surface::{
    Container, Keyframe, MediaError, Notification, Playback, Point, ReadyState, Size, Slot, Styled,
    SurfaceEvent, TimeRanges, Transform, TransitionSpec, Viewport,
};
use crate::utils::error::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Default simulated clip length in seconds
pub const DEFAULT_CLIP_SECONDS: f64 = 5.0;

/// Animation armed on a surface and waiting for completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimAnimation {
    Transition(Transform, TransitionSpec),
    Animate(Keyframe, Duration),
}

/// Observable state of a simulated surface
#[derive(Debug, Clone)]
pub struct SimSurfaceState {
    pub src: Option<String>,
    pub poster: String,
    pub muted: bool,
    pub loads: u32,
    pub plays: u32,
    pub paused: bool,
    pub ended: bool,
    pub current_time: f64,
    pub duration: f64,
    pub clip_seconds: f64,
    pub ready_state: ReadyState,
    pub played: TimeRanges,
    pub error: Option<MediaError>,
    pub position: Point,
    pub opacity: f64,
    pub transform: Transform,
    pub transition: Option<TransitionSpec>,
    pub object_fit: ObjectFit,
    pub z_index: i32,
    pub width: f64,
    pub height: f64,
    pub animations_enabled: bool,
    pub reflows: u32,
    pub listening: HashSet<Notification>,
    pub armed: Option<SimAnimation>,
    /// Every animation ever started, in order
    pub started: Vec<SimAnimation>,
}

impl Default for SimSurfaceState {
    fn default() -> Self {
        Self {
            src: None,
            poster: String::new(),
            muted: false,
            loads: 0,
            plays: 0,
            paused: true,
            ended: false,
            current_time: 0.0,
            duration: f64::NAN,
            clip_seconds: DEFAULT_CLIP_SECONDS,
            ready_state: ReadyState::HaveNothing,
            played: TimeRanges::default(),
            error: None,
            position: Point::ORIGIN,
            opacity: 1.0,
            transform: Transform::None,
            transition: None,
            object_fit: ObjectFit::Fill,
            z_index: 0,
            width: 0.0,
            height: 0.0,
            animations_enabled: true,
            reflows: 0,
            listening: HashSet::new(),
            armed: None,
            started: Vec::new(),
        }
    }
}

/// Simulated playback surface
#[derive(Clone)]
pub struct SimSurface {
    slot: Slot,
    state: Arc<Mutex<SimSurfaceState>>,
    origin: Arc<Mutex<Point>>,
    events: Sender<SurfaceEvent>,
}

impl SimSurface {
    fn new(slot: Slot, origin: Arc<Mutex<Point>>, events: Sender<SurfaceEvent>) -> Self {
        Self {
            slot,
            state: Arc::new(Mutex::new(SimSurfaceState::default())),
            origin,
            events,
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SimSurfaceState {
        self.state.lock().clone()
    }

    /// Length reported for media loaded after this call
    pub fn set_clip_seconds(&self, seconds: f64) {
        self.state.lock().clip_seconds = seconds;
    }

    /// Play the current clip to its end, raising `Ended` when subscribed
    pub fn finish(&self) {
        let listening = {
            let mut state = self.state.lock();
            state.ended = true;
            state.paused = true;
            state.current_time = state.duration;
            let end = state.duration;
            if end.is_finite() {
                state.played.add(0.0, end);
            }
            state.listening.contains(&Notification::Ended)
        };
        if listening {
            let _ = self.events.send(SurfaceEvent::ended(self.slot));
        }
    }

    /// Complete the armed animation; returns false if none was armed
    pub fn complete_animation(&self) -> bool {
        let armed = {
            let mut state = self.state.lock();
            let armed = state.armed.take();
            if let Some(SimAnimation::Animate(target, _)) = armed {
                state.position = target.position;
                state.opacity = target.opacity;
            }
            armed
        };
        if armed.is_some() {
            let _ = self.events.send(SurfaceEvent::animation_end(self.slot));
        }
        armed.is_some()
    }

    /// Report a media failure
    pub fn fail(&self, error: MediaError) {
        self.state.lock().error = Some(error);
    }

    /// Advance the playback clock while playing
    pub fn advance_clock(&self, seconds: f64) {
        let mut state = self.state.lock();
        if state.paused || state.ended || !state.duration.is_finite() {
            return;
        }
        let from = state.current_time;
        let to = (from + seconds).min(state.duration);
        state.current_time = to;
        state.played.add(from, to);
    }
}

impl Playback for SimSurface {
    fn load(&mut self) {
        let mut state = self.state.lock();
        state.loads += 1;
        state.paused = true;
        state.ended = false;
        state.current_time = 0.0;
        state.played = TimeRanges::default();
        state.error = None;
        if state.src.is_some() {
            state.ready_state = ReadyState::HaveEnoughData;
            state.duration = state.clip_seconds;
        } else {
            state.ready_state = ReadyState::HaveNothing;
            state.duration = f64::NAN;
        }
    }

    fn play(&mut self) {
        let mut state = self.state.lock();
        if state.ended {
            state.ended = false;
            state.current_time = 0.0;
        }
        state.paused = false;
        state.plays += 1;
    }

    fn pause(&mut self) {
        self.state.lock().paused = true;
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn ready_state(&self) -> ReadyState {
        self.state.lock().ready_state
    }

    fn played(&self) -> TimeRanges {
        self.state.lock().played.clone()
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn paused(&self) -> bool {
        self.state.lock().paused
    }

    fn ended(&self) -> bool {
        self.state.lock().ended
    }

    fn error(&self) -> Option<MediaError> {
        self.state.lock().error
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.lock().muted = muted;
    }

    fn set_src(&mut self, src: &str) {
        self.state.lock().src = Some(src.to_string());
    }

    fn src(&self) -> Option<String> {
        self.state.lock().src.clone()
    }

    fn set_poster(&mut self, poster: &str) {
        self.state.lock().poster = poster.to_string();
    }

    fn subscribe(&mut self, notification: Notification) {
        self.state.lock().listening.insert(notification);
    }

    fn unsubscribe(&mut self, notification: Notification) {
        self.state.lock().listening.remove(&notification);
    }
}

impl Styled for SimSurface {
    fn set_position(&mut self, position: Point) {
        self.state.lock().position = position;
    }

    fn set_offset(&mut self, offset: Point) {
        let origin = *self.origin.lock();
        self.state.lock().position = offset - origin;
    }

    fn offset(&self) -> Point {
        let origin = *self.origin.lock();
        self.state.lock().position + origin
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.state.lock().opacity = opacity;
    }

    fn set_transform(&mut self, transform: Transform) {
        self.state.lock().transform = transform;
    }

    fn set_transition(&mut self, transition: Option<TransitionSpec>) {
        let mut state = self.state.lock();
        state.transition = transition;
        // without a transition there is nothing left to end
        if transition.is_none() && matches!(state.armed, Some(SimAnimation::Transition(..))) {
            state.armed = None;
        }
    }

    fn set_object_fit(&mut self, fit: ObjectFit) {
        self.state.lock().object_fit = fit;
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.state.lock().z_index = z_index;
    }

    fn set_width(&mut self, width: f64) {
        self.state.lock().width = width;
    }

    fn set_height(&mut self, height: f64) {
        self.state.lock().height = height;
    }

    fn set_animations_enabled(&mut self, enabled: bool) {
        self.state.lock().animations_enabled = enabled;
    }

    fn reflow(&mut self) -> f64 {
        let mut state = self.state.lock();
        state.reflows += 1;
        state.height
    }

    fn transition_to(&mut self, transform: Transform, spec: TransitionSpec) {
        let mut state = self.state.lock();
        state.transition = Some(spec);
        state.transform = transform;
        let animation = SimAnimation::Transition(transform, spec);
        state.started.push(animation);
        if state.animations_enabled {
            state.armed = Some(animation);
        }
    }

    fn animate_to(&mut self, target: Keyframe, duration: Duration) {
        let mut state = self.state.lock();
        let animation = SimAnimation::Animate(target, duration);
        state.started.push(animation);
        state.armed = Some(animation);
    }

    fn stop_animation(&mut self) {
        self.state.lock().armed = None;
    }
}

/// Observable state of a simulated container
#[derive(Debug, Clone)]
pub struct SimContainerState {
    pub selector: String,
    pub offset: Point,
    pub size: Size,
    pub viewports: u32,
}

/// Simulated container element
#[derive(Clone)]
pub struct SimContainer {
    state: Arc<Mutex<SimContainerState>>,
}

impl SimContainer {
    pub fn new(selector: &str, offset: Point, size: Size) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimContainerState {
                selector: selector.to_string(),
                offset,
                size,
                viewports: 0,
            })),
        }
    }

    pub fn snapshot(&self) -> SimContainerState {
        self.state.lock().clone()
    }

    /// Change the measured size, as a layout change would
    pub fn resize(&self, size: Size) {
        self.state.lock().size = size;
    }
}

impl Container for SimContainer {
    fn selector(&self) -> String {
        self.state.lock().selector.clone()
    }

    fn offset(&self) -> Point {
        self.state.lock().offset
    }

    fn size(&self) -> Size {
        self.state.lock().size
    }

    fn adopt_viewport(&mut self) {
        self.state.lock().viewports += 1;
    }

    fn release_viewport(&mut self) {
        let mut state = self.state.lock();
        state.viewports = state.viewports.saturating_sub(1);
    }
}

/// Observable state of a simulated viewport
#[derive(Debug, Clone, Default)]
pub struct SimViewportState {
    pub width: f64,
    pub height: f64,
    pub attached_to: Option<String>,
}

/// Simulated viewport; its origin is shared with both surfaces
#[derive(Clone)]
pub struct SimViewport {
    state: Arc<Mutex<SimViewportState>>,
    origin: Arc<Mutex<Point>>,
}

impl SimViewport {
    pub fn snapshot(&self) -> SimViewportState {
        self.state.lock().clone()
    }
}

impl Viewport for SimViewport {
    fn set_width(&mut self, width: f64) {
        self.state.lock().width = width;
    }

    fn set_height(&mut self, height: f64) {
        self.state.lock().height = height;
    }

    fn attach(&mut self, container: &dyn Container) {
        *self.origin.lock() = container.offset();
        self.state.lock().attached_to = Some(container.selector());
    }

    fn detach(&mut self) {
        self.state.lock().attached_to = None;
    }
}

/// A container, a viewport and two surfaces wired to one event channel
pub struct SimHost {
    pub container: SimContainer,
    pub viewport: SimViewport,
    surfaces: [SimSurface; 2],
    events: Receiver<SurfaceEvent>,
}

impl SimHost {
    pub fn new(selector: &str, offset: Point, size: Size) -> Self {
        let (tx, rx) = unbounded();
        let origin = Arc::new(Mutex::new(Point::ORIGIN));

        Self {
            container: SimContainer::new(selector, offset, size),
            viewport: SimViewport {
                state: Arc::new(Mutex::new(SimViewportState::default())),
                origin: Arc::clone(&origin),
            },
            surfaces: [
                SimSurface::new(Slot::Zero, Arc::clone(&origin), tx.clone()),
                SimSurface::new(Slot::One, origin, tx),
            ],
            events: rx,
        }
    }

    pub fn surface(&self, slot: Slot) -> &SimSurface {
        &self.surfaces[slot.index()]
    }

    /// Builder preloaded with this host's handles
    pub fn builder(&self, options: CarouselOptions) -> CarouselBuilder {
        CarouselBuilder::new(options)
            .container(Box::new(self.container.clone()))
            .viewport(Box::new(self.viewport.clone()))
            .surfaces(
                Box::new(self.surfaces[0].clone()),
                Box::new(self.surfaces[1].clone()),
            )
            .events(self.events.clone())
    }

    pub fn build(&self, options: CarouselOptions) -> Result<Carousel> {
        self.builder(options).build()
    }

    pub fn finish(&self, slot: Slot) {
        self.surface(slot).finish();
    }

    pub fn complete_animation(&self, slot: Slot) -> bool {
        self.surface(slot).complete_animation()
    }

    pub fn fail(&self, slot: Slot, error: MediaError) {
        self.surface(slot).fail(error);
    }

    pub fn resize_container(&self, size: Size) {
        self.container.resize(size);
    }

    /// Move the current container, keeping the viewport origin in step
    pub fn move_container(&self, offset: Point) {
        self.container.state.lock().offset = offset;
        *self.viewport.origin.lock() = offset;
    }

    /// Event channel sender, for injecting notifications directly
    pub fn sender(&self) -> Sender<SurfaceEvent> {
        self.surfaces[0].events.clone()
    }
}
