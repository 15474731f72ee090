//! Integration test utilities for reelswap
//!
//! This module provides common utilities for integration testing including:
//! - A simulated stage wrapping a carousel and its host
//! - Config file fixtures
//! - Timing helpers

use anyhow::Result;
use reelswap::carousel::{Carousel, CarouselEvent, CarouselEventHandler, CarouselOptions, TransitionMode};
use reelswap::surface::sim::SimHost;
use reelswap::surface::{Point, Size, Slot};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Document offset of the default stage container
pub const STAGE_ORIGIN: Point = Point { top: 100.0, left: 200.0 };

/// Measured size of the default stage container
pub const STAGE_SIZE: Size = Size {
    width: 1024.0,
    height: 576.0,
};

/// Build `n` item names `clip-0.mp4 .. clip-{n-1}.mp4`
pub fn items(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("clip-{}.mp4", i)).collect()
}

/// Carousel options with a fixed 800x450 viewport
pub fn options(mode: TransitionMode, children: Vec<String>) -> CarouselOptions {
    CarouselOptions {
        selector: "#stage".to_string(),
        mode,
        width: 800.0,
        height: 450.0,
        children,
        ..CarouselOptions::default()
    }
}

/// Event handler that records everything it sees
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<CarouselEvent>>>);

impl EventLog {
    pub fn events(&self) -> Vec<CarouselEvent> {
        self.0.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl CarouselEventHandler for EventLog {
    fn handle_event(&mut self, event: CarouselEvent) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }
}

/// A carousel mounted on a simulated host
pub struct Stage {
    pub host: SimHost,
    pub carousel: Carousel,
    pub log: EventLog,
}

impl Stage {
    /// Mount a carousel on a fresh host at [`STAGE_ORIGIN`]
    pub fn new(options: CarouselOptions) -> Result<Self> {
        let host = SimHost::new("#stage", STAGE_ORIGIN, STAGE_SIZE);
        let log = EventLog::default();
        let carousel = host.builder(options).with_event_handler(Box::new(log.clone())).build()?;

        Ok(Self { host, carousel, log })
    }

    /// Finish the active item and complete the resulting entry animation
    pub fn cycle(&mut self) {
        let finished = self.carousel.active();
        self.host.finish(finished);
        self.carousel.pump();
        if self.carousel.is_transitioning() {
            self.host.complete_animation(self.carousel.active());
            self.carousel.pump();
        }
    }

    /// Source currently loaded in `slot`
    pub fn src(&self, slot: Slot) -> Option<String> {
        self.host.surface(slot).snapshot().src
    }

    /// Measured document offset of `slot`
    pub fn offset(&self, slot: Slot) -> Point {
        use reelswap::surface::Styled;
        self.host.surface(slot).offset()
    }
}

/// Test fixture holding config files in a temporary directory
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `contents` to `name` inside the fixture directory
    pub fn write_config(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Performance measurement utilities
pub mod perf_test {
    use std::time::{Duration, Instant};

    pub struct PerfMeasure {
        name: String,
        start: Instant,
        measurements: Vec<Duration>,
    }

    impl PerfMeasure {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                start: Instant::now(),
                measurements: Vec::new(),
            }
        }

        pub fn start(&mut self) {
            self.start = Instant::now();
        }

        pub fn stop(&mut self) {
            self.measurements.push(self.start.elapsed());
        }

        pub fn samples(&self) -> usize {
            self.measurements.len()
        }

        pub fn average(&self) -> Duration {
            if self.measurements.is_empty() {
                return Duration::ZERO;
            }

            let sum: Duration = self.measurements.iter().sum();
            sum / self.measurements.len() as u32
        }

        pub fn max(&self) -> Option<Duration> {
            self.measurements.iter().max().copied()
        }

        pub fn report(&self) {
            println!("Performance Report: {}", self.name);
            println!("  Samples: {}", self.measurements.len());
            println!("  Average: {:?}", self.average());
            println!("  Max: {:?}", self.max().unwrap_or(Duration::ZERO));
        }
    }
}
