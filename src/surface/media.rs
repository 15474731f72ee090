//! Media-state values reported by a playback primitive
//!
//! These are passed through the carousel unmodified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much media data a surface has available
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadyState {
    /// No information about the media
    HaveNothing = 0,
    /// Metadata such as duration is available
    HaveMetadata = 1,
    /// Data for the current position only
    HaveCurrentData = 2,
    /// Data for the current and at least the next frame
    HaveFutureData = 3,
    /// Enough data to play through
    HaveEnoughData = 4,
}

impl ReadyState {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Default for ReadyState {
    fn default() -> Self {
        ReadyState::HaveNothing
    }
}

/// Media failure reported by the playback primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaError {
    /// Fetching was aborted by the user
    Aborted = 1,
    /// A network error interrupted download
    Network = 2,
    /// Decoding failed
    Decode = 3,
    /// Source format not supported
    SrcNotSupported = 4,
}

impl MediaError {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MediaError::Aborted => "fetching aborted",
            MediaError::Network => "network error",
            MediaError::Decode => "decode error",
            MediaError::SrcNotSupported => "source not supported",
        };
        write!(f, "{} (code {})", text, self.code())
    }
}

/// Played time ranges in seconds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    pub fn new(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|r| r.0)
    }

    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|r| r.1)
    }

    /// Record playback over `[start, end]`, merging with an overlapping range
    pub fn add(&mut self, start: f64, end: f64) {
        for range in &mut self.ranges {
            if start <= range.1 && end >= range.0 {
                range.0 = range.0.min(start);
                range.1 = range.1.max(end);
                return;
            }
        }
        self.ranges.push((start, end));
        self.ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
}
