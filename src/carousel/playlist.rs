//! Playlist with a wrapping preload cursor
//!
//! The cursor points at the next item to be loaded into the standby
//! surface. Reading it through [`Playlist::current`] also advances it.

use crate::utils::error::{ReelError, Result};
use serde::{Deserialize, Serialize};

/// How the cursor reacts to edits made before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    /// Leave the cursor where it is; edits before it change which item is served next
    Preserve,
    /// Shift the cursor so the item that was due next is still served next
    Track,
}

impl Default for CursorPolicy {
    fn default() -> Self {
        CursorPolicy::Preserve
    }
}

/// Ordered, editable sequence of media sources
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    items: Vec<String>,
    cursor: usize,
    policy: CursorPolicy,
}

impl Playlist {
    pub fn new(items: Vec<String>, policy: CursorPolicy) -> Self {
        Self {
            items,
            cursor: 0,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Raw cursor value; may be out of range until the next read
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn policy(&self) -> CursorPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CursorPolicy) {
        self.policy = policy;
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn set(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(ReelError::IndexOutOfRange { index, len })?;
        *slot = item.into();
        Ok(())
    }

    /// Append an item at the end
    pub fn add(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// Insert an item; `index == len` appends
    pub fn insert(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        if index > self.items.len() {
            return Err(ReelError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item.into());

        if self.policy == CursorPolicy::Track && index < self.cursor {
            self.cursor += 1;
        }
        Ok(())
    }

    /// Remove and return the item at `index`
    pub fn delete(&mut self, index: usize) -> Result<String> {
        if index >= self.items.len() {
            return Err(ReelError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);

        if self.policy == CursorPolicy::Track && index < self.cursor {
            self.cursor -= 1;
        }
        Ok(removed)
    }

    /// Item the next call to [`Playlist::current`] would yield
    pub fn peek(&self) -> Option<&str> {
        if self.items.is_empty() {
            return None;
        }
        let index = if self.cursor >= self.items.len() { 0 } else { self.cursor };
        Some(&self.items[index])
    }

    /// Yield the item at the cursor and advance it, wrapping at the end.
    ///
    /// This is a read *and* an advance: call it exactly once per preload.
    pub fn current(&mut self) -> Option<String> {
        if self.cursor >= self.items.len() {
            self.cursor = 0;
        }
        let item = self.items.get(self.cursor)?.clone();
        self.cursor += 1;
        if self.cursor >= self.items.len() {
            self.cursor = 0;
        }
        Some(item)
    }
}
