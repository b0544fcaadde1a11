use super::{FREE_BYTES, MAX_PROGRAM_LINES};
use crate::error;
use crate::lang::{Error, Int};

type Result<T> = std::result::Result<T, Error>;

/// One stored program line: its number and its raw text exactly as
/// entered (leading number included), already truncated to the line
/// width. The text is re-tokenized every time the line executes.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: Int,
    text: String,
}

impl Line {
    pub fn number(&self) -> Int {
        self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

/// ## Line store
///
/// A fixed-capacity array of line slots. `slots.len()` is the
/// high-water mark of slots ever allocated; a `None` below it is a
/// tombstone left by a deletion, never matched by lookups and never
/// compacted. Active records stay in strictly ascending line-number
/// order; insertion reuses the nearest tombstone by rotating the
/// records in between, so deleted slots are reclaimed without breaking
/// the ordering.
#[derive(Debug, Default)]
pub struct Listing {
    slots: Vec<Option<Line>>,
    bytes_used: usize,
}

impl Listing {
    pub fn new() -> Listing {
        Listing::default()
    }

    /// True when no active lines remain. Tombstones do not count.
    pub fn is_empty(&self) -> bool {
        self.bytes_used == 0
    }

    /// High-water mark of allocated slots; the run loop stops past it.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// The line in a slot, or `None` for a tombstone or an unallocated
    /// index.
    pub fn get(&self, slot: usize) -> Option<&Line> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Linear scan for an active line by number.
    pub fn find(&self, number: Int) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Some(line) if line.number == number))
    }

    /// Stores a line, replacing in place when the number is already
    /// present. New numbers are insertion-sorted into the slot array.
    pub fn insert(&mut self, number: Int, text: &str) -> Result<()> {
        let line = Line {
            number,
            text: text.to_string(),
        };
        if let Some(slot) = self.find(number) {
            if let Some(old) = &self.slots[slot] {
                self.bytes_used -= old.len();
            }
            self.bytes_used += line.len();
            self.slots[slot] = Some(line);
            return Ok(());
        }
        let target = self
            .slots
            .iter()
            .position(|s| matches!(s, Some(l) if l.number > number))
            .unwrap_or(self.slots.len());
        let above = (target..self.slots.len()).find(|&i| self.slots[i].is_none());
        let below = (0..target).rev().find(|&i| self.slots[i].is_none());
        if let Some(tomb) = above {
            self.slots[target..=tomb].rotate_right(1);
            self.bytes_used += line.len();
            self.slots[target] = Some(line);
        } else if let Some(tomb) = below {
            self.slots[tomb..target].rotate_left(1);
            self.bytes_used += line.len();
            self.slots[target - 1] = Some(line);
        } else if self.slots.len() < MAX_PROGRAM_LINES {
            self.bytes_used += line.len();
            self.slots.insert(target, Some(line));
        } else {
            return Err(error!(OutOfMemory; "PROGRAM FULL"));
        }
        Ok(())
    }

    /// Tombstones the matching slot. Unknown numbers are ignored; the
    /// store is not compacted.
    pub fn remove(&mut self, number: Int) {
        if let Some(slot) = self.find(number) {
            if let Some(line) = self.slots[slot].take() {
                self.bytes_used -= line.len();
            }
        }
    }

    /// Drops every line and resets the byte counter (`NEW`).
    pub fn clear(&mut self) {
        self.slots.clear();
        self.bytes_used = 0;
    }

    pub fn bytes_free(&self) -> usize {
        FREE_BYTES - self.bytes_used
    }
}
