//! Spaced-repetition review queue.
//!
//! Missed questions are resurfaced after a fixed number of intervening
//! questions: every selection tick decrements each item's counter, and an
//! item reaching zero preempts the normal random draw.

use std::collections::VecDeque;

/// How many questions pass before a missed item resurfaces.
pub const REVIEW_DELAY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewItem {
    /// Index into the active vocabulary table.
    pub target: usize,
    pub due_in: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    items: VecDeque<ReviewItem>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a missed item to resurface after `delay` ticks.
    pub fn schedule(&mut self, target: usize, delay: u32) {
        self.items.push_back(ReviewItem {
            target,
            due_in: delay,
        });
    }

    /// Advance the queue by one question-selection event. Decrements every
    /// item (floored at zero) and removes and returns the first due item in
    /// insertion order, if any. At most one item is returned per tick.
    pub fn tick(&mut self) -> Option<usize> {
        for item in self.items.iter_mut() {
            item.due_in = item.due_in.saturating_sub(1);
        }
        let pos = self.items.iter().position(|i| i.due_in == 0)?;
        self.items.remove(pos).map(|i| i.target)
    }

    /// Drop all pending items. Must be called on any dataset swap, since
    /// queued indices are only meaningful for the table they were drawn from.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter()
    }
}
