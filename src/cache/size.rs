//! Size Accountant Module
//!
//! Tracks the aggregate length of linked nodes against the size budget.

// == Size Accountant ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeAccountant {
    max_size: i64,
    cur_size: i64,
}

impl SizeAccountant {
    pub fn new(max_size: i64) -> Self {
        Self {
            max_size,
            cur_size: 0,
        }
    }

    pub fn max_size(&self) -> i64 {
        self.max_size
    }

    pub fn current(&self) -> i64 {
        self.cur_size
    }

    // == Eviction Target ==
    /// How much must be evicted before `incoming` more bytes are accounted.
    ///
    /// Returns `None` when the budget still holds. When it would overflow,
    /// `override_length` (if configured) replaces the exact overflow so a
    /// larger batch can be released at once.
    pub fn eviction_target(&self, incoming: i64, override_length: Option<i64>) -> Option<i64> {
        let prospective = self.cur_size.saturating_add(incoming);
        if prospective <= self.max_size {
            return None;
        }
        Some(override_length.unwrap_or(prospective.saturating_sub(self.max_size)))
    }

    pub fn charge(&mut self, length: i64) {
        self.cur_size += length;
    }

    pub fn release(&mut self, length: i64) {
        self.cur_size -= length;
    }

    /// Applies a signed change, e.g. after a value was replaced.
    pub fn adjust(&mut self, delta: i64) {
        self.cur_size += delta;
    }
}
