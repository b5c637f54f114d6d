//! Fibonacci-indexed trigger for proactive consolidation
//!
//! Besides the consolidation that every extract-min performs, the heap also
//! consolidates during insert whenever its size reaches an exact multiple of the
//! current threshold. Each time that happens the threshold moves to the next
//! Fibonacci number, so the proactive passes get geometrically rarer as the heap
//! grows. Removals walk the threshold back down once the size drops below the
//! previous boundary, keeping the trigger aligned with the heap's actual size.

use tracing::debug;

/// Fibonacci numbers from 2 upward, the largest fitting a signed 32-bit counter
pub const FIBONACCI_THRESHOLDS: [usize; 44] = [
    2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987, 1597, 2584, 4181, 6765, 10946,
    17711, 28657, 46368, 75025, 121393, 196418, 317811, 514229, 832040, 1346269, 2178309,
    3524578, 5702887, 9227465, 14930352, 24157817, 39088169, 63245986, 102334155, 165580141,
    267914296, 433494437, 701408733, 1134903170, 1836311903,
];

const LAST_INDEX: usize = FIBONACCI_THRESHOLDS.len() - 1;

/// Position in [`FIBONACCI_THRESHOLDS`] plus the two boundaries around it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConsolidationThreshold {
    index: usize,
    current: usize,
    previous: usize,
}

impl Default for ConsolidationThreshold {
    fn default() -> Self {
        Self::at(0)
    }
}

impl ConsolidationThreshold {
    fn at(index: usize) -> Self {
        let index = index.min(LAST_INDEX);
        ConsolidationThreshold {
            index,
            current: FIBONACCI_THRESHOLDS[index],
            previous: FIBONACCI_THRESHOLDS[index.saturating_sub(1)],
        }
    }

    /// The state an empty heap reaches after `len` inserts
    pub(crate) fn for_len(len: usize) -> Self {
        let index = FIBONACCI_THRESHOLDS
            .iter()
            .position(|&t| t > len)
            .unwrap_or(LAST_INDEX);
        Self::at(index)
    }

    #[inline]
    pub(crate) fn current(&self) -> usize {
        self.current
    }

    /// Records an insert that brought the heap to `len` elements
    ///
    /// Returns true when `len` hit the threshold; the threshold has then already
    /// been advanced and the caller is expected to consolidate.
    pub(crate) fn on_insert(&mut self, len: usize) -> bool {
        if len % self.current != 0 {
            return false;
        }
        if self.index < LAST_INDEX {
            *self = Self::at(self.index + 1);
            debug!(
                index = self.index,
                threshold = self.current,
                len,
                "advanced consolidation threshold"
            );
        }
        true
    }

    /// Records a removal that left the heap with `len` elements
    pub(crate) fn on_remove(&mut self, len: usize) {
        if self.index > 0 && len < self.previous {
            *self = Self::at(self.index - 1);
            debug!(
                index = self.index,
                threshold = self.current,
                len,
                "lowered consolidation threshold"
            );
        }
    }
}
