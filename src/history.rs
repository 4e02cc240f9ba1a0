//! Bounded recent-scan history.
//!
//! Fixed-capacity ring buffer of recently accepted tag identifiers. The
//! kiosk consults it before triggering an automation so the same tag cannot
//! re-trigger while it is still remembered.
//!
//! Eviction is deliberately explicit: `push` on a full history fails instead
//! of silently overwriting, and the caller decides whether to
//! [`drop_oldest`](ScanHistory::drop_oldest) first. The orchestrator also
//! applies a periodic full [`clear`](ScanHistory::clear) on a configured
//! interval.

/// Longest tag identifier we store (hex UID plus slack).
pub const TAG_ID_MAX: usize = 32;

/// A scanned tag identifier (stack-allocated).
pub type TagId = heapless::String<TAG_ID_MAX>;

/// Fixed-capacity FIFO of tag ids with membership testing.
///
/// Classic ring-buffer bookkeeping: `head` is the oldest live entry, `tail`
/// the next write slot, `count` the number of live entries (`count <= N`).
pub struct ScanHistory<const N: usize> {
    buf: [Option<TagId>; N],
    head: usize,
    tail: usize,
    count: usize,
}

impl<const N: usize> ScanHistory<N> {
    pub fn new() -> Self {
        Self {
            buf: [const { None }; N],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Append a tag at the tail. Fails without mutating if the history is
    /// full or the id does not fit in [`TAG_ID_MAX`].
    pub fn push(&mut self, id: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let Ok(tag) = TagId::try_from(id) else {
            return false;
        };
        self.buf[self.tail] = Some(tag);
        self.tail = (self.tail + 1) % N;
        self.count += 1;
        true
    }

    /// Remove and return the oldest entry. Fails on empty.
    pub fn pop(&mut self) -> Option<TagId> {
        if self.is_empty() {
            return None;
        }
        let out = self.buf[self.head].take();
        self.head = (self.head + 1) % N;
        self.count -= 1;
        out
    }

    /// Discard the oldest entry. Returns `false` on empty.
    pub fn drop_oldest(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.buf[self.head] = None;
        self.head = (self.head + 1) % N;
        self.count -= 1;
        true
    }

    /// Exact-match membership scan over the live entries.
    /// O(count) — capacity is small (typically 1).
    pub fn contains(&self, needle: &str) -> bool {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.buf[idx].as_deref() == Some(needle) {
                return true;
            }
            idx = (idx + 1) % N;
        }
        false
    }

    /// Forget every entry (periodic history wipe).
    pub fn clear(&mut self) {
        self.buf = [const { None }; N];
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for ScanHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let h: ScanHistory<2> = ScanHistory::new();
        assert!(h.is_empty());
        assert!(!h.is_full());
        assert_eq!(h.len(), 0);
        assert_eq!(h.capacity(), 2);
    }

    #[test]
    fn push_until_full_then_reject() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        assert!(h.push("A"));
        assert!(h.push("B"));
        assert!(!h.push("C"), "push on full must fail");
        assert_eq!(h.len(), 2);
        assert!(h.contains("A"));
        assert!(h.contains("B"));
        assert!(!h.contains("C"));
    }

    #[test]
    fn drop_then_push_evicts_oldest() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        assert!(h.push("A"));
        assert!(h.push("B"));
        assert!(h.drop_oldest());
        assert!(h.push("C"));
        assert!(!h.contains("A"));
        assert!(h.contains("B"));
        assert!(h.contains("C"));
    }

    #[test]
    fn pop_returns_fifo_order() {
        let mut h: ScanHistory<3> = ScanHistory::new();
        h.push("one");
        h.push("two");
        h.push("three");
        assert_eq!(h.pop().as_deref(), Some("one"));
        assert_eq!(h.pop().as_deref(), Some("two"));
        assert_eq!(h.pop().as_deref(), Some("three"));
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn empty_failures_leave_state_untouched() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        assert!(!h.drop_oldest());
        assert_eq!(h.pop(), None);
        assert!(h.is_empty());
        assert!(h.push("A"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        h.push("A");
        h.push("B");
        h.clear();
        assert!(h.is_empty());
        assert!(!h.contains("A"));
        assert!(h.push("A"));
    }

    #[test]
    fn oversized_id_rejected_without_mutation() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        let long = "x".repeat(TAG_ID_MAX + 1);
        assert!(!h.push(&long));
        assert!(h.is_empty());
    }

    #[test]
    fn wraparound_indices_stay_consistent() {
        let mut h: ScanHistory<2> = ScanHistory::new();
        for round in 0..10 {
            let a = format!("a{round}");
            let b = format!("b{round}");
            assert!(h.push(&a));
            assert!(h.push(&b));
            assert!(h.is_full());
            assert!(h.drop_oldest());
            assert!(h.contains(&b));
            assert!(!h.contains(&a));
            assert!(h.drop_oldest());
        }
        assert!(h.is_empty());
    }
}
