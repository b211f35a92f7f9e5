//! Identifier generator.

use std::fmt;

/// Hands out row identifiers for one entity type.
///
/// Identifiers are:
/// - Strictly increasing in the order they are handed out
/// - Never reused, not even after the row that held one is removed
///
/// The counter holds the *next* value to assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Creates a generator whose first identifier is `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Returns the current value and advances the counter.
    pub fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Ensures the counter is at least `existing + 1`.
    ///
    /// Never moves the counter backwards. Returns whether it moved.
    pub fn observe(&mut self, existing: u64) -> bool {
        let floor = existing.saturating_add(1);
        if self.next < floor {
            self.next = floor;
            true
        } else {
            false
        }
    }

    /// Returns the value the next call to [`next`](Self::next) will hand out.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl fmt::Display for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "next:{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn next_returns_then_increments() {
        let mut generator = IdGenerator::starting_at(5);
        assert_eq!(generator.next(), 5);
        assert_eq!(generator.next(), 6);
        assert_eq!(generator.current(), 7);
    }

    #[test]
    fn current_does_not_consume() {
        let generator = IdGenerator::default();
        assert_eq!(generator.current(), 1);
        assert_eq!(generator.current(), 1);
    }

    #[test]
    fn observe_raises_counter() {
        let mut generator = IdGenerator::starting_at(2);
        assert!(generator.observe(9));
        assert_eq!(generator.current(), 10);
    }

    #[test]
    fn observe_never_lowers_counter() {
        let mut generator = IdGenerator::starting_at(10);
        assert!(!generator.observe(3));
        assert!(!generator.observe(9));
        assert_eq!(generator.current(), 10);
    }

    #[test]
    fn observe_max_saturates() {
        let mut generator = IdGenerator::starting_at(3);
        assert!(generator.observe(u64::MAX));
        assert_eq!(generator.current(), u64::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(IdGenerator::starting_at(3).to_string(), "next:3");
    }

    proptest! {
        #[test]
        fn never_decreases(ops in prop::collection::vec(prop::option::of(0u64..1000), 0..64)) {
            let mut generator = IdGenerator::default();
            let mut last_issued = 0;
            let mut prev = generator.current();

            for op in ops {
                match op {
                    Some(existing) => {
                        generator.observe(existing);
                        prop_assert!(generator.current() > existing);
                    }
                    None => {
                        let id = generator.next();
                        prop_assert!(id > last_issued);
                        last_issued = id;
                    }
                }
                prop_assert!(generator.current() >= prev);
                prev = generator.current();
            }
        }
    }
}
