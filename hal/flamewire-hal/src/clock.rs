//! Monotonic time source
//!
//! Timestamps are only used for receive timeouts, never for frame contents.

/// Millisecond clock
///
/// Must be monotonically non-decreasing. The value is allowed to wrap at
/// `u32::MAX`; consumers compare timestamps with wrapping arithmetic.
pub trait Monotonic {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u32;
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Manual(Cell<u32>);

    impl Monotonic for Manual {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    fn elapsed(clock: impl Monotonic, since: u32) -> u32 {
        clock.now_ms().wrapping_sub(since)
    }

    #[test]
    fn test_reference_forwards() {
        let clock = Manual(Cell::new(10));
        assert_eq!(elapsed(&clock, 4), 6);
        clock.0.set(3);
        assert_eq!(elapsed(&clock, u32::MAX), 4);
    }
}
