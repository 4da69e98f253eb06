//! Interrupt-safe receiver
//!
//! When bytes are pushed from a UART interrupt while the main loop drains
//! frames, copying a frame out and re-arming the receiver must happen in one
//! critical section. [`SharedReceiver`] runs every operation under a
//! critical-section mutex, so it can live in a `static`:
//!
//! ```ignore
//! static RX: SharedReceiver = SharedReceiver::new();
//!
//! // UART interrupt
//! RX.accept(byte, now_ms());
//!
//! // main loop
//! RX.poll(now_ms());
//! if let Some(frame) = RX.take() { /* ... */ }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::ReceiverConfig;
use crate::frame::{Frame, MAX_FRAME_LEN};
use crate::receiver::{Progress, Receiver};
use crate::stats::ReceiverStats;

/// A [`Receiver`] guarded by a critical section
pub struct SharedReceiver<const N: usize = MAX_FRAME_LEN> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Receiver<N>>>,
}

impl<const N: usize> Default for SharedReceiver<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SharedReceiver<N> {
    /// Create a shared receiver with the reference configuration
    pub const fn new() -> Self {
        Self::with_config(ReceiverConfig::new())
    }

    /// Create a shared receiver with a custom configuration
    pub const fn with_config(config: ReceiverConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Receiver::with_config(config))),
        }
    }

    /// Run `f` with exclusive access to the receiver
    pub fn with<R>(&self, f: impl FnOnce(&mut Receiver<N>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`Receiver::accept`]
    pub fn accept(&self, byte: u8, now_ms: u32) -> Progress {
        self.with(|rx| rx.accept(byte, now_ms))
    }

    /// See [`Receiver::poll`]
    pub fn poll(&self, now_ms: u32) -> bool {
        self.with(|rx| rx.poll(now_ms))
    }

    /// Drain a completed frame atomically
    pub fn take(&self) -> Option<Frame<N>> {
        self.with(|rx| rx.take())
    }

    /// See [`Receiver::is_ready`]
    pub fn is_ready(&self) -> bool {
        self.with(|rx| rx.is_ready())
    }

    /// See [`Receiver::reset`]
    pub fn reset(&self) {
        self.with(|rx| rx.reset())
    }

    /// Snapshot of the discard statistics
    pub fn stats(&self) -> ReceiverStats {
        self.with(|rx| *rx.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static RX: SharedReceiver = SharedReceiver::new();

    #[test]
    fn test_static_receiver() {
        for &byte in &[0xAA, 0xAA, 0x01, 0x07, 0x33, !0x33] {
            RX.accept(byte, 0);
        }
        assert!(RX.is_ready());

        let frame = RX.take().unwrap();
        assert_eq!(frame.destination, 0x07);
        assert_eq!(frame.payload.as_slice(), &[0x33]);
        assert!(!RX.is_ready());
        assert_eq!(RX.stats().frames, 1);
    }

    #[test]
    fn test_concurrent_producer() {
        let shared = SharedReceiver::<MAX_FRAME_LEN>::new();
        let frame = Frame::<MAX_FRAME_LEN>::new(4, &[1, 2, 3]).unwrap();
        let bytes = frame.encode_to_vec().unwrap();

        let mut received = 0;
        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..20 {
                    // Wait for the consumer to drain before sending again
                    while shared.is_ready() {
                        std::thread::yield_now();
                    }
                    for &byte in bytes.iter() {
                        shared.accept(byte, 0);
                    }
                }
            });

            while received < 20 {
                if let Some(got) = shared.take() {
                    assert_eq!(got, frame);
                    received += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        });

        assert_eq!(shared.stats().frames, 20);
        assert_eq!(shared.stats().dropped, 0);
    }

    #[test]
    fn test_with_custom_config() {
        let shared = SharedReceiver::<MAX_FRAME_LEN>::with_config(
            ReceiverConfig::new().with_timeout_ms(10),
        );
        shared.accept(0xAA, 0);
        assert!(shared.poll(11));
        assert_eq!(shared.with(|rx| rx.cursor()), 0);
        shared.reset();
    }
}
