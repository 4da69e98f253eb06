//! Receive statistics
//!
//! The link never reports errors back to the sender. These counters are the
//! only record of what the receiver threw away.

use crate::frame::FrameError;

/// Counters kept by a [`Receiver`](crate::Receiver)
///
/// All counters saturate instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverStats {
    /// Frames that passed the checksum
    pub frames: u32,
    /// Non-sentinel bytes where a sentinel was expected
    pub framing_errors: u32,
    /// Length bytes declaring more payload than fits
    pub oversize: u32,
    /// Frames whose trailer did not match
    pub checksum_failures: u32,
    /// Partial frames abandoned by the watchdog
    pub timeouts: u32,
    /// Bytes dropped while a completed frame waited to be drained
    pub dropped: u32,
}

impl ReceiverStats {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            frames: 0,
            framing_errors: 0,
            oversize: 0,
            checksum_failures: 0,
            timeouts: 0,
            dropped: 0,
        }
    }

    pub(crate) fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    pub(crate) fn record(&mut self, error: FrameError) {
        let counter = match error {
            FrameError::BadSentinel => &mut self.framing_errors,
            FrameError::PayloadTooLarge => &mut self.oversize,
            FrameError::ChecksumMismatch => &mut self.checksum_failures,
            FrameError::Timeout => &mut self.timeouts,
            FrameError::Busy => &mut self.dropped,
            // Encoder-side only
            FrameError::BufferTooSmall => return,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total number of discarded frames and dropped bytes
    pub fn discarded(&self) -> u32 {
        self.framing_errors
            .saturating_add(self.oversize)
            .saturating_add(self.checksum_failures)
            .saturating_add(self.timeouts)
            .saturating_add(self.dropped)
    }
}
