//! Frame receiver state machine
//!
//! Reassembles one frame at a time from a byte stream. Bytes are pushed in
//! with [`Receiver::accept`]; the caller runs [`Receiver::poll`] on every
//! scheduler tick so a stalled sender cannot wedge the receiver, and drains
//! completed frames with [`Receiver::take`].
//!
//! Every error path ends in [`Receiver::reset`]. Nothing is ever reported to
//! the sender; discards are only visible through [`ReceiverStats`].

use crate::config::ReceiverConfig;
use crate::frame::{self, Frame, FrameError, HEADER_LEN, MAX_FRAME_LEN, OVERHEAD, SENTINEL};
use crate::stats::ReceiverStats;

/// Receiver states
///
/// Each in-progress state carries the time its last byte arrived, which
/// drives the timeout watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverState {
    /// Waiting for the first sentinel
    Idle,
    /// Got the first sentinel, waiting for the second
    Framing1 { last_rx_ms: u32 },
    /// Got the sentinel pair, waiting for LENGTH
    Framing2 { last_rx_ms: u32 },
    /// Got LENGTH, waiting for DEST
    LengthKnown { payload_len: u8, last_rx_ms: u32 },
    /// Got DEST, no payload bytes yet
    DestinationKnown {
        payload_len: u8,
        destination: u8,
        last_rx_ms: u32,
    },
    /// Reading payload bytes, then the checksum
    AccumulatingPayload {
        payload_len: u8,
        destination: u8,
        last_rx_ms: u32,
    },
    /// Validated frame waiting to be drained
    Complete { destination: u8 },
}

impl ReceiverState {
    /// Arrival time of the last byte, if a frame is in progress
    pub fn last_rx_ms(&self) -> Option<u32> {
        match *self {
            ReceiverState::Framing1 { last_rx_ms }
            | ReceiverState::Framing2 { last_rx_ms }
            | ReceiverState::LengthKnown { last_rx_ms, .. }
            | ReceiverState::DestinationKnown { last_rx_ms, .. }
            | ReceiverState::AccumulatingPayload { last_rx_ms, .. } => Some(last_rx_ms),
            ReceiverState::Idle | ReceiverState::Complete { .. } => None,
        }
    }

    /// Check if a frame is partially received
    pub fn is_in_progress(&self) -> bool {
        self.last_rx_ms().is_some()
    }
}

/// Outcome of feeding one byte
///
/// Purely informational: a caller that ignores it gets the silent
/// discard behavior of the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// Byte stored, frame not finished
    Pending,
    /// Byte finished a valid frame; drain it with [`Receiver::take`]
    Complete,
    /// Byte dropped because a completed frame is waiting
    Ignored,
    /// Byte caused the in-progress frame to be thrown away
    Discarded(FrameError),
}

/// Single-frame receiver
///
/// `N` is the maximum total frame length (header and trailer included).
/// Declared lengths that would exceed it are rejected as soon as the
/// LENGTH byte arrives.
#[derive(Debug, Clone)]
pub struct Receiver<const N: usize = MAX_FRAME_LEN> {
    state: ReceiverState,
    payload: heapless::Vec<u8, N>,
    config: ReceiverConfig,
    stats: ReceiverStats,
}

impl<const N: usize> Default for Receiver<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Receiver<N> {
    /// Create a receiver with the reference configuration
    pub const fn new() -> Self {
        Self::with_config(ReceiverConfig::new())
    }

    /// Create a receiver with a custom configuration
    pub const fn with_config(config: ReceiverConfig) -> Self {
        Self {
            state: ReceiverState::Idle,
            payload: heapless::Vec::new(),
            config,
            stats: ReceiverStats::new(),
        }
    }

    /// Reset to idle, discarding any partial or completed frame
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        self.state = ReceiverState::Idle;
        self.payload.clear();
    }

    /// Feed a single byte received at `now_ms`
    pub fn accept(&mut self, byte: u8, now_ms: u32) -> Progress {
        let next = match self.state {
            ReceiverState::Complete { .. } => {
                self.stats.record(FrameError::Busy);
                return Progress::Ignored;
            }
            ReceiverState::Idle => {
                if byte != SENTINEL {
                    return self.discard(FrameError::BadSentinel);
                }
                ReceiverState::Framing1 { last_rx_ms: now_ms }
            }
            ReceiverState::Framing1 { .. } => {
                if byte != SENTINEL {
                    return self.discard(FrameError::BadSentinel);
                }
                ReceiverState::Framing2 { last_rx_ms: now_ms }
            }
            ReceiverState::Framing2 { .. } => {
                if byte as usize + OVERHEAD > N {
                    return self.discard(FrameError::PayloadTooLarge);
                }
                ReceiverState::LengthKnown {
                    payload_len: byte,
                    last_rx_ms: now_ms,
                }
            }
            ReceiverState::LengthKnown { payload_len, .. } => {
                self.payload.clear();
                ReceiverState::DestinationKnown {
                    payload_len,
                    destination: byte,
                    last_rx_ms: now_ms,
                }
            }
            ReceiverState::DestinationKnown {
                payload_len,
                destination,
                ..
            }
            | ReceiverState::AccumulatingPayload {
                payload_len,
                destination,
                ..
            } => {
                if self.payload.len() == payload_len as usize {
                    return self.finish(destination, byte);
                }
                if self.payload.push(byte).is_err() {
                    return self.discard(FrameError::PayloadTooLarge);
                }
                ReceiverState::AccumulatingPayload {
                    payload_len,
                    destination,
                    last_rx_ms: now_ms,
                }
            }
        };

        self.state = next;
        Progress::Pending
    }

    /// Feed bytes until a frame completes
    ///
    /// Returns the number of bytes consumed. Bytes after a completed frame
    /// are left for the caller.
    pub fn accept_slice(&mut self, bytes: &[u8], now_ms: u32) -> usize {
        for (i, &byte) in bytes.iter().enumerate() {
            if self.accept(byte, now_ms) == Progress::Complete {
                return i + 1;
            }
        }
        bytes.len()
    }

    /// Timeout watchdog; call periodically
    ///
    /// Returns true if a stalled partial frame was discarded.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if !self.is_timed_out(now_ms) {
            return false;
        }
        warn!("rx timeout after {} bytes", self.cursor());
        self.stats.record(FrameError::Timeout);
        self.reset();
        true
    }

    /// Check whether the watchdog would fire at `now_ms`
    pub fn is_timed_out(&self, now_ms: u32) -> bool {
        match self.state.last_rx_ms() {
            Some(last_rx_ms) => now_ms.wrapping_sub(last_rx_ms) > self.config.timeout_ms,
            None => false,
        }
    }

    /// Checksum of the payload bytes buffered so far
    pub fn checksum(&self) -> u8 {
        frame::checksum(&self.payload)
    }

    /// Check if a completed frame is ready to be drained
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ReceiverState::Complete { .. })
    }

    /// Destination of the completed frame
    pub fn destination(&self) -> Option<u8> {
        match self.state {
            ReceiverState::Complete { destination } => Some(destination),
            _ => None,
        }
    }

    /// Payload of the completed frame
    pub fn payload(&self) -> Option<&[u8]> {
        match self.state {
            ReceiverState::Complete { .. } => Some(self.payload.as_slice()),
            _ => None,
        }
    }

    /// Drain the completed frame and re-arm the receiver
    ///
    /// Returns `None` without touching a partial frame if nothing is ready.
    pub fn take(&mut self) -> Option<Frame<N>> {
        let destination = self.destination()?;
        let payload = core::mem::take(&mut self.payload);
        self.reset();
        Some(Frame {
            destination,
            payload,
        })
    }

    /// Current state
    pub fn state(&self) -> ReceiverState {
        self.state
    }

    /// Number of bytes of the current frame accepted so far
    pub fn cursor(&self) -> usize {
        match self.state {
            ReceiverState::Idle => 0,
            ReceiverState::Framing1 { .. } => 1,
            ReceiverState::Framing2 { .. } => 2,
            ReceiverState::LengthKnown { .. } => 3,
            ReceiverState::DestinationKnown { .. } => HEADER_LEN,
            ReceiverState::AccumulatingPayload { .. } => HEADER_LEN + self.payload.len(),
            ReceiverState::Complete { .. } => self.payload.len() + OVERHEAD,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Discard statistics
    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Zero the discard statistics
    pub fn clear_stats(&mut self) {
        self.stats = ReceiverStats::new();
    }

    fn finish(&mut self, destination: u8, trailer: u8) -> Progress {
        if !frame::verify(&self.payload, trailer) {
            debug!(
                "checksum mismatch: got {=u8:#x}, want {=u8:#x}",
                trailer,
                self.checksum()
            );
            return self.discard(FrameError::ChecksumMismatch);
        }
        trace!(
            "frame for {=u8} with {} payload bytes",
            destination,
            self.payload.len()
        );
        self.stats.record_frame();
        self.state = ReceiverState::Complete { destination };
        Progress::Complete
    }

    fn discard(&mut self, error: FrameError) -> Progress {
        if self.state != ReceiverState::Idle {
            debug!("discarding frame at byte {}: {:?}", self.cursor(), error);
        }
        self.stats.record(error);
        self.reset();
        Progress::Discarded(error)
    }
}
