//! Flamewire serial link protocol
//!
//! This crate reassembles frames sent by the fire-effect controller to its
//! effect boards over a plain serial line. Bytes arrive one at a time; the
//! receiver validates each frame against its checksum and recovers on its
//! own from garbage, oversize lengths and stalled senders.
//!
//! # Frame Format
//!
//! ```text
//! ┌──────┬──────┬────────┬──────┬─────────────┬──────────┐
//! │ 0xAA │ 0xAA │ LENGTH │ DEST │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B   │ 1B     │ 1B   │ 0–10B       │ 1B       │
//! └──────┴──────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! CHECKSUM is the bitwise complement of the 8-bit wrapping sum of PAYLOAD.
//! The receiver holds at most one completed frame; the caller drains it
//! before the next one is accepted.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod frame;
pub mod receiver;
pub mod shared;
pub mod stats;

pub use config::{ConfigError, ReceiverConfig};
pub use frame::{
    checksum, verify, Frame, FrameError, DEFAULT_TIMEOUT_MS, MAX_FRAME_LEN, MAX_PAYLOAD_LEN,
    SENTINEL,
};
pub use receiver::{Progress, Receiver, ReceiverState};
pub use shared::SharedReceiver;
pub use stats::ReceiverStats;
