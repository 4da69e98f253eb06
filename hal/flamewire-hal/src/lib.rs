//! Flamewire Hardware Abstraction Layer
//!
//! The frame receiver knows nothing about the medium its bytes travel over.
//! This crate defines the two collaborators it needs, implemented by
//! chip-specific code or by test doubles on the host.
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Non-blocking byte source
//! - [`clock::Monotonic`] - Millisecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::Monotonic;
pub use uart::{IoRx, UartConfig, UartRx};
