//! Board-agnostic link logic for Flamewire effect boards
//!
//! This crate ties the hardware collaborators from `flamewire-hal` to the
//! frame receiver from `flamewire-protocol`:
//!
//! - Link driver servicing one serial line per scheduler tick
//! - Link configuration and its persisted form

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod link;

pub use config::{LinkConfig, LinkConfigError};
pub use link::{Link, LinkError};
