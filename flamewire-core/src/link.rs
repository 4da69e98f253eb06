//! Link driver
//!
//! Binds a byte transport and a clock to a frame receiver. The firmware
//! main loop calls [`Link::service`] once per tick:
//!
//! ```ignore
//! let mut link: Link<_, _> = Link::new(uart, clock, LinkConfig::default())?;
//! loop {
//!     if let Some(frame) = link.service()? {
//!         dispatch(frame.destination, &frame.payload);
//!     }
//! }
//! ```

use flamewire_hal::{Monotonic, UartRx};
use flamewire_protocol::{Frame, Progress, Receiver, ReceiverStats, MAX_FRAME_LEN};

use crate::config::{LinkConfig, LinkConfigError};

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The transport failed to deliver a byte
    Transport(E),
}

/// One serial link: transport, clock and receiver
pub struct Link<U, C, const N: usize = MAX_FRAME_LEN> {
    uart: U,
    clock: C,
    receiver: Receiver<N>,
    config: LinkConfig,
}

impl<U, C, const N: usize> Link<U, C, N>
where
    U: UartRx,
    C: Monotonic,
{
    /// Create a link, rejecting invalid configuration
    pub fn new(uart: U, clock: C, config: LinkConfig) -> Result<Self, LinkConfigError> {
        config.validate()?;
        Ok(Self {
            uart,
            clock,
            receiver: Receiver::with_config(config.receiver),
            config,
        })
    }

    /// Run one scheduler tick
    ///
    /// Feeds pending bytes to the receiver, stopping early once a frame is
    /// complete so the rest stays queued in the transport. Then runs the
    /// timeout watchdog and drains the completed frame, if any.
    ///
    /// A transport error is returned only after the watchdog has run.
    pub fn service(&mut self) -> Result<Option<Frame<N>>, LinkError<U::Error>> {
        let pumped = self.pump();
        self.receiver.poll(self.clock.now_ms());
        pumped?;
        Ok(self.receiver.take())
    }

    fn pump(&mut self) -> Result<(), LinkError<U::Error>> {
        let mut budget = self.config.max_bytes_per_service;
        while budget > 0 && !self.receiver.is_ready() {
            let byte = match self.uart.try_read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => break,
                Err(e) => {
                    warn!("uart read error, {} bytes into frame", self.receiver.cursor());
                    return Err(LinkError::Transport(e));
                }
            };
            budget -= 1;
            if self.receiver.accept(byte, self.clock.now_ms()) == Progress::Complete {
                trace!("frame ready after {} bytes", self.receiver.cursor());
            }
        }
        Ok(())
    }

    /// The receiver driven by this link
    pub fn receiver(&self) -> &Receiver<N> {
        &self.receiver
    }

    /// Mutable access to the receiver
    pub fn receiver_mut(&mut self) -> &mut Receiver<N> {
        &mut self.receiver
    }

    /// Discard statistics
    pub fn stats(&self) -> &ReceiverStats {
        self.receiver.stats()
    }

    /// Active configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Give back the transport and clock
    pub fn release(self) -> (U, C) {
        (self.uart, self.clock)
    }
}
