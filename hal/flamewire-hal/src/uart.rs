//! UART serial communication abstractions
//!
//! The frame receiver consumes one byte at a time and must never block the
//! scheduler, so the receive side is a non-blocking pull.

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read a single byte if one is pending
    ///
    /// Returns `Ok(None)` immediately when the receive FIFO is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read pending bytes into `buf` without blocking
    ///
    /// Returns the number of bytes read.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.try_read_byte()? {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

/// Adapter from an `embedded-io` reader
///
/// Only reads when the peripheral reports data ready, so
/// [`UartRx::try_read_byte`] never blocks.
pub struct IoRx<T> {
    inner: T,
}

impl<T> IoRx<T> {
    /// Wrap a reader
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> UartRx for IoRx<T>
where
    T: embedded_io::Read + embedded_io::ReadReady,
{
    type Error = T::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 38400,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
