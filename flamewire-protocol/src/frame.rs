//! Wire format for the Flamewire serial link.
//!
//! Frame format:
//! - SENTINEL (2 bytes): 0xAA 0xAA synchronization pair
//! - LENGTH (1 byte): payload length
//! - DEST (1 byte): destination address
//! - PAYLOAD (LENGTH bytes): application data
//! - CHECKSUM (1 byte): complement of the 8-bit sum of PAYLOAD only

use heapless::Vec;

/// Frame synchronization byte (sent twice)
pub const SENTINEL: u8 = 0xAA;

/// Sentinel pair + length + destination
pub const HEADER_LEN: usize = 4;

/// Bytes a frame carries besides its payload (header + checksum)
pub const OVERHEAD: usize = HEADER_LEN + 1;

/// Smallest legal frame (empty payload)
pub const MIN_FRAME_LEN: usize = OVERHEAD;

/// Maximum complete frame size in the reference link sizing.
///
/// Both ends of a link must agree on this value.
pub const MAX_FRAME_LEN: usize = 15;

/// Maximum payload size for a [`MAX_FRAME_LEN`] frame
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - OVERHEAD;

/// Receive timeout between consecutive bytes of one frame
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Errors that can occur during frame reception or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Expected a sentinel byte at the start of a frame
    BadSentinel,
    /// Declared payload does not fit the frame capacity
    PayloadTooLarge,
    /// Trailer does not match the payload checksum
    ChecksumMismatch,
    /// Sender stalled mid-frame
    Timeout,
    /// A completed frame has not been drained yet
    Busy,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Sum payload bytes with 8-bit wraparound
fn wrapping_sum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Calculate the trailer byte for a payload
pub fn checksum(payload: &[u8]) -> u8 {
    !wrapping_sum(payload)
}

/// Check a trailer byte against a payload
///
/// A valid trailer brings the wrapping sum of payload and trailer to 0xFF.
pub fn verify(payload: &[u8], trailer: u8) -> bool {
    wrapping_sum(payload).wrapping_add(trailer) == 0xFF
}

/// A received or constructed frame
///
/// `N` is the maximum total frame length, header and trailer included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame<const N: usize = MAX_FRAME_LEN> {
    /// Destination address
    pub destination: u8,
    /// Payload data
    pub payload: Vec<u8, N>,
}

impl<const N: usize> Frame<N> {
    /// Create a new frame with the given destination and payload
    pub fn new(destination: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > u8::MAX as usize || payload.len() + OVERHEAD > N {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            destination,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(destination: u8) -> Self {
        Self {
            destination,
            payload: Vec::new(),
        }
    }

    /// Total length of this frame on the wire
    pub fn frame_len(&self) -> usize {
        self.payload.len() + OVERHEAD
    }

    /// Trailer byte for this frame's payload
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.frame_len();
        if self.payload.len() > u8::MAX as usize {
            return Err(FrameError::PayloadTooLarge);
        }
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let end = HEADER_LEN + self.payload.len();
        buffer[0] = SENTINEL;
        buffer[1] = SENTINEL;
        buffer[2] = self.payload.len() as u8;
        buffer[3] = self.destination;
        buffer[HEADER_LEN..end].copy_from_slice(&self.payload);
        buffer[end] = self.checksum();

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, N>, FrameError> {
        let mut vec = Vec::new();
        vec.resize_default(self.frame_len())
            .map_err(|_| FrameError::BufferTooSmall)?;
        let len = self.encode(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_reference_frame() {
        assert_eq!(checksum(&[0x10, 0x20]), 0xCF);
        assert!(verify(&[0x10, 0x20], 0xCF));
        assert!(!verify(&[0x10, 0x20], 0xCE));
    }

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(checksum(&[]), 0xFF);
        assert!(verify(&[], 0xFF));
    }

    #[test]
    fn test_checksum_wraps() {
        // 0xF0 + 0x20 = 0x110 -> 0x10
        assert_eq!(checksum(&[0xF0, 0x20]), !0x10);
    }

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame: Frame = Frame::empty(0x07);
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, MIN_FRAME_LEN);
        assert_eq!(&buffer[..len], &[SENTINEL, SENTINEL, 0, 0x07, 0xFF]);
    }

    #[test]
    fn test_frame_encode_with_payload() {
        let frame: Frame = Frame::new(0x01, &[0x10, 0x20]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(
            encoded.as_slice(),
            &[0xAA, 0xAA, 0x02, 0x01, 0x10, 0x20, 0xCF]
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame: Frame = Frame::new(0x01, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 7];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_LEN + 1];
        let result: Result<Frame, _> = Frame::new(0x01, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_max_payload_fits() {
        let payload = [0x55u8; MAX_PAYLOAD_LEN];
        let frame: Frame = Frame::new(0x02, &payload).unwrap();
        assert_eq!(frame.frame_len(), MAX_FRAME_LEN);
        assert_eq!(frame.encode_to_vec().unwrap().len(), MAX_FRAME_LEN);
    }

    #[test]
    fn test_custom_capacity() {
        let frame = Frame::<32>::new(0x03, &[0u8; 27]).unwrap();
        assert_eq!(frame.frame_len(), 32);
        assert!(Frame::<32>::new(0x03, &[0u8; 28]).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn checksum_complements_sum(payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN)) {
                let sum = payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
                prop_assert_eq!(sum.wrapping_add(checksum(&payload)), 0xFF);
                prop_assert!(verify(&payload, checksum(&payload)));
            }
        }
    }
}
