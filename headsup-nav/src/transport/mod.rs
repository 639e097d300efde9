//! Transport layer for I/O abstraction
//!
//! The vehicle speaks a datagram protocol: every `write` is one request and
//! every successful `read` yields one whole response.

use crate::error::Result;

mod mock;
mod udp;
pub use mock::MockTransport;
pub use udp::UdpTransport;

/// Transport trait for vehicle communication
pub trait Transport: Send {
    /// Read one datagram into buffer, returns number of bytes read
    ///
    /// Returns `Ok(0)` when nothing arrived within the transport's poll
    /// interval.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Write one datagram, returns number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Drop responses that arrived after their request timed out
    ///
    /// A late reply must never be taken as the answer to the next request.
    fn discard_pending(&mut self) -> Result<usize> {
        let mut buffer = [0u8; 256];
        let mut dropped = 0;
        while self.read(&mut buffer)? > 0 {
            dropped += 1;
        }
        Ok(dropped)
    }
}
