//! UDP transport implementation

use super::Transport;
use crate::error::Result;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

/// Poll interval for a single read
const READ_POLL: Duration = Duration::from_millis(100);

/// UDP transport bound to one vehicle endpoint
pub struct UdpTransport {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpTransport {
    /// Bind locally and target the vehicle
    ///
    /// # Arguments
    /// * `local_bind` - Local address responses arrive on (e.g., "0.0.0.0:8889")
    /// * `remote` - Vehicle command endpoint (e.g., "192.168.10.1:8889")
    pub fn open(local_bind: &str, remote: &str) -> Result<Self> {
        let remote = remote.to_socket_addrs()?.next().ok_or_else(|| {
            crate::error::Error::Config(format!("Cannot resolve vehicle address: {}", remote))
        })?;

        let socket = UdpSocket::bind(local_bind)?;
        socket.set_read_timeout(Some(READ_POLL))?;

        log::info!("Opened UDP link {} -> {}", socket.local_addr()?, remote);
        Ok(UdpTransport { socket, remote })
    }
}

impl Transport for UdpTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.socket.recv_from(buffer) {
            Ok((n, from)) if from.ip() == self.remote.ip() => Ok(n),
            Ok((_, from)) => {
                log::debug!("Ignoring datagram from unexpected peer {}", from);
                Ok(0)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.socket.send_to(data, self.remote)?)
    }

    fn discard_pending(&mut self) -> Result<usize> {
        self.socket.set_nonblocking(true)?;
        let mut buffer = [0u8; 256];
        let mut dropped = 0;
        let result = loop {
            match self.socket.recv_from(&mut buffer) {
                Ok(_) => dropped += 1,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(dropped),
                Err(e) => break Err(e.into()),
            }
        };
        self.socket.set_nonblocking(false)?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_exchange() {
        let vehicle = UdpSocket::bind("127.0.0.1:0").unwrap();
        let vehicle_addr = vehicle.local_addr().unwrap().to_string();

        let mut transport = UdpTransport::open("127.0.0.1:0", &vehicle_addr).unwrap();
        transport.write(b"command").unwrap();

        let mut buf = [0u8; 64];
        let (n, from) = vehicle.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"command");
        vehicle.send_to(b"ok", from).unwrap();

        let mut reply = [0u8; 64];
        let mut n = 0;
        for _ in 0..20 {
            n = transport.read(&mut reply).unwrap();
            if n > 0 {
                break;
            }
        }
        assert_eq!(&reply[..n], b"ok");
    }

    #[test]
    fn test_read_times_out_empty() {
        let vehicle = UdpSocket::bind("127.0.0.1:0").unwrap();
        let vehicle_addr = vehicle.local_addr().unwrap().to_string();
        let mut transport = UdpTransport::open("127.0.0.1:0", &vehicle_addr).unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(transport.read(&mut buf).unwrap(), 0);
        assert_eq!(transport.discard_pending().unwrap(), 0);
    }
}
