//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock transport for unit testing
///
/// Responses are queued ahead of time and handed out one per `read`, but
/// only after a request has been written, so a driver can never consume a
/// reply before asking.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    responses: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    /// Responses released by writes but not yet read
    unlocked: usize,
    stale: VecDeque<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                responses: VecDeque::new(),
                sent: Vec::new(),
                unlocked: 0,
                stale: VecDeque::new(),
            })),
        }
    }

    /// Queue the reply to the next request
    pub fn push_response(&self, data: &str) {
        self.inner.lock().responses.push_back(data.as_bytes().to_vec());
    }

    /// Queue a late reply that is already waiting before any request
    pub fn push_stale(&self, data: &str) {
        self.inner.lock().stale.push_back(data.as_bytes().to_vec());
    }

    /// Requests written so far, as text
    pub fn sent(&self) -> Vec<String> {
        self.inner
            .lock()
            .sent
            .iter()
            .map(|d| String::from_utf8_lossy(d).into_owned())
            .collect()
    }

    /// Clear recorded requests
    pub fn clear_sent(&self) {
        self.inner.lock().sent.clear();
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        let next = if let Some(stale) = inner.stale.pop_front() {
            Some(stale)
        } else if inner.unlocked > 0 {
            inner.unlocked -= 1;
            inner.responses.pop_front()
        } else {
            None
        };

        Ok(match next {
            Some(data) => {
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);
                n
            }
            None => 0,
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.sent.push(data.to_vec());
        inner.unlocked += 1;
        Ok(data.len())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_follow_requests() {
        let mut transport = MockTransport::new();
        transport.push_response("ok");
        let mut buf = [0u8; 16];

        // Nothing before a request
        assert_eq!(transport.read(&mut buf).unwrap(), 0);

        transport.write(b"takeoff").unwrap();
        let n = transport.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ok");
        assert_eq!(transport.sent(), vec!["takeoff".to_string()]);
    }

    #[test]
    fn test_discard_pending_drops_stale() {
        let mut transport = MockTransport::new();
        transport.push_stale("ok");
        transport.push_stale("error");
        assert_eq!(transport.discard_pending().unwrap(), 2);
    }
}
