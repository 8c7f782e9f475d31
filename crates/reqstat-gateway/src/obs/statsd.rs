//! StatsD UDP sink.
//!
//! One datagram per `name:value` line. The socket is connected once at
//! startup so a send is a single syscall; each write is bounded by
//! `timeout_ms` and never retried. A batch is always attempted in full.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::Sink;

use crate::config::StatsdEndpoint;

#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Resolve the daemon address and prepare a connected socket.
    pub fn connect(endpoint: &StatsdEndpoint) -> Result<Self> {
        let target = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| {
                ReqstatError::InvalidConfig(format!(
                    "statsd host {}:{} unresolvable: {e}",
                    endpoint.host, endpoint.port
                ))
            })?
            .next()
            .ok_or_else(|| {
                ReqstatError::InvalidConfig(format!(
                    "statsd host {}:{} resolved to no address",
                    endpoint.host, endpoint.port
                ))
            })?;

        let bind: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind)?;
        socket.connect(target)?;
        socket.set_write_timeout(Some(Duration::from_millis(endpoint.timeout_ms.max(1))))?;

        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Sink for UdpSink {
    /// Every line is attempted. A failed send (often an ICMP error left over
    /// from an earlier datagram) does not stop the rest of the batch; the
    /// first error is returned after the loop.
    fn emit(&self, lines: &[String]) -> Result<()> {
        let mut first_err: Option<std::io::Error> = None;
        for line in lines {
            if let Err(e) = self.socket.send(line.as_bytes()) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
