//! Listener Factory
//!
//! Binds reusable-port TCP listeners from address strings.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::error::{CacheError, Result};

const BACKLOG: i32 = 1024;

/// Binds a TCP listener with `SO_REUSEADDR` and, on Unix, `SO_REUSEPORT`.
///
/// Accepts `host:port`, `[v6]:port` and `:port` (all IPv4 interfaces).
/// Must be called from within a Tokio runtime.
pub fn bind_reuseport(addr: &str) -> Result<TcpListener> {
    bind(addr).map_err(|source| CacheError::Bind {
        addr: addr.to_string(),
        source,
    })
}

fn bind(addr: &str) -> io::Result<TcpListener> {
    let socket_addr = resolve(addr)?;
    let socket = Socket::new(
        Domain::for_address(socket_addr),
        Type::STREAM,
        Some(Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(BACKLOG)?;

    TcpListener::from_std(socket.into())
}

fn resolve(addr: &str) -> io::Result<SocketAddr> {
    let addr = addr.trim();
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };

    full.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", addr),
        )
    })
}
