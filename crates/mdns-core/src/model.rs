use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// A peer seen while browsing, identified by its full instance name,
/// e.g. "study-pc._adrop._tcp.local.".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    pub fullname: String,
}

/// Connectable address produced by resolving one chosen peer. Used exactly
/// once to open the transfer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub host: IpAddr,
    pub port: u16,
}

impl ResolvedAddress {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
