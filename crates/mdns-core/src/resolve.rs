use crate::model::ResolvedAddress;
use crate::SERVICE_TYPE;
use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use std::net::IpAddr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Resolution is a targeted lookup with a hard deadline, unlike browsing.
/// The two timeout-ish outcomes are distinct on purpose: callers report
/// "no answer in time" and "answer without an address" differently.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("mDNS daemon error: {0}")]
    Daemon(#[from] mdns_sd::Error),
    #[error("failed to resolve {0}, timeout")]
    Timeout(String),
    #[error("failed to resolve {0}, no address record")]
    Empty(String),
}

/// One-shot lookup of a browsed instance name. Returns the first answer that
/// arrives before `timeout` elapses; the deadline doubles as cancellation, so
/// no query is left dangling past it.
pub fn resolve(fullname: &str, timeout: Duration) -> Result<ResolvedAddress, ResolveError> {
    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(SERVICE_TYPE)?;

    let deadline = Instant::now() + timeout;
    let outcome = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break Err(ResolveError::Timeout(fullname.to_string()));
        }
        match receiver.recv_timeout(remaining) {
            Ok(ServiceEvent::ServiceResolved(info)) if info.get_fullname() == fullname => {
                break match pick_address(&info) {
                    Some(host) => Ok(ResolvedAddress {
                        host,
                        port: info.get_port(),
                    }),
                    None => Err(ResolveError::Empty(fullname.to_string())),
                };
            }
            Ok(_) => {}
            // recv_timeout only fails once the deadline passes or the daemon
            // is gone; no further answer can arrive in either case.
            Err(_) => break Err(ResolveError::Timeout(fullname.to_string())),
        }
    };

    let _ = daemon.stop_browse(SERVICE_TYPE);
    let _ = daemon.shutdown();
    outcome
}

/// Prefer an IPv4 answer; the transfer connects over plain TCP and v4 is the
/// common case on home LANs.
fn pick_address(info: &ServiceInfo) -> Option<IpAddr> {
    let addrs = info.get_addresses();
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.iter().next())
        .copied()
}
