use crate::model::PeerRecord;
use crate::SERVICE_TYPE;
use anyhow::Result;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::collections::HashSet;
use std::time::Instant;

/// Name-deduplicated, insertion-ordered accumulation of browse answers.
/// Duplicate announcements (re-broadcasts, multiple interfaces) collapse to
/// one record per instance name.
#[derive(Default)]
pub struct BrowseCollector {
    seen: HashSet<String>,
    peers: Vec<PeerRecord>,
}

impl BrowseCollector {
    /// Record one observed instance name. Returns true the first time a name
    /// is seen.
    pub fn observe(&mut self, fullname: &str) -> bool {
        if !self.seen.insert(fullname.to_string()) {
            return false;
        }
        self.peers.push(PeerRecord {
            fullname: fullname.to_string(),
        });
        true
    }

    pub fn into_peers(self) -> Vec<PeerRecord> {
        self.peers
    }
}

/// Browse for adrop peers over a fixed wall-clock window and return the
/// deduplicated snapshot. The daemon pushes events as instances answer; the
/// caller sees one finite result set once the window elapses. Zero peers is a
/// valid outcome, not an error.
pub fn browse_window(window: std::time::Duration) -> Result<Vec<PeerRecord>> {
    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(SERVICE_TYPE)?;
    let mut collector = BrowseCollector::default();

    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match receiver.recv_timeout(remaining) {
            Ok(ServiceEvent::ServiceFound(_ty, fullname)) => {
                if collector.observe(&fullname) {
                    tracing::info!("found '{}'", fullname);
                }
            }
            Ok(ServiceEvent::ServiceResolved(info)) => {
                if collector.observe(info.get_fullname()) {
                    tracing::info!("found '{}'", info.get_fullname());
                }
            }
            Ok(_) => {}
            // Timed out (window over) or daemon gone; either way the
            // snapshot is final.
            Err(_) => break,
        }
    }

    let _ = daemon.stop_browse(SERVICE_TYPE);
    let _ = daemon.shutdown();
    Ok(collector.into_peers())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_announcements_collapse() {
        let mut collector = BrowseCollector::default();
        assert!(collector.observe("a._adrop._tcp.local."));
        assert!(collector.observe("b._adrop._tcp.local."));
        assert!(!collector.observe("a._adrop._tcp.local."));

        let peers = collector.into_peers();
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].fullname, "a._adrop._tcp.local.");
        assert_eq!(peers[1].fullname, "b._adrop._tcp.local.");
    }
}
