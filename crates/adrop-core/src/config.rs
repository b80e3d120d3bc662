use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Knobs for one transfer session. Defaults mirror the reference behavior:
/// ten seconds of browsing, five to resolve the chosen peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// How long to browse before snapshotting the peer set
    pub browse_window: Duration,

    /// Hard deadline for resolving one chosen peer
    pub resolve_timeout: Duration,

    /// Directory received files are written into
    pub output_dir: PathBuf,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            browse_window: Duration::from_secs(10),
            resolve_timeout: Duration::from_secs(5),
            output_dir: PathBuf::from("."),
        }
    }
}
