//! Local-network discovery for adrop peers.
//!
//! A thin synchronous layer over the `mdns-sd` service daemon: advertise this
//! device under the adrop service type, browse for peers over a fixed window,
//! and resolve one chosen peer to a connectable address. Browsing is
//! exploratory (zero answers is a valid outcome); resolution is a targeted
//! lookup with a hard deadline and typed failures.

pub mod announce;
pub mod discover;
pub mod model;
pub mod net;
pub mod resolve;
pub mod scan;

// Re-export commonly used types
pub use announce::Advertiser;
pub use discover::browse_window;
pub use model::{PeerRecord, ResolvedAddress};
pub use resolve::{resolve, ResolveError};
pub use scan::scan_all;

/// Service type adrop peers advertise and browse for.
pub const SERVICE_TYPE: &str = "_adrop._tcp.local.";
