//! ADrop Core - accept/reject-gated LAN transfer
//!
//! The wire protocol is a manifest handshake followed by a lock-step payload
//! exchange over one TCP connection: the sender declares its items, the
//! receiver answers accept or reject, then each payload travels as a raw blob
//! and is acknowledged before the next one starts.

pub mod config;
pub mod error;
pub mod message;
pub mod recv;
pub mod send;
pub mod sink;
pub mod wire;

// Re-export commonly used types
pub use config::TransferConfig;
pub use error::TransferError;
pub use message::{Action, ActionType, FileInfo, MetaInfo};
pub use recv::Receiver;
pub use send::{SendItem, SendOutcome, Sender};
pub use sink::{FsSink, PayloadSink};
pub use wire::Framed;
