use thiserror::Error;

/// Failures that end a transfer session. Every variant is session-fatal:
/// nothing is retried or resumed, the connection is simply released.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream before a full frame or payload arrived.
    #[error("connection closed before the full payload arrived")]
    ConnectionClosed,

    #[error("record of {0} bytes exceeds the record size limit")]
    RecordTooLarge(usize),

    #[error("malformed record length prefix")]
    BadLengthPrefix,

    #[error("record encode/decode error: {0}")]
    Codec(#[from] bincode::Error),

    /// Send invoked with neither text nor files; checked before any network
    /// activity.
    #[error("nothing to send: neither text nor files were given")]
    NoContent,

    #[error("payload delivery failed: {0}")]
    Deliver(anyhow::Error),
}
