//! Initiator side of the transfer protocol.
//!
//! Idle -> manifest sent -> waiting for confirmation -> transmitting or
//! rejected. Rejection is a clean ending, not an error; only transport
//! failures surface as `Err`.

use crate::error::TransferError;
use crate::message::{mime_for_path, Action, ActionType, FileInfo, MetaInfo, TEXT_PLAIN};
use crate::wire::Framed;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};

/// One thing the operator asked to send. Text counts as a single
/// `text/plain` item.
#[derive(Debug, Clone)]
pub enum SendItem {
    Text(String),
    File(PathBuf),
}

impl SendItem {
    fn file_info(&self) -> FileInfo {
        match self {
            SendItem::Text(_) => FileInfo {
                file_type: TEXT_PLAIN.to_string(),
            },
            SendItem::File(path) => FileInfo {
                file_type: mime_for_path(path),
            },
        }
    }

    /// Payload bytes, fully loaded so the length is known before
    /// transmission starts.
    async fn load(&self) -> Result<Vec<u8>, TransferError> {
        match self {
            SendItem::Text(text) => Ok(text.as_bytes().to_vec()),
            SendItem::File(path) => Ok(tokio::fs::read(path).await?),
        }
    }
}

/// Terminal state of an initiated transfer. Both are clean endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Every payload was sent and acknowledged.
    Completed,
    /// The receiver declined; zero payloads were sent.
    Rejected,
}

pub struct Sender<T> {
    framed: Framed<T>,
}

impl<T> Sender<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Takes ownership of the connected stream for the session's lifetime.
    pub fn new(stream: T) -> Self {
        Self {
            framed: Framed::new(stream),
        }
    }

    /// Drive the whole initiator exchange: manifest, confirmation, then the
    /// lock-step payload loop. Payload n+1 is never written before the
    /// acknowledgment for payload n has arrived.
    pub async fn run(mut self, items: &[SendItem]) -> Result<SendOutcome, TransferError> {
        if items.is_empty() {
            return Err(TransferError::NoContent);
        }

        let meta = MetaInfo {
            file_infos: items.iter().map(SendItem::file_info).collect(),
        };
        tracing::debug!("sending manifest with {} item(s)", meta.file_infos.len());
        self.framed.write_record(&meta).await?;

        let decision: Action = self.framed.read_record().await?;
        if decision.kind != ActionType::Accepted {
            tracing::info!("transfer rejected by peer");
            return Ok(SendOutcome::Rejected);
        }

        for (index, item) in items.iter().enumerate() {
            let payload = item.load().await?;
            tracing::debug!("sending payload {} ({} bytes)", index, payload.len());
            self.framed.write_blob(&payload).await?;
            let _ack: Action = self.framed.read_record().await?;
        }

        tracing::info!("transfer complete, {} item(s) acknowledged", items.len());
        Ok(SendOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MetaInfo;
    use tokio::io::{duplex, AsyncReadExt};

    #[tokio::test]
    async fn no_content_is_rejected_before_any_io() {
        let (a, mut b) = duplex(4096);

        let err = Sender::new(a).run(&[]).await.unwrap_err();
        assert!(matches!(err, TransferError::NoContent));

        // The sender side is already gone and never wrote a byte.
        let mut buf = [0u8; 1];
        assert_eq!(b.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejection_short_circuits_the_transfer() {
        let (a, b) = duplex(4096);

        let sender = tokio::spawn(async move {
            let items = vec![SendItem::Text("hi".into())];
            Sender::new(a).run(&items).await
        });

        let mut peer = Framed::new(b);
        let meta: MetaInfo = peer.read_record().await.unwrap();
        assert_eq!(meta.file_infos.len(), 1);
        assert_eq!(meta.file_infos[0].file_type, TEXT_PLAIN);

        peer.write_record(&Action::rejected()).await.unwrap();

        let outcome = sender.await.unwrap().unwrap();
        assert_eq!(outcome, SendOutcome::Rejected);

        // Zero payload blobs were written; the stream just ends.
        let err = peer.read_blob().await.unwrap_err();
        assert!(matches!(err, TransferError::ConnectionClosed));
    }

    #[tokio::test]
    async fn payloads_follow_manifest_order() {
        let (a, b) = duplex(64 * 1024);

        let sender = tokio::spawn(async move {
            let items = vec![
                SendItem::Text("first".into()),
                SendItem::Text("second".into()),
            ];
            Sender::new(a).run(&items).await
        });

        let mut peer = Framed::new(b);
        let _meta: MetaInfo = peer.read_record().await.unwrap();
        peer.write_record(&Action::accepted()).await.unwrap();

        assert_eq!(peer.read_blob().await.unwrap(), b"first");
        peer.write_record(&Action::ack()).await.unwrap();
        assert_eq!(peer.read_blob().await.unwrap(), b"second");
        peer.write_record(&Action::ack()).await.unwrap();

        assert_eq!(sender.await.unwrap().unwrap(), SendOutcome::Completed);
    }
}
