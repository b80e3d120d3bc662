//! Responder side of the transfer protocol, driven over an already accepted
//! connection. Listening and advertising belong to session orchestration.

use crate::error::TransferError;
use crate::message::{Action, MetaInfo};
use crate::sink::PayloadSink;
use crate::wire::Framed;
use tokio::io::{AsyncRead, AsyncWrite};

pub struct Receiver<T> {
    framed: Framed<T>,
}

impl<T> Receiver<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Takes ownership of the accepted stream for the session's lifetime.
    pub fn new(stream: T) -> Self {
        Self {
            framed: Framed::new(stream),
        }
    }

    /// Drive the responder exchange: manifest in, accept out, then one
    /// blob + acknowledgment round-trip per declared item, each payload
    /// handed to `sink` at its manifest index. Returns the item count; an
    /// empty manifest completes without a single blob exchange.
    pub async fn run<S: PayloadSink>(mut self, sink: &S) -> Result<usize, TransferError> {
        let meta: MetaInfo = self.framed.read_record().await?;
        tracing::info!("incoming manifest: {} item(s)", meta.file_infos.len());

        self.framed.write_record(&Action::accepted()).await?;

        for (index, info) in meta.file_infos.iter().enumerate() {
            let payload = self.framed.read_blob().await?;
            tracing::debug!(
                "received payload {} ({} bytes, {})",
                index,
                payload.len(),
                info.file_type
            );
            self.framed.write_record(&Action::ack()).await?;
            sink.deliver(index, &info.file_type, &payload)
                .await
                .map_err(TransferError::Deliver)?;
        }

        Ok(meta.file_infos.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ActionType, FileInfo, TEXT_PLAIN};
    use crate::send::{SendItem, SendOutcome, Sender};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio::io::duplex;
    use tokio::net::{TcpListener, TcpStream};

    /// Collects deliveries in memory so tests can assert bytes and order.
    #[derive(Default)]
    struct MemSink {
        got: Mutex<Vec<(usize, String, Vec<u8>)>>,
    }

    #[async_trait]
    impl PayloadSink for MemSink {
        async fn deliver(&self, index: usize, file_type: &str, bytes: &[u8]) -> Result<()> {
            self.got
                .lock()
                .unwrap()
                .push((index, file_type.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn transfer_round_trip_over_tcp() -> Result<()> {
        let temp = TempDir::new()?;
        let file_path = temp.path().join("photo.png");
        std::fs::write(&file_path, b"\x89PNG not really")?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let sink = Arc::new(MemSink::default());
        let recv_sink = sink.clone();
        let receiver = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            Receiver::new(stream).run(&*recv_sink).await.unwrap()
        });

        let stream = TcpStream::connect(addr).await?;
        let items = vec![SendItem::Text("hi".into()), SendItem::File(file_path)];
        let outcome = Sender::new(stream).run(&items).await?;
        assert_eq!(outcome, SendOutcome::Completed);

        assert_eq!(receiver.await?, 2);
        let got = sink.got.lock().unwrap();
        assert_eq!(got[0], (0, TEXT_PLAIN.to_string(), b"hi".to_vec()));
        assert_eq!(got[1].0, 1);
        assert_eq!(got[1].1, "image/png");
        assert_eq!(got[1].2, b"\x89PNG not really");
        Ok(())
    }

    #[tokio::test]
    async fn empty_manifest_completes_without_blobs() {
        let (a, b) = duplex(4096);

        let sink = Arc::new(MemSink::default());
        let recv_sink = sink.clone();
        let receiver =
            tokio::spawn(async move { Receiver::new(b).run(&*recv_sink).await.unwrap() });

        let mut peer = Framed::new(a);
        peer.write_record(&MetaInfo::default()).await.unwrap();
        let decision: Action = peer.read_record().await.unwrap();
        assert_eq!(decision.kind, ActionType::Accepted);
        drop(peer);

        assert_eq!(receiver.await.unwrap(), 0);
        assert!(sink.got.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_mime_types_keep_their_own_slots() {
        let (a, b) = duplex(64 * 1024);

        let sink = Arc::new(MemSink::default());
        let recv_sink = sink.clone();
        let receiver =
            tokio::spawn(async move { Receiver::new(b).run(&*recv_sink).await.unwrap() });

        let mut peer = Framed::new(a);
        let meta = MetaInfo {
            file_infos: vec![
                FileInfo {
                    file_type: "image/png".into(),
                };
                2
            ],
        };
        peer.write_record(&meta).await.unwrap();
        let _decision: Action = peer.read_record().await.unwrap();

        for payload in [&b"one"[..], &b"two"[..]] {
            peer.write_blob(payload).await.unwrap();
            let _ack: Action = peer.read_record().await.unwrap();
        }

        assert_eq!(receiver.await.unwrap(), 2);
        let got = sink.got.lock().unwrap();
        assert_eq!(got[0], (0, "image/png".to_string(), b"one".to_vec()));
        assert_eq!(got[1], (1, "image/png".to_string(), b"two".to_vec()));
    }
}
