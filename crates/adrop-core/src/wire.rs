//! Length-prefixed framing over one exclusively owned stream.
//!
//! Two distinct conventions share the connection: structured records travel
//! as (varint length, bincode body); raw payload blobs travel as (u32-BE
//! length, bytes). The blob prefix is a plain integer on purpose — payload
//! bytes never pass through the record codec.

use crate::error::TransferError;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a record body. Records are a manifest or a control action,
/// so a length anywhere near this is a corrupt or hostile peer.
pub const MAX_RECORD_LEN: usize = 1024 * 1024;

/// Owns the stream for the whole session; dropping the channel drops the
/// stream and closes the underlying socket, on every exit path.
pub struct Framed<T> {
    stream: T,
}

impl<T> Framed<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Serialize a record and write it with its varint length prefix,
    /// flushing so the peer can read without buffering ambiguity.
    pub async fn write_record<M: Serialize>(&mut self, record: &M) -> Result<(), TransferError> {
        let body = bincode::serialize(record)?;
        if body.len() > MAX_RECORD_LEN {
            return Err(TransferError::RecordTooLarge(body.len()));
        }
        let mut frame = Vec::with_capacity(body.len() + 5);
        write_varint(&mut frame, body.len() as u64);
        frame.extend_from_slice(&body);
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub async fn read_record<M: DeserializeOwned>(&mut self) -> Result<M, TransferError> {
        let len = read_varint(&mut self.stream).await? as usize;
        if len > MAX_RECORD_LEN {
            return Err(TransferError::RecordTooLarge(len));
        }
        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await.map_err(map_eof)?;
        Ok(bincode::deserialize(&body)?)
    }

    pub async fn write_blob(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        self.stream
            .write_all(&(bytes.len() as u32).to_be_bytes())
            .await?;
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Accumulates exactly the declared length, looping over short reads. A
    /// stream that ends early fails with `ConnectionClosed` rather than
    /// returning a truncated buffer.
    pub async fn read_blob(&mut self) -> Result<Vec<u8>, TransferError> {
        let mut lenb = [0u8; 4];
        self.stream.read_exact(&mut lenb).await.map_err(map_eof)?;
        let len = u32::from_be_bytes(lenb) as usize;

        let mut buf = vec![0u8; len];
        self.stream.read_exact(&mut buf).await.map_err(map_eof)?;
        Ok(buf)
    }
}

fn map_eof(e: std::io::Error) -> TransferError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        TransferError::ConnectionClosed
    } else {
        TransferError::Io(e)
    }
}

/// LEB128 unsigned varint, the protobuf length convention.
fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u64, TransferError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).await.map_err(map_eof)?;
        value |= u64::from(byte[0] & 0x7f) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 64 {
            return Err(TransferError::BadLengthPrefix);
        }
    }
}
