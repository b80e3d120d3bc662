//! Where received payloads go, one delivery per manifest index.

use crate::message::{extension_for_mime, TEXT_PLAIN};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait PayloadSink: Send + Sync {
    /// Hand over one received payload. `index` is the item's 0-based manifest
    /// position; repeated MIME types still get one call per index.
    async fn deliver(&self, index: usize, file_type: &str, bytes: &[u8]) -> Result<()>;
}

/// Default delivery: text/plain to stdout, everything else to
/// `{index}{extension}` under the output directory.
pub struct FsSink {
    out_dir: PathBuf,
}

impl FsSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

#[async_trait]
impl PayloadSink for FsSink {
    async fn deliver(&self, index: usize, file_type: &str, bytes: &[u8]) -> Result<()> {
        if file_type == TEXT_PLAIN {
            println!("received text: \n{}", String::from_utf8_lossy(bytes));
            return Ok(());
        }

        let name = format!("{}{}", index, extension_for_mime(file_type));
        let path = self.out_dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn files_are_named_by_index_and_extension() -> Result<()> {
        let temp = TempDir::new()?;
        let sink = FsSink::new(temp.path().to_path_buf());

        sink.deliver(0, "image/png", b"\x89PNG").await?;
        sink.deliver(1, "application/x-adrop", b"??").await?;

        assert_eq!(std::fs::read(temp.path().join("0.png"))?, b"\x89PNG");
        assert_eq!(std::fs::read(temp.path().join("1.dat"))?, b"??");
        Ok(())
    }

    #[tokio::test]
    async fn text_is_not_written_to_disk() -> Result<()> {
        let temp = TempDir::new()?;
        let sink = FsSink::new(temp.path().to_path_buf());

        sink.deliver(0, TEXT_PLAIN, b"hi").await?;

        assert_eq!(std::fs::read_dir(temp.path())?.count(), 0);
        Ok(())
    }
}
