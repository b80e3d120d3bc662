//! Wire records exchanged during the handshake.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TEXT_PLAIN: &str = "text/plain";

/// Extension for payloads whose MIME type maps to nothing.
pub const FALLBACK_EXTENSION: &str = ".dat";

/// Declared type of one transfer item. The manifest carries types only; the
/// bytes follow later as raw blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_type: String,
}

/// Manifest sent before any payload: one entry per item, in the exact order
/// the payloads will follow. Immutable once written to the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub file_infos: Vec<FileInfo>,
}

/// Tri-state control signal: the accept/reject answer to a manifest, and the
/// bare per-payload acknowledgment whose value the peer never inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Default = 0,
    Accepted = 1,
    Rejected = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionType,
}

impl Action {
    pub fn accepted() -> Self {
        Self {
            kind: ActionType::Accepted,
        }
    }

    pub fn rejected() -> Self {
        Self {
            kind: ActionType::Rejected,
        }
    }

    /// Per-payload acknowledgment; arrival is all that matters.
    pub fn ack() -> Self {
        Self {
            kind: ActionType::Default,
        }
    }
}

/// MIME type for a file path, from its extension. Unknown extensions are
/// declared as octet streams.
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// File extension (with leading dot) for a declared MIME type, `.dat` when
/// unmapped.
pub fn extension_for_mime(mime: &str) -> String {
    mime_guess::get_mime_extensions_str(mime)
        .and_then(|exts| exts.first())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
