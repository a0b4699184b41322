use serde::{Deserialize, Serialize};

use super::id::SessionId;

/// Substring the store puts into a preview when the last message carried a file.
pub const ATTACHMENT_MARKER: &str = "[Attached file:";

/// Read-only projection of a stored session, used for the notebook list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub session_id: SessionId,
    pub title: String,
    pub preview: String,
}

impl ChatSummary {
    /// True iff the preview signals that a file was attached.
    pub fn has_attachment(&self) -> bool {
        self.preview.contains(ATTACHMENT_MARKER)
    }
}
