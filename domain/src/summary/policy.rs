//! Which messages deserve a summary.

use crate::message::entities::Message;

/// Content shorter than this (in bytes) is not summarized.
pub const DEFAULT_MIN_CONTENT_BYTES: usize = 2500;

/// Why a message was not summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Content is below the size threshold.
    TooShort,
    /// A summary is already stored.
    AlreadySummarized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryPolicy {
    min_content_bytes: usize,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONTENT_BYTES)
    }
}

impl SummaryPolicy {
    pub fn new(min_content_bytes: usize) -> Self {
        Self { min_content_bytes }
    }

    pub fn min_content_bytes(&self) -> usize {
        self.min_content_bytes
    }

    /// `Ok(())` when `message` should be summarized.
    pub fn check(&self, message: &Message) -> Result<(), SkipReason> {
        if message.has_summary() {
            return Err(SkipReason::AlreadySummarized);
        }
        if message.content.len() < self.min_content_bytes {
            return Err(SkipReason::TooShort);
        }
        Ok(())
    }
}
