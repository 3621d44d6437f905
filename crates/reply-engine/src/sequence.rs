//! Last-writer-wins bookkeeping for overlapping requests.
//!
//! Each operation kind has its own monotonic counter. A result is only
//! surfaced when its ticket is still the latest one issued for its kind;
//! superseded calls are left to finish and their results are dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Operation kinds tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Suggestions,
    Lightning,
    Proofread,
    PromptPreview,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Suggestions,
        RequestKind::Lightning,
        RequestKind::Proofread,
        RequestKind::PromptPreview,
    ];

    fn index(self) -> usize {
        match self {
            RequestKind::Suggestions => 0,
            RequestKind::Lightning => 1,
            RequestKind::Proofread => 2,
            RequestKind::PromptPreview => 3,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Suggestions => "suggestions",
            RequestKind::Lightning => "lightning",
            RequestKind::Proofread => "proofread",
            RequestKind::PromptPreview => "prompt-preview",
        };
        f.write_str(name)
    }
}

/// Sequence token taken when a request is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: RequestKind,
    pub sequence: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.sequence)
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: [AtomicU64; 4],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket for `kind`; it supersedes every earlier one.
    pub fn issue(&self, kind: RequestKind) -> Ticket {
        let sequence = self.latest[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { kind, sequence }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest(ticket.kind) == ticket.sequence
    }

    /// Sequence of the most recent ticket for `kind`, 0 when none was issued.
    pub fn latest(&self, kind: RequestKind) -> u64 {
        self.latest[kind.index()].load(Ordering::SeqCst)
    }
}
