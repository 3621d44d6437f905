//! reply-engine - prompt building and request dispatch for smart replies
//!
//! - `prompt` - system/user instruction builders and truncation budgets
//! - `dispatcher` - configuration resolution, provider call, interpretation
//! - `sequence` - per-kind tickets so only the latest request is delivered
//! - `envelope` - host messages in, response envelopes out
//! - `error` - `ReplyError` and its localized user messages

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod selection;
pub mod sequence;

pub use config::{DispatcherConfig, ModeProfile};
pub use dispatcher::{Delivery, RequestDispatcher, RequestPhase};
pub use envelope::{
    GeneratePayload, InboundMessage, LightningPayload, PresetSummary, PreviewPayload,
    ProofreadPayload, PromptMeta, PromptPreview, ResponseEnvelope,
};
pub use error::ReplyError;
pub use prompt::{build_system_instruction, build_user_instruction, ResolvedPromptContext};
pub use sequence::{RequestKind, RequestSequencer, Ticket};
