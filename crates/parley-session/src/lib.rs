//! Conversation sessions and their on-disk transcript.
//!
//! - [`TranscriptStore`]: in-memory buffer of timestamped entries, flushed
//!   to an append-only text log that is rotated once it grows too large.
//! - [`ConversationSession`]: one dialogue with the remote model; owns the
//!   interact/reset lifecycle and the transcript.
//! - [`SharedSession`]: cloneable handle that serializes every operation on
//!   a session.

pub mod config;
pub mod session;
pub mod shared;
pub mod transcript;

pub use config::SessionConfig;
pub use session::ConversationSession;
pub use shared::SharedSession;
pub use transcript::{TranscriptEntry, TranscriptStore};
