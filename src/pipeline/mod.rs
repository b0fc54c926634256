//! Session pipeline
//!
//! The end-to-end operation behind an audio upload: room lookup → blob
//! upload → transcription (submit + bounded poll) → report synthesis →
//! PDF rendering → report upload → one atomic append into the room.
//! Every external call races against a cancellation token; the only
//! durable commit is the final append.

mod pipeline;
mod poll;

pub use pipeline::SessionPipeline;
pub use poll::{PollOutcome, PollPolicy};
