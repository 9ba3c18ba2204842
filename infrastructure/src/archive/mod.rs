//! Poll result archives

pub mod jsonl;

pub use jsonl::JsonlPollArchive;
