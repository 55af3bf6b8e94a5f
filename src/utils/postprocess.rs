//! Post-processing stages applied to LLM replies.

pub mod json;
pub mod verify;

pub use json::parse_output;
pub use verify::{reconcile, verify, ResultBuckets, Verdict};
