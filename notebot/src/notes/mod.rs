//! Notes system — the agent's externalized memory
//!
//! Plain text notes addressed by slash-separated paths under a root directory.
//! Notes are only ever appended to; the agent reads them back on demand.

pub mod file_ops;
pub mod paths;
pub mod store;

pub use paths::PathRule;
pub use store::{NoteRead, NoteStore, NoteWrite};
