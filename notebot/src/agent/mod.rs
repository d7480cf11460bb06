//! The conversation loop: one stateless turn at a time, with notes standing
//! in for memory.

pub mod conversation;
pub mod prompt;
pub mod repl;
pub mod turn;

#[cfg(test)]
mod turn_tests;

pub use conversation::Conversation;
pub use repl::run_repl;
pub use turn::Agent;
