//! Per-session chat/tree state and the flows that mutate it.

pub mod chat;
pub mod checklist;
pub mod extract;
pub mod state;

pub use chat::{analyze, exchange};
pub use extract::extract_tree;
pub use state::SessionState;
