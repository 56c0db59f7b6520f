//! Model-serving backends

pub mod watsonx;

// Re-export for convenience
pub use watsonx::{ChatInvoker, ChatOutcome};
