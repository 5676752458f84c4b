//! Execution semantics: the operation interpreter and the register file

pub mod concrete;
pub mod state;

// Re-export main functionality
pub use concrete::{apply_binary, apply_unary, evaluate};
pub use state::ProgramState;
