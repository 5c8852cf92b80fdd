//! Bridge between the UI loop and the async backend worker.

pub mod commands;
pub mod runtime;
