//! Journal use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the state each screen renders.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod add_task;
pub mod debounce;
pub mod entry_editor;
pub mod index;
pub mod schedule;
