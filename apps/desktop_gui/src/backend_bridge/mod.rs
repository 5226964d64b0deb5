//! Bridge between the UI thread and the backend worker that talks to the
//! remote table.

pub mod commands;
pub mod runtime;
