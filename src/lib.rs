//! the-todo: a terminal editor for markdown checkbox lists.
//!
//! The library carries the whole editor; the binary is a thin clap wrapper.
//! The document model, grammar, history, and persistence under
//! [`editor`] are pure and usable without a terminal.

pub mod editor;
pub mod prelude;
