//! Guidegen — cold-calling script generator.
//!
//! Assembles a generation prompt from campaign inputs, a static reference
//! library of exemplar scripts, and text extracted from uploaded sales
//! material, then sends it to a chat-completions API and returns the
//! resulting Markdown script.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod campaign;
pub mod config;
pub mod context;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod reference;
