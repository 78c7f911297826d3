//! Terminal front end for the strata compositor.
//!
//! `strata-core` stops at the [`RenderSink`] boundary; this crate
//! supplies the real sink. [`AnsiSink`] turns a completed dirty region
//! into a minimal stream of ANSI escapes, [`Screen`] pairs a stage
//! with that sink, and [`Terminal`] wires the screen to the process's
//! controlling terminal with resize handling and teardown.
//!
//! [`RenderSink`]: strata_core::RenderSink

pub mod ansi;
pub mod error;
pub mod screen;
pub mod terminal;

pub use error::TermError;
pub use screen::{AnsiSink, Screen};
pub use terminal::Terminal;
